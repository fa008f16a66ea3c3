//! Async platform loop: frames multiplexed against timer expiries.

use embassy_time::{Instant, Timer};
use futures_lite::future::or;
use log::warn;

use crate::app::ports::ReadingSource;
use crate::channels::PLATFORM_FRAMES;
use crate::link::io_task::OutboundLink;
use crate::link::message::Message;
use crate::link::transport::ByteTransport;

use super::Platform;

enum Wake {
    Frame(Message),
    Deadline,
}

/// Drive the platform machine forever.
pub async fn run<T: ByteTransport>(mut transport: T, mut source: impl ReadingSource) {
    let mut platform = Platform::new();
    let mut link = OutboundLink::new();

    loop {
        let wake = match platform.timers().next_deadline() {
            // Whichever fires first wins; the loser's wait is re-entered
            // next iteration.
            Some(deadline) => {
                or(
                    async { Wake::Frame(PLATFORM_FRAMES.receive().await) },
                    async {
                        Timer::at(deadline).await;
                        Wake::Deadline
                    },
                )
                .await
            }
            None => Wake::Frame(PLATFORM_FRAMES.receive().await),
        };

        let now = Instant::now();
        let result = match wake {
            Wake::Frame(msg) => platform.handle_frame(msg, now, &mut link),
            Wake::Deadline => platform.on_timer(now, &mut source, &mut link),
        };
        if let Err(err) = result {
            warn!("platform: send failed ({err}), frame dropped");
        }

        if let Err(err) = link.flush(&mut transport).await {
            warn!("platform: flush failed: {err:?}");
        }
    }
}
