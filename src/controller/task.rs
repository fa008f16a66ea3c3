//! Async supervisory loop around the controller machine.

use embassy_time::Timer;
use futures_lite::future::or;
use log::warn;

use crate::app::ports::EventSink;
use crate::channels::{CONTROLLER_FRAMES, HOST_COMMANDS, PIPELINE};
use crate::config::SystemConfig;
use crate::link::host::HostCommand;
use crate::link::io_task::OutboundLink;
use crate::link::message::Message;
use crate::link::transport::ByteTransport;

use super::{Controller, InputInterest};

enum Input {
    Host(HostCommand),
    Frame(Message),
    /// Host-poll window elapsed with nothing to read.
    Tick,
}

/// Drive the controller machine forever.
///
/// `transport` is the outbound half of the sensor link; inbound bytes
/// arrive pre-decoded through the frame channel.
pub async fn run<T: ByteTransport>(
    mut transport: T,
    config: SystemConfig,
    mut events: impl EventSink,
) {
    let mut controller = Controller::new(&config);
    let mut link = OutboundLink::new();

    loop {
        let input = match controller.interest() {
            InputInterest::HostOnly => Input::Host(HOST_COMMANDS.receive().await),
            InputInterest::SensorOnly => Input::Frame(CONTROLLER_FRAMES.receive().await),
            InputInterest::SensorWithHostPoll => match HOST_COMMANDS.try_receive() {
                Ok(cmd) => Input::Host(cmd),
                // No host traffic: wait for a frame, but wake up at the
                // yield interval to poll the host channel again.
                Err(_) => {
                    or(
                        async { Input::Frame(CONTROLLER_FRAMES.receive().await) },
                        async {
                            Timer::after_millis(config.loop_yield_ms).await;
                            Input::Tick
                        },
                    )
                    .await
                }
            },
        };

        let outcome = match input {
            Input::Host(cmd) => controller.on_host_command(cmd, &mut link, &mut events),
            Input::Frame(msg) => Ok(controller.on_frame(msg, &mut events)),
            Input::Tick => Ok(None),
        };

        let to_pipeline = match outcome {
            Ok(msg) => msg,
            Err(err) => {
                warn!("controller: link fault ({err}), recovering");
                Some(controller.recover(&mut events))
            }
        };
        if let Some(msg) = to_pipeline {
            if PIPELINE.try_send(msg).is_err() {
                warn!("controller: pipeline queue full, dropping {msg:?}");
            }
        }

        if let Err(err) = link.flush(&mut transport).await {
            warn!("controller: flush failed: {err:?}");
        }
        Timer::after_millis(config.loop_yield_ms).await;
    }
}
