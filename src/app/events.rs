//! Application lifecycle events.
//!
//! The state machines publish these through [`super::ports::EventSink`];
//! the default sink just logs them, tests record them.

use log::info;

use crate::controller::ControllerState;
use crate::link::message::SensorTag;

use super::ports::EventSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller moved between lifecycle states.
    ControllerStateChanged {
        from: ControllerState,
        to: ControllerState,
    },
    /// A sensor acknowledged its enable command.
    SensorEnabled(SensorTag),
    /// The platform acknowledged session teardown.
    ResetAcknowledged,
}

/// Event sink that forwards everything to the log.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&mut self, event: AppEvent) {
        match event {
            AppEvent::ControllerStateChanged { from, to } => {
                info!("controller: {from:?} -> {to:?}");
            }
            AppEvent::SensorEnabled(tag) => info!("sensor online: {tag:?}"),
            AppEvent::ResetAcknowledged => info!("session teardown acknowledged"),
        }
    }
}
