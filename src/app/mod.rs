//! Application seams: the port traits the state machines talk through
//! and the event stream they publish.

pub mod events;
pub mod ports;

pub use events::{AppEvent, LogEventSink};
pub use ports::{EventSink, IndicatorPort, LinkPort, ReadingSource};
