//! Controller-side supervisory state machine.
//!
//! ```text
//!          START              all 3 acks
//!   Init ────────▶ Start ─────────────────▶ Parsing
//!    ▲                                         │
//!    │         Ack(Controller)                 │ RESET
//!    └──────────────────────────── Reset ◀─────┘
//! ```
//!
//! The machine is synchronous; [`task`] owns the channels and the
//! blocking semantics, choosing what to await from [`Controller::interest`].
//! The current state is mirrored into an atomic so the pipeline task can
//! gate indicator flushes without sharing the machine.

pub mod task;

use core::sync::atomic::{AtomicU8, Ordering};

use log::debug;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, LinkPort};
use crate::channels::PipelineMsg;
use crate::config::SystemConfig;
use crate::error::LinkError;
use crate::link::host::HostCommand;
use crate::link::message::{Message, MessageKind, ScaledReading, SensorTag};

/// Lifecycle state of the controller endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ControllerState {
    /// Waiting for the host to start a session.
    #[default]
    Init = 0,
    /// Enables sent; collecting sensor acknowledgments.
    Start = 1,
    /// Steady state: ingesting telemetry.
    Parsing = 2,
    /// Reset sent; waiting for the platform to confirm teardown.
    Reset = 3,
}

impl ControllerState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Start,
            2 => Self::Parsing,
            3 => Self::Reset,
            _ => Self::Init,
        }
    }
}

static PUBLISHED_STATE: AtomicU8 = AtomicU8::new(ControllerState::Init as u8);

/// Controller state as last published by the machine.  Readable from any
/// task; only the controller task writes it.
pub fn published_state() -> ControllerState {
    ControllerState::from_u8(PUBLISHED_STATE.load(Ordering::Relaxed))
}

/// Which input sources the task should block on for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputInterest {
    /// Block on the host command channel only.
    HostOnly,
    /// Block on the sensor-link frame channel only.
    SensorOnly,
    /// Block on frames, polling the host channel each iteration.
    SensorWithHostPoll,
}

/// Per-sensor acknowledgment flags, indexed by
/// [`SensorTag::sensor_index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AckFlags([bool; 3]);

impl AckFlags {
    fn set(&mut self, idx: usize) {
        self.0[idx] = true;
    }

    fn all(&self) -> bool {
        self.0.iter().all(|&f| f)
    }

    fn clear(&mut self) {
        self.0 = [false; 3];
    }
}

/// The supervisory machine.  One instance, owned by the controller task.
#[derive(Debug)]
pub struct Controller {
    state: ControllerState,
    acks: AckFlags,
    /// Report period sent with each sensor's enable, in slot order.
    periods_ms: [u32; 3],
}

impl Controller {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: ControllerState::Init,
            acks: AckFlags::default(),
            periods_ms: [
                config.turbidity_period_ms,
                config.microplastic_period_ms,
                config.do_level_period_ms,
            ],
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn interest(&self) -> InputInterest {
        match self.state {
            ControllerState::Init => InputInterest::HostOnly,
            ControllerState::Start | ControllerState::Reset => InputInterest::SensorOnly,
            ControllerState::Parsing => InputInterest::SensorWithHostPoll,
        }
    }

    fn transition(&mut self, to: ControllerState, events: &mut impl EventSink) {
        let from = self.state;
        self.state = to;
        PUBLISHED_STATE.store(to as u8, Ordering::Relaxed);
        events.emit(AppEvent::ControllerStateChanged { from, to });
    }

    /// Handle a parsed host command.
    pub fn on_host_command(
        &mut self,
        cmd: HostCommand,
        link: &mut impl LinkPort,
        events: &mut impl EventSink,
    ) -> Result<Option<PipelineMsg>, LinkError> {
        match (self.state, cmd) {
            (ControllerState::Init, HostCommand::Start) => {
                self.acks.clear();
                for (tag, period) in SensorTag::SENSORS.into_iter().zip(self.periods_ms) {
                    link.send_enable(tag, period)?;
                }
                self.transition(ControllerState::Start, events);
                Ok(None)
            }
            (ControllerState::Parsing, HostCommand::Reset) => {
                link.send_reset()?;
                self.transition(ControllerState::Reset, events);
                // Clear downstream state before the teardown completes so
                // no stale batch survives into the next session.
                Ok(Some(PipelineMsg::Deassert))
            }
            (state, cmd) => {
                debug!("ignoring host {cmd:?} in {state:?}");
                Ok(None)
            }
        }
    }

    /// Handle a validated sensor-link frame.
    pub fn on_frame(
        &mut self,
        msg: Message,
        events: &mut impl EventSink,
    ) -> Option<PipelineMsg> {
        match (self.state, msg.kind()) {
            (ControllerState::Start, Some(MessageKind::Ack)) => {
                if let Some(idx) = msg.tag.sensor_index() {
                    self.acks.set(idx);
                    events.emit(AppEvent::SensorEnabled(msg.tag));
                    if self.acks.all() {
                        self.transition(ControllerState::Parsing, events);
                    }
                }
                None
            }
            (ControllerState::Parsing, Some(MessageKind::Data)) => {
                msg.tag.is_sensor().then(|| {
                    PipelineMsg::Reading(ScaledReading {
                        tag: msg.tag,
                        value: msg.params,
                    })
                })
            }
            (ControllerState::Reset, Some(MessageKind::Ack))
                if msg.tag == SensorTag::Controller =>
            {
                events.emit(AppEvent::ResetAcknowledged);
                self.acks.clear();
                self.transition(ControllerState::Init, events);
                None
            }
            (state, kind) => {
                debug!("ignoring {kind:?} from {:?} in {state:?}", msg.tag);
                None
            }
        }
    }

    /// Force the machine back to a safe idle state after a link fault.
    /// The returned message clears the pipeline downstream.
    pub fn recover(&mut self, events: &mut impl EventSink) -> PipelineMsg {
        self.acks.clear();
        self.transition(ControllerState::Init, events);
        PipelineMsg::Deassert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Sent {
        Enable(SensorTag, u32),
        Reset,
        Ack(SensorTag),
        Data(SensorTag, u32),
    }

    #[derive(Debug, Default)]
    struct MockLink {
        sent: std::vec::Vec<Sent>,
    }

    impl LinkPort for MockLink {
        fn send_enable(&mut self, tag: SensorTag, period_ms: u32) -> Result<(), LinkError> {
            self.sent.push(Sent::Enable(tag, period_ms));
            Ok(())
        }

        fn send_reset(&mut self) -> Result<(), LinkError> {
            self.sent.push(Sent::Reset);
            Ok(())
        }

        fn send_ack(&mut self, tag: SensorTag) -> Result<(), LinkError> {
            self.sent.push(Sent::Ack(tag));
            Ok(())
        }

        fn send_data(&mut self, tag: SensorTag, value: u32) -> Result<(), LinkError> {
            self.sent.push(Sent::Data(tag, value));
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct MockEvents {
        events: std::vec::Vec<AppEvent>,
    }

    impl EventSink for MockEvents {
        fn emit(&mut self, event: AppEvent) {
            self.events.push(event);
        }
    }

    fn ack(tag: SensorTag) -> Message {
        Message {
            tag,
            message_id: MessageKind::Ack.id(),
            checksum_valid: true,
            ready: true,
            ..Message::default()
        }
    }

    fn data(tag: SensorTag, params: u32) -> Message {
        Message {
            tag,
            message_id: MessageKind::Data.id(),
            params,
            checksum_valid: true,
            ready: true,
            ..Message::default()
        }
    }

    fn started() -> (Controller, MockLink, MockEvents) {
        let mut ctrl = Controller::new(&SystemConfig::default());
        let mut link = MockLink::default();
        let mut events = MockEvents::default();
        ctrl.on_host_command(HostCommand::Start, &mut link, &mut events)
            .unwrap();
        (ctrl, link, events)
    }

    fn parsing() -> (Controller, MockLink, MockEvents) {
        let (mut ctrl, link, mut events) = started();
        for tag in SensorTag::SENSORS {
            ctrl.on_frame(ack(tag), &mut events);
        }
        assert_eq!(ctrl.state(), ControllerState::Parsing);
        (ctrl, link, events)
    }

    #[test]
    fn start_sends_enables_with_periods() {
        let (ctrl, link, _) = started();
        assert_eq!(ctrl.state(), ControllerState::Start);
        assert_eq!(
            link.sent,
            [
                Sent::Enable(SensorTag::Turbidity, 1000),
                Sent::Enable(SensorTag::Microplastic, 1000),
                Sent::Enable(SensorTag::DOLevel, 1000),
            ]
        );
    }

    #[test]
    fn duplicate_acks_do_not_shortcut() {
        let (mut ctrl, _, mut events) = started();
        for _ in 0..5 {
            ctrl.on_frame(ack(SensorTag::Turbidity), &mut events);
        }
        ctrl.on_frame(ack(SensorTag::DOLevel), &mut events);
        assert_eq!(ctrl.state(), ControllerState::Start);

        ctrl.on_frame(ack(SensorTag::Microplastic), &mut events);
        assert_eq!(ctrl.state(), ControllerState::Parsing);
    }

    #[test]
    fn acks_complete_in_any_order() {
        let (mut ctrl, _, mut events) = started();
        ctrl.on_frame(ack(SensorTag::DOLevel), &mut events);
        ctrl.on_frame(ack(SensorTag::Turbidity), &mut events);
        ctrl.on_frame(ack(SensorTag::Microplastic), &mut events);
        assert_eq!(ctrl.state(), ControllerState::Parsing);
    }

    #[test]
    fn parsing_forwards_data_readings() {
        let (mut ctrl, _, mut events) = parsing();
        let out = ctrl.on_frame(data(SensorTag::Turbidity, 2_050), &mut events);
        assert_eq!(
            out,
            Some(PipelineMsg::Reading(ScaledReading {
                tag: SensorTag::Turbidity,
                value: 2_050,
            }))
        );
    }

    #[test]
    fn data_before_parsing_is_ignored() {
        let (mut ctrl, _, mut events) = started();
        assert_eq!(ctrl.on_frame(data(SensorTag::Turbidity, 1), &mut events), None);
    }

    #[test]
    fn reset_round_trip_reruns_start() {
        let (mut ctrl, mut link, mut events) = parsing();
        link.sent.clear();

        let out = ctrl
            .on_host_command(HostCommand::Reset, &mut link, &mut events)
            .unwrap();
        assert_eq!(out, Some(PipelineMsg::Deassert));
        assert_eq!(ctrl.state(), ControllerState::Reset);
        assert_eq!(link.sent, [Sent::Reset]);

        // Data arriving while tearing down is dropped.
        assert_eq!(ctrl.on_frame(data(SensorTag::DOLevel, 1), &mut events), None);

        ctrl.on_frame(ack(SensorTag::Controller), &mut events);
        assert_eq!(ctrl.state(), ControllerState::Init);
        assert!(events.events.contains(&AppEvent::ResetAcknowledged));

        // Ack flags were cleared: the next session needs all three again.
        link.sent.clear();
        ctrl.on_host_command(HostCommand::Start, &mut link, &mut events)
            .unwrap();
        ctrl.on_frame(ack(SensorTag::Turbidity), &mut events);
        ctrl.on_frame(ack(SensorTag::Microplastic), &mut events);
        assert_eq!(ctrl.state(), ControllerState::Start);
        ctrl.on_frame(ack(SensorTag::DOLevel), &mut events);
        assert_eq!(ctrl.state(), ControllerState::Parsing);
    }

    #[test]
    fn sensor_ack_does_not_complete_reset() {
        let (mut ctrl, mut link, mut events) = parsing();
        ctrl.on_host_command(HostCommand::Reset, &mut link, &mut events)
            .unwrap();
        ctrl.on_frame(ack(SensorTag::Turbidity), &mut events);
        assert_eq!(ctrl.state(), ControllerState::Reset);
    }

    #[test]
    fn host_commands_out_of_state_are_ignored() {
        let mut ctrl = Controller::new(&SystemConfig::default());
        let mut link = MockLink::default();
        let mut events = MockEvents::default();

        ctrl.on_host_command(HostCommand::Reset, &mut link, &mut events)
            .unwrap();
        assert_eq!(ctrl.state(), ControllerState::Init);
        assert!(link.sent.is_empty());

        let (mut ctrl, mut link, mut events) = parsing();
        link.sent.clear();
        ctrl.on_host_command(HostCommand::Start, &mut link, &mut events)
            .unwrap();
        assert_eq!(ctrl.state(), ControllerState::Parsing);
        assert!(link.sent.is_empty());
    }

    #[test]
    fn interest_tracks_state() {
        let (mut ctrl, mut link, mut events) = started();
        assert_eq!(ctrl.interest(), InputInterest::SensorOnly);
        for tag in SensorTag::SENSORS {
            ctrl.on_frame(ack(tag), &mut events);
        }
        assert_eq!(ctrl.interest(), InputInterest::SensorWithHostPoll);
        ctrl.on_host_command(HostCommand::Reset, &mut link, &mut events)
            .unwrap();
        assert_eq!(ctrl.interest(), InputInterest::SensorOnly);
        ctrl.on_frame(ack(SensorTag::Controller), &mut events);
        assert_eq!(ctrl.interest(), InputInterest::HostOnly);
    }

    #[test]
    fn recover_forces_idle() {
        let (mut ctrl, _, mut events) = parsing();
        assert_eq!(ctrl.recover(&mut events), PipelineMsg::Deassert);
        assert_eq!(ctrl.state(), ControllerState::Init);
    }
}
