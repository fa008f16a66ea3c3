//! Async loop around the pipeline stage.

use crate::app::ports::IndicatorPort;
use crate::channels::PIPELINE;
use crate::controller::{self, ControllerState};

use super::PipelineStage;

/// Drive the classification/aggregation stage forever.
pub async fn run(mut indicator: impl IndicatorPort) {
    let mut stage = PipelineStage::new();
    loop {
        let msg = PIPELINE.receive().await;
        let gate_open = controller::published_state() == ControllerState::Parsing;
        stage.handle(msg, gate_open, &mut indicator);
    }
}
