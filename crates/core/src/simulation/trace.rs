//! Step-by-step record of a storm run.

use crate::core_types::WeatherState;
use crate::storm::{Phase, Transition};
use serde::{Deserialize, Serialize};

/// Snapshot taken right after one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Index of the step, starting at 0
    pub iteration: u64,
    /// Phase the step ran in
    pub phase: Phase,
    /// Phase active once the step finished
    pub next_phase: Phase,
    /// Weather state after the update
    pub state: WeatherState,
    /// Accumulated charge after the update
    pub charge: f64,
    /// Lightning distance after the update
    pub lightning_distance: f64,
}

impl TraceFrame {
    /// The phase change this step triggered, if any.
    pub fn transition(&self) -> Option<Transition> {
        (self.phase != self.next_phase).then_some(Transition {
            from: self.phase,
            to: self.next_phase,
            iteration: self.iteration,
        })
    }
}

/// Every frame of one run, in step order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StormTrace {
    frames: Vec<TraceFrame>,
}

impl StormTrace {
    /// Empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next frame.
    pub fn push(&mut self, frame: TraceFrame) {
        debug_assert!(
            self.frames
                .last()
                .is_none_or(|last| last.iteration + 1 == frame.iteration),
            "frames must be contiguous"
        );
        self.frames.push(frame);
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All frames in step order.
    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames
    }

    /// Frame of the last executed step.
    pub fn final_frame(&self) -> Option<&TraceFrame> {
        self.frames.last()
    }

    /// Every phase change, in the order they happened.
    pub fn transitions(&self) -> Vec<Transition> {
        self.frames.iter().filter_map(TraceFrame::transition).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storm::SubStage;

    fn frame(iteration: u64, phase: Phase, next_phase: Phase) -> TraceFrame {
        TraceFrame {
            iteration,
            phase,
            next_phase,
            state: WeatherState::initial(),
            charge: 0.0,
            lightning_distance: 18.0,
        }
    }

    #[test]
    fn transitions_come_from_phase_changes() {
        let mut trace = StormTrace::new();
        assert!(trace.is_empty());
        trace.push(frame(0, Phase::Brewing, Phase::Brewing));
        trace.push(frame(1, Phase::Brewing, Phase::Threshold));
        trace.push(frame(2, Phase::Threshold, Phase::FullStorm(SubStage::Impact)));

        assert_eq!(trace.len(), 3);
        let transitions = trace.transitions();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].iteration, 1);
        assert_eq!(transitions[1].to, Phase::FullStorm(SubStage::Impact));
        assert_eq!(trace.final_frame().map(|f| f.iteration), Some(2));
    }
}
