//! Compact description of a finished run.

use super::StormTrace;
use crate::core_types::WeatherState;
use crate::storm::{Phase, SubStage};
use serde::{Deserialize, Serialize};

/// Steps spent in each phase and full-storm sub-stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseTally {
    /// Formation steps
    pub brewing: u64,
    /// Electrical buildup steps
    pub threshold: u64,
    /// Full-storm impact steps
    pub impact: u64,
    /// Full-storm downpour steps
    pub downpour: u64,
    /// Full-storm frenzy steps
    pub frenzy: u64,
    /// Full-storm chaos steps
    pub chaos: u64,
    /// Full-storm silence steps, including the one that ends the storm
    pub silence: u64,
}

impl PhaseTally {
    /// Count one step executed in `phase`.
    pub fn record(&mut self, phase: Phase) {
        match phase {
            Phase::Brewing => self.brewing += 1,
            Phase::Threshold => self.threshold += 1,
            Phase::FullStorm(SubStage::Impact) => self.impact += 1,
            Phase::FullStorm(SubStage::Downpour) => self.downpour += 1,
            Phase::FullStorm(SubStage::Frenzy) => self.frenzy += 1,
            Phase::FullStorm(SubStage::Chaos) => self.chaos += 1,
            Phase::FullStorm(SubStage::Silence) => self.silence += 1,
            Phase::End => {}
        }
    }

    /// Steps spent at full intensity across all sub-stages.
    pub fn full_storm(&self) -> u64 {
        self.impact + self.downpour + self.frenzy + self.chaos + self.silence
    }

    /// All steps.
    pub fn total(&self) -> u64 {
        self.brewing + self.threshold + self.full_storm()
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Seed the run was driven by
    pub seed: u64,
    /// Total steps until the storm ended
    pub iterations: u64,
    /// Steps per phase
    pub tally: PhaseTally,
    /// Lightning strikes during the run
    pub lightning_events: u32,
    /// Weather state after the last step
    pub final_state: WeatherState,
}

impl RunSummary {
    /// Summarize a recorded run.
    ///
    /// An empty trace yields the initial state and zero counts.
    pub fn from_trace(seed: u64, trace: &StormTrace) -> Self {
        let mut tally = PhaseTally::default();
        for frame in trace.frames() {
            tally.record(frame.phase);
        }
        let final_state = trace
            .final_frame()
            .map_or_else(WeatherState::initial, |f| f.state.clone());

        Self {
            seed,
            iterations: tally.total(),
            tally,
            lightning_events: final_state.lightning_events,
            final_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_groups_full_storm_sub_stages() {
        let mut tally = PhaseTally::default();
        tally.record(Phase::Brewing);
        tally.record(Phase::Brewing);
        tally.record(Phase::Threshold);
        tally.record(Phase::FullStorm(SubStage::Impact));
        tally.record(Phase::FullStorm(SubStage::Silence));
        tally.record(Phase::End);

        assert_eq!(tally.brewing, 2);
        assert_eq!(tally.full_storm(), 2);
        assert_eq!(tally.total(), 5);
    }

    #[test]
    fn empty_trace_summarizes_to_initial_state() {
        let summary = RunSummary::from_trace(9, &StormTrace::new());
        assert_eq!(summary.seed, 9);
        assert_eq!(summary.iterations, 0);
        assert_eq!(summary.final_state, WeatherState::initial());
    }
}
