//! Thunderstorm lifecycle state machine.
//!
//! A storm moves strictly forward through four phases:
//! - **Brewing**: air cools, pressure falls, cloud builds and petrichor rises
//! - **Threshold**: charge accumulates, lightning strikes and closes in
//! - **Full storm**: five sub-stages (impact, downpour, frenzy, chaos, silence)
//! - **End**: terminal, nothing updates any more
//!
//! Each live phase (and each full-storm sub-stage) owns one update rule and one
//! completion predicate. [`StormEngine`] looks both up by phase tag, applies
//! the update, checks the predicate against the freshly updated state, and
//! advances when it holds.

mod brewing;
mod engine;
mod full_storm;
mod phase;
mod threshold;

pub use engine::{StormEngine, Transition};
pub use phase::{Phase, SubStage};

use crate::core_types::{RandomSource, StormConstants, WeatherState};

/// Everything a phase update may read or write during one step.
pub(crate) struct StepContext<'a> {
    pub state: &'a mut WeatherState,
    pub constants: &'a StormConstants,
    pub rng: &'a mut dyn RandomSource,
    /// Index of the step being executed
    pub iteration: u64,
    /// Accumulated electrical charge
    pub charge: &'a mut f64,
    /// Distance to the nearest strike, never below 1.0
    pub lightning_distance: &'a mut f64,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::StepContext;
    use crate::core_types::{SequenceRandom, StormConstants, WeatherState};

    /// Owns everything a [`StepContext`] borrows, for driving single rules.
    pub(crate) struct Bench {
        pub state: WeatherState,
        pub constants: StormConstants,
        pub rng: SequenceRandom,
        pub charge: f64,
        pub lightning_distance: f64,
    }

    impl Bench {
        pub fn new(draws: Vec<f64>) -> Self {
            let constants = StormConstants::default();
            Self {
                state: WeatherState::initial(),
                lightning_distance: constants.threshold.initial_lightning_distance,
                constants,
                rng: SequenceRandom::new(draws),
                charge: 0.0,
            }
        }

        pub fn apply(&mut self, update: fn(&mut StepContext<'_>), iteration: u64) {
            let mut ctx = StepContext {
                state: &mut self.state,
                constants: &self.constants,
                rng: &mut self.rng,
                iteration,
                charge: &mut self.charge,
                lightning_distance: &mut self.lightning_distance,
            };
            update(&mut ctx);
        }
    }
}
