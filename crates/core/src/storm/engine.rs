//! Storm engine: owns the state vector and drives the phase dispatcher.

use super::{Phase, StepContext, SubStage};
use crate::core_types::{RandomSource, SeededRandom, StormConstants, WeatherState, DEFAULT_SEED};
use crate::error::{ConstantsError, StormError};
use crate::simulation::{StormTrace, TraceFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A phase change produced by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Phase the step ran in
    pub from: Phase,
    /// Phase active after the step
    pub to: Phase,
    /// Index of the step that triggered the change
    pub iteration: u64,
}

/// Deterministic thunderstorm simulation.
///
/// Starts in [`Phase::Brewing`] with [`WeatherState::initial`] and steps
/// until [`Phase::End`]. All randomness comes from the single source `R`,
/// consumed in call order.
///
/// # Example
/// ```
/// use storm_sim_core::{Phase, StormEngine};
///
/// let mut engine = StormEngine::new();
/// engine.run();
/// assert_eq!(engine.phase(), Phase::End);
/// assert!(engine.state().lightning_events >= 4);
/// ```
#[derive(Debug, Clone)]
pub struct StormEngine<R = SeededRandom> {
    state: WeatherState,
    constants: StormConstants,
    phase: Phase,
    iteration: u64,
    charge: f64,
    lightning_distance: f64,
    rng: R,
}

impl StormEngine<SeededRandom> {
    /// Engine with the reference constants and [`DEFAULT_SEED`].
    pub fn new() -> Self {
        Self::build(StormConstants::default(), SeededRandom::new(DEFAULT_SEED))
    }

    /// Engine with the reference constants and a chosen seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(StormConstants::default(), SeededRandom::new(seed))
    }

    /// Engine with a custom constant table and seed.
    ///
    /// # Errors
    ///
    /// Returns [`ConstantsError`] if the table fails
    /// [`StormConstants::validate`].
    pub fn with_constants(constants: StormConstants, seed: u64) -> Result<Self, ConstantsError> {
        Self::with_random(constants, SeededRandom::new(seed))
    }

    /// Seed of the underlying random stream.
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

impl Default for StormEngine<SeededRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> StormEngine<R> {
    /// Engine drawing from a caller-supplied random source.
    ///
    /// # Errors
    ///
    /// Returns [`ConstantsError`] if the table fails
    /// [`StormConstants::validate`].
    pub fn with_random(constants: StormConstants, rng: R) -> Result<Self, ConstantsError> {
        constants.validate()?;
        Ok(Self::build(constants, rng))
    }

    fn build(constants: StormConstants, rng: R) -> Self {
        let lightning_distance = constants.threshold.initial_lightning_distance;
        Self {
            state: WeatherState::initial(),
            constants,
            phase: Phase::Brewing,
            iteration: 0,
            charge: 0.0,
            lightning_distance,
            rng,
        }
    }

    /// Current weather state.
    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    /// Constant table fixed at construction.
    pub fn constants(&self) -> &StormConstants {
        &self.constants
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Active full-storm sub-stage, if any.
    pub fn sub_stage(&self) -> Option<SubStage> {
        self.phase.sub_stage()
    }

    /// Number of steps executed so far.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Accumulated electrical charge.
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Distance to the nearest lightning strike.
    pub fn lightning_distance(&self) -> f64 {
        self.lightning_distance
    }

    /// Whether the storm has reached [`Phase::End`].
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// The random source, e.g. to inspect a scripted stream after a run.
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Execute one step of the current phase.
    ///
    /// Applies the phase's update, then checks its completion predicate on
    /// the updated state and advances if it holds. The new phase's update
    /// does not run until the next call. Once the storm has ended this is a
    /// no-op and the iteration counter stays put.
    ///
    /// Returns the transition if the phase changed on this step.
    pub fn step(&mut self) -> Option<Transition> {
        let rule = self.phase.rule()?;

        let mut ctx = StepContext {
            state: &mut self.state,
            constants: &self.constants,
            rng: &mut self.rng,
            iteration: self.iteration,
            charge: &mut self.charge,
            lightning_distance: &mut self.lightning_distance,
        };
        (rule.update)(&mut ctx);

        let transition = if (rule.is_complete)(&self.state, &self.constants) {
            let from = self.phase;
            let to = from.successor();
            self.phase = to;
            self.log_transition(from, to);
            Some(Transition {
                from,
                to,
                iteration: self.iteration,
            })
        } else {
            None
        };

        self.iteration += 1;
        transition
    }

    /// Run to completion and return the total number of steps.
    ///
    /// Always terminates: validation bounds how long each phase goal can
    /// take, see [`MAX_GOAL_STEPS`](crate::MAX_GOAL_STEPS).
    pub fn run(&mut self) -> u64 {
        while !self.is_finished() {
            self.step();
        }
        info!("Storm ended after {} iterations", self.iteration);
        self.iteration
    }

    /// Run to completion, giving up after `max_steps` more steps.
    ///
    /// # Errors
    ///
    /// Returns [`StormError::StepLimitExceeded`] if the storm is still live
    /// once the budget is spent.
    pub fn run_bounded(&mut self, max_steps: u64) -> Result<u64, StormError> {
        for _ in 0..max_steps {
            if self.is_finished() {
                break;
            }
            self.step();
        }
        if !self.is_finished() {
            return Err(StormError::StepLimitExceeded {
                limit: max_steps,
                phase: self.phase,
            });
        }
        info!("Storm ended after {} iterations", self.iteration);
        Ok(self.iteration)
    }

    /// Run to completion, recording a frame after every step.
    pub fn run_traced(&mut self) -> StormTrace {
        let trace = self.record(u64::MAX);
        info!(
            "Storm ended after {} iterations ({} frames recorded)",
            self.iteration,
            trace.len()
        );
        trace
    }

    /// Traced run that gives up after `max_steps` more steps.
    ///
    /// # Errors
    ///
    /// Returns [`StormError::StepLimitExceeded`] if the storm is still live
    /// once the budget is spent. The partial trace is discarded.
    pub fn run_traced_bounded(&mut self, max_steps: u64) -> Result<StormTrace, StormError> {
        let trace = self.record(max_steps);
        if !self.is_finished() {
            return Err(StormError::StepLimitExceeded {
                limit: max_steps,
                phase: self.phase,
            });
        }
        Ok(trace)
    }

    fn record(&mut self, max_steps: u64) -> StormTrace {
        let mut trace = StormTrace::new();
        let mut taken = 0;
        while !self.is_finished() && taken < max_steps {
            let iteration = self.iteration;
            let phase = self.phase;
            self.step();
            trace.push(TraceFrame {
                iteration,
                phase,
                next_phase: self.phase,
                state: self.state.clone(),
                charge: self.charge,
                lightning_distance: self.lightning_distance,
            });
            taken += 1;
        }
        trace
    }

    fn log_transition(&self, from: Phase, to: Phase) {
        if from.ordinal() == to.ordinal() {
            debug!("Sub-stage {} -> {} at iteration {}", from, to, self.iteration);
        } else {
            info!(
                "Phase {} -> {} at iteration {} (T={:.1}, P={:.1}, strikes={})",
                from,
                to,
                self.iteration,
                self.state.temperature,
                self.state.pressure,
                self.state.lightning_events
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::SequenceRandom;

    #[test]
    fn fresh_engine_starts_brewing() {
        let engine = StormEngine::new();
        assert_eq!(engine.phase(), Phase::Brewing);
        assert_eq!(engine.sub_stage(), None);
        assert_eq!(engine.iteration(), 0);
        assert_eq!(engine.charge(), 0.0);
        assert_eq!(engine.lightning_distance(), 18.0);
        assert_eq!(engine.seed(), DEFAULT_SEED);
        assert_eq!(engine.state(), &WeatherState::initial());
    }

    #[test]
    fn step_reports_transitions_and_counts_iterations() {
        let mut engine = StormEngine::new();
        let mut transitions = Vec::new();
        while !engine.is_finished() {
            if let Some(t) = engine.step() {
                transitions.push(t);
            }
        }
        let path: Vec<Phase> = transitions.iter().map(|t| t.to).collect();
        assert_eq!(
            path,
            vec![
                Phase::Threshold,
                Phase::FullStorm(SubStage::Impact),
                Phase::FullStorm(SubStage::Downpour),
                Phase::FullStorm(SubStage::Frenzy),
                Phase::FullStorm(SubStage::Chaos),
                Phase::FullStorm(SubStage::Silence),
                Phase::End,
            ]
        );
        // Brewing is gated by pressure: 22 hPa at 0.5 per step
        assert_eq!(transitions[0].iteration, 43);
        // The last transition happens on the last step
        assert_eq!(transitions.last().map(|t| t.iteration), Some(engine.iteration() - 1));
    }

    #[test]
    fn step_after_end_is_a_no_op() {
        let mut engine = StormEngine::new();
        let total = engine.run();
        let snapshot = engine.state().clone();
        assert_eq!(engine.step(), None);
        assert_eq!(engine.iteration(), total);
        assert_eq!(engine.state(), &snapshot);
    }

    #[test]
    fn custom_constants_are_validated() {
        let mut constants = StormConstants::default();
        constants.silence.silence_decay = 0.0;
        assert!(StormEngine::with_constants(constants, 3).is_err());
        assert_eq!(
            StormEngine::with_constants(StormConstants::default(), 3).map(|e| e.seed()),
            Ok(3)
        );
    }

    #[test]
    fn tables_that_would_never_finish_are_refused() {
        let mut stuck = StormConstants::default();
        stuck.brewing.brew_wind_instability_threshold = 1e300;
        assert!(matches!(
            StormEngine::with_constants(stuck, 0),
            Err(ConstantsError::Stalled { .. })
        ));

        let mut nan_peak = StormConstants::default();
        nan_peak.full_storm.full_turbulence_peak = f64::NAN;
        assert!(matches!(
            StormEngine::with_constants(nan_peak, 0),
            Err(ConstantsError::NonFinite { .. })
        ));

        // A slow table that passes still ends
        let mut slow = StormConstants::default();
        slow.brewing.brew_wind_instability_threshold = 10_000.0;
        let mut engine = StormEngine::with_constants(slow, 0).unwrap();
        let steps = engine.run_bounded(200_000).unwrap();
        assert!(engine.is_finished());
        // Instability climbs 0.2 per brewing step
        assert!(steps > 50_000, "{steps}");
    }

    #[test]
    fn bounded_run_reports_where_it_stalled() {
        let mut engine = StormEngine::new();
        let err = engine.run_bounded(10).unwrap_err();
        assert_eq!(
            err,
            StormError::StepLimitExceeded {
                limit: 10,
                phase: Phase::Brewing
            }
        );
        assert_eq!(engine.iteration(), 10);

        // Resuming with a generous budget finishes the same run
        let total = engine.run_bounded(10_000).unwrap();
        assert_eq!(total, StormEngine::new().run());
    }

    #[test]
    fn bounded_trace_matches_unbounded_when_budget_suffices() {
        let full = StormEngine::new().run_traced();
        let bounded = StormEngine::new().run_traced_bounded(1_000).unwrap();
        assert_eq!(full, bounded);

        let mut short = StormEngine::new();
        assert!(matches!(
            short.run_traced_bounded(50),
            Err(StormError::StepLimitExceeded { limit: 50, phase: Phase::Threshold })
        ));
    }

    #[test]
    fn draws_happen_only_where_randomness_is_used() {
        let mut rng = SequenceRandom::constant(0.5);
        let mut engine = StormEngine::with_random(StormConstants::default(), &mut rng).unwrap();

        // Brewing consumes nothing
        while engine.phase() == Phase::Brewing {
            engine.step();
        }
        assert_eq!(engine.rng().draws(), 0);

        let mut expected = 0;
        while !engine.is_finished() {
            let phase = engine.phase();
            engine.step();
            if matches!(
                phase,
                Phase::Threshold
                    | Phase::FullStorm(SubStage::Downpour | SubStage::Frenzy | SubStage::Chaos)
            ) {
                expected += 1;
            }
        }
        assert_eq!(engine.rng().draws(), expected);
    }
}
