//! Storm Simulation Core Library
//!
//! A deterministic, discrete-step model of a single thunderstorm's lifecycle.
//! A weather state vector evolves through formation, electrical buildup, full
//! intensity (five sub-stages) and dissipation until the storm goes quiet.
//!
//! ## Running a storm
//!
//! ```
//! use storm_sim_core::{RunSummary, StormEngine};
//!
//! let mut engine = StormEngine::with_seed(7);
//! let trace = engine.run_traced();
//! let summary = RunSummary::from_trace(7, &trace);
//! assert_eq!(summary.iterations, engine.iteration());
//! ```
//!
//! The run consumes one seeded random stream in call order, so a seed and a
//! constant table fully determine the outcome.

#![warn(missing_docs)]

// Core types and utilities
pub mod core_types;
pub mod error;

// Phase state machine
pub mod storm;

// Traces, summaries, ensembles
pub mod simulation;

// Re-export core types
pub use core_types::{
    RandomSource, SeededRandom, SequenceRandom, StormConstants, WeatherState, DEFAULT_SEED,
    MAX_GOAL_STEPS,
};
pub use error::{ConstantsError, StormError};

// Re-export engine and simulation types
pub use simulation::{run_ensemble, PhaseTally, RunSummary, StormTrace, TraceFrame};
pub use storm::{Phase, StormEngine, SubStage, Transition};
