//! Core storm data types: state vector, constant table and random source.

pub mod constants;
pub mod random;
pub mod weather;

pub use constants::{
    BrewingConstants, FullStormConstants, SilenceConstants, StormConstants, ThresholdConstants,
    MAX_GOAL_STEPS,
};
pub use random::{RandomSource, SeededRandom, SequenceRandom, DEFAULT_SEED};
pub use weather::WeatherState;
