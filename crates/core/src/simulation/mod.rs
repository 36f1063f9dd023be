//! Run recording, summaries and seeded ensembles
//!
//! The engine itself only keeps the current state. This module adds what a
//! caller needs to study a whole run: a per-step [`StormTrace`], a compact
//! [`RunSummary`], and [`run_ensemble`] for comparing many seeds at once.

mod ensemble;
mod summary;
mod trace;

pub use ensemble::run_ensemble;
pub use summary::{PhaseTally, RunSummary};
pub use trace::{StormTrace, TraceFrame};
