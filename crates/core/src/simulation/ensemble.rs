//! Parallel runs over many seeds.

use super::RunSummary;
use crate::core_types::StormConstants;
use crate::error::ConstantsError;
use crate::storm::StormEngine;
use rayon::prelude::*;
use tracing::info;

/// Run one storm per seed and summarize each.
///
/// Runs share nothing but the constant table, so they execute in parallel.
/// Summaries come back in the same order as `seeds`.
///
/// # Errors
///
/// Returns [`ConstantsError`] if `constants` fails validation; no run is
/// started in that case.
pub fn run_ensemble(
    constants: &StormConstants,
    seeds: &[u64],
) -> Result<Vec<RunSummary>, ConstantsError> {
    constants.validate()?;
    info!("Running storm ensemble over {} seeds", seeds.len());

    seeds
        .par_iter()
        .map(|&seed| -> Result<RunSummary, ConstantsError> {
            let mut engine = StormEngine::with_constants(constants.clone(), seed)?;
            let trace = engine.run_traced();
            Ok(RunSummary::from_trace(seed, &trace))
        })
        .collect()
}
