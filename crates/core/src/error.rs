//! Error types for custom constant tables and bounded runs.
//!
//! The default storm never fails. These errors only surface when a caller
//! supplies its own [`StormConstants`](crate::StormConstants) or caps the
//! number of steps.

use crate::storm::Phase;
use thiserror::Error;

/// A constant table whose predicates could never be satisfied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstantsError {
    /// A NaN or infinite value.
    #[error("constant '{name}' must be finite, got {value}")]
    NonFinite {
        /// Field name in the constant table
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// A rate, gain, or threshold that must be strictly positive.
    #[error("constant '{name}' must be positive, got {value}")]
    NonPositive {
        /// Field name in the constant table
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// A value outside the interval its field is defined on.
    #[error("constant '{name}' must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        /// Field name in the constant table
        name: &'static str,
        /// Rejected value
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },

    /// Two fields that together make a transition unreachable.
    #[error("constant '{name}' ({value}) is unreachable given '{limit_name}' ({limit})")]
    Unreachable {
        /// Field holding the requirement
        name: &'static str,
        /// Required value
        value: f64,
        /// Field that caps the driving quantity
        limit_name: &'static str,
        /// Cap value
        limit: f64,
    },

    /// A goal whose driving rate would need too many steps to reach it.
    #[error("constant '{name}' needs about {steps:.0} steps to reach, more than {limit}")]
    Stalled {
        /// Field holding the requirement
        name: &'static str,
        /// Estimated steps, infinite when the rate is lost to rounding
        steps: f64,
        /// Largest step count allowed for one goal
        limit: f64,
    },
}

/// Failure of an engine run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StormError {
    /// The constant table was rejected at construction.
    #[error("invalid storm constants: {0}")]
    InvalidConstants(#[from] ConstantsError),

    /// The storm had not ended after the permitted number of steps.
    #[error("storm still in {phase} after {limit} steps")]
    StepLimitExceeded {
        /// Step budget that was exhausted
        limit: u64,
        /// Phase the engine was stuck in
        phase: Phase,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storm::SubStage;

    #[test]
    fn messages_name_the_offending_field() {
        let err = ConstantsError::NonPositive {
            name: "sound_speed",
            value: 0.0,
        };
        assert_eq!(err.to_string(), "constant 'sound_speed' must be positive, got 0");

        let wrapped = StormError::from(err.clone());
        assert_eq!(wrapped, StormError::InvalidConstants(err));
        assert!(wrapped.to_string().starts_with("invalid storm constants"));
    }

    #[test]
    fn stalled_goal_reports_its_estimate() {
        let err = ConstantsError::Stalled {
            name: "brew_wind_instability_threshold",
            steps: 5e12,
            limit: 1e6,
        };
        assert_eq!(
            err.to_string(),
            "constant 'brew_wind_instability_threshold' needs about 5000000000000 steps to reach, more than 1000000"
        );

        let err = ConstantsError::NonFinite {
            name: "full_turbulence_peak",
            value: f64::NAN,
        };
        assert_eq!(err.to_string(), "constant 'full_turbulence_peak' must be finite, got NaN");
    }

    #[test]
    fn step_limit_reports_phase() {
        let err = StormError::StepLimitExceeded {
            limit: 10,
            phase: Phase::FullStorm(SubStage::Chaos),
        };
        assert_eq!(err.to_string(), "storm still in full storm (chaos) after 10 steps");
    }
}
