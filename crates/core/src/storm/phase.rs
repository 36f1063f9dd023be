//! Phase tags and the rule table that dispatches on them.

use super::{brewing, full_storm, threshold, StepContext};
use crate::core_types::{StormConstants, WeatherState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered sub-stages of the full-intensity phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubStage {
    /// First rain burst and downdraft
    Impact,
    /// Sustained heavy rain
    Downpour,
    /// Lightning and turbulence ramp up
    Frenzy,
    /// Turbulence and particle density peak
    Chaos,
    /// Everything decays toward calm
    Silence,
}

impl SubStage {
    /// All sub-stages in run order.
    pub const ALL: [SubStage; 5] = [
        SubStage::Impact,
        SubStage::Downpour,
        SubStage::Frenzy,
        SubStage::Chaos,
        SubStage::Silence,
    ];

    /// The sub-stage after this one, or `None` after silence.
    pub fn next(self) -> Option<SubStage> {
        match self {
            SubStage::Impact => Some(SubStage::Downpour),
            SubStage::Downpour => Some(SubStage::Frenzy),
            SubStage::Frenzy => Some(SubStage::Chaos),
            SubStage::Chaos => Some(SubStage::Silence),
            SubStage::Silence => None,
        }
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            SubStage::Impact => "impact",
            SubStage::Downpour => "downpour",
            SubStage::Frenzy => "frenzy",
            SubStage::Chaos => "chaos",
            SubStage::Silence => "silence",
        }
    }
}

impl fmt::Display for SubStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Top-level storm phase.
///
/// The full-intensity phase carries its active sub-stage, so a sub-stage
/// exists exactly when the storm is at full intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// Formation: cooling, pressure drop, cloud build-up
    Brewing,
    /// Electrical buildup and approaching lightning
    Threshold,
    /// Full intensity, nested sub-stage machine
    FullStorm(SubStage),
    /// Terminal
    End,
}

impl Phase {
    /// Active sub-stage while at full intensity.
    pub fn sub_stage(self) -> Option<SubStage> {
        match self {
            Phase::FullStorm(stage) => Some(stage),
            _ => None,
        }
    }

    /// Position of the top-level phase in the lifecycle, 0 through 3.
    pub fn ordinal(self) -> u8 {
        match self {
            Phase::Brewing => 0,
            Phase::Threshold => 1,
            Phase::FullStorm(_) => 2,
            Phase::End => 3,
        }
    }

    /// Whether this phase ends the run.
    pub fn is_terminal(self) -> bool {
        self == Phase::End
    }

    /// The phase entered once this one's completion predicate holds.
    pub fn successor(self) -> Phase {
        match self {
            Phase::Brewing => Phase::Threshold,
            Phase::Threshold => Phase::FullStorm(SubStage::Impact),
            Phase::FullStorm(stage) => stage.next().map_or(Phase::End, Phase::FullStorm),
            Phase::End => Phase::End,
        }
    }

    /// Update and completion rule for this phase, `None` when terminal.
    pub(crate) fn rule(self) -> Option<&'static StageRule> {
        match self {
            Phase::Brewing => Some(&BREWING),
            Phase::Threshold => Some(&THRESHOLD),
            Phase::FullStorm(SubStage::Impact) => Some(&IMPACT),
            Phase::FullStorm(SubStage::Downpour) => Some(&DOWNPOUR),
            Phase::FullStorm(SubStage::Frenzy) => Some(&FRENZY),
            Phase::FullStorm(SubStage::Chaos) => Some(&CHAOS),
            Phase::FullStorm(SubStage::Silence) => Some(&SILENCE),
            Phase::End => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Brewing => f.write_str("brewing"),
            Phase::Threshold => f.write_str("threshold"),
            Phase::FullStorm(stage) => write!(f, "full storm ({stage})"),
            Phase::End => f.write_str("end"),
        }
    }
}

/// Per-step update paired with the predicate checked right after it.
pub(crate) struct StageRule {
    pub update: fn(&mut StepContext<'_>),
    pub is_complete: fn(&WeatherState, &StormConstants) -> bool,
}

static BREWING: StageRule = StageRule {
    update: brewing::update,
    is_complete: brewing::is_complete,
};

static THRESHOLD: StageRule = StageRule {
    update: threshold::update,
    is_complete: threshold::is_complete,
};

static IMPACT: StageRule = StageRule {
    update: full_storm::impact,
    is_complete: full_storm::impact_complete,
};

static DOWNPOUR: StageRule = StageRule {
    update: full_storm::downpour,
    is_complete: full_storm::downpour_complete,
};

static FRENZY: StageRule = StageRule {
    update: full_storm::frenzy,
    is_complete: full_storm::frenzy_complete,
};

static CHAOS: StageRule = StageRule {
    update: full_storm::chaos,
    is_complete: full_storm::chaos_complete,
};

static SILENCE: StageRule = StageRule {
    update: full_storm::silence,
    is_complete: full_storm::silence_complete,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successors_walk_the_lifecycle_in_order() {
        let mut phase = Phase::Brewing;
        let mut visited = vec![phase];
        while !phase.is_terminal() {
            phase = phase.successor();
            visited.push(phase);
        }
        assert_eq!(
            visited,
            vec![
                Phase::Brewing,
                Phase::Threshold,
                Phase::FullStorm(SubStage::Impact),
                Phase::FullStorm(SubStage::Downpour),
                Phase::FullStorm(SubStage::Frenzy),
                Phase::FullStorm(SubStage::Chaos),
                Phase::FullStorm(SubStage::Silence),
                Phase::End,
            ]
        );
        // Derived ordering agrees with run order
        assert!(visited.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn only_full_storm_has_sub_stage() {
        assert_eq!(Phase::Brewing.sub_stage(), None);
        assert_eq!(Phase::End.sub_stage(), None);
        assert_eq!(
            Phase::FullStorm(SubStage::Frenzy).sub_stage(),
            Some(SubStage::Frenzy)
        );
    }

    #[test]
    fn every_live_phase_has_a_rule() {
        assert!(Phase::End.rule().is_none());
        assert!(Phase::Brewing.rule().is_some());
        assert!(Phase::Threshold.rule().is_some());
        for stage in SubStage::ALL {
            assert!(Phase::FullStorm(stage).rule().is_some(), "{stage}");
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(Phase::Threshold.to_string(), "threshold");
        assert_eq!(Phase::FullStorm(SubStage::Silence).to_string(), "full storm (silence)");
        assert_eq!(Phase::FullStorm(SubStage::Impact).ordinal(), 2);
    }
}
