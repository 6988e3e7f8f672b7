use serde::{Deserialize, Serialize};
use std::fmt;

/// Visible processing stage of a submission.
///
/// Ordering follows declaration order, so `Stage::Parsing < Stage::BuildingScorecards`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Parsing,
    ExtractingSkills,
    Evaluating,
    BuildingScorecards,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Parsing,
        Stage::ExtractingSkills,
        Stage::Evaluating,
        Stage::BuildingScorecards,
    ];

    /// 1-based position in the sequence
    pub fn position(self) -> usize {
        self as usize + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Parsing => "Parsing Resume",
            Stage::ExtractingSkills => "Extracting Skills",
            Stage::Evaluating => "Evaluating Role Alignment",
            Stage::BuildingScorecards => "Building Scorecards",
        }
    }

    pub fn next(self) -> Option<Stage> {
        Stage::ALL.get(self.position()).copied()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
