use serde::{Deserialize, Serialize};

use crate::{LockState, Stimulus};

/// Signal-detection class of a scored round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Hit,
    Miss,
    FalseAlarm,
    CorrectRejection,
}

/// Result of comparing a round against its look-back stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub score_delta: u32,
    pub is_wrong: bool,
    pub outcome: Outcome,
}

impl Verdict {
    pub fn hit() -> Self {
        Self {
            score_delta: 1,
            is_wrong: false,
            outcome: Outcome::Hit,
        }
    }

    pub fn silent() -> Self {
        Self {
            score_delta: 0,
            is_wrong: false,
            outcome: Outcome::CorrectRejection,
        }
    }

    /// Wrong verdict. `claimed` marks a lock held on a channel that did not
    /// match, which makes it a false alarm; otherwise the match was missed.
    pub fn wrong(claimed: bool) -> Self {
        Self {
            score_delta: 0,
            is_wrong: true,
            outcome: if claimed {
                Outcome::FalseAlarm
            } else {
                Outcome::Miss
            },
        }
    }
}

/// Recorded result per round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: usize,
    pub stimulus: Stimulus,
    pub compared_with: Option<Stimulus>,
    pub locks: LockState,
    pub verdict: Option<Verdict>,
    pub timestamp_ns: u64,
}
