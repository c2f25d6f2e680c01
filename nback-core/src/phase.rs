use serde::{Deserialize, Serialize};

/// Coarse lifecycle of one game.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Idle,
    LeadIn,
    Rounds,
    Outro,
    Finished,
}

impl GamePhase {
    pub fn next(&self) -> Option<Self> {
        use GamePhase::*;
        Some(match self {
            Idle => LeadIn,
            LeadIn => Rounds,
            Rounds => Outro,
            Outro => Finished,
            Finished => return None,
        })
    }

    /// True while a loop owns the session.
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::LeadIn | GamePhase::Rounds | GamePhase::Outro)
    }
}

/// Position inside a single round.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStage {
    /// Locks reset, stimulus published.
    Reveal,
    /// Stimulus visible for the display duration.
    Hold,
    /// Stimulus cleared, waiting out the interval.
    Remainder,
    /// Look-back comparison and scoring.
    Evaluate,
}

impl RoundStage {
    pub fn next(&self) -> Option<Self> {
        use RoundStage::*;
        Some(match self {
            Reveal => Hold,
            Hold => Remainder,
            Remainder => Evaluate,
            Evaluate => return None,
        })
    }
}
