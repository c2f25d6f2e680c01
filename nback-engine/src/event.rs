use nback_core::{Channel, Modality, Stimulus, Verdict};
use serde::Serialize;

/// State transitions, in the order the engine made them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EngineEvent {
    Started {
        round_count: usize,
        lag: usize,
        modality: Modality,
    },
    StimulusShown {
        round: usize,
        stimulus: Stimulus,
    },
    StimulusCleared {
        round: usize,
    },
    LockToggled {
        channel: Channel,
        locked: bool,
    },
    RoundScored {
        round: usize,
        previous: Stimulus,
        verdict: Verdict,
        score: u32,
    },
    RoundComplete {
        round: usize,
    },
    /// The persist collaborator should store `score`.
    NewHighScore {
        score: u32,
    },
    Finished {
        score: u32,
        high_score: u32,
    },
    Stopped,
    Reset,
}

impl EngineEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineEvent::Finished { .. } | EngineEvent::Stopped)
    }
}
