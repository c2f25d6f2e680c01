use nback_core::{
    BLANK_LETTER, BLANK_POSITION, GamePhase, LockState, Modality, RoundStage, Stimulus,
};
use serde::Serialize;

/// Everything a presentation layer reads. Only the engine writes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub modality: Modality,
    pub phase: GamePhase,
    pub stage: Option<RoundStage>,
    /// Stimulus on screen, `None` between reveals.
    pub current: Option<Stimulus>,
    /// Stimulus the last scored round was compared with.
    pub previous: Option<Stimulus>,
    /// Rounds completed so far.
    pub round_index: usize,
    /// Look-back index of the round in progress (`round - lag`); negative until
    /// enough history exists.
    pub look_back_index: i64,
    pub round_count: usize,
    pub lag: usize,
    pub score: u32,
    pub high_score: u32,
    pub started: bool,
    pub finished: bool,
    pub wrong: bool,
    pub locks: LockState,
}

impl SessionState {
    pub fn new(modality: Modality, high_score: u32) -> Self {
        Self {
            modality,
            phase: GamePhase::Idle,
            stage: None,
            current: None,
            previous: None,
            round_index: 0,
            look_back_index: -1,
            round_count: 0,
            lag: 0,
            score: 0,
            high_score,
            started: false,
            finished: false,
            wrong: false,
            locks: LockState::default(),
        }
    }

    pub fn is_scorable(&self) -> bool {
        self.look_back_index >= 0
    }

    /// Grid cell to light up, or `-1`.
    pub fn position_signal(&self) -> i32 {
        position_of(self.current.as_ref())
    }

    /// Letter to speak, or `' '`.
    pub fn letter_signal(&self) -> char {
        letter_of(self.current.as_ref())
    }

    pub fn previous_position_signal(&self) -> i32 {
        position_of(self.previous.as_ref())
    }

    pub fn previous_letter_signal(&self) -> char {
        letter_of(self.previous.as_ref())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Modality::default(), 0)
    }
}

fn position_of(stimulus: Option<&Stimulus>) -> i32 {
    stimulus
        .and_then(Stimulus::position)
        .map_or(BLANK_POSITION, i32::from)
}

fn letter_of(stimulus: Option<&Stimulus>) -> char {
    stimulus.and_then(Stimulus::letter).unwrap_or(BLANK_LETTER)
}
