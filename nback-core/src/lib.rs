pub mod error;
pub mod modality;
pub mod phase;
pub mod response;
pub mod stimulus;
pub mod trial;

pub use error::{NBackError, NBackResult};
pub use modality::Modality;
pub use phase::{GamePhase, RoundStage};
pub use response::{Channel, LockState};
pub use stimulus::{BLANK_LETTER, BLANK_POSITION, GRID_CELLS, LETTER_COUNT, Stimulus, letter_for};
pub use trial::{Outcome, RoundResult, Verdict};
