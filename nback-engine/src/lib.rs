pub mod config;
pub mod engine;
pub mod evaluator;
pub mod event;
pub mod runner;
pub mod sequence;
pub mod state;
pub mod store;
pub mod summary;
pub mod trial;

pub use config::GameConfig;
pub use engine::TrialEngine;
pub use evaluator::evaluate;
pub use event::EngineEvent;
pub use runner::GameRunner;
pub use sequence::{SequencePlan, build_sequence, generate, plan};
pub use state::SessionState;
pub use store::{HighScoreStore, JsonHighScoreStore, MemoryHighScoreStore};
pub use summary::{SessionSummary, export_results};
pub use trial::{ActiveRound, RoundDurations};
