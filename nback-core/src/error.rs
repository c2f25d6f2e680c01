use thiserror::Error;

/// Errors raised by the trial engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NBackError {
    /// Round count, lag, interval, symbol range or match percentage rejected at start.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A symbol could not be mapped to a letter.
    #[error("symbol {0} is outside the letter range 0..=25")]
    OutOfRange(u32),
}

pub type NBackResult<T> = Result<T, NBackError>;
