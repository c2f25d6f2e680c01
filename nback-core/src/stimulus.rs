use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{NBackError, NBackResult};

/// Cells in the 3x3 position grid.
pub const GRID_CELLS: u32 = 9;
/// Letters available to the audio channel.
pub const LETTER_COUNT: u32 = 26;
/// Position signal while nothing is shown.
pub const BLANK_POSITION: i32 = -1;
/// Letter signal while nothing is spoken.
pub const BLANK_LETTER: char = ' ';

/// One presented symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stimulus {
    Position(u8),
    Letter(char),
    Pair { position: u8, letter: char },
}

impl Stimulus {
    pub fn position(&self) -> Option<u8> {
        match self {
            Stimulus::Position(p) | Stimulus::Pair { position: p, .. } => Some(*p),
            Stimulus::Letter(_) => None,
        }
    }

    pub fn letter(&self) -> Option<char> {
        match self {
            Stimulus::Letter(l) | Stimulus::Pair { letter: l, .. } => Some(*l),
            Stimulus::Position(_) => None,
        }
    }

    /// True when positions fall on the grid and letters in `A..=Z`.
    pub fn in_range(&self) -> bool {
        let position_ok = self.position().is_none_or(|p| u32::from(p) < GRID_CELLS);
        let letter_ok = self.letter().is_none_or(|l| l.is_ascii_uppercase());
        position_ok && letter_ok
    }
}

impl fmt::Display for Stimulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stimulus::Position(p) => write!(f, "{p}"),
            Stimulus::Letter(l) => write!(f, "{l}"),
            Stimulus::Pair { position, letter } => write!(f, "({position}, {letter})"),
        }
    }
}

/// Maps `0..=25` onto `A..=Z`.
pub fn letter_for(symbol: u32) -> NBackResult<char> {
    if symbol >= LETTER_COUNT {
        return Err(NBackError::OutOfRange(symbol));
    }
    Ok(char::from(b'A' + symbol as u8))
}
