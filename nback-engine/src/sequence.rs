//! Stimulus sequences with a controlled share of N-back matches.
//!
//! A sequence is built left to right. Indices picked as forced matches copy the
//! symbol `lag` steps back; every other index past the first `lag` draws from the
//! remaining symbols so chance collisions do not inflate the match rate.

use nback_core::{Modality, NBackError, NBackResult, Stimulus, letter_for};
use rand::Rng;
use rand::seq::index;

use crate::GameConfig;

/// A generated integer sequence and the indices that were forced to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePlan {
    pub symbols: Vec<u32>,
    /// Sorted forced-match indices, all `>= lag`.
    pub forced: Vec<usize>,
}

impl SequencePlan {
    /// Indices whose symbol equals the one `lag` steps back.
    pub fn realized_matches(&self, lag: usize) -> usize {
        (lag..self.symbols.len())
            .filter(|&i| self.symbols[i] == self.symbols[i - lag])
            .count()
    }
}

/// Number of forced matches for a sequence: `round(length * pct / 100)` capped at
/// the scorable rounds.
pub fn target_matches(length: usize, match_percentage: u32, lag: usize) -> usize {
    let wanted = (length * match_percentage as usize + 50) / 100;
    wanted.min(length.saturating_sub(lag))
}

pub fn plan<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    symbol_range: u32,
    match_percentage: u32,
    lag: usize,
) -> NBackResult<SequencePlan> {
    if lag == 0 || length <= lag {
        return Err(NBackError::InvalidConfiguration(format!(
            "sequence length {length} must exceed lag {lag} (lag >= 1)"
        )));
    }
    if symbol_range == 0 {
        return Err(NBackError::InvalidConfiguration(
            "symbol range must be positive".into(),
        ));
    }
    if match_percentage > 100 {
        return Err(NBackError::InvalidConfiguration(format!(
            "match percentage {match_percentage} exceeds 100"
        )));
    }

    let target = target_matches(length, match_percentage, lag);
    let mut forced: Vec<usize> = index::sample(rng, length - lag, target)
        .into_iter()
        .map(|i| i + lag)
        .collect();
    forced.sort_unstable();

    let mut is_forced = vec![false; length];
    for &i in &forced {
        is_forced[i] = true;
    }

    let mut symbols = Vec::with_capacity(length);
    for i in 0..length {
        let symbol = if is_forced[i] {
            symbols[i - lag]
        } else if i >= lag {
            draw_excluding(rng, symbol_range, symbols[i - lag])
        } else {
            rng.random_range(0..symbol_range)
        };
        symbols.push(symbol);
    }

    Ok(SequencePlan { symbols, forced })
}

/// Integer sequence of `length` symbols in `[0, symbol_range)`.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    symbol_range: u32,
    match_percentage: u32,
    lag: usize,
) -> NBackResult<Vec<u32>> {
    plan(rng, length, symbol_range, match_percentage, lag).map(|p| p.symbols)
}

/// Uniform over `[0, range)` minus `excluded`. A single-symbol range has nothing
/// else to offer and returns it.
fn draw_excluding<R: Rng + ?Sized>(rng: &mut R, range: u32, excluded: u32) -> u32 {
    if range == 1 {
        return 0;
    }
    let s = rng.random_range(0..range - 1);
    if s >= excluded { s + 1 } else { s }
}

pub fn to_letters(symbols: &[u32]) -> NBackResult<Vec<char>> {
    symbols.iter().map(|&s| letter_for(s)).collect()
}

/// Builds the stimulus sequence for `config.modality`. Combined mode draws the
/// position and letter channels independently.
pub fn build_sequence<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GameConfig,
) -> NBackResult<Vec<Stimulus>> {
    fn draw<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> NBackResult<Vec<u32>> {
        generate(
            rng,
            config.round_count,
            config.symbol_range,
            config.match_percentage,
            config.lag,
        )
    }

    let sequence = match config.modality {
        Modality::Visual => draw(rng, config)?
            .into_iter()
            .map(|p| Stimulus::Position(p as u8))
            .collect(),
        Modality::Audio => to_letters(&draw(rng, config)?)?
            .into_iter()
            .map(Stimulus::Letter)
            .collect(),
        Modality::AudioVisual => {
            let positions = draw(rng, config)?;
            let letters = to_letters(&draw(rng, config)?)?;
            positions
                .into_iter()
                .zip(letters)
                .map(|(p, letter)| Stimulus::Pair {
                    position: p as u8,
                    letter,
                })
                .collect()
        }
    };
    Ok(sequence)
}
