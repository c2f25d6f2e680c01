use nback_core::{Channel, GRID_CELLS, Modality, NBackError, NBackResult};
use serde::{Deserialize, Serialize};

/// Settings for one game. Missing keys in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub round_count: usize,
    pub lag: usize,
    /// Length of one round, measured from the reveal.
    pub interval_ms: u64,
    pub modality: Modality,
    /// How long a stimulus stays visible.
    pub display_ms: u64,
    pub symbol_range: u32,
    pub match_percentage: u32,
    /// Pause between start and the first reveal.
    pub lead_in_ms: u64,
    /// Pause between the last round and the finished flag.
    pub outro_ms: u64,
    /// How long the presentation layer shows a wrong flash.
    pub feedback_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_count: 10,
            lag: 1,
            interval_ms: 2000,
            modality: Modality::Visual,
            display_ms: 800,
            symbol_range: GRID_CELLS,
            match_percentage: 30,
            lead_in_ms: 1000,
            outro_ms: 800,
            feedback_ms: 500,
        }
    }
}

impl GameConfig {
    pub fn with_rounds(mut self, round_count: usize, lag: usize, interval_ms: u64) -> Self {
        self.round_count = round_count;
        self.lag = lag;
        self.interval_ms = interval_ms;
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn validate(&self) -> NBackResult<()> {
        let invalid = |msg: String| Err(NBackError::InvalidConfiguration(msg));
        if self.round_count < 2 {
            return invalid(format!("round count must be > 1, got {}", self.round_count));
        }
        if self.lag == 0 {
            return invalid("lag must be at least 1".into());
        }
        if self.lag >= self.round_count {
            return invalid(format!(
                "lag {} must be smaller than round count {}",
                self.lag, self.round_count
            ));
        }
        if self.interval_ms < self.display_ms {
            return invalid(format!(
                "interval {}ms is shorter than the {}ms display time",
                self.interval_ms, self.display_ms
            ));
        }
        if self.symbol_range == 0 {
            return invalid("symbol range must be positive".into());
        }
        if self.modality.uses(Channel::Position) && self.symbol_range > GRID_CELLS {
            return invalid(format!(
                "symbol range {} does not fit the {GRID_CELLS}-cell grid",
                self.symbol_range
            ));
        }
        if self.match_percentage > 100 {
            return invalid(format!(
                "match percentage {} exceeds 100",
                self.match_percentage
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_invalid(config: GameConfig) {
        assert!(matches!(
            config.validate(),
            Err(NBackError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_round_settings() {
        expect_invalid(GameConfig::default().with_rounds(1, 1, 2000));
        expect_invalid(GameConfig::default().with_rounds(10, 0, 2000));
        expect_invalid(GameConfig::default().with_rounds(5, 5, 2000));
        expect_invalid(GameConfig::default().with_rounds(10, 2, 799));
    }

    #[test]
    fn rejects_bad_generator_settings() {
        expect_invalid(GameConfig {
            match_percentage: 101,
            ..GameConfig::default()
        });
        expect_invalid(GameConfig {
            symbol_range: 0,
            ..GameConfig::default()
        });
        expect_invalid(GameConfig {
            symbol_range: 12,
            ..GameConfig::default()
        });
    }

    #[test]
    fn audio_allows_wider_symbol_range() {
        let config = GameConfig {
            symbol_range: 20,
            ..GameConfig::default().with_modality(Modality::Audio)
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn interval_equal_to_display_is_valid() {
        let config = GameConfig::default().with_rounds(10, 1, 800);
        assert!(config.validate().is_ok());
    }
}
