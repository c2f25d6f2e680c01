use anyhow::{Context, Result};
use clap::Args;
use nback_core::Modality;
use nback_engine::GameConfig;
use std::path::Path;

/// Game settings that can be set on the command line. Unset flags keep the
/// value from the config file, or the default.
#[derive(Debug, Clone, Default, Args)]
pub struct GameArgs {
    /// Number of rounds (10-20 is the usual range)
    #[arg(long)]
    pub rounds: Option<usize>,

    /// How many rounds back a match is checked (1-6 is the usual range)
    #[arg(long)]
    pub lag: Option<usize>,

    /// Round length in milliseconds, at least the 800ms display time
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// visual, audio or audio-visual
    #[arg(long)]
    pub modality: Option<Modality>,

    /// Share of rounds forced to match, in percent
    #[arg(long)]
    pub match_percentage: Option<u32>,
}

impl GameArgs {
    pub fn apply(&self, mut config: GameConfig) -> GameConfig {
        if let Some(rounds) = self.rounds {
            config.round_count = rounds;
        }
        if let Some(lag) = self.lag {
            config.lag = lag;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
        if let Some(modality) = self.modality {
            config.modality = modality;
        }
        if let Some(pct) = self.match_percentage {
            config.match_percentage = pct;
        }
        config
    }
}

/// Reads a TOML game config, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: GameConfig =
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(?config, path = %path.display(), "loaded config");
    Ok(config)
}

/// Config file plus flag overrides, validated.
pub fn resolve(path: Option<&Path>, args: &GameArgs) -> Result<GameConfig> {
    let config = args.apply(load_config(path)?);
    config.validate()?;
    Ok(config)
}
