use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Channel;

/// Which stimulus channels a game presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    #[default]
    Visual,
    Audio,
    AudioVisual,
}

impl Modality {
    pub fn uses(&self, channel: Channel) -> bool {
        match (self, channel) {
            (Modality::AudioVisual, _) => true,
            (Modality::Visual, Channel::Position) => true,
            (Modality::Audio, Channel::Audio) => true,
            _ => false,
        }
    }

    pub fn channels(&self) -> &'static [Channel] {
        match self {
            Modality::Visual => &[Channel::Position],
            Modality::Audio => &[Channel::Audio],
            Modality::AudioVisual => &[Channel::Position, Channel::Audio],
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Modality::Visual => "visual",
            Modality::Audio => "audio",
            Modality::AudioVisual => "audio-visual",
        })
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "visual" | "position" => Ok(Modality::Visual),
            "audio" | "letter" => Ok(Modality::Audio),
            "audio-visual" | "audiovisual" | "dual" => Ok(Modality::AudioVisual),
            other => Err(format!("unknown modality '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_follow_modality() {
        assert!(Modality::Visual.uses(Channel::Position));
        assert!(!Modality::Visual.uses(Channel::Audio));
        assert!(Modality::Audio.uses(Channel::Audio));
        assert_eq!(Modality::AudioVisual.channels().len(), 2);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("dual".parse::<Modality>(), Ok(Modality::AudioVisual));
        assert_eq!("Visual".parse::<Modality>(), Ok(Modality::Visual));
        assert!("smell".parse::<Modality>().is_err());
    }
}
