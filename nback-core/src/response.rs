use serde::{Deserialize, Serialize};
use std::fmt;

/// A response button; each one claims a match on its own channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Position,
    Audio,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Position => "position",
            Channel::Audio => "audio",
        })
    }
}

/// Per-channel match claims for the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockState {
    pub position: bool,
    pub audio: bool,
}

impl LockState {
    pub fn new(position: bool, audio: bool) -> Self {
        Self { position, audio }
    }

    pub fn is_locked(&self, channel: Channel) -> bool {
        match channel {
            Channel::Position => self.position,
            Channel::Audio => self.audio,
        }
    }

    /// Flips the claim on `channel` and returns the new value.
    pub fn toggle(&mut self, channel: Channel) -> bool {
        let lock = match channel {
            Channel::Position => &mut self.position,
            Channel::Audio => &mut self.audio,
        };
        *lock = !*lock;
        *lock
    }

    pub fn any(&self) -> bool {
        self.position || self.audio
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
