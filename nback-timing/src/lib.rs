mod manual;
mod timer;

pub use manual::ManualTimer;
pub use timer::{HighPrecisionTimer, Timer};

/// Nanoseconds in a millisecond.
pub const NANOS_PER_MS: u64 = 1_000_000;

pub fn ms_to_ns(ms: u64) -> u64 {
    ms.saturating_mul(NANOS_PER_MS)
}
