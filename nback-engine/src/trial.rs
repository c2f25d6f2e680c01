use nback_core::{RoundStage, Stimulus};
use nback_timing::ms_to_ns;

/// The round currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRound {
    pub index: usize,
    pub stimulus: Stimulus,
    pub durations: RoundDurations,
    /// Reveal time; deadlines are measured from here.
    pub start: u64,
    pub stage: RoundStage,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundDurations {
    pub display_ms: u64,
    pub interval_ms: u64,
}

impl ActiveRound {
    pub fn new(index: usize, stimulus: Stimulus, durations: RoundDurations, start: u64) -> Self {
        Self {
            index,
            stimulus,
            durations,
            start,
            stage: RoundStage::Reveal,
        }
    }

    /// When the stimulus is taken off screen.
    pub fn clear_at(&self) -> u64 {
        self.start + ms_to_ns(self.durations.display_ms)
    }

    /// When the round closes. An interval shorter than the display time leaves no
    /// remainder to wait out.
    pub fn end_at(&self) -> u64 {
        let total_ms = self.durations.interval_ms.max(self.durations.display_ms);
        self.start + ms_to_ns(total_ms)
    }

    /// Moves to the following stage and returns it; `None` once evaluated.
    pub fn advance(&mut self) -> Option<RoundStage> {
        let next = self.stage.next()?;
        self.stage = next;
        Some(next)
    }

    /// Next timed transition, if the current stage waits on one.
    pub fn deadline(&self) -> Option<u64> {
        match self.stage {
            RoundStage::Hold => Some(self.clear_at()),
            RoundStage::Remainder => Some(self.end_at()),
            RoundStage::Reveal | RoundStage::Evaluate => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(display_ms: u64, interval_ms: u64) -> ActiveRound {
        ActiveRound::new(
            0,
            Stimulus::Position(4),
            RoundDurations {
                display_ms,
                interval_ms,
            },
            1_000,
        )
    }

    #[test]
    fn deadlines_measure_from_round_start() {
        let r = round(800, 2000);
        assert_eq!(r.clear_at(), 1_000 + 800_000_000);
        assert_eq!(r.end_at(), 1_000 + 2_000_000_000);
    }

    #[test]
    fn short_interval_degenerates_to_zero_remainder() {
        let r = round(800, 500);
        assert_eq!(r.end_at(), r.clear_at());
    }

    #[test]
    fn deadline_follows_stage() {
        let mut r = round(800, 1500);
        assert_eq!(r.deadline(), None);
        assert_eq!(r.advance(), Some(RoundStage::Hold));
        assert_eq!(r.deadline(), Some(r.clear_at()));
        assert_eq!(r.advance(), Some(RoundStage::Remainder));
        assert_eq!(r.deadline(), Some(r.end_at()));
        assert_eq!(r.advance(), Some(RoundStage::Evaluate));
        assert_eq!(r.deadline(), None);
        assert_eq!(r.advance(), None);
        assert_eq!(r.stage, RoundStage::Evaluate);
    }
}
