use nback_core::{LockState, Stimulus, Verdict};
use nback_engine::SessionSummary;

const GRID_SIDE: u8 = 3;

/// Text rendering of the 3x3 grid with `lit` highlighted.
pub fn grid(lit: Option<u8>) -> String {
    let mut out = String::new();
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let cell = row * GRID_SIDE + col;
            out.push_str(if lit == Some(cell) { " ■" } else { " ·" });
        }
        out.push('\n');
    }
    out
}

pub fn stimulus(round: usize, total: usize, stimulus: &Stimulus) -> String {
    let mut out = format!("Round {}/{}\n", round + 1, total);
    if let Some(position) = stimulus.position() {
        out.push_str(&grid(Some(position)));
    }
    if let Some(letter) = stimulus.letter() {
        out.push_str(&format!("  Letter: {letter}\n"));
    }
    out
}

pub fn locks(locks: LockState) -> String {
    let mark = |on: bool| if on { "x" } else { " " };
    format!(
        "[{}] position  [{}] audio",
        mark(locks.position),
        mark(locks.audio)
    )
}

pub fn verdict(verdict: &Verdict, score: u32) -> String {
    if verdict.is_wrong {
        format!("  ✗ {:?} (score {score})", verdict.outcome)
    } else if verdict.score_delta > 0 {
        format!("  ✓ match (score {score})")
    } else {
        format!("  · (score {score})")
    }
}

pub fn summary(summary: &SessionSummary, high_score: u32) -> String {
    format!(
        "Score: {}  High score: {}\n\
         Rounds: {}, scored: {}\n\
         Hits {}, misses {}, false alarms {}, correct rejections {}\n\
         Accuracy: {:.1}%",
        summary.score,
        high_score,
        summary.rounds,
        summary.scorable,
        summary.hits,
        summary.misses,
        summary.false_alarms,
        summary.correct_rejections,
        summary.accuracy()
    )
}
