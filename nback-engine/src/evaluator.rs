//! Scoring of one round against the stimulus `lag` rounds back.

use nback_core::{LockState, Stimulus, Verdict};

/// Decides the verdict for `current` compared with `previous` under `locks`.
///
/// Single-channel stimuli read only their own lock. Pairs get one verdict for
/// the round: a partial match only scores when the lock of the other channel is
/// released, so claiming both channels every round never pays.
pub fn evaluate(current: &Stimulus, previous: &Stimulus, locks: LockState) -> Verdict {
    match (current, previous) {
        (Stimulus::Position(a), Stimulus::Position(b)) => single(a == b, locks.position),
        (Stimulus::Letter(a), Stimulus::Letter(b)) => single(a == b, locks.audio),
        (
            Stimulus::Pair {
                position: p1,
                letter: l1,
            },
            Stimulus::Pair {
                position: p2,
                letter: l2,
            },
        ) => combined(p1 == p2, l1 == l2, locks),
        // Mixed variants never come out of one sequence; nothing can match.
        _ => single(false, locks.any()),
    }
}

fn single(matched: bool, claimed: bool) -> Verdict {
    match (matched, claimed) {
        (true, true) => Verdict::hit(),
        (false, false) => Verdict::silent(),
        _ => Verdict::wrong(claimed),
    }
}

fn combined(position_match: bool, letter_match: bool, locks: LockState) -> Verdict {
    let false_claim = (locks.position && !position_match) || (locks.audio && !letter_match);
    let credited = match (position_match, letter_match) {
        (true, true) => locks.position && locks.audio,
        (true, false) => locks.position && !locks.audio,
        (false, true) => locks.audio && !locks.position,
        (false, false) => {
            return if locks.any() {
                Verdict::wrong(false_claim)
            } else {
                Verdict::silent()
            };
        }
    };
    if credited {
        Verdict::hit()
    } else {
        Verdict::wrong(false_claim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nback_core::Outcome;

    fn pos(p: u8) -> Stimulus {
        Stimulus::Position(p)
    }

    fn pair(position: u8, letter: char) -> Stimulus {
        Stimulus::Pair { position, letter }
    }

    fn locks(position: bool, audio: bool) -> LockState {
        LockState::new(position, audio)
    }

    fn delta_wrong(v: Verdict) -> (u32, bool) {
        (v.score_delta, v.is_wrong)
    }

    #[test]
    fn single_channel_table() {
        let on = locks(true, false);
        let off = locks(false, false);
        assert_eq!(delta_wrong(evaluate(&pos(5), &pos(5), on)), (1, false));
        assert_eq!(delta_wrong(evaluate(&pos(5), &pos(5), off)), (0, true));
        assert_eq!(delta_wrong(evaluate(&pos(5), &pos(3), on)), (0, true));
        assert_eq!(delta_wrong(evaluate(&pos(5), &pos(3), off)), (0, false));
    }

    #[test]
    fn single_channel_outcomes() {
        assert_eq!(
            evaluate(&pos(5), &pos(5), locks(true, false)).outcome,
            Outcome::Hit
        );
        assert_eq!(
            evaluate(&pos(5), &pos(5), locks(false, false)).outcome,
            Outcome::Miss
        );
        assert_eq!(
            evaluate(&pos(5), &pos(3), locks(true, false)).outcome,
            Outcome::FalseAlarm
        );
        assert_eq!(
            evaluate(&pos(5), &pos(3), locks(false, false)).outcome,
            Outcome::CorrectRejection
        );
    }

    #[test]
    fn letters_read_the_audio_lock() {
        let a = Stimulus::Letter('A');
        assert_eq!(delta_wrong(evaluate(&a, &a, locks(false, true))), (1, false));
        // The position button does not claim a letter match.
        assert_eq!(delta_wrong(evaluate(&a, &a, locks(true, false))), (0, true));
        let b = Stimulus::Letter('B');
        assert_eq!(delta_wrong(evaluate(&a, &b, locks(true, false))), (0, false));
    }

    #[test]
    fn combined_both_channels_match() {
        let s = pair(5, 'A');
        assert_eq!(delta_wrong(evaluate(&s, &s, locks(true, true))), (1, false));
        assert_eq!(delta_wrong(evaluate(&s, &s, locks(true, false))), (0, true));
        assert_eq!(delta_wrong(evaluate(&s, &s, locks(false, true))), (0, true));
        assert_eq!(delta_wrong(evaluate(&s, &s, locks(false, false))), (0, true));
    }

    #[test]
    fn combined_position_only_match() {
        let (cur, prev) = (pair(5, 'A'), pair(5, 'B'));
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(true, false))),
            (1, false)
        );
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(true, true))),
            (0, true)
        );
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(false, true))),
            (0, true)
        );
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(false, false))),
            (0, true)
        );
    }

    #[test]
    fn combined_letter_only_match() {
        let (cur, prev) = (pair(5, 'A'), pair(2, 'A'));
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(false, true))),
            (1, false)
        );
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(true, true))),
            (0, true)
        );
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(true, false))),
            (0, true)
        );
    }

    #[test]
    fn combined_no_match() {
        let (cur, prev) = (pair(5, 'A'), pair(2, 'B'));
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(false, false))),
            (0, false)
        );
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(true, false))),
            (0, true)
        );
        assert_eq!(
            delta_wrong(evaluate(&cur, &prev, locks(false, true))),
            (0, true)
        );
    }

    #[test]
    fn unused_lock_leaves_a_missed_letter_a_miss() {
        let a = Stimulus::Letter('A');
        assert_eq!(evaluate(&a, &a, locks(true, false)).outcome, Outcome::Miss);
    }

    #[test]
    fn combined_outcomes_follow_the_claimed_channels() {
        let s = pair(5, 'A');
        // Both matched, one claimed: the other match was missed.
        assert_eq!(evaluate(&s, &s, locks(true, false)).outcome, Outcome::Miss);
        assert_eq!(evaluate(&s, &s, locks(false, true)).outcome, Outcome::Miss);

        let (cur, prev) = (pair(5, 'A'), pair(5, 'B'));
        assert_eq!(
            evaluate(&cur, &prev, locks(true, true)).outcome,
            Outcome::FalseAlarm
        );
        assert_eq!(
            evaluate(&cur, &prev, locks(false, true)).outcome,
            Outcome::FalseAlarm
        );
        assert_eq!(
            evaluate(&cur, &prev, locks(false, false)).outcome,
            Outcome::Miss
        );

        let (cur, prev) = (pair(5, 'A'), pair(2, 'B'));
        assert_eq!(
            evaluate(&cur, &prev, locks(false, true)).outcome,
            Outcome::FalseAlarm
        );
    }

    #[test]
    fn evaluation_is_pure() {
        let (cur, prev) = (pair(1, 'C'), pair(1, 'D'));
        let l = locks(true, false);
        let first = evaluate(&cur, &prev, l);
        for _ in 0..10 {
            assert_eq!(evaluate(&cur, &prev, l), first);
        }
    }
}
