use nback_core::{
    Channel, GamePhase, Modality, NBackError, NBackResult, RoundResult, RoundStage, Stimulus,
};
use nback_timing::{Timer, ms_to_ns};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::evaluator::evaluate;
use crate::event::EngineEvent;
use crate::sequence::build_sequence;
use crate::state::SessionState;
use crate::summary::SessionSummary;
use crate::trial::{ActiveRound, RoundDurations};

/// Timer-driven N-back game loop.
///
/// The engine never sleeps itself: callers poll [`TrialEngine::update`], which
/// performs every transition that is due by the timer's current time. Deadlines
/// chain from the previous deadline rather than from the poll time, so a late
/// poll catches up without drifting the schedule.
pub struct TrialEngine<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub config: GameConfig,
    timer: T,
    rng: R,
    state: SessionState,
    sequence: Vec<Stimulus>,
    current: Option<ActiveRound>,
    /// Start of the lead-in or outro pause.
    pause_start_ns: u64,
    results: Vec<RoundResult>,
    events: Vec<EngineEvent>,
}

impl<T, R> TrialEngine<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub fn new(config: GameConfig, timer: T, rng: R) -> Self {
        let state = SessionState::new(config.modality, 0);
        Self {
            config,
            timer,
            rng,
            state,
            sequence: Vec::new(),
            current: None,
            pause_start_ns: 0,
            results: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.set_high_score(high_score);
        self
    }

    pub fn set_high_score(&mut self, high_score: u32) {
        self.state.high_score = high_score;
    }

    /// Selects the modality for the next game. Ignored while a game runs.
    pub fn configure(&mut self, modality: Modality) -> bool {
        if self.is_running() {
            warn!(%modality, "modality change ignored while a game is running");
            return false;
        }
        self.config.modality = modality;
        self.state.modality = modality;
        true
    }

    /// Stops any running game, then generates a fresh sequence and starts a new one.
    pub fn start(&mut self, round_count: usize, lag: usize, interval_ms: u64) -> NBackResult<()> {
        self.stop();
        let config = self
            .config
            .clone()
            .with_rounds(round_count, lag, interval_ms);
        config.validate()?;
        let sequence = build_sequence(&mut self.rng, &config)?;
        debug!(?sequence, "generated sequence");
        self.config = config;
        self.begin(sequence);
        Ok(())
    }

    /// Starts a game over a caller-supplied sequence, e.g. to replay a session.
    pub fn start_with_sequence(
        &mut self,
        sequence: Vec<Stimulus>,
        lag: usize,
        interval_ms: u64,
    ) -> NBackResult<()> {
        self.stop();
        let config = self
            .config
            .clone()
            .with_rounds(sequence.len(), lag, interval_ms);
        config.validate()?;
        if let Some(bad) = sequence.iter().find(|s| !fits(s, config.modality)) {
            return Err(NBackError::InvalidConfiguration(format!(
                "stimulus {bad} is not valid in a {} game",
                config.modality
            )));
        }
        self.config = config;
        self.begin(sequence);
        Ok(())
    }

    fn begin(&mut self, sequence: Vec<Stimulus>) {
        let now = self.timer.now();
        self.state = SessionState {
            phase: GamePhase::LeadIn,
            round_count: sequence.len(),
            lag: self.config.lag,
            look_back_index: -(self.config.lag as i64),
            started: true,
            ..SessionState::new(self.config.modality, self.state.high_score)
        };
        self.sequence = sequence;
        self.current = None;
        self.results.clear();
        self.pause_start_ns = now;

        info!(
            rounds = self.config.round_count,
            lag = self.config.lag,
            interval_ms = self.config.interval_ms,
            modality = %self.config.modality,
            "game started"
        );
        self.events.push(EngineEvent::Started {
            round_count: self.config.round_count,
            lag: self.config.lag,
            modality: self.config.modality,
        });
    }

    /// Halts the running game without finishing it.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state.phase = GamePhase::Idle;
        self.state.stage = None;
        self.state.current = None;
        self.state.started = false;
        self.current = None;
        info!(round = self.state.round_index, "game stopped");
        self.events.push(EngineEvent::Stopped);
    }

    /// Restores the initial state; keeps the modality and known high score.
    /// Refused while a game runs.
    pub fn reset(&mut self) -> bool {
        if self.is_running() {
            warn!("reset ignored while a game is running");
            return false;
        }
        self.state = SessionState::new(self.config.modality, self.state.high_score);
        self.sequence.clear();
        self.results.clear();
        self.current = None;
        self.events.push(EngineEvent::Reset);
        true
    }

    /// Flips the claim on `channel`. Takes effect at the next evaluation.
    /// Channels the modality does not use are ignored and stay released.
    pub fn toggle_lock(&mut self, channel: Channel) -> bool {
        if !self.config.modality.uses(channel) {
            debug!(%channel, modality = %self.config.modality, "lock on unused channel ignored");
            return false;
        }
        let locked = self.state.locks.toggle(channel);
        debug!(%channel, locked, round = self.state.round_index, "lock toggled");
        self.events.push(EngineEvent::LockToggled { channel, locked });
        locked
    }

    /// Called by the presentation layer once the wrong flash has been shown.
    pub fn clear_wrong(&mut self) {
        self.state.wrong = false;
    }

    /// Performs every transition due by now and returns the resulting events.
    pub fn update(&mut self) -> Vec<EngineEvent> {
        let now = self.timer.now();
        while self.step(now) {}
        std::mem::take(&mut self.events)
    }

    /// Events produced by calls other than `update`.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Timestamp of the next scheduled transition.
    pub fn next_deadline(&self) -> Option<u64> {
        match self.state.phase {
            GamePhase::LeadIn => Some(self.pause_start_ns + ms_to_ns(self.config.lead_in_ms)),
            GamePhase::Rounds => self.current.as_ref().and_then(ActiveRound::deadline),
            GamePhase::Outro => Some(self.pause_start_ns + ms_to_ns(self.config.outro_ms)),
            GamePhase::Idle | GamePhase::Finished => None,
        }
    }

    fn step(&mut self, now: u64) -> bool {
        let Some(due) = self.next_deadline() else {
            return false;
        };
        if now < due {
            return false;
        }
        match self.state.phase {
            GamePhase::LeadIn => {
                self.advance_phase();
                self.reveal(0, due);
            }
            GamePhase::Rounds => match self.current.as_ref().map(|r| r.stage) {
                Some(RoundStage::Hold) => self.clear_stimulus(),
                Some(RoundStage::Remainder) => self.close_round(due),
                _ => return false,
            },
            GamePhase::Outro => self.finish(),
            GamePhase::Idle | GamePhase::Finished => return false,
        }
        true
    }

    fn advance_phase(&mut self) {
        if let Some(next) = self.state.phase.next() {
            self.state.phase = next;
        }
    }

    fn reveal(&mut self, index: usize, at: u64) {
        let stimulus = self.sequence[index];
        self.state.locks.clear();
        self.state.current = Some(stimulus);

        let mut round = ActiveRound::new(
            index,
            stimulus,
            RoundDurations {
                display_ms: self.config.display_ms,
                interval_ms: self.config.interval_ms,
            },
            at,
        );
        self.state.stage = round.advance();
        self.current = Some(round);

        debug!(round = index, %stimulus, "stimulus shown");
        self.events.push(EngineEvent::StimulusShown {
            round: index,
            stimulus,
        });
    }

    fn clear_stimulus(&mut self) {
        let Some(round) = self.current.as_mut() else {
            return;
        };
        self.state.stage = round.advance();
        self.state.current = None;
        self.events
            .push(EngineEvent::StimulusCleared { round: round.index });
    }

    fn close_round(&mut self, at: u64) {
        let Some(mut round) = self.current.take() else {
            return;
        };
        self.state.stage = round.advance();

        let locks = self.state.locks;
        let mut compared_with = None;
        let mut verdict = None;
        if self.state.is_scorable() {
            let previous = self.sequence[self.state.look_back_index as usize];
            let v = evaluate(&round.stimulus, &previous, locks);
            self.state.previous = Some(previous);
            self.state.score += v.score_delta;
            if v.is_wrong {
                self.state.wrong = true;
            }
            debug!(round = round.index, ?v, score = self.state.score, "round scored");
            self.events.push(EngineEvent::RoundScored {
                round: round.index,
                previous,
                verdict: v,
                score: self.state.score,
            });
            compared_with = Some(previous);
            verdict = Some(v);
        }

        self.results.push(RoundResult {
            round: round.index,
            stimulus: round.stimulus,
            compared_with,
            locks,
            verdict,
            timestamp_ns: at,
        });
        self.state.look_back_index += 1;
        self.state.round_index += 1;
        self.events
            .push(EngineEvent::RoundComplete { round: round.index });

        let next = round.index + 1;
        if next < self.sequence.len() {
            self.reveal(next, at);
        } else {
            self.enter_outro(at);
        }
    }

    fn enter_outro(&mut self, at: u64) {
        self.advance_phase();
        self.state.stage = None;
        self.pause_start_ns = at;
        if self.state.score > self.state.high_score {
            info!(
                score = self.state.score,
                previous = self.state.high_score,
                "new high score"
            );
            self.state.high_score = self.state.score;
            self.events.push(EngineEvent::NewHighScore {
                score: self.state.score,
            });
        }
    }

    fn finish(&mut self) {
        self.state.started = false;
        self.advance_phase();
        self.state.finished = true;
        let summary = self.summary();
        info!(
            score = self.state.score,
            high_score = self.state.high_score,
            accuracy = summary.accuracy(),
            "game finished"
        );
        self.events.push(EngineEvent::Finished {
            score: self.state.score,
            high_score: self.state.high_score,
        });
    }

    pub fn is_running(&self) -> bool {
        self.state.phase.is_running()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn sequence(&self) -> &[Stimulus] {
        &self.sequence
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_results(&self.results)
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn current_round(&self) -> Option<&ActiveRound> {
        self.current.as_ref()
    }
}

fn fits(stimulus: &Stimulus, modality: Modality) -> bool {
    let variant_ok = matches!(
        (stimulus, modality),
        (Stimulus::Position(_), Modality::Visual)
            | (Stimulus::Letter(_), Modality::Audio)
            | (Stimulus::Pair { .. }, Modality::AudioVisual)
    );
    variant_ok && stimulus.in_range()
}
