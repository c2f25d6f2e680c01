//! Plays a whole game on a virtual clock with a scripted responder.

use anyhow::Result;
use nback_core::{Channel, RoundResult, Stimulus};
use nback_engine::{EngineEvent, GameConfig, HighScoreStore, SessionSummary, TrialEngine};
use nback_timing::ManualTimer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub config: GameConfig,
    pub seed: u64,
    pub accuracy_target: f64,
    pub score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
    pub summary: SessionSummary,
    pub accuracy: f64,
    #[serde(skip)]
    pub rounds: Vec<RoundResult>,
}

/// Answers each round correctly with probability `accuracy`, per channel.
struct Responder {
    accuracy: f64,
    rng: StdRng,
}

impl Responder {
    fn claims(&mut self, current: &Stimulus, back: &Stimulus, channel: Channel) -> bool {
        let truth = match channel {
            Channel::Position => {
                current.position().is_some() && current.position() == back.position()
            }
            Channel::Audio => current.letter().is_some() && current.letter() == back.letter(),
        };
        if self.rng.random_bool(self.accuracy) {
            truth
        } else {
            !truth
        }
    }
}

pub fn run(
    config: &GameConfig,
    accuracy: f64,
    seed: u64,
    store: &mut dyn HighScoreStore,
) -> Result<SimulationReport> {
    let accuracy = accuracy.clamp(0.0, 1.0);
    let timer = ManualTimer::new();
    let mut engine = TrialEngine::new(config.clone(), timer.clone(), StdRng::seed_from_u64(seed))
        .with_high_score(store.load()?);
    let mut responder = Responder {
        accuracy,
        rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
    };

    engine.start(config.round_count, config.lag, config.interval_ms)?;
    let sequence = engine.sequence().to_vec();
    let mut new_high_score = false;

    loop {
        for event in engine.update() {
            match event {
                EngineEvent::StimulusShown { round, stimulus } if round >= config.lag => {
                    let back = sequence[round - config.lag];
                    for &channel in config.modality.channels() {
                        if responder.claims(&stimulus, &back, channel) {
                            engine.toggle_lock(channel);
                        }
                    }
                }
                EngineEvent::NewHighScore { score } => {
                    store.save(score)?;
                    new_high_score = true;
                }
                _ => {}
            }
        }
        match engine.next_deadline() {
            Some(due) => timer.advance_to(due),
            None => break,
        }
    }

    let summary = engine.summary();
    let state = engine.state();
    Ok(SimulationReport {
        config: config.clone(),
        seed,
        accuracy_target: accuracy,
        score: state.score,
        high_score: state.high_score,
        new_high_score,
        accuracy: summary.accuracy(),
        summary,
        rounds: engine.results().to_vec(),
    })
}
