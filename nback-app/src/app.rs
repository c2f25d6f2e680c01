use anyhow::Result;
use nback_core::Channel;
use nback_engine::{
    EngineEvent, GameConfig, GameRunner, HighScoreStore, TrialEngine, export_results,
};
use nback_timing::HighPrecisionTimer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::display;

enum Message {
    Engine(EngineEvent),
    Toggle(Channel),
    Quit,
}

/// Interactive terminal game. Keys are read line by line: `p` claims a position
/// match, `a` an audio match, `q` quits.
pub struct App {
    runner: GameRunner<HighPrecisionTimer, StdRng>,
    config: GameConfig,
    results_path: Option<PathBuf>,
}

impl App {
    pub fn new(
        config: GameConfig,
        store: Box<dyn HighScoreStore>,
        results_path: Option<PathBuf>,
    ) -> Result<Self> {
        let engine = TrialEngine::new(
            config.clone(),
            HighPrecisionTimer::new(),
            StdRng::from_os_rng(),
        );
        Ok(Self {
            runner: GameRunner::new(engine, store),
            config,
            results_path,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        spawn_input(tx.clone());
        let events = self.runner.subscribe();
        thread::spawn(move || {
            for event in events {
                if tx.send(Message::Engine(event)).is_err() {
                    break;
                }
            }
        });

        println!("=== N-BACK ({}, {}-back) ===", self.config.modality, self.config.lag);
        println!(
            "High score: {}. Type p (position) / a (audio) + Enter to claim a match, q to quit.\n",
            self.runner.snapshot().high_score
        );
        self.runner.start(
            self.config.round_count,
            self.config.lag,
            self.config.interval_ms,
        )?;

        let flash = Duration::from_millis(self.config.feedback_ms);
        let mut wrong_since: Option<Instant> = None;
        loop {
            match rx.recv_timeout(flash) {
                Ok(Message::Engine(event)) => {
                    if let EngineEvent::RoundScored { verdict, .. } = &event {
                        if verdict.is_wrong {
                            wrong_since = Some(Instant::now());
                        }
                    }
                    if !self.show(&event) {
                        break;
                    }
                }
                Ok(Message::Toggle(channel)) => {
                    self.runner.toggle_lock(channel);
                    println!("  {}", display::locks(self.runner.snapshot().locks));
                }
                Ok(Message::Quit) => {
                    self.runner.stop();
                    println!("Stopped.");
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            if wrong_since.is_some_and(|t| t.elapsed() >= flash) {
                self.runner.clear_wrong();
                wrong_since = None;
            }
        }

        self.runner.wait();
        if let Some(path) = &self.results_path {
            self.runner
                .with_engine(|engine| export_results(path, engine.results()))?;
            println!("Results saved to {}", path.display());
        }
        Ok(())
    }

    /// Prints one event; returns false once the game is over.
    fn show(&self, event: &EngineEvent) -> bool {
        match event {
            EngineEvent::StimulusShown { round, stimulus } => {
                println!(
                    "{}",
                    display::stimulus(*round, self.config.round_count, stimulus)
                );
            }
            EngineEvent::RoundScored { verdict, score, .. } => {
                println!("{}", display::verdict(verdict, *score));
            }
            EngineEvent::NewHighScore { score } => println!("New high score: {score}!"),
            EngineEvent::Finished { high_score, .. } => {
                let summary = self.runner.with_engine(|engine| engine.summary());
                println!("\n{}", display::summary(&summary, *high_score));
            }
            _ => {}
        }
        !event.is_terminal()
    }
}

fn spawn_input(tx: Sender<Message>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            for key in line.chars() {
                let message = match key.to_ascii_lowercase() {
                    'p' | 'v' => Message::Toggle(Channel::Position),
                    'a' | 'l' => Message::Toggle(Channel::Audio),
                    'q' => Message::Quit,
                    _ => continue,
                };
                if tx.send(message).is_err() {
                    return;
                }
            }
        }
    });
}
