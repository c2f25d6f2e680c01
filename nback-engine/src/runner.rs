//! Drives a [`TrialEngine`] from a worker thread.
//!
//! The engine and its lock state sit behind one mutex; the worker, user toggles
//! and observers all go through it, so evaluation always sees a consistent pair
//! of session and lock state. Events are published while that mutex is held,
//! which keeps subscribers' view in transition order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use nback_core::{Channel, Modality, NBackResult, Stimulus};
use nback_timing::Timer;
use rand::Rng;
use tracing::{error, warn};

use crate::engine::TrialEngine;
use crate::event::EngineEvent;
use crate::state::SessionState;
use crate::store::HighScoreStore;

/// Longest the worker sleeps before re-checking its stop flag.
const STOP_POLL: Duration = Duration::from_millis(10);

struct Shared<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    engine: Mutex<TrialEngine<T, R>>,
    subscribers: Mutex<Vec<Sender<EngineEvent>>>,
    store: Mutex<Box<dyn HighScoreStore>>,
}

impl<T, R> Shared<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    fn engine(&self) -> MutexGuard<'_, TrialEngine<T, R>> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Must be called with the engine lock held.
    fn publish(&self, events: Vec<EngineEvent>) {
        if events.is_empty() {
            return;
        }
        for event in &events {
            if let EngineEvent::NewHighScore { score } = event {
                let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
                if let Err(e) = store.save(*score) {
                    error!("failed to persist high score {score}: {e:#}");
                }
            }
        }
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| events.iter().all(|e| tx.send(e.clone()).is_ok()));
    }
}

/// Owns at most one running game loop.
pub struct GameRunner<T, R>
where
    T: Timer<Timestamp = u64> + 'static,
    R: Rng + Send + 'static,
{
    shared: Arc<Shared<T, R>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl<T, R> GameRunner<T, R>
where
    T: Timer<Timestamp = u64> + 'static,
    R: Rng + Send + 'static,
{
    /// Loads the stored high score into `engine`; an unreadable store counts as zero.
    pub fn new(mut engine: TrialEngine<T, R>, store: Box<dyn HighScoreStore>) -> Self {
        match store.load() {
            Ok(high_score) => engine.set_high_score(high_score),
            Err(e) => warn!("could not load high score, starting from 0: {e:#}"),
        }
        Self {
            shared: Arc::new(Shared {
                engine: Mutex::new(engine),
                subscribers: Mutex::new(Vec::new()),
                store: Mutex::new(store),
            }),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Receives every event published from now on.
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        let (tx, rx) = mpsc::channel();
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub fn configure(&self, modality: Modality) -> bool {
        let mut engine = self.shared.engine();
        engine.configure(modality)
    }

    /// Cancels the running loop, if any, and starts a new game on a fresh worker.
    pub fn start(&mut self, round_count: usize, lag: usize, interval_ms: u64) -> NBackResult<()> {
        self.stop();
        {
            let mut engine = self.shared.engine();
            let started = engine.start(round_count, lag, interval_ms);
            let events = engine.drain_events();
            self.shared.publish(events);
            started?;
        }
        self.spawn();
        Ok(())
    }

    /// Like [`GameRunner::start`] over a caller-supplied sequence.
    pub fn start_with_sequence(
        &mut self,
        sequence: Vec<Stimulus>,
        lag: usize,
        interval_ms: u64,
    ) -> NBackResult<()> {
        self.stop();
        {
            let mut engine = self.shared.engine();
            let started = engine.start_with_sequence(sequence, lag, interval_ms);
            let events = engine.drain_events();
            self.shared.publish(events);
            started?;
        }
        self.spawn();
        Ok(())
    }

    fn spawn(&mut self) {
        self.stop.store(false, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let stop = Arc::clone(&self.stop);
        let timer = shared.engine().timer().clone();
        self.worker = Some(thread::spawn(move || run_loop(shared, stop, timer)));
    }

    /// Halts the loop and waits for the worker to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        self.join_worker();
        let mut engine = self.shared.engine();
        engine.stop();
        let events = engine.drain_events();
        self.shared.publish(events);
    }

    /// Blocks until the running game finishes or is stopped.
    pub fn wait(&mut self) {
        self.join_worker();
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("game loop worker panicked");
            }
        }
    }

    pub fn toggle_lock(&self, channel: Channel) -> bool {
        let mut engine = self.shared.engine();
        let locked = engine.toggle_lock(channel);
        let events = engine.drain_events();
        self.shared.publish(events);
        locked
    }

    pub fn clear_wrong(&self) {
        self.shared.engine().clear_wrong();
    }

    /// Returns to the initial state; refused while a game runs.
    pub fn reset(&mut self) -> bool {
        if self.is_running() {
            warn!("reset ignored while a game is running");
            return false;
        }
        self.join_worker();
        let mut engine = self.shared.engine();
        let reset = engine.reset();
        let events = engine.drain_events();
        self.shared.publish(events);
        reset
    }

    pub fn is_running(&self) -> bool {
        self.shared.engine().is_running()
    }

    /// Copy of the latest session state.
    pub fn snapshot(&self) -> SessionState {
        self.shared.engine().state().clone()
    }

    /// Runs `f` against the engine under its lock.
    pub fn with_engine<O>(&self, f: impl FnOnce(&TrialEngine<T, R>) -> O) -> O {
        f(&self.shared.engine())
    }
}

impl<T, R> Drop for GameRunner<T, R>
where
    T: Timer<Timestamp = u64> + 'static,
    R: Rng + Send + 'static,
{
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        self.join_worker();
    }
}

fn run_loop<T, R>(shared: Arc<Shared<T, R>>, stop: Arc<AtomicBool>, timer: T)
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    while !stop.load(Ordering::Acquire) {
        let wait = {
            let mut engine = shared.engine();
            let events = engine.update();
            shared.publish(events);
            if !engine.is_running() {
                break;
            }
            let now = timer.now();
            engine
                .next_deadline()
                .map_or(STOP_POLL, |due| Duration::from_nanos(due.saturating_sub(now)))
        };
        timer.sleep(wait.min(STOP_POLL));
    }
}
