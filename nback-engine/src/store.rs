use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Persistence for the best score. The engine only signals; stores decide where it lives.
pub trait HighScoreStore: Send {
    fn load(&self) -> Result<u32>;
    fn save(&mut self, score: u32) -> Result<()>;
}

/// Keeps the score in memory. Clones share the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    score: Arc<AtomicU32>,
    saves: Arc<AtomicUsize>,
}

impl MemoryHighScoreStore {
    pub fn new(score: u32) -> Self {
        Self {
            score: Arc::new(AtomicU32::new(score)),
            saves: Arc::default(),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u32> {
        Ok(self.score.load(Ordering::SeqCst))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.score.store(score, Ordering::SeqCst);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// Stores the score as a small JSON document.
#[derive(Debug, Clone)]
pub struct JsonHighScoreStore {
    path: PathBuf,
}

impl JsonHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonHighScoreStore {
    /// A missing file means no score has been recorded yet.
    fn load(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let file: HighScoreFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(file.high_score)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&HighScoreFile { high_score: score })?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        tracing::info!(score, path = %self.path.display(), "high score saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_counts_saves() {
        let store = MemoryHighScoreStore::new(3);
        let mut handle = store.clone();
        handle.save(7).unwrap();
        assert_eq!(store.load().unwrap(), 7);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn json_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores").join("highscore.json");
        let mut store = JsonHighScoreStore::new(&path);
        assert_eq!(store.load().unwrap(), 0);
        store.save(12).unwrap();
        assert_eq!(JsonHighScoreStore::new(&path).load().unwrap(), 12);
    }

    #[test]
    fn json_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        std::fs::write(&path, "not json").unwrap();
        let err = JsonHighScoreStore::new(&path).load().unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
