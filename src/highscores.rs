//! Persisted high score
//!
//! A single best score, stored as a small JSON document. Reading never fails:
//! a missing or unreadable store counts as a zero score.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The persisted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached when the score was set
    #[serde(default)]
    pub level: u32,
}

/// Where the best score lives between runs
pub trait HighScoreStore {
    /// Stored best score, 0 if absent or unreadable
    fn read(&self) -> u64;

    fn write(&mut self, entry: HighScoreEntry) -> Result<()>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HighScoreEntry> {
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn read(&self) -> u64 {
        match self.load() {
            Ok(entry) => {
                log::info!("Loaded high score {} from {}", entry.score, self.path.display());
                entry.score
            }
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score at {}, starting fresh", self.path.display());
                0
            }
            Err(e) => {
                log::warn!("Could not read high score from {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn write(&mut self, entry: HighScoreEntry) -> Result<()> {
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(&self.path, json)?;
        log::info!("High score {} saved to {}", entry.score, self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    pub entry: Option<HighScoreEntry>,
    /// Number of successful writes
    pub writes: u32,
    /// Make every write fail with an I/O error
    pub fail_writes: bool,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self {
            entry: Some(HighScoreEntry { score, level: 1 }),
            ..Self::default()
        }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn read(&self) -> u64 {
        self.entry.map_or(0, |e| e.score)
    }

    fn write(&mut self, entry: HighScoreEntry) -> Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::other("store is read-only").into());
        }
        self.entry = Some(entry);
        self.writes += 1;
        Ok(())
    }
}
