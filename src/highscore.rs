//! Best score kept between sessions as a small JSON file.

use std::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Record {
    best: u64,
}

#[derive(Debug, Clone)]
pub struct HighScore {
    path: PathBuf,
    best: u64,
}

impl HighScore {
    /// Load the stored best score. A missing or unreadable file counts as
    /// zero so a fresh install starts cleanly.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match read_record(&path) {
            Ok(Some(record)) => {
                log::info!("loaded high score {} from {}", record.best, path.display());
                record.best
            }
            Ok(None) => {
                log::info!("no high score at {}, starting fresh", path.display());
                0
            }
            Err(err) => {
                log::warn!("ignoring high score file {}: {err}", path.display());
                0
            }
        };
        Self { path, best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record `score` if it beats the current best. Returns true when the
    /// best changed.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        true
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(&Record { best: self.best })?;
        fs::write(&self.path, json)?;
        log::debug!("high score {} saved to {}", self.best, self.path.display());
        Ok(())
    }
}

fn read_record(path: &Path) -> Result<Option<Record>, Box<dyn Error>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}
