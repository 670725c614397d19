//! Render statistics.
//!
//! Two counters are kept: `renderCalls` (one per rendered image) and
//! `imagesAllCalls` (one per "render all" batch). They are best-effort:
//! persisting them every N-th rendered image may fail or be skipped without
//! affecting any markup.
//!
//! ```json
//! { "renderCalls": 120, "imagesAllCalls": 8, "lastReset": 1760800000 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Counter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    RenderCalls,
    ImagesAllCalls,
}

impl Counter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RenderCalls => "renderCalls",
            Self::ImagesAllCalls => "imagesAllCalls",
        }
    }
}

/// Fire-and-forget counter sink used by the render pipeline.
pub trait StatsSink: Sync {
    fn increment(&self, counter: Counter);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStats;

impl StatsSink for NoStats {
    fn increment(&self, _counter: Counter) {}
}

/// Persisted counter values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub render_calls: u64,
    pub images_all_calls: u64,
    /// Unix timestamp (seconds) of the last reset.
    pub last_reset: u64,
}

/// Thread-safe counters with periodic JSON persistence.
#[derive(Debug)]
pub struct RenderStats {
    counters: Mutex<StatsSnapshot>,
    path: Option<PathBuf>,
    flush_every: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl RenderStats {
    /// Counters that are never written anywhere.
    pub fn in_memory() -> Self {
        Self {
            counters: Mutex::new(StatsSnapshot {
                last_reset: now_secs(),
                ..Default::default()
            }),
            path: None,
            flush_every: u64::MAX,
        }
    }

    /// Counters persisted to `path` every `flush_every` rendered images.
    ///
    /// Existing values are picked up; an unreadable file starts from zero.
    pub fn load(path: impl Into<PathBuf>, flush_every: u64) -> Self {
        let path = path.into();
        let counters = read_snapshot(&path).unwrap_or_else(|| StatsSnapshot {
            last_reset: now_secs(),
            ..Default::default()
        });
        Self {
            counters: Mutex::new(counters),
            path: Some(path),
            flush_every: flush_every.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatsSnapshot> {
        // Counters stay usable even if a panicking thread held the lock.
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.lock().clone()
    }

    /// Zero all counters and stamp the reset time.
    pub fn reset(&self) {
        *self.lock() = StatsSnapshot {
            last_reset: now_secs(),
            ..Default::default()
        };
    }

    /// Write the current counters to the stats file, if there is one.
    pub fn flush(&self) -> Result<(), StatsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        debug!(path = %path.display(), "stats flushed");
        Ok(())
    }
}

impl StatsSink for RenderStats {
    fn increment(&self, counter: Counter) {
        let due = {
            let mut counters = self.lock();
            match counter {
                Counter::RenderCalls => {
                    counters.render_calls += 1;
                    counters.render_calls % self.flush_every == 0
                }
                Counter::ImagesAllCalls => {
                    counters.images_all_calls += 1;
                    false
                }
            }
        };
        if due {
            if let Err(err) = self.flush() {
                warn!(error = %err, "could not persist render stats");
            }
        }
    }
}

fn read_snapshot(path: &Path) -> Option<StatsSnapshot> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring malformed stats file");
            None
        }
    }
}
