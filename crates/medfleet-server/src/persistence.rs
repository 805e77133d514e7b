//! Maintenance log persistence.
//!
//! The whole drone-id -> history mapping is serialized to a single JSON file
//! and rewritten wholesale on every mutation. Reads prefer availability: a
//! missing or corrupt file degrades to an empty mapping. Writes are strict:
//! a failed persist would silently drop a recorded log, so it surfaces as an
//! error to the caller.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use medfleet_core::models::LogHistory;

/// Narrow storage contract so alternate backends can be substituted without
/// touching scoring or selection logic.
pub trait LogStore: Send {
    /// Full mapping; empty when the backing data is absent or unreadable.
    fn load(&self) -> LogHistory;

    /// Atomically replace the backing data with the full mapping.
    fn persist(&self, history: &LogHistory) -> Result<()>;
}

/// JSON file store. The file holds the entire mapping, pretty-printed, and
/// is replaced via a temp-file rename so a crash mid-write cannot corrupt
/// the previous state.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the store, creating the parent directory and an empty mapping
    /// file when absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating storage directory {}", parent.display()))?;
        }
        if !path.exists() {
            fs::write(&path, "{}")
                .with_context(|| format!("initializing maintenance store {}", path.display()))?;
        }
        Ok(Self { path })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LogStore for JsonFileStore {
    fn load(&self) -> LogHistory {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(
                    "Maintenance store unreadable ({}), starting empty: {}",
                    self.path.display(),
                    err
                );
                return LogHistory::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(
                    "Maintenance store corrupt ({}), starting empty: {}",
                    self.path.display(),
                    err
                );
                LogHistory::new()
            }
        }
    }

    fn persist(&self, history: &LogHistory) -> Result<()> {
        let json = serde_json::to_string_pretty(history).context("serializing maintenance logs")?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)
            .with_context(|| format!("writing maintenance store {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing maintenance store {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    history: Mutex<LogHistory>,
}

impl LogStore for MemoryStore {
    fn load(&self) -> LogHistory {
        self.history.lock().expect("memory store lock").clone()
    }

    fn persist(&self, history: &LogHistory) -> Result<()> {
        *self.history.lock().expect("memory store lock") = history.clone();
        Ok(())
    }
}

impl<S: LogStore + Sync> LogStore for std::sync::Arc<S> {
    fn load(&self) -> LogHistory {
        (**self).load()
    }

    fn persist(&self, history: &LogHistory) -> Result<()> {
        (**self).persist(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medfleet_core::MaintenanceLog;

    fn temp_store_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "medfleet-store-{}-{}.json",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn round_trips_history_through_the_file() {
        let path = temp_store_path("roundtrip");
        let _ = fs::remove_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.load().is_empty());

        let mut history = LogHistory::new();
        let mut log = MaintenanceLog::new("D1");
        log.flight_hours = Some(2.5);
        log.recorded_at = Some("2025-06-02T10:00:00Z".to_string());
        history.insert("D1".to_string(), vec![log]);
        store.persist(&history).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, history);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_degrades_to_empty_mapping() {
        let path = temp_store_path("corrupt");
        fs::write(&path, "not json at all {{{").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.load().is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn open_initializes_an_empty_mapping_file() {
        let path = temp_store_path("init");
        let _ = fs::remove_file(&path);

        JsonFileStore::open(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        let _ = fs::remove_file(&path);
    }
}
