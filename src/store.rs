use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::models::CycleRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("data directory not found")]
    NoDataDir,
}

/// Read-only source of the cycle history snapshot.
pub trait CycleHistoryStore {
    /// All logged cycles, ascending by start date.
    fn fetch_all_cycles(&self) -> Result<Vec<CycleRecord>, StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    cycles: Vec<CycleRecord>,
}

impl InMemoryHistoryStore {
    pub fn new(mut cycles: Vec<CycleRecord>) -> Self {
        cycles.sort_by_key(|c| c.start_date);
        Self { cycles }
    }
}

impl CycleHistoryStore for InMemoryHistoryStore {
    fn fetch_all_cycles(&self) -> Result<Vec<CycleRecord>, StoreError> {
        Ok(self.cycles.clone())
    }
}

/// Accepts either a full data export (`{"cycles": [...], ...}`) or a bare
/// array of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryDocument {
    Export { cycles: Vec<CycleRecord> },
    Records(Vec<CycleRecord>),
}

/// JSON file snapshot, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<local data dir>/cykel/history.json`
    pub fn default_location() -> Result<Self, StoreError> {
        let dir = dirs::data_local_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("cykel");
        Ok(Self::new(dir.join("history.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CycleHistoryStore for JsonHistoryStore {
    fn fetch_all_cycles(&self) -> Result<Vec<CycleRecord>, StoreError> {
        let content = fs::read(&self.path)?;
        let mut cycles = match serde_json::from_slice(&content)? {
            HistoryDocument::Export { cycles } => cycles,
            HistoryDocument::Records(cycles) => cycles,
        };
        cycles.sort_by_key(|c| c.start_date);
        log::debug!(
            "loaded {} cycles from {}",
            cycles.len(),
            self.path.display()
        );
        Ok(cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn in_memory_store_sorts_snapshot() {
        let store = InMemoryHistoryStore::new(vec![
            CycleRecord::open(date("2024-02-01")),
            CycleRecord::open(date("2024-01-01")),
        ]);
        let cycles = store.fetch_all_cycles().unwrap();
        assert_eq!(cycles[0].start_date, date("2024-01-01"));
        assert_eq!(cycles[1].start_date, date("2024-02-01"));
    }

    #[test]
    fn reads_full_export() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "cycles": [
                    {{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "start_date": "2026-01-29", "end_date": "2026-02-02"}},
                    {{"id": "5f2b7a8e-1c3d-4e5f-8a9b-0c1d2e3f4a5b", "start_date": "2026-01-01", "end_date": "2026-01-05"}}
                ],
                "day_logs": [],
                "symptoms": [],
                "settings": {{"auto_lock_minutes": 5, "wipe_after_attempts": null}}
            }}"#
        )
        .unwrap();

        let cycles = JsonHistoryStore::new(file.path()).fetch_all_cycles().unwrap();
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].start_date, date("2026-01-01"));
        assert_eq!(cycles[1].end_date, Some(date("2026-02-02")));
    }

    #[test]
    fn reads_bare_record_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"start_date": "2024-01-01"}}]"#).unwrap();
        let cycles = JsonHistoryStore::new(file.path()).fetch_all_cycles().unwrap();
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].end_date.is_none());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("missing.json"));
        assert!(matches!(store.fetch_all_cycles(), Err(StoreError::Io(_))));
    }

    #[test]
    fn malformed_file_is_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cycles": "nope"}}"#).unwrap();
        let store = JsonHistoryStore::new(file.path());
        assert!(matches!(
            store.fetch_all_cycles(),
            Err(StoreError::Serialization(_))
        ));
    }
}
