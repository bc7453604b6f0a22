use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use aero_core::snapshot::{self, SnapshotStatus};
use aero_core::types::Timestamped;
use aero_core::{Error, Result};

/// Change-gated JSON snapshot of the last persisted record.
///
/// Single-writer assumption: the file is not protected against concurrent
/// multi-process access.
pub struct JsonSnapshotStore<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T> JsonSnapshotStore<T>
where
    T: Serialize + DeserializeOwned + Timestamped,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The previously persisted record, if any. A missing file is simply no
    /// record; an unparseable file is an error, not silently discarded data.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            Error::Storage(format!("could not read {}: {}", self.path.display(), e))
        })?;
        let record = serde_json::from_str(&contents).map_err(|e| {
            Error::Storage(format!("could not parse {}: {}", self.path.display(), e))
        })?;
        Ok(Some(record))
    }

    /// Persist the candidate only if it is strictly newer than the stored
    /// record. The no-write case is an idempotent no-op reported to the caller.
    pub fn store_if_newer(&self, candidate: &T) -> Result<SnapshotStatus> {
        let previous = self.load()?;
        let status = snapshot::compare(previous.as_ref(), candidate);
        match status {
            SnapshotStatus::New | SnapshotStatus::Updated => {
                self.write(candidate)?;
                info!("💾 wrote {}", self.path.display());
            }
            SnapshotStatus::Unchanged => {
                info!(
                    "⏭️ {} already has this observation, skipping write",
                    self.path.display()
                );
            }
        }
        Ok(status)
    }

    fn write(&self, record: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json).map_err(|e| {
            Error::Storage(format!("could not write {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(with = "aero_core::types::minute_ts")]
        observed_at: NaiveDateTime,
        value: f64,
    }

    impl Timestamped for Record {
        fn observed_at(&self) -> NaiveDateTime {
            self.observed_at
        }
    }

    fn record(minute: u32, value: f64) -> Record {
        Record {
            observed_at: chrono::NaiveDate::from_ymd_opt(2023, 4, 15)
                .unwrap()
                .and_hms_opt(10, minute, 0)
                .unwrap(),
            value,
        }
    }

    #[test]
    fn test_first_write_is_new() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("weather.json"));
        assert_eq!(store.store_if_newer(&record(0, 1.0)).unwrap(), SnapshotStatus::New);
        assert_eq!(store.load().unwrap(), Some(record(0, 1.0)));
    }

    #[test]
    fn test_same_timestamp_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("weather.json"));
        store.store_if_newer(&record(0, 1.0)).unwrap();

        let status = store.store_if_newer(&record(0, 2.0)).unwrap();
        assert_eq!(status, SnapshotStatus::Unchanged);
        // The previously persisted value survives.
        assert_eq!(store.load().unwrap(), Some(record(0, 1.0)));
    }

    #[test]
    fn test_newer_timestamp_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("weather.json"));
        store.store_if_newer(&record(0, 1.0)).unwrap();

        let status = store.store_if_newer(&record(1, 2.0)).unwrap();
        assert_eq!(status, SnapshotStatus::Updated);
        assert_eq!(store.load().unwrap(), Some(record(1, 2.0)));
    }

    #[test]
    fn test_older_timestamp_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("weather.json"));
        store.store_if_newer(&record(5, 1.0)).unwrap();
        assert_eq!(
            store.store_if_newer(&record(4, 2.0)).unwrap(),
            SnapshotStatus::Unchanged
        );
    }

    #[test]
    fn test_unparseable_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.json");
        fs::write(&path, "{ not json").unwrap();
        let store: JsonSnapshotStore<Record> = JsonSnapshotStore::new(path.clone());
        assert!(matches!(store.load(), Err(Error::Storage(_))));
    }
}
