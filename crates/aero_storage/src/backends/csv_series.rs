use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use aero_core::{Error, Result};

const HEADER: &str = "Date,Pcpn";

/// Append-only precipitation series, one row per date under a
/// `Date,Pcpn` header. Neither column can contain a comma, so the rows
/// need no quoting.
pub struct CsvSeriesStore {
    path: PathBuf,
}

impl CsvSeriesStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dates already present in the series, in file order.
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|e| {
            Error::Storage(format!("could not read {}: {}", self.path.display(), e))
        })?;
        let mut dates = Vec::new();
        for line in text.lines().skip(1) {
            let Some(raw_date) = line.split(',').next() else {
                continue;
            };
            if raw_date.trim().is_empty() {
                continue;
            }
            let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d").map_err(|e| {
                Error::Storage(format!(
                    "bad date {:?} in {}: {}",
                    raw_date,
                    self.path.display(),
                    e
                ))
            })?;
            dates.push(date);
        }
        Ok(dates)
    }

    /// Append a row unless the date is already recorded. Returns whether a
    /// row was written.
    pub fn append_unique(&self, date: NaiveDate, precipitation: f64) -> Result<bool> {
        if self.dates()?.contains(&date) {
            info!("⏭️ {} already has a row for {}", self.path.display(), date);
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let new_file = !self.path.exists();
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                Error::Storage(format!("could not open {}: {}", self.path.display(), e))
            })?;
        if new_file {
            writeln!(file, "{}", HEADER)?;
        }
        writeln!(file, "{},{}", date.format("%Y-%m-%d"), precipitation)?;
        info!("💾 appended {} to {}", date, self.path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    #[test]
    fn test_first_append_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvSeriesStore::new(dir.path().join("rain.csv"));
        assert!(store.append_unique(day(1), 0.12).unwrap());

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "Date,Pcpn\n2024-09-01,0.12\n");
    }

    #[test]
    fn test_append_is_unique_per_date() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvSeriesStore::new(dir.path().join("rain.csv"));
        assert!(store.append_unique(day(1), 0.12).unwrap());
        assert!(!store.append_unique(day(1), 0.5).unwrap());
        assert!(store.append_unique(day(2), 0.0).unwrap());

        assert_eq!(store.dates().unwrap(), vec![day(1), day(2)]);
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_missing_file_has_no_dates() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvSeriesStore::new(dir.path().join("rain.csv"));
        assert!(store.dates().unwrap().is_empty());
    }
}
