use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use aero_core::cache;
use aero_core::Result;

/// Last believed open/closed window state.
///
/// `None` from `load` means "unknown": the file is missing, stale, or
/// unreadable, and the caller should treat the next decision as a fresh one.
pub struct StateFile {
    path: PathBuf,
    stale_after: Duration,
}

impl StateFile {
    pub fn new<P: Into<PathBuf>>(path: P, stale_after: Duration) -> Self {
        Self {
            path: path.into(),
            stale_after,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<bool> {
        if cache::is_stale(&self.path, self.stale_after) {
            info!("window state at {} is missing or stale", self.path.display());
            return None;
        }
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| contents.trim().parse::<bool>().ok())
    }

    pub fn save(&self, is_open: bool) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, is_open.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRESH: Duration = Duration::from_secs(8 * 60 * 60);

    #[test]
    fn test_missing_state_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("open_windows.state"), FRESH);
        assert_eq!(state.load(), None);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("open_windows.state"), FRESH);
        state.save(true).unwrap();
        assert_eq!(state.load(), Some(true));
        state.save(false).unwrap();
        assert_eq!(state.load(), Some(false));
    }

    #[test]
    fn test_stale_state_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("open_windows.state"), Duration::from_millis(1));
        state.save(true).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(state.load(), None);
    }

    #[test]
    fn test_garbage_state_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("open_windows.state"), FRESH);
        fs::write(state.path(), "maybe").unwrap();
        assert_eq!(state.load(), None);
    }
}
