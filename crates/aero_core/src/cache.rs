use std::fs;
use std::future::Future;
use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use tracing::info;

use crate::Result;

/// Whether the gate hit the network or reused the artifact on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Downloaded,
    Reused,
}

/// Missing OR older than `max_age` means the artifact must be refetched.
pub fn is_stale(path: &Path, max_age: Duration) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return true;
    };
    match metadata.modified().ok().and_then(|m| m.elapsed().ok()) {
        Some(age) => age > max_age,
        // Unreadable or future mtime, treat as needing a refetch.
        None => true,
    }
}

/// Fetch-or-reuse gate over a raw artifact file.
///
/// A fetch failure propagates; the stale artifact is never used as a fallback.
/// On refetch the file is replaced wholesale. Returns the content together
/// with its effective timestamp (the file's mtime after this step).
pub async fn fetch_or_reuse<F, Fut>(
    path: &Path,
    max_age: Duration,
    fetch: F,
) -> Result<(String, SystemTime, CacheOutcome)>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    if is_stale(path, max_age) {
        let body = fetch().await?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &body)?;
        let modified = fs::metadata(path)?.modified()?;
        info!("⬇️ refreshed {}", path.display());
        Ok((body, modified, CacheOutcome::Downloaded))
    } else {
        let body = fs::read_to_string(path)?;
        let modified = fs::metadata(path)?.modified()?;
        info!("⏭️ reusing {}", path.display());
        Ok((body, modified, CacheOutcome::Reused))
    }
}

/// File mtime as a local timestamp truncated to the minute, the resolution
/// the upstream pages advance at.
pub fn minute_of(ts: SystemTime) -> NaiveDateTime {
    let local: DateTime<Local> = ts.into();
    local
        .naive_local()
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(|| local.naive_local())
}
