use crate::types::Timestamped;

/// Outcome of offering a candidate record to a change-gated store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// No previous record existed; the candidate was written.
    New,
    /// The candidate was strictly newer and replaced the previous record.
    Updated,
    /// Same or older timestamp; nothing was written.
    Unchanged,
}

impl SnapshotStatus {
    pub fn wrote(&self) -> bool {
        !matches!(self, SnapshotStatus::Unchanged)
    }
}

/// Monotonic-write gate: a persisted record is replaced only by a strictly
/// newer-timestamped candidate.
pub fn compare<T: Timestamped>(previous: Option<&T>, candidate: &T) -> SnapshotStatus {
    match previous {
        None => SnapshotStatus::New,
        Some(prev) if candidate.observed_at() > prev.observed_at() => SnapshotStatus::Updated,
        Some(_) => SnapshotStatus::Unchanged,
    }
}
