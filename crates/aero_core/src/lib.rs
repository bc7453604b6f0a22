pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod snapshot;
pub mod types;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use cache::CacheOutcome;
pub use extract::Fragment;
pub use snapshot::SnapshotStatus;
pub use types::{IndoorReading, RainReport, Timestamped, WeatherReading};

pub mod prelude {
    pub use super::cache::CacheOutcome;
    pub use super::extract::Fragment;
    pub use super::snapshot::SnapshotStatus;
    pub use super::types::{IndoorReading, RainReport, Timestamped, WeatherReading};
    pub use super::{Error, Result};
}
