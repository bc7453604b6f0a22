pub mod decode;
pub mod link;

use chrono::{Local, Timelike};
use tracing::info;

use aero_core::snapshot::SnapshotStatus;
use aero_core::types::IndoorReading;
use aero_core::Result;
use aero_storage::JsonSnapshotStore;

pub use decode::{decode_reading, CURRENT_VALUES_UUID};
pub use link::{read_with_retry, FilePayloadLink, RetryPolicy, SensorLink};

/// One poll cycle: read the characteristic (with the bounded reconnect
/// policy), decode, and persist through the change gate.
pub async fn poll_once(
    link: &dyn SensorLink,
    policy: &RetryPolicy,
    store: &JsonSnapshotStore<IndoorReading>,
) -> Result<(IndoorReading, SnapshotStatus)> {
    let raw = read_with_retry(link, policy).await?;
    let observed_at = Local::now()
        .naive_local()
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(|| Local::now().naive_local());
    let reading = decode_reading(&raw, observed_at)?;
    let status = store.store_if_newer(&reading)?;
    info!(
        "🏠 humidity {}%rH temp {}degF radon {}Bq/m3: {:?}",
        reading.humidity, reading.temperature, reading.radon_st_avg, status
    );
    Ok((reading, status))
}

pub mod prelude {
    pub use super::decode::decode_reading;
    pub use super::link::{FilePayloadLink, RetryPolicy, SensorLink};
    pub use super::poll_once;
}
