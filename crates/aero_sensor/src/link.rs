use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use aero_core::{Error, Result};

/// One connect-and-read of the sensor's current-values characteristic.
///
/// The BLE plumbing (scanning, pairing, characteristic discovery) lives
/// behind this trait; the crate only cares about the payload bytes.
#[async_trait]
pub trait SensorLink: Send + Sync {
    async fn read_current_values(&self) -> Result<Vec<u8>>;
}

/// Fixed-interval reconnect policy, bounded by default. No backoff growth.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(10),
        }
    }
}

pub async fn read_with_retry(link: &dyn SensorLink, policy: &RetryPolicy) -> Result<Vec<u8>> {
    let mut last_error = None;
    for attempt in 1..=policy.max_attempts {
        match link.read_current_values().await {
            Ok(raw) => return Ok(raw),
            Err(e) => {
                warn!(
                    "sensor read failed, attempt {}/{}: {}",
                    attempt, policy.max_attempts, e
                );
                last_error = Some(e);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
    Err(last_error.unwrap_or_else(|| Error::Sensor("no read attempts were made".to_string())))
}

/// Payload handed over as a file by whatever BLE tool reads the
/// characteristic: either the raw bytes or their hex form.
pub struct FilePayloadLink {
    path: PathBuf,
}

impl FilePayloadLink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SensorLink for FilePayloadLink {
    async fn read_current_values(&self) -> Result<Vec<u8>> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| {
            Error::Sensor(format!("could not read {}: {}", self.path.display(), e))
        })?;
        if let Ok(text) = std::str::from_utf8(&raw) {
            let trimmed = text.trim();
            if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
                return decode_hex(trimmed);
            }
        }
        Ok(raw)
    }
}

fn decode_hex(text: &str) -> Result<Vec<u8>> {
    if text.len() % 2 != 0 {
        return Err(Error::Sensor(format!("odd-length hex payload: {}", text)));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&text[i..i + 2], 16)
                .map_err(|_| Error::Sensor(format!("bad hex payload: {}", text)))
        })
        .collect()
}
