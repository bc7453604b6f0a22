use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use aero_core::config::PushoverConfig;
use aero_core::{Error, Result};

const PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";

/// Push-notification sink. The window advisor only needs `send`.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

pub struct PushoverClient {
    config: PushoverConfig,
    dry_run: bool,
    http: reqwest::Client,
}

impl PushoverClient {
    pub fn new(config: PushoverConfig, dry_run: bool) -> Self {
        Self {
            config,
            dry_run,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for PushoverClient {
    async fn send(&self, message: &str) -> Result<()> {
        if self.dry_run {
            info!("dry-run: {}", message);
            return Ok(());
        }
        let params = json!({
            "token": self.config.api_key,
            "user": self.config.user_key,
            "message": message,
        });
        let response = self
            .http
            .post(PUSHOVER_URL)
            .json(&params)
            .send()
            .await
            .map_err(|e| Error::Notify(format!("could not reach {}: {}", PUSHOVER_URL, e)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Notify(format!(
                "{} returned {}: {}",
                PUSHOVER_URL, status, body
            )));
        }
        info!("📣 pushover accepted the notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let client = PushoverClient::new(
            PushoverConfig {
                api_key: "app-token".to_string(),
                user_key: "user-token".to_string(),
            },
            true,
        );
        // Would hit the network if dry-run were broken.
        client.send("open the windows 🪟").await.unwrap();
    }
}
