use std::fs;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Pushover credentials, usually `~/.config/aero/pushover.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushoverConfig {
    pub api_key: String,
    pub user_key: String,
}

impl PushoverConfig {
    pub fn load(path: &str) -> Result<Self> {
        let config: Self = read_config(path)?;
        require(path, "api_key", &config.api_key)?;
        require(path, "user_key", &config.user_key)?;
        Ok(config)
    }
}

/// Notion integration token and target page, `~/.config/aero/notion.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    pub notion_api_key: String,
    pub page_id: String,
}

impl NotionConfig {
    pub fn load(path: &str) -> Result<Self> {
        let config: Self = read_config(path)?;
        require(path, "notion_api_key", &config.notion_api_key)?;
        require(path, "page_id", &config.page_id)?;
        Ok(config)
    }
}

/// Rain-gauge report source, `~/.config/aero/rain.json`. The URL and the
/// extraction regex are deployment-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainConfig {
    pub rain_data_url: String,
    pub rain_regex: String,
}

impl RainConfig {
    pub fn load(path: &str) -> Result<Self> {
        let config: Self = read_config(path)?;
        require_url(path, "rain_data_url", &config.rain_data_url)?;
        require(path, "rain_regex", &config.rain_regex)?;
        Ok(config)
    }
}

/// Weather-station status page, `~/.config/aero/station.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub station_url: String,
}

impl StationConfig {
    pub fn load(path: &str) -> Result<Self> {
        let config: Self = read_config(path)?;
        require_url(path, "station_url", &config.station_url)?;
        Ok(config)
    }
}

/// Expand `~` and env vars in a user-supplied path.
pub fn expand_path(path: &str) -> Result<String> {
    let expanded = shellexpand::full(path)
        .map_err(|e| Error::Config(format!("could not expand {}: {}", path, e)))?;
    Ok(expanded.into_owned())
}

fn read_config<T: DeserializeOwned>(path: &str) -> Result<T> {
    let expanded = expand_path(path)?;
    let contents = fs::read_to_string(&expanded)
        .map_err(|e| Error::Config(format!("could not read {}: {}", path, e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| Error::Config(format!("could not parse {}: {}", path, e)))
}

fn require(path: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!(
            "{}: required field {:?} is missing or empty",
            path, field
        )));
    }
    Ok(())
}

fn require_url(path: &str, field: &str, value: &str) -> Result<()> {
    require(path, field, value)?;
    Url::parse(value).map_err(|e| {
        Error::Config(format!("{}: field {:?} is not a valid URL: {}", path, field, e))
    })?;
    Ok(())
}
