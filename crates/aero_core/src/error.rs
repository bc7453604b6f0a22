use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("unexpected fragment shape: {0}")]
    UnexpectedShape(String),

    #[error("no number found in {0:?}")]
    NoNumberFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Sensor error: {0}")]
    Sensor(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Notify error: {0}")]
    Notify(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}
