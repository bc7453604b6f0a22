pub mod dom;
pub mod rain;
pub mod station;

pub use rain::RainScraper;
pub use station::StationScraper;

use aero_core::{Error, Result};

/// GET a page as text. A network error or non-success status is a fetch
/// failure; callers never fall back to a stale cache on this path.
pub async fn fetch_text(url: &str) -> Result<String> {
    let response = reqwest::get(url).await.map_err(|e| Error::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let response = response.error_for_status().map_err(|e| Error::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    response.text().await.map_err(|e| Error::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

pub mod prelude {
    pub use super::rain::RainScraper;
    pub use super::station::StationScraper;
    pub use aero_core::{Error, Result};
}
