use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

use aero_core::cache::{self, CacheOutcome};
use aero_core::config::StationConfig;
use aero_core::extract::Fragment;
use aero_core::snapshot::SnapshotStatus;
use aero_core::types::WeatherReading;
use aero_core::{Error, Result};
use aero_storage::JsonSnapshotStore;

use crate::dom::fragment_of;
use crate::fetch_text;

/// The page's displayed values only advance every few minutes.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(10 * 60);

// 1-based row positions of the observation table, value in the second cell.
const ROW_TEMPERATURE: usize = 3;
const ROW_HUMIDITY: usize = 4;
const ROW_DEWPOINT: usize = 5;
const ROW_WIND: usize = 6;
const ROW_BAROMETER: usize = 7;
const ROW_TODAY_RAIN: usize = 8;
const ROW_YEARLY_RAIN: usize = 9;
const ROW_WIND_CHILL: usize = 10;
const ROW_THW_INDEX: usize = 11;
const ROW_HEAT_INDEX: usize = 12;

/// Scraper for the personal weather station's HTML status page.
pub struct StationScraper {
    url: String,
    cache_path: PathBuf,
    max_age: Duration,
}

impl StationScraper {
    pub fn new(config: &StationConfig, cache_path: PathBuf) -> Self {
        Self {
            url: config.station_url.clone(),
            cache_path,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn source(&self) -> &str {
        &self.url
    }

    /// Raw page through the fetch-or-reuse gate. The observation timestamp is
    /// the cache file's mtime to the minute.
    pub async fn fetch_page(&self) -> Result<(String, NaiveDateTime, CacheOutcome)> {
        let url = self.url.clone();
        let (body, modified, outcome) =
            cache::fetch_or_reuse(&self.cache_path, self.max_age, || async move {
                fetch_text(&url).await
            })
            .await?;
        Ok((body, cache::minute_of(modified), outcome))
    }

    pub async fn scrape(
        &self,
        store: &JsonSnapshotStore<WeatherReading>,
    ) -> Result<(WeatherReading, SnapshotStatus)> {
        let (html, observed_at, _) = self.fetch_page().await?;
        let reading = parse_observation_table(&html, observed_at)?;
        let status = store.store_if_newer(&reading)?;
        info!("🌡️ {} at {}: {:?}", self.url, observed_at, status);
        Ok((reading, status))
    }
}

/// Extract the typed observation record from the bordered table.
pub fn parse_observation_table(html: &str, observed_at: NaiveDateTime) -> Result<WeatherReading> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse(r#"table[border="1"] tr"#).unwrap();
    let rows: Vec<ElementRef> = document.select(&row_selector).collect();
    if rows.is_empty() {
        return Err(Error::UnexpectedShape(
            "no bordered observation table in page".to_string(),
        ));
    }

    let wind = match value_cell(&rows, ROW_WIND, "wind")? {
        Fragment::Empty => None,
        fragment => Some(fragment.as_str()?),
    };

    Ok(WeatherReading {
        observed_at,
        temperature: field_float(&rows, ROW_TEMPERATURE, "temperature")?,
        humidity: field_int(&rows, ROW_HUMIDITY, "humidity")?,
        dewpoint: field_float(&rows, ROW_DEWPOINT, "dewpoint")?,
        wind,
        barometer: field_float(&rows, ROW_BAROMETER, "barometer")?,
        today_rain: field_float(&rows, ROW_TODAY_RAIN, "today_rain")?,
        yearly_rain: field_float(&rows, ROW_YEARLY_RAIN, "yearly_rain")?,
        wind_chill: field_float(&rows, ROW_WIND_CHILL, "wind_chill")?,
        thw_index: field_float(&rows, ROW_THW_INDEX, "thw_index")?,
        heat_index: field_float(&rows, ROW_HEAT_INDEX, "heat_index")?,
    })
}

fn value_cell(rows: &[ElementRef], row: usize, field: &str) -> Result<Fragment> {
    let row_el = rows.get(row - 1).ok_or_else(|| {
        Error::UnexpectedShape(format!(
            "observation table has no row {} ({})",
            row, field
        ))
    })?;
    let cell_selector = Selector::parse("td").unwrap();
    let cell = row_el.select(&cell_selector).nth(1).ok_or_else(|| {
        Error::UnexpectedShape(format!("row {} ({}) has no value cell", row, field))
    })?;
    Ok(fragment_of(cell))
}

fn field_float(rows: &[ElementRef], row: usize, field: &str) -> Result<f64> {
    value_cell(rows, row, field)?
        .as_float()
        .map_err(|e| annotate(e, field))
}

fn field_int(rows: &[ElementRef], row: usize, field: &str) -> Result<i64> {
    value_cell(rows, row, field)?
        .as_int()
        .map_err(|e| annotate(e, field))
}

// Keep the failing field name in the message so a drifted page diagnoses
// itself from the error alone.
fn annotate(e: Error, field: &str) -> Error {
    match e {
        Error::UnexpectedShape(msg) => Error::UnexpectedShape(format!("{}: {}", field, msg)),
        Error::NoNumberFound(msg) => Error::NoNumberFound(format!("{}: {}", field, msg)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aero_core::cache::fetch_or_reuse;
    use chrono::NaiveDate;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn value_row(value: &str) -> String {
        format!(
            "<tr><td><font>label</font></td><td><font><strong><small><font>{}</font></small></strong></font></td></tr>",
            value
        )
    }

    fn station_page() -> String {
        let mut rows = String::new();
        rows.push_str("<tr><td colspan=\"2\">Station Conditions</td></tr>");
        rows.push_str("<tr><td>Updated</td><td>10:21</td></tr>");
        rows.push_str(&value_row("73.1&deg;F")); // temperature
        rows.push_str(&value_row("61%")); // humidity
        rows.push_str(&value_row("29.9&deg;F")); // dewpoint
        rows.push_str(&value_row("NNW at 4 mph")); // wind
        rows.push_str(&value_row("29.988 in")); // barometer
        rows.push_str(&value_row("0.00 in")); // today's rain
        rows.push_str(&value_row("1.32 in")); // yearly rain
        rows.push_str(&value_row("73.1&deg;F")); // wind chill
        rows.push_str(&value_row("72.4&deg;F")); // thw index
        rows.push_str(&value_row("72.4&deg;F")); // heat index
        format!(
            "<html><body><table border=\"1\">{}</table></body></html>",
            rows
        )
    }

    fn noon() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 4, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_observation_table() {
        let reading = parse_observation_table(&station_page(), noon()).unwrap();
        assert_eq!(reading.temperature, 73.1);
        assert_eq!(reading.humidity, 61);
        assert_eq!(reading.dewpoint, 29.9);
        assert_eq!(reading.wind.as_deref(), Some("NNW at 4 mph"));
        assert_eq!(reading.barometer, 29.988);
        assert_eq!(reading.today_rain, 0.0);
        assert_eq!(reading.yearly_rain, 1.32);
        assert_eq!(reading.heat_index, 72.4);
    }

    #[test]
    fn test_parse_blank_wind_cell_as_calm() {
        let page = station_page().replace("NNW at 4 mph", "");
        let reading = parse_observation_table(&page, noon()).unwrap();
        assert_eq!(reading.wind, None);
    }

    #[test]
    fn test_missing_table_is_unexpected_shape() {
        let result = parse_observation_table("<html><body><p>down for maintenance</p></body></html>", noon());
        assert!(matches!(result, Err(Error::UnexpectedShape(_))));
    }

    #[test]
    fn test_garbage_value_names_the_field() {
        let page = station_page().replace("29.988 in", "n/a");
        match parse_observation_table(&page, noon()) {
            Err(Error::NoNumberFound(msg)) => assert!(msg.contains("barometer")),
            other => panic!("expected NoNumberFound, got {:?}", other),
        }
    }

    // Scenario: no cached artifact yet. One fetch, extraction, first persist.
    #[tokio::test]
    async fn test_cold_run_fetches_extracts_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("weather.html");
        let fetches = AtomicUsize::new(0);

        let (html, modified, outcome) =
            fetch_or_reuse(&cache_path, DEFAULT_MAX_AGE, || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(station_page())
            })
            .await
            .unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(outcome, CacheOutcome::Downloaded);

        let reading = parse_observation_table(&html, cache::minute_of(modified)).unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("weather.json"));
        assert_eq!(store.store_if_newer(&reading).unwrap(), SnapshotStatus::New);
    }

    // Scenario: artifact present and fresh. Zero fetches, extraction proceeds
    // on the existing content.
    #[tokio::test]
    async fn test_fresh_cache_skips_fetch_and_still_extracts() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("weather.html");
        fs::write(&cache_path, station_page()).unwrap();
        let fetches = AtomicUsize::new(0);

        let (html, modified, outcome) =
            fetch_or_reuse(&cache_path, DEFAULT_MAX_AGE, || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(String::new())
            })
            .await
            .unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert_eq!(outcome, CacheOutcome::Reused);

        let reading = parse_observation_table(&html, cache::minute_of(modified)).unwrap();
        assert_eq!(reading.humidity, 61);
    }
}
