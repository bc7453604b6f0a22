use chrono::{Duration, Local, NaiveDate};
use regex::Regex;
use scraper::Html;
use tracing::info;

use aero_core::config::RainConfig;
use aero_core::extract::Fragment;
use aero_core::types::RainReport;
use aero_core::{Error, Result};
use aero_storage::CsvSeriesStore;

use crate::dom::select_fragment;
use crate::fetch_text;

/// Scraper for the rain-gauge climate text product.
///
/// The report covers yesterday: high temperature, overnight low, and
/// precipitation over the last 24 hours. `M` (missing) and `T` (trace)
/// precipitation both count as zero.
pub struct RainScraper {
    url: String,
    pattern: Regex,
}

impl RainScraper {
    pub fn new(config: &RainConfig) -> Result<Self> {
        let pattern = Regex::new(&config.rain_regex).map_err(|e| {
            Error::Config(format!("bad rain_regex {:?}: {}", config.rain_regex, e))
        })?;
        Ok(Self {
            url: config.rain_data_url.clone(),
            pattern,
        })
    }

    pub fn source(&self) -> &str {
        &self.url
    }

    /// Fetch the product page and pull out the report body.
    pub async fn fetch_report(&self) -> Result<String> {
        let html = fetch_text(&self.url).await?;
        extract_report(&html)
    }

    /// Apply the configured pattern to the report body. Capture groups are
    /// high temperature, low temperature, precipitation.
    pub fn parse(&self, report: &str, report_date: NaiveDate) -> Result<RainReport> {
        let captures = self.pattern.captures(report).ok_or_else(|| {
            Error::NoNumberFound(format!(
                "report from {} did not match {:?}: {}",
                self.url,
                self.pattern.as_str(),
                report.trim()
            ))
        })?;
        let high_temp = capture_int(&captures, 1, report)?;
        let low_temp = capture_int(&captures, 2, report)?;
        let precipitation = match captures.get(3).map(|m| m.as_str()) {
            Some("M") | Some("T") => 0.0,
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| Error::NoNumberFound(raw.to_string()))?,
            None => {
                return Err(Error::NoNumberFound(format!(
                    "no precipitation capture in {}",
                    report.trim()
                )))
            }
        };
        Ok(RainReport {
            report_date,
            high_temp,
            low_temp,
            precipitation,
        })
    }

    pub async fn scrape(&self, store: &CsvSeriesStore) -> Result<(RainReport, bool)> {
        let body = self.fetch_report().await?;
        let report = self.parse(&body, yesterday())?;
        let appended = store.append_unique(report.report_date, report.precipitation)?;
        info!(
            "🌧️ {}: high {} low {} pcpn {} (appended: {})",
            report.report_date, report.high_temp, report.low_temp, report.precipitation, appended
        );
        Ok((report, appended))
    }
}

/// The report text lives in a `<pre class="glossaryProduct">` block.
pub fn extract_report(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    match select_fragment(&document, "pre.glossaryProduct")? {
        Fragment::Empty => Err(Error::UnexpectedShape(
            "no <pre class=\"glossaryProduct\"> in product page".to_string(),
        )),
        fragment => fragment.as_str(),
    }
}

fn capture_int(captures: &regex::Captures<'_>, index: usize, report: &str) -> Result<i64> {
    let m = captures.get(index).ok_or_else(|| {
        Error::NoNumberFound(format!("no capture group {} in {}", index, report.trim()))
    })?;
    m.as_str()
        .parse::<i64>()
        .map_err(|_| Error::NoNumberFound(m.as_str().to_string()))
}

fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}
