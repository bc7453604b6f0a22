use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp key format shared by every snapshot file.
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Accessor for the identifying timestamp of a persisted record.
/// The snapshot store only overwrites a record with a strictly newer one.
pub trait Timestamped {
    fn observed_at(&self) -> NaiveDateTime;
}

/// Serde helper for `NaiveDateTime` in the minute-resolution key format.
pub mod minute_ts {
    use super::MINUTE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(MINUTE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, MINUTE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One observation scraped from the station status page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    #[serde(with = "minute_ts")]
    pub observed_at: NaiveDateTime,
    pub temperature: f64,
    pub humidity: i64,
    pub dewpoint: f64,
    /// The station leaves this cell blank when calm.
    pub wind: Option<String>,
    pub barometer: f64,
    pub today_rain: f64,
    pub yearly_rain: f64,
    pub wind_chill: f64,
    pub thw_index: f64,
    pub heat_index: f64,
}

impl Timestamped for WeatherReading {
    fn observed_at(&self) -> NaiveDateTime {
        self.observed_at
    }
}

/// One reading from the indoor air-quality sensor, units fixed by the
/// manufacturer protocol: %rH, Bq/m3, degF, hPa, ppm, ppb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndoorReading {
    #[serde(with = "minute_ts")]
    pub observed_at: NaiveDateTime,
    pub humidity: f64,
    /// -1 when the sensor reports an out-of-range radon count.
    pub radon_st_avg: i32,
    pub radon_lt_avg: i32,
    pub temperature: f64,
    pub pressure: f64,
    pub co2: f64,
    pub voc: f64,
}

impl Timestamped for IndoorReading {
    fn observed_at(&self) -> NaiveDateTime {
        self.observed_at
    }
}

/// Yesterday's numbers from the rain-gauge text product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainReport {
    pub report_date: NaiveDate,
    pub high_temp: i64,
    pub low_temp: i64,
    pub precipitation: f64,
}
