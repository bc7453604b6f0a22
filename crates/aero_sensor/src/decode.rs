use chrono::NaiveDateTime;

use aero_core::types::IndoorReading;
use aero_core::{Error, Result};

/// Current-values characteristic of the air sensor.
pub const CURRENT_VALUES_UUID: &str = "b42e2a68-ade7-11e4-89d3-123b93f75cba";

/// Four header bytes followed by eight little-endian words.
const PAYLOAD_LEN: usize = 20;

/// Only payload version 1 is documented by the manufacturer.
const SUPPORTED_VERSION: u8 = 1;

/// Radon counts above this are sensor error codes, reported as -1.
const RADON_MAX: u16 = 16383;

// Word positions within the payload body.
const WORD_RADON_ST: usize = 0;
const WORD_RADON_LT: usize = 1;
const WORD_TEMPERATURE: usize = 2;
const WORD_PRESSURE: usize = 3;
const WORD_CO2: usize = 4;
const WORD_VOC: usize = 5;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Decode the fixed-layout payload into a typed reading.
///
/// Field semantics are fixed by the manufacturer protocol: humidity in
/// %rH at half-percent resolution, radon averages in Bq/m3, temperature
/// in centi-degrees C (stored in the record as degF), pressure in
/// fiftieths of an hPa, CO2 in ppm, VOC in ppb.
pub fn decode_reading(raw: &[u8], observed_at: NaiveDateTime) -> Result<IndoorReading> {
    if raw.len() != PAYLOAD_LEN {
        return Err(Error::Sensor(format!(
            "payload is {} bytes, expected {}",
            raw.len(),
            PAYLOAD_LEN
        )));
    }
    let version = raw[0];
    if version != SUPPORTED_VERSION {
        return Err(Error::Sensor(format!("unknown payload version {}", version)));
    }
    let celsius = f64::from(word(raw, WORD_TEMPERATURE)) / 100.0;
    Ok(IndoorReading {
        observed_at,
        humidity: f64::from(raw[1]) / 2.0,
        radon_st_avg: radon_of(word(raw, WORD_RADON_ST)),
        radon_lt_avg: radon_of(word(raw, WORD_RADON_LT)),
        temperature: celsius_to_fahrenheit(celsius),
        pressure: f64::from(word(raw, WORD_PRESSURE)) / 50.0,
        co2: f64::from(word(raw, WORD_CO2)),
        voc: f64::from(word(raw, WORD_VOC)),
    })
}

fn word(raw: &[u8], index: usize) -> u16 {
    u16::from_le_bytes([raw[4 + 2 * index], raw[5 + 2 * index]])
}

fn radon_of(count: u16) -> i32 {
    if count <= RADON_MAX {
        i32::from(count)
    } else {
        -1
    }
}
