//! CSV loader for per-city trip files.
//!
//! Expected header (the first, unnamed index column is ignored):
//!
//! ```text
//! ,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
//! ```
//!
//! `Gender` and `Birth Year` are optional; whether the header carries them
//! decides the dataset's [`Schema`].

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::dataset::{Dataset, Schema, TripRecord};

const REQUIRED_COLUMNS: [&str; 5] = [
    "Start Time",
    "End Time",
    "Start Station",
    "End Station",
    "User Type",
];
const GENDER_COLUMN: &str = "Gender";
const BIRTH_YEAR_COLUMN: &str = "Birth Year";

/// Seconds may carry a fractional part in some exports.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Debug, Deserialize)]
struct TripRow {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type")]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    /// Written as a float ("1992.0") by the exporter.
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// Loads the trip file for `city` from `path`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_city(city: &str, path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let dataset = read_trips(city, file)?;
    info!(trips = dataset.len(), schema = ?dataset.schema, "City data loaded");
    Ok(dataset)
}

/// Parses trips for `city` from any CSV source.
///
/// # Errors
///
/// Fails when a required column is missing, a timestamp cannot be parsed, or
/// a trip starts outside January–June.
pub fn read_trips<R: Read>(city: &str, reader: R) -> Result<Dataset> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let has_column = |name: &str| headers.iter().any(|h| h.trim() == name);

    for column in REQUIRED_COLUMNS {
        if !has_column(column) {
            bail!("{city} data is missing the required '{column}' column");
        }
    }

    let schema = Schema {
        gender: has_column(GENDER_COLUMN),
        birth_year: has_column(BIRTH_YEAR_COLUMN),
    };
    debug!(?schema, "Detected optional columns");

    let mut records = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        // header is line 1
        let line = index + 2;
        let row: TripRow = result.with_context(|| format!("{city} line {line}"))?;
        records.push(to_record(row).with_context(|| format!("{city} line {line}"))?);
    }

    Ok(Dataset::new(city, schema, records))
}

fn to_record(row: TripRow) -> Result<TripRecord> {
    let start = parse_timestamp(&row.start_time)?;
    let end = parse_timestamp(&row.end_time)?;

    let mut record = TripRecord::new(start, end, row.start_station, row.end_station)?;
    record.user_type = row.user_type.filter(|s| !s.is_empty());
    record.gender = row.gender.filter(|s| !s.is_empty());
    record.birth_year = row.birth_year.and_then(birth_year);
    Ok(record)
}

/// Rounds an exported year to an integer; values that are not a finite
/// number in `i32` range are treated as missing.
fn birth_year(value: f64) -> Option<i32> {
    let rounded = value.round();
    if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&rounded) {
        debug!(value, "Unreadable birth year treated as missing");
        return None;
    }
    Some(rounded as i32)
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid timestamp '{value}'"))
}
