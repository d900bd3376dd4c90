//! Forecast CSV ingestion
//!
//! Reads the raw forecast table into typed records and assembles a polars
//! DataFrame. The source file carries a units sub-header as its second
//! physical line, which is skipped by default. Numeric cells that fail to
//! parse are coerced to missing values rather than rejected.

use super::error::{ForecastError, Result};
use csv::ReaderBuilder;
use polars::prelude::*;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

/// Columns the input file must provide
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "longitude",
    "latitude",
    "model",
    "coral_cover_2020",
    "coral_cover_2100",
    "SST_2020",
    "SST_2100",
    "pH_2020",
    "pH_2100",
    "SST_seasonal",
    "PAR",
];

/// Observation columns carried through site aggregation
pub const OBSERVATION_COLUMNS: [&str; 8] = [
    "coral_cover_2020",
    "coral_cover_2100",
    "SST_2020",
    "SST_2100",
    "pH_2020",
    "pH_2100",
    "SST_seasonal",
    "PAR",
];

/// One row of the raw forecast table
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRecord {
    #[serde(deserialize_with = "coerce_f64")]
    pub longitude: Option<f64>,

    #[serde(deserialize_with = "coerce_f64")]
    pub latitude: Option<f64>,

    #[serde(deserialize_with = "coerce_f64")]
    pub model: Option<f64>,

    #[serde(deserialize_with = "coerce_f64")]
    pub coral_cover_2020: Option<f64>,

    #[serde(deserialize_with = "coerce_f64")]
    pub coral_cover_2100: Option<f64>,

    #[serde(rename = "SST_2020", deserialize_with = "coerce_f64")]
    pub sst_2020: Option<f64>,

    #[serde(rename = "SST_2100", deserialize_with = "coerce_f64")]
    pub sst_2100: Option<f64>,

    #[serde(rename = "pH_2020", deserialize_with = "coerce_f64")]
    pub ph_2020: Option<f64>,

    #[serde(rename = "pH_2100", deserialize_with = "coerce_f64")]
    pub ph_2100: Option<f64>,

    #[serde(rename = "SST_seasonal", deserialize_with = "coerce_f64")]
    pub sst_seasonal: Option<f64>,

    #[serde(rename = "PAR", deserialize_with = "coerce_f64")]
    pub par: Option<f64>,
}

/// Deserialize a numeric cell, coercing parse failures to missing
fn coerce_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<f64>().ok()))
}

/// Loaded forecast table plus ingestion bookkeeping
#[derive(Debug)]
pub struct ForecastTable {
    /// Raw records as a DataFrame, one row per (site, model) observation
    pub frame: DataFrame,
    /// Number of rows dropped because they lacked coordinates
    pub dropped_no_coords: usize,
}

impl ForecastTable {
    /// Missing-value counts for the observation columns
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        OBSERVATION_COLUMNS
            .iter()
            .filter_map(|name| {
                self.frame
                    .column(name)
                    .ok()
                    .map(|c| (name.to_string(), c.null_count()))
            })
            .collect()
    }
}

/// Load the forecast CSV from disk
pub fn load_forecast(path: &Path, skip_units_row: bool) -> Result<ForecastTable> {
    let file = std::fs::File::open(path)?;
    read_forecast(file, skip_units_row)
}

/// Read forecast records from any CSV source
///
/// Validates the header against [`REQUIRED_COLUMNS`], optionally skips the
/// units sub-header (the first record after the header), and drops rows
/// without a usable coordinate pair.
pub fn read_forecast<R: Read>(reader: R, skip_units_row: bool) -> Result<ForecastTable> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(ForecastError::MissingColumn(required.to_string()));
        }
    }

    let mut records: Vec<ForecastRecord> = Vec::new();
    let mut dropped_no_coords = 0usize;

    for (index, row) in csv_reader.deserialize().enumerate() {
        if skip_units_row && index == 0 {
            continue;
        }
        let record: ForecastRecord = row?;
        if record.longitude.is_none() || record.latitude.is_none() {
            dropped_no_coords += 1;
            continue;
        }
        records.push(record);
    }

    let frame = records_to_frame(&records)?;
    Ok(ForecastTable {
        frame,
        dropped_no_coords,
    })
}

fn records_to_frame(records: &[ForecastRecord]) -> Result<DataFrame> {
    let longitude: Vec<Option<f64>> = records.iter().map(|r| r.longitude).collect();
    let latitude: Vec<Option<f64>> = records.iter().map(|r| r.latitude).collect();
    let model: Vec<Option<f64>> = records.iter().map(|r| r.model).collect();
    let coral_2020: Vec<Option<f64>> = records.iter().map(|r| r.coral_cover_2020).collect();
    let coral_2100: Vec<Option<f64>> = records.iter().map(|r| r.coral_cover_2100).collect();
    let sst_2020: Vec<Option<f64>> = records.iter().map(|r| r.sst_2020).collect();
    let sst_2100: Vec<Option<f64>> = records.iter().map(|r| r.sst_2100).collect();
    let ph_2020: Vec<Option<f64>> = records.iter().map(|r| r.ph_2020).collect();
    let ph_2100: Vec<Option<f64>> = records.iter().map(|r| r.ph_2100).collect();
    let sst_seasonal: Vec<Option<f64>> = records.iter().map(|r| r.sst_seasonal).collect();
    let par: Vec<Option<f64>> = records.iter().map(|r| r.par).collect();

    let frame = df!(
        "longitude" => longitude,
        "latitude" => latitude,
        "model" => model,
        "coral_cover_2020" => coral_2020,
        "coral_cover_2100" => coral_2100,
        "SST_2020" => sst_2020,
        "SST_2100" => sst_2100,
        "pH_2020" => ph_2020,
        "pH_2100" => ph_2100,
        "SST_seasonal" => sst_seasonal,
        "PAR" => par,
    )?;

    Ok(frame)
}
