use crate::error::DatasetError;
use core_types::{Record, Table};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Counters gathered while turning raw rows into records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    /// Non-blank fields that failed to parse and were treated as absent.
    pub malformed_fields: usize,
}

/// A row exactly as it appears in the file, keyed by header name.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Avg Temperature (°C)")]
    avg_temperature: String,
    #[serde(rename = "CO2 Emissions (Tons/Capita)")]
    co2_per_capita: String,
    #[serde(rename = "Renewable Energy (%)")]
    renewable_energy_pct: String,
    #[serde(rename = "Forest Area (%)")]
    forest_area_pct: String,
    #[serde(rename = "Population")]
    population: String,
    #[serde(rename = "Rainfall (mm)")]
    rainfall_mm: String,
    #[serde(rename = "Extreme Weather Events")]
    extreme_weather_events: String,
    #[serde(rename = "Sea Level Rise (mm)")]
    sea_level_rise_mm: String,
}

impl RawRecord {
    fn into_record(self, stats: &mut LoadStats) -> Record {
        let country = self.country.trim();
        Record {
            country: (!country.is_empty()).then(|| country.to_string()),
            year: parse_field(&self.year, stats),
            avg_temperature: parse_measure(&self.avg_temperature, stats),
            co2_per_capita: parse_measure(&self.co2_per_capita, stats),
            renewable_energy_pct: parse_measure(&self.renewable_energy_pct, stats),
            forest_area_pct: parse_measure(&self.forest_area_pct, stats),
            population: parse_measure(&self.population, stats),
            rainfall_mm: parse_measure(&self.rainfall_mm, stats),
            extreme_weather_events: parse_measure(&self.extreme_weather_events, stats),
            sea_level_rise_mm: parse_measure(&self.sea_level_rise_mm, stats),
        }
    }
}

/// Loads the dataset at `path` into an immutable `Table`.
///
/// A missing file is reported as `DatasetError::NotFound` so callers can tell it
/// apart from a file that exists but cannot be read or parsed.
pub fn load_table(path: &Path) -> Result<Table, DatasetError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
        _ => DatasetError::Io(e),
    })?;

    let (table, stats) = read_table(file)?;
    info!(path = %path.display(), rows = stats.rows, "Loaded climate dataset.");
    if stats.malformed_fields > 0 {
        warn!(
            count = stats.malformed_fields,
            "Non-numeric values were treated as missing."
        );
    }
    Ok(table)
}

/// Reads CSV data with a header row from any reader.
pub fn read_table<R: Read>(reader: R) -> Result<(Table, LoadStats), DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    for required in Table::default_headers() {
        if !headers.contains(&required) {
            return Err(DatasetError::MissingColumn(required));
        }
    }

    let mut stats = LoadStats::default();
    let mut records = Vec::new();
    for row in csv_reader.deserialize::<RawRecord>() {
        records.push(row?.into_record(&mut stats));
    }
    stats.rows = records.len();
    debug!(columns = headers.len(), rows = stats.rows, "Parsed climate rows.");

    Ok((Table::new(headers, records), stats))
}

/// Blank means absent. Anything else must parse, or it is counted as malformed.
fn parse_field<T: FromStr>(raw: &str, stats: &mut LoadStats) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            stats.malformed_fields += 1;
            None
        }
    }
}

/// Like `parse_field`, but `NaN` and infinities are malformed too.
fn parse_measure(raw: &str, stats: &mut LoadStats) -> Option<f64> {
    match parse_field::<f64>(raw, stats) {
        Some(v) if v.is_finite() => Some(v),
        Some(_) => {
            stats.malformed_fields += 1;
            None
        }
        None => None,
    }
}
