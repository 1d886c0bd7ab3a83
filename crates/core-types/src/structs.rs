use serde::{Deserialize, Serialize};

/// One row of the climate dataset: a country, a year and its measured indicators.
///
/// Every measurement is optional. A `None` field was blank or unparseable in the
/// source file and must be left out of any aggregate it would feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub country: Option<String>,
    pub year: Option<i32>,
    /// Average temperature in °C.
    pub avg_temperature: Option<f64>,
    /// CO2 emissions in tons per capita.
    pub co2_per_capita: Option<f64>,
    pub renewable_energy_pct: Option<f64>,
    pub forest_area_pct: Option<f64>,
    pub population: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub extreme_weather_events: Option<f64>,
    pub sea_level_rise_mm: Option<f64>,
}

impl Record {
    /// Creates an otherwise empty record for `country` in `year`.
    pub fn new(country: impl Into<String>, year: i32) -> Self {
        Self {
            country: Some(country.into()),
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn is_country(&self, name: &str) -> bool {
        self.country() == Some(name)
    }
}
