use crate::error::CoreError;
use crate::structs::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The numeric columns of the climate dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Temperature,
    Co2,
    Renewable,
    Forest,
    Population,
    Rainfall,
    ExtremeEvents,
    SeaLevel,
}

impl Indicator {
    /// Every indicator, in the column order of the dataset.
    pub const ALL: [Indicator; 8] = [
        Indicator::Temperature,
        Indicator::Co2,
        Indicator::Renewable,
        Indicator::Forest,
        Indicator::Population,
        Indicator::Rainfall,
        Indicator::ExtremeEvents,
        Indicator::SeaLevel,
    ];

    /// The exact header of the CSV column this indicator is read from.
    pub fn column_name(&self) -> &'static str {
        match self {
            Indicator::Temperature => "Avg Temperature (°C)",
            Indicator::Co2 => "CO2 Emissions (Tons/Capita)",
            Indicator::Renewable => "Renewable Energy (%)",
            Indicator::Forest => "Forest Area (%)",
            Indicator::Population => "Population",
            Indicator::Rainfall => "Rainfall (mm)",
            Indicator::ExtremeEvents => "Extreme Weather Events",
            Indicator::SeaLevel => "Sea Level Rise (mm)",
        }
    }

    /// Short identifier used in query strings and JSON.
    pub fn slug(&self) -> &'static str {
        match self {
            Indicator::Temperature => "temperature",
            Indicator::Co2 => "co2",
            Indicator::Renewable => "renewable",
            Indicator::Forest => "forest",
            Indicator::Population => "population",
            Indicator::Rainfall => "rainfall",
            Indicator::ExtremeEvents => "extreme_events",
            Indicator::SeaLevel => "sea_level",
        }
    }

    /// Reads this indicator from a record. `None` means the field was blank or malformed.
    pub fn value(&self, record: &Record) -> Option<f64> {
        match self {
            Indicator::Temperature => record.avg_temperature,
            Indicator::Co2 => record.co2_per_capita,
            Indicator::Renewable => record.renewable_energy_pct,
            Indicator::Forest => record.forest_area_pct,
            Indicator::Population => record.population,
            Indicator::Rainfall => record.rainfall_mm,
            Indicator::ExtremeEvents => record.extreme_weather_events,
            Indicator::SeaLevel => record.sea_level_rise_mm,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Indicator {
    type Err = CoreError;

    /// Accepts either the slug or the full column header.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Indicator::ALL
            .into_iter()
            .find(|i| i.slug().eq_ignore_ascii_case(needle) || i.column_name() == needle)
            .ok_or_else(|| CoreError::UnknownIndicator(s.to_string()))
    }
}
