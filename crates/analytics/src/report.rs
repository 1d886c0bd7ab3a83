use crate::error::AnalyticsError;
use serde::Serialize;

/// A country paired with one derived number (a mean, an improvement or a score).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryValue {
    pub country: String,
    pub value: f64,
}

impl CountryValue {
    pub fn new(country: impl Into<String>, value: f64) -> Self {
        Self {
            country: country.into(),
            value,
        }
    }
}

/// Mean temperature in the earliest and the latest year of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureDelta {
    pub first_year: i32,
    pub last_year: i32,
    /// `None` when no record in `first_year` has a temperature.
    pub first_mean: Option<f64>,
    pub last_mean: Option<f64>,
}

impl TemperatureDelta {
    pub fn change(&self) -> Option<f64> {
        Some(self.last_mean? - self.first_mean?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestCo2 {
    pub country: String,
    pub mean_forest_pct: f64,
    /// Absent, not zero, for a country without any CO2 reading.
    pub mean_co2: Option<f64>,
}

/// First and last readings of population and CO2, in table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationCo2Trend {
    pub country: String,
    pub first_population: f64,
    pub last_population: f64,
    pub first_co2: f64,
    pub last_co2: f64,
}

/// Average renewable share of the top emitters against everybody else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenewableSplit {
    pub top_emitters_mean: Option<f64>,
    pub rest_mean: Option<f64>,
}

/// Countries ranked by the composite score, highest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBoard {
    pub best: Vec<CountryValue>,
    /// The lowest scores, still in descending order. May overlap `best`.
    pub worst: Vec<CountryValue>,
}

/// How many entries the ranked and sampled questions keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_k: usize,
    pub sample_size: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            sample_size: 5,
        }
    }
}

/// The answers to all twelve exploratory questions over one table.
///
/// Every question is computed independently; one that lacks data does not
/// prevent the others from being answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateReport {
    pub total_rows: usize,
    pub headers: Vec<String>,

    /// Q1
    pub temperature_delta: Result<TemperatureDelta, AnalyticsError>,
    /// Q2
    pub top_emitters: Vec<CountryValue>,
    /// Q3: `(renewable %, CO2 per capita)`
    pub renewable_vs_co2: Vec<(f64, f64)>,
    /// Q4
    pub forest_vs_co2: Vec<ForestCo2>,
    /// Q5
    pub population_co2_trend: Vec<PopulationCo2Trend>,
    /// Q6: `(rainfall mm, extreme events)`
    pub rainfall_vs_extreme_events: Vec<(f64, f64)>,
    /// Q7
    pub triple_challenge: Vec<String>,
    /// Q8
    pub climate_leaders: Vec<String>,
    /// Q9: `(CO2 per capita, temperature)`
    pub co2_vs_temperature: Vec<(f64, f64)>,
    /// Q10
    pub renewable_split: RenewableSplit,
    /// Q11
    pub renewable_improvement: Vec<CountryValue>,
    /// Q12
    pub overall_score: ScoreBoard,
}
