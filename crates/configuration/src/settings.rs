use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; anything left out falls back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the climate CSV lives.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    pub path: PathBuf,
}

/// Parameters for the batch report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// How many countries the ranked questions keep (top emitters, improvers, best/worst).
    pub top_k: usize,
    /// How many value pairs the sample questions print.
    pub sample_size: usize,
    pub format: OutputFormat,
}

/// How the batch report is written to standard output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One labelled line per question.
    #[default]
    Text,
    /// A bordered table per question.
    Table,
    /// The full report as JSON.
    Json,
}

/// Cut-offs used to classify countries by their average indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Thresholds {
    #[serde(default)]
    pub triple_challenge: ChallengeThresholds,
    #[serde(default)]
    pub leaders: LeaderThresholds,
}

/// High emitters with little renewable energy and little forest.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChallengeThresholds {
    pub co2_above: f64,
    pub renewable_below: f64,
    pub forest_below: f64,
}

/// Low emitters with a large renewable share and large forest cover.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LeaderThresholds {
    pub co2_below: f64,
    pub renewable_above: f64,
    pub forest_above: f64,
}

/// Bind address and defaults for the dashboard server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Number of countries pre-selected when the dashboard opens.
    pub default_country_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("climate_change_dataset.csv"),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            sample_size: 5,
            format: OutputFormat::Text,
        }
    }
}

impl Default for ChallengeThresholds {
    fn default() -> Self {
        Self {
            co2_above: 50.0,
            renewable_below: 20.0,
            forest_below: 30.0,
        }
    }
}

impl Default for LeaderThresholds {
    fn default() -> Self {
        Self {
            co2_below: 20.0,
            renewable_above: 40.0,
            forest_above: 40.0,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            default_country_count: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
