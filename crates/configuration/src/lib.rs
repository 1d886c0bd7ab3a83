use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    ChallengeThresholds, DatasetSettings, LeaderThresholds, LoggingSettings, OutputFormat,
    ReportSettings, ServerSettings, Settings, Thresholds,
};

/// Loads the application configuration.
///
/// Values are layered: built-in defaults, then the TOML file at `path` (which
/// may be absent), then `CLIMATE__SECTION__KEY` environment variables.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("CLIMATE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(settings)
}

impl Settings {
    /// Rejects values that would make the report or server meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "report.top_k must be at least 1".to_string(),
            ));
        }
        if self.report.sample_size == 0 {
            return Err(ConfigError::ValidationError(
                "report.sample_size must be at least 1".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_config(&dir.path().join("climate.toml")).unwrap();

        assert_eq!(settings.report.top_k, 5);
        assert_eq!(settings.report.format, OutputFormat::Text);
        assert_eq!(settings.thresholds.triple_challenge.co2_above, 50.0);
        assert_eq!(settings.thresholds.leaders.forest_above, 40.0);
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let file = write_config(
            r#"
            [dataset]
            path = "data/climate.csv"

            [report]
            top_k = 3
            format = "json"

            [thresholds.leaders]
            co2_below = 10.0
            "#,
        );
        let settings = load_config(file.path()).unwrap();

        assert_eq!(settings.dataset.path, Path::new("data/climate.csv"));
        assert_eq!(settings.report.top_k, 3);
        assert_eq!(settings.report.sample_size, 5);
        assert_eq!(settings.report.format, OutputFormat::Json);
        assert_eq!(settings.thresholds.leaders.co2_below, 10.0);
        assert_eq!(settings.thresholds.leaders.renewable_above, 40.0);
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let file = write_config("[report]\ntop_k = 0\n");
        match load_config(file.path()) {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("top_k")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
