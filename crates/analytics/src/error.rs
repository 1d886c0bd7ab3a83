use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NoData(String),
}
