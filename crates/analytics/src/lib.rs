//! # Climate Analytics Engine
//!
//! This crate answers the exploratory questions asked of the climate dataset and
//! computes the aggregates the dashboard draws its charts from.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   terminals or HTTP. It depends only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** The `MetricsEngine` takes an immutable `Table` as
//!   input and produces plain result structs. Missing readings are skipped, never
//!   read as zero, and an empty input is reported as `None` or `AnalyticsError::NoData`.
//!
//! ## Public API
//!
//! - `MetricsEngine`: the twelve report questions and the dashboard aggregates.
//! - `ClimateReport`: all twelve answers bundled for printing or serialization.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod group;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use dashboard::{CorrelationMatrix, Kpis, ScatterPoint, YearValue};
pub use engine::MetricsEngine;
pub use error::AnalyticsError;
pub use report::{
    ClimateReport, CountryValue, ForestCo2, PopulationCo2Trend, RenewableSplit, ReportOptions,
    ScoreBoard, TemperatureDelta,
};
