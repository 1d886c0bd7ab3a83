//! # Climate Dataset Loader
//!
//! Reads the climate CSV once and turns every row into a typed `Record`.
//! Blank and non-numeric fields become `None` here, so nothing downstream ever
//! has to re-parse a raw string.

pub mod error;
pub mod loader;

pub use error::DatasetError;
pub use loader::{LoadStats, load_table, read_table};
