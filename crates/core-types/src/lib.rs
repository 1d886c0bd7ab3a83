pub mod enums;
pub mod error;
pub mod structs;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use enums::Indicator;
pub use error::CoreError;
pub use structs::Record;
pub use table::{Table, TableFilter};
