//! # Trackline
//!
//! Turn Epic, Feature, and Dependency exports into a dated program status report.
//!
//! ## Usage
//!
//! ```bash
//! trackline --epics epics.csv --features features.csv --dependencies dependencies.csv
//! ```
//!
//! ## Modules
//!
//! - `builder` - Report pipeline orchestration from export paths to written file
//! - `error` - Error types for loading, cleaning, and writing
//! - `model` - Typed Epic, Feature, and Dependency records cleaned from raw tables
//! - `report` - Section formatters and the dated report writer
//! - `table` - Raw CSV table loading with header-based column lookup
pub mod builder;
pub mod error;
pub mod model;
pub mod report;
pub mod table;

pub use builder::ReportBuilder;
pub use error::{Error, Result};
