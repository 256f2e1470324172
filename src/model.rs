//! Typed record layer and the cleaning/transform step.
//!
//! `Portfolio::from_raw` converts the raw string tables into typed records,
//! applying the declared per-column parsers: progress coercion, Needed-By
//! date parsing, priority parsing, and the Delivery-PI derivation. It is a
//! pure function; the raw tables are left untouched and the resulting
//! portfolio is read-only for every downstream stage.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::{RawTables, Table};

/// Dependency priority. The export schema declares a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// True for the priorities the cross-reference report cares about.
    pub fn is_critical_or_high(self) -> bool {
        matches!(self, Priority::Critical | Priority::High)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Critical" => Ok(Priority::Critical),
            "High" => Ok(Priority::High),
            "Medium" => Ok(Priority::Medium),
            "Low" => Ok(Priority::Low),
            _ => Err("unknown priority".to_string()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One epic row after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Epic {
    pub id: i64,
    pub title: String,
    pub state: String,
    pub blocked: bool,
    pub mvp: bool,
    /// Completion fraction in [0, 1].
    pub progress: f64,
    /// Comma-separated planning period labels, as exported.
    pub program_increments: String,
    /// Last token of `program_increments`. Derived, never input directly.
    pub delivery_pi: String,
}

/// One feature row after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub title: String,
    pub blocked: bool,
    pub progress: f64,
}

/// One dependency row after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    pub id: i64,
    pub title: String,
    /// Title of the feature this dependency blocks; best-effort join key.
    pub feature: String,
    pub priority: Priority,
    /// Open set: "Done", "Blocked", and whatever else the tracker exports.
    pub status: String,
    pub needed_by: NaiveDate,
}

/// The cleaned, read-only view of one report run's data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    pub epics: Vec<Epic>,
    pub features: Vec<Feature>,
    pub dependencies: Vec<Dependency>,
}

impl Portfolio {
    /// Clean and type the raw exports.
    pub fn from_raw(raw: &RawTables) -> Result<Self> {
        let epics = clean_epics(&raw.epics)?;
        let features = clean_features(&raw.features)?;
        let dependencies = clean_dependencies(&raw.dependencies)?;
        debug!(
            "cleaned {} epics, {} features, {} dependencies",
            epics.len(),
            features.len(),
            dependencies.len()
        );
        Ok(Self {
            epics,
            features,
            dependencies,
        })
    }
}

fn clean_epics(table: &Table) -> Result<Vec<Epic>> {
    let id = table.column("Id")?;
    let title = table.column("Title")?;
    let state = table.column("State")?;
    let blocked = table.column("Blocked")?;
    let mvp = table.column("MVP")?;
    let progress = table.column("Epic Progress")?;
    let increments = table.column("Program Increments")?;

    let mut epics = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let program_increments = table.cell(row, increments).to_string();
        let delivery = delivery_pi(&program_increments).to_string();
        epics.push(Epic {
            id: parse_id(table, row, "Id", id)?,
            title: table.cell(row, title).to_string(),
            state: table.cell(row, state).to_string(),
            blocked: is_yes(table.cell(row, blocked)),
            mvp: is_yes(table.cell(row, mvp)),
            progress: parse_progress_cell(table, row, "Epic Progress", progress)?,
            program_increments,
            delivery_pi: delivery,
        });
    }
    Ok(epics)
}

fn clean_features(table: &Table) -> Result<Vec<Feature>> {
    let title = table.column("Title")?;
    let blocked = table.column("Blocked")?;
    let progress = table.column("Feature Progress")?;

    let mut features = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        features.push(Feature {
            title: table.cell(row, title).to_string(),
            blocked: is_yes(table.cell(row, blocked)),
            progress: parse_progress_cell(table, row, "Feature Progress", progress)?,
        });
    }
    Ok(features)
}

fn clean_dependencies(table: &Table) -> Result<Vec<Dependency>> {
    let id = table.column("Dependency ID")?;
    let title = table.column("Title")?;
    let feature = table.column("Feature")?;
    let priority = table.column("Priority")?;
    let status = table.column("Status")?;
    let needed_by = table.column("Needed By")?;

    let mut dependencies = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let priority_cell = table.cell(row, priority);
        let needed_cell = table.cell(row, needed_by);
        dependencies.push(Dependency {
            id: parse_id(table, row, "Dependency ID", id)?,
            title: table.cell(row, title).to_string(),
            feature: table.cell(row, feature).to_string(),
            priority: priority_cell.parse().map_err(|reason| Error::Format {
                table: table.name(),
                row: row + 1,
                column: "Priority",
                value: priority_cell.to_string(),
                reason,
            })?,
            status: table.cell(row, status).to_string(),
            needed_by: parse_needed_by(needed_cell).map_err(|reason| Error::Format {
                table: table.name(),
                row: row + 1,
                column: "Needed By",
                value: needed_cell.to_string(),
                reason,
            })?,
        });
    }
    Ok(dependencies)
}

/// Yes/no flag mapping: exactly `"Yes"` is true, anything else false.
fn is_yes(cell: &str) -> bool {
    cell == "Yes"
}

fn parse_id(table: &Table, row: usize, column: &'static str, index: usize) -> Result<i64> {
    let value = table.cell(row, index);
    value.trim().parse().map_err(|_| Error::Format {
        table: table.name(),
        row: row + 1,
        column,
        value: value.to_string(),
        reason: "not an integer id".to_string(),
    })
}

fn parse_progress_cell(
    table: &Table,
    row: usize,
    column: &'static str,
    index: usize,
) -> Result<f64> {
    let value = table.cell(row, index);
    parse_progress(value).map_err(|reason| Error::Format {
        table: table.name(),
        row: row + 1,
        column,
        value: value.to_string(),
        reason,
    })
}

/// Coerce a progress cell to a numeric fraction.
///
/// Accepts a float literal (`0.5`), a ratio of two numbers (`3/4`), or a
/// trailing-percent form (`50%`). Everything else is an error, reported as
/// the reason string.
pub fn parse_progress(value: &str) -> std::result::Result<f64, String> {
    let text = value.trim();
    if text.is_empty() {
        return Err("empty progress value".to_string());
    }
    if let Some(percent) = text.strip_suffix('%') {
        return percent
            .trim()
            .parse::<f64>()
            .map(|number| number / 100.0)
            .map_err(|_| "not a percentage".to_string());
    }
    if let Some((numerator, denominator)) = text.split_once('/') {
        let numerator: f64 = numerator
            .trim()
            .parse()
            .map_err(|_| "not a ratio of numbers".to_string())?;
        let denominator: f64 = denominator
            .trim()
            .parse()
            .map_err(|_| "not a ratio of numbers".to_string())?;
        if denominator == 0.0 {
            return Err("ratio has a zero denominator".to_string());
        }
        return Ok(numerator / denominator);
    }
    text.parse().map_err(|_| "not a number".to_string())
}

/// Parse a Needed-By cell into a calendar date.
///
/// Spreadsheet exports carry either a plain date or a date-time; the
/// time-of-day part is dropped.
pub fn parse_needed_by(value: &str) -> std::result::Result<NaiveDate, String> {
    let text = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(stamp.date());
    }
    NaiveDate::parse_from_str(text, "%m/%d/%Y").map_err(|_| "not a recognized date".to_string())
}

/// Last comma-separated token of a Program Increments field.
///
/// The token is not trimmed: `"PI1, PI2"` yields `" PI2"`, exactly as split.
pub fn delivery_pi(program_increments: &str) -> &str {
    program_increments
        .rsplit(',')
        .next()
        .unwrap_or(program_increments)
}
