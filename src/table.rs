//! Raw tabular layer: CSV exports read into column headers plus string rows.
//!
//! Nothing is typed or cleaned here; that is the model layer's job. Column
//! names and row order are preserved exactly as found in the file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// One loaded export table.
#[derive(Debug, Clone)]
pub struct Table {
    name: &'static str,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a CSV file into memory, preserving column names and row order.
    pub fn load(name: &'static str, path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::DataAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(name, file)?;
        debug!(
            "loaded {} with {} rows from {}",
            name,
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV from any reader. The first record is the header row.
    pub fn from_reader<R: Read>(name: &'static str, reader: R) -> Result<Self> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers: Vec<String> = csv
            .headers()
            .map_err(|source| Error::Csv { table: name, source })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record.map_err(|source| Error::Csv { table: name, source })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    /// Table name as used in error messages ("Epics", "Features", ...).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Column headers in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (the header row is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of an exact-match column header.
    pub fn column(&self, column: &'static str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header == column)
            .ok_or(Error::Schema {
                table: self.name,
                column,
            })
    }

    /// Cell text at a row and column index.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// The three exports of one report run.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub epics: Table,
    pub features: Table,
    pub dependencies: Table,
}

impl RawTables {
    /// Load all three inputs. Any failure aborts before a report is written.
    pub fn load(epics: &Path, features: &Path, dependencies: &Path) -> Result<Self> {
        Ok(Self {
            epics: Table::load("Epics", epics)?,
            features: Table::load("Features", features)?,
            dependencies: Table::load("Dependencies", dependencies)?,
        })
    }
}
