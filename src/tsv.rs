//! Tabular serialization of filing-metadata listings.
//!
//! Listing rows are opaque: the remote API decides the field set and this
//! crate passes it through. A [`MetadataTable`] keeps rows in insertion
//! order and grows its column set as new fields appear, so tables for
//! several dates can be concatenated without agreeing on a schema up front.

use serde_json::Value;
use std::path::Path;

use crate::error::Result;

/// One row of a listing response: opaque field-name → value mapping
pub type MetadataRecord = serde_json::Map<String, Value>;

/// An ordered table of listing rows.
///
/// Columns are the union of all row keys in first-seen order; cells missing
/// from a row serialize as empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataTable {
    columns: Vec<String>,
    rows: Vec<MetadataRecord>,
}

impl MetadataTable {
    /// Build a table from rows, discovering columns in first-seen order
    pub fn from_records(records: Vec<MetadataRecord>) -> Self {
        let mut table = Self::default();
        table.extend(records);
        table
    }

    /// Append rows, merging any new columns at the end of the header
    pub fn extend(&mut self, records: impl IntoIterator<Item = MetadataRecord>) {
        for record in records {
            for key in record.keys() {
                if !self.columns.iter().any(|column| column == key) {
                    self.columns.push(key.clone());
                }
            }
            self.rows.push(record);
        }
    }

    /// Append every row of another table, preserving its insertion order
    pub fn concat(&mut self, other: MetadataTable) {
        self.extend(other.rows);
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[MetadataRecord] {
        &self.rows
    }

    /// Serialize as TSV: a header line, then one line per row.
    ///
    /// An empty table serializes as an empty string (no header), since it
    /// has no columns to name.
    pub fn to_tsv(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        let header: Vec<String> = self.columns.iter().map(|c| sanitize(c)).collect();
        out.push_str(&header.join("\t"));
        out.push('\n');

        for row in &self.rows {
            let line: Vec<String> = self
                .columns
                .iter()
                .map(|column| cell(row.get(column)))
                .collect();
            out.push_str(&line.join("\t"));
            out.push('\n');
        }
        out
    }

    /// Write the table to `path`, creating parent directories as needed.
    ///
    /// Overwrites any existing file: rerunning a fetch replaces its output
    /// rather than appending to it.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_tsv())?;
        Ok(())
    }
}

/// Render one JSON value as a TSV cell
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => sanitize(s),
        Some(other) => sanitize(&other.to_string()),
    }
}

/// Replace delimiter characters so a cell cannot break the table shape
fn sanitize(s: &str) -> String {
    if s.contains(['\t', '\n', '\r']) {
        s.replace(['\t', '\n', '\r'], " ")
    } else {
        s.to_string()
    }
}
