//! Dataset loader.
//!
//! Reads a workbook or delimited file, keeps only the required columns,
//! coerces every value to text and drops rows the checks must never see.

mod coerce;
mod readers;

use std::path::PathBuf;
use tracing::debug;

use crate::config::{FormatPolicy, RuleConfig};
use crate::error::{ConfigurationError, IngestionError};
use crate::fields::{Field, FIELD_COUNT};
use crate::record::{Cell, Dataset, Record};
use crate::source::SourceFormat;

use coerce::coerce_column;
pub(crate) use coerce::float_text;
use readers::read_table;

/// A validated handle on an input file.
#[derive(Debug, Clone)]
pub struct Loader {
    path: PathBuf,
    format: SourceFormat,
}

impl Loader {
    /// Validate the path's extension and existence.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ConfigurationError> {
        let path = path.into();
        let format = SourceFormat::from_path(&path)
            .ok_or_else(|| ConfigurationError::InvalidExtension { path: path.clone() })?;
        if !path.is_file() {
            return Err(ConfigurationError::InputNotFound(path));
        }
        Ok(Self { path, format })
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Read and normalize the file.
    ///
    /// Rows whose Account contains the footer marker are dropped. When the
    /// format policy enables it, only rows whose Register ID starts with one
    /// of the configured prefixes are kept.
    pub fn load(&self, rules: &RuleConfig, policy: &FormatPolicy) -> Result<Dataset, IngestionError> {
        let table = read_table(&self.path, self.format)?;
        let records = normalize(&table, rules, policy)?;
        Ok(Dataset::new(self.path.clone(), self.format, records))
    }
}

fn normalize(
    table: &readers::RawTable,
    rules: &RuleConfig,
    policy: &FormatPolicy,
) -> Result<Vec<Record>, IngestionError> {
    let columns = locate_columns(&table.headers)?;
    let row_count = table.rows.len();

    // Coerce column-wise, over every row, before any filtering.
    let coerced: Vec<Vec<Cell>> = columns
        .iter()
        .map(|&col| {
            let values: Vec<_> = (0..row_count).map(|row| table.value(row, col)).collect();
            coerce_column(&values)
        })
        .collect();

    let mut columns_iter: Vec<_> = coerced.into_iter().map(Vec::into_iter).collect();
    let mut records: Vec<Record> = (0..row_count)
        .map(|_| {
            Record::new(std::array::from_fn(|i| {
                columns_iter[i].next().unwrap_or(Cell::Absent)
            }))
        })
        .collect();
    debug!(rows = records.len(), "read source rows");

    records.retain(|r| !r.text(Field::Account).contains(rules.footer_marker.as_str()));
    debug!(rows = records.len(), marker = %rules.footer_marker, "dropped footer rows");

    if policy.register_prefix_filter {
        records.retain(|r| {
            let register = r.text(Field::RegisterId);
            rules
                .register_prefixes
                .iter()
                .any(|p| register.starts_with(p.as_str()))
        });
        debug!(rows = records.len(), prefixes = ?rules.register_prefixes, "applied register prefix filter");
        if records.is_empty() {
            return Err(IngestionError::NoRegisterClass);
        }
    }

    if records.is_empty() {
        return Err(IngestionError::NoRows);
    }

    Ok(records)
}

/// Column index of every required field, or the list of missing headers.
///
/// Header matching is exact. When a header repeats, the first column wins.
fn locate_columns(headers: &[String]) -> Result<[usize; FIELD_COUNT], IngestionError> {
    let mut found: [Option<usize>; FIELD_COUNT] = [None; FIELD_COUNT];
    for (col, header) in headers.iter().enumerate() {
        if let Some(field) = Field::from_header(header) {
            found[field.index()].get_or_insert(col);
        }
    }

    let missing: Vec<String> = Field::ALL
        .iter()
        .zip(&found)
        .filter(|(_, idx)| idx.is_none())
        .map(|(f, _)| f.header().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestionError::MissingColumns(missing));
    }

    Ok(std::array::from_fn(|i| found[i].unwrap_or_default()))
}
