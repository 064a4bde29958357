//! Raw table readers for delimited text and workbooks.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use super::coerce::RawValue;
use crate::error::IngestionError;
use crate::source::SourceFormat;

/// Header row plus raw data rows, as read from the first sheet.
#[derive(Debug, Default)]
pub(crate) struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

static ABSENT: RawValue = RawValue::Absent;

impl RawTable {
    /// Value at `row`/`col`, or [`RawValue::Absent`] past the end of a short row.
    pub fn value(&self, row: usize, col: usize) -> &RawValue {
        self.rows[row].get(col).unwrap_or(&ABSENT)
    }
}

pub(crate) fn read_table(path: &Path, format: SourceFormat) -> Result<RawTable, IngestionError> {
    match format {
        SourceFormat::Csv => read_csv(path),
        SourceFormat::Xlsx | SourceFormat::Xls => read_workbook(path),
    }
}

fn read_csv(path: &Path) -> Result<RawTable, IngestionError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestionError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let decode = |e: csv::Error| IngestionError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let headers = reader
        .headers()
        .map_err(decode)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(decode)?;
        rows.push(record.iter().map(RawValue::from_text).collect());
    }

    Ok(RawTable { headers, rows })
}

fn read_workbook(path: &Path) -> Result<RawTable, IngestionError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestionError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestionError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| IngestionError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Ok(RawTable::default()),
    };
    let rows = rows.map(|row| row.iter().map(raw_value).collect()).collect();

    Ok(RawTable { headers, rows })
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn raw_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Missing,
        Data::String(s) => {
            if super::coerce::MISSING_MARKERS.contains(&s.as_str()) {
                RawValue::Missing
            } else {
                RawValue::Text(s.clone())
            }
        }
        Data::Int(i) => RawValue::Int {
            value: *i,
            verbatim: None,
        },
        Data::Float(f) => RawValue::from_number(*f),
        Data::Bool(b) => RawValue::Bool {
            value: *b,
            verbatim: None,
        },
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => RawValue::Text(naive.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => RawValue::from_number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
        Data::Error(e) => {
            let text = e.to_string();
            if text == "#N/A" {
                RawValue::Missing
            } else {
                RawValue::Text(text)
            }
        }
    }
}
