//! Normalized record model.
//!
//! Every value is held as text. Missing values are kept distinct from text
//! so callers can tell them apart, but they still render as the `"nan"`
//! sentinel that the empty-field rule compares against.

use std::path::{Path, PathBuf};

use crate::fields::{Field, FIELD_COUNT};
use crate::source::SourceFormat;

/// Text that missing values render as.
pub const EMPTY_SENTINEL: &str = "nan";

/// A single normalized cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Value present in the source, coerced to text.
    Present(String),
    /// The cell existed but was blank or held a missing-value marker.
    Empty,
    /// The row ended before this column.
    Absent,
}

impl Cell {
    /// Text form of the cell. Missing values render as [`EMPTY_SENTINEL`].
    pub fn text(&self) -> &str {
        match self {
            Cell::Present(text) => text,
            Cell::Empty | Cell::Absent => EMPTY_SENTINEL,
        }
    }

    pub fn is_missing(&self) -> bool {
        !matches!(self, Cell::Present(_))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Present(value.to_string())
    }
}

/// One meter asset row, restricted to the required fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    cells: [Cell; FIELD_COUNT],
}

impl Record {
    pub fn new(cells: [Cell; FIELD_COUNT]) -> Self {
        Self { cells }
    }

    /// Build a record from field/text pairs. Unlisted fields are [`Cell::Empty`].
    pub fn from_pairs<'s>(pairs: impl IntoIterator<Item = (Field, &'s str)>) -> Self {
        let mut cells: [Cell; FIELD_COUNT] = std::array::from_fn(|_| Cell::Empty);
        for (field, text) in pairs {
            cells[field.index()] = Cell::from(text);
        }
        Self { cells }
    }

    pub fn cell(&self, field: Field) -> &Cell {
        &self.cells[field.index()]
    }

    /// Text value of `field`, with missing values rendered as the sentinel.
    pub fn text(&self, field: Field) -> &str {
        self.cell(field).text()
    }

    /// Text values in canonical field order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(Cell::text)
    }
}

/// The normalized dataset produced by the loader.
///
/// Checks only ever borrow it; nothing mutates it after loading.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    format: SourceFormat,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(source: impl Into<PathBuf>, format: SourceFormat, records: Vec<Record>) -> Self {
        Self {
            source: source.into(),
            format,
            records,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
