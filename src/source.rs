//! Supported input formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File formats accepted as pipeline input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Xlsx,
    Xls,
    Csv,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 3] = [SourceFormat::Xlsx, SourceFormat::Xls, SourceFormat::Csv];

    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<SourceFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(SourceFormat::Xlsx),
            "xls" => Some(SourceFormat::Xls),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SourceFormat::Xlsx => "xlsx",
            SourceFormat::Xls => "xls",
            SourceFormat::Csv => "csv",
        }
    }

    /// Whether the format is a workbook rather than delimited text.
    pub fn is_spreadsheet(self) -> bool {
        matches!(self, SourceFormat::Xlsx | SourceFormat::Xls)
    }

    /// Comma-separated list of accepted extensions, for error messages.
    pub fn accepted_list() -> String {
        Self::ALL
            .iter()
            .map(|f| format!(".{}", f.extension()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
