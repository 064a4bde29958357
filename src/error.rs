//! Error taxonomy for the validation pipeline.
//!
//! Only [`ConfigurationError`] escapes to callers. The other kinds are caught
//! at the stage boundary and turned into an ERROR stage result.

use std::path::PathBuf;

use crate::source::SourceFormat;

/// Raised while constructing a pipeline, before any stage runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Input file must be file type: {accepted} (got {path})", accepted = SourceFormat::accepted_list())]
    InvalidExtension { path: PathBuf },

    #[error("Input file does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("Provided directory does not exist: {0}")]
    OutputDirNotFound(PathBuf),
}

/// Failure of the load stage. Aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("Failed to open {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("{path} contains no worksheets")]
    NoWorksheet { path: PathBuf },

    #[error("Required columns missing from input: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No records remain after filtering")]
    NoRows,

    #[error("No 6 or 4 AMR identified")]
    NoRegisterClass,
}

/// Failure of a single rule check. Reported for that stage only.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Rule '{rule}' is misconfigured: {reason}")]
    InvalidRule { rule: &'static str, reason: String },
}

/// Failure of the report writer.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Section '{label}' cannot be used as a sheet name: {reason}")]
    SheetName { label: String, reason: String },

    #[error("Sections '{first}' and '{second}' both map to sheet '{sheet}'")]
    SheetCollision {
        first: String,
        second: String,
        sheet: String,
    },

    #[error("Failed to build workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to stage report in {dir}: {source}")]
    Io {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move report into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
