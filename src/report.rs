//! Report writer: one worksheet per violation subset.
//!
//! The workbook is built in a temporary file inside the output directory and
//! moved into place only once it is complete, so a failed write never leaves
//! a partial report at the final path.

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::WriteError;
use crate::fields::Field;
use crate::violations::Violations;

/// Maximum worksheet name length allowed by Excel.
pub const MAX_SHEET_NAME: usize = 31;

/// Sheet written when no rule found anything.
pub const NO_VIOLATIONS_SHEET: &str = "No Violations";

const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Map a label to a legal worksheet name.
///
/// Invalid characters and leading/trailing apostrophes become `_`, and the
/// result is truncated to [`MAX_SHEET_NAME`] characters.
pub fn sheet_name(label: &str) -> Result<String, WriteError> {
    let invalid = |reason: &str| WriteError::SheetName {
        label: label.to_string(),
        reason: reason.to_string(),
    };

    if label.trim().is_empty() {
        return Err(invalid("name is blank"));
    }

    let mut name: String = label
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME)
        .collect();

    if name.starts_with('\'') {
        name.replace_range(..1, "_");
    }
    if name.ends_with('\'') {
        let last = name.len() - 1;
        name.replace_range(last.., "_");
    }

    if name.eq_ignore_ascii_case("history") {
        return Err(invalid("'History' is reserved by Excel"));
    }

    Ok(name)
}

/// Resolve sheet names for every label, rejecting collisions.
///
/// Excel compares sheet names case-insensitively.
fn plan_sheets<'a>(labels: impl Iterator<Item = &'a str>) -> Result<Vec<String>, WriteError> {
    let mut seen: HashMap<String, &'a str> = HashMap::new();
    let mut names = Vec::new();

    for label in labels {
        let name = sheet_name(label)?;
        if let Some(first) = seen.insert(name.to_lowercase(), label) {
            return Err(WriteError::SheetCollision {
                first: first.to_string(),
                second: label.to_string(),
                sheet: name,
            });
        }
        names.push(name);
    }

    Ok(names)
}

fn write_header(sheet: &mut Worksheet, bold: &Format) -> Result<(), WriteError> {
    for (col, field) in Field::ALL.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, field.header(), bold)?;
    }
    Ok(())
}

fn build_workbook(violations: &Violations<'_>) -> Result<Workbook, WriteError> {
    let names = plan_sheets(violations.labels())?;
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    if violations.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(NO_VIOLATIONS_SHEET)?;
        write_header(sheet, &bold)?;
        return Ok(workbook);
    }

    for (subset, name) in violations.entries().iter().zip(&names) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name.as_str())?;
        write_header(sheet, &bold)?;

        for (i, record) in subset.records().iter().enumerate() {
            let row = u32::try_from(i + 1).unwrap_or(u32::MAX);
            for (col, text) in record.texts().enumerate() {
                sheet.write_string(row, col as u16, text)?;
            }
        }
        sheet.autofit();
        debug!(sheet = %name, rows = subset.len(), "wrote section");
    }

    Ok(workbook)
}

/// Temporary file in `dir` that ends up as the report.
///
/// Created with the same mode a plain file would get (0666 less the umask)
/// rather than tempfile's owner-only default.
fn staging_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".validation-").suffix(".xlsx");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Write every subset in `violations` to a workbook at `output_path`.
pub fn write_report(violations: &Violations<'_>, output_path: &Path) -> Result<PathBuf, WriteError> {
    let mut workbook = build_workbook(violations)?;

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let staged = staging_file(&dir).map_err(|source| WriteError::Io {
        dir: dir.clone(),
        source,
    })?;

    workbook.save(staged.path())?;
    staged
        .persist(output_path)
        .map_err(|e| WriteError::Persist {
            path: output_path.to_path_buf(),
            source: e.error,
        })?;

    info!(path = %output_path.display(), sections = violations.len(), "report written");
    Ok(output_path.to_path_buf())
}
