use calamine::{open_workbook, Reader, Xlsx};
use meter_validate::fields::Field;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use super::builders::{AssetRow, Value};

/// Rows of one report sheet, header included.
pub type SheetRows = Vec<Vec<String>>;

/// TestHarness provides an isolated working directory with an `out/`
/// directory for reports. Dropping it removes everything.
pub struct TestHarness {
    pub dir: TempDir,
    pub output_dir: PathBuf,
    #[allow(dead_code)]
    pub binary: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let output_dir = dir.path().join("out");
        fs::create_dir_all(&output_dir).expect("Failed to create output dir");

        TestHarness {
            dir,
            output_dir,
            binary: PathBuf::from(env!("CARGO_BIN_EXE_meter-validate")),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// A fresh, empty directory under the harness root.
    #[allow(dead_code)]
    pub fn fresh_dir(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Write `rows` under the standard header to a workbook.
    pub fn write_xlsx(&self, name: &str, rows: &[AssetRow]) -> PathBuf {
        let path = self.path(name);
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (col, field) in Field::ALL.iter().enumerate() {
            sheet.write_string(0, col as u16, field.header()).unwrap();
        }
        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, value) in row.values().iter().enumerate() {
                match value {
                    Value::Text(s) => {
                        sheet.write_string(r, col as u16, s.as_str()).unwrap();
                    }
                    Value::Number(n) => {
                        sheet.write_number(r, col as u16, *n).unwrap();
                    }
                    Value::Blank => {}
                }
            }
        }

        workbook.save(&path).unwrap();
        path
    }

    /// Write `rows` under the standard header as comma-separated text.
    #[allow(dead_code)]
    pub fn write_csv(&self, name: &str, rows: &[AssetRow]) -> PathBuf {
        let path = self.path(name);
        let header: Vec<&str> = Field::ALL.iter().map(|f| f.header()).collect();
        let mut content = header.join(",");
        for row in rows {
            let cells: Vec<String> = row.values().iter().map(Value::csv_text).collect();
            content.push('\n');
            content.push_str(&cells.join(","));
        }
        content.push('\n');
        fs::write(&path, content).unwrap();
        path
    }

    /// Run the binary from the harness directory with HOME pointed at it,
    /// so no user config leaks in.
    #[allow(dead_code)]
    pub fn run_cli(&self, args: &[&str]) -> Output {
        Command::new(&self.binary)
            .args(args)
            .current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run meter-validate")
    }
}

/// Every `.xlsx` file in `dir`.
pub fn report_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "xlsx"))
        .collect();
    files.sort();
    files
}

/// Sheet names and their rows, in workbook order.
pub fn read_sheets(path: &Path) -> Vec<(String, SheetRows)> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let names = workbook.sheet_names();
    names
        .into_iter()
        .map(|name| {
            let range = workbook.worksheet_range(&name).unwrap();
            let rows = range
                .rows()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect();
            (name, rows)
        })
        .collect()
}

/// Rows of the named sheet without the header, if the sheet exists.
#[allow(dead_code)]
pub fn sheet_rows(sheets: &[(String, SheetRows)], name: &str) -> Option<SheetRows> {
    sheets
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, rows)| rows[1..].to_vec())
}
