//! # meter-validate - Meter asset validation
//!
//! Checks utility meter asset exports against a fixed set of business rules
//! and writes every failing record to a workbook, one sheet per rule.
//!
//! ## Overview
//!
//! An export (`.xlsx`, `.xls` or `.csv`) is loaded into a normalized
//! [`record::Dataset`] of eleven text columns. Seven checks then run in a
//! fixed order, each collecting the records it rejects. The collected
//! subsets are written to `validation_<timestamp>.xlsx` in the output
//! directory.
//!
//! ## Modules
//!
//! - [`pipeline`] - Construction contract and the stage state machine
//! - [`loader`] - Reading, column selection, coercion and row filtering
//! - [`checks`] - The seven rule checks
//! - [`violations`] - Violation subsets and the per-run aggregator
//! - [`report`] - Workbook writer
//! - [`config`] - Rule settings loaded from Markdown frontmatter
//! - [`status`] - Stage results and status codes
//! - [`error`] - Error taxonomy
//!
//! ## Example
//!
//! ```no_run
//! use meter_validate::pipeline::{Pipeline, Stage};
//! use meter_validate::status::StageResult;
//!
//! let pipeline = Pipeline::new("assets.xlsx", ".").expect("invalid paths");
//! let report = pipeline.run(&mut |stage: Stage, result: &StageResult| {
//!     println!("{stage}: {result}");
//! });
//! println!("{:?}", report.output);
//! ```

pub mod checks;
pub mod config;
pub mod error;
pub mod fields;
pub mod loader;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod source;
pub mod status;
pub mod violations;
