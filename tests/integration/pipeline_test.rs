//! End-to-end runs through the library on real workbook and CSV files.

use meter_validate::config::{Config, FormatPolicy, RuleConfig};
use meter_validate::fields::Field;
use meter_validate::loader::Loader;
use meter_validate::pipeline::{Pipeline, RunReport, RunState, Stage};
use meter_validate::report::NO_VIOLATIONS_SHEET;
use meter_validate::status::{StageResult, StageStatus};

use crate::support::builders::{footer_row, AssetRow};
use crate::support::harness::{read_sheets, report_files, sheet_rows, TestHarness};

fn run(pipeline: &Pipeline) -> RunReport {
    pipeline.run(&mut |_: Stage, _: &StageResult| {})
}

fn accounts(rows: &[Vec<String>]) -> Vec<&str> {
    rows.iter().map(|r| r[Field::Account.index()].as_str()).collect()
}

#[test]
fn test_clean_workbook_reports_no_violations() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[AssetRow::new("100"), AssetRow::new("101").register(6001.0).text(Field::AmrCode, "53.0")],
    );

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    let report = run(&pipeline);

    assert_eq!(report.state, RunState::Done);
    assert!(!report.has_errors());
    for stage in &Stage::ALL[1..8] {
        assert_eq!(report.result(*stage).unwrap().status, StageStatus::NoViolations);
    }

    let sheets = read_sheets(pipeline.output_path());
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].0, NO_VIOLATIONS_SHEET);
    assert_eq!(sheets[0].1.len(), 1);
}

#[test]
fn test_register_mismatch_is_reported() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[
            AssetRow::new("100").number(Field::MxuNumber, 4002.0),
            AssetRow::new("101"),
        ],
    );

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    let report = run(&pipeline);
    assert_eq!(report.result(Stage::Mismatch).unwrap().status, StageStatus::Success);

    let sheets = read_sheets(pipeline.output_path());
    let rows = sheet_rows(&sheets, "MXU-Reg Mismatch").unwrap();
    assert_eq!(accounts(&rows), vec!["100"]);
    assert_eq!(rows[0][Field::RegisterId.index()], "4001");
    assert_eq!(rows[0][Field::MxuNumber.index()], "4002");
}

#[test]
fn test_ultrasonic_assets_need_nine_dials() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[
            AssetRow::new("100").number(Field::AssetId, 24567.0),
            AssetRow::new("101").number(Field::AssetId, 13456.0),
            AssetRow::new("102")
                .number(Field::AssetId, 24568.0)
                .number(Field::NumberOfDials, 9.0),
        ],
    );

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    run(&pipeline);

    let sheets = read_sheets(pipeline.output_path());
    assert_eq!(accounts(&sheet_rows(&sheets, "Dials").unwrap()), vec!["100"]);
}

#[test]
fn test_amr_code_for_small_six_register() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[
            AssetRow::new("100")
                .text(Field::Size, "1")
                .register(6100.0)
                .text(Field::AmrCode, "53.0"),
            AssetRow::new("101")
                .text(Field::Size, "1")
                .register(6100.0)
                .text(Field::AmrCode, "52.0"),
        ],
    );

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    run(&pipeline);

    let sheets = read_sheets(pipeline.output_path());
    assert_eq!(accounts(&sheet_rows(&sheets, "AMR Codes").unwrap()), vec!["101"]);
}

#[test]
fn test_footer_row_never_reaches_checks() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[AssetRow::new("100"), footer_row("Total Records: 42")],
    );

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    let report = run(&pipeline);
    assert_eq!(report.state, RunState::Done);

    for (_, rows) in read_sheets(pipeline.output_path()) {
        assert!(!accounts(&rows[1..]).contains(&"Total Records: 42"));
    }
}

#[test]
fn test_numeric_and_text_multipliers_both_pass() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[
            AssetRow::new("100").number(Field::Multiplier, 10.0),
            AssetRow::new("101").text(Field::Multiplier, "10"),
        ],
    );

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    let report = run(&pipeline);

    assert_eq!(
        report.result(Stage::Multiplier).unwrap().status,
        StageStatus::NoViolations
    );
}

#[test]
fn test_blank_cells_are_reported_per_field() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[
            AssetRow::new("100").blank(Field::ServiceAddress),
            AssetRow::new("101"),
        ],
    );

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    run(&pipeline);

    let sheets = read_sheets(pipeline.output_path());
    let rows = sheet_rows(&sheets, "Empty_Service Address").unwrap();
    assert_eq!(accounts(&rows), vec!["100"]);
    assert_eq!(rows[0][Field::ServiceAddress.index()], "nan");
    assert!(sheet_rows(&sheets, "Empty_Account").is_none());
}

#[test]
fn test_unknown_register_class_fails_load() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[AssetRow::new("100").register(9001.0)],
    );

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    let report = run(&pipeline);

    assert_eq!(report.state, RunState::Failed);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.final_result().unwrap().detail, "No 6 or 4 AMR identified");
    assert!(report_files(&harness.output_dir).is_empty());
}

#[test]
fn test_csv_keeps_unknown_register_class() {
    let harness = TestHarness::new();
    let input = harness.write_csv("assets.csv", &[AssetRow::new("100").register(9001.0)]);

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    let report = run(&pipeline);

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.result(Stage::Load).unwrap().status, StageStatus::Success);
}

#[test]
fn test_csv_filter_can_be_enabled_by_config() {
    let harness = TestHarness::new();
    let input = harness.write_csv("assets.csv", &[AssetRow::new("100").register(9001.0)]);
    let mut config = Config::default();
    config.sources.csv = FormatPolicy::spreadsheet();

    let pipeline = Pipeline::with_config(&input, &harness.output_dir, config).unwrap();
    let report = run(&pipeline);

    assert_eq!(report.state, RunState::Failed);
    assert!(report.result(Stage::Load).unwrap().is_error());
}

#[test]
fn test_only_footer_rows_is_an_ingestion_error() {
    let harness = TestHarness::new();
    let input = harness.write_csv("assets.csv", &[footer_row("Total Records: 0")]);

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    let report = run(&pipeline);

    assert_eq!(report.state, RunState::Failed);
    assert!(report.result(Stage::Load).unwrap().is_error());
    assert!(report_files(&harness.output_dir).is_empty());
}

#[test]
fn test_repeated_runs_produce_identical_sections() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[
            AssetRow::new("100").text(Field::ReadType, "R"),
            AssetRow::new("101").number(Field::MxuNumber, 4009.0),
            AssetRow::new("102").blank(Field::Size),
        ],
    );

    let first_dir = harness.fresh_dir("first");
    let second_dir = harness.fresh_dir("second");
    let first = Pipeline::new(&input, &first_dir).unwrap();
    let second = Pipeline::new(&input, &second_dir).unwrap();
    run(&first);
    run(&second);

    assert_eq!(
        read_sheets(first.output_path()),
        read_sheets(second.output_path())
    );
}

#[test]
fn test_reported_rows_match_loaded_records() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[
            AssetRow::new("100").text(Field::MxuType, "R"),
            AssetRow::new("101").number(Field::Multiplier, 100.0),
            AssetRow::new("102").blank(Field::AmrCode),
            footer_row("Total Records: 3"),
        ],
    );

    let pipeline = Pipeline::new(&input, &harness.output_dir).unwrap();
    run(&pipeline);

    let dataset = Loader::new(&input)
        .unwrap()
        .load(&RuleConfig::default(), &FormatPolicy::spreadsheet())
        .unwrap();
    let loaded: Vec<Vec<String>> = dataset
        .records()
        .iter()
        .map(|r| r.texts().map(str::to_string).collect())
        .collect();

    for (name, rows) in read_sheets(pipeline.output_path()) {
        for row in &rows[1..] {
            assert!(loaded.contains(row), "row in '{name}' not in dataset: {row:?}");
        }
    }
}

#[test]
fn test_check_error_is_reported_and_run_continues() {
    let harness = TestHarness::new();
    let input = harness.write_xlsx(
        "assets.xlsx",
        &[AssetRow::new("100").text(Field::MxuType, "R")],
    );
    let mut config = Config::default();
    config.rules.dials.standard = String::new();

    let pipeline = Pipeline::with_config(&input, &harness.output_dir, config).unwrap();
    let report = run(&pipeline);

    assert!(report.result(Stage::Dials).unwrap().is_error());
    assert_eq!(report.result(Stage::MxuType).unwrap().status, StageStatus::Success);
    assert_eq!(report.state, RunState::Done);

    let sheets = read_sheets(pipeline.output_path());
    assert!(sheet_rows(&sheets, "MXU Type").is_some());
}
