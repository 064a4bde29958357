//! Configuration layering as seen by a real run.

use meter_validate::config::{Config, PROJECT_CONFIG};
use meter_validate::fields::Field;
use meter_validate::pipeline::{Pipeline, Stage};
use meter_validate::status::{StageResult, StageStatus};
use std::fs;

use crate::support::builders::AssetRow;
use crate::support::harness::TestHarness;

fn write_config(path: &std::path::Path, frontmatter: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("---\n{}---\n\n# Rules\n", frontmatter)).unwrap();
}

#[test]
fn test_explicit_layer_overrides_project_layer() {
    let harness = TestHarness::new();
    let project = harness.path(PROJECT_CONFIG);
    let explicit = harness.path("strict.md");
    write_config(&project, "rules:\n  multiplier: \"100\"\n  read_type: R\n");
    write_config(&explicit, "rules:\n  multiplier: \"10\"\n");

    let config = Config::load_merged_from(None, &project, Some(explicit.as_path())).unwrap();

    assert_eq!(config.rules.multiplier, "10");
    assert_eq!(config.rules.read_type, "R");
    assert_eq!(config.rules.mxu_type, "N");
}

#[test]
fn test_rule_overrides_change_what_is_flagged() {
    let harness = TestHarness::new();
    let config_path = harness.path("rules.md");
    write_config(&config_path, "rules:\n  multiplier: \"100\"\n");
    let config = Config::load_from(&config_path).unwrap();

    let input = harness.write_xlsx(
        "assets.xlsx",
        &[
            AssetRow::new("100"),
            AssetRow::new("101").number(Field::Multiplier, 100.0),
        ],
    );
    let pipeline = Pipeline::with_config(&input, &harness.output_dir, config).unwrap();
    let report = pipeline.run(&mut |_: Stage, _: &StageResult| {});

    assert_eq!(report.result(Stage::Multiplier).unwrap().status, StageStatus::Success);
    let multiplier = report
        .sections
        .iter()
        .find(|s| s.label == "Multiplier")
        .unwrap();
    assert_eq!(multiplier.rows, 1);
}

#[test]
fn test_malformed_explicit_layer_is_an_error() {
    let harness = TestHarness::new();
    let explicit = harness.path("broken.md");
    write_config(&explicit, "rules: [not, a, mapping\n");

    assert!(Config::load_merged_from(None, &harness.path(PROJECT_CONFIG), Some(explicit.as_path())).is_err());
}
