//! AMR Code must match the meter size and register class.
//!
//! | Size contains marker | Register prefix | Expected code |
//! |----------------------|-----------------|---------------|
//! | no                   | `6`             | `small_six`   |
//! | no                   | `4`             | `small_four`  |
//! | yes                  | `4`             | `large_four`  |
//!
//! Large meters on a `6` register have no expectation and are never
//! flagged. Whoever owns the business rules has not defined one.

use super::{require_value, Check};
use crate::config::RuleConfig;
use crate::error::CheckError;
use crate::fields::Field;
use crate::record::{Dataset, Record};
use crate::violations::ViolationSubset;

pub const LABEL: &str = "AMR Codes";

const SIX_CLASS: &str = "6";
const FOUR_CLASS: &str = "4";

pub struct AmrCodeCheck;

/// Expected AMR code for a record, or `None` when no rule covers it.
fn expected_code<'r>(
    record: &Record,
    large_marker: &str,
    small_six: &'r str,
    small_four: &'r str,
    large_four: &'r str,
) -> Option<&'r str> {
    let large = record.text(Field::Size).contains(large_marker);
    let register = record.text(Field::RegisterId);

    match (large, register) {
        (false, r) if r.starts_with(SIX_CLASS) => Some(small_six),
        (false, r) if r.starts_with(FOUR_CLASS) => Some(small_four),
        (true, r) if r.starts_with(FOUR_CLASS) => Some(large_four),
        _ => None,
    }
}

impl Check for AmrCodeCheck {
    fn name(&self) -> &'static str {
        "amr_code"
    }

    fn found_detail(&self) -> &'static str {
        "Incorrect AMR Codes Identified"
    }

    fn clear_detail(&self) -> &'static str {
        "No incorrect AMR Codes identified"
    }

    fn evaluate<'d>(
        &self,
        dataset: &'d Dataset,
        rules: &RuleConfig,
    ) -> Result<Vec<ViolationSubset<'d>>, CheckError> {
        let rule = &rules.amr_codes;
        let marker = require_value("amr_codes.large_size_marker", &rule.large_size_marker)?;
        let small_six = require_value("amr_codes.small_six", &rule.small_six)?;
        let small_four = require_value("amr_codes.small_four", &rule.small_four)?;
        let large_four = require_value("amr_codes.large_four", &rule.large_four)?;

        Ok(ViolationSubset::collect(LABEL, dataset, |r| {
            match expected_code(r, marker, small_six, small_four, large_four) {
                Some(expected) => r.text(Field::AmrCode) != expected,
                None => false,
            }
        })
        .into_iter()
        .collect())
    }
}
