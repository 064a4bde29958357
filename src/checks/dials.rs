//! Number of Dials must match the meter class implied by the Asset ID.
//!
//! Ultrasonic meters (Asset ID starting with the ultrasonic prefix) carry one
//! dial count; every other meter carries another.

use super::{require_value, Check};
use crate::config::RuleConfig;
use crate::error::CheckError;
use crate::fields::Field;
use crate::record::{Dataset, Record};
use crate::violations::ViolationSubset;

pub const LABEL: &str = "Dials";

pub struct DialsCheck;

impl Check for DialsCheck {
    fn name(&self) -> &'static str {
        "dials"
    }

    fn found_detail(&self) -> &'static str {
        "Incorrect dials identified"
    }

    fn clear_detail(&self) -> &'static str {
        "No incorrect dials identified"
    }

    fn evaluate<'d>(
        &self,
        dataset: &'d Dataset,
        rules: &RuleConfig,
    ) -> Result<Vec<ViolationSubset<'d>>, CheckError> {
        let rule = &rules.dials;
        let prefix = require_value("dials.ultrasonic_prefix", &rule.ultrasonic_prefix)?;
        let ultrasonic = require_value("dials.ultrasonic", &rule.ultrasonic)?;
        let standard = require_value("dials.standard", &rule.standard)?;

        let expected_dials = |r: &Record| {
            if r.text(Field::AssetId).starts_with(prefix) {
                ultrasonic
            } else {
                standard
            }
        };

        Ok(ViolationSubset::collect(LABEL, dataset, |r| {
            r.text(Field::NumberOfDials) != expected_dials(r)
        })
        .into_iter()
        .collect())
    }
}
