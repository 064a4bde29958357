//! Multiplier must be the configured value.

use super::{require_value, Check};
use crate::config::RuleConfig;
use crate::error::CheckError;
use crate::fields::Field;
use crate::record::Dataset;
use crate::violations::ViolationSubset;

pub const LABEL: &str = "Multiplier";

pub struct MultiplierCheck;

impl Check for MultiplierCheck {
    fn name(&self) -> &'static str {
        "multiplier"
    }

    fn found_detail(&self) -> &'static str {
        "Identified incorrect multipliers"
    }

    fn clear_detail(&self) -> &'static str {
        "No incorrect multipliers identified"
    }

    fn evaluate<'d>(
        &self,
        dataset: &'d Dataset,
        rules: &RuleConfig,
    ) -> Result<Vec<ViolationSubset<'d>>, CheckError> {
        let expected = require_value("multiplier", &rules.multiplier)?;
        Ok(
            ViolationSubset::collect(LABEL, dataset, |r| r.text(Field::Multiplier) != expected)
                .into_iter()
                .collect(),
        )
    }
}
