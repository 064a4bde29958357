//! MXU Type must be the configured value.

use super::{require_value, Check};
use crate::config::RuleConfig;
use crate::error::CheckError;
use crate::fields::Field;
use crate::record::Dataset;
use crate::violations::ViolationSubset;

pub const LABEL: &str = "MXU Type";

pub struct MxuTypeCheck;

impl Check for MxuTypeCheck {
    fn name(&self) -> &'static str {
        "mxu_type"
    }

    fn found_detail(&self) -> &'static str {
        "Incorrect MXU Types identified"
    }

    fn clear_detail(&self) -> &'static str {
        "No incorrect MXU Types identified"
    }

    fn evaluate<'d>(
        &self,
        dataset: &'d Dataset,
        rules: &RuleConfig,
    ) -> Result<Vec<ViolationSubset<'d>>, CheckError> {
        let expected = require_value("mxu_type", &rules.mxu_type)?;
        Ok(
            ViolationSubset::collect(LABEL, dataset, |r| r.text(Field::MxuType) != expected)
                .into_iter()
                .collect(),
        )
    }
}
