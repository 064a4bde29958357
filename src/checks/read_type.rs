//! Read Type must be the configured value.

use super::{require_value, Check};
use crate::config::RuleConfig;
use crate::error::CheckError;
use crate::fields::Field;
use crate::record::Dataset;
use crate::violations::ViolationSubset;

pub const LABEL: &str = "Read Type";

pub struct ReadTypeCheck;

impl Check for ReadTypeCheck {
    fn name(&self) -> &'static str {
        "read_type"
    }

    fn found_detail(&self) -> &'static str {
        "Incorrect read types identified"
    }

    fn clear_detail(&self) -> &'static str {
        "No incorrect read types identified"
    }

    fn evaluate<'d>(
        &self,
        dataset: &'d Dataset,
        rules: &RuleConfig,
    ) -> Result<Vec<ViolationSubset<'d>>, CheckError> {
        let expected = require_value("read_type", &rules.read_type)?;
        Ok(
            ViolationSubset::collect(LABEL, dataset, |r| r.text(Field::ReadType) != expected)
                .into_iter()
                .collect(),
        )
    }
}
