//! Empty-field check: one subset per required field holding missing values.

use super::Check;
use crate::config::RuleConfig;
use crate::error::CheckError;
use crate::fields::Field;
use crate::record::{Dataset, EMPTY_SENTINEL};
use crate::violations::ViolationSubset;

/// Label prefix for empty-field subsets, e.g. `Empty_Account`.
pub const LABEL_PREFIX: &str = "Empty_";

pub struct EmptyFieldCheck;

impl Check for EmptyFieldCheck {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn found_detail(&self) -> &'static str {
        "Empty Data Sets Identified"
    }

    fn clear_detail(&self) -> &'static str {
        "No Empty Datasets found"
    }

    fn evaluate<'d>(
        &self,
        dataset: &'d Dataset,
        _rules: &RuleConfig,
    ) -> Result<Vec<ViolationSubset<'d>>, CheckError> {
        // Compare rendered text, so a literal "nan" counts as empty too.
        Ok(Field::ALL
            .iter()
            .filter_map(|&field| {
                ViolationSubset::collect(format!("{}{}", LABEL_PREFIX, field), dataset, |r| {
                    r.text(field) == EMPTY_SENTINEL
                })
            })
            .collect())
    }
}
