//! Business-rule checks over a loaded dataset.
//!
//! Each check is a pure function of the dataset and the rule settings. It
//! returns the subsets of failing records; recording them and reporting the
//! stage outcome happen in [`run_check`].

pub mod amr_code;
pub mod dials;
pub mod empty;
pub mod multiplier;
pub mod mxu_reg;
pub mod mxu_type;
pub mod read_type;

pub use amr_code::AmrCodeCheck;
pub use dials::DialsCheck;
pub use empty::EmptyFieldCheck;
pub use multiplier::MultiplierCheck;
pub use mxu_reg::MxuRegisterCheck;
pub use mxu_type::MxuTypeCheck;
pub use read_type::ReadTypeCheck;

use tracing::debug;

use crate::config::RuleConfig;
use crate::error::CheckError;
use crate::record::Dataset;
use crate::status::StageResult;
use crate::violations::{ViolationSubset, Violations};

/// A single validation rule.
pub trait Check {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Detail reported when violations are found.
    fn found_detail(&self) -> &'static str;

    /// Detail reported when every record passes.
    fn clear_detail(&self) -> &'static str;

    /// Compute the failing subsets. Empty subsets are never returned.
    fn evaluate<'d>(
        &self,
        dataset: &'d Dataset,
        rules: &RuleConfig,
    ) -> Result<Vec<ViolationSubset<'d>>, CheckError>;
}

/// Run `check`, record what it finds and describe the outcome.
pub fn run_check<'d>(
    check: &dyn Check,
    dataset: &'d Dataset,
    rules: &RuleConfig,
    violations: &mut Violations<'d>,
) -> StageResult {
    match check.evaluate(dataset, rules) {
        Ok(subsets) if subsets.is_empty() => StageResult::no_violations(check.clear_detail()),
        Ok(subsets) => {
            for subset in subsets {
                violations.record(subset);
            }
            StageResult::success(check.found_detail())
        }
        Err(err) => {
            debug!(check = check.name(), error = %err, "check failed");
            StageResult::from_error(&err)
        }
    }
}

/// Fail with [`CheckError::InvalidRule`] when a rule parameter is empty.
pub(crate) fn require_value<'a>(rule: &'static str, value: &'a str) -> Result<&'a str, CheckError> {
    if value.is_empty() {
        Err(CheckError::InvalidRule {
            rule,
            reason: "expected value must not be empty".to_string(),
        })
    } else {
        Ok(value)
    }
}
