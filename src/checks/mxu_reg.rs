//! Register ID must equal MXU Number.

use super::Check;
use crate::config::RuleConfig;
use crate::error::CheckError;
use crate::fields::Field;
use crate::record::Dataset;
use crate::violations::ViolationSubset;

pub const LABEL: &str = "MXU-Reg Mismatch";

pub struct MxuRegisterCheck;

impl Check for MxuRegisterCheck {
    fn name(&self) -> &'static str {
        "mxu_reg"
    }

    fn found_detail(&self) -> &'static str {
        "Mismatched Register/MXU IDS Identified"
    }

    fn clear_detail(&self) -> &'static str {
        "No mismatched MXU/Regs"
    }

    fn evaluate<'d>(
        &self,
        dataset: &'d Dataset,
        _rules: &RuleConfig,
    ) -> Result<Vec<ViolationSubset<'d>>, CheckError> {
        Ok(ViolationSubset::collect(LABEL, dataset, |r| {
            r.text(Field::RegisterId) != r.text(Field::MxuNumber)
        })
        .into_iter()
        .collect())
    }
}
