//! Stage results relayed to whatever drives the pipeline.

use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome class of a stage, with the numeric codes shells key off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    /// Stage completed; for checks, violations were found.
    Success,
    /// Check completed and found nothing.
    NoViolations,
    /// Stage could not complete.
    Error,
}

impl StageStatus {
    pub fn code(self) -> u16 {
        match self {
            StageStatus::Success => 200,
            StageStatus::NoViolations => 202,
            StageStatus::Error => 500,
        }
    }

    pub fn is_error(self) -> bool {
        self == StageStatus::Error
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Success => write!(f, "SUCCESS"),
            StageStatus::NoViolations => write!(f, "NO_VIOLATIONS"),
            StageStatus::Error => write!(f, "ERROR"),
        }
    }
}

impl Serialize for StageStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

/// Status plus human-readable detail for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResult {
    pub status: StageStatus,
    pub detail: String,
}

impl StageResult {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Success,
            detail: detail.into(),
        }
    }

    pub fn no_violations(detail: impl Into<String>) -> Self {
        Self {
            status: StageStatus::NoViolations,
            detail: detail.into(),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Error,
            detail: detail.into(),
        }
    }

    /// Convert any error into an ERROR result carrying its message.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::error(err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }
}

impl fmt::Display for StageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.code(), self.detail)
    }
}
