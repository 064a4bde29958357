//! Default values and configuration structs with default implementations.

use serde::{Deserialize, Deserializer, Serialize};

use crate::loader::float_text;
use crate::source::SourceFormat;

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

// =========================================================================
// DEFAULT VALUE FUNCTIONS
// =========================================================================

default_fn!(default_footer_marker, String, "Records".to_string());
default_fn!(
    default_register_prefixes,
    Vec<String>,
    vec!["4".to_string(), "6".to_string()]
);
default_fn!(default_read_type, String, "N".to_string());
default_fn!(default_multiplier, String, "10".to_string());
default_fn!(default_ultrasonic_prefix, String, "2".to_string());
default_fn!(default_ultrasonic_dials, String, "9".to_string());
default_fn!(default_standard_dials, String, "6".to_string());
default_fn!(default_large_size_marker, String, "2".to_string());
default_fn!(default_small_six_code, String, "53.0".to_string());
default_fn!(default_small_four_code, String, "54.0".to_string());
default_fn!(default_large_four_code, String, "55.0".to_string());
default_fn!(default_mxu_type, String, "N".to_string());
default_fn!(default_true, bool, true);
default_fn!(default_false, bool, false);

// =========================================================================
// RULE VALUE PARSING
// =========================================================================

/// A rule value as written in YAML. Unquoted numbers are common
/// (`multiplier: 10`), so scalars of any type are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum RuleScalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl RuleScalar {
    /// Render the way the loader renders the same cell value.
    fn into_text(self) -> String {
        match self {
            RuleScalar::Int(value) => value.to_string(),
            RuleScalar::Float(value) => float_text(value),
            RuleScalar::Bool(true) => "True".to_string(),
            RuleScalar::Bool(false) => "False".to_string(),
            RuleScalar::Text(text) => text,
        }
    }
}

pub(crate) fn rule_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RuleScalar::deserialize(deserializer).map(RuleScalar::into_text)
}

pub(crate) fn rule_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<RuleScalar>::deserialize(deserializer)?;
    Ok(values.into_iter().map(RuleScalar::into_text).collect())
}

// =========================================================================
// CONFIG STRUCTS WITH DEFAULTS
// =========================================================================

/// Business-rule constants used by the loader and the checks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Rows whose Account contains this text are export footers (default: "Records")
    #[serde(default = "default_footer_marker", deserialize_with = "rule_text")]
    pub footer_marker: String,
    /// Register ID prefixes kept by the spreadsheet filter (default: 4, 6)
    #[serde(default = "default_register_prefixes", deserialize_with = "rule_text_list")]
    pub register_prefixes: Vec<String>,
    /// Required Read Type (default: "N")
    #[serde(default = "default_read_type", deserialize_with = "rule_text")]
    pub read_type: String,
    /// Required Multiplier text (default: "10")
    #[serde(default = "default_multiplier", deserialize_with = "rule_text")]
    pub multiplier: String,
    #[serde(default)]
    pub dials: DialsRule,
    #[serde(default)]
    pub amr_codes: AmrCodeRule,
    /// Required MXU Type (default: "N")
    #[serde(default = "default_mxu_type", deserialize_with = "rule_text")]
    pub mxu_type: String,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            footer_marker: default_footer_marker(),
            register_prefixes: default_register_prefixes(),
            read_type: default_read_type(),
            multiplier: default_multiplier(),
            dials: DialsRule::default(),
            amr_codes: AmrCodeRule::default(),
            mxu_type: default_mxu_type(),
        }
    }
}

/// Expected dial counts keyed by Asset ID class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DialsRule {
    /// Asset ID prefix identifying ultrasonic meters (default: "2")
    #[serde(default = "default_ultrasonic_prefix", deserialize_with = "rule_text")]
    pub ultrasonic_prefix: String,
    /// Dials expected on ultrasonic meters (default: "9")
    #[serde(default = "default_ultrasonic_dials", deserialize_with = "rule_text")]
    pub ultrasonic: String,
    /// Dials expected on every other meter (default: "6")
    #[serde(default = "default_standard_dials", deserialize_with = "rule_text")]
    pub standard: String,
}

impl Default for DialsRule {
    fn default() -> Self {
        Self {
            ultrasonic_prefix: default_ultrasonic_prefix(),
            ultrasonic: default_ultrasonic_dials(),
            standard: default_standard_dials(),
        }
    }
}

/// Expected AMR codes keyed by meter size and register class.
///
/// Large meters on a "6" register have no expectation and are never checked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AmrCodeRule {
    /// Size text containing this marks a large meter (default: "2")
    #[serde(default = "default_large_size_marker", deserialize_with = "rule_text")]
    pub large_size_marker: String,
    /// Small meter, Register ID starting "6" (default: "53.0")
    #[serde(default = "default_small_six_code", deserialize_with = "rule_text")]
    pub small_six: String,
    /// Small meter, Register ID starting "4" (default: "54.0")
    #[serde(default = "default_small_four_code", deserialize_with = "rule_text")]
    pub small_four: String,
    /// Large meter, Register ID starting "4" (default: "55.0")
    #[serde(default = "default_large_four_code", deserialize_with = "rule_text")]
    pub large_four: String,
}

impl Default for AmrCodeRule {
    fn default() -> Self {
        Self {
            large_size_marker: default_large_size_marker(),
            small_six: default_small_six_code(),
            small_four: default_small_four_code(),
            large_four: default_large_four_code(),
        }
    }
}

/// Per-format loader behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourcePolicy {
    #[serde(default = "FormatPolicy::spreadsheet")]
    pub xlsx: FormatPolicy,
    #[serde(default = "FormatPolicy::spreadsheet")]
    pub xls: FormatPolicy,
    #[serde(default = "FormatPolicy::delimited")]
    pub csv: FormatPolicy,
}

impl SourcePolicy {
    pub fn for_format(&self, format: SourceFormat) -> &FormatPolicy {
        match format {
            SourceFormat::Xlsx => &self.xlsx,
            SourceFormat::Xls => &self.xls,
            SourceFormat::Csv => &self.csv,
        }
    }
}

impl Default for SourcePolicy {
    fn default() -> Self {
        Self {
            xlsx: FormatPolicy::for_format(SourceFormat::Xlsx),
            xls: FormatPolicy::for_format(SourceFormat::Xls),
            csv: FormatPolicy::for_format(SourceFormat::Csv),
        }
    }
}

/// Loader switches for one input format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormatPolicy {
    /// Keep only records whose Register ID starts with a configured prefix,
    /// failing the load if none remain.
    #[serde(default = "default_false")]
    pub register_prefix_filter: bool,
}

impl FormatPolicy {
    /// Workbook exports carry other register classes and get filtered;
    /// delimited exports are taken as-is.
    pub fn for_format(format: SourceFormat) -> Self {
        if format.is_spreadsheet() {
            Self::spreadsheet()
        } else {
            Self::delimited()
        }
    }

    pub fn spreadsheet() -> Self {
        Self {
            register_prefix_filter: true,
        }
    }

    pub fn delimited() -> Self {
        Self {
            register_prefix_filter: false,
        }
    }
}

/// Orchestrator behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelinePolicy {
    /// Keep running later checks (and write the report) after a check errors
    #[serde(default = "default_true")]
    pub continue_on_check_error: bool,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            continue_on_check_error: default_true(),
        }
    }
}
