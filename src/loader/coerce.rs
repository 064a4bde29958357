//! Text coercion for raw cell values.
//!
//! A column whose values are all numeric renders as integers only when
//! every value is integral and none is missing; otherwise its numbers render
//! as floats (`"53.0"`). Boolean columns render as `True`/`False`. Mixed
//! columns render each value on its own.

use crate::record::Cell;

/// Cell values as read from the source, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawValue {
    /// Blank cell or a missing-value marker.
    Missing,
    /// Row ended before this column.
    Absent,
    Text(String),
    /// Integral number. `verbatim` keeps the source text when there is one.
    Int { value: i64, verbatim: Option<String> },
    Float { value: f64, verbatim: Option<String> },
    Bool { value: bool, verbatim: Option<String> },
}

/// Text values treated as missing.
pub(crate) const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Text values read as booleans.
const TRUE_SPELLINGS: &[&str] = &["True", "TRUE", "true"];
const FALSE_SPELLINGS: &[&str] = &["False", "FALSE", "false"];

impl RawValue {
    /// Classify a text cell from delimited input.
    pub(crate) fn from_text(text: &str) -> RawValue {
        if MISSING_MARKERS.contains(&text) {
            return RawValue::Missing;
        }
        let flag = if TRUE_SPELLINGS.contains(&text) {
            Some(true)
        } else if FALSE_SPELLINGS.contains(&text) {
            Some(false)
        } else {
            None
        };
        if let Some(value) = flag {
            return RawValue::Bool {
                value,
                verbatim: Some(text.to_string()),
            };
        }
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return RawValue::Int {
                value,
                verbatim: Some(text.to_string()),
            };
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            if !value.is_nan() {
                return RawValue::Float {
                    value,
                    verbatim: Some(text.to_string()),
                };
            }
        }
        RawValue::Text(text.to_string())
    }

    /// Classify a numeric cell from a workbook. Integral values count as ints.
    pub(crate) fn from_number(value: f64) -> RawValue {
        if value.is_nan() {
            RawValue::Missing
        } else if value.fract() == 0.0 && value.abs() < 9.0e15 {
            RawValue::Int {
                value: value as i64,
                verbatim: None,
            }
        } else {
            RawValue::Float {
                value,
                verbatim: None,
            }
        }
    }

    fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing | RawValue::Absent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Bool,
    Mixed,
}

fn infer_kind(values: &[&RawValue]) -> ColumnKind {
    let has_missing = values.iter().any(|v| v.is_missing());
    let present = || values.iter().filter(|v| !v.is_missing());

    if present().all(|v| matches!(v, RawValue::Int { .. })) {
        if has_missing {
            ColumnKind::Float
        } else {
            ColumnKind::Int
        }
    } else if present().all(|v| matches!(v, RawValue::Int { .. } | RawValue::Float { .. })) {
        ColumnKind::Float
    } else if present().all(|v| matches!(v, RawValue::Bool { .. })) {
        ColumnKind::Bool
    } else {
        ColumnKind::Mixed
    }
}

/// Coerce one column of raw values to cells.
pub(crate) fn coerce_column(values: &[&RawValue]) -> Vec<Cell> {
    let kind = infer_kind(values);
    values.iter().map(|v| coerce_value(v, kind)).collect()
}

fn coerce_value(value: &RawValue, kind: ColumnKind) -> Cell {
    let text = match (value, kind) {
        (RawValue::Missing, _) => return Cell::Empty,
        (RawValue::Absent, _) => return Cell::Absent,
        (RawValue::Int { value, .. }, ColumnKind::Int) => value.to_string(),
        (RawValue::Int { value, .. }, ColumnKind::Float) => float_text(*value as f64),
        (RawValue::Float { value, .. }, ColumnKind::Float) => float_text(*value),
        (RawValue::Int { value, verbatim }, _) => {
            verbatim.clone().unwrap_or_else(|| value.to_string())
        }
        (RawValue::Float { value, verbatim }, _) => {
            verbatim.clone().unwrap_or_else(|| float_text(*value))
        }
        (RawValue::Bool { value, .. }, ColumnKind::Bool) => bool_text(*value),
        (RawValue::Bool { value, verbatim }, _) => {
            verbatim.clone().unwrap_or_else(|| bool_text(*value))
        }
        (RawValue::Text(text), _) => text.clone(),
    };
    Cell::Present(text)
}

fn bool_text(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

/// Shortest round-trip float text, always showing a fractional part or an
/// exponent (`53.0`, `0.25`, `1e+16`).
pub(crate) fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let abs = value.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        let raw = format!("{:e}", value);
        return match raw.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => raw,
        };
    }

    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}
