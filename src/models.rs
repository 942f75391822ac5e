use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw cell value as produced by the table loader.
///
/// Spreadsheet loaders hand over numbers, CSV loaders hand over text.
/// Accept both and normalize later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// The value as it appeared in the input, used in messages and as label text.
    pub fn token(&self) -> String {
        match self {
            RawValue::Number(v) => v.to_string(),
            RawValue::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Number(v as f64)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

/// One row of input (one row = one country).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub country_code: String, // ISO 3166-1 alpha-2
    pub raw_value: RawValue,
}

impl RawRecord {
    pub fn new(country_code: impl Into<String>, raw_value: impl Into<RawValue>) -> Self {
        Self {
            country_code: country_code.into(),
            raw_value: raw_value.into(),
        }
    }
}

/// Uniform representation of a usable cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum NormalizedValue {
    Numeric(f64),
    Label(String),
}

impl NormalizedValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NormalizedValue::Numeric(v) => Some(*v),
            NormalizedValue::Label(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, NormalizedValue::Numeric(_))
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedValue::Numeric(v) => write!(f, "{v}"),
            NormalizedValue::Label(s) => f.write_str(s),
        }
    }
}

/// A normalized observation keyed by upper-case ISO code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryValue {
    pub code: String,
    pub value: NormalizedValue,
}

impl CountryValue {
    pub fn new(code: impl Into<String>, value: NormalizedValue) -> Self {
        Self {
            code: code.into(),
            value,
        }
    }
}

/// Canonical form of a country code: trimmed and upper-case.
pub fn canonical_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
