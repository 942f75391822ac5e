//! Error taxonomy, error policy and the warning log shared by every stage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grammar accepted by the task parser, quoted in syntax errors.
pub const TASK_GRAMMAR: &str =
    r#""values", "b:{n}" (n >= 1), "t:{c1,c2,...}", "sign", "mean"/"average", "median" or "std""#;

/// Grammar accepted for a single color literal.
pub const COLOR_GRAMMAR: &str = r##""#rrggbb" or "r,g,b" with channels in 0..=255"##;

/// Errors raised by the data-to-color pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    #[error("malformed value {token:?} for country {code}: expected a number like 12, -3.5, 1K, 2.5M or a label")]
    MalformedValue { code: String, token: String },

    #[error("non-numeric value {token:?} for country {code}: task {task:?} needs numeric data")]
    NonNumericData {
        code: String,
        token: String,
        task: String,
    },

    #[error("invalid task {task:?}: {reason}; expected {}", TASK_GRAMMAR)]
    TaskSyntax { task: String, reason: String },

    #[error("palette {palette:?} cannot provide {requested} colors (it has {available})")]
    PaletteSize {
        palette: String,
        requested: usize,
        available: usize,
    },

    #[error("invalid palette {input:?}: {reason}")]
    PaletteSyntax { input: String, reason: String },

    #[error("invalid color {input:?}: expected {}", COLOR_GRAMMAR)]
    ColorSyntax { input: String },

    #[error("legend alias missing for key {key:?}")]
    AliasMapping { key: String },

    #[error("no valid records left after normalization")]
    EmptyData,

    #[error("invalid {name} {value:?}: expected one of {expected}")]
    InvalidOption {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// How a stage reacts to recoverable problems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// The first problem aborts the run.
    #[default]
    Strict,
    /// Substitute a safe default, record a warning and continue.
    Smart,
}

impl ErrorPolicy {
    pub fn is_smart(self) -> bool {
        matches!(self, ErrorPolicy::Smart)
    }
}

impl FromStr for ErrorPolicy {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ErrorPolicy::Strict),
            "smart" => Ok(ErrorPolicy::Smart),
            _ => Err(MapError::InvalidOption {
                name: "error policy",
                value: s.to_string(),
                expected: "strict, smart",
            }),
        }
    }
}

/// A substitution or anomaly that did not stop the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error("dropped record for {code}: {reason}")]
    DroppedRecord { code: String, reason: String },

    #[error("duplicate record for {code}; keeping the first value")]
    DuplicateRecord { code: String },

    #[error("{detail}")]
    DataKindFallback { detail: String },

    #[error("task {task:?} replaced by {replacement:?}: {reason}")]
    TaskFallback {
        task: String,
        replacement: String,
        reason: String,
    },

    #[error("thresholds of {task:?} cleaned: {detail}")]
    ThresholdsCleaned { task: String, detail: String },

    #[error("requested {requested} bins but all values equal {value}; produced a single bin")]
    DegenerateBins { requested: usize, value: f64 },

    #[error("palette {requested:?} replaced by {used:?}: {reason}")]
    PaletteFallback {
        requested: String,
        used: String,
        reason: String,
    },

    #[error("country code {code} is not part of the map geometry")]
    UnknownCode { code: String },
}

/// Ordered log of warnings; every entry is also sent to the `log` facade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Warnings(Vec<Warning>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.0.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.0
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for w in &self.0 {
            writeln!(f, "warning: {w}")?;
        }
        Ok(())
    }
}
