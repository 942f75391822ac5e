//! Task parser: the task string decides how values are split into bins.
//!
//! Keywords are matched case-insensitively; one parse function per variant.

use crate::error::{ErrorPolicy, MapError, Result, Warning, Warnings};
use crate::normalize::parse_shorthand;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bin count used when a `b:{n}` task cannot be read in smart mode.
pub const DEFAULT_BIN_COUNT: usize = 5;

/// Statistic used by [`BinningSpec::StatSplit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Mean,
    Median,
    Std,
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatKind::Mean => "mean",
            StatKind::Median => "median",
            StatKind::Std => "std",
        })
    }
}

/// Parsed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "arg", rename_all = "snake_case")]
pub enum BinningSpec {
    /// One bin per distinct value.
    Values,
    /// `n >= 1` equal-width bins between min and max.
    EqualBins(usize),
    /// Strictly increasing cut points.
    Thresholds(Vec<f64>),
    /// Negative vs. non-negative.
    SignSplit,
    /// Below vs. at-or-above a statistic.
    StatSplit(StatKind),
}

impl BinningSpec {
    /// Whether the task needs numeric data.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, BinningSpec::Values)
    }
}

impl fmt::Display for BinningSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinningSpec::Values => f.write_str("values"),
            BinningSpec::EqualBins(n) => write!(f, "b:{n}"),
            BinningSpec::Thresholds(ts) => {
                let list: Vec<String> = ts.iter().map(|t| t.to_string()).collect();
                write!(f, "t:{}", list.join(","))
            }
            BinningSpec::SignSplit => f.write_str("sign"),
            BinningSpec::StatSplit(kind) => write!(f, "{kind}"),
        }
    }
}

/// Parse a task string.
///
/// In smart mode a bad `b:{n}` becomes `b:5`, bad `t:` entries are dropped or
/// deduplicated, and an unknown task becomes `values`; each substitution is
/// recorded in `warnings`.
pub fn parse_task(task: &str, policy: ErrorPolicy, warnings: &mut Warnings) -> Result<BinningSpec> {
    let trimmed = task.trim();
    let lower = trimmed.to_ascii_lowercase();

    if let Some(arg) = lower.strip_prefix("b:") {
        return parse_equal_bins(trimmed, arg, policy, warnings);
    }
    if lower.starts_with("t:") {
        // Slice the untouched input so numeric literals keep their case.
        return parse_thresholds(trimmed, &trimmed[2..], policy, warnings);
    }
    match lower.as_str() {
        "values" => Ok(BinningSpec::Values),
        "sign" => Ok(BinningSpec::SignSplit),
        "mean" | "average" => Ok(BinningSpec::StatSplit(StatKind::Mean)),
        "median" => Ok(BinningSpec::StatSplit(StatKind::Median)),
        "std" => Ok(BinningSpec::StatSplit(StatKind::Std)),
        _ => {
            let err = MapError::TaskSyntax {
                task: task.to_string(),
                reason: "unknown task".into(),
            };
            fall_back(err, task, BinningSpec::Values, policy, warnings)
        }
    }
}

fn parse_equal_bins(
    task: &str,
    arg: &str,
    policy: ErrorPolicy,
    warnings: &mut Warnings,
) -> Result<BinningSpec> {
    match arg.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(BinningSpec::EqualBins(n)),
        _ => {
            let err = MapError::TaskSyntax {
                task: task.to_string(),
                reason: format!("bin count {:?} is not a positive integer", arg.trim()),
            };
            fall_back(
                err,
                task,
                BinningSpec::EqualBins(DEFAULT_BIN_COUNT),
                policy,
                warnings,
            )
        }
    }
}

fn parse_thresholds(
    task: &str,
    list: &str,
    policy: ErrorPolicy,
    warnings: &mut Warnings,
) -> Result<BinningSpec> {
    let mut parsed = Vec::new();
    let mut rejected = Vec::new();
    for item in list.split(',').map(str::trim) {
        match parse_shorthand(item) {
            Some(v) => parsed.push(v),
            None => rejected.push(item.to_string()),
        }
    }

    if !rejected.is_empty() {
        let err = MapError::TaskSyntax {
            task: task.to_string(),
            reason: format!("unparsable thresholds {rejected:?}"),
        };
        if !policy.is_smart() {
            return Err(err);
        }
        warnings.push(Warning::ThresholdsCleaned {
            task: task.to_string(),
            detail: format!("dropped {rejected:?}"),
        });
    }

    parsed.sort_by(f64::total_cmp);
    let before = parsed.len();
    parsed.dedup();
    if parsed.len() != before {
        if !policy.is_smart() {
            return Err(MapError::TaskSyntax {
                task: task.to_string(),
                reason: "duplicate thresholds".into(),
            });
        }
        warnings.push(Warning::ThresholdsCleaned {
            task: task.to_string(),
            detail: format!("removed {} duplicate(s)", before - parsed.len()),
        });
    }

    if parsed.is_empty() {
        let err = MapError::TaskSyntax {
            task: task.to_string(),
            reason: "no thresholds given".into(),
        };
        if !policy.is_smart() {
            return Err(err);
        }
        warnings.push(Warning::ThresholdsCleaned {
            task: task.to_string(),
            detail: "no thresholds left; a single bin covers every value".into(),
        });
    }

    Ok(BinningSpec::Thresholds(parsed))
}

fn fall_back(
    err: MapError,
    task: &str,
    replacement: BinningSpec,
    policy: ErrorPolicy,
    warnings: &mut Warnings,
) -> Result<BinningSpec> {
    if !policy.is_smart() {
        return Err(err);
    }
    warnings.push(Warning::TaskFallback {
        task: task.to_string(),
        replacement: replacement.to_string(),
        reason: err.to_string(),
    });
    Ok(replacement)
}
