//! Value normalizer: raw cells to numbers or category labels.
//!
//! Numeric shorthand: optional sign, digits, optional decimal point and an
//! optional magnitude suffix (`k`/`K` = 1e3, `m`/`M` = 1e6, `b`/`B` = 1e9).

use crate::error::{ErrorPolicy, MapError, Result, Warning, Warnings};
use crate::models::{CountryValue, NormalizedValue, RawRecord, RawValue, canonical_code};
use crate::task::BinningSpec;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref SHORTHAND: Regex =
        Regex::new(r"^([+-]?)(\d+(?:\.\d*)?|\.\d+)([kKmMbB]?)$").expect("shorthand regex");
}

/// Tokens that mean "no value" rather than a malformed one.
const MISSING_MARKERS: [&str; 6] = ["na", "n/a", "nan", "null", "..", "-"];

/// Parse a shorthand numeric literal such as `12`, `-3.5`, `1K` or `2.5m`.
/// Literals too large for a finite `f64` are rejected.
pub fn parse_shorthand(token: &str) -> Option<f64> {
    let caps = SHORTHAND.captures(token.trim())?;
    let magnitude: f64 = caps[2].parse().ok()?;
    let factor = match caps[3].to_ascii_lowercase().as_str() {
        "k" => 1e3,
        "m" => 1e6,
        "b" => 1e9,
        _ => 1.0,
    };
    let sign = if &caps[1] == "-" { -1.0 } else { 1.0 };
    let v = sign * magnitude * factor;
    v.is_finite().then_some(v)
}

fn is_missing_marker(token: &str) -> bool {
    token.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|m| token.eq_ignore_ascii_case(m))
}

fn is_bare_label(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_alphabetic)
}

/// Normalize a single cell. `Ok(None)` means the cell holds no usable value.
pub fn normalize_value(code: &str, raw: &RawValue) -> Result<Option<NormalizedValue>> {
    match raw {
        RawValue::Number(v) if v.is_finite() => Ok(Some(NormalizedValue::Numeric(*v))),
        RawValue::Number(v) => Err(MapError::MalformedValue {
            code: code.to_string(),
            token: v.to_string(),
        }),
        RawValue::Text(s) => {
            let token = s.trim();
            if is_missing_marker(token) {
                Ok(None)
            } else if let Some(v) = parse_shorthand(token) {
                Ok(Some(NormalizedValue::Numeric(v)))
            } else if is_bare_label(token) {
                Ok(Some(NormalizedValue::Label(token.to_string())))
            } else {
                Err(MapError::MalformedValue {
                    code: code.to_string(),
                    token: token.to_string(),
                })
            }
        }
    }
}

/// Output of [`normalize_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Homogeneous values in input order.
    pub values: Vec<CountryValue>,
    /// The task to bin with; differs from the requested one only after a smart fallback.
    pub task: BinningSpec,
}

struct Row {
    value: CountryValue,
    token: String,
}

/// Normalize every record and enforce a homogeneous data kind for `task`.
pub fn normalize_records(
    records: &[RawRecord],
    task: &BinningSpec,
    policy: ErrorPolicy,
    warnings: &mut Warnings,
) -> Result<Normalized> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows: Vec<Row> = Vec::with_capacity(records.len());

    for record in records {
        let code = canonical_code(&record.country_code);
        if code.is_empty() {
            warnings.push(Warning::DroppedRecord {
                code,
                reason: "empty country code".into(),
            });
            continue;
        }
        let value = match normalize_value(&code, &record.raw_value) {
            Ok(Some(v)) => v,
            Ok(None) => {
                log::debug!("no value for {code}");
                continue;
            }
            Err(e) if policy.is_smart() => {
                warnings.push(Warning::DroppedRecord {
                    code,
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };
        if !seen.insert(code.clone()) {
            warnings.push(Warning::DuplicateRecord { code });
            continue;
        }
        rows.push(Row {
            value: CountryValue::new(code, value),
            token: record.raw_value.token(),
        });
    }

    let label_count = rows.iter().filter(|r| !r.value.value.is_numeric()).count();
    let numeric_count = rows.len() - label_count;
    let mut task = task.clone();

    if label_count > 0 && numeric_count > 0 && task == BinningSpec::Values {
        // Mixed kinds under `values`.
        if !policy.is_smart() {
            let first_kind = rows[0].value.value.is_numeric();
            let odd = rows
                .iter()
                .find(|r| r.value.value.is_numeric() != first_kind)
                .unwrap_or(&rows[0]);
            return Err(MapError::NonNumericData {
                code: odd.value.code.clone(),
                token: odd.token.clone(),
                task: task.to_string(),
            });
        }
        warnings.push(Warning::DataKindFallback {
            detail: format!(
                "mixed data ({numeric_count} numeric, {label_count} labels); every value is used as a label"
            ),
        });
        for row in rows.iter_mut() {
            if row.value.value.is_numeric() {
                row.value.value = NormalizedValue::Label(row.token.clone());
            }
        }
    } else if label_count > 0 && task != BinningSpec::Values {
        if !policy.is_smart() {
            let Some(odd) = rows.iter().find(|r| !r.value.value.is_numeric()) else {
                return Err(MapError::EmptyData);
            };
            return Err(MapError::NonNumericData {
                code: odd.value.code.clone(),
                token: odd.token.clone(),
                task: task.to_string(),
            });
        }
        if numeric_count == 0 {
            warnings.push(Warning::TaskFallback {
                task: task.to_string(),
                replacement: BinningSpec::Values.to_string(),
                reason: "all values are labels".into(),
            });
            task = BinningSpec::Values;
        } else {
            rows.retain(|r| {
                if r.value.value.is_numeric() {
                    return true;
                }
                warnings.push(Warning::DroppedRecord {
                    code: r.value.code.clone(),
                    reason: format!("label {:?} under a numeric task", r.token),
                });
                false
            });
        }
    }

    if rows.is_empty() {
        return Err(MapError::EmptyData);
    }

    Ok(Normalized {
        values: rows.into_iter().map(|r| r.value).collect(),
        task,
    })
}
