//! Binning engine: normalized values + task => ordered bins.
//!
//! Interval tasks reduce to a sorted list of cut points; a value lands in the
//! bin whose index equals the number of cut points `<= value`, so ties at a
//! cut point always go to the upper bin.

use crate::color::Rgb;
use crate::error::{MapError, Result, Warning, Warnings};
use crate::models::{CountryValue, NormalizedValue};
use crate::stats::{Summary, summarize};
use crate::task::{BinningSpec, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What a bin stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BinKey {
    /// `[lower, upper)`, or `[lower, upper]` when `upper_closed`.
    /// `None` bounds are infinite.
    Interval {
        lower: Option<f64>,
        upper: Option<f64>,
        upper_closed: bool,
    },
    /// A distinct numeric value (`values` task).
    Value { value: f64 },
    /// A distinct category (`values` task).
    Label { label: String },
}

impl BinKey {
    pub fn contains(&self, v: f64) -> bool {
        match *self {
            BinKey::Interval {
                lower,
                upper,
                upper_closed,
            } => {
                let above = lower.is_none_or(|l| v >= l);
                let below = match upper {
                    None => true,
                    Some(u) if upper_closed => v <= u,
                    Some(u) => v < u,
                };
                above && below
            }
            BinKey::Value { value } => v == value,
            BinKey::Label { .. } => false,
        }
    }

    /// Key used to look up a legend alias for discrete bins.
    pub fn discrete_key(&self) -> Option<String> {
        match self {
            BinKey::Value { value } => Some(value.to_string()),
            BinKey::Label { label } => Some(label.clone()),
            BinKey::Interval { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub index: usize,
    pub key: BinKey,
    pub members: BTreeSet<String>,
    /// Assigned by [`Binning::paint`].
    pub color: Option<Rgb>,
}

impl Bin {
    fn new(index: usize, key: BinKey) -> Self {
        Self {
            index,
            key,
            members: BTreeSet::new(),
            color: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of binning one data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    pub spec: BinningSpec,
    pub bins: Vec<Bin>,
    /// Country code -> bin index.
    pub assignment: BTreeMap<String, usize>,
    /// Statistics of numeric data; `None` for label data.
    pub summary: Option<Summary>,
}

impl Binning {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bin_of(&self, code: &str) -> Option<usize> {
        self.assignment.get(code).copied()
    }

    /// Attach one color per bin, in bin order.
    pub fn paint(&mut self, colors: &[Rgb]) {
        for (bin, color) in self.bins.iter_mut().zip(colors) {
            bin.color = Some(*color);
        }
    }

    fn assign(&mut self, code: &str, index: usize) {
        self.bins[index].members.insert(code.to_string());
        self.assignment.insert(code.to_string(), index);
    }
}

/// Split `values` into bins according to `spec`.
///
/// `values` must already be homogeneous (see [`crate::normalize::normalize_records`]).
pub fn bin_values(
    values: &[CountryValue],
    spec: &BinningSpec,
    warnings: &mut Warnings,
) -> Result<Binning> {
    if values.is_empty() {
        return Err(MapError::EmptyData);
    }

    let numbers: Vec<f64> = values.iter().filter_map(|cv| cv.value.as_f64()).collect();
    let summary = summarize(&numbers);

    let mut binning = Binning {
        spec: spec.clone(),
        bins: Vec::new(),
        assignment: BTreeMap::new(),
        summary,
    };

    if spec.is_numeric()
        && let Some(cv) = values.iter().find(|cv| !cv.value.is_numeric())
    {
        return Err(MapError::NonNumericData {
            code: cv.code.clone(),
            token: cv.value.to_string(),
            task: spec.to_string(),
        });
    }
    let summary = match (spec, binning.summary.clone()) {
        (BinningSpec::Values, _) => {
            bin_distinct(&mut binning, values);
            return Ok(binning);
        }
        (_, Some(summary)) => summary,
        (_, None) => return Err(MapError::EmptyData),
    };

    let (cuts, keys) = match spec {
        BinningSpec::EqualBins(n) => equal_width(*n, &summary, warnings),
        BinningSpec::Thresholds(ts) => open_ended(ts.clone()),
        BinningSpec::SignSplit => open_ended(vec![0.0]),
        BinningSpec::StatSplit(kind) => open_ended(vec![statistic(*kind, &summary)]),
        BinningSpec::Values => (Vec::new(), Vec::new()),
    };
    binning.bins = keys
        .into_iter()
        .enumerate()
        .map(|(i, key)| Bin::new(i, key))
        .collect();

    for cv in values {
        if let Some(v) = cv.value.as_f64() {
            let index = cuts.partition_point(|c| *c <= v);
            binning.assign(&cv.code, index);
        }
    }
    Ok(binning)
}

fn bin_distinct(binning: &mut Binning, values: &[CountryValue]) {
    let labels = values.iter().any(|cv| !cv.value.is_numeric());
    let mut keys: Vec<BinKey> = Vec::new();
    if labels {
        // First-seen order.
        for cv in values {
            let label = cv.value.to_string();
            if !keys.iter().any(|k| matches!(k, BinKey::Label { label: l } if *l == label)) {
                keys.push(BinKey::Label { label });
            }
        }
    } else {
        let mut distinct: Vec<f64> = values.iter().filter_map(|cv| cv.value.as_f64()).collect();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup_by(|a, b| a == b);
        keys = distinct
            .into_iter()
            .map(|value| BinKey::Value { value })
            .collect();
    }
    binning.bins = keys
        .into_iter()
        .enumerate()
        .map(|(i, key)| Bin::new(i, key))
        .collect();

    for cv in values {
        let index = binning.bins.iter().position(|b| match (&b.key, &cv.value) {
            (BinKey::Label { label }, NormalizedValue::Label(l)) => label == l,
            (BinKey::Value { value }, NormalizedValue::Numeric(v)) => value == v,
            _ => false,
        });
        if let Some(index) = index {
            binning.assign(&cv.code, index);
        }
    }
}

/// Equal-width bins over `[min, max]`; the last bin is closed at `max`.
fn equal_width(n: usize, summary: &Summary, warnings: &mut Warnings) -> (Vec<f64>, Vec<BinKey>) {
    let (min, max) = (summary.min, summary.max);
    if min == max || n <= 1 {
        if n > 1 {
            warnings.push(Warning::DegenerateBins {
                requested: n,
                value: min,
            });
        }
        let key = BinKey::Interval {
            lower: Some(min),
            upper: Some(max),
            upper_closed: true,
        };
        return (Vec::new(), vec![key]);
    }

    let width = (max - min) / n as f64;
    let cuts: Vec<f64> = (1..n).map(|i| min + width * i as f64).collect();
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(min);
    edges.extend(cuts.iter().copied());
    edges.push(max);

    let keys = edges
        .windows(2)
        .enumerate()
        .map(|(i, w)| BinKey::Interval {
            lower: Some(w[0]),
            upper: Some(w[1]),
            upper_closed: i == n - 1,
        })
        .collect();
    (cuts, keys)
}

/// Bins `(-inf, t1)`, `[t1, t2)`, ..., `[tk, +inf)`.
fn open_ended(cuts: Vec<f64>) -> (Vec<f64>, Vec<BinKey>) {
    let mut keys = Vec::with_capacity(cuts.len() + 1);
    let mut lower = None;
    for c in &cuts {
        keys.push(BinKey::Interval {
            lower,
            upper: Some(*c),
            upper_closed: false,
        });
        lower = Some(*c);
    }
    keys.push(BinKey::Interval {
        lower,
        upper: None,
        upper_closed: false,
    });
    (cuts, keys)
}

fn statistic(kind: StatKind, summary: &Summary) -> f64 {
    match kind {
        StatKind::Mean => summary.mean,
        StatKind::Median => summary.median,
        StatKind::Std => summary.std,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(code: &str, v: f64) -> CountryValue {
        CountryValue::new(code, NormalizedValue::Numeric(v))
    }

    #[test]
    fn equal_width_edges_are_contiguous() {
        let data = vec![num("AR", 0.0), num("BR", 3.0), num("CL", 10.0)];
        let b = bin_values(&data, &BinningSpec::EqualBins(4), &mut Warnings::new()).unwrap();
        assert_eq!(b.len(), 4);
        for pair in b.bins.windows(2) {
            let (BinKey::Interval { upper, .. }, BinKey::Interval { lower, .. }) =
                (&pair[0].key, &pair[1].key)
            else {
                panic!("interval bins expected");
            };
            assert_eq!(upper, lower);
        }
        assert_eq!(b.bin_of("CL"), Some(3));
        assert_eq!(b.bin_of("BR"), Some(1));
    }

    #[test]
    fn degenerate_range_yields_one_bin_and_a_warning() {
        let data = vec![num("AR", 7.0), num("BR", 7.0)];
        let mut w = Warnings::new();
        let b = bin_values(&data, &BinningSpec::EqualBins(5), &mut w).unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b.bins[0].members.len(), 2);
        assert!(matches!(
            w.iter().next(),
            Some(Warning::DegenerateBins { requested: 5, .. })
        ));
    }

    #[test]
    fn stat_split_ties_go_up() {
        let data = vec![num("AR", 1.0), num("BR", 2.0), num("CL", 3.0)];
        let spec = BinningSpec::StatSplit(StatKind::Median);
        let b = bin_values(&data, &spec, &mut Warnings::new()).unwrap();
        assert_eq!(b.bin_of("AR"), Some(0));
        assert_eq!(b.bin_of("BR"), Some(1));
        assert_eq!(b.bin_of("CL"), Some(1));
    }

    #[test]
    fn numeric_distinct_values_ascend() {
        let data = vec![num("AR", 3.0), num("BR", 1.0), num("CL", 3.0)];
        let b = bin_values(&data, &BinningSpec::Values, &mut Warnings::new()).unwrap();
        assert_eq!(b.bins[0].key, BinKey::Value { value: 1.0 });
        assert_eq!(b.bins[1].members.len(), 2);
    }
}
