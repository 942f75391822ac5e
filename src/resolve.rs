//! Country resolver: reconcile data codes against the geometry's known codes.

use crate::binning::Binning;
use crate::color::Rgb;
use crate::error::{Warning, Warnings};
use crate::models::{CountryValue, RawRecord, canonical_code};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Source of the ISO codes a map can draw.
pub trait GeometryProvider {
    fn known_codes(&self) -> BTreeSet<String>;
}

impl GeometryProvider for BTreeSet<String> {
    fn known_codes(&self) -> BTreeSet<String> {
        self.iter().map(|c| canonical_code(c)).collect()
    }
}

impl GeometryProvider for HashSet<String> {
    fn known_codes(&self) -> BTreeSet<String> {
        self.iter().map(|c| canonical_code(c)).collect()
    }
}

impl GeometryProvider for [&str] {
    fn known_codes(&self) -> BTreeSet<String> {
        self.iter().map(|c| canonical_code(c)).collect()
    }
}

/// How one geometry region is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "bin", rename_all = "snake_case")]
pub enum Resolution {
    Colored(usize),
    Missing,
}

impl Resolution {
    pub fn status(&self) -> &'static str {
        match self {
            Resolution::Colored(_) => "colored",
            Resolution::Missing => "missing",
        }
    }

    pub fn bin(&self) -> Option<usize> {
        match self {
            Resolution::Colored(i) => Some(*i),
            Resolution::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFill {
    pub code: String,
    pub resolution: Resolution,
    pub color: Rgb,
}

/// Anything keyed by a country code.
pub trait CountryCoded {
    /// Canonical (trimmed, upper-case) code.
    fn country_code(&self) -> String;
}

impl CountryCoded for RawRecord {
    fn country_code(&self) -> String {
        canonical_code(&self.country_code)
    }
}

impl CountryCoded for CountryValue {
    fn country_code(&self) -> String {
        canonical_code(&self.code)
    }
}

/// Items split by whether the geometry can draw them.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched<T> {
    pub values: Vec<T>,
    /// Codes absent from the geometry, first occurrence only, in input order.
    pub unknown: Vec<String>,
}

/// Keep the items whose code the geometry knows; the rest become
/// [`Warning::UnknownCode`] and take no part in normalization, statistics or binning.
/// Items with an empty code are kept so the normalizer can report them.
pub fn partition_by_geometry<T: CountryCoded>(
    items: Vec<T>,
    known: &BTreeSet<String>,
    warnings: &mut Warnings,
) -> Matched<T> {
    let mut matched = Matched {
        values: Vec::new(),
        unknown: Vec::new(),
    };
    for item in items {
        let code = item.country_code();
        if code.is_empty() || known.contains(&code) {
            matched.values.push(item);
        } else if !matched.unknown.contains(&code) {
            warnings.push(Warning::UnknownCode { code: code.clone() });
            matched.unknown.push(code);
        }
    }
    log::debug!(
        "{} records matched the geometry, {} unknown codes",
        matched.values.len(),
        matched.unknown.len()
    );
    matched
}

/// Classify one geometry code.
pub fn classify(code: &str, binning: &Binning) -> Resolution {
    match binning.bin_of(code) {
        Some(i) => Resolution::Colored(i),
        None => Resolution::Missing,
    }
}

/// One fill per known geometry code, in code order.
pub fn region_fills(
    known: &BTreeSet<String>,
    binning: &Binning,
    colors: &[Rgb],
    missing_color: Rgb,
) -> Vec<RegionFill> {
    known
        .iter()
        .map(|code| {
            let resolution = classify(code, binning);
            let color = resolution
                .bin()
                .and_then(|i| colors.get(i).copied())
                .unwrap_or(missing_color);
            RegionFill {
                code: code.clone(),
                resolution,
                color,
            }
        })
        .collect()
}
