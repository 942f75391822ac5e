//! Legend builder: bins + colors => ordered legend entries.
//!
//! Interval phrasing is a [`LegendStyle`] strategy looked up by language tag.

use crate::binning::{Bin, BinKey};
use crate::color::Rgb;
use crate::error::{MapError, Result};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Which legend to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendMode {
    None,
    #[default]
    Full,
    MinMaxOnly,
}

impl FromStr for LegendMode {
    type Err = MapError;

    /// Accepts the names and the numeric codes `0`, `1`, `2`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(LegendMode::None),
            "full" | "1" => Ok(LegendMode::Full),
            "min_max_only" | "min_max" | "2" => Ok(LegendMode::MinMaxOnly),
            _ => Err(MapError::InvalidOption {
                name: "legend mode",
                value: s.to_string(),
                expected: "none, full, min_max_only",
            }),
        }
    }
}

/// Legend language tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    De,
    #[default]
    Math,
    Nerd,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::De => "de",
            Language::Math => "math",
            Language::Nerd => "nerd",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "de" => Ok(Language::De),
            "math" => Ok(Language::Math),
            "nerd" => Ok(Language::Nerd),
            _ => Err(MapError::InvalidOption {
                name: "language",
                value: s.to_string(),
                expected: "en, es, de, math, nerd",
            }),
        }
    }
}

/// Print a number with `decimals` precision and a `k`/`M`/`B`/`T` suffix.
/// Decimals that are all zero are dropped: `1000` -> `1k`, `1500` (1 decimal) -> `1.5k`.
pub fn format_number(v: f64, decimals: usize) -> String {
    const MAGNITUDES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "k")];
    let (scaled, suffix) = MAGNITUDES
        .iter()
        .find(|(m, _)| v.abs() >= *m)
        .map(|(m, s)| (v / m, *s))
        .unwrap_or((v, ""));
    let mut s = format!("{scaled:.decimals$}");
    if let Some((int, frac)) = s.split_once('.')
        && frac.bytes().all(|b| b == b'0')
    {
        s = int.to_string();
    }
    if s == "-0" {
        s = "0".into();
    }
    format!("{s}{suffix}")
}

/// Phrasing of one bin in one language.
pub trait LegendStyle: Send + Sync {
    /// Label of an interval bin; discrete bins print their value in full.
    fn format(&self, bin: &Bin, decimals: usize) -> String;

    /// Labels of the `min_max_only` legend.
    fn extremes(&self) -> (&'static str, &'static str);
}

/// Word-based phrasing ("less than", "between", ...).
struct Phrasing {
    below: &'static str,
    between: &'static str,
    and: &'static str,
    above: &'static str,
    everything: &'static str,
    lowest: &'static str,
    highest: &'static str,
}

impl LegendStyle for Phrasing {
    fn format(&self, bin: &Bin, decimals: usize) -> String {
        if let Some(label) = bin.key.discrete_key() {
            return label;
        }
        let BinKey::Interval { lower, upper, .. } = bin.key else {
            return String::new();
        };
        let n = |v: f64| format_number(v, decimals);
        match (lower, upper) {
            (None, Some(u)) => format!("{}{}", self.below, n(u)),
            (Some(l), Some(u)) => format!("{}{}{}{}", self.between, n(l), self.and, n(u)),
            (Some(l), None) => format!("{}{}", self.above, n(l)),
            (None, None) => self.everything.to_string(),
        }
    }

    fn extremes(&self) -> (&'static str, &'static str) {
        (self.lowest, self.highest)
    }
}

/// Interval notation: `[a, b)`.
struct MathStyle;

impl LegendStyle for MathStyle {
    fn format(&self, bin: &Bin, decimals: usize) -> String {
        if let Some(label) = bin.key.discrete_key() {
            return label;
        }
        let BinKey::Interval {
            lower,
            upper,
            upper_closed,
        } = bin.key
        else {
            return String::new();
        };
        let lo = lower.map_or("(-∞".to_string(), |l| format!("[{}", format_number(l, decimals)));
        let hi = match upper {
            None => "+∞)".to_string(),
            Some(u) if upper_closed => format!("{}]", format_number(u, decimals)),
            Some(u) => format!("{})", format_number(u, decimals)),
        };
        format!("{lo}, {hi}")
    }

    fn extremes(&self) -> (&'static str, &'static str) {
        ("minimum", "maximum")
    }
}

/// Inequalities: `a ≤ x < b`.
struct NerdStyle;

impl LegendStyle for NerdStyle {
    fn format(&self, bin: &Bin, decimals: usize) -> String {
        if let Some(label) = bin.key.discrete_key() {
            return label;
        }
        let BinKey::Interval {
            lower,
            upper,
            upper_closed,
        } = bin.key
        else {
            return String::new();
        };
        let n = |v: f64| format_number(v, decimals);
        let op = if upper_closed { "≤" } else { "<" };
        match (lower, upper) {
            (None, Some(u)) => format!("x {op} {}", n(u)),
            (Some(l), Some(u)) => format!("{} ≤ x {op} {}", n(l), n(u)),
            (Some(l), None) => format!("x ≥ {}", n(l)),
            (None, None) => "x ∈ ℝ".to_string(),
        }
    }

    fn extremes(&self) -> (&'static str, &'static str) {
        ("min(x)", "max(x)")
    }
}

lazy_static! {
    static ref STYLES: HashMap<&'static str, Box<dyn LegendStyle>> = {
        let mut m: HashMap<&'static str, Box<dyn LegendStyle>> = HashMap::new();
        m.insert("en", Box::new(Phrasing {
            below: "less than ",
            between: "between ",
            and: " and ",
            above: "more than ",
            everything: "all values",
            lowest: "Lowest",
            highest: "Highest",
        }));
        m.insert("es", Box::new(Phrasing {
            below: "menos de ",
            between: "entre ",
            and: " y ",
            above: "más de ",
            everything: "todos los valores",
            lowest: "Mínimo",
            highest: "Máximo",
        }));
        m.insert("de", Box::new(Phrasing {
            below: "weniger als ",
            between: "zwischen ",
            and: " und ",
            above: "mehr als ",
            everything: "alle Werte",
            lowest: "Minimum",
            highest: "Maximal",
        }));
        m.insert("math", Box::new(MathStyle));
        m.insert("nerd", Box::new(NerdStyle));
        m
    };
}

pub fn style_for(language: Language) -> &'static dyn LegendStyle {
    match STYLES.get(language.tag()) {
        Some(style) => style.as_ref(),
        None => &MathStyle,
    }
}

/// One legend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub country_count: usize,
    pub bin_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LegendOptions<'a> {
    pub mode: LegendMode,
    pub language: Language,
    pub decimals: usize,
    /// Display text keyed by discrete value or bin index.
    pub aliases: Option<&'a BTreeMap<String, String>>,
    pub colors_used_only: bool,
}

/// Build the legend for `bins`, colored with `colors` (one per bin, paired by position).
pub fn build_legend(
    bins: &[Bin],
    colors: &[Rgb],
    opts: &LegendOptions<'_>,
) -> Result<Vec<LegendEntry>> {
    if opts.mode == LegendMode::None {
        return Ok(Vec::new());
    }
    if colors.len() != bins.len() {
        return Err(MapError::PaletteSize {
            palette: "legend colors".into(),
            requested: bins.len(),
            available: colors.len(),
        });
    }
    let style = style_for(opts.language);
    let painted: Vec<(&Bin, Rgb)> = bins.iter().zip(colors.iter().copied()).collect();

    let mut entries = Vec::new();
    match opts.mode {
        LegendMode::MinMaxOnly => {
            let first = painted.iter().find(|(b, _)| !b.is_empty());
            let last = painted.iter().rev().find(|(b, _)| !b.is_empty());
            let (Some(&first), Some(&last)) = (first, last) else {
                return Ok(Vec::new());
            };
            let (lowest, highest) = style.extremes();
            for ((bin, color), word) in [(first, lowest), (last, highest)] {
                let label = match alias(bin, opts.aliases)? {
                    Some(a) => a,
                    None => word.to_string(),
                };
                entries.push(entry(bin, color, label));
            }
        }
        _ => {
            for &(bin, color) in &painted {
                let label = match alias(bin, opts.aliases)? {
                    Some(a) => a,
                    None => style.format(bin, opts.decimals),
                };
                entries.push(entry(bin, color, label));
            }
        }
    }

    if opts.colors_used_only {
        entries.retain(|e| e.country_count > 0);
    }
    Ok(entries)
}

fn entry(bin: &Bin, color: Rgb, label: String) -> LegendEntry {
    LegendEntry {
        label,
        color,
        country_count: bin.members.len(),
        bin_index: bin.index,
    }
}

/// Alias for `bin`: by discrete value first, then by index.
/// A non-empty bin without an alias is an error.
fn alias(bin: &Bin, aliases: Option<&BTreeMap<String, String>>) -> Result<Option<String>> {
    let Some(aliases) = aliases else {
        return Ok(None);
    };
    let index_key = bin.index.to_string();
    let discrete = bin.key.discrete_key();
    let found = discrete
        .iter()
        .chain(std::iter::once(&index_key))
        .find_map(|k| aliases.get(k));
    match found {
        Some(a) => Ok(Some(a.clone())),
        None if bin.is_empty() => Ok(None),
        None => Err(MapError::AliasMapping {
            key: discrete.unwrap_or(index_key),
        }),
    }
}
