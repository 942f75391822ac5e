//! Palette resolver: palette specification + bin count => one color per bin.
//!
//! Resolution is deterministic. In smart mode a palette that cannot provide
//! exactly `k` colors is replaced, in order, by:
//! 1. the first `k` colors of an explicit list that is too long,
//! 2. the family default scheme (`Set3`, `RdYlBu` or `YlGnBu`; `RdYlBu` then
//!    `Set3` for explicit lists),
//! 3. the generated `force_default` ramp, when one is configured,
//! 4. an interpolation across the requested colors.
//!
//! Every replacement is recorded as a [`Warning::PaletteFallback`].

use crate::color::{DefaultPalette, Rgb};
use crate::error::{ErrorPolicy, MapError, Result, Warning, Warnings};
use crate::palettes::{self, DEFAULT_DIV, DEFAULT_QUAL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between colors of an explicit palette string.
pub const COLOR_SEPARATOR: char = '_';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteSpec {
    /// A scheme of the named palette table.
    Named(String),
    /// Colors in bin order.
    Explicit(Vec<Rgb>),
}

impl PaletteSpec {
    /// A table name, or colors such as `#ff0000_#00ff00` or `255,0,0_0,255,0`.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if let Some(p) = palettes::lookup(s) {
            return Ok(PaletteSpec::Named(p.name.to_string()));
        }
        let colors = s
            .split(COLOR_SEPARATOR)
            .map(Rgb::parse)
            .collect::<Result<Vec<_>>>()
            .map_err(|_| MapError::PaletteSyntax {
                input: input.to_string(),
                reason: format!(
                    "neither a palette name nor colors separated by '{COLOR_SEPARATOR}'"
                ),
            })?;
        Ok(PaletteSpec::Explicit(colors))
    }
}

impl FromStr for PaletteSpec {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        PaletteSpec::parse(s)
    }
}

impl fmt::Display for PaletteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteSpec::Named(name) => f.write_str(name),
            PaletteSpec::Explicit(colors) => {
                let hex: Vec<String> = colors.iter().map(|c| c.to_hex()).collect();
                f.write_str(&hex.join("_"))
            }
        }
    }
}

/// Parameters of one palette resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteRequest {
    /// Number of colors needed (the bin count).
    pub k: usize,
    pub invert: bool,
    pub force_default: Option<DefaultPalette>,
    pub policy: ErrorPolicy,
}

impl PaletteRequest {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            invert: false,
            force_default: None,
            policy: ErrorPolicy::Strict,
        }
    }
}

/// Resolve `spec` into exactly `req.k` colors in bin order.
pub fn resolve_palette(
    spec: &PaletteSpec,
    req: &PaletteRequest,
    warnings: &mut Warnings,
) -> Result<Vec<Rgb>> {
    let mut colors = match exact(spec, req.k) {
        Ok(colors) => colors,
        Err(err) if req.policy.is_smart() => {
            substitute(Some(spec), &spec.to_string(), req, err, warnings)?
        }
        Err(err) => return Err(err),
    };
    if req.invert {
        colors.reverse();
    }
    Ok(colors)
}

/// Like [`resolve_palette`] but starts from the user's palette string, so a
/// string that does not parse also goes through the smart substitutions.
pub fn resolve_palette_str(
    input: &str,
    req: &PaletteRequest,
    warnings: &mut Warnings,
) -> Result<Vec<Rgb>> {
    match PaletteSpec::parse(input) {
        Ok(spec) => resolve_palette(&spec, req, warnings),
        Err(err) if req.policy.is_smart() => {
            let mut colors = substitute(None, input, req, err, warnings)?;
            if req.invert {
                colors.reverse();
            }
            Ok(colors)
        }
        Err(err) => Err(err),
    }
}

fn exact(spec: &PaletteSpec, k: usize) -> Result<Vec<Rgb>> {
    match spec {
        PaletteSpec::Named(name) => {
            let p = palettes::lookup(name).ok_or_else(|| MapError::PaletteSyntax {
                input: name.clone(),
                reason: "unknown palette name".into(),
            })?;
            p.take(k).ok_or(MapError::PaletteSize {
                palette: p.name.to_string(),
                requested: k,
                available: p.max_colors(),
            })
        }
        PaletteSpec::Explicit(colors) if colors.len() == k => Ok(colors.clone()),
        PaletteSpec::Explicit(colors) => Err(MapError::PaletteSize {
            palette: spec.to_string(),
            requested: k,
            available: colors.len(),
        }),
    }
}

fn substitute(
    spec: Option<&PaletteSpec>,
    requested: &str,
    req: &PaletteRequest,
    err: MapError,
    warnings: &mut Warnings,
) -> Result<Vec<Rgb>> {
    let k = req.k;
    let mut note = |used: String| {
        warnings.push(Warning::PaletteFallback {
            requested: requested.to_string(),
            used,
            reason: err.to_string(),
        });
    };

    if let Some(PaletteSpec::Explicit(colors)) = spec
        && colors.len() > k
    {
        note(format!("first {k} colors"));
        return Ok(colors[..k].to_vec());
    }

    let named = match spec {
        Some(PaletteSpec::Named(name)) => palettes::lookup(name),
        _ => None,
    };
    let family: Vec<&str> = match named {
        Some(p) => vec![palettes::family_default(p.typ)],
        None => vec![DEFAULT_DIV, DEFAULT_QUAL],
    };
    for name in family {
        if let Some(colors) = palettes::lookup(name).and_then(|p| p.take(k)) {
            note(name.to_string());
            return Ok(colors);
        }
    }

    if let Some(d) = req.force_default {
        note(d.to_string());
        return Ok(d.colors(k));
    }

    let stops = match (named, spec) {
        (Some(p), _) => p.take(p.max_colors()),
        (None, Some(PaletteSpec::Explicit(colors))) if !colors.is_empty() => Some(colors.clone()),
        _ => None,
    };
    if let Some(stops) = stops {
        note(format!("{k} colors interpolated from {requested}"));
        return Ok(interpolate(&stops, k));
    }
    Err(err)
}

/// `k` colors spread linearly (in RGB) across `stops`.
fn interpolate(stops: &[Rgb], k: usize) -> Vec<Rgb> {
    if stops.len() == 1 || k <= 1 {
        return vec![stops[0]; k];
    }
    let last = (stops.len() - 1) as f64;
    (0..k)
        .map(|i| {
            let pos = i as f64 * last / (k - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(stops.len() - 1);
            let t = pos - lo as f64;
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            let (a, b) = (stops[lo], stops[hi]);
            Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
        })
        .collect()
}
