//! End-to-end run: raw records + geometry + options => a drawable map plan.

use crate::binning::{Binning, bin_values};
use crate::color::{DefaultPalette, Rgb};
use crate::error::{ErrorPolicy, Result, Warnings};
use crate::legend::{Language, LegendEntry, LegendMode, LegendOptions, build_legend};
use crate::models::RawRecord;
use crate::normalize::normalize_records;
use crate::palette::{PaletteRequest, resolve_palette_str};
use crate::resolve::{GeometryProvider, RegionFill, partition_by_geometry, region_fills};
use crate::task::parse_task;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every parameter of one run. Missing JSON fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub task: String,
    /// Table name or `_`-separated colors.
    pub palette: String,
    pub invert_palette: bool,
    pub force_default_palette: Option<DefaultPalette>,
    pub missing_color: Rgb,
    pub ocean_color: Rgb,
    pub legend: LegendMode,
    pub language: Language,
    pub decimals: usize,
    pub colors_used_only: bool,
    pub legend_aliases: Option<BTreeMap<String, String>>,
    pub text_box: Option<String>,
    pub policy: ErrorPolicy,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            task: "values".into(),
            palette: "RdYlBu".into(),
            invert_palette: false,
            force_default_palette: Some(DefaultPalette::Reds),
            missing_color: Rgb::new(0xe6, 0xe6, 0xe6),
            ocean_color: Rgb::WHITE,
            legend: LegendMode::Full,
            language: Language::Math,
            decimals: 0,
            colors_used_only: true,
            legend_aliases: None,
            text_box: None,
            policy: ErrorPolicy::Strict,
        }
    }
}

/// Output of [`draw_map`]; everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethMap {
    /// Bins with members and colors attached.
    pub binning: Binning,
    /// One color per bin.
    pub colors: Vec<Rgb>,
    pub legend: Vec<LegendEntry>,
    /// One fill per geometry code.
    pub regions: Vec<RegionFill>,
    pub unknown_codes: Vec<String>,
    pub missing_color: Rgb,
    pub ocean_color: Rgb,
    /// Legend and text box color, readable on the ocean color.
    pub text_color: Rgb,
    pub text_box: Option<String>,
    pub warnings: Warnings,
}

impl ChoroplethMap {
    pub fn fill_of(&self, code: &str) -> Option<Rgb> {
        self.regions.iter().find(|r| r.code == code).map(|r| r.color)
    }
}

/// Run every stage: task, geometry matching, normalization, binning, palette,
/// legend and region fills.
pub fn draw_map<G>(
    records: &[RawRecord],
    geometry: &G,
    options: &MapOptions,
) -> Result<ChoroplethMap>
where
    G: GeometryProvider + ?Sized,
{
    let mut warnings = Warnings::new();
    let policy = options.policy;

    let task = parse_task(&options.task, policy, &mut warnings)?;

    // Unknown codes are set aside before any value is looked at.
    let known = geometry.known_codes();
    let matched = partition_by_geometry(records.to_vec(), &known, &mut warnings);
    let normalized = normalize_records(&matched.values, &task, policy, &mut warnings)?;

    let mut binning = bin_values(&normalized.values, &normalized.task, &mut warnings)?;
    log::debug!("task {} produced {} bins", binning.spec, binning.len());

    let request = PaletteRequest {
        k: binning.len(),
        invert: options.invert_palette,
        force_default: options.force_default_palette,
        policy,
    };
    let colors = resolve_palette_str(&options.palette, &request, &mut warnings)?;
    binning.paint(&colors);

    let legend = build_legend(
        &binning.bins,
        &colors,
        &LegendOptions {
            mode: options.legend,
            language: options.language,
            decimals: options.decimals,
            aliases: options.legend_aliases.as_ref(),
            colors_used_only: options.colors_used_only,
        },
    )?;
    let regions = region_fills(&known, &binning, &colors, options.missing_color);

    Ok(ChoroplethMap {
        binning,
        colors,
        legend,
        regions,
        unknown_codes: matched.unknown,
        missing_color: options.missing_color,
        ocean_color: options.ocean_color,
        text_color: options.ocean_color.contrasting_text(),
        text_box: options.text_box.clone(),
        warnings,
    })
}
