//! Named palette table (ColorBrewer schemes by Cynthia Brewer).
//!
//! Each scheme is stored at its largest class count. Smaller requests take a
//! prefix of qualitative schemes and evenly spaced colors of sequential and
//! diverging ones.

use crate::color::Rgb;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Family of a named palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteType {
    /// Light-to-dark, for ordered data.
    Seq,
    /// Two hues around a light midpoint.
    Div,
    /// Unordered hues, for categories.
    Qual,
}

pub struct NamedPalette {
    pub name: &'static str,
    pub typ: PaletteType,
    colors: Vec<Rgb>, // Invariant: length >= 3
}

impl NamedPalette {
    fn new(name: &'static str, typ: PaletteType, hex: &[u32]) -> Self {
        let colors = hex
            .iter()
            .map(|h| Rgb::new((h >> 16) as u8, (h >> 8) as u8, *h as u8))
            .collect();
        Self { name, typ, colors }
    }

    pub fn max_colors(&self) -> usize {
        self.colors.len()
    }

    /// `k` colors in palette order, or `None` when `k` is 0 or above the maximum.
    pub fn take(&self, k: usize) -> Option<Vec<Rgb>> {
        let max = self.colors.len();
        if k == 0 || k > max {
            return None;
        }
        let picked = match (self.typ, k) {
            (PaletteType::Qual, _) => self.colors[..k].to_vec(),
            (_, 1) => vec![self.colors[max / 2]],
            _ => (0..k)
                .map(|i| {
                    let pos = (i * (max - 1)) as f64 / (k - 1) as f64;
                    self.colors[pos.round() as usize]
                })
                .collect(),
        };
        Some(picked)
    }
}

/// Fallback schemes used by the smart palette policy.
pub const DEFAULT_QUAL: &str = "Set3";
pub const DEFAULT_DIV: &str = "RdYlBu";
pub const DEFAULT_SEQ: &str = "YlGnBu";

lazy_static! {
    static ref PALETTES: HashMap<String, NamedPalette> = {
        use PaletteType::*;
        let table = vec![
            // Sequential
            NamedPalette::new("Reds", Seq, &[0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d]),
            NamedPalette::new("Blues", Seq, &[0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b]),
            NamedPalette::new("Greens", Seq, &[0xf7fcf5, 0xe5f5e0, 0xc7e9c0, 0xa1d99b, 0x74c476, 0x41ab5d, 0x238b45, 0x006d2c, 0x00441b]),
            NamedPalette::new("Oranges", Seq, &[0xfff5eb, 0xfee6ce, 0xfdd0a2, 0xfdae6b, 0xfd8d3c, 0xf16913, 0xd94801, 0xa63603, 0x7f2704]),
            NamedPalette::new("Purples", Seq, &[0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f, 0x3f007d]),
            NamedPalette::new("Greys", Seq, &[0xffffff, 0xf0f0f0, 0xd9d9d9, 0xbdbdbd, 0x969696, 0x737373, 0x525252, 0x252525, 0x000000]),
            NamedPalette::new("YlGnBu", Seq, &[0xffffd9, 0xedf8b1, 0xc7e9b4, 0x7fcdbb, 0x41b6c4, 0x1d91c0, 0x225ea8, 0x253494, 0x081d58]),
            NamedPalette::new("YlGn", Seq, &[0xffffe5, 0xf7fcb9, 0xd9f0a3, 0xaddd8e, 0x78c679, 0x41ab5d, 0x238443, 0x006837, 0x004529]),
            NamedPalette::new("YlOrRd", Seq, &[0xffffcc, 0xffeda0, 0xfed976, 0xfeb24c, 0xfd8d3c, 0xfc4e2a, 0xe31a1c, 0xbd0026, 0x800026]),
            NamedPalette::new("YlOrBr", Seq, &[0xffffe5, 0xfff7bc, 0xfee391, 0xfec44f, 0xfe9929, 0xec7014, 0xcc4c02, 0x993404, 0x662506]),
            NamedPalette::new("OrRd", Seq, &[0xfff7ec, 0xfee8c8, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xef6548, 0xd7301f, 0xb30000, 0x7f0000]),
            NamedPalette::new("PuBu", Seq, &[0xfff7fb, 0xece7f2, 0xd0d1e6, 0xa6bddb, 0x74a9cf, 0x3690c0, 0x0570b0, 0x045a8d, 0x023858]),
            NamedPalette::new("PuBuGn", Seq, &[0xfff7fb, 0xece2f0, 0xd0d1e6, 0xa6bddb, 0x67a9cf, 0x3690c0, 0x02818a, 0x016c59, 0x014636]),
            NamedPalette::new("BuPu", Seq, &[0xf7fcfd, 0xe0ecf4, 0xbfd3e6, 0x9ebcda, 0x8c96c6, 0x8c6bb1, 0x88419d, 0x810f7c, 0x4d004b]),
            NamedPalette::new("BuGn", Seq, &[0xf7fcfd, 0xe5f5f9, 0xccece6, 0x99d8c9, 0x66c2a4, 0x41ae76, 0x238b45, 0x006d2c, 0x00441b]),
            NamedPalette::new("GnBu", Seq, &[0xf7fcf0, 0xe0f3db, 0xccebc5, 0xa8ddb5, 0x7bccc4, 0x4eb3d3, 0x2b8cbe, 0x0868ac, 0x084081]),
            NamedPalette::new("RdPu", Seq, &[0xfff7f3, 0xfde0dd, 0xfcc5c0, 0xfa9fb5, 0xf768a1, 0xdd3497, 0xae017e, 0x7a0177, 0x49006a]),
            NamedPalette::new("PuRd", Seq, &[0xf7f4f9, 0xe7e1ef, 0xd4b9da, 0xc994c7, 0xdf65b0, 0xe7298a, 0xce1256, 0x980043, 0x67001f]),
            // Diverging
            NamedPalette::new("RdYlBu", Div, &[0xa50026, 0xd73027, 0xf46d43, 0xfdae61, 0xfee090, 0xffffbf, 0xe0f3f8, 0xabd9e9, 0x74add1, 0x4575b4, 0x313695]),
            NamedPalette::new("RdBu", Div, &[0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xf7f7f7, 0xd1e5f0, 0x92c5de, 0x4393c3, 0x2166ac, 0x053061]),
            NamedPalette::new("RdGy", Div, &[0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xffffff, 0xe0e0e0, 0xbababa, 0x878787, 0x4d4d4d, 0x1a1a1a]),
            NamedPalette::new("RdYlGn", Div, &[0xa50026, 0xd73027, 0xf46d43, 0xfdae61, 0xfee08b, 0xffffbf, 0xd9ef8b, 0xa6d96a, 0x66bd63, 0x1a9850, 0x006837]),
            NamedPalette::new("Spectral", Div, &[0x9e0142, 0xd53e4f, 0xf46d43, 0xfdae61, 0xfee08b, 0xffffbf, 0xe6f598, 0xabdda4, 0x66c2a5, 0x3288bd, 0x5e4fa2]),
            NamedPalette::new("BrBG", Div, &[0x543005, 0x8c510a, 0xbf812d, 0xdfc27d, 0xf6e8c3, 0xf5f5f5, 0xc7eae5, 0x80cdc1, 0x35978f, 0x01665e, 0x003c30]),
            NamedPalette::new("PiYG", Div, &[0x8e0152, 0xc51b7d, 0xde77ae, 0xf1b6da, 0xfde0ef, 0xf7f7f7, 0xe6f5d0, 0xb8e186, 0x7fbc41, 0x4d9221, 0x276419]),
            NamedPalette::new("PRGn", Div, &[0x40004b, 0x762a83, 0x9970ab, 0xc2a5cf, 0xe7d4e8, 0xf7f7f7, 0xd9f0d3, 0xa6dba0, 0x5aae61, 0x1b7837, 0x00441b]),
            NamedPalette::new("PuOr", Div, &[0x7f3b08, 0xb35806, 0xe08214, 0xfdb863, 0xfee0b6, 0xf7f7f7, 0xd8daeb, 0xb2abd2, 0x8073ac, 0x542788, 0x2d004b]),
            // Qualitative
            NamedPalette::new("Set3", Qual, &[0x8dd3c7, 0xffffb3, 0xbebada, 0xfb8072, 0x80b1d3, 0xfdb462, 0xb3de69, 0xfccde5, 0xd9d9d9, 0xbc80bd, 0xccebc5, 0xffed6f]),
            NamedPalette::new("Paired", Qual, &[0xa6cee3, 0x1f78b4, 0xb2df8a, 0x33a02c, 0xfb9a99, 0xe31a1c, 0xfdbf6f, 0xff7f00, 0xcab2d6, 0x6a3d9a, 0xffff99, 0xb15928]),
            NamedPalette::new("Set1", Qual, &[0xe41a1c, 0x377eb8, 0x4daf4a, 0x984ea3, 0xff7f00, 0xffff33, 0xa65628, 0xf781bf, 0x999999]),
            NamedPalette::new("Pastel1", Qual, &[0xfbb4ae, 0xb3cde3, 0xccebc5, 0xdecbe4, 0xfed9a6, 0xffffcc, 0xe5d8bd, 0xfddaec, 0xf2f2f2]),
            NamedPalette::new("Set2", Qual, &[0x66c2a5, 0xfc8d62, 0x8da0cb, 0xe78ac3, 0xa6d854, 0xffd92f, 0xe5c494, 0xb3b3b3]),
            NamedPalette::new("Pastel2", Qual, &[0xb3e2cd, 0xfdcdac, 0xcbd5e8, 0xf4cae4, 0xe6f5c9, 0xfff2ae, 0xf1e2cc, 0xcccccc]),
            NamedPalette::new("Dark2", Qual, &[0x1b9e77, 0xd95f02, 0x7570b3, 0xe7298a, 0x66a61e, 0xe6ab02, 0xa6761d, 0x666666]),
            NamedPalette::new("Accent", Qual, &[0x7fc97f, 0xbeaed4, 0xfdc086, 0xffff99, 0x386cb0, 0xf0027f, 0xbf5b17, 0x666666]),
        ];
        table
            .into_iter()
            .map(|p| (p.name.to_ascii_lowercase(), p))
            .collect()
    };
}

/// Case-insensitive lookup.
pub fn lookup(name: &str) -> Option<&'static NamedPalette> {
    PALETTES.get(&name.trim().to_ascii_lowercase())
}

/// Default scheme of the same family, used before the generated ramps.
pub fn family_default(typ: PaletteType) -> &'static str {
    match typ {
        PaletteType::Qual => DEFAULT_QUAL,
        PaletteType::Div => DEFAULT_DIV,
        PaletteType::Seq => DEFAULT_SEQ,
    }
}

/// Names of every palette in the table, sorted.
pub fn names() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = PALETTES.values().map(|p| p.name).collect();
    v.sort_unstable();
    v
}
