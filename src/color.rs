//! RGB colors: literal parsing, hex output and the generated fallback ramps.
//!
//! Accepted literals: `#rrggbb` and `r,g,b` (optionally wrapped as `rgb(r,g,b)`),
//! each channel in `0..=255`.

use crate::error::{MapError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref HEX: Regex = Regex::new(r"^#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$")
        .expect("hex color regex");
    static ref TRIPLE: Regex =
        Regex::new(r"^(?:rgb\()?\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)?$")
            .expect("rgb triple regex");
}

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `r,g,b`.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        let err = || MapError::ColorSyntax {
            input: input.to_string(),
        };
        if let Some(c) = HEX.captures(s) {
            let ch = |i: usize| u8::from_str_radix(&c[i], 16).map_err(|_| err());
            return Ok(Rgb::new(ch(1)?, ch(2)?, ch(3)?));
        }
        if let Some(c) = TRIPLE.captures(&s.to_ascii_lowercase()) {
            // `u8` parsing rejects channels above 255.
            let ch = |i: usize| c[i].parse::<u8>().map_err(|_| err());
            return Ok(Rgb::new(ch(1)?, ch(2)?, ch(3)?));
        }
        Err(err())
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Black or white, whichever reads better on top of `self`.
    pub fn contrasting_text(self) -> Rgb {
        let luma = 0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64;
        if luma > 186.0 { Rgb::BLACK } else { Rgb::WHITE }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Rgb::parse(s)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

// Serialized as a hex string so JSON/CSV output stays readable.
impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Safe fallback palettes that can produce any number of colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultPalette {
    Reds,
    Greens,
    Blues,
}

impl FromStr for DefaultPalette {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reds" => Ok(DefaultPalette::Reds),
            "greens" => Ok(DefaultPalette::Greens),
            "blues" => Ok(DefaultPalette::Blues),
            _ => Err(MapError::InvalidOption {
                name: "default palette",
                value: s.to_string(),
                expected: "Reds, Greens, Blues",
            }),
        }
    }
}

impl fmt::Display for DefaultPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefaultPalette::Reds => "Reds",
            DefaultPalette::Greens => "Greens",
            DefaultPalette::Blues => "Blues",
        })
    }
}

/// (max, min, start) per channel; see [`sequential_ramp`].
type ChannelRamp = (f64, f64, f64);

impl DefaultPalette {
    fn ramps(self) -> [ChannelRamp; 3] {
        match self {
            DefaultPalette::Reds => [(255., 100., 500.), (240., 0., 250.), (240., 0., 250.)],
            DefaultPalette::Greens => [(240., 0., 250.), (255., 70., 350.), (250., 20., 250.)],
            DefaultPalette::Blues => [(220., 0., 230.), (240., 50., 250.), (255., 100., 350.)],
        }
    }

    /// `n` colors from light to dark.
    pub fn colors(self, n: usize) -> Vec<Rgb> {
        sequential_ramp(n, self.ramps())
    }
}

// Each channel descends linearly from `start` towards `min` and is capped at `max`.
// Short ramps are cut from a 3-step ramp so two colors are not the extremes.
fn sequential_ramp(n_items: usize, ramps: [ChannelRamp; 3]) -> Vec<Rgb> {
    let n = n_items.max(3) as f64;
    let channel = |i: usize, (max, min, start): ChannelRamp| -> u8 {
        let v = ((i + 1) as f64 * (min - start) / n + start).round();
        v.clamp(0.0, max) as u8
    };
    (0..n_items)
        .map(|i| {
            Rgb::new(
                channel(i, ramps[0]),
                channel(i, ramps[1]),
                channel(i, ramps[2]),
            )
        })
        .collect()
}
