//! mapper_rs
//!
//! The data-to-color core of a choropleth world-map generator: turns a table of
//! per-country values into bins, one color per bin, a legend and a fill color
//! for every country the map geometry knows.
//!
//! ### Features
//! - Numeric shorthand (`1K`, `2.5M`) and category labels
//! - Tasks: distinct values, equal-width bins, thresholds, sign and mean/median/std splits
//! - ColorBrewer palettes, explicit color lists and generated Reds/Greens/Blues ramps
//! - Legends in `en`, `es`, `de`, `math` and `nerd` styles, with aliases
//! - Strict or smart error policy; every smart substitution is reported as a warning
//!
//! ### Example
//! ```no_run
//! use mapper_rs::{MapOptions, RawRecord, draw_map};
//!
//! let records = vec![
//!     RawRecord::new("AR", 5.0),
//!     RawRecord::new("BR", 15.0),
//!     RawRecord::new("CL", "25"),
//! ];
//! let geometry: &[&str] = &["AR", "BR", "CL", "UY"];
//! let options = MapOptions { task: "b:2".into(), ..MapOptions::default() };
//! let map = draw_map(&records, geometry, &options)?;
//! for entry in &map.legend {
//!     println!("{} {}", entry.color, entry.label);
//! }
//! mapper_rs::storage::save_regions_csv(&map.regions, "regions.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod binning;
pub mod color;
pub mod error;
pub mod legend;
pub mod models;
pub mod normalize;
pub mod palette;
pub mod palettes;
pub mod pipeline;
pub mod resolve;
pub mod stats;
pub mod storage;
pub mod task;

pub use binning::{Bin, BinKey, Binning, bin_values};
pub use color::{DefaultPalette, Rgb};
pub use error::{ErrorPolicy, MapError, Warning, Warnings};
pub use legend::{Language, LegendEntry, LegendMode, LegendOptions, build_legend};
pub use models::{CountryValue, NormalizedValue, RawRecord, RawValue};
pub use normalize::normalize_records;
pub use palette::{PaletteRequest, PaletteSpec, resolve_palette};
pub use pipeline::{ChoroplethMap, MapOptions, draw_map};
pub use resolve::{GeometryProvider, Resolution};
pub use task::{BinningSpec, StatKind, parse_task};
