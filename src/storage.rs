use crate::legend::LegendEntry;
use crate::pipeline::{ChoroplethMap, MapOptions};
use crate::resolve::RegionFill;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Prefix cells a spreadsheet would evaluate as a formula with `'`.
/// Negative numbers such as `-3` are left alone.
fn safe_cell(s: &str) -> String {
    let risky = match s.chars().next() {
        Some('=' | '+' | '@' | '\t' | '\r') => true,
        Some('-') => s[1..].parse::<f64>().is_err(),
        _ => false,
    };
    if risky { format!("'{s}") } else { s.to_string() }
}

/// Save the whole map plan as pretty JSON.
pub fn save_map_json<P: AsRef<Path>>(map: &ChoroplethMap, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(map).context("serialize map")?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save legend entries as CSV: `label,color,count`.
pub fn save_legend_csv<P: AsRef<Path>>(entries: &[LegendEntry], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("label", "color", "count"))?;
    for e in entries {
        wtr.serialize((safe_cell(&e.label), e.color.to_hex(), e.country_count))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save region fills as CSV: `code,status,bin,color`. `bin` is empty for missing regions.
pub fn save_regions_csv<P: AsRef<Path>>(regions: &[RegionFill], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("code", "status", "bin", "color"))?;
    for r in regions {
        wtr.serialize((
            safe_cell(&r.code),
            r.resolution.status(),
            r.resolution.bin(),
            r.color.to_hex(),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Load legend aliases from a JSON object. Values may be strings or numbers.
pub fn load_aliases<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let txt = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let raw: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(&txt).with_context(|| format!("parse aliases {}", path.display()))?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| {
            let label = match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (k.trim().to_string(), label)
        })
        .collect())
}

/// Load run options from JSON; absent fields keep their defaults.
pub fn load_options<P: AsRef<Path>>(path: P) -> Result<MapOptions> {
    let path = path.as_ref();
    let txt = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("parse options {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use tempfile::tempdir;

    #[test]
    fn formula_like_labels_are_prefixed() {
        assert_eq!(safe_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(safe_cell("@foo"), "'@foo");
        assert_eq!(safe_cell("-3"), "-3");
        assert_eq!(safe_cell("-x"), "'-x");
        assert_eq!(safe_cell("[1, 5)"), "[1, 5)");
    }

    #[test]
    fn write_legend_csv() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("legend.csv");
        let entries = vec![LegendEntry {
            label: "[1, 5)".into(),
            color: Rgb::new(255, 0, 0),
            country_count: 3,
            bin_index: 0,
        }];
        save_legend_csv(&entries, &p).unwrap();
        let txt = fs::read_to_string(&p).unwrap();
        assert_eq!(txt.lines().next(), Some("label,color,count"));
        assert!(txt.contains("\"[1, 5)\",#ff0000,3"));
    }

    #[test]
    fn aliases_accept_numbers() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("aliases.json");
        fs::write(&p, r#"{"1": "low", "2": 2}"#).unwrap();
        let a = load_aliases(&p).unwrap();
        assert_eq!(a["1"], "low");
        assert_eq!(a["2"], "2");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_options("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("not/here.json"));
    }
}
