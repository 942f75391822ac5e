use mapper_rs::error::Warnings;
use mapper_rs::legend::format_number;
use mapper_rs::{
    Binning, BinningSpec, CountryValue, Language, LegendMode, LegendOptions, MapError,
    NormalizedValue, Rgb, bin_values, build_legend,
};
use std::collections::BTreeMap;

fn num(code: &str, v: f64) -> CountryValue {
    CountryValue::new(code, NormalizedValue::Numeric(v))
}

fn label(code: &str, s: &str) -> CountryValue {
    CountryValue::new(code, NormalizedValue::Label(s.into()))
}

fn gray(n: usize) -> Vec<Rgb> {
    (0..n).map(|i| Rgb::new(i as u8 * 20, i as u8 * 20, i as u8 * 20)).collect()
}

fn three_countries(spec: BinningSpec) -> Binning {
    let data = vec![num("AR", 5.0), num("BR", 15.0), num("CL", 25.0)];
    bin_values(&data, &spec, &mut Warnings::new()).unwrap()
}

fn labels(b: &Binning, language: Language) -> Vec<String> {
    let opts = LegendOptions {
        language,
        ..LegendOptions::default()
    };
    build_legend(&b.bins, &gray(b.len()), &opts)
        .unwrap()
        .into_iter()
        .map(|e| e.label)
        .collect()
}

#[test]
fn interval_phrasing_per_language() {
    let b = three_countries(BinningSpec::EqualBins(2));
    assert_eq!(labels(&b, Language::Math), vec!["[5, 15)", "[15, 25]"]);
    assert_eq!(labels(&b, Language::Nerd), vec!["5 ≤ x < 15", "15 ≤ x ≤ 25"]);
    assert_eq!(
        labels(&b, Language::En),
        vec!["between 5 and 15", "between 15 and 25"]
    );
    assert_eq!(labels(&b, Language::Es)[0], "entre 5 y 15");
    assert_eq!(labels(&b, Language::De)[1], "zwischen 15 und 25");
}

#[test]
fn open_ended_phrasing() {
    let b = three_countries(BinningSpec::Thresholds(vec![10.0]));
    assert_eq!(labels(&b, Language::Math), vec!["(-∞, 10)", "[10, +∞)"]);
    assert_eq!(labels(&b, Language::Nerd), vec!["x < 10", "x ≥ 10"]);
    assert_eq!(labels(&b, Language::En), vec!["less than 10", "more than 10"]);
    assert_eq!(labels(&b, Language::Es), vec!["menos de 10", "más de 10"]);
    assert_eq!(labels(&b, Language::De), vec!["weniger als 10", "mehr als 10"]);
}

#[test]
fn entries_follow_bin_order_and_colors() {
    let b = three_countries(BinningSpec::EqualBins(2));
    let colors = vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)];
    let entries = build_legend(&b.bins, &colors, &LegendOptions::default()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].color, colors[0]);
    assert_eq!(entries[0].country_count, 1);
    assert_eq!(entries[1].country_count, 2);
    assert_eq!(entries[1].bin_index, 1);
}

#[test]
fn none_mode_is_empty() {
    let b = three_countries(BinningSpec::EqualBins(3));
    let opts = LegendOptions {
        mode: LegendMode::None,
        ..LegendOptions::default()
    };
    assert!(build_legend(&b.bins, &gray(3), &opts).unwrap().is_empty());
}

#[test]
fn min_max_only_has_two_entries() {
    let b = three_countries(BinningSpec::Thresholds(vec![0.0, 10.0, 20.0, 100.0]));
    let opts = LegendOptions {
        mode: LegendMode::MinMaxOnly,
        language: Language::En,
        ..LegendOptions::default()
    };
    let entries = build_legend(&b.bins, &gray(b.len()), &opts).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].label, "Lowest");
    assert_eq!(entries[0].bin_index, 1, "first non-empty bin");
    assert_eq!(entries[1].label, "Highest");
    assert_eq!(entries[1].bin_index, 3, "last non-empty bin");
}

#[test]
fn colors_used_only_drops_empty_bins() {
    let b = three_countries(BinningSpec::Thresholds(vec![0.0, 10.0, 100.0, 1000.0]));
    let all = LegendOptions {
        colors_used_only: false,
        ..LegendOptions::default()
    };
    let used = LegendOptions {
        colors_used_only: true,
        ..LegendOptions::default()
    };
    let full = build_legend(&b.bins, &gray(b.len()), &all).unwrap();
    let trimmed = build_legend(&b.bins, &gray(b.len()), &used).unwrap();
    assert_eq!(full.len(), 5);
    assert_eq!(trimmed.len(), 2);
    assert!(trimmed.len() <= full.len());
    assert!(trimmed.iter().all(|e| e.country_count > 0));
}

#[test]
fn aliases_replace_labels() {
    let data = vec![label("AR", "a"), label("BR", "b")];
    let b = bin_values(&data, &BinningSpec::Values, &mut Warnings::new()).unwrap();
    let aliases: BTreeMap<String, String> = [("a", "Alpha"), ("b", "Beta")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let opts = LegendOptions {
        aliases: Some(&aliases),
        ..LegendOptions::default()
    };
    let entries = build_legend(&b.bins, &gray(2), &opts).unwrap();
    assert_eq!(entries[0].label, "Alpha");
    assert_eq!(entries[1].label, "Beta");
}

#[test]
fn aliases_for_numeric_values_and_indices() {
    let data = vec![num("AR", 1.0), num("BR", 2.0)];
    let b = bin_values(&data, &BinningSpec::Values, &mut Warnings::new()).unwrap();
    let aliases: BTreeMap<String, String> = [("1", "one"), ("1x", "unused")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain(std::iter::once(("2".to_string(), "two".to_string())))
        .collect();
    let opts = LegendOptions {
        aliases: Some(&aliases),
        ..LegendOptions::default()
    };
    let entries = build_legend(&b.bins, &gray(2), &opts).unwrap();
    assert_eq!(entries[0].label, "one");
    assert_eq!(entries[1].label, "two");

    let b = three_countries(BinningSpec::EqualBins(2));
    let by_index: BTreeMap<String, String> = [("0", "low"), ("1", "high")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let opts = LegendOptions {
        aliases: Some(&by_index),
        ..LegendOptions::default()
    };
    let entries = build_legend(&b.bins, &gray(2), &opts).unwrap();
    assert_eq!(entries[0].label, "low");
    assert_eq!(entries[1].label, "high");
}

#[test]
fn missing_alias_for_a_present_value_fails() {
    let data = vec![label("AR", "a"), label("BR", "b")];
    let b = bin_values(&data, &BinningSpec::Values, &mut Warnings::new()).unwrap();
    let aliases: BTreeMap<String, String> =
        std::iter::once(("a".to_string(), "Alpha".to_string())).collect();
    let opts = LegendOptions {
        aliases: Some(&aliases),
        ..LegendOptions::default()
    };
    let err = build_legend(&b.bins, &gray(2), &opts).unwrap_err();
    assert_eq!(err, MapError::AliasMapping { key: "b".into() });
}

#[test]
fn discrete_values_are_printed_in_full() {
    let data = vec![num("AR", 1.2), num("BR", 1.4), num("CL", 2500.0)];
    let b = bin_values(&data, &BinningSpec::Values, &mut Warnings::new()).unwrap();
    for language in [Language::Math, Language::Nerd, Language::En] {
        assert_eq!(labels(&b, language), vec!["1.2", "1.4", "2500"]);
    }
}

#[test]
fn colors_pair_with_bins_by_position() {
    let b = three_countries(BinningSpec::EqualBins(3));
    let tail = &b.bins[1..];
    let colors = vec![Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)];
    let opts = LegendOptions {
        colors_used_only: false,
        ..LegendOptions::default()
    };
    let entries = build_legend(tail, &colors, &opts).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].bin_index, 1);
    assert_eq!(entries[0].color, colors[0]);
    assert_eq!(entries[1].bin_index, 2);
    assert_eq!(entries[1].color, colors[1]);

    let min_max = LegendOptions {
        mode: LegendMode::MinMaxOnly,
        ..opts
    };
    let entries = build_legend(tail, &colors, &min_max).unwrap();
    assert_eq!(entries.last().map(|e| e.color), Some(colors[1]));
}

#[test]
fn decimals_and_suffixes_in_labels() {
    let data = vec![num("AR", 1500.0), num("BR", 2_000_000.0)];
    let b = bin_values(&data, &BinningSpec::Thresholds(vec![1e6]), &mut Warnings::new()).unwrap();
    let opts = LegendOptions {
        decimals: 1,
        ..LegendOptions::default()
    };
    let entries = build_legend(&b.bins, &gray(2), &opts).unwrap();
    assert_eq!(entries[0].label, "(-∞, 1M)");
    assert_eq!(format_number(1234.0, 1), "1.2k");
}
