use mapper_rs::error::{Warning, Warnings};
use mapper_rs::palette::resolve_palette_str;
use mapper_rs::palettes;
use mapper_rs::{
    DefaultPalette, ErrorPolicy, MapError, PaletteRequest, PaletteSpec, Rgb, resolve_palette,
};

fn req(k: usize) -> PaletteRequest {
    PaletteRequest::new(k)
}

fn smart(k: usize) -> PaletteRequest {
    PaletteRequest {
        policy: ErrorPolicy::Smart,
        ..PaletteRequest::new(k)
    }
}

#[test]
fn explicit_colors_in_order() {
    let mut w = Warnings::new();
    let colors = resolve_palette_str("#ff0000_#00ff00", &req(2), &mut w).unwrap();
    assert_eq!(colors, vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]);

    let inverted = PaletteRequest { invert: true, ..req(2) };
    let colors = resolve_palette_str("#ff0000_#00ff00", &inverted, &mut w).unwrap();
    assert_eq!(colors, vec![Rgb::new(0, 255, 0), Rgb::new(255, 0, 0)]);
    assert!(w.is_empty());
}

#[test]
fn explicit_list_of_exact_length_is_returned_as_is() {
    let list = vec![Rgb::new(1, 2, 3), Rgb::new(40, 50, 60), Rgb::new(7, 8, 9)];
    let spec = PaletteSpec::Explicit(list.clone());
    for policy in [ErrorPolicy::Strict, ErrorPolicy::Smart] {
        let r = PaletteRequest { policy, ..req(3) };
        assert_eq!(resolve_palette(&spec, &r, &mut Warnings::new()).unwrap(), list);
    }
}

#[test]
fn inverting_twice_is_identity() {
    for name in ["Reds", "RdYlBu", "Set3"] {
        for k in 1..=8 {
            let plain = resolve_palette_str(name, &req(k), &mut Warnings::new()).unwrap();
            let mut inverted = resolve_palette_str(
                name,
                &PaletteRequest { invert: true, ..req(k) },
                &mut Warnings::new(),
            )
            .unwrap();
            inverted.reverse();
            assert_eq!(plain, inverted, "{name} k={k}");
        }
    }
}

#[test]
fn named_palettes_give_exactly_k_colors() {
    for name in palettes::names() {
        let max = palettes::lookup(name).unwrap().max_colors();
        for k in 1..=max {
            let colors = resolve_palette_str(name, &req(k), &mut Warnings::new()).unwrap();
            assert_eq!(colors.len(), k, "{name} k={k}");
        }
    }
}

#[test]
fn strict_size_errors() {
    let err = resolve_palette_str("Set1", &req(11), &mut Warnings::new()).unwrap_err();
    assert!(matches!(err, MapError::PaletteSize { requested: 11, available: 9, .. }));

    let err = resolve_palette_str("#ff0000_#00ff00", &req(3), &mut Warnings::new()).unwrap_err();
    assert!(matches!(err, MapError::PaletteSize { requested: 3, available: 2, .. }));

    let err = resolve_palette_str("NoSuchPalette", &req(3), &mut Warnings::new()).unwrap_err();
    assert!(matches!(err, MapError::PaletteSyntax { .. }));
}

#[test]
fn smart_uses_forced_default_when_named_palette_is_too_small() {
    let r = PaletteRequest {
        force_default: Some(DefaultPalette::Blues),
        ..smart(12)
    };
    let mut w = Warnings::new();
    let colors = resolve_palette_str("Reds", &r, &mut w).unwrap();
    assert_eq!(colors, DefaultPalette::Blues.colors(12));
    assert_eq!(w.len(), 1);
    match w.iter().next() {
        Some(Warning::PaletteFallback { requested, used, .. }) => {
            assert_eq!(requested, "Reds");
            assert_eq!(used, "Blues");
        }
        other => panic!("expected a palette fallback, got {other:?}"),
    }
}

#[test]
fn smart_prefers_the_family_scheme_over_the_forced_default() {
    let r = PaletteRequest {
        force_default: Some(DefaultPalette::Reds),
        ..smart(10)
    };
    let mut w = Warnings::new();
    let colors = resolve_palette_str("Set1", &r, &mut w).unwrap();
    assert_eq!(colors, palettes::lookup("Set3").unwrap().take(10).unwrap());
    assert_eq!(w.len(), 1);
    assert!(matches!(
        w.iter().next(),
        Some(Warning::PaletteFallback { used, .. }) if used == "Set3"
    ));

    let colors = resolve_palette_str("not a palette", &r, &mut Warnings::new()).unwrap();
    assert_eq!(colors, palettes::lookup("RdYlBu").unwrap().take(10).unwrap());
}

#[test]
fn smart_clamps_long_explicit_lists() {
    let mut w = Warnings::new();
    let colors = resolve_palette_str("#000000_#111111_#222222", &smart(2), &mut w).unwrap();
    assert_eq!(colors, vec![Rgb::new(0, 0, 0), Rgb::new(0x11, 0x11, 0x11)]);
    assert_eq!(w.len(), 1);
}

#[test]
fn smart_unparsable_palette_falls_back_to_diverging_default() {
    let mut w = Warnings::new();
    let colors = resolve_palette_str("not a palette", &smart(4), &mut w).unwrap();
    assert_eq!(colors, palettes::lookup("RdYlBu").unwrap().take(4).unwrap());
    assert_eq!(w.len(), 1);
}

#[test]
fn resolution_is_deterministic() {
    let r = PaletteRequest {
        force_default: Some(DefaultPalette::Greens),
        ..smart(20)
    };
    let a = resolve_palette_str("Spectral", &r, &mut Warnings::new()).unwrap();
    let b = resolve_palette_str("Spectral", &r, &mut Warnings::new()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 20);
}
