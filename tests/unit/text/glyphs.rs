use super::*;

#[test]
fn block_metrics_are_per_character() {
    let g = BlockGlyphSource::default();
    assert_eq!(g.measure("ABC"), TextExtent { width: 30, height: 16 });
    assert_eq!(g.measure("AB C"), TextExtent { width: 40, height: 16 });
    assert_eq!(g.measure("").width, 0);
}

#[test]
fn block_coverage_matches_measure_and_skips_spaces() {
    let g = BlockGlyphSource::default();
    let m = g.coverage("A B");
    assert_eq!(m.size(), (30, 16));
    assert_eq!(m.get(5, 8), 255);
    assert_eq!(m.get(1, 8), 0);
    assert_eq!(m.get(15, 8), 0);
    assert_eq!(m.get(25, 8), 255);
    assert_eq!(m.get(25, 1), 0);
}

#[test]
fn empty_text_yields_a_blank_pixel() {
    let m = BlockGlyphSource::default().coverage("");
    assert_eq!(m.size(), (1, 16));
    assert!(m.data().iter().all(|&v| v == 0));
}

#[test]
fn parley_rejects_bad_sizes() {
    let font = LoadedFont {
        source: "empty".to_string(),
        data: std::sync::Arc::new(Vec::new()),
    };
    assert!(ParleyGlyphSource::new(&font, 0.0).is_err());
    assert!(ParleyGlyphSource::new(&font, f32::NAN).is_err());
}

#[test]
fn fingerprints_follow_metrics() {
    let a = BlockGlyphSource::default();
    let b = BlockGlyphSource {
        advance: 12,
        ..a
    };
    assert_eq!(a.fingerprint(), BlockGlyphSource::default().fingerprint());
    assert_ne!(a.fingerprint(), b.fingerprint());
}
