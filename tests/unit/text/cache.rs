use super::*;

#[test]
fn keys_depend_on_words_width_and_renderer() {
    let base = LineKey::new(&["A", "B"], 100, 7);
    assert_eq!(base, LineKey::new(&["A", "B"], 100, 7));
    assert_ne!(base, LineKey::new(&["AB"], 100, 7));
    assert_ne!(base, LineKey::new(&["A", "B"], 101, 7));
    assert_ne!(base, LineKey::new(&["A", "B"], 100, 8));
}

#[test]
fn renders_once_per_key() {
    let mut cache = VariantCache::new();
    let key = LineKey::new(&["X"], 10, 0);
    let mut calls = 0;
    let first = cache.get_or_render(key, || {
        calls += 1;
        LineFrames::default()
    });
    let second = cache.get_or_render(key, || {
        calls += 1;
        LineFrames::default()
    });
    assert_eq!(calls, 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats(), (1, 1));
    assert!(cache.get(&LineKey::new(&["Y"], 10, 0)).is_none());
}
