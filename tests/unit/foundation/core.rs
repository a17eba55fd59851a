use super::*;

#[test]
fn canvas_clamps_degenerate_dimensions() {
    let c = Canvas::new(0, 0);
    assert_eq!((c.width, c.height), (1, 1));
    assert_eq!(Canvas::new(4, 3).area(), 12);
}

#[test]
fn fps_validation_rejects_zero() {
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::new(0, 1).is_err());
    let fps = Fps::new(24, 1).unwrap();
    assert!((fps.frame_time_secs(12) - 0.5).abs() < 1e-12);
    assert_eq!(fps.frames_for_secs_ceil(1.01), 25);
}

#[test]
fn time_span_is_half_open() {
    let span = TimeSpan::new(1.0, Some(2.0));
    assert!(!span.contains(0.999));
    assert!(span.contains(1.0));
    assert!(span.contains(1.999));
    assert!(!span.contains(2.0));
    assert_eq!(span.duration(), Some(1.0));
}

#[test]
fn unbounded_span_never_ends() {
    let span = TimeSpan::new(0.5, None);
    assert!(span.contains(1.0e9));
    assert!(!span.contains(0.0));
    assert_eq!(span.duration(), None);
}

#[test]
fn colors_serialize_as_arrays() {
    let c: Rgb8 = serde_json::from_str("[1, 2, 3]").unwrap();
    assert_eq!(c, Rgb8::new(1, 2, 3));
    assert_eq!(serde_json::to_string(&c).unwrap(), "[1,2,3]");
    let a: Rgba8 = serde_json::from_str("[1, 2, 3, 4]").unwrap();
    assert_eq!(a.rgb(), c);
    assert_eq!(a.a, 4);
}
