use super::*;

#[test]
fn interior_is_opaque_and_outside_is_empty() {
    let m = rounded_rect_coverage(20, 20, Rect::new(2.0, 2.0, 18.0, 18.0), 4.0);
    assert_eq!(m.get(10, 10), 255);
    assert_eq!(m.get(2, 10), 255);
    assert_eq!(m.get(1, 10), 0);
    assert_eq!(m.get(19, 19), 0);
}

#[test]
fn corners_are_rounded() {
    let m = rounded_rect_coverage(20, 20, Rect::new(2.0, 2.0, 18.0, 18.0), 6.0);
    assert_eq!(m.get(2, 2), 0);
    let square = rounded_rect_coverage(20, 20, Rect::new(2.0, 2.0, 18.0, 18.0), 0.0);
    assert_eq!(square.get(2, 2), 255);
}

#[test]
fn empty_rect_yields_empty_mask() {
    let m = rounded_rect_coverage(4, 4, Rect::new(1.0, 1.0, 1.0, 3.0), 2.0);
    assert!(m.data().iter().all(|&v| v == 0));
}
