use super::*;

#[test]
fn reserved_colors_are_distinct() {
    assert_ne!(INK_RGB, PAPER_RGB);
    assert_ne!(INK_RGB, PADDING_RGB);
    assert_ne!(PAPER_RGB, PADDING_RGB);
}

#[test]
fn labels_round_trip_through_their_color() {
    for label in [PixelLabel::Bit(true), PixelLabel::Bit(false), PixelLabel::Pad] {
        let [r, g, b, a] = label.rgba();
        assert_eq!(a, 255);
        assert_eq!(PixelLabel::classify([r, g, b]), Some(label));
    }
}

#[test]
fn near_misses_are_not_data() {
    assert_eq!(PixelLabel::classify([1, 0, 0]), None);
    assert_eq!(PixelLabel::classify([254, 255, 255]), None);
    assert_eq!(PixelLabel::classify([0, 127, 0]), None);
    assert_eq!(PixelLabel::from_rgb([1, 1, 1]), PixelLabel::Pad);
    assert_eq!(PixelLabel::from_rgb([200, 10, 10]).bit(), None);
}
