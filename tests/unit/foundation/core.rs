use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(10, 0).is_err());
    let fps = Fps::new(30000, 1001).unwrap();
    assert_eq!((fps.num, fps.den), (30000, 1001));
}

#[test]
fn fps_default_matches_ten_per_second() {
    assert_eq!(Fps::default(), Fps::new(10, 1).unwrap());
}

#[test]
fn geometry_capacity_and_frame_count() {
    let geom = FrameGeometry::new(2, 1).unwrap();
    assert_eq!(geom.capacity_bits(), 2);
    assert_eq!(geom.rgba_len(), 8);
    assert_eq!(geom.frames_for_bits(0), 0);
    assert_eq!(geom.frames_for_bits(1), 1);
    assert_eq!(geom.frames_for_bits(2), 1);
    assert_eq!(geom.frames_for_bits(3), 2);
}

#[test]
fn geometry_rejects_zero_dimensions() {
    assert!(FrameGeometry::new(0, 480).is_err());
    assert!(FrameGeometry::new(854, 0).is_err());
    assert_eq!(FrameGeometry::default().capacity_bits(), 854 * 480);
}
