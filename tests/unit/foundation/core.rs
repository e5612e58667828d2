use super::*;

#[test]
fn scaled_truncates_each_axis() {
    let d = Dimensions::new(101, 57).unwrap();
    assert_eq!(
        d.scaled(0.5).unwrap(),
        Dimensions {
            width: 50,
            height: 28
        }
    );
    assert_eq!(d.scaled(1.0).unwrap(), d);
}

#[test]
fn scaled_matches_floor_for_many_factors() {
    let d = Dimensions::new(1920, 1080).unwrap();
    for scale in [0.1, 0.25, 0.333, 0.5, 0.75, 0.9] {
        let s = d.scaled(scale).unwrap();
        assert_eq!(s.width, (1920.0 * scale).floor() as u32);
        assert_eq!(s.height, (1080.0 * scale).floor() as u32);
    }
}

#[test]
fn scaled_rejects_bad_factors() {
    let d = Dimensions::new(10, 10).unwrap();
    assert!(d.scaled(0.0).is_err());
    assert!(d.scaled(-1.0).is_err());
    assert!(d.scaled(f64::NAN).is_err());
    assert!(d.scaled(0.01).is_err());
}

#[test]
fn zero_dimensions_are_rejected() {
    assert!(Dimensions::new(0, 4).is_err());
    assert!(Dimensions::new(4, 0).is_err());
}

#[test]
fn fps_fallback_applies_to_non_positive_rates() {
    assert_eq!(normalize_fps(0.0), DEFAULT_FPS);
    assert_eq!(normalize_fps(-5.0), DEFAULT_FPS);
    assert_eq!(normalize_fps(f64::INFINITY), DEFAULT_FPS);
    assert_eq!(normalize_fps(24.0), 24.0);
}
