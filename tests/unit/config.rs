use super::*;

#[test]
fn defaults_are_valid() {
    let p = JobParams::default();
    p.validate().unwrap();
    assert_eq!(p.skip_factor(), 1);
    assert_eq!(p.detector_kind(), DetectorKind::BackgroundModel);
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let p = JobParams::from_json_str(r#"{ "scale": 0.5, "nitro": true, "audio_mode": "brown" }"#)
        .unwrap();
    assert_eq!(p.scale, 0.5);
    assert!(p.nitro);
    assert!(p.is_color);
    assert_eq!(p.audio_mode, AudioMode::Brown);
    assert_eq!(p.detector_kind(), DetectorKind::FrameDifference);
}

#[test]
fn json_rejects_unknown_fields_and_bad_ranges() {
    assert!(JobParams::from_json_str(r#"{ "scael": 0.5 }"#).is_err());
    assert!(JobParams::from_json_str(r#"{ "scale": 0 }"#).is_err());
    assert!(JobParams::from_json_str(r#"{ "speed": -2 }"#).is_err());
}

#[test]
fn skip_factor_rounds_speed() {
    let with_speed = |speed| JobParams {
        speed,
        ..JobParams::default()
    };
    assert_eq!(with_speed(0.5).skip_factor(), 1);
    assert_eq!(with_speed(1.0).skip_factor(), 1);
    assert_eq!(with_speed(1.4).skip_factor(), 1);
    assert_eq!(with_speed(1.6).skip_factor(), 2);
    assert_eq!(with_speed(3.0).skip_factor(), 3);
}

#[test]
fn audio_mode_parses_case_insensitively() {
    assert_eq!("Original".parse::<AudioMode>().unwrap(), AudioMode::Original);
    assert_eq!(" white ".parse::<AudioMode>().unwrap(), AudioMode::White);
    assert!("loud".parse::<AudioMode>().is_err());
    assert_eq!(AudioMode::Brown.to_string(), "brown");
}
