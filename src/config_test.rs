#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_unset() {
    let config = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.background.width_cm, 100.0);
    assert_eq!(config.background.height_cm, 70.0);
    assert_eq!(config.resize.max_width, 1024);
    assert!(config.seed_defaults);
    assert_eq!(config.requested_mode, None);
}

#[test]
fn reads_all_values() {
    let config = Config::from_lookup(lookup(&[
        ("DISHBOARD_BACKGROUND_WIDTH_CM", "60"),
        ("DISHBOARD_BACKGROUND_HEIGHT_CM", " 40 "),
        ("DISHBOARD_MIN_DIMENSION_CM", "1.5"),
        ("DISHBOARD_MAX_IMAGE_PX", "512"),
        ("DISHBOARD_SEED_DEFAULTS", "false"),
        ("DISHBOARD_MODE", "camera-ar"),
    ]))
    .unwrap();
    assert_eq!(config.background, BackgroundSize::new(60.0, 40.0));
    assert_eq!(config.min_dimension_cm, 1.5);
    assert_eq!(config.resize, ResizeLimits { max_width: 512, max_height: 512 });
    assert!(!config.seed_defaults);
    assert_eq!(config.requested_mode, Some(ViewMode::CameraAr));
}

#[test]
fn rejects_non_positive_background() {
    let err = Config::from_lookup(lookup(&[("DISHBOARD_BACKGROUND_WIDTH_CM", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "DISHBOARD_BACKGROUND_WIDTH_CM", .. }));

    let err = Config::from_lookup(lookup(&[("DISHBOARD_BACKGROUND_HEIGHT_CM", "abc")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "DISHBOARD_BACKGROUND_HEIGHT_CM", .. }));
}

#[test]
fn rejects_negative_min_dimension() {
    let err = Config::from_lookup(lookup(&[("DISHBOARD_MIN_DIMENSION_CM", "-1")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "DISHBOARD_MIN_DIMENSION_CM", .. }));
}

#[test]
fn rejects_zero_max_px() {
    assert!(Config::from_lookup(lookup(&[("DISHBOARD_MAX_IMAGE_PX", "0")])).is_err());
    assert!(Config::from_lookup(lookup(&[("DISHBOARD_MAX_IMAGE_PX", "-5")])).is_err());
}

#[test]
fn bool_spellings() {
    for raw in ["1", "TRUE", "yes", "on"] {
        assert!(Config::from_lookup(lookup(&[("DISHBOARD_SEED_DEFAULTS", raw)])).unwrap().seed_defaults);
    }
    for raw in ["0", "False", "no", "off"] {
        assert!(!Config::from_lookup(lookup(&[("DISHBOARD_SEED_DEFAULTS", raw)])).unwrap().seed_defaults);
    }
    assert!(Config::from_lookup(lookup(&[("DISHBOARD_SEED_DEFAULTS", "maybe")])).is_err());
}

#[test]
fn rejects_unknown_mode() {
    let err = Config::from_lookup(lookup(&[("DISHBOARD_MODE", "vr")])).unwrap_err();
    assert_eq!(err.to_string(), "invalid DISHBOARD_MODE: \"vr\" (expected placement-2d or camera-ar)");
}
