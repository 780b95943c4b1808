use prism_core::config::{DecompositionConfig, ViewerConfig, ViewportConfig};
use prism_core::consts::DEFAULT_LARGE_IMAGE_THRESHOLD;
use prism_core::error::PrismError;

#[test]
fn test_defaults() {
    let config = ViewerConfig::default();
    assert_eq!(
        config.decomposition.large_image_threshold,
        DEFAULT_LARGE_IMAGE_THRESHOLD
    );
    assert!(!config.viewport.smooth_transform);
    assert_eq!(config.viewport.wheel_notch_angle, 120);
    assert_eq!(config.viewport.line_color, [0, 255, 0]);
}

#[test]
fn test_is_large_is_strict() {
    let config = DecompositionConfig {
        large_image_threshold: 100,
    };
    assert!(!config.is_large(100));
    assert!(config.is_large(101));
}

#[test]
fn test_toml_roundtrip() {
    let mut config = ViewerConfig::default();
    config.viewport.smooth_transform = true;
    config.decomposition.large_image_threshold = 42;
    let text = toml::to_string(&config).unwrap();
    let parsed: ViewerConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_toml_partial_uses_defaults() {
    let text = "[decomposition]\nlarge_image_threshold = 1000\n";
    let parsed: ViewerConfig = toml::from_str(text).unwrap();
    assert_eq!(parsed.decomposition.large_image_threshold, 1000);
    assert_eq!(parsed.viewport, ViewportConfig::default());

    let parsed: ViewerConfig = toml::from_str("[viewport]\nline_width = 4.0\n").unwrap();
    assert_eq!(parsed.viewport.line_width, 4.0);
    assert_eq!(parsed.viewport.background, [255, 255, 255]);
}

#[test]
fn test_json_roundtrip() {
    let config = ViewerConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: ViewerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_validate_defaults_ok() {
    assert!(ViewerConfig::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_viewport_values() {
    let mut config = ViewerConfig::default();
    config.viewport.wheel_notch_angle = 0;
    assert!(matches!(config.validate(), Err(PrismError::Config(_))));

    let mut config = ViewerConfig::default();
    config.viewport.line_width = -1.0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("line_width"), "got: {err}");
}
