use super::*;
use crate::schema::HelperConfig;

#[test]
fn test_default_config_is_valid() {
    let result = ConfigValidator::validate(&Config::default()).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_zero_ports_rejected() {
    let mut config = Config::default();
    config.cdp.port = 0;
    config.bridge.port = 0;
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "cdp.port"));
    assert!(result.errors.iter().any(|e| e.path == "bridge.port"));
}

#[test]
fn test_zero_threshold_rejected() {
    let mut config = Config::default();
    config.breaker.threshold = 0;
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "breaker.threshold"));
}

#[test]
fn test_invalid_restricted_pattern() {
    let mut config = Config::default();
    config.action.restricted_patterns = vec!["ok".to_string(), "(unclosed".to_string()];
    let result = ConfigValidator::validate(&config).unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "action.restricted_patterns[1]");
}

#[test]
fn test_min_confidence_range() {
    let mut config = Config::default();
    config.action.min_confidence = 1.5;
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "action.min_confidence"));
}

#[test]
fn test_non_loopback_bridge_warns() {
    let mut config = Config::default();
    config.bridge.host = "10.0.0.5".to_string();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "bridge.host"));
}

#[test]
fn test_unknown_helper_warns() {
    let mut config = Config::default();
    config.discovery.helpers.insert(
        "telepathy".to_string(),
        HelperConfig {
            program: "/bin/true".into(),
            args: Vec::new(),
            timeout_ms: None,
        },
    );
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.warnings.iter().any(|w| w.path == "discovery.helpers.telepathy"));
}

#[test]
fn test_disabled_kill_switch_warns() {
    let mut config = Config::default();
    config.kill_switch.enabled = false;
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}
