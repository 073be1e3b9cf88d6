//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

const KNOWN_HELPERS: [&str; 6] = [
    "accessibility",
    "document-search",
    "legacy-accessibility",
    "embedded-webview",
    "uwp-shell",
    "shell",
];

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_discovery(config, &mut result);
        Self::validate_remote(config, &mut result);
        Self::validate_action(config, &mut result);

        Ok(result)
    }

    fn validate_discovery(config: &Config, result: &mut ValidationResult) {
        for name in config.discovery.helpers.keys() {
            if !KNOWN_HELPERS.contains(&name.as_str()) {
                result.add_warning(ValidationWarning::new(
                    format!("discovery.helpers.{}", name),
                    "Unknown helper name, it will never be used",
                ));
            }
        }

        if config.discovery.helper_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "discovery.helper_timeout_ms",
                "helper_timeout_ms must be greater than 0",
            ));
        }
    }

    fn validate_remote(config: &Config, result: &mut ValidationResult) {
        if config.cdp.port == 0 {
            result.add_error(ValidationError::new("cdp.port", "Port cannot be 0"));
        }
        if config.bridge.port == 0 {
            result.add_error(ValidationError::new("bridge.port", "Port cannot be 0"));
        }
        if config.recovery.debug_port == 0 {
            result.add_error(ValidationError::new("recovery.debug_port", "Port cannot be 0"));
        }

        if config.breaker.threshold == 0 {
            result.add_error(ValidationError::new(
                "breaker.threshold",
                "threshold must be greater than 0",
            ));
        }

        if config.cdp.connect_timeout_ms > 60_000 {
            result.add_warning(ValidationWarning::new(
                "cdp.connect_timeout_ms",
                "connect timeout is very long (>60s); breaker-gated calls will stall",
            ));
        }

        let host = config.bridge.host.as_str();
        if host != "127.0.0.1" && host != "localhost" && host != "::1" {
            result.add_warning(ValidationWarning::new(
                "bridge.host",
                "The game bridge is designed for loopback only",
            ));
        }

        if config.recovery.poll_attempts == 0 {
            result.add_error(ValidationError::new(
                "recovery.poll_attempts",
                "poll_attempts must be greater than 0",
            ));
        }
    }

    fn validate_action(config: &Config, result: &mut ValidationResult) {
        if config.action.max_attempts == 0 {
            result.add_error(ValidationError::new(
                "action.max_attempts",
                "max_attempts must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&config.action.min_confidence) {
            result.add_error(ValidationError::new(
                "action.min_confidence",
                "min_confidence must be between 0.0 and 1.0",
            ));
        }

        for (i, pattern) in config.action.restricted_patterns.iter().enumerate() {
            if let Err(e) = regex::Regex::new(pattern) {
                result.add_error(ValidationError::new(
                    format!("action.restricted_patterns[{}]", i),
                    format!("Invalid regex: {}", e),
                ));
            }
        }

        if config.kill_switch.threshold_px <= 0.0 {
            result.add_error(ValidationError::new(
                "kill_switch.threshold_px",
                "threshold_px must be positive",
            ));
        }

        if !config.kill_switch.enabled {
            result.add_warning(ValidationWarning::new(
                "kill_switch.enabled",
                "Kill switch disabled: operator pointer movement will not stop automation",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
