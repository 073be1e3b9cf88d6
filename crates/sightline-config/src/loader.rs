//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file, or defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_paths(&mut config);
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidValue {
            field: "<pattern>".to_string(),
            message: e.to_string(),
        })?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    fn expand_paths(config: &mut Config) {
        config.logging.dir = Self::expand_path(&config.logging.dir.to_string_lossy()).into();
        config.recovery.profile_root =
            Self::expand_path(&config.recovery.profile_root.to_string_lossy()).into();
        if let Some(rules) = config.discovery.rules_file.take() {
            config.discovery.rules_file = Some(Self::expand_path(&rules.to_string_lossy()).into());
        }
        for helper in config.discovery.helpers.values_mut() {
            helper.program = Self::expand_path(&helper.program.to_string_lossy()).into();
        }
    }

    /// Expand shell-style paths (e.g., `~/.sightline`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.cdp.port, 9222);
        assert_eq!(config.bridge.port, 9876);
    }

    #[test]
    fn test_load_sections() {
        let content = r#"
            [cdp]
            port = 9333
            retries = 1

            [breaker]
            threshold = 5

            [kill_switch]
            threshold_px = 25.0
            cooldown_ms = 100

            [action]
            restricted_patterns = ["delete", "format disk"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.cdp.port, 9333);
        assert_eq!(config.cdp.retries, 1);
        assert_eq!(config.breaker.threshold, 5);
        assert_eq!(config.kill_switch.threshold_px, 25.0);
        assert_eq!(config.action.restricted_patterns.len(), 2);
    }

    #[test]
    fn test_load_helpers() {
        let content = r#"
            [discovery.helpers.accessibility]
            program = "/usr/local/bin/ax-dump"
            args = ["{pid}"]

            [discovery.helpers.document-search]
            program = "/usr/local/bin/doc-search"
            timeout_ms = 1000
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.discovery.helpers.len(), 2);
        assert_eq!(
            config.discovery.helpers["document-search"].timeout_ms,
            Some(1000)
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[bridge]").unwrap();
        writeln!(file, "port = 7000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.bridge.port, 7000);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.cdp.port, 9222);
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("SIGHTLINE_TEST_PROFILE", "/tmp/profiles");
        }
        let content = "[recovery]\nprofile_root = \"${SIGHTLINE_TEST_PROFILE}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.recovery.profile_root.to_string_lossy(), "/tmp/profiles");
        unsafe {
            std::env::remove_var("SIGHTLINE_TEST_PROFILE");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_SIGHTLINE_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/test");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/test"));
    }

    #[test]
    fn test_tilde_paths_expanded_on_load() {
        let content = "[logging]\ndir = \"~/logs\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert!(!config.logging.dir.to_string_lossy().starts_with('~'));
    }
}
