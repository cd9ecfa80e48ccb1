//! Manager configuration.
//!
//! Options are plain string key/values. Resolution precedence for
//! [`ManagerConfig::get_env`] is: explicit option > process environment
//! variable of the same name > supplied default.

use crate::{Result, SluiceError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Configuration consumed by a [`Manager`](crate::Manager).
///
/// # Example
///
/// ```rust
/// use sluice::ManagerConfig;
///
/// let mut config = ManagerConfig::default();
/// config.set("OCR_LANGUAGES", "eng+deu");
/// assert_eq!(config.get_env("OCR_LANGUAGES", None).as_deref(), Some("eng+deu"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Named options, exact keys are a deployment concern.
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file with an `[options]` table.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| SluiceError::Validation {
            message: format!("Invalid config file {}: {}", path.as_ref().display(), e),
            source: Some(Box::new(e)),
        })
    }

    /// Set an explicit option value.
    pub fn set(&mut self, name: &str, value: &str) {
        self.options.insert(name.to_string(), value.to_string());
    }

    /// Look up an explicit option value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    /// Resolve an option with config > environment > default precedence.
    ///
    /// Blank values are treated as unset at every level.
    pub fn get_env(&self, name: &str, default: Option<&str>) -> Option<String> {
        if let Some(value) = self.get(name) {
            if !value.trim().is_empty() {
                return Some(value.to_string());
            }
        }
        if let Ok(value) = std::env::var(name) {
            if !value.trim().is_empty() {
                return Some(value);
            }
        }
        default.map(str::to_string)
    }
}

#[cfg(test)]
// Environment fallback tests mutate the process environment.
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_explicit_option_wins() {
        let mut config = ManagerConfig::new();
        config.set("SLUICE_TEST_OPT", "from-config");
        assert_eq!(
            config.get_env("SLUICE_TEST_OPT", Some("fallback")).as_deref(),
            Some("from-config")
        );
    }

    #[test]
    #[serial]
    fn test_environment_beats_default() {
        // Safety: serialized test, no concurrent env access.
        unsafe { std::env::set_var("SLUICE_TEST_ENV_OPT", "from-env") };
        let config = ManagerConfig::new();
        assert_eq!(
            config.get_env("SLUICE_TEST_ENV_OPT", Some("fallback")).as_deref(),
            Some("from-env")
        );
        unsafe { std::env::remove_var("SLUICE_TEST_ENV_OPT") };
    }

    #[test]
    fn test_default_when_unset() {
        let config = ManagerConfig::new();
        assert_eq!(
            config.get_env("SLUICE_TEST_MISSING_OPT", Some("fallback")).as_deref(),
            Some("fallback")
        );
        assert_eq!(config.get_env("SLUICE_TEST_MISSING_OPT", None), None);
    }

    #[test]
    fn test_blank_option_is_unset() {
        let mut config = ManagerConfig::new();
        config.set("SLUICE_TEST_BLANK", "  ");
        assert_eq!(
            config.get_env("SLUICE_TEST_BLANK", Some("fallback")).as_deref(),
            Some("fallback")
        );
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sluice.toml");
        std::fs::write(&path, "[options]\nOCR_LANGUAGES = \"eng\"\n").unwrap();

        let config = ManagerConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.get("OCR_LANGUAGES"), Some("eng"));
    }

    #[test]
    fn test_from_toml_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sluice.toml");
        std::fs::write(&path, "this is not toml [").unwrap();

        let err = ManagerConfig::from_toml_file(&path).unwrap_err();
        assert!(matches!(err, SluiceError::Validation { .. }));
    }
}
