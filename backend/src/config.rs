//! # Configuration
//!
//! Settings are read from an optional YAML file and then overridden from the
//! environment:
//!
//! ```yaml
//! data_directory: /home/me/.local/share/Smart Spend
//! storage_key: gemini-expenses
//! entry:
//!   currency_symbol: "₹"
//! gemini:
//!   model: gemini-2.5-flash
//!   timeout_seconds: 60
//! ```
//!
//! | Variable                  | Overrides               |
//! |---------------------------|-------------------------|
//! | `GEMINI_API_KEY`/`API_KEY`| `gemini.api_key`        |
//! | `GEMINI_MODEL`            | `gemini.model`          |
//! | `SMART_SPEND_DATA_DIR`    | `data_directory`        |

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use shared::ExpenseFormConfig;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::EXPENSES_STORAGE_KEY;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const APP_DIRECTORY_NAME: &str = "Smart Spend";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Sampling temperature for text extraction
    pub temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_seconds: 60,
            temperature: 0.1,
        }
    }
}

// Keeps the key out of debug logs
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory holding the persisted expenses
    pub data_directory: PathBuf,
    /// Storage key the expense collection is saved under
    pub storage_key: String,
    pub entry: ExpenseFormConfig,
    pub gemini: GeminiConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_directory: Self::default_data_directory(),
            storage_key: EXPENSES_STORAGE_KEY.to_string(),
            entry: ExpenseFormConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Load `path` if given and present, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_yaml_file(path)?,
            Some(path) => {
                info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());

        if config.gemini.api_key.is_empty() {
            warn!("No Gemini API key configured; text and receipt extraction will fail");
        }
        info!("Using data directory {}", config.data_directory.display());
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: TrackerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.gemini.api_key = key.trim().to_string();
        }
        if let Some(model) = non_empty("GEMINI_MODEL") {
            self.gemini.model = model.trim().to_string();
        }
        if let Some(directory) = non_empty("SMART_SPEND_DATA_DIR") {
            self.data_directory = PathBuf::from(directory);
        }
    }

    /// Platform data directory, or the temp directory where none exists
    pub fn default_data_directory() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIRECTORY_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| values.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.storage_key, "gemini-expenses");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.timeout_seconds, 60);
        assert!(config.data_directory.ends_with("Smart Spend"));
        assert_eq!(config.entry.currency_symbol, "₹");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(
            &path,
            "data_directory: /tmp/spend\ngemini:\n  model: gemini-2.0-flash\nentry:\n  currency_symbol: \"$\"\n",
        )
        .unwrap();

        let config = TrackerConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.data_directory, PathBuf::from("/tmp/spend"));
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.timeout_seconds, 60);
        assert_eq!(config.entry.currency_symbol, "$");
        assert_eq!(config.entry.max_description_length, 256);
        assert_eq!(config.storage_key, "gemini-expenses");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "gemini: [unclosed").unwrap();
        assert!(TrackerConfig::from_yaml_file(&path).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = TrackerConfig::load(Some(&temp_dir.path().join("absent.yaml"))).unwrap();
        assert_eq!(config.storage_key, "gemini-expenses");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = TrackerConfig::default();
        config.apply_env_overrides(lookup_from(&[
            ("GEMINI_API_KEY", " secret "),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("SMART_SPEND_DATA_DIR", "/srv/spend"),
        ]));

        assert_eq!(config.gemini.api_key, "secret");
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.data_directory, PathBuf::from("/srv/spend"));
    }

    #[test]
    fn test_api_key_fallback_variable() {
        let mut config = TrackerConfig::default();
        config.apply_env_overrides(lookup_from(&[("GEMINI_API_KEY", ""), ("API_KEY", "fallback")]));
        assert_eq!(config.gemini.api_key, "fallback");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let gemini = GeminiConfig {
            api_key: "super-secret".to_string(),
            ..GeminiConfig::default()
        };
        let rendered = format!("{:?}", gemini);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
