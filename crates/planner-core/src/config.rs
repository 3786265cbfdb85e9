use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1000;
const DEFAULT_INDICATOR_LINGER_MS: u64 = 2000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin of the page that would serve the client. When absent the client
    /// behaves like the wrapped mobile shell and needs an explicit server URL.
    #[serde(default)]
    pub origin: Option<String>,

    /// Location of the local-storage file.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    #[serde(default)]
    pub autosave_delay_ms: Option<u64>,

    #[serde(default)]
    pub indicator_linger_ms: Option<u64>,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/planner"))
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs::config_dir().map(|config| config.join("planner"))
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Reads a config file, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn effective_storage_path(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }
        Self::config_dir()
            .map(|dir| dir.join("storage.json"))
            .unwrap_or_else(|| PathBuf::from("planner-storage.json"))
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms.unwrap_or(DEFAULT_AUTOSAVE_DELAY_MS))
    }

    pub fn indicator_linger(&self) -> Duration {
        Duration::from_millis(
            self.indicator_linger_ms
                .unwrap_or(DEFAULT_INDICATOR_LINGER_MS),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.autosave_delay(), Duration::from_millis(1000));
        assert_eq!(config.indicator_linger(), Duration::from_millis(2000));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.origin.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "origin = \"http://192.168.1.20:5000\"\nautosave_delay_ms = 250\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.origin.as_deref(), Some("http://192.168.1.20:5000"));
        assert_eq!(config.autosave_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "origin = [not toml").unwrap();

        let config = AppConfig::load_from(&path);
        assert!(config.origin.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml"));
        assert!(config.storage_path.is_none());
    }
}
