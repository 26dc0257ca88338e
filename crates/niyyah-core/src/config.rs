use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Refresh cadence for `niyyah now --watch`.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_tick_secs() -> u64 {
    60
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            tick_secs: default_tick_secs(),
        }
    }
}

impl ClientConfig {
    /// Load `<home>/config.yaml`, falling back to defaults when it is absent.
    pub fn load(home: &Path) -> Result<Self> {
        let path = paths::config_path(home);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: ClientConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        let path = paths::config_path(home);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs.max(1))
    }

    /// API base with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("api_url '{}' must start with http:// or https://", self.api_url),
            });
        }

        if self.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "timeout_secs is 0: requests will fail immediately".to_string(),
            });
        }

        if self.tick_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "tick_secs is 0: watch mode will refresh every second".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = ClientConfig::load(dir.path()).unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.api_url, "http://localhost:8000");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cfg = ClientConfig {
            api_url: "https://niyyah.example.com".into(),
            ..Default::default()
        };
        cfg.save(dir.path()).unwrap();
        let loaded = ClientConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.api_url, "https://niyyah.example.com");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.yaml"), "timeout_secs: 5\n").unwrap();
        let cfg = ClientConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.api_url, "http://localhost:8000");
        assert_eq!(cfg.tick_secs, 60);
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let cfg = ClientConfig {
            api_url: "http://api.local/".into(),
            ..Default::default()
        };
        assert_eq!(cfg.base_url(), "http://api.local");
    }

    #[test]
    fn validate_flags_bad_url_and_zero_timeout() {
        let cfg = ClientConfig {
            api_url: "localhost:8000".into(),
            timeout_secs: 0,
            tick_secs: 60,
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Warning));
    }

    #[test]
    fn default_config_is_clean() {
        assert!(ClientConfig::default().validate().is_empty());
    }
}
