use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where snapshots come from.  Tagged by `type` in the TOML table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// GET a URL returning the snapshot JSON.
    Http {
        #[serde(default = "default_url")]
        url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// Read the snapshot JSON from a local file on every refresh.
    File { path: PathBuf },
    /// Run a program and parse the snapshot JSON from its stdout.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl SourceConfig {
    /// Build a source from a bare location: `http(s)://…` is fetched over
    /// HTTP, anything else is treated as a file path.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Http {
                url: location.to_string(),
                timeout_secs: default_timeout_secs(),
            }
        } else {
            Self::File {
                path: PathBuf::from(location),
            }
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Http {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Periodically refresh without a key press.
    #[serde(default)]
    pub auto_refresh: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: false,
            interval_secs: default_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_show_keys_bar")]
    pub show_keys_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_keys_bar: default_show_keys_bar(),
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8000/api/songs".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_interval_secs() -> u64 {
    60
}

fn default_show_keys_bar() -> bool {
    true
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load `path`, writing the defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.refresh.auto_refresh);
        assert_eq!(config.refresh.interval_secs, 60);
        assert!(config.ui.show_keys_bar);
        match config.source {
            SourceConfig::Http { url, timeout_secs } => {
                assert!(url.starts_with("http://"));
                assert_eq!(timeout_secs, 10);
            }
            other => panic!("unexpected default source: {other:?}"),
        }
    }

    #[test]
    fn test_parse_command_source() {
        let config: Config = toml::from_str(
            r#"
            [source]
            type = "command"
            program = "wpn"
            args = ["--json"]

            [refresh]
            auto_refresh = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config.source,
            SourceConfig::Command {
                program: "wpn".into(),
                args: vec!["--json".into()],
                timeout_secs: 10,
            }
        );
        assert!(config.refresh.auto_refresh);
        assert_eq!(config.refresh.interval_secs, 60);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.source, SourceConfig::default());
    }

    #[test]
    fn test_from_location() {
        assert!(matches!(
            SourceConfig::from_location("https://example.org/now.json"),
            SourceConfig::Http { .. }
        ));
        assert_eq!(
            SourceConfig::from_location("/tmp/now.json"),
            SourceConfig::File {
                path: PathBuf::from("/tmp/now.json")
            }
        );
    }

    #[test]
    fn test_load_from_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.source, SourceConfig::default());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.source, config.source);
    }
}
