use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DaemonConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

impl DaemonConfig {
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path();
        if config_path.exists() {
            let raw = fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config file {}", config_path.display()))?;
            let parsed: DaemonConfig = toml::from_str(&raw)
                .with_context(|| format!("failed to parse TOML from {}", config_path.display()))?;
            return Ok(parsed);
        }

        Ok(DaemonConfig::default())
    }
}

fn resolve_config_path() -> PathBuf {
    if let Ok(path) = env::var("SUGGESTD_CONFIG") {
        return Path::new(&path).to_path_buf();
    }

    if let Some(base) = dirs::config_dir() {
        return base.join("suggestd").join("config.toml");
    }

    Path::new("/tmp/suggestd.toml").to_path_buf()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
        }
    }
}

fn default_socket_path() -> PathBuf {
    Path::new("/tmp/suggestd.sock").to_path_buf()
}

/// Where dictionaries and the three persistent stores live.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_dictionaries_dir")]
    pub dictionaries_dir: PathBuf,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dictionaries_dir: default_dictionaries_dir(),
            data_dir: default_data_dir(),
        }
    }
}

impl PathsConfig {
    pub fn custom_words_file(&self) -> PathBuf {
        self.data_dir.join("custom-words.json")
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join("history.json")
    }

    pub fn ignore_list_file(&self) -> PathBuf {
        self.data_dir.join("ignore.json")
    }
}

fn default_dictionaries_dir() -> PathBuf {
    Path::new("/usr/share/suggestd/dictionaries").to_path_buf()
}

fn default_data_dir() -> PathBuf {
    if let Some(base) = dirs::config_dir() {
        return base.join("suggestd");
    }

    Path::new("/tmp/suggestd").to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: DaemonConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.socket_path, default_socket_path());
        assert_eq!(config.paths.dictionaries_dir, default_dictionaries_dir());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let raw = "[paths]\ndictionaries_dir = \"/opt/words\"\n";
        let config: DaemonConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.paths.dictionaries_dir, Path::new("/opt/words"));
        assert_eq!(config.server.socket_path, default_socket_path());
        assert_eq!(
            config.paths.history_file(),
            config.paths.data_dir.join("history.json")
        );
    }
}
