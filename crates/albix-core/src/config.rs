use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;
use super::session::DEFAULT_VOLUME;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// 0-100.
    #[serde(default = "default_volume")]
    pub default_volume: u8,
    #[serde(default)]
    pub start_muted: bool,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub repeat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeName,
    #[serde(default)]
    pub show_lyrics: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Default target for playlist save/load.
    #[serde(default = "default_playlist_file")]
    pub playlist_file: PathBuf,
    /// User-added radio stations.
    #[serde(default = "default_stations_toml")]
    pub stations_toml: PathBuf,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            start_muted: false,
            shuffle: false,
            repeat: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: ThemeName::Dark,
            show_lyrics: false,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            playlist_file: default_playlist_file(),
            stations_toml: default_stations_toml(),
        }
    }
}

fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

fn default_playlist_file() -> PathBuf {
    platform::data_dir().join("playlist.json")
}

fn default_stations_toml() -> PathBuf {
    platform::config_dir().join("stations.toml")
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.playback.default_volume = config.playback.default_volume.min(100);
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
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
        assert_eq!(config.playback.default_volume, 70);
        assert!(!config.playback.start_muted);
        assert_eq!(config.ui.theme, ThemeName::Dark);
        assert!(config.paths.stations_toml.ends_with("albix/stations.toml"));
        assert!(config.paths.playlist_file.ends_with("playlist.json"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str("[ui]\ntheme = \"light\"\n").unwrap();
        assert_eq!(config.ui.theme, ThemeName::Light);
        assert_eq!(config.playback.default_volume, 70);
    }

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.playback.default_volume, 70);

        std::fs::write(&path, "[playback]\ndefault_volume = 250\n").unwrap();
        let clamped = Config::load_from(&path).unwrap();
        assert_eq!(clamped.playback.default_volume, 100);
    }
}
