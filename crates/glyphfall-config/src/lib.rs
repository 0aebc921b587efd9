//! Configuration file handling for glyphfall.
//!
//! The file is TOML, lives in the platform config directory and may omit any
//! field. A missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use glyphfall_core::{CellMetrics, Rgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub background: BackgroundConfig,
    pub logging: LoggingConfig,
}

/// Foreground text shown over the background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "CYBER PORTFOLIO".to_string(),
            tagline: "Full-stack developer & security analyst".to_string(),
        }
    }
}

/// Background layer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Mount the background at startup.
    pub enabled: bool,
    /// Opacity of the whole background layer, 0.0-1.0.
    pub layer_opacity: f32,
    /// Page color behind the background layer.
    pub backdrop: Rgb,
    /// Width of a terminal column in pixels.
    pub cell_width_px: u16,
    /// Height of a terminal row in pixels.
    pub cell_height_px: u16,
    /// Fixed seed for a reproducible animation.
    pub seed: Option<u64>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        let metrics = CellMetrics::default();
        Self {
            enabled: true,
            layer_opacity: 0.6,
            backdrop: Rgb::new(16, 20, 24),
            cell_width_px: metrics.width_px,
            cell_height_px: metrics.height_px,
            seed: None,
        }
    }
}

impl BackgroundConfig {
    /// Pixel footprint of one terminal cell.
    pub fn cell_metrics(&self) -> CellMetrics {
        CellMetrics {
            width_px: self.cell_width_px,
            height_px: self.cell_height_px,
        }
    }
}

/// Log file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Maximum level: `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// Log file; defaults to `glyphfall.log` in the data directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bg = &self.background;
        if !(0.0..=1.0).contains(&bg.layer_opacity) {
            return Err(ConfigError::invalid(format!(
                "background.layer_opacity must be within 0.0-1.0, got {}",
                bg.layer_opacity
            )));
        }
        if bg.cell_width_px == 0 || bg.cell_height_px == 0 {
            return Err(ConfigError::invalid(
                "background cell size must be at least 1x1 pixels",
            ));
        }
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::invalid("site.title must not be empty"));
        }
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "glyphfall")
}

/// Default config file location.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Default log file location.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join("glyphfall.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.background.enabled);
        assert_eq!(config.background.layer_opacity, 0.6);
        assert_eq!(config.background.backdrop, Rgb::new(16, 20, 24));
        assert_eq!(config.background.cell_metrics(), CellMetrics::default());
        assert!(config.background.seed.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse(
            r#"
            [site]
            title = "Hello"

            [background]
            seed = 42
            backdrop = [0, 0, 0]
            "#,
        )
        .unwrap();
        assert_eq!(config.site.title, "Hello");
        assert_eq!(config.site.tagline, SiteConfig::default().tagline);
        assert_eq!(config.background.seed, Some(42));
        assert_eq!(config.background.backdrop, Rgb::new(0, 0, 0));
        assert_eq!(config.background.layer_opacity, 0.6);
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_bad_opacity() {
        let err = Config::parse("[background]\nlayer_opacity = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_cell() {
        let err = Config::parse("[background]\ncell_width_px = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_title() {
        let err = Config::parse("[site]\ntitle = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[background\nenabled = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("glyphfall-config-does-not-exist.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.background.seed = Some(7);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
