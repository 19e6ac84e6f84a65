use std::{io::ErrorKind, path::Path, time::Duration};

use glam::UVec2;
use serde::Deserialize;

use crate::error::ConfigError;

/// Highest accepted `timing.target_fps`.
pub const MAX_TARGET_FPS: u32 = 1000;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "HybridRogue".to_string(),
            width: 800,
            height: 480,
            resizable: true,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub fixed_time_step: bool,
    pub target_fps: u32,
    /// Longest wall-clock gap a single frame may account for.
    pub max_frame_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixed_time_step: true,
            target_fps: 60,
            max_frame_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `env_logger` filter, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 {
            return Err(invalid("window.width", "must be greater than zero"));
        }
        if self.window.height == 0 {
            return Err(invalid("window.height", "must be greater than zero"));
        }
        if self.timing.target_fps == 0 {
            return Err(invalid("timing.target_fps", "must be greater than zero"));
        }
        if self.timing.target_fps > MAX_TARGET_FPS {
            return Err(invalid("timing.target_fps", "must be at most 1000"));
        }
        if self.timing.max_frame_ms == 0 {
            return Err(invalid("timing.max_frame_ms", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn window_size(&self) -> UVec2 {
        UVec2::new(self.window.width, self.window.height)
    }

    /// Duration of one fixed update.
    pub fn target_elapsed(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.timing.target_fps.max(1)))
    }

    pub fn max_elapsed(&self) -> Duration {
        Duration::from_millis(self.timing.max_frame_ms)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.window_size(), UVec2::new(800, 480));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [window]
            title = "Depths"
            vsync = false

            [timing]
            target_fps = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.window.title, "Depths");
        assert!(!config.window.vsync);
        assert_eq!(config.window.width, 800);
        assert!(config.timing.fixed_time_step);
        assert_eq!(config.target_elapsed(), Duration::from_nanos(33_333_333));
    }

    #[test]
    fn sixty_fps_step() {
        let config = EngineConfig::default();
        assert_eq!(config.target_elapsed(), Duration::from_nanos(16_666_666));
        assert_eq!(config.max_elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = EngineConfig::from_toml_str("[window]\nwidth = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "window.width",
                ..
            }
        ));
    }

    #[test]
    fn zero_fps_is_rejected() {
        let err = EngineConfig::from_toml_str("[timing]\ntarget_fps = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "timing.target_fps",
                ..
            }
        ));
    }

    #[test]
    fn absurd_fps_is_rejected() {
        let err = EngineConfig::from_toml_str("[timing]\ntarget_fps = 4000000000").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "timing.target_fps",
                ..
            }
        ));

        let config = EngineConfig::from_toml_str("[timing]\ntarget_fps = 1000").unwrap();
        assert_eq!(config.target_elapsed(), Duration::from_millis(1));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("[window\nwidth = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("[window]\nwidth = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hybrid_rogue.toml");
        std::fs::write(&path, "[logging]\nfilter = \"debug\"\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn directory_path_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
