//! Configuration structs with defaults, validation and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Chunk streaming around the observer.
    pub streaming: StreamingConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Chunk streaming settings.
///
/// Diameters count chunks along one axis of the cube centered on the
/// observer, so `view_diameter: 9` keeps a 9×9×9 neighborhood loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Side of the chunk cube loaded around the observer.
    pub view_diameter: u32,
    /// Side of the cube kept when evicting. At most `view_diameter`.
    pub retain_diameter: u32,
    /// Number of shells loaded per streaming tick (0 = all at once).
    pub shells_per_tick: u32,
    /// Seed for procedural chunk contents.
    pub seed: u64,
    /// World-space voxel height of the generated ground surface.
    pub ground_level: i32,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level filter (e.g. "debug", "info,voxy_voxel=trace").
    pub log_level: String,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            view_diameter: 9,
            retain_diameter: 5,
            shells_per_tick: 1,
            seed: 0x5eed,
            ground_level: 8,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for voxy, e.g. `~/.config/voxy` on Linux.
///
/// Falls back to the working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("voxy"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Validation ---

impl StreamingConfig {
    /// Checks the diameters describe a usable shell traversal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view_diameter < 2 {
            return Err(ConfigError::InvalidValue {
                field: "streaming.view_diameter",
                reason: format!("must be at least 2, got {}", self.view_diameter),
            });
        }
        if self.retain_diameter > self.view_diameter {
            return Err(ConfigError::InvalidValue {
                field: "streaming.retain_diameter",
                reason: format!(
                    "{} exceeds view_diameter {}",
                    self.retain_diameter, self.view_diameter
                ),
            });
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Re-read the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.streaming.validate()
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_default_config_serializes() {
        let ron_str = ron::ser::to_string_pretty(
            &Config::default(),
            ron::ser::PrettyConfig::new().depth_limit(2),
        )
        .unwrap();
        assert!(ron_str.contains("view_diameter: 9"));
        assert!(ron_str.contains("retain_diameter: 5"));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(debug: (log_level: \"warn\"))").unwrap();
        assert_eq!(config.streaming, StreamingConfig::default());
        assert_eq!(config.debug.log_level, "warn");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = ron::from_str("(streaming: (seed: 7))").unwrap();
        assert_eq!(config.streaming.seed, 7);
        assert_eq!(config.streaming.view_diameter, 9);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(render: (fov: 90.0))");
        assert!(result.is_ok());
    }

    #[test]
    fn test_ron_comments_accepted() {
        let config: Config = ron::from_str("// streaming defaults\n(\n  // none\n)").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_tiny_view() {
        let mut config = Config::default();
        config.streaming.view_diameter = 1;
        config.streaming.retain_diameter = 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "streaming.view_diameter",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_retain_beyond_view() {
        let mut config = Config::default();
        config.streaming.retain_diameter = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retain_diameter"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.streaming.view_diameter = 12;
        config.streaming.seed = 99;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("voxy");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.streaming.shells_per_tick = 3;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap();
        assert_eq!(reloaded.map(|c| c.streaming.shells_per_tick), Some(3));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_default_config_dir_ends_in_voxy() {
        let dir = default_config_dir();
        assert!(dir == Path::new(".") || dir.ends_with("voxy"));
    }
}
