// Emulator configuration, persisted as TOML

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
const CONFIG_FILE: &str = "famicore.toml";

/// User-facing emulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    pub video: VideoConfig,
    pub audio: AudioConfig,
    pub battery: BatteryConfig,
}

/// Video pacing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Target frame rate (NTSC is ~60.1; 60 keeps hosts happy)
    pub fps: f64,
    /// Sleep to the frame deadline; false means run flat out
    pub vsync: bool,
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
    /// 0.0 - 1.0
    pub volume: f32,
}

/// Battery save settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// Directory the .sav files live in
    pub save_directory: PathBuf,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            video: VideoConfig {
                fps: 60.0988,
                vsync: true,
            },
            audio: AudioConfig {
                enabled: true,
                volume: 1.0,
            },
            battery: BatteryConfig {
                save_directory: PathBuf::from("saves"),
            },
        }
    }
}

impl EmulatorConfig {
    /// Read the config file next to the executable, falling back to
    /// defaults on any error (which is logged, not surfaced).
    pub fn load_or_default() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("malformed config {:?}: {}; using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("cannot read config {:?}: {}; using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Persist the current settings.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = EmulatorConfig::default();
        assert!(config.video.vsync);
        assert!(config.audio.enabled);
        assert!((config.video.fps - 60.0988).abs() < 1e-4);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join("famicore-config-test.toml");
        let mut config = EmulatorConfig::default();
        config.audio.volume = 0.5;
        config.video.vsync = false;
        config.save_to(&path).unwrap();

        let reloaded = EmulatorConfig::load_from(&path);
        assert_eq!(reloaded.audio.volume, 0.5);
        assert!(!reloaded.video.vsync);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_or_default_without_file() {
        // No famicore.toml in the test working directory
        let config = EmulatorConfig::load_or_default();
        assert!(config.video.fps > 59.0);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let path = std::env::temp_dir().join("famicore-config-bad.toml");
        fs::write(&path, "not [valid toml").unwrap();
        let config = EmulatorConfig::load_from(&path);
        assert!(config.audio.enabled, "defaults on parse failure");
        let _ = fs::remove_file(&path);
    }
}
