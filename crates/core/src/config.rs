//! Wheel configuration
//!
//! Loaded from `prizewheel.toml` in the platform config directory. Every
//! section and field is optional; anything missing takes its default.
//!
//! ```toml
//! [spin]
//! duration_ms = 5000
//! base_spins = 6
//!
//! [reveal]
//! delay_ms = 1500
//!
//! [[palette]]
//! fill = "#1756a5"
//! text = "#FFFFFF"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::SegmentColor;

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "prizewheel.toml";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub spin: SpinConfig,
    pub reveal: RevealConfig,
    pub palette: Vec<SegmentColor>,
    pub roster: RosterConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            spin: SpinConfig::default(),
            reveal: RevealConfig::default(),
            palette: SegmentColor::default_palette(),
            roster: RosterConfig::default(),
        }
    }
}

impl WheelConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// `<config_dir>/prizewheel.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "onyx", "prizewheel").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

/// Spin timing and decorative rotation speeds (radians per second)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub duration_ms: u64,
    /// Used when only one number can be drawn
    pub single_candidate_duration_ms: u64,
    pub base_spins: u32,
    pub single_candidate_spins: u32,
    pub idle_velocity: f64,
    pub rim_idle_velocity: f64,
    pub rim_spin_velocity: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            single_candidate_duration_ms: 3000,
            base_spins: 6,
            single_candidate_spins: 4,
            idle_velocity: 0.3,
            rim_idle_velocity: 0.12,
            rim_spin_velocity: 9.0,
        }
    }
}

impl SpinConfig {
    pub fn duration(&self, single_candidate: bool) -> Duration {
        if single_candidate {
            Duration::from_millis(self.single_candidate_duration_ms)
        } else {
            Duration::from_millis(self.duration_ms)
        }
    }

    pub fn spins(&self, single_candidate: bool) -> u32 {
        if single_candidate {
            self.single_candidate_spins
        } else {
            self.base_spins
        }
    }
}

/// Pause between the wheel stopping and the winner popup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub delay_ms: u64,
}

impl RevealConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Roster bootstrap options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Load the demo roster and prizes when the database is empty
    pub seed_on_empty: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { seed_on_empty: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_default() {
        let config = WheelConfig::from_toml_str("").unwrap();
        assert_eq!(config, WheelConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = WheelConfig::from_toml_str(
            r##"
[spin]
duration_ms = 8000

[reveal]
delay_ms = 1200

[[palette]]
fill = "#000000"
text = "#FFFFFF"
"##,
        )
        .unwrap();

        assert_eq!(config.spin.duration(false), Duration::from_secs(8));
        assert_eq!(config.spin.duration(true), Duration::from_secs(3));
        assert_eq!(config.spin.base_spins, 6);
        assert_eq!(config.reveal.delay(), Duration::from_millis(1200));
        assert_eq!(config.palette, vec![SegmentColor::new("#000000", "#FFFFFF")]);
        assert!(config.roster.seed_on_empty);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let result = WheelConfig::from_toml_str("[spin]\nduration_ms = \"slow\"");
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);

        let missing = WheelConfig::load(&path).unwrap();
        assert_eq!(missing, WheelConfig::default());

        fs::write(&path, "[roster]\nseed_on_empty = false\n").unwrap();
        let loaded = WheelConfig::load(&path).unwrap();
        assert!(!loaded.roster.seed_on_empty);
    }
}
