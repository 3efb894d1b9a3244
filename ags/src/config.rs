//! Persistent engine configuration.
//!
//! All config is stored in ~/.cf_config/ by default.

use std::path::{Path, PathBuf};

use ags_types::PositionAngle;
use serde::{Deserialize, Serialize};

use crate::capability::{NominalMagnitudeLimits, ProbeMagnitudeLimits, CANOPUS_NOMINAL_LIMITS};
use crate::error::Result;
use crate::search::StrehlThreshold;

const CONFIG_FILENAME: &str = "ags_config.json";

fn default_position_angles() -> Vec<f64> {
    vec![0.0, 90.0, 180.0, 270.0]
}

fn default_magnitude_limits() -> Vec<ProbeMagnitudeLimits> {
    CANOPUS_NOMINAL_LIMITS.to_vec()
}

/// When early-termination mode may stop a search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarlyTerminationConfig {
    /// Average Strehl at which a used asterism is good enough
    pub min_average_strehl: f64,
    /// Stop after this many used asterisms
    #[serde(default)]
    pub max_used_asterisms: Option<usize>,
}

impl EarlyTerminationConfig {
    pub fn handler(&self) -> StrehlThreshold {
        StrehlThreshold::new(self.min_average_strehl, self.max_used_asterisms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgsConfig {
    /// Position angles tried when the caller names none, in degrees
    #[serde(default = "default_position_angles")]
    pub position_angles_deg: Vec<f64>,
    #[serde(default = "default_magnitude_limits")]
    pub magnitude_limits: Vec<ProbeMagnitudeLimits>,
    #[serde(default)]
    pub early_termination: Option<EarlyTerminationConfig>,
}

impl Default for AgsConfig {
    fn default() -> Self {
        Self {
            position_angles_deg: default_position_angles(),
            magnitude_limits: default_magnitude_limits(),
            early_termination: None,
        }
    }
}

impl AgsConfig {
    pub fn position_angles(&self) -> Vec<PositionAngle> {
        self.position_angles_deg
            .iter()
            .map(|&deg| PositionAngle::from_degrees(deg))
            .collect()
    }

    pub fn magnitude_table(&self) -> NominalMagnitudeLimits {
        NominalMagnitudeLimits::from_entries(&self.magnitude_limits)
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Locates and manages the configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    /// Root directory for all configuration (e.g., ~/.cf_config)
    root_path: PathBuf,
}

impl ConfigStorage {
    /// Create a new config storage with default path (~/.cf_config)
    pub fn new() -> std::io::Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::NotFound, "HOME not set"))?;
        let root_path = PathBuf::from(home).join(".cf_config");
        Ok(Self { root_path })
    }

    /// Create a new config storage with custom root path
    pub fn with_path(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn config_path(&self) -> PathBuf {
        self.root_path.join(CONFIG_FILENAME)
    }

    /// Get the stored configuration.
    ///
    /// Returns None if no configuration exists.
    /// Returns Some(Err) if the file exists but cannot be loaded.
    pub fn get_config(&self) -> Option<Result<AgsConfig>> {
        let path = self.config_path();
        if !path.exists() {
            return None;
        }
        Some(AgsConfig::load_from_file(&path))
    }

    /// Stored configuration, or the defaults when none is stored
    pub fn load_or_default(&self) -> Result<AgsConfig> {
        self.get_config().unwrap_or_else(|| Ok(AgsConfig::default()))
    }

    /// Save the configuration, creating the root directory if needed.
    /// Returns the path written.
    pub fn save_config(&self, config: &AgsConfig) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root_path)?;
        let path = self.config_path();
        config.save_to_file(&path)?;
        Ok(path)
    }

    /// Returns Ok(true) if the file was deleted, Ok(false) if it didn't exist.
    pub fn delete_config(&self) -> std::io::Result<bool> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }
}
