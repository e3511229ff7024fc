//! Configuration file
//!
//! Optional YAML file overriding tool locations and warp options. A missing
//! default file means built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use cubefaces_core::Paths;

use crate::error::CubefaceError;

/// What to do once a face has failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep going with the remaining faces
    #[default]
    Continue,
    /// Stop at the first failed face
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit path to gdalwarp
    pub gdalwarp: Option<PathBuf>,
    /// Explicit path to magick (or convert)
    pub magick: Option<PathBuf>,
    pub source_extra: u32,
    pub sample_grid: bool,
    /// Per-step timeout
    pub timeout_secs: Option<u64>,
    pub on_failure: FailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gdalwarp: None,
            magick: None,
            source_extra: 500,
            sample_grid: true,
            timeout_secs: None,
            on_failure: FailurePolicy::Continue,
        }
    }
}

impl Config {
    /// Load from an explicit file, or from the default location if present
    pub fn load(explicit: Option<&Path>) -> Result<Self, CubefaceError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Paths::new().config_file();
                if default.exists() {
                    Self::from_file(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CubefaceError> {
        let content = std::fs::read_to_string(path).map_err(|e| CubefaceError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::parse(&content).map_err(|reason| CubefaceError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}
