use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glam::Vec2;
use log::debug;
use serde::Deserialize;

/// Configuration file consulted when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "signal-control.toml";

/// Adapter settings loaded from TOML, every field optional.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    /// Side length of a grid cell in world units, used to resolve `--click` points.
    pub(crate) cell_length: f32,
    /// Horizontal world-space position of the grid's upper-left corner.
    pub(crate) origin_x: f32,
    /// Vertical world-space position of the grid's upper-left corner.
    pub(crate) origin_y: f32,
    /// JSON level catalog used instead of the built-in levels.
    pub(crate) levels_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            cell_length: 70.0,
            origin_x: 0.0,
            origin_y: 0.0,
            levels_file: None,
        }
    }
}

impl CliConfig {
    /// Loads the explicit configuration file, or the default one when present.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.is_file() {
            Self::from_path(default_path)
        } else {
            debug!("no {DEFAULT_CONFIG_PATH} found, using default configuration");
            Ok(Self::default())
        }
    }

    /// World-space origin of the grid.
    pub(crate) fn origin(&self) -> Vec2 {
        Vec2::new(self.origin_x, self.origin_y)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse configuration toml contents")
    }
}
