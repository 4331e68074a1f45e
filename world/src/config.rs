//! Level manifest describing the grid dimensions and the level files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tileworld_core::{GridDimensions, LevelId};

/// Errors raised while reading a level manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The manifest could not be read.
    #[error("could not read level manifest {path}")]
    Io {
        /// Manifest that was read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The manifest is not valid TOML for the expected schema.
    #[error("could not parse level manifest")]
    Parse(#[from] toml::de::Error),
    /// The manifest lists no levels.
    #[error("level manifest lists no levels")]
    NoLevels,
    /// The grid dimensions are zero.
    #[error("level manifest declares an empty {rows}x{cols} grid")]
    EmptyGrid {
        /// Declared row count.
        rows: u32,
        /// Declared column count.
        cols: u32,
    },
    /// The start level does not name a listed level.
    #[error("start level {start} is not one of the {levels} listed levels")]
    UnknownStartLevel {
        /// Requested start level.
        start: u32,
        /// Number of listed levels.
        levels: usize,
    },
}

/// One level entry of the manifest.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LevelConfig {
    /// Display name of the level.
    pub name: String,
    /// CSV file holding the level's codes.
    pub file: PathBuf,
}

/// Parsed level manifest.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct WorldConfig {
    /// Row count shared by every level.
    pub rows: u32,
    /// Column count shared by every level.
    pub cols: u32,
    /// Level that is current once the world is built.
    #[serde(default)]
    pub start_level: u32,
    /// Levels in identifier order.
    pub levels: Vec<LevelConfig>,
}

impl WorldConfig {
    /// Parses and validates a manifest from TOML text.
    ///
    /// Relative level files stay relative; [`WorldConfig::load`] resolves them
    /// against the manifest's directory.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a manifest from disk and resolves level files relative to it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent() {
            for level in &mut config.levels {
                if level.file.is_relative() {
                    level.file = base.join(&level.file);
                }
            }
        }
        Ok(config)
    }

    /// Grid dimensions shared by every level.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.rows, self.cols)
    }

    /// Level that is current once the world is built.
    #[must_use]
    pub const fn start_level(&self) -> LevelId {
        LevelId::new(self.start_level)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let in_range = usize::try_from(self.start_level).is_ok_and(|start| start < self.levels.len());
        if !in_range {
            return Err(ConfigError::UnknownStartLevel {
                start: self.start_level,
                levels: self.levels.len(),
            });
        }
        Ok(())
    }
}
