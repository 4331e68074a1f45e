#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative tile world state.
//!
//! The [`World`] owns every level's tile codes and the path engine's scratch
//! buffers. Mutations arrive as [`Command`] values through [`apply`], reads go
//! through the [`query`] module and path requests through [`find_path`]. All
//! of them address the current level unless stated otherwise.

use std::path::Path;

use log::{debug, info};
use thiserror::Error;
use tileworld_core::{Command, Event, GridDimensions, GridPos, LevelId, PathQuery};
use tileworld_system_pathfinding::PathEngine;

pub mod config;
pub mod level_file;
mod store;

pub use config::{ConfigError, LevelConfig, WorldConfig};
pub use level_file::LevelFileError;
pub use store::{StoreError, TileStore};

/// Errors surfaced by the world facade.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A store access or load was rejected.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The level manifest was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A world must hold at least one level.
    #[error("a world needs at least one level")]
    NoLevels,
    /// A level file could not be read or written.
    #[error("level '{name}' could not be transferred")]
    LevelFile {
        /// Name of the level whose file failed.
        name: String,
        /// Underlying failure.
        #[source]
        source: LevelFileError,
    },
}

/// Represents the authoritative tile world.
#[derive(Debug)]
pub struct World {
    store: TileStore,
    level_names: Vec<String>,
    current_level: LevelId,
    navigator: PathEngine,
}

impl World {
    /// Creates a world of empty levels with the provided dimensions.
    ///
    /// Level 0 is current, so at least one level is required.
    pub fn new(levels: u32, dimensions: GridDimensions) -> Result<Self, WorldError> {
        if levels == 0 {
            return Err(WorldError::NoLevels);
        }
        Ok(Self {
            store: TileStore::new(levels, dimensions),
            level_names: (0..levels).map(|level| format!("level-{level}")).collect(),
            current_level: LevelId::new(0),
            navigator: PathEngine::default(),
        })
    }

    /// Builds a world from a manifest, loading every listed level file.
    ///
    /// Any unreadable file or any level whose contents do not match the
    /// declared dimensions aborts the whole build.
    pub fn from_config(config: &WorldConfig) -> Result<Self, WorldError> {
        let level_count = u32::try_from(config.levels.len()).unwrap_or(u32::MAX);
        let mut world = Self::new(level_count, config.dimensions())?;
        let mut events = Vec::new();

        for (index, level) in config.levels.iter().enumerate() {
            let id = LevelId::new(u32::try_from(index).unwrap_or(u32::MAX));
            let rows = level_file::read(&level.file).map_err(|source| WorldError::LevelFile {
                name: level.name.clone(),
                source,
            })?;
            apply(&mut world, Command::LoadLevel { level: id, rows }, &mut events)?;
            world.level_names[index].clone_from(&level.name);
            info!("loaded level '{}' from {}", level.name, level.file.display());
        }

        apply(
            &mut world,
            Command::SetCurrentLevel {
                level: config.start_level(),
            },
            &mut events,
        )?;
        Ok(world)
    }
}

/// Applies the provided command to the world.
///
/// Successful mutations are reported through `out_events`. Rejected commands
/// leave the world untouched and emit nothing.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
    match command {
        Command::LoadLevel { level, rows } => {
            let duplicate_markers = world.store.load(level, &rows)?;
            out_events.push(Event::LevelLoaded {
                level,
                duplicate_markers,
            });
        }
        Command::SetCurrentLevel { level } => {
            let _ = world.store.view(level)?;
            world.current_level = level;
            debug!("current level is now {level}");
            out_events.push(Event::CurrentLevelChanged { level });
        }
        Command::SetTile { pos, code } => {
            let level = world.current_level;
            let previous = world.store.set(level, pos, code)?;
            out_events.push(Event::TileChanged {
                level,
                pos,
                previous,
                code,
            });
        }
        Command::ReplaceTiles { from, to, bounds } => {
            let level = world.current_level;
            let count = world.store.replace_all(level, from, to, bounds)?;
            out_events.push(Event::TilesReplaced {
                level,
                from,
                to,
                count,
            });
        }
    }
    Ok(())
}

/// Plans a path on the current level.
///
/// The returned cells run from the step after the start up to the target.
/// An empty result means the target is unreachable or an endpoint is blocked.
pub fn find_path(world: &mut World, query: &PathQuery) -> Vec<GridPos> {
    let Ok(view) = world.store.view(world.current_level) else {
        return Vec::new();
    };
    world.navigator.find_path(view, query)
}

/// Writes a level's current contents to a CSV file.
pub fn export_level(world: &World, level: LevelId, path: &Path) -> Result<(), WorldError> {
    let rows = world.store.save(level)?;
    level_file::write(path, &rows).map_err(|source| WorldError::LevelFile {
        name: query::level_name(world, level).unwrap_or_default().to_owned(),
        source,
    })
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tileworld_core::{CellBounds, GridDimensions, GridPos, LevelId, TileCode, TileView};

    use super::{StoreError, World};

    /// Level addressed by tile queries and mutations.
    #[must_use]
    pub fn current_level(world: &World) -> LevelId {
        world.current_level
    }

    /// Number of levels held by the world.
    #[must_use]
    pub fn level_count(world: &World) -> u32 {
        world.store.level_count()
    }

    /// Name of a level, if it exists.
    #[must_use]
    pub fn level_name(world: &World, level: LevelId) -> Option<&str> {
        let index = usize::try_from(level.get()).ok()?;
        world.level_names.get(index).map(String::as_str)
    }

    /// Dimensions shared by every level.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.store.dimensions()
    }

    /// Code stored at a cell of the current level.
    pub fn get_tile(world: &World, pos: GridPos) -> Result<TileCode, StoreError> {
        world.store.get(world.current_level, pos)
    }

    /// First cell of the current level carrying the code, in row-major order.
    #[must_use]
    pub fn find_first(world: &World, code: TileCode) -> Option<GridPos> {
        tile_view(world).find_first(code)
    }

    /// Every cell of the current level carrying the code inside the bounds.
    #[must_use]
    pub fn find_all(world: &World, code: TileCode, bounds: Option<CellBounds>) -> Vec<GridPos> {
        tile_view(world).find_all(code, bounds)
    }

    /// Row of the first walker-blocking cell at or below `start_row`.
    #[must_use]
    pub fn ground_below(world: &World, start_row: u32, col: u32) -> Option<u32> {
        tile_view(world).ground_below(start_row, col)
    }

    /// Read-only view over the current level.
    ///
    /// Worlds hold at least one level and level switches are validated, so
    /// the current level always resolves; the empty fallback is never hit.
    #[must_use]
    pub fn tile_view(world: &World) -> TileView<'_> {
        match world.store.view(world.current_level) {
            Ok(view) => view,
            Err(_) => TileView::new(&[], GridDimensions::new(0, 0)),
        }
    }

    /// Read-only view over any level.
    pub fn level_view(world: &World, level: LevelId) -> Result<TileView<'_>, StoreError> {
        world.store.view(level)
    }

    /// Serializes a level's contents row by row, top row first.
    pub fn save_level(world: &World, level: LevelId) -> Result<Vec<Vec<TileCode>>, StoreError> {
        world.store.save(level)
    }
}
