//! Dense multi-level storage for tile codes.

use log::{debug, warn};
use thiserror::Error;
use tileworld_core::{
    CellBounds, DuplicateMarker, GridDimensions, GridPos, LevelId, TileCode, TileView,
};

/// Errors raised when the store is addressed outside its declared shape.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The level does not exist in the store.
    #[error("level {level} does not exist (store holds {levels} levels)")]
    UnknownLevel {
        /// Level that was addressed.
        level: LevelId,
        /// Number of levels allocated in the store.
        levels: u32,
    },
    /// The position lies outside the grid.
    #[error("cell {pos} lies outside the {rows}x{cols} grid of level {level}")]
    OutOfBounds {
        /// Level that was addressed.
        level: LevelId,
        /// Position that was addressed.
        pos: GridPos,
        /// Declared row count.
        rows: u32,
        /// Declared column count.
        cols: u32,
    },
    /// Loaded contents do not match the declared dimensions.
    #[error(
        "level {level} does not match the declared {rows}x{cols} grid: \
         {location} has {found} entries, expected {expected}"
    )]
    DimensionMismatch {
        /// Level that was being loaded.
        level: LevelId,
        /// Where the mismatch was found ("row list" or "row N").
        location: String,
        /// Count found in the provided contents.
        found: usize,
        /// Count required by the declared dimensions.
        expected: usize,
        /// Declared row count.
        rows: u32,
        /// Declared column count.
        cols: u32,
    },
}

/// Every level of the world stored in one flat row-major buffer.
///
/// The buffer is allocated once with the declared dimensions and never
/// resized. Every accessor goes through a checked `(level, row, col)` index so
/// invalid coordinates surface as [`StoreError`] values instead of landing in
/// a neighbouring cell.
#[derive(Clone, Debug)]
pub struct TileStore {
    dimensions: GridDimensions,
    levels: u32,
    codes: Vec<TileCode>,
}

impl TileStore {
    /// Allocates a store of empty cells.
    #[must_use]
    pub fn new(levels: u32, dimensions: GridDimensions) -> Self {
        let level_count = usize::try_from(levels).unwrap_or(0);
        let capacity = dimensions.cell_count().saturating_mul(level_count);
        Self {
            dimensions,
            levels,
            codes: vec![TileCode::EMPTY; capacity],
        }
    }

    /// Dimensions shared by every level.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of levels allocated in the store.
    #[must_use]
    pub const fn level_count(&self) -> u32 {
        self.levels
    }

    /// Returns the code stored at the cell.
    pub fn get(&self, level: LevelId, pos: GridPos) -> Result<TileCode, StoreError> {
        let index = self.index(level, pos)?;
        Ok(self.codes[index])
    }

    /// Writes a code into the cell and returns the code it replaced.
    ///
    /// The code itself is not validated.
    pub fn set(
        &mut self,
        level: LevelId,
        pos: GridPos,
        code: TileCode,
    ) -> Result<TileCode, StoreError> {
        let index = self.index(level, pos)?;
        Ok(std::mem::replace(&mut self.codes[index], code))
    }

    /// Read-only view over one level.
    pub fn view(&self, level: LevelId) -> Result<TileView<'_>, StoreError> {
        let range = self.level_range(level)?;
        Ok(TileView::new(&self.codes[range], self.dimensions))
    }

    /// Replaces a level's contents wholesale.
    ///
    /// Contents whose row count or any row's column count differ from the
    /// declared dimensions are rejected before anything is written. Spawn
    /// markers appearing more than once are returned and logged; lookups keep
    /// first-match semantics for them.
    pub fn load(
        &mut self,
        level: LevelId,
        rows: &[Vec<TileCode>],
    ) -> Result<Vec<DuplicateMarker>, StoreError> {
        let range = self.level_range(level)?;
        self.check_shape(level, rows)?;

        let target = &mut self.codes[range];
        for (slot, code) in target.iter_mut().zip(rows.iter().flatten()) {
            *slot = *code;
        }

        let duplicates = self.view(level)?.duplicate_markers();
        for duplicate in &duplicates {
            warn!(
                "level {level}: spawn marker {} appears {} times, first match at {} wins",
                duplicate.code,
                duplicate.positions.len(),
                duplicate.positions[0],
            );
        }
        debug!(
            "loaded level {level} ({}x{})",
            self.dimensions.rows(),
            self.dimensions.cols()
        );
        Ok(duplicates)
    }

    /// Serializes a level's contents row by row, top row first.
    pub fn save(&self, level: LevelId) -> Result<Vec<Vec<TileCode>>, StoreError> {
        let view = self.view(level)?;
        Ok(view.rows().map(<[TileCode]>::to_vec).collect())
    }

    /// Finds every cell carrying the code inside the bounds.
    pub fn find_all(
        &self,
        level: LevelId,
        code: TileCode,
        bounds: Option<CellBounds>,
    ) -> Result<Vec<GridPos>, StoreError> {
        Ok(self.view(level)?.find_all(code, bounds))
    }

    /// Rewrites every `from` code inside the bounds to `to` and returns the
    /// number of rewritten cells.
    pub fn replace_all(
        &mut self,
        level: LevelId,
        from: TileCode,
        to: TileCode,
        bounds: Option<CellBounds>,
    ) -> Result<usize, StoreError> {
        let matches = self.find_all(level, from, bounds)?;
        for pos in &matches {
            let _ = self.set(level, *pos, to)?;
        }
        Ok(matches.len())
    }

    fn check_shape(&self, level: LevelId, rows: &[Vec<TileCode>]) -> Result<(), StoreError> {
        let expected_rows = usize::try_from(self.dimensions.rows()).unwrap_or(usize::MAX);
        let expected_cols = usize::try_from(self.dimensions.cols()).unwrap_or(usize::MAX);
        let mismatch = |location: String, found: usize, expected: usize| StoreError::DimensionMismatch {
            level,
            location,
            found,
            expected,
            rows: self.dimensions.rows(),
            cols: self.dimensions.cols(),
        };

        if rows.len() != expected_rows {
            return Err(mismatch("row list".to_owned(), rows.len(), expected_rows));
        }
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected_cols)
        {
            return Err(mismatch(format!("row {index}"), row.len(), expected_cols));
        }
        Ok(())
    }

    fn level_range(&self, level: LevelId) -> Result<std::ops::Range<usize>, StoreError> {
        if level.get() >= self.levels {
            return Err(StoreError::UnknownLevel {
                level,
                levels: self.levels,
            });
        }
        let cells = self.dimensions.cell_count();
        let start = usize::try_from(level.get())
            .ok()
            .and_then(|level| level.checked_mul(cells))
            .ok_or(StoreError::UnknownLevel {
                level,
                levels: self.levels,
            })?;
        Ok(start..start + cells)
    }

    fn index(&self, level: LevelId, pos: GridPos) -> Result<usize, StoreError> {
        let range = self.level_range(level)?;
        let offset = self
            .dimensions
            .index(pos)
            .ok_or(StoreError::OutOfBounds {
                level,
                pos,
                rows: self.dimensions.rows(),
                cols: self.dimensions.cols(),
            })?;
        Ok(range.start + offset)
    }
}
