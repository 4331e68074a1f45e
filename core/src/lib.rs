#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tile world.
//!
//! This crate defines the value types and the message surface that connect
//! the authoritative world, the pure systems and the adapters. Callers submit
//! [`Command`] values describing desired tile mutations, the world executes
//! them via its `apply` entry point and broadcasts [`Event`] values. Systems
//! read immutable [`TileView`] snapshots and respond with new command batches.

use serde::{Deserialize, Serialize};

mod path;
pub mod semantics;

pub use path::{HeuristicKind, Neighborhood, PathQuery};
pub use semantics::{classify, is_blocking, Passability, TileClass};

/// Integer stored in every grid cell describing terrain or feature identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCode(i32);

impl TileCode {
    /// Code of an empty, walkable cell.
    pub const EMPTY: TileCode = TileCode(0);

    /// Creates a new tile code from its raw integer value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the raw integer value of the code.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Reports whether the code marks an empty cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Classifies the code using the authoritative range rules.
    #[must_use]
    pub fn class(self) -> TileClass {
        classify(self)
    }
}

impl std::fmt::Display for TileCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a level held by the tile store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for LevelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of a single grid cell expressed as row and column indices.
///
/// Rows are counted top-down: row zero is the first line of a level file and
/// increasing rows move down the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    row: u32,
    col: u32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn col(&self) -> u32 {
        self.col
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    /// Shifts the position by a signed column and row delta.
    ///
    /// Returns `None` instead of wrapping when the shift would leave the
    /// unsigned index space.
    #[must_use]
    pub fn offset(self, d_col: i32, d_row: i32) -> Option<GridPos> {
        let col = self.col.checked_add_signed(d_col)?;
        let row = self.row.checked_add_signed(d_row)?;
        Some(GridPos::new(row, col))
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row and column counts shared by every level of a tile store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    rows: u32,
    cols: u32,
}

impl GridDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells contained in one level.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.rows) * u64::from(self.cols);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Row-major offset of the position, or `None` outside the grid.
    #[must_use]
    pub fn index(&self, pos: GridPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        let width = usize::try_from(self.cols).ok()?;
        row.checked_mul(width)?.checked_add(col)
    }

    /// Position stored at the provided row-major offset.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<GridPos> {
        if index >= self.cell_count() {
            return None;
        }
        let width = usize::try_from(self.cols).ok()?;
        let row = u32::try_from(index / width).ok()?;
        let col = u32::try_from(index % width).ok()?;
        Some(GridPos::new(row, col))
    }
}

/// Half-open rectangle of cells used to restrict bulk scans.
///
/// Rows `row_lo..row_hi` and columns `col_lo..col_hi` are included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBounds {
    row_lo: u32,
    row_hi: u32,
    col_lo: u32,
    col_hi: u32,
}

impl CellBounds {
    /// Creates bounds spanning the provided row and column ranges.
    #[must_use]
    pub const fn new(row_lo: u32, row_hi: u32, col_lo: u32, col_hi: u32) -> Self {
        Self {
            row_lo,
            row_hi,
            col_lo,
            col_hi,
        }
    }

    /// Bounds covering every cell of a grid with the provided dimensions.
    #[must_use]
    pub const fn full(dimensions: GridDimensions) -> Self {
        Self::new(0, dimensions.rows, 0, dimensions.cols)
    }

    /// Shrinks the bounds so they never extend past the grid edge.
    #[must_use]
    pub fn clamp_to(self, dimensions: GridDimensions) -> Self {
        let row_hi = self.row_hi.min(dimensions.rows);
        let col_hi = self.col_hi.min(dimensions.cols);
        Self {
            row_lo: self.row_lo.min(row_hi),
            row_hi,
            col_lo: self.col_lo.min(col_hi),
            col_hi,
        }
    }

    /// Iterates over the covered positions in row-major order.
    pub fn positions(self) -> impl Iterator<Item = GridPos> {
        (self.row_lo..self.row_hi)
            .flat_map(move |row| (self.col_lo..self.col_hi).map(move |col| GridPos::new(row, col)))
    }
}

/// Spawn marker that appeared more than once while loading a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMarker {
    /// Marker code that should have been unique.
    pub code: TileCode,
    /// Every position carrying the code, in row-major order.
    pub positions: Vec<GridPos>,
}

/// Commands that express all permissible tile world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the contents of a level wholesale.
    LoadLevel {
        /// Level receiving the codes.
        level: LevelId,
        /// Codes laid out row by row, top row first.
        rows: Vec<Vec<TileCode>>,
    },
    /// Switches the level that tile queries and mutations address.
    SetCurrentLevel {
        /// Level that becomes current.
        level: LevelId,
    },
    /// Writes a single code into the current level.
    SetTile {
        /// Cell receiving the code.
        pos: GridPos,
        /// Code written into the cell.
        code: TileCode,
    },
    /// Rewrites every matching code inside the bounds of the current level.
    ReplaceTiles {
        /// Code that gets replaced.
        from: TileCode,
        /// Code written in its place.
        to: TileCode,
        /// Region to rewrite; `None` covers the whole level.
        bounds: Option<CellBounds>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a level was loaded.
    LevelLoaded {
        /// Level that received new contents.
        level: LevelId,
        /// Spawn markers found more than once in the loaded contents.
        duplicate_markers: Vec<DuplicateMarker>,
    },
    /// Announces that a different level became current.
    CurrentLevelChanged {
        /// Level that is now current.
        level: LevelId,
    },
    /// Confirms that a single cell was rewritten.
    TileChanged {
        /// Level containing the cell.
        level: LevelId,
        /// Cell that changed.
        pos: GridPos,
        /// Code stored before the mutation.
        previous: TileCode,
        /// Code stored after the mutation.
        code: TileCode,
    },
    /// Confirms that a bulk replacement ran.
    TilesReplaced {
        /// Level containing the rewritten cells.
        level: LevelId,
        /// Code that was replaced.
        from: TileCode,
        /// Code written in its place.
        to: TileCode,
        /// Number of cells rewritten.
        count: usize,
    },
}

/// Read-only view over the codes of one level.
#[derive(Clone, Copy, Debug)]
pub struct TileView<'a> {
    codes: &'a [TileCode],
    dimensions: GridDimensions,
}

impl<'a> TileView<'a> {
    /// Captures a new view backed by a row-major code slice.
    #[must_use]
    pub fn new(codes: &'a [TileCode], dimensions: GridDimensions) -> Self {
        debug_assert_eq!(codes.len(), dimensions.cell_count());
        Self { codes, dimensions }
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Returns the code stored at the position, or `None` outside the grid.
    #[must_use]
    pub fn code(&self, pos: GridPos) -> Option<TileCode> {
        self.dimensions
            .index(pos)
            .and_then(|index| self.codes.get(index).copied())
    }

    /// Reports whether an actor with the given passability cannot enter the cell.
    ///
    /// Cells outside the grid are treated as blocked.
    #[must_use]
    pub fn is_blocked(&self, pos: GridPos, passability: Passability) -> bool {
        self.code(pos).map_or(true, |code| passability.blocks(code))
    }

    /// Finds the first cell carrying the code in row-major order.
    #[must_use]
    pub fn find_first(&self, code: TileCode) -> Option<GridPos> {
        let index = self.codes.iter().position(|candidate| *candidate == code)?;
        self.dimensions.position(index)
    }

    /// Finds every cell carrying the code inside the bounds, in row-major order.
    ///
    /// `None` scans the whole grid; bounds reaching past the grid are clamped.
    #[must_use]
    pub fn find_all(&self, code: TileCode, bounds: Option<CellBounds>) -> Vec<GridPos> {
        let bounds = bounds
            .unwrap_or_else(|| CellBounds::full(self.dimensions))
            .clamp_to(self.dimensions);
        bounds
            .positions()
            .filter(|pos| self.code(*pos) == Some(code))
            .collect()
    }

    /// Scans down the column from `start_row` (inclusive) for the first cell
    /// that blocks walkers and returns its row.
    #[must_use]
    pub fn ground_below(&self, start_row: u32, col: u32) -> Option<u32> {
        if col >= self.dimensions.cols() {
            return None;
        }
        (start_row..self.dimensions.rows()).find(|row| {
            self.code(GridPos::new(*row, col))
                .is_some_and(|code| Passability::Walker.blocks(code))
        })
    }

    /// Iterates over the rows of the level, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &'a [TileCode]> {
        let width = usize::try_from(self.dimensions.cols()).unwrap_or(0).max(1);
        self.codes.chunks(width)
    }

    /// Collects every marker code (spawn points) that appears more than once.
    #[must_use]
    pub fn duplicate_markers(&self) -> Vec<DuplicateMarker> {
        let mut seen: Vec<DuplicateMarker> = Vec::new();
        for (index, code) in self.codes.iter().enumerate() {
            if !matches!(classify(*code), TileClass::Spawn(_)) {
                continue;
            }
            let Some(pos) = self.dimensions.position(index) else {
                continue;
            };
            match seen.iter_mut().find(|entry| entry.code == *code) {
                Some(entry) => entry.positions.push(pos),
                None => seen.push(DuplicateMarker {
                    code: *code,
                    positions: vec![pos],
                }),
            }
        }
        seen.retain(|entry| entry.positions.len() > 1);
        seen
    }
}
