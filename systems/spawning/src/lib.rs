#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system that turns level markers into entity positions.
//!
//! Entities locate their spawn point by claiming a marker code. The first
//! matching cell is returned and a command resetting it to empty is emitted,
//! so every marker is consumed exactly once. Pickups are dropped onto the
//! nearest ground below the cell they were released from.

use log::{debug, warn};
use thiserror::Error;
use tileworld_core::{classify, Command, Event, GridPos, TileClass, TileCode, TileView};

/// Reasons an entity could not be placed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    /// No unclaimed cell carries the marker.
    #[error("could not initialize: marker {code} not found")]
    MissingMarker {
        /// Marker that was requested.
        code: TileCode,
    },
    /// The code is not a spawn or waypoint marker.
    #[error("code {code} is not a marker")]
    NotAMarker {
        /// Code that was requested.
        code: TileCode,
    },
    /// The column has no ground to rest on below the release point.
    #[error("no ground below {from}")]
    NoGround {
        /// Cell the pickup was released from.
        from: GridPos,
    },
    /// The resting cell already holds something.
    #[error("resting cell {pos} is occupied by {code}")]
    Occupied {
        /// Cell the pickup would rest on.
        pos: GridPos,
        /// Code stored there.
        code: TileCode,
    },
}

/// Pure system that claims markers and places pickups.
///
/// Claims are tracked until the world confirms the matching tile change, so a
/// marker claimed earlier in a frame is not handed out twice before the
/// emitted commands are applied.
#[derive(Debug, Default)]
pub struct Spawning {
    pending: Vec<GridPos>,
}

impl Spawning {
    /// Consumes world events, releasing claims the world has confirmed.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TileChanged { pos, .. } => self.pending.retain(|pending| pending != pos),
                Event::LevelLoaded { .. } | Event::CurrentLevelChanged { .. } => {
                    self.pending.clear();
                }
                Event::TilesReplaced { .. } => {}
            }
        }
    }

    /// Claims the first unclaimed cell carrying a unique marker.
    ///
    /// Emits the command that erases the marker and returns its position.
    pub fn claim_marker(
        &mut self,
        view: TileView<'_>,
        code: TileCode,
        out: &mut Vec<Command>,
    ) -> Result<GridPos, SpawnError> {
        ensure_marker(code)?;
        let pos = view
            .find_all(code, None)
            .into_iter()
            .find(|pos| !self.pending.contains(pos))
            .ok_or(SpawnError::MissingMarker { code })?;

        self.erase(pos, out);
        debug!("claimed marker {code} at {pos}");
        Ok(pos)
    }

    /// Claims every unclaimed cell carrying a waypoint code, in row-major
    /// order, and erases them all.
    pub fn claim_waypoints(
        &mut self,
        view: TileView<'_>,
        code: TileCode,
        out: &mut Vec<Command>,
    ) -> Result<Vec<GridPos>, SpawnError> {
        ensure_marker(code)?;
        let cells: Vec<GridPos> = view
            .find_all(code, None)
            .into_iter()
            .filter(|pos| !self.pending.contains(pos))
            .collect();
        if cells.is_empty() {
            return Err(SpawnError::MissingMarker { code });
        }

        for pos in &cells {
            self.erase(*pos, out);
        }
        Ok(cells)
    }

    /// Drops a pickup released at `from` onto the ground below it.
    ///
    /// The pickup rests in the cell directly above the first walker-blocking
    /// cell at or below `from`. Emits the command that places it.
    pub fn drop_pickup(
        &mut self,
        view: TileView<'_>,
        from: GridPos,
        pickup: TileCode,
        out: &mut Vec<Command>,
    ) -> Result<GridPos, SpawnError> {
        let ground = view
            .ground_below(from.row(), from.col())
            .ok_or(SpawnError::NoGround { from })?;
        let rest_row = ground
            .checked_sub(1)
            .ok_or(SpawnError::NoGround { from })?;
        let rest = GridPos::new(rest_row, from.col());

        let occupant = view.code(rest).unwrap_or(TileCode::EMPTY);
        if !occupant.is_empty() {
            warn!("pickup {pickup} cannot rest on {rest}: occupied by {occupant}");
            return Err(SpawnError::Occupied {
                pos: rest,
                code: occupant,
            });
        }

        out.push(Command::SetTile {
            pos: rest,
            code: pickup,
        });
        Ok(rest)
    }

    fn erase(&mut self, pos: GridPos, out: &mut Vec<Command>) {
        self.pending.push(pos);
        out.push(Command::SetTile {
            pos,
            code: TileCode::EMPTY,
        });
    }
}

fn ensure_marker(code: TileCode) -> Result<(), SpawnError> {
    match classify(code) {
        TileClass::Spawn(_) | TileClass::Waypoint(_) => Ok(()),
        _ => Err(SpawnError::NotAMarker { code }),
    }
}
