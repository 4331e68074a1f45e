//! Range-based classification of raw tile codes.
//!
//! Codes are grouped by planet theme (jungle 0–699, terrestrial 200–899,
//! snow 400–1100, ship 1200+) with waypoint markers from 1400 upwards. Every
//! collision, interaction and path-finding decision goes through [`classify`]
//! or a [`Passability`] profile; callers never compare codes against literal
//! thresholds.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::TileCode;

/// First code of the waypoint marker range.
pub const WAYPOINT_BASE: i32 = 1400;

/// Solid terrain and ship hull codes that block walkers.
pub const TERRAIN: Range<i32> = 600..WAYPOINT_BASE;

/// Foliage band at the bottom of the terrain range that piercing ammunition
/// passes through.
pub const FOLIAGE: Range<i32> = 600..610;

/// Low barriers that only stop grounded ammunition.
pub const LOW_BARRIER: Range<i32> = 100..150;

/// Capability class derived from a tile code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileClass {
    /// Nothing is stored in the cell.
    Empty,
    /// Solid terrain that walkers cannot enter.
    Blocking,
    /// Lava, poison or spikes that damage whatever enters.
    Hazard,
    /// Resources and orbs that can be picked up.
    Collectible,
    /// Unique spawn marker carrying its marker number.
    Spawn(u32),
    /// Transient waypoint marker carrying its waypoint number.
    Waypoint(u32),
    /// Render-only code that never blocks and never interacts.
    Decorative,
}

impl TileClass {
    /// Reports whether walkers are stopped by the class.
    ///
    /// This is the [`Passability::Walker`] view only. Other profiles block
    /// codes of other classes too, e.g. [`Passability::Grounded`] stops the
    /// decorative low barriers, so movement checks go through
    /// [`Passability::blocks`].
    #[must_use]
    pub const fn blocks_walkers(&self) -> bool {
        matches!(self, Self::Blocking)
    }

    /// Reports whether the class marks a cell that is consumed once read.
    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::Spawn(_) | Self::Waypoint(_))
    }

    /// Reports whether entering the cell triggers an interaction.
    #[must_use]
    pub const fn is_interactable(&self) -> bool {
        matches!(self, Self::Hazard | Self::Collectible)
    }
}

/// Maps a raw code to its capability class.
///
/// Codes outside every rule, negative codes included, are decorative.
#[must_use]
pub fn classify(code: TileCode) -> TileClass {
    match code.get() {
        0 => TileClass::Empty,
        raw @ 1..=99 => TileClass::Spawn(raw.unsigned_abs()),
        100..=149 => TileClass::Decorative,
        150..=199 | 300..=349 | 400..=449 => TileClass::Hazard,
        200..=299 | 350..=399 | 450..=599 => TileClass::Collectible,
        raw if TERRAIN.contains(&raw) => TileClass::Blocking,
        raw if raw >= WAYPOINT_BASE => TileClass::Waypoint((raw - WAYPOINT_BASE).unsigned_abs()),
        _ => TileClass::Decorative,
    }
}

/// Authoritative blocking predicate used by the generic map query.
#[must_use]
pub fn is_blocking(code: TileCode) -> bool {
    Passability::Walker.blocks(code)
}

/// Movement rules applied by different kinds of actors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Passability {
    /// Players, ground enemies and the path engine.
    #[default]
    Walker,
    /// Ammunition that flies through the foliage band.
    Piercing,
    /// Ammunition that is also stopped by low barriers.
    Grounded,
}

impl Passability {
    /// Reports whether the code stops an actor using this profile.
    #[must_use]
    pub fn blocks(self, code: TileCode) -> bool {
        let raw = code.get();
        match self {
            Self::Walker => TERRAIN.contains(&raw),
            Self::Piercing => TERRAIN.contains(&raw) && !FOLIAGE.contains(&raw),
            Self::Grounded => TERRAIN.contains(&raw) || LOW_BARRIER.contains(&raw),
        }
    }
}
