#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure colour-switch system that toggles coloured platform sets.
//!
//! Each colour owns a solid code and a walkable ghost code. Activating a
//! colour turns its platforms into ghosts and turns every other colour's
//! ghosts back into solid platforms. All rewrites are emitted as
//! [`Command::ReplaceTiles`] so they stay reversible.

use log::debug;
use thiserror::Error;
use tileworld_core::{is_blocking, CellBounds, Command, Event, TileCode};

/// Reasons a switch could not be configured or toggled.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SwitchError {
    /// The solid code does not block walkers.
    #[error("solid code {code} does not block walkers")]
    SolidNotBlocking {
        /// Offending code.
        code: TileCode,
    },
    /// The ghost code blocks walkers.
    #[error("ghost code {code} blocks walkers")]
    GhostBlocking {
        /// Offending code.
        code: TileCode,
    },
    /// Two sets share a code, which would make toggles irreversible.
    #[error("code {code} is used by more than one colour set")]
    SharedCode {
        /// Code used twice.
        code: TileCode,
    },
    /// The requested colour does not exist.
    #[error("colour {index} does not exist ({count} colours configured)")]
    UnknownColor {
        /// Requested colour index.
        index: usize,
        /// Number of configured colours.
        count: usize,
    },
}

/// Solid and ghost codes of one platform colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorSet {
    solid: TileCode,
    ghost: TileCode,
}

impl ColorSet {
    /// Creates a colour set after checking that the solid code blocks walkers
    /// and the ghost code does not.
    pub fn new(solid: TileCode, ghost: TileCode) -> Result<Self, SwitchError> {
        if !is_blocking(solid) {
            return Err(SwitchError::SolidNotBlocking { code: solid });
        }
        if is_blocking(ghost) {
            return Err(SwitchError::GhostBlocking { code: ghost });
        }
        Ok(Self { solid, ghost })
    }

    /// Code of the colour's platforms while solid.
    #[must_use]
    pub const fn solid(&self) -> TileCode {
        self.solid
    }

    /// Code of the colour's platforms while walkable.
    #[must_use]
    pub const fn ghost(&self) -> TileCode {
        self.ghost
    }
}

/// Colour switch tracking which colour is currently walkable.
#[derive(Debug)]
pub struct ColorSwitch {
    sets: Vec<ColorSet>,
    bounds: Option<CellBounds>,
    active: Option<usize>,
}

impl ColorSwitch {
    /// Creates a switch over the provided colours, all initially solid.
    pub fn new(sets: Vec<ColorSet>) -> Result<Self, SwitchError> {
        let mut codes: Vec<TileCode> = Vec::with_capacity(sets.len() * 2);
        for set in &sets {
            for code in [set.solid(), set.ghost()] {
                if codes.contains(&code) {
                    return Err(SwitchError::SharedCode { code });
                }
                codes.push(code);
            }
        }
        Ok(Self {
            sets,
            bounds: None,
            active: None,
        })
    }

    /// Restricts every rewrite to a region of the level.
    #[must_use]
    pub fn with_bounds(mut self, bounds: CellBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Colour whose platforms are currently walkable.
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// Consumes world events; a level change makes every colour solid again.
    pub fn handle(&mut self, events: &[Event]) {
        let level_changed = events.iter().any(|event| {
            matches!(
                event,
                Event::CurrentLevelChanged { .. } | Event::LevelLoaded { .. }
            )
        });
        if level_changed {
            self.active = None;
        }
    }

    /// Makes the colour walkable and every other colour solid.
    pub fn activate(&mut self, index: usize, out: &mut Vec<Command>) -> Result<(), SwitchError> {
        if index >= self.sets.len() {
            return Err(SwitchError::UnknownColor {
                index,
                count: self.sets.len(),
            });
        }

        for (position, set) in self.sets.iter().enumerate() {
            let (from, to) = if position == index {
                (set.solid(), set.ghost())
            } else {
                (set.ghost(), set.solid())
            };
            out.push(Command::ReplaceTiles {
                from,
                to,
                bounds: self.bounds,
            });
        }
        self.active = Some(index);
        debug!("colour {index} is now walkable");
        Ok(())
    }

    /// Makes every colour solid again.
    pub fn deactivate(&mut self, out: &mut Vec<Command>) {
        if let Some(index) = self.active.take() {
            let set = self.sets[index];
            out.push(Command::ReplaceTiles {
                from: set.ghost(),
                to: set.solid(),
                bounds: self.bounds,
            });
        }
    }
}
