use serde::{Deserialize, Serialize};

use crate::{GridPos, Passability};

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

const DIAGONAL: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, 1),
    (0, -1),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

/// Distance estimate used to steer the path engine toward its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeuristicKind {
    /// Sum of the absolute row and column deltas.
    #[default]
    Manhattan,
    /// Straight-line distance truncated to an integer.
    Euclidean,
}

impl HeuristicKind {
    /// Estimates the weighted cost between two positions.
    ///
    /// The weight scales the estimate, not the step cost, so weights above one
    /// trade optimality for faster convergence. Negative weights count as zero.
    #[must_use]
    pub fn estimate(self, from: GridPos, to: GridPos, weight: i32) -> u32 {
        let weight = u32::try_from(weight).unwrap_or(0);
        let d_col = from.col().abs_diff(to.col());
        let d_row = from.row().abs_diff(to.row());
        match self {
            Self::Manhattan => weight.saturating_mul(d_col.saturating_add(d_row)),
            Self::Euclidean => {
                let distance = f64::from(d_col).hypot(f64::from(d_row));
                let scaled = f64::from(weight) * distance;
                scaled as u32
            }
        }
    }
}

/// Set of moves the path engine may take from a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Neighborhood {
    /// Up, down, left and right.
    #[default]
    Orthogonal,
    /// Orthogonal moves followed by the four diagonal moves.
    Diagonal,
}

impl Neighborhood {
    /// Chooses the neighbourhood matching a diagonal-movement flag.
    #[must_use]
    pub const fn from_diagonals(allow_diagonals: bool) -> Self {
        if allow_diagonals {
            Self::Diagonal
        } else {
            Self::Orthogonal
        }
    }

    /// Fixed-order `(column, row)` offsets expanded for every cell.
    #[must_use]
    pub const fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Orthogonal => &ORTHOGONAL,
            Self::Diagonal => &DIAGONAL,
        }
    }

    /// Largest Manhattan distance a single move can cover.
    #[must_use]
    pub const fn max_step_distance(self) -> u32 {
        match self {
            Self::Orthogonal => 1,
            Self::Diagonal => 2,
        }
    }
}

/// Parameters of a single path request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathQuery {
    start: GridPos,
    target: GridPos,
    heuristic: HeuristicKind,
    weight: i32,
    neighborhood: Neighborhood,
    passability: Passability,
}

impl PathQuery {
    /// Creates a Manhattan, unit-weight, orthogonal query for walkers.
    #[must_use]
    pub const fn new(start: GridPos, target: GridPos) -> Self {
        Self {
            start,
            target,
            heuristic: HeuristicKind::Manhattan,
            weight: 1,
            neighborhood: Neighborhood::Orthogonal,
            passability: Passability::Walker,
        }
    }

    /// Replaces the heuristic.
    #[must_use]
    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Replaces the heuristic weight.
    #[must_use]
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Enables or disables diagonal moves.
    #[must_use]
    pub fn with_diagonals(mut self, allow_diagonals: bool) -> Self {
        self.neighborhood = Neighborhood::from_diagonals(allow_diagonals);
        self
    }

    /// Replaces the passability profile used to decide blocked cells.
    #[must_use]
    pub fn with_passability(mut self, passability: Passability) -> Self {
        self.passability = passability;
        self
    }

    /// Cell the search starts from.
    #[must_use]
    pub const fn start(&self) -> GridPos {
        self.start
    }

    /// Cell the search tries to reach.
    #[must_use]
    pub const fn target(&self) -> GridPos {
        self.target
    }

    /// Heuristic steering the search.
    #[must_use]
    pub const fn heuristic(&self) -> HeuristicKind {
        self.heuristic
    }

    /// Multiplier applied to the heuristic estimate.
    #[must_use]
    pub const fn weight(&self) -> i32 {
        self.weight
    }

    /// Moves available from each cell.
    #[must_use]
    pub const fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Passability profile of the actor requesting the path.
    #[must_use]
    pub const fn passability(&self) -> Passability {
        self.passability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_scales_by_weight() {
        let from = GridPos::new(0, 0);
        let to = GridPos::new(3, 4);
        assert_eq!(HeuristicKind::Manhattan.estimate(from, to, 1), 7);
        assert_eq!(HeuristicKind::Manhattan.estimate(from, to, 3), 21);
        assert_eq!(HeuristicKind::Manhattan.estimate(from, to, -2), 0);
    }

    #[test]
    fn euclidean_truncates() {
        let from = GridPos::new(0, 0);
        assert_eq!(HeuristicKind::Euclidean.estimate(from, GridPos::new(3, 4), 1), 5);
        assert_eq!(HeuristicKind::Euclidean.estimate(from, GridPos::new(1, 1), 1), 1);
        assert_eq!(HeuristicKind::Euclidean.estimate(from, GridPos::new(1, 1), 10), 14);
    }

    #[test]
    fn diagonal_offsets_start_with_orthogonal_moves() {
        let diagonal = Neighborhood::Diagonal.offsets();
        assert_eq!(&diagonal[..4], Neighborhood::Orthogonal.offsets());
        assert_eq!(diagonal.len(), 8);
    }
}
