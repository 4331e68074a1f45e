#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted best-first path search over a tile view.
//!
//! The engine runs a weighted A* variant: every step costs one, and the
//! query's integer weight multiplies the heuristic only. Weights above one make
//! the estimate inadmissible, which trades optimal paths for faster
//! convergence. The engine never mutates the tiles it searches; it only owns
//! scratch buffers that are reset at the start of every call.

use std::{cmp::Ordering, collections::BinaryHeap};

use log::trace;
use tileworld_core::{GridDimensions, GridPos, Neighborhood, PathQuery, TileView};

/// Best known way of reaching a cell during one search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SearchNode {
    parent: GridPos,
    f: u32,
    g: u32,
    h: u32,
}

/// Entry of the open queue.
///
/// Lower `f` pops first; equal `f` values pop in insertion order, which keeps
/// the chosen path stable for identical inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    sequence: u64,
    pos: GridPos,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Path search engine holding reusable scratch buffers.
#[derive(Debug, Default)]
pub struct PathEngine {
    open: BinaryHeap<OpenEntry>,
    came_from: Vec<Option<SearchNode>>,
    closed: Vec<bool>,
    sequence: u64,
}

impl PathEngine {
    /// Searches for a path between the query's endpoints.
    ///
    /// The result runs from the step after the start up to and including the
    /// target. It is empty when either endpoint is blocked or outside the
    /// grid, when the target cannot be reached, and when start and target are
    /// the same cell.
    pub fn find_path(&mut self, view: TileView<'_>, query: &PathQuery) -> Vec<GridPos> {
        let dimensions = view.dimensions();
        let start = query.start();
        let target = query.target();
        let passability = query.passability();

        if view.is_blocked(start, passability) || view.is_blocked(target, passability) {
            trace!("path {start} -> {target} rejected: blocked endpoint");
            return Vec::new();
        }
        let Some(start_index) = dimensions.index(start) else {
            return Vec::new();
        };

        self.reset(dimensions.cell_count());
        self.came_from[start_index] = Some(SearchNode {
            parent: start,
            f: 0,
            g: 0,
            h: 0,
        });
        self.push(start, 0);

        if !self.search(view, query) {
            trace!("path {start} -> {target} not found");
            return Vec::new();
        }
        if let Some(node) = dimensions
            .index(target)
            .and_then(|index| self.came_from[index])
        {
            trace!(
                "path {start} -> {target} reached with g={} h={}",
                node.g,
                node.h
            );
        }

        let path = reconstruct(
            &self.came_from,
            dimensions,
            start,
            target,
            query.neighborhood(),
        );
        trace!("path {start} -> {target} has {} steps", path.len());
        path
    }

    fn search(&mut self, view: TileView<'_>, query: &PathQuery) -> bool {
        let dimensions = view.dimensions();
        let target = query.target();

        while let Some(entry) = self.open.pop() {
            let Some(index) = dimensions.index(entry.pos) else {
                continue;
            };
            if self.closed[index] {
                continue;
            }
            if entry.pos == target {
                return true;
            }
            self.closed[index] = true;

            let g = self.came_from[index].map_or(0, |node| node.g);
            for &(d_col, d_row) in query.neighborhood().offsets() {
                let Some(neighbor) = entry.pos.offset(d_col, d_row) else {
                    continue;
                };
                let Some(neighbor_index) = dimensions.index(neighbor) else {
                    continue;
                };
                if self.closed[neighbor_index] || view.is_blocked(neighbor, query.passability()) {
                    continue;
                }

                let g_new = g.saturating_add(1);
                let h_new = query
                    .heuristic()
                    .estimate(neighbor, target, query.weight());
                let f_new = g_new.saturating_add(h_new);
                let improves = self.came_from[neighbor_index].map_or(true, |node| f_new < node.f);
                if !improves {
                    continue;
                }

                self.came_from[neighbor_index] = Some(SearchNode {
                    parent: entry.pos,
                    f: f_new,
                    g: g_new,
                    h: h_new,
                });
                self.push(neighbor, f_new);
            }
        }
        false
    }

    fn reset(&mut self, cell_count: usize) {
        self.open.clear();
        self.came_from.clear();
        self.came_from.resize(cell_count, None);
        self.closed.clear();
        self.closed.resize(cell_count, false);
        self.sequence = 0;
    }

    fn push(&mut self, pos: GridPos, f: u32) {
        self.open.push(OpenEntry {
            f,
            sequence: self.sequence,
            pos,
        });
        self.sequence = self.sequence.wrapping_add(1);
    }
}

/// Walks the came-from records back from the target to the self-parented start.
///
/// A single-step result is only trusted when start and target are actually
/// adjacent; longer results are returned as walked.
fn reconstruct(
    came_from: &[Option<SearchNode>],
    dimensions: GridDimensions,
    start: GridPos,
    target: GridPos,
    neighborhood: Neighborhood,
) -> Vec<GridPos> {
    let mut path = Vec::new();
    let mut current = target;
    loop {
        let node = dimensions
            .index(current)
            .and_then(|index| came_from.get(index).copied().flatten());
        let Some(node) = node else {
            return Vec::new();
        };
        if node.parent == current {
            break;
        }
        path.push(current);
        current = node.parent;
    }
    path.reverse();

    if path.len() == 1 && start.manhattan_distance(target) > neighborhood.max_step_distance() {
        path.clear();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(parent: GridPos) -> Option<SearchNode> {
        Some(SearchNode {
            parent,
            f: 1,
            g: 1,
            h: 0,
        })
    }

    fn records(dimensions: GridDimensions, links: &[(GridPos, GridPos)]) -> Vec<Option<SearchNode>> {
        let mut came_from = vec![None; dimensions.cell_count()];
        for (cell, parent) in links {
            if let Some(index) = dimensions.index(*cell) {
                came_from[index] = node(*parent);
            }
        }
        came_from
    }

    #[test]
    fn open_queue_pops_lowest_f_then_oldest() {
        let mut queue = BinaryHeap::new();
        for (f, sequence, col) in [(5, 0, 0), (3, 1, 1), (3, 2, 2), (4, 3, 3)] {
            queue.push(OpenEntry {
                f,
                sequence,
                pos: GridPos::new(0, col),
            });
        }
        let order: Vec<u32> = std::iter::from_fn(|| queue.pop())
            .map(|entry| entry.pos.col())
            .collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }

    #[test]
    fn reconstruct_discards_non_adjacent_single_step() {
        let dimensions = GridDimensions::new(1, 5);
        let start = GridPos::new(0, 0);
        let target = GridPos::new(0, 3);
        let came_from = records(dimensions, &[(start, start), (target, start)]);

        let path = reconstruct(&came_from, dimensions, start, target, Neighborhood::Orthogonal);
        assert!(path.is_empty());
    }

    #[test]
    fn reconstruct_keeps_adjacent_single_step() {
        let dimensions = GridDimensions::new(2, 2);
        let start = GridPos::new(0, 0);
        let target = GridPos::new(1, 1);
        let came_from = records(dimensions, &[(start, start), (target, start)]);

        assert_eq!(
            reconstruct(&came_from, dimensions, start, target, Neighborhood::Diagonal),
            vec![target]
        );
        assert!(
            reconstruct(&came_from, dimensions, start, target, Neighborhood::Orthogonal).is_empty()
        );
    }

    #[test]
    fn reconstruct_does_not_validate_longer_paths() {
        let dimensions = GridDimensions::new(1, 5);
        let start = GridPos::new(0, 0);
        let jump = GridPos::new(0, 1);
        let target = GridPos::new(0, 4);
        let came_from = records(dimensions, &[(start, start), (jump, start), (target, jump)]);

        assert_eq!(
            reconstruct(&came_from, dimensions, start, target, Neighborhood::Orthogonal),
            vec![jump, target]
        );
    }

    #[test]
    fn reconstruct_of_start_is_empty() {
        let dimensions = GridDimensions::new(1, 1);
        let start = GridPos::new(0, 0);
        let came_from = records(dimensions, &[(start, start)]);
        assert!(reconstruct(&came_from, dimensions, start, start, Neighborhood::Orthogonal).is_empty());
    }

    #[test]
    fn reset_resizes_scratch_for_every_grid() {
        let mut engine = PathEngine::default();
        engine.reset(25);
        engine.closed[24] = true;
        engine.reset(4);
        assert_eq!(engine.closed, vec![false; 4]);
        assert_eq!(engine.came_from.len(), 4);
        assert!(engine.open.is_empty());
    }
}
