#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Conversions between grid indices and normalized render space.
//!
//! Render space spans `[-1, 1]` on both axes. Tile sizes are derived from the
//! grid dimensions so that the whole grid always fills the normalized square.

use glam::Vec2;
use tileworld_core::GridDimensions;

/// Grid axis a coordinate belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis, indexed by column.
    Column,
    /// Vertical axis, indexed by row.
    Row,
}

/// Direction rows advance in render space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowOrder {
    /// Row 0 sits at the top edge (`uv = +1`), matching the store layout.
    TopDown,
    /// Row 0 sits at the bottom edge (`uv = -1`).
    BottomUp,
}

/// Pure transform between tile indices and normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateTransform {
    dimensions: GridDimensions,
}

impl CoordinateTransform {
    /// Creates a transform for a grid of the provided dimensions.
    #[must_use]
    pub const fn new(dimensions: GridDimensions) -> Self {
        Self { dimensions }
    }

    /// Dimensions the transform was built for.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Size of a single tile along the axis in normalized units.
    ///
    /// An axis without tiles is treated as holding one tile.
    #[must_use]
    pub fn tile_size(&self, axis: Axis) -> f32 {
        2.0 / self.tiles_on(axis).max(1) as f32
    }

    /// Normalized coordinate of a tile centre shifted by `microstep` tiles.
    ///
    /// A microstep of `1.0` lands on the centre of the next tile along the
    /// axis, which lets movement animate smoothly between two indices.
    #[must_use]
    pub fn index_to_uv(&self, axis: Axis, index: u32, row_order: RowOrder, microstep: f32) -> f32 {
        let offset = (index as f32 + 0.5 + microstep) * self.tile_size(axis);
        match (axis, row_order) {
            (Axis::Row, RowOrder::TopDown) => 1.0 - offset,
            (Axis::Column, _) | (Axis::Row, RowOrder::BottomUp) => offset - 1.0,
        }
    }

    /// Normalized position of a fractional `(column, row)` tile coordinate,
    /// centring the grid on the origin.
    #[must_use]
    pub fn index_to_uv_centered(&self, tile: Vec2, row_order: RowOrder) -> Vec2 {
        let size = Vec2::new(self.tile_size(Axis::Column), self.tile_size(Axis::Row));
        let half_grid = Vec2::new(
            self.dimensions.cols() as f32,
            self.dimensions.rows() as f32,
        ) * 0.5;
        let centered = (tile + Vec2::splat(0.5) - half_grid) * size;
        match row_order {
            RowOrder::TopDown => Vec2::new(centered.x, -centered.y),
            RowOrder::BottomUp => centered,
        }
    }

    /// Tile index containing the normalized coordinate, or `None` when it
    /// falls outside the grid.
    #[must_use]
    pub fn uv_to_index(&self, axis: Axis, uv: f32, row_order: RowOrder) -> Option<u32> {
        if !uv.is_finite() {
            return None;
        }
        let distance = match (axis, row_order) {
            (Axis::Row, RowOrder::TopDown) => 1.0 - uv,
            (Axis::Column, _) | (Axis::Row, RowOrder::BottomUp) => uv + 1.0,
        };
        if distance < 0.0 {
            return None;
        }

        let index = (distance / self.tile_size(axis)).floor();
        if index < self.tiles_on(axis) as f32 {
            Some(index as u32)
        } else {
            None
        }
    }

    fn tiles_on(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Column => self.dimensions.cols(),
            Axis::Row => self.dimensions.rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn transform(rows: u32, cols: u32) -> CoordinateTransform {
        CoordinateTransform::new(GridDimensions::new(rows, cols))
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn tile_size_spans_the_normalized_square() {
        let transform = transform(4, 8);
        assert_close(transform.tile_size(Axis::Column), 0.25);
        assert_close(transform.tile_size(Axis::Row), 0.5);
        assert_close(CoordinateTransform::new(GridDimensions::new(0, 0)).tile_size(Axis::Row), 2.0);
    }

    #[test]
    fn columns_grow_to_the_right() {
        let transform = transform(4, 4);
        assert_close(transform.index_to_uv(Axis::Column, 0, RowOrder::TopDown, 0.0), -0.75);
        assert_close(transform.index_to_uv(Axis::Column, 3, RowOrder::BottomUp, 0.0), 0.75);
    }

    #[test]
    fn row_order_flips_the_vertical_axis() {
        let transform = transform(4, 4);
        assert_close(transform.index_to_uv(Axis::Row, 0, RowOrder::TopDown, 0.0), 0.75);
        assert_close(transform.index_to_uv(Axis::Row, 0, RowOrder::BottomUp, 0.0), -0.75);
        assert_close(transform.index_to_uv(Axis::Row, 3, RowOrder::TopDown, 0.0), -0.75);
    }

    #[test]
    fn microstep_interpolates_between_tiles() {
        let transform = transform(4, 4);
        let from = transform.index_to_uv(Axis::Column, 1, RowOrder::TopDown, 0.0);
        let to = transform.index_to_uv(Axis::Column, 2, RowOrder::TopDown, 0.0);
        let halfway = transform.index_to_uv(Axis::Column, 1, RowOrder::TopDown, 0.5);
        assert_close(halfway, (from + to) / 2.0);
        assert_close(
            transform.index_to_uv(Axis::Row, 1, RowOrder::TopDown, 1.0),
            transform.index_to_uv(Axis::Row, 2, RowOrder::TopDown, 0.0),
        );
    }

    #[test]
    fn centered_form_matches_per_axis_conversion() {
        let transform = transform(3, 5);
        for order in [RowOrder::TopDown, RowOrder::BottomUp] {
            let uv = transform.index_to_uv_centered(Vec2::new(4.0, 2.0), order);
            assert_close(uv.x, transform.index_to_uv(Axis::Column, 4, order, 0.0));
            assert_close(uv.y, transform.index_to_uv(Axis::Row, 2, order, 0.0));

            let middle = transform.index_to_uv_centered(Vec2::new(2.0, 1.0), order);
            assert_close(middle.x, 0.0);
            assert_close(middle.y, 0.0);
        }

        let top = transform.index_to_uv_centered(Vec2::new(0.0, 0.0), RowOrder::TopDown);
        let bottom = transform.index_to_uv_centered(Vec2::new(0.0, 0.0), RowOrder::BottomUp);
        assert_close(top.y, -bottom.y);
        assert!(top.y > 0.0);
    }

    #[test]
    fn uv_to_index_inverts_tile_centres() {
        let transform = transform(6, 7);
        for order in [RowOrder::TopDown, RowOrder::BottomUp] {
            for row in 0..6 {
                let uv = transform.index_to_uv(Axis::Row, row, order, 0.0);
                assert_eq!(transform.uv_to_index(Axis::Row, uv, order), Some(row));
            }
            for col in 0..7 {
                let uv = transform.index_to_uv(Axis::Column, col, order, 0.0);
                assert_eq!(transform.uv_to_index(Axis::Column, uv, order), Some(col));
            }
        }
    }

    #[test]
    fn uv_outside_the_grid_has_no_index() {
        let transform = transform(4, 4);
        assert_eq!(transform.uv_to_index(Axis::Column, -1.2, RowOrder::TopDown), None);
        assert_eq!(transform.uv_to_index(Axis::Column, 1.0, RowOrder::TopDown), None);
        assert_eq!(transform.uv_to_index(Axis::Row, 1.5, RowOrder::TopDown), None);
        assert_eq!(transform.uv_to_index(Axis::Row, f32::NAN, RowOrder::BottomUp), None);
        assert_eq!(
            CoordinateTransform::new(GridDimensions::new(0, 0)).uv_to_index(
                Axis::Row,
                0.0,
                RowOrder::TopDown
            ),
            None
        );
    }
}
