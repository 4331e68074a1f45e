use tileworld_core::{
    GridDimensions, GridPos, HeuristicKind, Passability, PathQuery, TileCode, TileView,
};
use tileworld_system_pathfinding::PathEngine;

struct Grid {
    dimensions: GridDimensions,
    codes: Vec<TileCode>,
}

impl Grid {
    fn parse(rows: &[&str]) -> Self {
        let codes: Vec<TileCode> = rows
            .iter()
            .flat_map(|row| {
                row.chars().map(|cell| match cell {
                    '#' => TileCode::new(700),
                    'f' => TileCode::new(605),
                    'b' => TileCode::new(120),
                    _ => TileCode::EMPTY,
                })
            })
            .collect();
        let row_count = u32::try_from(rows.len()).expect("row count fits");
        let col_count = u32::try_from(rows[0].len()).expect("col count fits");
        Self {
            dimensions: GridDimensions::new(row_count, col_count),
            codes,
        }
    }

    fn open(rows: u32, cols: u32) -> Self {
        let dimensions = GridDimensions::new(rows, cols);
        Self {
            dimensions,
            codes: vec![TileCode::EMPTY; dimensions.cell_count()],
        }
    }

    fn view(&self) -> TileView<'_> {
        TileView::new(&self.codes, self.dimensions)
    }
}

fn assert_walkable(grid: &Grid, start: GridPos, path: &[GridPos], max_step: u32) {
    let view = grid.view();
    let mut previous = start;
    for cell in path {
        assert!(
            !view.is_blocked(*cell, Passability::Walker),
            "path stepped onto blocked cell {cell}"
        );
        let step = previous.manhattan_distance(*cell);
        assert!(
            (1..=max_step).contains(&step),
            "{previous} -> {cell} is not a single move"
        );
        assert!(
            previous.row().abs_diff(cell.row()) <= 1 && previous.col().abs_diff(cell.col()) <= 1,
            "{previous} -> {cell} skips cells"
        );
        previous = *cell;
    }
}

#[test]
fn open_grid_path_is_manhattan_optimal() {
    let grid = Grid::open(5, 5);
    let mut engine = PathEngine::default();
    let start = GridPos::new(0, 0);
    let target = GridPos::new(4, 4);

    let path = engine.find_path(
        grid.view(),
        &PathQuery::new(start, target)
            .with_heuristic(HeuristicKind::Manhattan)
            .with_weight(1),
    );

    assert_eq!(path.len(), 8);
    assert_eq!(path.last(), Some(&target));
    assert!(!path.contains(&start));
    assert_walkable(&grid, start, &path, 1);
}

#[test]
fn path_to_self_is_empty() {
    let grid = Grid::open(3, 3);
    let mut engine = PathEngine::default();
    let cell = GridPos::new(1, 1);

    assert!(engine.find_path(grid.view(), &PathQuery::new(cell, cell)).is_empty());
    assert!(engine
        .find_path(grid.view(), &PathQuery::new(cell, cell).with_diagonals(true))
        .is_empty());
}

#[test]
fn blocked_endpoints_yield_empty_paths() {
    let grid = Grid::parse(&["#..", "...", "..#"]);
    let mut engine = PathEngine::default();

    let from_wall = PathQuery::new(GridPos::new(0, 0), GridPos::new(1, 1));
    let into_wall = PathQuery::new(GridPos::new(1, 1), GridPos::new(2, 2));
    let outside = PathQuery::new(GridPos::new(1, 1), GridPos::new(3, 0));

    assert!(engine.find_path(grid.view(), &from_wall).is_empty());
    assert!(engine.find_path(grid.view(), &into_wall).is_empty());
    assert!(engine.find_path(grid.view(), &outside).is_empty());
}

#[test]
fn corridor_path_never_touches_walls() {
    let grid = Grid::parse(&[
        ".#######",
        ".#.....#",
        ".#.###.#",
        "...#...#",
        "####.###",
        "....#...",
    ]);
    let mut engine = PathEngine::default();
    let start = GridPos::new(0, 0);
    let target = GridPos::new(4, 4);

    let path = engine.find_path(grid.view(), &PathQuery::new(start, target));

    assert_eq!(path.last(), Some(&target));
    assert_walkable(&grid, start, &path, 1);
}

#[test]
fn unreachable_target_yields_empty_path() {
    let grid = Grid::parse(&["..#..", "..#..", "..#.."]);
    let mut engine = PathEngine::default();

    let query = PathQuery::new(GridPos::new(0, 0), GridPos::new(2, 4)).with_diagonals(true);
    assert!(engine.find_path(grid.view(), &query).is_empty());
}

#[test]
fn adjacent_target_is_a_single_step() {
    let grid = Grid::open(3, 3);
    let mut engine = PathEngine::default();

    let orthogonal = PathQuery::new(GridPos::new(1, 1), GridPos::new(1, 2));
    assert_eq!(
        engine.find_path(grid.view(), &orthogonal),
        vec![GridPos::new(1, 2)]
    );

    let diagonal = PathQuery::new(GridPos::new(1, 1), GridPos::new(2, 2)).with_diagonals(true);
    assert_eq!(
        engine.find_path(grid.view(), &diagonal),
        vec![GridPos::new(2, 2)]
    );
}

#[test]
fn diagonal_moves_shorten_open_paths() {
    let grid = Grid::open(5, 5);
    let mut engine = PathEngine::default();
    let start = GridPos::new(0, 0);
    let target = GridPos::new(4, 4);

    for heuristic in [HeuristicKind::Manhattan, HeuristicKind::Euclidean] {
        let query = PathQuery::new(start, target)
            .with_heuristic(heuristic)
            .with_diagonals(true);
        let path = engine.find_path(grid.view(), &query);

        assert!(path.len() < 8, "{heuristic:?} produced {} steps", path.len());
        assert_eq!(path.last(), Some(&target));
        assert_walkable(&grid, start, &path, 2);
    }
}

#[test]
fn heavy_weights_still_produce_valid_paths() {
    let grid = Grid::parse(&[
        "........",
        ".######.",
        ".#....#.",
        ".#.##.#.",
        "...#....",
    ]);
    let mut engine = PathEngine::default();
    let start = GridPos::new(2, 2);
    let target = GridPos::new(4, 7);

    for weight in [1, 2, 5, 10] {
        let query = PathQuery::new(start, target).with_weight(weight);
        let path = engine.find_path(grid.view(), &query);
        assert_eq!(path.last(), Some(&target), "weight {weight} found no path");
        assert_walkable(&grid, start, &path, 1);
    }
}

#[test]
fn identical_queries_return_identical_paths() {
    let grid = Grid::open(6, 6);
    let mut engine = PathEngine::default();
    let query = PathQuery::new(GridPos::new(0, 5), GridPos::new(5, 0)).with_diagonals(true);

    let first = engine.find_path(grid.view(), &query);
    let second = engine.find_path(grid.view(), &query);
    let fresh = PathEngine::default().find_path(grid.view(), &query);

    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[test]
fn scratch_state_does_not_leak_between_grids() {
    let large = Grid::open(8, 8);
    let small = Grid::parse(&["..", "#."]);
    let mut engine = PathEngine::default();

    let _ = engine.find_path(
        large.view(),
        &PathQuery::new(GridPos::new(0, 0), GridPos::new(7, 7)),
    );
    let path = engine.find_path(
        small.view(),
        &PathQuery::new(GridPos::new(0, 0), GridPos::new(1, 1)),
    );

    assert_eq!(path, vec![GridPos::new(0, 1), GridPos::new(1, 1)]);
}

#[test]
fn passability_profile_decides_what_blocks() {
    let grid = Grid::parse(&["#f#", "...", "###"]);
    let mut engine = PathEngine::default();
    let start = GridPos::new(0, 1);
    let target = GridPos::new(1, 0);

    let walker = PathQuery::new(start, target);
    assert!(engine.find_path(grid.view(), &walker).is_empty());

    let piercing = walker.with_passability(Passability::Piercing);
    assert_eq!(
        engine.find_path(grid.view(), &piercing),
        vec![GridPos::new(1, 1), GridPos::new(1, 0)]
    );
}

#[test]
fn grounded_profile_routes_around_low_barriers() {
    let grid = Grid::parse(&["...", "b#.", "..."]);
    let mut engine = PathEngine::default();
    let start = GridPos::new(0, 0);
    let target = GridPos::new(2, 0);
    let barrier = GridPos::new(1, 0);

    let walker = PathQuery::new(start, target);
    assert_eq!(
        engine.find_path(grid.view(), &walker),
        vec![barrier, target]
    );

    let grounded = walker.with_passability(Passability::Grounded);
    let path = engine.find_path(grid.view(), &grounded);
    assert_eq!(path.len(), 6);
    assert_eq!(path.last(), Some(&target));
    assert!(!path.contains(&barrier));
    for cell in &path {
        assert!(!grid.view().is_blocked(*cell, Passability::Grounded));
    }
    assert_walkable(&grid, start, &path, 1);

    let into_barrier = PathQuery::new(start, barrier).with_passability(Passability::Grounded);
    assert!(engine.find_path(grid.view(), &into_barrier).is_empty());
}
