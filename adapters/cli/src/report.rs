//! Text parsing and formatting for the debug commands.

use std::fmt::Write as _;

use tileworld_core::{CellBounds, GridPos, Passability, TileCode, TileView};

/// Parses a `row,col` pair.
pub(crate) fn parse_cell(value: &str) -> Result<GridPos, String> {
    let fields = parse_fields(value, 2)?;
    Ok(GridPos::new(fields[0], fields[1]))
}

/// Parses a half-open `row_lo,row_hi,col_lo,col_hi` rectangle.
pub(crate) fn parse_bounds(value: &str) -> Result<CellBounds, String> {
    let fields = parse_fields(value, 4)?;
    Ok(CellBounds::new(fields[0], fields[1], fields[2], fields[3]))
}

fn parse_fields(value: &str, expected: usize) -> Result<Vec<u32>, String> {
    let fields = value
        .split(',')
        .map(|field| {
            field
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("`{}` is not a non-negative integer", field.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if fields.len() != expected {
        return Err(format!(
            "expected {expected} comma separated values, found {}",
            fields.len()
        ));
    }
    Ok(fields)
}

/// One-line description of a code's class and which profiles it blocks.
pub(crate) fn describe(code: TileCode) -> String {
    let blocked_by: Vec<&str> = [
        ("walker", Passability::Walker),
        ("piercing", Passability::Piercing),
        ("grounded", Passability::Grounded),
    ]
    .into_iter()
    .filter(|(_, profile)| profile.blocks(code))
    .map(|(name, _)| name)
    .collect();

    let blocks = if blocked_by.is_empty() {
        "nothing".to_owned()
    } else {
        blocked_by.join(", ")
    };
    format!("{code}: {:?}, blocks {blocks}", code.class())
}

/// Draws the level with the path overlaid.
///
/// `#` marks cells blocked for the profile, `S` and `T` the endpoints and `*`
/// every intermediate step.
pub(crate) fn render_path(
    view: TileView<'_>,
    passability: Passability,
    start: GridPos,
    path: &[GridPos],
) -> String {
    let dimensions = view.dimensions();
    let mut text = String::with_capacity(dimensions.cell_count() + dimensions.rows() as usize);
    for row in 0..dimensions.rows() {
        for col in 0..dimensions.cols() {
            let pos = GridPos::new(row, col);
            let glyph = if pos == start {
                'S'
            } else if path.last() == Some(&pos) {
                'T'
            } else if path.contains(&pos) {
                '*'
            } else if view.is_blocked(pos, passability) {
                '#'
            } else {
                '.'
            };
            text.push(glyph);
        }
        text.push('\n');
    }
    text
}

/// Lists cells one per line.
pub(crate) fn list_cells(cells: &[GridPos]) -> String {
    let mut text = String::new();
    for cell in cells {
        let _ = writeln!(text, "{cell}");
    }
    text
}
