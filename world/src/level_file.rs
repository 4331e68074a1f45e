//! CSV level files: one grid row per line, one integer code per field.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tileworld_core::TileCode;

const FIELD_DELIMITER: char = ',';

/// Errors raised while reading or writing level files.
#[derive(Debug, Error)]
pub enum LevelFileError {
    /// The file could not be read or written.
    #[error("could not access level file {path}")]
    Io {
        /// File that was accessed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// A field did not contain an integer code.
    #[error("line {line}, field {field}: '{value}' is not a tile code")]
    InvalidCode {
        /// One-based line number.
        line: usize,
        /// One-based field number.
        field: usize,
        /// Offending text.
        value: String,
    },
}

/// Parses level contents from CSV text.
///
/// Blank lines are skipped and whitespace around fields is ignored. The
/// result is not checked against any grid dimensions; the store does that
/// when the rows are loaded.
pub fn parse(text: &str) -> Result<Vec<Vec<TileCode>>, LevelFileError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    for (line_index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split(FIELD_DELIMITER)
            .enumerate()
            .map(|(field_index, field)| {
                let field = field.trim();
                field
                    .parse::<i32>()
                    .map(TileCode::new)
                    .map_err(|_| LevelFileError::InvalidCode {
                        line: line_index + 1,
                        field: field_index + 1,
                        value: field.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Renders level contents as CSV text with a trailing newline.
#[must_use]
pub fn render<R>(rows: &[R]) -> String
where
    R: AsRef<[TileCode]>,
{
    let mut text = String::new();
    for row in rows {
        let line = row
            .as_ref()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// Reads and parses a level file.
pub fn read(path: &Path) -> Result<Vec<Vec<TileCode>>, LevelFileError> {
    let text = fs::read_to_string(path).map_err(|source| LevelFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

/// Writes level contents to a file, replacing any previous contents.
pub fn write<R>(path: &Path, rows: &[R]) -> Result<(), LevelFileError>
where
    R: AsRef<[TileCode]>,
{
    fs::write(path, render(rows)).map_err(|source| LevelFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}
