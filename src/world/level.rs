//! Level loading
//!
//! Level files are RON, optionally brotli compressed. The format is
//! auto-detected by checking for a valid RON start.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};

use super::tilemap::{Glyph, Level};

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    pub const MAX_ROWS: usize = 256;
    pub const MAX_COLUMNS: usize = 1024;
    pub const MIN_TILE_SIZE: f32 = 4.0;
    pub const MAX_TILE_SIZE: f32 = 512.0;
    pub const MAX_NAME_LEN: usize = 256;
    /// Maximum coordinate value for an explicit player start
    pub const MAX_COORD: f32 = 1_000_000.0;
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("brotli: {0}")]
    Decompress(String),
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("validation error: {0}")]
    Validation(String),
}

fn is_valid_coord(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

/// Validate a parsed level
pub fn validate_level(level: &Level) -> Result<(), LevelError> {
    if level.name.len() > limits::MAX_NAME_LEN {
        return Err(LevelError::Validation(format!(
            "name too long ({} > {})", level.name.len(), limits::MAX_NAME_LEN
        )));
    }
    if !(limits::MIN_TILE_SIZE..=limits::MAX_TILE_SIZE).contains(&level.tile_size) {
        return Err(LevelError::Validation(format!(
            "tile_size {} outside {}..={}", level.tile_size, limits::MIN_TILE_SIZE, limits::MAX_TILE_SIZE
        )));
    }
    if level.rows.is_empty() {
        return Err(LevelError::Validation("level has no rows".to_string()));
    }
    if level.rows.len() > limits::MAX_ROWS {
        return Err(LevelError::Validation(format!(
            "too many rows ({} > {})", level.rows.len(), limits::MAX_ROWS
        )));
    }

    let mut starts = 0;
    for (row, line) in level.rows.iter().enumerate() {
        let columns = line.chars().count();
        if columns > limits::MAX_COLUMNS {
            return Err(LevelError::Validation(format!(
                "row {}: too many columns ({} > {})", row, columns, limits::MAX_COLUMNS
            )));
        }
        for (col, c) in line.chars().enumerate() {
            match Glyph::parse(c) {
                Some(Glyph::PlayerStart) => starts += 1,
                Some(_) => {}
                None => {
                    return Err(LevelError::Validation(format!(
                        "row {} col {}: unknown glyph {:?}", row, col, c
                    )))
                }
            }
        }
    }

    if starts > 1 {
        return Err(LevelError::Validation(format!("{} player starts, expected one", starts)));
    }
    match level.player_start {
        Some((x, y)) if !is_valid_coord(x) || !is_valid_coord(y) => {
            return Err(LevelError::Validation(format!("invalid player_start ({}, {})", x, y)));
        }
        None if starts == 0 => {
            return Err(LevelError::Validation("no player start".to_string()));
        }
        _ => {}
    }
    Ok(())
}

/// Detect format: RON files start with '(' or whitespace, brotli is binary
fn is_plain_ron(bytes: &[u8]) -> bool {
    bytes
        .first()
        .map(|&b| b == b'(' || b == b' ' || b == b'\n' || b == b'\r' || b == b'\t')
        .unwrap_or(false)
}

/// Parse level data from bytes (plain or compressed)
pub fn parse_level_data(bytes: &[u8]) -> Result<Level, LevelError> {
    let contents = if is_plain_ron(bytes) {
        String::from_utf8(bytes.to_vec())?
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
            .map_err(|e| LevelError::Decompress(e.to_string()))?;
        String::from_utf8(decompressed)?
    };
    load_level_from_str(&contents)
}

/// Load a level from a RON string (for embedded levels or testing)
pub fn load_level_from_str(s: &str) -> Result<Level, LevelError> {
    let level: Level = match ron::from_str(s) {
        Ok(level) => level,
        Err(e) => {
            let pos = e.position;
            if let Some(line) = s.lines().nth(pos.line.saturating_sub(1)) {
                error!("RON parse error at line {}: {}", pos.line, line.trim());
            }
            return Err(e.into());
        }
    };
    validate_level(&level)?;
    Ok(level)
}

/// Load a level file (supports both compressed and uncompressed)
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<Level, LevelError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let level = parse_level_data(&bytes)?;
    debug!(
        "loaded level '{}' from {} ({}x{} tiles)",
        level.name,
        path.display(),
        level.width_tiles(),
        level.height_tiles()
    );
    Ok(level)
}
