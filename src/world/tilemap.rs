//! Tile levels
//!
//! A level is a character grid, top row first. Each glyph expands into a
//! sprite on one named layer. World coordinates are y-up: row 0 is the top
//! of the map and the bottom edge of the last row sits at y = 0.

use macroquad::math::{vec2, Vec2};
use serde::{Deserialize, Serialize};

/// Named sprite layers, listed in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerName {
    Background,
    Depth,
    Platforms,
    Boxes,
    Items,
    Death,
    Decoration,
    Player,
}

impl LayerName {
    /// Back to front
    pub const DRAW_ORDER: [LayerName; 8] = [
        LayerName::Background,
        LayerName::Depth,
        LayerName::Platforms,
        LayerName::Boxes,
        LayerName::Items,
        LayerName::Death,
        LayerName::Decoration,
        LayerName::Player,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerName::Background => "background",
            LayerName::Depth => "depth",
            LayerName::Platforms => "platforms",
            LayerName::Boxes => "boxes",
            LayerName::Items => "items",
            LayerName::Death => "death",
            LayerName::Decoration => "decoration",
            LayerName::Player => "player",
        }
    }

    /// Layers whose sprites block movement
    pub fn is_solid(self) -> bool {
        matches!(self, LayerName::Platforms | LayerName::Boxes)
    }

    /// Index into `DRAW_ORDER`
    pub fn index(self) -> usize {
        self as usize
    }
}

/// What a glyph in the grid means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Empty,
    Tile(LayerName),
    PlayerStart,
}

impl Glyph {
    pub fn parse(c: char) -> Option<Glyph> {
        let glyph = match c {
            '.' | ' ' => Glyph::Empty,
            '#' => Glyph::Tile(LayerName::Platforms),
            'B' => Glyph::Tile(LayerName::Boxes),
            'o' => Glyph::Tile(LayerName::Items),
            '^' => Glyph::Tile(LayerName::Death),
            '*' => Glyph::Tile(LayerName::Decoration),
            '~' => Glyph::Tile(LayerName::Background),
            '=' => Glyph::Tile(LayerName::Depth),
            'P' => Glyph::PlayerStart,
            _ => return None,
        };
        Some(glyph)
    }
}

/// One sprite produced by the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub layer: LayerName,
    pub center: Vec2,
    pub size: Vec2,
}

fn default_tile_size() -> f32 {
    64.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Player feet position (bottom center). Overrides a `P` in the grid.
    #[serde(default)]
    pub player_start: Option<(f32, f32)>,
    pub rows: Vec<String>,
}

impl Level {
    pub fn width_tiles(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    pub fn height_tiles(&self) -> usize {
        self.rows.len()
    }

    /// Map extent in pixels
    pub fn map_size(&self) -> Vec2 {
        vec2(
            self.width_tiles() as f32 * self.tile_size,
            self.height_tiles() as f32 * self.tile_size,
        )
    }

    /// Center of grid cell (col, row)
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        let rows = self.height_tiles() as f32;
        vec2(
            (col as f32 + 0.5) * self.tile_size,
            (rows - row as f32 - 0.5) * self.tile_size,
        )
    }

    fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, line)| line.chars().enumerate().map(move |(col, c)| (col, row, c)))
    }

    /// Expand the grid into sprites. Unknown glyphs are skipped
    /// (validation rejects them before this is called).
    pub fn tiles(&self) -> Vec<Tile> {
        let full = vec2(self.tile_size, self.tile_size);
        self.cells()
            .filter_map(|(col, row, c)| match Glyph::parse(c) {
                Some(Glyph::Tile(layer)) => Some(Tile {
                    layer,
                    center: self.cell_center(col, row),
                    // Coins are half a tile
                    size: if layer == LayerName::Items { full * 0.5 } else { full },
                }),
                _ => None,
            })
            .collect()
    }

    pub fn coin_count(&self) -> usize {
        self.cells()
            .filter(|(_, _, c)| Glyph::parse(*c) == Some(Glyph::Tile(LayerName::Items)))
            .count()
    }

    /// Where players spawn (feet position)
    pub fn start_position(&self) -> Option<Vec2> {
        if let Some((x, y)) = self.player_start {
            return Some(vec2(x, y));
        }
        self.cells()
            .find(|(_, _, c)| Glyph::parse(*c) == Some(Glyph::PlayerStart))
            .map(|(col, row, _)| self.cell_center(col, row) - vec2(0.0, self.tile_size * 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(rows: &[&str]) -> Level {
        Level {
            name: "test".to_string(),
            tile_size: 64.0,
            player_start: None,
            rows: rows.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_grid_is_y_up() {
        let level = level(&["..o", "P..", "###"]);
        assert_eq!(level.map_size(), vec2(192.0, 192.0));
        assert_eq!(level.cell_center(0, 2), vec2(32.0, 32.0));
        assert_eq!(level.cell_center(2, 0), vec2(160.0, 160.0));
        assert_eq!(level.start_position(), Some(vec2(32.0, 64.0)));
    }

    #[test]
    fn test_tiles_by_layer() {
        let level = level(&["o^*", "~=B", "###"]);
        let tiles = level.tiles();
        assert_eq!(tiles.len(), 9);
        let platforms = tiles.iter().filter(|t| t.layer == LayerName::Platforms).count();
        assert_eq!(platforms, 3);

        let coin = tiles.iter().find(|t| t.layer == LayerName::Items).unwrap();
        assert_eq!(coin.size, vec2(32.0, 32.0));
        assert_eq!(level.coin_count(), 1);
    }

    #[test]
    fn test_explicit_start_wins() {
        let mut level = level(&["P..", "###"]);
        level.player_start = Some((100.0, 64.0));
        assert_eq!(level.start_position(), Some(vec2(100.0, 64.0)));
    }

    #[test]
    fn test_draw_order_matches_index() {
        for (i, layer) in LayerName::DRAW_ORDER.iter().enumerate() {
            assert_eq!(layer.index(), i);
        }
        assert!(LayerName::Boxes.is_solid());
        assert!(!LayerName::Items.is_solid());
    }
}
