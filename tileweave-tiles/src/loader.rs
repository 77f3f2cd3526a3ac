//! Loading tile sets from RON (Rusty Object Notation) rule files.
//!
//! A rule file lists every tile with its name, weight, and edge encoding:
//!
//! ```ron
//! (
//!     tiles: [
//!         (name: "grass", weight: 3.0, edges: Explicit((
//!             up: ["grass", "water"],
//!             right: ["grass"],
//!             down: ["grass", "water"],
//!             left: ["grass"],
//!         ))),
//!         (name: "pipe", weight: 1.0, edges: Masks((
//!             self_masks: (0x1, 0x2, 0x1, 0x2),
//!             accept_masks: (0x3, 0x2, 0x3, 0x2),
//!         ))),
//!     ],
//! )
//! ```

use crate::edges::{EdgeMasks, NeighborLists, TileEdges};
use crate::tile::{Tile, TileSet, TileSetError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or parsing a rule file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O failure reading the file.
    #[error("i/o error reading rule file: {0}")]
    Io(#[from] std::io::Error),
    /// The RON content could not be deserialized.
    #[error("failed to parse rule file: {0}")]
    Parse(String),
    /// The content parsed but described an invalid tile set.
    #[error("invalid rule data: {0}")]
    InvalidData(String),
}

impl From<TileSetError> for LoadError {
    fn from(error: TileSetError) -> Self {
        Self::InvalidData(error.to_string())
    }
}

// Structs mirroring the RON format. Kept separate from the public types so
// the file layout can evolve without touching the tile model.

#[derive(Debug, Clone, Deserialize)]
struct RonNeighborLists {
    #[serde(default)]
    up: Vec<String>,
    #[serde(default)]
    right: Vec<String>,
    #[serde(default)]
    down: Vec<String>,
    #[serde(default)]
    left: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RonEdgeMasks {
    self_masks: (u8, u8, u8, u8),
    accept_masks: (u8, u8, u8, u8),
}

#[derive(Debug, Clone, Deserialize)]
enum RonTileEdges {
    Explicit(RonNeighborLists),
    Masks(RonEdgeMasks),
}

#[derive(Debug, Clone, Deserialize)]
struct RonTileData {
    name: String,
    weight: f32,
    edges: RonTileEdges,
}

#[derive(Debug, Clone, Deserialize)]
struct RonRuleFile {
    tiles: Vec<RonTileData>,
}

fn convert_tile(data: RonTileData) -> Tile {
    let edges = match data.edges {
        RonTileEdges::Explicit(lists) => TileEdges::Explicit(NeighborLists {
            up: lists.up,
            right: lists.right,
            down: lists.down,
            left: lists.left,
        }),
        RonTileEdges::Masks(masks) => {
            let (s0, s1, s2, s3) = masks.self_masks;
            let (a0, a1, a2, a3) = masks.accept_masks;
            TileEdges::Masks(EdgeMasks {
                self_masks: [s0, s1, s2, s3],
                accept_masks: [a0, a1, a2, a3],
            })
        }
    };
    Tile {
        name: data.name,
        weight: data.weight,
        edges,
    }
}

/// Parses a tile set from RON rule content.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] for malformed RON and
/// [`LoadError::InvalidData`] when the content fails tile-set validation
/// (empty set, bad weight, duplicate name, mixed encodings).
pub fn parse_ron_rules(content: &str) -> Result<TileSet, LoadError> {
    let rule_file: RonRuleFile =
        ron::from_str(content).map_err(|e| LoadError::Parse(e.to_string()))?;
    let tiles: Vec<Tile> = rule_file.tiles.into_iter().map(convert_tile).collect();
    Ok(TileSet::new(tiles)?)
}

/// Loads and parses a RON rule file from disk.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read, otherwise the
/// errors of [`parse_ron_rules`].
pub fn load_from_file(path: &Path) -> Result<TileSet, LoadError> {
    let content = fs::read_to_string(path)?;
    parse_ron_rules(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::Direction;

    const EXPLICIT_RULES: &str = r#"(
        tiles: [
            (name: "grass", weight: 3.0, edges: Explicit((
                up: ["grass", "water"],
                right: ["grass"],
                down: ["grass", "water"],
                left: ["grass"],
            ))),
            (name: "water", weight: 1.0, edges: Explicit((
                up: ["water"],
                right: ["water", "grass"],
                down: ["water"],
                left: ["water", "grass"],
            ))),
        ],
    )"#;

    #[test]
    fn parses_explicit_rules() {
        let set = parse_ron_rules(EXPLICIT_RULES).expect("should parse");
        assert_eq!(set.num_tiles(), 2);
        assert_eq!(set.rotations(), 1);
        let grass = set.id_of("grass").unwrap();
        let water = set.id_of("water").unwrap();
        assert_eq!(set.weight(grass), Some(3.0));
        assert!(set.is_valid_neighbor(grass, water, Direction::Up));
        assert!(!set.is_valid_neighbor(grass, water, Direction::Right));
    }

    #[test]
    fn parses_mask_rules() {
        let content = r#"(
            tiles: [
                (name: "pipe", weight: 1.0, edges: Masks((
                    self_masks: (0x1, 0x2, 0x1, 0x2),
                    accept_masks: (0x3, 0x2, 0x3, 0x2),
                ))),
            ],
        )"#;
        let set = parse_ron_rules(content).expect("should parse");
        assert_eq!(set.rotations(), 4);
    }

    #[test]
    fn reports_parse_errors() {
        let result = parse_ron_rules("(tiles: [oops");
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn reports_invalid_tile_sets() {
        let content = r#"(
            tiles: [
                (name: "a", weight: -1.0, edges: Explicit(())),
            ],
        )"#;
        let result = parse_ron_rules(content);
        assert!(matches!(result, Err(LoadError::InvalidData(_))));
    }

    #[test]
    fn missing_directions_default_to_empty() {
        let content = r#"(
            tiles: [
                (name: "solo", weight: 1.0, edges: Explicit((up: ["solo"]))),
            ],
        )"#;
        let set = parse_ron_rules(content).expect("should parse");
        let solo = set.id_of("solo").unwrap();
        assert!(set.is_valid_neighbor(solo, solo, Direction::Up));
        assert!(!set.is_valid_neighbor(solo, solo, Direction::Down));
    }
}
