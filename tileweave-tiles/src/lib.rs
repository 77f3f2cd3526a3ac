//! Tile definitions and adjacency rules for the tileweave solver.
//!
//! A [`TileSet`] describes the tiles a grid may be filled with, their relative
//! selection weights, and which tiles may sit next to which. Two rule
//! encodings are supported: explicit per-direction neighbor lists, and
//! per-edge Self/Accept bitmasks combined with a 90-degree rotation index.

/// Directions, neighbor lists, and the bitmask edge model.
pub mod edges;
/// Loading tile sets from RON rule files.
pub mod loader;
/// Tile and tile-set types with validation.
pub mod tile;

pub use edges::{Direction, EdgeMasks, NeighborLists, TileEdges};
pub use loader::{load_from_file, parse_ron_rules, LoadError};
pub use tile::{Tile, TileId, TileSet, TileSetError};
