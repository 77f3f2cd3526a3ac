use crate::edges::{Direction, TileEdges};
use log::warn;
use std::collections::HashMap;
use thiserror::Error;

/// Index of a tile within its [`TileSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub usize);

/// Errors that can occur during tile-set creation or validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileSetError {
    /// The tile list was empty.
    #[error("tile set cannot be empty")]
    EmptyTileSet,
    /// A tile had a weight <= 0. Weights are relative selection
    /// probabilities and must be positive.
    #[error("tile weights must be positive; tile {0} ({1}) has weight {2}")]
    NonPositiveWeight(usize, String, String),
    /// Two tiles shared the same name.
    #[error("duplicate tile name: {0}")]
    DuplicateTileName(String),
    /// Explicit and mask tiles were mixed in one set. The solver treats a
    /// tile set as one encoding throughout.
    #[error("tile set mixes explicit and mask edge encodings")]
    MixedEdgeEncodings,
}

/// One tile definition: a unique name, a positive selection weight, and the
/// adjacency encoding for its four edges.
#[derive(Debug, Clone)]
pub struct Tile {
    pub name: String,
    pub weight: f32,
    pub edges: TileEdges,
}

/// A validated, immutable set of tiles.
///
/// Explicit tile sets are rotation-agnostic (one rotation); mask tile sets
/// may place each tile in any of the four 90-degree rotations.
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Tile>,
    name_to_id: HashMap<String, TileId>,
    rotations: usize,
}

impl TileSet {
    /// Validates and builds a tile set.
    ///
    /// Hard errors: empty set, non-positive weight, duplicate name, mixed
    /// edge encodings. Dangling neighbor references in explicit lists are
    /// not fatal: every one of them is logged as a warning, since a typo in
    /// one list should not hide the typos in the rest.
    ///
    /// # Errors
    ///
    /// Returns a [`TileSetError`] describing the first hard violation.
    pub fn new(tiles: Vec<Tile>) -> Result<Self, TileSetError> {
        if tiles.is_empty() {
            return Err(TileSetError::EmptyTileSet);
        }

        let mut name_to_id = HashMap::new();
        for (index, tile) in tiles.iter().enumerate() {
            if tile.weight <= 0.0 {
                return Err(TileSetError::NonPositiveWeight(
                    index,
                    tile.name.clone(),
                    tile.weight.to_string(),
                ));
            }
            if name_to_id
                .insert(tile.name.clone(), TileId(index))
                .is_some()
            {
                return Err(TileSetError::DuplicateTileName(tile.name.clone()));
            }
        }

        let all_masks = tiles
            .iter()
            .all(|t| matches!(t.edges, TileEdges::Masks(_)));
        let all_explicit = tiles
            .iter()
            .all(|t| matches!(t.edges, TileEdges::Explicit(_)));
        if !all_masks && !all_explicit {
            return Err(TileSetError::MixedEdgeEncodings);
        }

        let set = Self {
            tiles,
            name_to_id,
            rotations: if all_masks { 4 } else { 1 },
        };
        set.warn_dangling_references();
        Ok(set)
    }

    fn warn_dangling_references(&self) {
        for tile in &self.tiles {
            let TileEdges::Explicit(lists) = &tile.edges else {
                continue;
            };
            for (direction, name) in lists.references() {
                if !self.name_to_id.contains_key(name) {
                    warn!(
                        "tile {:?} references undefined neighbor {:?} in direction {:?}",
                        tile.name, name, direction
                    );
                }
            }
        }
    }

    /// Number of tiles in the set.
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Number of rotations per tile: 4 for mask sets, 1 for explicit sets.
    pub const fn rotations(&self) -> usize {
        self.rotations
    }

    /// The tile for an id, or `None` if out of range.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    /// Looks up a tile id by name.
    pub fn id_of(&self, name: &str) -> Option<TileId> {
        self.name_to_id.get(name).copied()
    }

    /// The selection weight for a tile, or `None` if out of range.
    pub fn weight(&self, id: TileId) -> Option<f32> {
        self.tiles.get(id.0).map(|t| t.weight)
    }

    /// Explicit-encoding membership check: is `neighbor` listed as legal on
    /// `tile`'s side facing `direction`? Fails closed for unknown ids or
    /// mask-encoded tiles.
    pub fn is_valid_neighbor(
        &self,
        tile: TileId,
        neighbor: TileId,
        direction: Direction,
    ) -> bool {
        let (Some(tile), Some(neighbor)) = (self.tile(tile), self.tile(neighbor)) else {
            return false;
        };
        match &tile.edges {
            TileEdges::Explicit(lists) => lists
                .list(direction)
                .iter()
                .any(|name| *name == neighbor.name),
            TileEdges::Masks(_) => false,
        }
    }

    /// Unified adjacency check used by constraint propagation: may tile `a`
    /// at rotation `rot_a` sit with tile `b` at rotation `rot_b` as its
    /// neighbor toward `direction`?
    ///
    /// For explicit sets this is list membership (rotations are ignored).
    /// For mask sets both facing edges are compared with the two-way subset
    /// test, pairing `direction` on `a` with the opposite direction on `b`.
    /// Fails closed for unknown ids.
    pub fn compatible(
        &self,
        a: TileId,
        rot_a: usize,
        b: TileId,
        rot_b: usize,
        direction: Direction,
    ) -> bool {
        let (Some(tile_a), Some(tile_b)) = (self.tile(a), self.tile(b)) else {
            return false;
        };
        match (&tile_a.edges, &tile_b.edges) {
            (TileEdges::Explicit(_), TileEdges::Explicit(_)) => {
                self.is_valid_neighbor(a, b, direction)
            }
            (TileEdges::Masks(masks_a), TileEdges::Masks(masks_b)) => {
                let facing = direction.opposite();
                masks_a.check_connection(
                    rot_a,
                    direction,
                    masks_b.self_mask(rot_b, facing),
                    masks_b.accept_mask(rot_b, facing),
                )
            }
            // Mixed encodings are rejected at construction; fail closed.
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::{EdgeMasks, NeighborLists};

    fn explicit_tile(name: &str, weight: f32, lists: NeighborLists) -> Tile {
        Tile {
            name: name.to_owned(),
            weight,
            edges: TileEdges::Explicit(lists),
        }
    }

    fn mask_tile(name: &str, masks: EdgeMasks) -> Tile {
        Tile {
            name: name.to_owned(),
            weight: 1.0,
            edges: TileEdges::Masks(masks),
        }
    }

    #[test]
    fn rejects_empty_set() {
        assert!(matches!(
            TileSet::new(vec![]),
            Err(TileSetError::EmptyTileSet)
        ));
    }

    #[test]
    fn rejects_non_positive_weight() {
        let result = TileSet::new(vec![explicit_tile("a", 0.0, NeighborLists::default())]);
        assert!(matches!(
            result,
            Err(TileSetError::NonPositiveWeight(0, _, _))
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = TileSet::new(vec![
            explicit_tile("a", 1.0, NeighborLists::default()),
            explicit_tile("a", 2.0, NeighborLists::default()),
        ]);
        assert!(matches!(
            result,
            Err(TileSetError::DuplicateTileName(name)) if name == "a"
        ));
    }

    #[test]
    fn rejects_mixed_encodings() {
        let result = TileSet::new(vec![
            explicit_tile("a", 1.0, NeighborLists::default()),
            mask_tile("b", EdgeMasks::default()),
        ]);
        assert!(matches!(result, Err(TileSetError::MixedEdgeEncodings)));
    }

    #[test]
    fn rotation_count_follows_encoding() {
        let explicit = TileSet::new(vec![explicit_tile("a", 1.0, NeighborLists::default())])
            .expect("valid set");
        assert_eq!(explicit.rotations(), 1);

        let masks =
            TileSet::new(vec![mask_tile("m", EdgeMasks::default())]).expect("valid set");
        assert_eq!(masks.rotations(), 4);
    }

    #[test]
    fn is_valid_neighbor_checks_membership_and_fails_closed() {
        let set = TileSet::new(vec![
            explicit_tile(
                "grass",
                1.0,
                NeighborLists {
                    right: vec!["water".into()],
                    ..NeighborLists::default()
                },
            ),
            explicit_tile("water", 1.0, NeighborLists::default()),
        ])
        .expect("valid set");

        let grass = set.id_of("grass").unwrap();
        let water = set.id_of("water").unwrap();
        assert!(set.is_valid_neighbor(grass, water, Direction::Right));
        assert!(!set.is_valid_neighbor(grass, water, Direction::Left));
        // Unknown ids fail closed.
        assert!(!set.is_valid_neighbor(TileId(99), water, Direction::Right));
        assert!(!set.is_valid_neighbor(grass, TileId(99), Direction::Right));
    }

    #[test]
    fn compatible_pairs_opposite_mask_edges() {
        // Tile "socket" presents 0b01 everywhere and accepts anything;
        // tile "picky" presents 0b10 and only accepts 0b10.
        let socket = mask_tile(
            "socket",
            EdgeMasks {
                self_masks: [0b01; 4],
                accept_masks: [0b11; 4],
            },
        );
        let picky = mask_tile(
            "picky",
            EdgeMasks {
                self_masks: [0b10; 4],
                accept_masks: [0b10; 4],
            },
        );
        let set = TileSet::new(vec![socket, picky]).expect("valid set");
        let socket = set.id_of("socket").unwrap();
        let picky = set.id_of("picky").unwrap();

        // socket->socket: 0b01 subset of 0b11 both ways.
        assert!(set.compatible(socket, 0, socket, 0, Direction::Right));
        // socket->picky: picky does not accept 0b01.
        assert!(!set.compatible(socket, 0, picky, 0, Direction::Right));
        // picky->picky: 0b10 subset of 0b10 both ways.
        assert!(set.compatible(picky, 0, picky, 2, Direction::Down));
    }
}
