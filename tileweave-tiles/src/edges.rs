//! Edge encodings for tile adjacency.
//!
//! Explicit tiles list the tile names allowed on each side. Mask tiles carry a
//! `Self` and an `Accept` bitmask per physical edge; two edges connect when
//! each side's `Self` mask is a bit-subset of the other side's `Accept` mask.

/// Cardinal direction from a cell to one of its four neighbors.
///
/// The index order (up, right, down, left) doubles as the physical edge order
/// for mask tiles: rotating a tile by one 90-degree step shifts which edge
/// faces which direction, so `physical = (rotation + direction) % 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All four directions in index order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// The direction's index, 0..4.
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Builds a direction from an index; returns `None` for indices >= 4.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Right),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            _ => None,
        }
    }

    /// The opposite direction: `(d + 2) % 4`.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Grid-coordinate delta for this direction (y grows downward).
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Explicit adjacency lists: which tile names are legal on each side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborLists {
    pub up: Vec<String>,
    pub right: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
}

impl NeighborLists {
    /// The list for the given direction.
    pub fn list(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Up => &self.up,
            Direction::Right => &self.right,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
        }
    }

    /// Iterates over all (direction, referenced name) pairs.
    pub fn references(&self) -> impl Iterator<Item = (Direction, &str)> {
        Direction::ALL.into_iter().flat_map(move |dir| {
            self.list(dir).iter().map(move |name| (dir, name.as_str()))
        })
    }
}

/// Per-edge Self/Accept bitmasks for the mask encoding.
///
/// Arrays are in physical edge order (the same order as [`Direction::ALL`] at
/// rotation 0). `self_masks[i]` is what edge `i` presents; `accept_masks[i]`
/// is what edge `i` tolerates from the facing neighbor edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeMasks {
    pub self_masks: [u8; 4],
    pub accept_masks: [u8; 4],
}

/// `true` when every bit of `a` is also set in `b`.
const fn is_subset(a: u8, b: u8) -> bool {
    a & b == a
}

impl EdgeMasks {
    /// Maps a logical direction to the physical edge for a rotated tile.
    const fn physical(rotation: usize, direction: Direction) -> usize {
        (rotation + direction.index()) % 4
    }

    /// The `Self` mask this tile presents toward `direction` when rotated.
    pub const fn self_mask(&self, rotation: usize, direction: Direction) -> u8 {
        self.self_masks[Self::physical(rotation, direction)]
    }

    /// The `Accept` mask this tile applies toward `direction` when rotated.
    pub const fn accept_mask(&self, rotation: usize, direction: Direction) -> u8 {
        self.accept_masks[Self::physical(rotation, direction)]
    }

    /// Symmetric connection check against a neighbor's facing edge.
    ///
    /// The caller supplies the neighbor's masks for the opposite direction;
    /// the connection is legal when each side's `Self` is a subset of the
    /// other side's `Accept`.
    pub const fn check_connection(
        &self,
        rotation: usize,
        direction: Direction,
        neighbor_self: u8,
        neighbor_accept: u8,
    ) -> bool {
        let own_self = self.self_mask(rotation, direction);
        let own_accept = self.accept_mask(rotation, direction);
        is_subset(own_self, neighbor_accept) && is_subset(neighbor_self, own_accept)
    }
}

/// The adjacency encoding carried by one tile.
#[derive(Debug, Clone, PartialEq)]
pub enum TileEdges {
    /// Four ordered lists of legal neighbor tile names.
    Explicit(NeighborLists),
    /// Per-edge Self/Accept bitmasks, rotatable in 90-degree steps.
    Masks(EdgeMasks),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.opposite().index(), (dir.index() + 2) % 4);
        }
    }

    #[test]
    fn rotation_remaps_edges_cyclically() {
        let masks = EdgeMasks {
            self_masks: [0b0001, 0b0010, 0b0100, 0b1000],
            accept_masks: [0; 4],
        };
        // Unrotated, the up edge is physical edge 0.
        assert_eq!(masks.self_mask(0, Direction::Up), 0b0001);
        // One rotation step shifts every logical direction by one edge.
        assert_eq!(masks.self_mask(1, Direction::Up), 0b0010);
        assert_eq!(masks.self_mask(1, Direction::Left), 0b0001);
        // A full turn is the identity.
        assert_eq!(masks.self_mask(4 % 4, Direction::Right), 0b0010);
    }

    #[test]
    fn check_connection_requires_mutual_subset() {
        let masks = EdgeMasks {
            self_masks: [0b01; 4],
            accept_masks: [0b11; 4],
        };
        // Neighbor presents 0b01 and accepts 0b01: both subset tests pass.
        assert!(masks.check_connection(0, Direction::Right, 0b01, 0b01));
        // Neighbor accepts nothing: our Self is no longer a subset.
        assert!(!masks.check_connection(0, Direction::Right, 0b01, 0b00));
    }

    #[test]
    fn check_connection_rejects_unaccepted_neighbor() {
        let masks = EdgeMasks {
            self_masks: [0b01; 4],
            accept_masks: [0b01; 4],
        };
        // Neighbor presents a bit we do not accept.
        assert!(!masks.check_connection(0, Direction::Up, 0b10, 0b11));
    }

    #[test]
    fn neighbor_list_references_cover_all_directions() {
        let lists = NeighborLists {
            up: vec!["a".into()],
            right: vec![],
            down: vec!["b".into(), "c".into()],
            left: vec![],
        };
        let refs: Vec<_> = lists.references().collect();
        assert_eq!(
            refs,
            vec![
                (Direction::Up, "a"),
                (Direction::Down, "b"),
                (Direction::Down, "c"),
            ]
        );
    }
}
