//! Grid of cells, each carrying a bitset over (tile, rotation) pairs.
//!
//! The domain of a cell is stored tile-major and rotation-minor: the bit for
//! tile `t` at rotation `r` lives at `t * rotations + r`. Explicit tile sets
//! use a single rotation, so their pair domain degenerates to a plain tile
//! domain.

use bitvec::prelude::{bitvec, BitVec, Lsb0};

/// One grid cell: its remaining possibility bitset and, once collapsed, the
/// chosen (tile, rotation) pair.
#[derive(Debug, Clone)]
pub struct Cell {
    domain: BitVec<usize, Lsb0>,
    selected: Option<(usize, usize)>,
}

impl Cell {
    fn open(pair_count: usize) -> Self {
        Self {
            domain: bitvec![usize, Lsb0; 1; pair_count],
            selected: None,
        }
    }
}

/// Mutable solver state for a rectangular grid.
///
/// Coordinates are `(x, y)` with `x` in `0..width` and `y` in `0..height`.
/// All accessors fail closed on out-of-range coordinates: reads report an
/// empty or absent value and writes are ignored.
#[derive(Debug, Clone)]
pub struct GridState {
    width: usize,
    height: usize,
    num_tiles: usize,
    rotations: usize,
    cells: Vec<Cell>,
}

impl GridState {
    /// Creates a grid with every cell open to every (tile, rotation) pair.
    pub fn new(width: usize, height: usize, num_tiles: usize, rotations: usize) -> Self {
        let pair_count = num_tiles * rotations;
        Self {
            width,
            height,
            num_tiles,
            rotations,
            cells: vec![Cell::open(pair_count); width * height],
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    pub const fn rotations(&self) -> usize {
        self.rotations
    }

    /// `true` when `(x, y)` lies inside the grid.
    pub const fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            self.cells.get_mut(y * self.width + x)
        } else {
            None
        }
    }

    const fn bit(&self, tile: usize, rotation: usize) -> usize {
        tile * self.rotations + rotation
    }

    /// Count of tiles with at least one valid rotation remaining.
    pub fn valid_tile_count(&self, x: usize, y: usize) -> usize {
        let Some(cell) = self.cell(x, y) else {
            return 0;
        };
        (0..self.num_tiles)
            .filter(|&tile| {
                let start = tile * self.rotations;
                cell.domain[start..start + self.rotations].any()
            })
            .count()
    }

    /// Count of valid (tile, rotation) pairs remaining. This is the cell's
    /// entropy measure: lower means more constrained.
    pub fn valid_pair_count(&self, x: usize, y: usize) -> usize {
        self.cell(x, y).map_or(0, |cell| cell.domain.count_ones())
    }

    /// Whether the pair (tile, rotation) is still possible at `(x, y)`.
    pub fn is_pair_valid(&self, x: usize, y: usize, tile: usize, rotation: usize) -> bool {
        if tile >= self.num_tiles || rotation >= self.rotations {
            return false;
        }
        let index = self.bit(tile, rotation);
        self.cell(x, y).is_some_and(|cell| cell.domain[index])
    }

    /// Sets or clears every rotation of `tile` at once.
    pub fn set_tile_valid(&mut self, x: usize, y: usize, tile: usize, valid: bool) {
        if tile >= self.num_tiles {
            return;
        }
        let start = self.bit(tile, 0);
        let rotations = self.rotations;
        if let Some(cell) = self.cell_mut(x, y) {
            cell.domain[start..start + rotations].fill(valid);
        }
    }

    /// Sets or clears one (tile, rotation) pair.
    pub fn set_pair_valid(
        &mut self,
        x: usize,
        y: usize,
        tile: usize,
        rotation: usize,
        valid: bool,
    ) {
        if tile >= self.num_tiles || rotation >= self.rotations {
            return;
        }
        let index = self.bit(tile, rotation);
        if let Some(cell) = self.cell_mut(x, y) {
            cell.domain.set(index, valid);
        }
    }

    /// The `n`-th valid pair in tile-major, rotation-minor order, or `None`
    /// when fewer than `n + 1` pairs remain.
    pub fn nth_valid_pair(&self, x: usize, y: usize, n: usize) -> Option<(usize, usize)> {
        let cell = self.cell(x, y)?;
        let index = cell.domain.iter_ones().nth(n)?;
        Some((index / self.rotations, index % self.rotations))
    }

    /// Iterates the valid (tile, rotation) pairs of a cell in tile-major,
    /// rotation-minor order.
    pub fn valid_pairs(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let rotations = self.rotations;
        self.cell(x, y)
            .into_iter()
            .flat_map(move |cell| {
                cell.domain
                    .iter_ones()
                    .map(move |index| (index / rotations, index % rotations))
            })
    }

    /// `true` once the cell has been collapsed to a single pair.
    pub fn is_collapsed(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_some_and(|cell| cell.selected.is_some())
    }

    /// The collapsed pair of a cell, if any.
    pub fn selected(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        self.cell(x, y).and_then(|cell| cell.selected)
    }

    /// Collapses a cell to exactly one pair: the domain shrinks to that pair
    /// and the selection is recorded.
    pub fn collapse_to(&mut self, x: usize, y: usize, tile: usize, rotation: usize) {
        if tile >= self.num_tiles || rotation >= self.rotations {
            return;
        }
        let index = self.bit(tile, rotation);
        if let Some(cell) = self.cell_mut(x, y) {
            cell.domain.fill(false);
            cell.domain.set(index, true);
            cell.selected = Some((tile, rotation));
        }
    }

    /// `true` once every cell is collapsed.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.selected.is_some())
    }

    /// Coordinates of every uncollapsed cell, row-major.
    pub fn open_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.selected.is_none())
            .map(move |(index, _)| (index % self.width, index / self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_fully_open() {
        let grid = GridState::new(3, 2, 4, 1);
        assert_eq!(grid.valid_tile_count(0, 0), 4);
        assert_eq!(grid.valid_pair_count(2, 1), 4);
        assert!(!grid.is_collapsed(0, 0));
        assert!(!grid.is_complete());
        assert_eq!(grid.open_cells().count(), 6);
    }

    #[test]
    fn tile_and_pair_counts_diverge_with_rotations() {
        let mut grid = GridState::new(1, 1, 2, 4);
        assert_eq!(grid.valid_tile_count(0, 0), 2);
        assert_eq!(grid.valid_pair_count(0, 0), 8);

        // Removing three rotations of tile 0 leaves it a valid tile.
        grid.set_pair_valid(0, 0, 0, 0, false);
        grid.set_pair_valid(0, 0, 0, 1, false);
        grid.set_pair_valid(0, 0, 0, 2, false);
        assert_eq!(grid.valid_tile_count(0, 0), 2);
        assert_eq!(grid.valid_pair_count(0, 0), 5);

        grid.set_pair_valid(0, 0, 0, 3, false);
        assert_eq!(grid.valid_tile_count(0, 0), 1);
        assert_eq!(grid.valid_pair_count(0, 0), 4);
    }

    #[test]
    fn set_tile_valid_covers_all_rotations() {
        let mut grid = GridState::new(1, 1, 3, 4);
        grid.set_tile_valid(0, 0, 1, false);
        assert_eq!(grid.valid_pair_count(0, 0), 8);
        assert!(!grid.is_pair_valid(0, 0, 1, 2));
        assert!(grid.is_pair_valid(0, 0, 0, 2));

        grid.set_tile_valid(0, 0, 1, true);
        assert_eq!(grid.valid_pair_count(0, 0), 12);
    }

    #[test]
    fn nth_valid_pair_is_tile_major_rotation_minor() {
        let mut grid = GridState::new(1, 1, 3, 2);
        grid.set_pair_valid(0, 0, 0, 1, false);
        grid.set_pair_valid(0, 0, 1, 0, false);
        // Remaining order: (0,0), (1,1), (2,0), (2,1).
        assert_eq!(grid.nth_valid_pair(0, 0, 0), Some((0, 0)));
        assert_eq!(grid.nth_valid_pair(0, 0, 1), Some((1, 1)));
        assert_eq!(grid.nth_valid_pair(0, 0, 2), Some((2, 0)));
        assert_eq!(grid.nth_valid_pair(0, 0, 3), Some((2, 1)));
        assert_eq!(grid.nth_valid_pair(0, 0, 4), None);

        let pairs: Vec<_> = grid.valid_pairs(0, 0).collect();
        assert_eq!(pairs, vec![(0, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn collapse_records_selection_and_narrows_domain() {
        let mut grid = GridState::new(2, 1, 3, 4);
        grid.collapse_to(0, 0, 2, 1);
        assert!(grid.is_collapsed(0, 0));
        assert_eq!(grid.selected(0, 0), Some((2, 1)));
        assert_eq!(grid.valid_pair_count(0, 0), 1);
        assert!(grid.is_pair_valid(0, 0, 2, 1));
        assert!(!grid.is_pair_valid(0, 0, 2, 0));
        assert!(!grid.is_complete());

        grid.collapse_to(1, 0, 0, 0);
        assert!(grid.is_complete());
        assert_eq!(grid.open_cells().count(), 0);
    }

    #[test]
    fn out_of_bounds_access_fails_closed() {
        let mut grid = GridState::new(2, 2, 2, 1);
        assert_eq!(grid.valid_pair_count(5, 0), 0);
        assert_eq!(grid.valid_tile_count(0, 5), 0);
        assert!(!grid.is_pair_valid(5, 5, 0, 0));
        assert_eq!(grid.nth_valid_pair(5, 5, 0), None);
        grid.set_pair_valid(5, 5, 0, 0, false);
        grid.collapse_to(5, 5, 0, 0);
        assert!(!grid.is_collapsed(5, 5));
    }

    #[test]
    fn out_of_range_tiles_and_rotations_are_ignored() {
        let mut grid = GridState::new(1, 1, 2, 2);
        grid.set_pair_valid(0, 0, 9, 0, false);
        grid.set_pair_valid(0, 0, 0, 9, false);
        grid.collapse_to(0, 0, 9, 0);
        assert_eq!(grid.valid_pair_count(0, 0), 4);
        assert!(!grid.is_collapsed(0, 0));
        assert!(!grid.is_pair_valid(0, 0, 9, 0));
    }
}
