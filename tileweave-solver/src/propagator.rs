//! Constraint propagation over the 4-neighborhood.
//!
//! After a cell's domain shrinks, neighboring cells may hold pairs that no
//! longer have any supporting pair next door. Propagation removes those in a
//! breadth-first wave until the grid is arc-consistent again or a cell runs
//! out of possibilities.

use crate::grid::GridState;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use tileweave_tiles::{Direction, TileId, TileSet};

/// Raised when propagation empties a cell's domain.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("contradiction at cell ({x}, {y}): no valid possibilities remain")]
pub struct Contradiction {
    pub x: usize,
    pub y: usize,
}

/// Breadth-first arc-consistency propagator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Propagator;

impl Propagator {
    pub const fn new() -> Self {
        Self
    }

    /// Propagates the consequences of a domain change at `start`.
    ///
    /// Returns the coordinates of every other cell whose domain shrank, in
    /// the order each cell first changed, so the caller can refresh its
    /// entropy bookkeeping. The order is stable for identical inputs; the
    /// runner's seeded reproducibility depends on that.
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction`] as soon as any cell's domain becomes empty.
    /// The grid is left in its partially propagated state; callers recover
    /// by restoring a snapshot or injecting a fallback tile.
    pub fn propagate(
        &self,
        grid: &mut GridState,
        tiles: &TileSet,
        start: (usize, usize),
    ) -> Result<Vec<(usize, usize)>, Contradiction> {
        let mut worklist = VecDeque::new();
        let mut queued = HashSet::new();
        worklist.push_back(start);
        queued.insert(start);

        let mut changed: Vec<(usize, usize)> = Vec::new();
        let mut seen = HashSet::new();

        while let Some((x, y)) = worklist.pop_front() {
            queued.remove(&(x, y));
            for direction in Direction::ALL {
                let (dx, dy) = direction.delta();
                let Some(nx) = x.checked_add_signed(dx as isize) else {
                    continue;
                };
                let Some(ny) = y.checked_add_signed(dy as isize) else {
                    continue;
                };
                if !grid.in_bounds(nx, ny) {
                    continue;
                }

                if !self.constrain(grid, tiles, (x, y), (nx, ny), direction) {
                    continue;
                }
                if grid.valid_pair_count(nx, ny) == 0 {
                    return Err(Contradiction { x: nx, y: ny });
                }
                if (nx, ny) != start && seen.insert((nx, ny)) {
                    changed.push((nx, ny));
                }
                if queued.insert((nx, ny)) {
                    worklist.push_back((nx, ny));
                }
            }
        }

        Ok(changed)
    }

    /// Removes every pair at `target` with no supporting pair at `source`.
    /// `direction` points from source to target. Returns `true` when
    /// anything was removed.
    fn constrain(
        &self,
        grid: &mut GridState,
        tiles: &TileSet,
        source: (usize, usize),
        target: (usize, usize),
        direction: Direction,
    ) -> bool {
        let source_pairs: Vec<(usize, usize)> =
            grid.valid_pairs(source.0, source.1).collect();
        let target_pairs: Vec<(usize, usize)> =
            grid.valid_pairs(target.0, target.1).collect();

        let mut removed = false;
        for (tile, rotation) in target_pairs {
            let supported = source_pairs.iter().any(|&(s_tile, s_rotation)| {
                tiles.compatible(
                    TileId(s_tile),
                    s_rotation,
                    TileId(tile),
                    rotation,
                    direction,
                )
            });
            if !supported {
                grid.set_pair_valid(target.0, target.1, tile, rotation, false);
                removed = true;
            }
        }
        removed
    }
}
