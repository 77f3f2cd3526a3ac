//! The solve loop: entropy-guided collapse, propagation, backtracking, and
//! bounded retry.
//!
//! A solve is a sequence of attempts. Each attempt reseeds its own RNG,
//! starts from a fully open grid, and repeatedly collapses the most
//! constrained open cell until the grid completes or a contradiction
//! survives every recovery path. Recovery runs in order: restore a snapshot
//! and exclude the choice that led here, then inject a fallback tile, then
//! give the attempt up and retry with a shifted seed.

use crate::grid::GridState;
use crate::materialize::{materialize, InstanceHandle, InstanceHost};
use crate::propagator::{Contradiction, Propagator};
use crate::queue::UniqueHeap;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;
use tileweave_tiles::{Direction, TileId, TileSet};

/// Errors surfaced by [`Solver::solve`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The configuration cannot produce a solve.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Every attempt ended in an unrecoverable contradiction or ran out of
    /// its iteration budget.
    #[error("generation failed after {0} attempts")]
    RetriesExhausted(u32),
    /// A solver invariant broke. Indicates a bug, not bad input.
    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Tuning knobs for a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub width: usize,
    pub height: usize,
    pub spacing: f32,
    pub origin: [f32; 3],
    pub seed: u64,
    pub max_iterations: u32,
    pub max_retries: u32,
    pub backtracking: bool,
    pub max_backtrack_steps: usize,
    pub allow_fallback: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            spacing: 100.0,
            origin: [0.0; 3],
            seed: 12345,
            max_iterations: 1000,
            max_retries: 5,
            backtracking: true,
            max_backtrack_steps: 10,
            allow_fallback: true,
        }
    }
}

impl SolverConfig {
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::default()
    }

    fn validate(&self) -> Result<(), SolverError> {
        if self.width == 0 || self.height == 0 {
            return Err(SolverError::Configuration(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.spacing <= 0.0 {
            return Err(SolverError::Configuration(format!(
                "spacing must be positive, got {}",
                self.spacing
            )));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::Configuration(
                "max_iterations must be positive".to_owned(),
            ));
        }
        if self.max_retries == 0 {
            return Err(SolverError::Configuration(
                "max_retries must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`SolverConfig`]; unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct SolverConfigBuilder {
    config: SolverConfig,
}

impl SolverConfigBuilder {
    #[must_use]
    pub const fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    #[must_use]
    pub const fn spacing(mut self, spacing: f32) -> Self {
        self.config.spacing = spacing;
        self
    }

    #[must_use]
    pub const fn origin(mut self, origin: [f32; 3]) -> Self {
        self.config.origin = origin;
        self
    }

    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    #[must_use]
    pub const fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn backtracking(mut self, enabled: bool) -> Self {
        self.config.backtracking = enabled;
        self
    }

    #[must_use]
    pub const fn max_backtrack_steps(mut self, steps: usize) -> Self {
        self.config.max_backtrack_steps = steps;
        self
    }

    #[must_use]
    pub const fn allow_fallback(mut self, enabled: bool) -> Self {
        self.config.allow_fallback = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> SolverConfig {
        self.config
    }
}

/// A fully collapsed grid: one (tile, rotation) per cell plus the order the
/// cells were decided in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedGrid {
    width: usize,
    height: usize,
    cells: Vec<(TileId, usize)>,
    pub collapse_order: Vec<(usize, usize)>,
}

impl SolvedGrid {
    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// The (tile, rotation) at a cell, or `None` out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> Option<(TileId, usize)> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x).copied()
        } else {
            None
        }
    }
}

/// Grid state captured before a collapse, so the collapse can be undone and
/// its choice excluded.
#[derive(Debug, Clone)]
struct Snapshot {
    grid: GridState,
    collapse_order: Vec<(usize, usize)>,
    at: (usize, usize),
    chosen: (usize, usize),
}

enum AttemptError {
    Contradiction,
    IterationBudget,
    Internal(String),
}

/// Entropy-guided grid solver.
#[derive(Debug, Clone)]
pub struct Solver {
    config: SolverConfig,
    propagator: Propagator,
}

impl Solver {
    /// Creates a solver for the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Configuration`] for zero dimensions or zero
    /// iteration/retry budgets.
    pub fn new(config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Self {
            config,
            propagator: Propagator::new(),
        })
    }

    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs attempts until one completes or the retry budget is spent.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::RetriesExhausted`] when every attempt failed,
    /// or [`SolverError::Internal`] if a solver invariant broke.
    pub fn solve(&self, tiles: &TileSet) -> Result<SolvedGrid, SolverError> {
        for attempt in 0..self.config.max_retries {
            let seed = self.config.seed.wrapping_add(u64::from(attempt) * 1000);
            info!(
                "attempt {}/{} with seed {}",
                attempt + 1,
                self.config.max_retries,
                seed
            );
            let mut rng = StdRng::seed_from_u64(seed);
            match self.attempt(tiles, &mut rng) {
                Ok(solved) => {
                    info!(
                        "grid solved on attempt {} ({} cells)",
                        attempt + 1,
                        solved.collapse_order.len()
                    );
                    return Ok(solved);
                }
                Err(AttemptError::Contradiction) => {
                    warn!("attempt {} hit an unrecoverable contradiction", attempt + 1);
                }
                Err(AttemptError::IterationBudget) => {
                    warn!(
                        "attempt {} exceeded {} iterations",
                        attempt + 1,
                        self.config.max_iterations
                    );
                }
                Err(AttemptError::Internal(message)) => {
                    return Err(SolverError::Internal(message));
                }
            }
        }
        Err(SolverError::RetriesExhausted(self.config.max_retries))
    }

    /// Like [`Self::solve`], then activates one instance per cell on the
    /// host in collapse order.
    ///
    /// # Errors
    ///
    /// The errors of [`Self::solve`]. Host activation failures are logged,
    /// never returned.
    pub fn solve_and_materialize(
        &self,
        tiles: &TileSet,
        host: &mut dyn InstanceHost,
    ) -> Result<(SolvedGrid, Vec<InstanceHandle>), SolverError> {
        let solved = self.solve(tiles)?;
        let handles = materialize(
            &solved,
            tiles,
            self.config.origin,
            self.config.spacing,
            host,
        );
        Ok((solved, handles))
    }

    fn attempt(&self, tiles: &TileSet, rng: &mut StdRng) -> Result<SolvedGrid, AttemptError> {
        let mut grid = GridState::new(
            self.config.width,
            self.config.height,
            tiles.num_tiles(),
            tiles.rotations(),
        );
        let mut queue = UniqueHeap::new();
        rebuild_queue(&mut queue, &grid);

        let mut collapse_order: Vec<(usize, usize)> = Vec::new();
        let mut snapshots: VecDeque<Snapshot> = VecDeque::new();
        let mut iterations = 0u32;

        while !grid.is_complete() {
            iterations += 1;
            if iterations > self.config.max_iterations {
                return Err(AttemptError::IterationBudget);
            }

            let Some((x, y)) = select_open_cell(&mut queue, &grid, rng) else {
                return Err(AttemptError::Internal(
                    "open cells remain but the queue is empty".to_owned(),
                ));
            };

            let Some((tile, rotation)) = draw_weighted_pair(&grid, tiles, (x, y), rng) else {
                // Empty domain on an open cell; propagation normally catches
                // this earlier, so recover the same way.
                if !self.recover(
                    &mut grid,
                    &mut queue,
                    &mut collapse_order,
                    &mut snapshots,
                    tiles,
                    (x, y),
                )? {
                    return Err(AttemptError::Contradiction);
                }
                continue;
            };

            if self.config.backtracking {
                snapshots.push_back(Snapshot {
                    grid: grid.clone(),
                    collapse_order: collapse_order.clone(),
                    at: (x, y),
                    chosen: (tile, rotation),
                });
                if snapshots.len() > self.config.max_backtrack_steps {
                    snapshots.pop_front();
                }
            }

            grid.collapse_to(x, y, tile, rotation);
            collapse_order.push((x, y));

            match self.propagator.propagate(&mut grid, tiles, (x, y)) {
                Ok(changed) => {
                    for (cx, cy) in changed {
                        if !grid.is_collapsed(cx, cy) {
                            queue.enqueue((cx, cy), grid.valid_pair_count(cx, cy));
                        }
                    }
                }
                Err(Contradiction { x: cx, y: cy }) => {
                    debug!("contradiction at ({cx}, {cy})");
                    if !self.recover(
                        &mut grid,
                        &mut queue,
                        &mut collapse_order,
                        &mut snapshots,
                        tiles,
                        (cx, cy),
                    )? {
                        return Err(AttemptError::Contradiction);
                    }
                }
            }
        }

        finish(&grid, collapse_order)
    }

    /// Contradiction recovery chain: backtrack, then fallback, then report
    /// failure with `Ok(false)`.
    fn recover(
        &self,
        grid: &mut GridState,
        queue: &mut UniqueHeap<(usize, usize), usize>,
        collapse_order: &mut Vec<(usize, usize)>,
        snapshots: &mut VecDeque<Snapshot>,
        tiles: &TileSet,
        contradiction: (usize, usize),
    ) -> Result<bool, AttemptError> {
        while let Some(snapshot) = snapshots.pop_back() {
            *grid = snapshot.grid;
            *collapse_order = snapshot.collapse_order;
            let (x, y) = snapshot.at;
            let (tile, rotation) = snapshot.chosen;
            grid.set_pair_valid(x, y, tile, rotation, false);
            if grid.valid_pair_count(x, y) > 0 {
                debug!(
                    "backtracked to ({x}, {y}), excluded tile {tile} rotation {rotation}"
                );
                rebuild_queue(queue, grid);
                return Ok(true);
            }
            // Excluding the choice emptied the cell; unwind further.
        }

        if self.config.allow_fallback {
            let (x, y) = contradiction;
            let fallback = fallback_tile(grid, x, y);
            debug!("injecting fallback tile {} at ({x}, {y})", fallback.0);
            // Propagation can also empty a cell that was already collapsed
            // (the reverse arc of an asymmetric rule). Replace its selection
            // without listing the cell in the collapse order twice.
            let already_collapsed = grid.is_collapsed(x, y);
            grid.collapse_to(x, y, fallback.0, 0);
            if !already_collapsed {
                collapse_order.push((x, y));
            }
            rebuild_queue(queue, grid);
            return Ok(true);
        }

        Ok(false)
    }
}

fn rebuild_queue(queue: &mut UniqueHeap<(usize, usize), usize>, grid: &GridState) {
    queue.clear();
    for (x, y) in grid.open_cells() {
        queue.enqueue((x, y), grid.valid_pair_count(x, y));
    }
}

/// Dequeues the lowest-entropy open cell, breaking ties uniformly at random
/// among every queued cell at the minimum. Unchosen ties go back in.
fn select_open_cell(
    queue: &mut UniqueHeap<(usize, usize), usize>,
    grid: &GridState,
    rng: &mut StdRng,
) -> Option<(usize, usize)> {
    let (first, entropy) = loop {
        let (cell, entropy) = queue.dequeue()?;
        if !grid.is_collapsed(cell.0, cell.1) {
            break (cell, entropy);
        }
        // Stale entry for an already collapsed cell.
    };

    let mut ties = vec![first];
    while let Some((_, &priority)) = queue.peek() {
        if priority != entropy {
            break;
        }
        let Some((cell, _)) = queue.dequeue() else {
            break;
        };
        if !grid.is_collapsed(cell.0, cell.1) {
            ties.push(cell);
        }
    }

    // The heap's internal layout is not part of the reproducibility
    // contract; fix the tie order before drawing from it.
    ties.sort_unstable();
    let pick = rng.gen_range(0..ties.len());
    let chosen = ties.swap_remove(pick);
    for other in ties {
        queue.enqueue(other, entropy);
    }
    Some(chosen)
}

/// Draws a (tile, rotation) pair from the cell's domain, weighted by tile
/// weight. Returns `None` on an empty domain.
fn draw_weighted_pair(
    grid: &GridState,
    tiles: &TileSet,
    cell: (usize, usize),
    rng: &mut StdRng,
) -> Option<(usize, usize)> {
    let pairs: Vec<(usize, usize)> = grid.valid_pairs(cell.0, cell.1).collect();
    if pairs.is_empty() {
        return None;
    }
    let weights: Vec<f32> = pairs
        .iter()
        .map(|&(tile, _)| tiles.weight(TileId(tile)).unwrap_or(0.0))
        .collect();
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let roll = rng.gen_range(0.0..total);
    Some(pairs[pick_weighted_index(roll, &weights)])
}

/// The first index whose cumulative weight reaches the roll. The boundary is
/// inclusive: a roll exactly on a cumulative sum selects that index.
pub(crate) fn pick_weighted_index(roll: f32, weights: &[f32]) -> usize {
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if roll <= cumulative {
            return index;
        }
    }
    weights.len().saturating_sub(1)
}

/// The most common tile among collapsed neighbors, lowest tile index on a
/// tie. Falls back to tile 0 when no neighbor is collapsed yet.
fn fallback_tile(grid: &GridState, x: usize, y: usize) -> TileId {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for direction in Direction::ALL {
        let (dx, dy) = direction.delta();
        let Some(nx) = x.checked_add_signed(dx as isize) else {
            continue;
        };
        let Some(ny) = y.checked_add_signed(dy as isize) else {
            continue;
        };
        if let Some((tile, _)) = grid.selected(nx, ny) {
            *counts.entry(tile).or_insert(0) += 1;
        }
    }

    let mut best = 0;
    let mut best_count = 0;
    for tile in 0..grid.num_tiles() {
        let count = counts.get(&tile).copied().unwrap_or(0);
        if count > best_count {
            best = tile;
            best_count = count;
        }
    }
    TileId(best)
}

fn finish(
    grid: &GridState,
    collapse_order: Vec<(usize, usize)>,
) -> Result<SolvedGrid, AttemptError> {
    let mut cells = Vec::with_capacity(grid.width() * grid.height());
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let Some((tile, rotation)) = grid.selected(x, y) else {
                return Err(AttemptError::Internal(format!(
                    "cell ({x}, {y}) is uncollapsed in a complete grid"
                )));
            };
            cells.push((TileId(tile), rotation));
        }
    }
    Ok(SolvedGrid {
        width: grid.width(),
        height: grid.height(),
        cells,
        collapse_order,
    })
}
