//! Entropy-guided constraint solver for tile grids.
//!
//! The solver fills a rectangular grid with tiles from a
//! [`tileweave_tiles::TileSet`] so that every pair of neighbors satisfies
//! the set's adjacency rules. Cells are decided most-constrained-first, each
//! decision is propagated through the 4-neighborhood, and contradictions
//! are handled by snapshot backtracking, fallback injection, and bounded
//! retry, in that order.
//!
//! ```no_run
//! use tileweave_solver::{Solver, SolverConfig};
//! use tileweave_tiles::load_from_file;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tiles = load_from_file("rules.ron".as_ref())?;
//! let config = SolverConfig::builder().dimensions(16, 16).seed(42).build();
//! let solved = Solver::new(config)?.solve(&tiles)?;
//! println!("first cell: {:?}", solved.cell(0, 0));
//! # Ok(())
//! # }
//! ```

pub mod grid;
pub mod materialize;
pub mod propagator;
pub mod queue;
pub mod runner;

pub use grid::GridState;
pub use materialize::{
    cell_transform, materialize, GridTransform, InstanceHandle, InstanceHost, SpawnRequest,
};
pub use propagator::{Contradiction, Propagator};
pub use queue::UniqueHeap;
pub use runner::{SolvedGrid, Solver, SolverConfig, SolverConfigBuilder, SolverError};
