//! Turning a solved grid into instance activations on a host.
//!
//! The solver itself never spawns anything. Once a solve succeeds, the
//! result is walked in collapse order and one activation request per cell is
//! handed to an [`InstanceHost`]. Hosts that pool instances can hand back the
//! same handles across runs; a host that declines a request only costs a
//! warning, never the solve.

use crate::runner::SolvedGrid;
use log::warn;
use tileweave_tiles::{TileId, TileSet};

/// World-space placement for one tile instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    pub location: [f32; 3],
    pub yaw_degrees: f32,
}

/// One activation request: which tile variant goes where.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub tile: TileId,
    pub tile_name: String,
    pub rotation: usize,
    pub cell: (usize, usize),
    pub transform: GridTransform,
}

/// Opaque host-side identifier for an activated instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub u64);

/// Receiver for activation requests. Implemented by whatever owns the actual
/// scene objects: an engine bridge, a renderer, or a test double.
pub trait InstanceHost {
    /// Activates an instance for the request. `None` means the host could
    /// not satisfy it; the solver logs and moves on.
    fn activate(&mut self, request: &SpawnRequest) -> Option<InstanceHandle>;

    /// Releases a previously activated instance.
    fn deactivate(&mut self, handle: InstanceHandle);
}

/// Computes the world transform for a cell: grid position scaled by spacing,
/// offset by the origin, with yaw from the rotation in 90-degree steps.
pub fn cell_transform(
    origin: [f32; 3],
    spacing: f32,
    x: usize,
    y: usize,
    rotation: usize,
) -> GridTransform {
    GridTransform {
        location: [
            origin[0] + x as f32 * spacing,
            origin[1] + y as f32 * spacing,
            origin[2],
        ],
        yaw_degrees: (rotation % 4) as f32 * 90.0,
    }
}

/// Emits one activation per cell, in the order the cells were collapsed.
///
/// Returns the handles of every successful activation. Declined requests are
/// logged at warn level and skipped.
pub fn materialize(
    solved: &SolvedGrid,
    tiles: &TileSet,
    origin: [f32; 3],
    spacing: f32,
    host: &mut dyn InstanceHost,
) -> Vec<InstanceHandle> {
    let mut handles = Vec::with_capacity(solved.collapse_order.len());
    for &(x, y) in &solved.collapse_order {
        let Some((tile, rotation)) = solved.cell(x, y) else {
            continue;
        };
        let tile_name = tiles
            .tile(tile)
            .map_or_else(String::new, |t| t.name.clone());
        let request = SpawnRequest {
            tile,
            tile_name,
            rotation,
            cell: (x, y),
            transform: cell_transform(origin, spacing, x, y, rotation),
        };
        match host.activate(&request) {
            Some(handle) => handles.push(handle),
            None => warn!(
                "host declined instance for tile {:?} at cell ({}, {})",
                request.tile_name, x, y
            ),
        }
    }
    handles
}
