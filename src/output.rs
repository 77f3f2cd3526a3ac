//! Text rendering of solved grids.
//!
//! One glyph per cell, assigned by tile index, with a legend underneath.
//! Rotations are not rendered; the legend is enough to eyeball adjacency.

use std::fmt::Write;
use tileweave_solver::SolvedGrid;
use tileweave_tiles::{TileId, TileSet};

const GLYPHS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn glyph_for(index: usize) -> char {
    GLYPHS.get(index).copied().map_or('#', char::from)
}

/// Renders the grid as rows of glyphs followed by a glyph legend.
pub fn render(solved: &SolvedGrid, tiles: &TileSet) -> String {
    let mut out = String::new();
    for y in 0..solved.height() {
        for x in 0..solved.width() {
            let glyph = solved
                .cell(x, y)
                .map_or('?', |(tile, _)| glyph_for(tile.0));
            out.push(glyph);
        }
        out.push('\n');
    }

    out.push('\n');
    for index in 0..tiles.num_tiles() {
        if let Some(tile) = tiles.tile(TileId(index)) {
            let _ = writeln!(out, "{} = {}", glyph_for(index), tile.name);
        }
    }
    out
}
