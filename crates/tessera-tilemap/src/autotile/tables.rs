//! Source rectangles of autotile sub-quads, in tile units relative to the
//! autotile's block in the atlas.
//!
//! Indexed by `pattern * quads_per_pattern + quad`. Patterns are the neighbour
//! configurations encoded into tile codes by the map producer.

use super::SrcRect;

const fn r(x: f32, y: f32, w: f32, h: f32) -> SrcRect {
    SrcRect { x, y, w, h }
}

/// Ground autotiles: 48 patterns of 4 quarter-tiles.
pub static REGULAR: [SrcRect; 192] = [
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(0.0, 0.0, 0.5, 0.5), r(0.5, 0.0, 0.5, 0.5), r(0.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.5, 0.5),
];

/// Raised-table autotiles: 48 patterns of 6 quads (4 top quarters, 2 front legs).
pub static TABLE: [SrcRect; 288] = [
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(0.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(1.5, 0.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(0.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.0, 0.0),
    r(1.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(0.5, 2.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.0, 0.0), r(0.5, 0.5, 0.0, 0.0),
    r(0.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(0.5, 2.5, 0.5, 0.5),
    r(0.0, 2.0, 0.5, 0.5), r(1.5, 2.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(1.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(0.0, 2.5, 0.5, 0.5), r(1.5, 2.5, 0.5, 0.5),
    r(0.0, 0.0, 0.5, 0.5), r(0.5, 0.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5), r(0.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.5, 0.5),
];

/// Wall autotiles: 16 patterns of 4 quarter-tiles.
pub static WALL: [SrcRect; 64] = [
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(0.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 0.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.5, 0.5),
    r(0.0, 0.0, 0.5, 0.5), r(0.5, 0.0, 0.5, 0.5), r(0.0, 0.5, 0.5, 0.5), r(0.5, 0.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(0.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(0.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(0.0, 0.5, 0.5, 0.5), r(1.5, 0.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(0.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(0.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(0.0, 0.0, 0.5, 0.5), r(0.5, 0.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(0.5, 1.5, 0.5, 0.5),
    r(1.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(0.0, 1.0, 0.5, 0.5), r(1.5, 1.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(1.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(1.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
    r(0.0, 0.0, 0.5, 0.5), r(1.5, 0.0, 0.5, 0.5), r(0.0, 1.5, 0.5, 0.5), r(1.5, 1.5, 0.5, 0.5),
];

/// Waterfalls: 4 patterns of 2 half-width strips.
pub static WATERFALL: [SrcRect; 8] = [
    r(1.0, 0.0, 0.5, 1.0), r(0.5, 0.0, 0.5, 1.0),
    r(0.0, 0.0, 0.5, 1.0), r(0.5, 0.0, 0.5, 1.0),
    r(1.0, 0.0, 0.5, 1.0), r(1.5, 0.0, 0.5, 1.0),
    r(0.0, 0.0, 0.5, 1.0), r(1.5, 0.0, 0.5, 1.0),
];
