//! Vertex batch construction.
//!
//! Walks the visible window layer by layer and turns every tile code into quads,
//! split into the ground batch (drawn below characters) and the above batch. The
//! output depends only on the inputs, so a rebuild with unchanged data reproduces
//! the previous batches exactly.

use tessera_engine::coords::{IRect, Vec2i};
use tessera_engine::gpu::Vertex;

use crate::atlas::SHADOW_ORIGIN;
use crate::autotile::{decode, hides_table_legs, table_by_code, TileGeometry, TileQuad};
use crate::config::{FormatVersion, OVER_PLAYER_FLAG, TABLE_FLAG};
use crate::table::TableGrid;

const WHITE: [f32; 4] = [1.0; 4];

/// Map layer holding shadow masks in its low four bits.
const SHADOW_LAYER: i32 = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BuildParams {
    /// Visible window, in tiles.
    pub window: IRect,
    pub tile_size: u32,
    pub version: FormatVersion,
}

/// Ground and above-player quads, four vertices each, positioned relative to the
/// window's top-left cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileBatches {
    pub ground: Vec<Vertex>,
    pub above: Vec<Vertex>,
}

impl TileBatches {
    pub fn ground_quads(&self) -> u32 {
        (self.ground.len() / 4) as u32
    }

    pub fn above_quads(&self) -> u32 {
        (self.above.len() / 4) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.ground.is_empty() && self.above.is_empty()
    }

    /// Both batches in one buffer, ground first.
    pub fn concatenated(&self) -> Vec<Vertex> {
        let mut all = Vec::with_capacity(self.ground.len() + self.above.len());
        all.extend_from_slice(&self.ground);
        all.extend_from_slice(&self.above);
        all
    }

    fn push(&mut self, quad: &TileQuad, above: bool) {
        let batch = if above { &mut self.above } else { &mut self.ground };
        batch.extend_from_slice(&Vertex::quad(quad.pos, quad.tex, WHITE));
    }
}

/// Window-relative cells in traversal order: bottom row first, left to right.
fn cells(window: IRect) -> impl Iterator<Item = Vec2i> {
    let IRect { width, height, .. } = window;
    (0..height.max(0)).rev().flat_map(move |y| (0..width.max(0)).map(move |x| Vec2i::new(x, y)))
}

struct Builder<'a> {
    map: &'a TableGrid,
    flags: Option<&'a TableGrid>,
    params: &'a BuildParams,
    geometry: TileGeometry,
    scratch: Vec<TileQuad>,
    out: TileBatches,
}

impl Builder<'_> {
    fn flag(&self, code: i16) -> i16 {
        match (self.flags, usize::try_from(code)) {
            (Some(flags), Ok(index)) => flags.get(index, 0, 0),
            _ => 0,
        }
    }

    fn map(&self, cell: Vec2i, z: i32) -> i16 {
        let origin = self.params.window.position();
        self.map.get_wrapped(origin.x + cell.x, origin.y + cell.y, z)
    }

    fn tile_layer(&mut self, z: i32) {
        for cell in cells(self.params.window) {
            let code = self.map(cell, z);
            if code <= 0 {
                continue;
            }
            let flag = self.flag(code);
            let above = flag & OVER_PLAYER_FLAG != 0 && z >= 2;
            let is_table = if self.params.version.has_table_flag() {
                flag & TABLE_FLAG != 0
            } else {
                table_by_code(code)
            };
            let Some(shape) = decode(code, is_table) else {
                log::trace!("TileBatches: dropping tile code {code:#06x}");
                continue;
            };
            let occluded = hides_table_legs(self.map(cell + Vec2i::new(0, 1), 0));

            self.scratch.clear();
            self.geometry.emit(shape, cell.x, cell.y, occluded, &mut self.scratch);
            for quad in &self.scratch {
                self.out.push(quad, above);
            }
        }
    }

    fn shadow_layer(&mut self) {
        for cell in cells(self.params.window) {
            let mask = self.map(cell, SHADOW_LAYER) & 0xF;
            if mask == 0 {
                continue;
            }
            let atlas_cell = SHADOW_ORIGIN + Vec2i::new(i32::from(mask), 0);
            let quad = self.geometry.single(atlas_cell, cell.x, cell.y);
            self.out.push(&quad, false);
        }
    }
}

/// Builds both batches for the visible window of `map`.
///
/// Layers 0 and 1 come first, then shadows (formats that have them), then layer 2,
/// so later layers paint over earlier ones within each batch.
pub fn build(map: &TableGrid, flags: Option<&TableGrid>, params: &BuildParams) -> TileBatches {
    let mut builder = Builder {
        map,
        flags,
        params,
        geometry: TileGeometry::new(params.tile_size),
        scratch: Vec::with_capacity(6),
        out: TileBatches::default(),
    };
    builder.tile_layer(0);
    builder.tile_layer(1);
    if params.version.has_shadows() {
        builder.shadow_layer();
    }
    builder.tile_layer(2);
    builder.out
}
