//! Tile code decoding.
//!
//! A tile code selects one of six tile families by range. Autotile codes also carry
//! the neighbour pattern, precomputed by whoever produced the map, so decoding never
//! looks at adjacent cells except for the table occlusion test.
//!
//! Decoding is split in two steps: [`decode`] turns a code into a [`TileShape`] (pure
//! integer data, in atlas tile units), and [`TileGeometry::emit`] turns a shape into
//! textured quads in pixels.

mod tables;

use std::ops::Range;

use tessera_engine::coords::{Rect, Vec2i};

pub use tables::{REGULAR, TABLE, WALL, WATERFALL};

/// Source rectangle in tile units, relative to an autotile block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SrcRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TileFamily {
    /// Plain tiles from sheets B to E.
    Bcde,
    /// Plain tiles from sheet A5.
    A5,
    /// Animated water, including waterfalls.
    A1,
    /// Ground autotiles, including raised tables.
    A2,
    /// Building walls and roofs.
    A3,
    /// Wall tops and wall faces.
    A4,
}

impl TileFamily {
    pub const ALL: [TileFamily; 6] = [
        TileFamily::Bcde,
        TileFamily::A5,
        TileFamily::A1,
        TileFamily::A2,
        TileFamily::A3,
        TileFamily::A4,
    ];

    /// Code range owned by the family.
    pub fn codes(self) -> Range<i16> {
        match self {
            TileFamily::Bcde => 0x0000..0x0400,
            TileFamily::A5 => 0x0600..0x0680,
            TileFamily::A1 => 0x0800..0x0B00,
            TileFamily::A2 => 0x0B00..0x1100,
            TileFamily::A3 => 0x1100..0x1700,
            TileFamily::A4 => 0x1700..0x2000,
        }
    }

    /// Family of `code`, or `None` for codes outside every range.
    pub fn classify(code: i16) -> Option<TileFamily> {
        Self::ALL.into_iter().find(|family| family.codes().contains(&code))
    }
}

/// Which sub-rectangle table an autotile reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AutotileKind {
    /// 4 quarter-tiles out of [`REGULAR`].
    Regular,
    /// 4 quarter-tiles out of [`WALL`].
    Wall,
    /// 6 sub-quads out of [`TABLE`], the last two being the table legs.
    Table,
}

impl AutotileKind {
    fn table(self) -> (&'static [SrcRect], usize) {
        match self {
            AutotileKind::Regular => (&REGULAR, 4),
            AutotileKind::Wall => (&WALL, 4),
            AutotileKind::Table => (&TABLE, 6),
        }
    }
}

/// Decoded tile, positioned in atlas tile units.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TileShape {
    /// One full atlas cell.
    Single { cell: Vec2i },
    Autotile { kind: AutotileKind, pattern: usize, block: Vec2i },
    /// Two tall half-width strips.
    Waterfall { pattern: usize, block: Vec2i },
}

const A1_BLOCKS: [Option<(i32, i32)>; 16] = [
    Some((0, 0)),
    Some((0, 3)),
    Some((12, 0)),
    Some((12, 3)),
    Some((6, 0)),
    None,
    Some((6, 3)),
    None,
    Some((0, 6)),
    None,
    Some((0, 9)),
    None,
    Some((6, 6)),
    None,
    Some((6, 9)),
    None,
];

/// Waterfall blocks for A1 autotiles 5, 7, .., 15.
const A1_WATERFALL_BLOCKS: [(i32, i32); 6] = [(14, 0), (14, 3), (12, 6), (12, 9), (14, 6), (14, 9)];

/// Row offsets of the six A4 block rows; even rows are wall tops, odd rows faces.
const A4_ROWS: [i32; 6] = [0, 3, 5, 8, 10, 13];

const PATTERNS_PER_AUTOTILE: i32 = 0x30;

/// Decodes `code`. `is_table` only matters for A2 codes.
///
/// Returns `None` for codes outside every family and for pattern indices the family
/// has no geometry for.
pub fn decode(code: i16, is_table: bool) -> Option<TileShape> {
    let family = TileFamily::classify(code)?;
    let t = i32::from(code - family.codes().start);
    let pattern = (t % PATTERNS_PER_AUTOTILE) as usize;
    let autotile = t / PATTERNS_PER_AUTOTILE;

    let shape = match family {
        TileFamily::Bcde => {
            let mut x = t % 8 + (t / 128 % 2) * 8;
            let mut y = t / 8 % 16 + (t / 128 / 2) * 16;
            if y >= 48 {
                y -= 32;
                x += 16;
            } else if y >= 32 {
                y -= 16;
            } else if y >= 16 {
                y -= 16;
                x += 16;
            }
            TileShape::Single { cell: Vec2i::new(32 + x, y) }
        }
        TileFamily::A5 => {
            let (mut x, mut y) = (t % 8, t / 8);
            if y >= 8 {
                y -= 8;
                x += 8;
            }
            TileShape::Single { cell: Vec2i::new(x, 20 + y) }
        }
        TileFamily::A1 => match A1_BLOCKS[autotile as usize] {
            Some((x, y)) => TileShape::Autotile {
                kind: AutotileKind::Regular,
                pattern,
                block: Vec2i::new(x, y),
            },
            None => {
                if pattern > 3 {
                    return None;
                }
                let (x, y) = A1_WATERFALL_BLOCKS[((autotile - 5) / 2) as usize];
                TileShape::Waterfall { pattern, block: Vec2i::new(x, y) }
            }
        },
        TileFamily::A2 => TileShape::Autotile {
            kind: if is_table { AutotileKind::Table } else { AutotileKind::Regular },
            pattern,
            block: Vec2i::new(16 + (autotile % 8) * 2, (autotile / 8) * 3),
        },
        TileFamily::A3 => {
            if pattern >= 16 {
                return None;
            }
            TileShape::Autotile {
                kind: AutotileKind::Wall,
                pattern,
                block: Vec2i::new((autotile % 8) * 2, 12 + (autotile / 8) * 2),
            }
        }
        TileFamily::A4 => {
            let row = (autotile / 8) as usize;
            let kind = if row % 2 == 0 { AutotileKind::Regular } else { AutotileKind::Wall };
            if kind == AutotileKind::Wall && pattern >= 16 {
                return None;
            }
            TileShape::Autotile {
                kind,
                pattern,
                block: Vec2i::new(16 + (autotile % 8) * 2, 12 + A4_ROWS[row]),
            }
        }
    };
    Some(shape)
}

/// Whether `code` is an A2 table autotile under the old numeric convention: the
/// eighth autotile of each A2 row. Best-effort; newer formats use a flag bit.
pub fn table_by_code(code: i16) -> bool {
    (i32::from(code) - 0x0B00).rem_euclid(8 * PATTERNS_PER_AUTOTILE) >= 7 * PATTERNS_PER_AUTOTILE
}

/// Whether `code` is a wall-type tile that hides the legs of a table above it.
pub fn hides_table_legs(code: i16) -> bool {
    TileFamily::A4.codes().contains(&code)
}

/// One textured quad: atlas pixels to cell-local target pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileQuad {
    pub tex: Rect,
    pub pos: Rect,
}

/// Turns shapes into pixel geometry for one tile size.
#[derive(Debug, Copy, Clone)]
pub struct TileGeometry {
    ts: f32,
}

impl TileGeometry {
    pub fn new(tile_size: u32) -> Self {
        Self { ts: tile_size as f32 }
    }

    /// Appends the quads of `shape` drawn at cell (`x`, `y`).
    ///
    /// `occluded` cuts the legs of a table standing on a wall.
    pub fn emit(&self, shape: TileShape, x: i32, y: i32, occluded: bool, out: &mut Vec<TileQuad>) {
        match shape {
            TileShape::Single { cell } => out.push(self.single(cell, x, y)),
            TileShape::Autotile { kind: AutotileKind::Table, pattern, block } => {
                self.table(pattern, block, x, y, occluded, out)
            }
            TileShape::Autotile { kind, pattern, block } => self.quarters(kind, pattern, block, x, y, out),
            TileShape::Waterfall { pattern, block } => self.waterfall(pattern, block, x, y, out),
        }
    }

    /// Full-cell quad sampling atlas cell `cell`, inset by half a texel.
    pub fn single(&self, cell: Vec2i, x: i32, y: i32) -> TileQuad {
        let ts = self.ts;
        TileQuad {
            tex: Rect::new(cell.x as f32 * ts + 0.5, cell.y as f32 * ts + 0.5, ts - 1.0, ts - 1.0),
            pos: self.cell(x, y),
        }
    }

    fn cell(&self, x: i32, y: i32) -> Rect {
        Rect::new(x as f32 * self.ts, y as f32 * self.ts, self.ts, self.ts)
    }

    fn source(&self, src: SrcRect, block: Vec2i) -> Rect {
        let ts = self.ts;
        Rect::new(
            src.x * ts + 0.5 + block.x as f32 * ts,
            src.y * ts + 0.5 + block.y as f32 * ts,
            src.w * ts - 1.0,
            src.h * ts - 1.0,
        )
    }

    /// Offset of sub-quad `i` inside its cell (TL, TR, BL, BR, then the two legs).
    fn subpos(&self, i: usize) -> (f32, f32) {
        let half = self.ts / 2.0;
        match i {
            1 => (half, 0.0),
            2 => (0.0, half),
            3 => (half, half),
            4 => (0.0, self.ts * 0.75),
            5 => (half, self.ts * 0.75),
            _ => (0.0, 0.0),
        }
    }

    fn quarters(&self, kind: AutotileKind, pattern: usize, block: Vec2i, x: i32, y: i32, out: &mut Vec<TileQuad>) {
        let (rects, per) = kind.table();
        let half = self.ts / 2.0;
        for i in 0..per {
            let (dx, dy) = self.subpos(i);
            out.push(TileQuad {
                tex: self.source(rects[pattern * per + i], block),
                pos: Rect::new(x as f32 * self.ts + dx, y as f32 * self.ts + dy, half, half),
            });
        }
    }

    fn table(&self, pattern: usize, block: Vec2i, x: i32, y: i32, occluded: bool, out: &mut Vec<TileQuad>) {
        let (rects, per) = AutotileKind::Table.table();
        let leg = self.ts * 0.25;
        for i in 0..per {
            let src = rects[pattern * per + i];
            let mut tex = self.source(src, block);
            tex.size.x = tex.size.x.max(0.0);
            tex.size.y = tex.size.y.max(0.0);

            let (dx, dy) = self.subpos(i);
            let mut pos = Rect::new(
                x as f32 * self.ts + dx,
                y as f32 * self.ts + dy,
                src.w * self.ts,
                src.h * self.ts,
            );
            if occluded && i >= 4 {
                tex.size.y -= leg;
                pos.size.y -= leg;
            }
            out.push(TileQuad { tex, pos });
        }
    }

    fn waterfall(&self, pattern: usize, block: Vec2i, x: i32, y: i32, out: &mut Vec<TileQuad>) {
        let half = self.ts / 2.0;
        for i in 0..2 {
            out.push(TileQuad {
                tex: self.source(WATERFALL[pattern * 2 + i], block),
                pos: Rect::new(x as f32 * self.ts + i as f32 * half, y as f32 * self.ts, half, self.ts),
            });
        }
    }
}
