//! Tile atlas assembly.
//!
//! Every tile sheet is cut into blocks and copied into one texture of 64x32 cells, so
//! a whole map draws from a single texture. Placement is fixed; autotile decoding
//! relies on it.
//!
//! Layout, in cells:
//! - A1 water and waterfalls at (0, 0), 16x12
//! - A2 at (16, 0), A3 at (0, 12), A4 at (16, 12), A5 at (0, 20)
//! - B, C, D, E as 16x16 quadrants of the right half
//! - shadow set at (16, 27), 16x1

use image::{Rgba, RgbaImage};
use tessera_engine::coords::{IRect, Vec2i};
use tessera_engine::gpu::TextureId;
use tessera_engine::{RenderContext, RenderError};

use crate::config::FormatVersion;
use crate::sheets::{BitmapSet, TileSheet};

pub const ATLAS_COLUMNS: u32 = 64;
pub const ATLAS_ROWS: u32 = 32;

/// Cell where the 16 shadow masks start.
pub const SHADOW_ORIGIN: Vec2i = Vec2i::new(16, 27);

const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 0x80]);

/// One block copy, in cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Placement {
    pub sheet: TileSheet,
    pub src: IRect,
    pub dst: Vec2i,
}

const fn place(sheet: TileSheet, x: i32, y: i32, w: i32, h: i32, dx: i32, dy: i32) -> Placement {
    Placement { sheet, src: IRect::new(x, y, w, h), dst: Vec2i::new(dx, dy) }
}

pub static LAYOUT: [Placement; 15] = [
    // A1 animates horizontally in the sheet; the atlas keeps frames side by side.
    place(TileSheet::A1, 0, 0, 6, 6, 0, 0),
    place(TileSheet::A1, 8, 0, 6, 6, 6, 0),
    place(TileSheet::A1, 0, 6, 6, 6, 0, 6),
    place(TileSheet::A1, 8, 6, 6, 6, 6, 6),
    // Waterfall columns.
    place(TileSheet::A1, 6, 0, 2, 12, 12, 0),
    place(TileSheet::A1, 14, 0, 2, 12, 14, 0),
    place(TileSheet::A2, 0, 0, 16, 12, 16, 0),
    place(TileSheet::A3, 0, 0, 16, 8, 0, 12),
    place(TileSheet::A4, 0, 0, 16, 15, 16, 12),
    place(TileSheet::A5, 0, 0, 8, 8, 0, 20),
    place(TileSheet::A5, 0, 8, 8, 8, 8, 20),
    place(TileSheet::B, 0, 0, 16, 16, 32, 0),
    place(TileSheet::C, 0, 0, 16, 16, 48, 0),
    place(TileSheet::D, 0, 0, 16, 16, 32, 16),
    place(TileSheet::E, 0, 0, 16, 16, 48, 16),
];

/// Atlas size in pixels.
pub fn atlas_size(tile_size: u32) -> (u32, u32) {
    (ATLAS_COLUMNS * tile_size, ATLAS_ROWS * tile_size)
}

/// Sixteen cells of half-opacity black quarters, one per 4-bit corner mask.
///
/// Bit 0 shades the top-left quarter, bit 1 top-right, bit 2 bottom-left and bit 3
/// bottom-right.
pub fn shadow_set(tile_size: u32) -> RgbaImage {
    let half = tile_size / 2;
    let mut image = RgbaImage::new(16 * tile_size, tile_size);
    for mask in 0..16u32 {
        let quarters = [(0, 0), (half, 0), (0, half), (half, half)];
        for (bit, (qx, qy)) in quarters.into_iter().enumerate() {
            if mask & (1 << bit) == 0 {
                continue;
            }
            for y in qy..qy + half {
                for x in qx..qx + half {
                    image.put_pixel(mask * tile_size + x, y, SHADOW_COLOR);
                }
            }
        }
    }
    image
}

/// One source copy, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AtlasCopy {
    pub source: TextureId,
    pub src: IRect,
    pub dst: Vec2i,
}

/// A full atlas rebuild, planned on the logic side and run on the render thread.
#[derive(Debug, Clone)]
pub struct AtlasJob {
    pub texture: TextureId,
    pub size: (u32, u32),
    pub copies: Vec<AtlasCopy>,
    pub shadows: Option<RgbaImage>,
}

impl AtlasJob {
    /// Plans the copies for the bitmaps currently in `sheets`. Missing and disposed
    /// bitmaps leave their blocks transparent.
    pub fn plan(texture: TextureId, sheets: &BitmapSet, tile_size: u32, version: FormatVersion) -> Self {
        let ts = tile_size as i32;
        let copies = LAYOUT
            .iter()
            .filter_map(|p| {
                let bitmap = sheets.live(p.sheet)?;
                Some(AtlasCopy {
                    source: bitmap.texture(),
                    src: IRect::new(p.src.x * ts, p.src.y * ts, p.src.width * ts, p.src.height * ts),
                    dst: Vec2i::new(p.dst.x * ts, p.dst.y * ts),
                })
            })
            .collect();

        Self {
            texture,
            size: atlas_size(tile_size),
            copies,
            shadows: version.has_shadows().then(|| shadow_set(tile_size)),
        }
    }

    /// (Re)allocates and fills the atlas texture.
    pub fn run(self, ctx: &mut RenderContext) -> Result<(), RenderError> {
        let (w, h) = self.size;
        ctx.ensure_texture(self.texture, w, h)?;
        ctx.backend().clear_texture(self.texture)?;

        for copy in &self.copies {
            // The source may have been released after planning.
            if ctx.texture_size(copy.source).is_none() {
                log::debug!("AtlasJob: skipping released source {:?}", copy.source);
                continue;
            }
            ctx.backend().copy_texture(copy.source, copy.src, self.texture, copy.dst)?;
        }

        if let Some(shadows) = &self.shadows {
            let ts = shadows.height() as i32;
            let (x, y) = (SHADOW_ORIGIN.x * ts, SHADOW_ORIGIN.y * ts);
            ctx.backend().write_texture(self.texture, x as u32, y as u32, shadows)?;
        }
        log::debug!("AtlasJob: rebuilt {:?} from {} blocks", self.texture, self.copies.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_engine::config::RendererConfig;
    use tessera_engine::{Bitmap, RenderRunner};

    // ── layout ───────────────────────────────────────────────────────────

    #[test]
    fn destinations_do_not_overlap() {
        let rects: Vec<IRect> = LAYOUT
            .iter()
            .map(|p| IRect::new(p.dst.x, p.dst.y, p.src.width, p.src.height))
            .chain(std::iter::once(IRect::new(SHADOW_ORIGIN.x, SHADOW_ORIGIN.y, 16, 1)))
            .collect();
        let atlas = IRect::new(0, 0, ATLAS_COLUMNS as i32, ATLAS_ROWS as i32);

        for (i, a) in rects.iter().enumerate() {
            assert_eq!(a.intersect(atlas), Some(*a), "{a:?} leaves the atlas");
            for b in &rects[i + 1..] {
                assert_eq!(a.intersect(*b), None, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn shadow_masks_shade_their_quarters() {
        let image = shadow_set(8);
        assert_eq!(image.dimensions(), (128, 8));

        // Mask 0: nothing.
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
        // Mask 1: top-left only.
        assert_eq!(image.get_pixel(8, 0).0, [0, 0, 0, 0x80]);
        assert_eq!(image.get_pixel(8 + 4, 0).0, [0, 0, 0, 0]);
        // Mask 6: top-right and bottom-left.
        assert_eq!(image.get_pixel(48 + 5, 1).0, [0, 0, 0, 0x80]);
        assert_eq!(image.get_pixel(48 + 1, 6).0, [0, 0, 0, 0x80]);
        assert_eq!(image.get_pixel(48 + 6, 6).0, [0, 0, 0, 0]);
        // Mask 15: all four.
        for (x, y) in (0..8).flat_map(|y| (0..8).map(move |x| (x, y))) {
            assert_eq!(image.get_pixel(120 + x, y).0, [0, 0, 0, 0x80]);
        }
    }

    // ── plan / run ───────────────────────────────────────────────────────

    #[test]
    fn plan_skips_missing_and_disposed_sheets() {
        let (runner, _) = RenderRunner::headless(RendererConfig::default()).unwrap();
        let a2 = Bitmap::new(&runner, 64, 48);
        let b = Bitmap::new(&runner, 64, 64);
        let mut sheets = BitmapSet::new();
        sheets.set(TileSheet::A2, Some(a2.clone()));
        sheets.set(TileSheet::B, Some(b.clone()));
        b.dispose();

        let job = AtlasJob::plan(runner.handles().texture(), &sheets, 4, FormatVersion::Rgss2);
        assert_eq!(job.size, (256, 128));
        assert!(job.shadows.is_none());
        assert_eq!(
            job.copies,
            [AtlasCopy { source: a2.texture(), src: IRect::new(0, 0, 64, 48), dst: Vec2i::new(64, 0) }]
        );
    }

    #[test]
    fn run_places_blocks_and_shadows() {
        let ts = 4;
        let (runner, probe) = RenderRunner::headless(RendererConfig::default()).unwrap();

        // A1 sheet: every pixel encodes its cell coordinates.
        let a1_image = RgbaImage::from_fn(16 * ts, 12 * ts, |x, y| Rgba([(x / ts) as u8, (y / ts) as u8, 1, 255]));
        let a1 = Bitmap::from_image(&runner, a1_image);
        let mut sheets = BitmapSet::new();
        sheets.set(TileSheet::A1, Some(a1));

        let atlas = runner.handles().texture();
        let job = AtlasJob::plan(atlas, &sheets, ts, FormatVersion::Rgss3);
        runner.post(move |ctx| job.run(ctx));
        runner.sync().unwrap();
        assert_eq!(runner.failure_count(), 0);

        let image = probe.texture(atlas).unwrap();
        assert_eq!(image.dimensions(), (64 * ts, 32 * ts));
        let cell = |cx: u32, cy: u32| image.get_pixel(cx * ts, cy * ts).0;

        assert_eq!(cell(0, 0), [0, 0, 1, 255]);
        // Second frame block: sheet (8, 0) lands at atlas (6, 0).
        assert_eq!(cell(6, 0), [8, 0, 1, 255]);
        assert_eq!(cell(7, 7), [9, 7, 1, 255]);
        // Waterfall columns.
        assert_eq!(cell(12, 11), [6, 11, 1, 255]);
        assert_eq!(cell(15, 0), [15, 0, 1, 255]);
        // Absent sheets stay transparent.
        assert_eq!(cell(32, 0), [0, 0, 0, 0]);
        // Shadow mask 15 at the end of the shadow row.
        assert_eq!(cell(31, 27), [0, 0, 0, 0x80]);
        assert_eq!(cell(16, 27), [0, 0, 0, 0]);
    }

    #[test]
    fn rerun_is_idempotent() {
        let (runner, probe) = RenderRunner::headless(RendererConfig::default()).unwrap();
        let b = Bitmap::from_image(&runner, RgbaImage::from_pixel(16, 16, Rgba([5, 6, 7, 255])));
        let mut sheets = BitmapSet::new();
        sheets.set(TileSheet::B, Some(b));
        let atlas = runner.handles().texture();

        let job = AtlasJob::plan(atlas, &sheets, 1, FormatVersion::Rgss3);
        let again = job.clone();
        runner.post(move |ctx| job.run(ctx));
        runner.sync().unwrap();
        let first = probe.texture(atlas).unwrap();

        runner.post(move |ctx| again.run(ctx));
        runner.sync().unwrap();
        assert_eq!(probe.texture(atlas).unwrap(), first);
    }
}
