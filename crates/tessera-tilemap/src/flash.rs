//! Flash overlay geometry.
//!
//! Flash data is a 2D table of `0xRGB` colours, four bits per channel. Every visible
//! non-zero cell becomes one solid quad; the flash shader applies the pulsing alpha.

use tessera_engine::coords::{IRect, Rect};
use tessera_engine::gpu::Vertex;

use crate::table::TableGrid;

/// Expands a 12-bit `0xRGB` value to an opaque colour.
pub fn flash_color(value: i16) -> [f32; 4] {
    let channel = |shift: u32| f32::from(((value as u16) >> shift) as u8 & 0xF) / 15.0;
    [channel(8), channel(4), channel(0), 1.0]
}

/// Quads for the flashing cells of `window`, positioned like the tile batches.
pub fn build_flash(flash: &TableGrid, window: IRect, tile_size: u32) -> Vec<Vertex> {
    let ts = tile_size as f32;
    let mut vertices = Vec::new();
    for y in 0..window.height.max(0) {
        for x in 0..window.width.max(0) {
            let value = flash.get_wrapped(window.x + x, window.y + y, 0) & 0xFFF;
            if value == 0 {
                continue;
            }
            let pos = Rect::new(x as f32 * ts, y as f32 * ts, ts, ts);
            vertices.extend_from_slice(&Vertex::quad(pos, Rect::default(), flash_color(value)));
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colours_expand_nibbles() {
        assert_eq!(flash_color(0xF00), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(flash_color(0x0F0), [0.0, 1.0, 0.0, 1.0]);
        let c = flash_color(0x00A);
        assert!((c[2] - 10.0 / 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn only_lit_cells_emit_quads() {
        let mut flash = TableGrid::new(3, 2, 1);
        flash.set(1, 0, 0, 0xFFF);
        flash.set(2, 1, 0, 0x123);

        let vertices = build_flash(&flash, IRect::new(0, 0, 3, 2), 16);
        assert_eq!(vertices.len(), 8);
        assert_eq!(vertices[0].position, [16.0, 0.0]);
        assert_eq!(vertices[4].position, [32.0, 16.0]);
        assert_eq!(vertices[0].color, [1.0; 4]);
    }

    #[test]
    fn window_offsets_and_wraps() {
        let mut flash = TableGrid::new(2, 2, 1);
        flash.set(0, 0, 0, 0x00F);
        let vertices = build_flash(&flash, IRect::new(2, 2, 1, 1), 16);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].position, [0.0, 0.0]);
        assert!(build_flash(&TableGrid::default(), IRect::new(0, 0, 4, 4), 16).is_empty());
    }
}
