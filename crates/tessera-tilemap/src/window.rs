//! Visible tile window.
//!
//! The tilemap only builds geometry for the cells that can intersect its viewport,
//! plus one spare row above (tall tiles reaching down into view) and one spare row
//! and column past the far edges (partially scrolled cells).

use tessera_engine::coords::{IRect, Vec2i};

/// What the tilemap knows about its containing viewport.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ViewportInfo {
    /// On-screen rectangle, in pixels.
    pub rect: IRect,
    /// Scroll origin of the viewport's content, in pixels.
    pub origin: Vec2i,
}

impl ViewportInfo {
    pub fn new(rect: IRect, origin: Vec2i) -> Self {
        Self { rect, origin }
    }
}

/// Window of map cells to build, in tiles.
pub fn visible_window(scroll: Vec2i, viewport: &ViewportInfo, tile_size: u32) -> IRect {
    let ts = tile_size as i32;
    let origin = scroll + viewport.origin;
    let (vw, vh) = (viewport.rect.width, viewport.rect.height);
    let partial = |v: i32| i32::from(v.rem_euclid(ts) != 0);

    IRect::new(
        origin.x.div_euclid(ts),
        origin.y.div_euclid(ts) - 1,
        vw.div_euclid(ts) + partial(vw) + 1,
        vh.div_euclid(ts) + partial(vh) + 2,
    )
}

/// Screen position of window cell (0, 0), in pixels.
pub fn draw_offset(scroll: Vec2i, viewport: &ViewportInfo, tile_size: u32) -> Vec2i {
    let ts = tile_size as i32;
    let origin = scroll + viewport.origin;
    let sub_tile = Vec2i::new(origin.x.rem_euclid(ts), origin.y.rem_euclid(ts));
    viewport.rect.position() - sub_tile - Vec2i::new(0, ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(w: i32, h: i32) -> ViewportInfo {
        ViewportInfo::new(IRect::new(0, 0, w, h), Vec2i::default())
    }

    #[test]
    fn aligned_viewport_gets_one_spare_column_and_two_rows() {
        let window = visible_window(Vec2i::default(), &screen(640, 480), 32);
        assert_eq!(window, IRect::new(0, -1, 21, 17));
    }

    #[test]
    fn partial_cells_add_a_column_and_row() {
        let window = visible_window(Vec2i::new(40, 70), &screen(100, 50), 32);
        assert_eq!(window, IRect::new(1, 1, 5, 4));
    }

    #[test]
    fn viewport_scroll_adds_to_the_tilemap_origin() {
        let viewport = ViewportInfo::new(IRect::new(10, 20, 64, 64), Vec2i::new(32, 0));
        let window = visible_window(Vec2i::new(32, 32), &viewport, 32);
        assert_eq!((window.x, window.y), (2, 0));
    }

    #[test]
    fn negative_origins_round_down() {
        let window = visible_window(Vec2i::new(-1, -33), &screen(32, 32), 32);
        assert_eq!((window.x, window.y), (-1, -3));
        assert_eq!(draw_offset(Vec2i::new(-1, -33), &screen(32, 32), 32), Vec2i::new(-31, -63));
    }

    #[test]
    fn draw_offset_tracks_sub_tile_scroll() {
        let viewport = ViewportInfo::new(IRect::new(100, 50, 320, 240), Vec2i::default());
        assert_eq!(draw_offset(Vec2i::default(), &viewport, 32), Vec2i::new(100, 18));
        assert_eq!(draw_offset(Vec2i::new(5, 40), &viewport, 32), Vec2i::new(95, 10));
    }
}
