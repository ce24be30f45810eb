//! The tilemap drawable.
//!
//! Owns the atlas texture, the tile vertex buffer and the flash buffer. Shared
//! inputs (bitmaps, map data, flags, flash data) are observed; their notifications
//! only raise dirty flags, and the expensive work happens in
//! [`Tilemap::before_composite`].

use std::cell::Cell;
use std::rc::Rc;

use tessera_engine::coords::{IRect, Vec2, Vec2i};
use tessera_engine::gpu::{BufferId, TextureId, Vertex};
use tessera_engine::observer::Subscription;
use tessera_engine::scene::{Drawable, LayerSlot, ZIndex};
use tessera_engine::worker::DrawQuads;
use tessera_engine::{Bitmap, RenderHandle, ShaderProgram};

use crate::anim::{AnimationClock, FlashClock};
use crate::atlas::{atlas_size, AtlasJob};
use crate::builder::{build, BuildParams, TileBatches};
use crate::config::{FormatVersion, TilemapConfig};
use crate::error::TilemapError;
use crate::flash::build_flash;
use crate::sheets::{BitmapSet, TileSheet};
use crate::table::Table;
use crate::window::{draw_offset, visible_window, ViewportInfo};

const TILEMAP_WGSL: &str = include_str!("shaders/tilemap.wgsl");
const FLASH_WGSL: &str = include_str!("shaders/flash.wgsl");

/// Depth of the ground layer, below characters.
pub const GROUND_Z: ZIndex = ZIndex(0);
/// Depth of the above-player layer.
pub const ABOVE_Z: ZIndex = ZIndex(200);

const ATLAS_UNIT: u32 = 0;

#[derive(Debug, Default)]
struct DirtyFlags {
    atlas: Cell<bool>,
    buffer: Cell<bool>,
    flash: Cell<bool>,
}

impl DirtyFlags {
    fn all() -> Self {
        Self { atlas: Cell::new(true), buffer: Cell::new(true), flash: Cell::new(true) }
    }
}

/// An observed table plus the subscription keeping its notifications coming.
#[derive(Default)]
struct Watched {
    table: Option<Table>,
    _subscription: Option<Subscription>,
}

impl Watched {
    fn same(&self, table: Option<&Table>) -> bool {
        match (&self.table, table) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Counts of the quads currently uploaded.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct QuadCounts {
    pub ground: u32,
    pub above: u32,
    pub flash: u32,
}

pub struct Tilemap {
    runner: RenderHandle,
    config: TilemapConfig,

    sheets: BitmapSet,
    sheet_subscriptions: Vec<Option<Subscription>>,
    map_data: Watched,
    flags: Watched,
    flash_data: Watched,
    dirty: Rc<DirtyFlags>,

    viewport: ViewportInfo,
    origin: Vec2i,
    visible: bool,
    window: IRect,
    offset: Vec2i,

    animation: AnimationClock,
    flash_clock: FlashClock,

    atlas: TextureId,
    tile_buffer: BufferId,
    flash_buffer: BufferId,
    counts: QuadCounts,
    tile_shader: ShaderProgram,
    flash_shader: ShaderProgram,
    disposed: bool,
}

impl Tilemap {
    /// Creates an empty tilemap inside `viewport` and compiles its shaders.
    pub fn new(runner: &RenderHandle, viewport: ViewportInfo, config: TilemapConfig) -> Result<Self, TilemapError> {
        if config.tile_size == 0 {
            return Err(TilemapError::TileSize);
        }

        let mut tile_shader = ShaderProgram::new(runner);
        tile_shader.compile(TILEMAP_WGSL, TILEMAP_WGSL)?;
        let mut flash_shader = ShaderProgram::new(runner);
        flash_shader.compile(FLASH_WGSL, FLASH_WGSL)?;

        let ids = runner.handles();
        let atlas = ids.texture();
        tile_shader.set_texture_id("atlas", atlas, ATLAS_UNIT);

        log::debug!(
            "Tilemap: created (tile size {}, {:?}, atlas {:?})",
            config.tile_size,
            config.version,
            atlas
        );
        Ok(Self {
            runner: runner.clone(),
            sheets: BitmapSet::new(),
            sheet_subscriptions: (0..TileSheet::COUNT).map(|_| None).collect(),
            map_data: Watched::default(),
            flags: Watched::default(),
            flash_data: Watched::default(),
            dirty: Rc::new(DirtyFlags::all()),
            viewport,
            origin: Vec2i::default(),
            visible: true,
            window: IRect::default(),
            offset: Vec2i::default(),
            animation: AnimationClock::new(),
            flash_clock: FlashClock::new(),
            atlas,
            tile_buffer: ids.buffer(),
            flash_buffer: ids.buffer(),
            counts: QuadCounts::default(),
            tile_shader,
            flash_shader,
            disposed: false,
            config,
        })
    }

    // ── clocks ───────────────────────────────────────────────────────────

    /// Advances the autotile animation and the flash pulse by one frame.
    pub fn update(&mut self) -> Result<(), TilemapError> {
        self.ensure_live()?;
        self.animation.tick();
        self.flash_clock.tick();
        Ok(())
    }

    pub fn animation_offset(&self) -> Vec2 {
        self.animation.offset(self.config.tile_size)
    }

    pub fn flash_alpha(&self) -> f32 {
        self.flash_clock.alpha()
    }

    // ── inputs ───────────────────────────────────────────────────────────

    pub fn bitmap(&self, index: usize) -> Result<Option<Bitmap>, TilemapError> {
        let sheet = TileSheet::from_index(index).ok_or(TilemapError::SheetIndex(index))?;
        Ok(self.sheets.get(sheet).cloned())
    }

    /// Replaces the bitmap of sheet slot `index` (A1..A5, B..E).
    pub fn set_bitmap(&mut self, index: usize, bitmap: Option<Bitmap>) -> Result<(), TilemapError> {
        self.ensure_live()?;
        let sheet = TileSheet::from_index(index).ok_or(TilemapError::SheetIndex(index))?;
        if !self.sheets.set(sheet, bitmap.clone()) {
            return Ok(());
        }
        self.sheet_subscriptions[index] = bitmap.map(|b| {
            let dirty = Rc::clone(&self.dirty);
            b.subscribe(move || dirty.atlas.set(true))
        });
        self.dirty.atlas.set(true);
        Ok(())
    }

    pub fn map_data(&self) -> Option<Table> {
        self.map_data.table.clone()
    }

    /// Sets the 3D map table: layers 0 to 2 hold tile codes, layer 3 shadow masks.
    pub fn set_map_data(&mut self, table: Option<Table>) -> Result<(), TilemapError> {
        self.ensure_live()?;
        if self.map_data.same(table.as_ref()) {
            return Ok(());
        }
        self.map_data = self.watch(table, |d| d.buffer.set(true));
        self.dirty.buffer.set(true);
        Ok(())
    }

    pub fn flags(&self) -> Option<Table> {
        self.flags.table.clone()
    }

    /// Sets the flag table, indexed by tile code.
    pub fn set_flags(&mut self, table: Option<Table>) -> Result<(), TilemapError> {
        self.ensure_live()?;
        if self.flags.same(table.as_ref()) {
            return Ok(());
        }
        self.flags = self.watch(table, |d| d.buffer.set(true));
        self.dirty.buffer.set(true);
        Ok(())
    }

    pub fn flash_data(&self) -> Option<Table> {
        self.flash_data.table.clone()
    }

    /// Sets the 2D table of `0xRGB` flash colours.
    pub fn set_flash_data(&mut self, table: Option<Table>) -> Result<(), TilemapError> {
        self.ensure_live()?;
        if self.flash_data.same(table.as_ref()) {
            return Ok(());
        }
        self.flash_data = self.watch(table, |d| d.flash.set(true));
        self.dirty.flash.set(true);
        Ok(())
    }

    fn watch(&self, table: Option<Table>, on_change: fn(&DirtyFlags)) -> Watched {
        let subscription = table.as_ref().map(|t| {
            let dirty = Rc::clone(&self.dirty);
            t.subscribe(move || on_change(&dirty))
        });
        Watched { table, _subscription: subscription }
    }

    // ── placement ────────────────────────────────────────────────────────

    pub fn origin(&self) -> Vec2i {
        self.origin
    }

    /// Scrolls the map, in pixels.
    pub fn set_origin(&mut self, origin: Vec2i) -> Result<(), TilemapError> {
        self.ensure_live()?;
        self.origin = origin;
        Ok(())
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides both layers.
    pub fn set_visible(&mut self, visible: bool) -> Result<(), TilemapError> {
        self.ensure_live()?;
        self.visible = visible;
        Ok(())
    }

    pub fn viewport(&self) -> ViewportInfo {
        self.viewport
    }

    /// Receives the containing viewport's geometry.
    pub fn set_viewport(&mut self, viewport: ViewportInfo) {
        if self.disposed {
            return;
        }
        if viewport.rect != self.viewport.rect {
            self.dirty.buffer.set(true);
        }
        self.viewport = viewport;
    }

    pub fn config(&self) -> &TilemapConfig {
        &self.config
    }

    /// Visible window used by the current batches, in tiles.
    pub fn window(&self) -> IRect {
        self.window
    }

    pub fn quad_counts(&self) -> QuadCounts {
        self.counts
    }

    pub fn atlas_texture(&self) -> TextureId {
        self.atlas
    }

    pub fn tile_buffer(&self) -> BufferId {
        self.tile_buffer
    }

    pub fn flash_buffer(&self) -> BufferId {
        self.flash_buffer
    }

    // ── frame ────────────────────────────────────────────────────────────

    /// Recomputes the visible window and rebuilds whatever is dirty.
    pub fn before_composite(&mut self) {
        if self.disposed {
            return;
        }
        self.update_window();

        if self.dirty.atlas.replace(false) {
            self.rebuild_atlas();
        }
        if self.dirty.buffer.replace(false) {
            self.rebuild_tiles();
        }
        if self.dirty.flash.replace(false) {
            self.rebuild_flash();
        }
    }

    fn update_window(&mut self) {
        let ts = self.config.tile_size;
        let window = visible_window(self.origin, &self.viewport, ts);
        if window != self.window {
            self.window = window;
            self.dirty.buffer.set(true);
            self.dirty.flash.set(true);
        }
        self.offset = draw_offset(self.origin, &self.viewport, ts);
    }

    fn rebuild_atlas(&mut self) {
        let job = AtlasJob::plan(self.atlas, &self.sheets, self.config.tile_size, self.config.version);
        self.runner.post(move |ctx| job.run(ctx));
    }

    fn rebuild_tiles(&mut self) {
        let params = BuildParams {
            window: self.window,
            tile_size: self.config.tile_size,
            version: self.config.version,
        };
        let batches = match (&self.map_data.table, &self.flags.table) {
            (None, _) => TileBatches::default(),
            (Some(map), None) => map.with_grid(|m| build(m, None, &params)),
            (Some(map), Some(flags)) => map.with_grid(|m| flags.with_grid(|f| build(m, Some(f), &params))),
        };
        self.counts.ground = batches.ground_quads();
        self.counts.above = batches.above_quads();
        log::trace!(
            "Tilemap: rebuilt {} ground and {} above quads for {:?}",
            self.counts.ground,
            self.counts.above,
            self.window
        );
        self.upload(self.tile_buffer, batches.concatenated());
    }

    fn rebuild_flash(&mut self) {
        let vertices = match &self.flash_data.table {
            Some(flash) => flash.with_grid(|f| build_flash(f, self.window, self.config.tile_size)),
            None => Vec::new(),
        };
        self.counts.flash = (vertices.len() / 4) as u32;
        self.upload(self.flash_buffer, vertices);
    }

    fn upload(&self, buffer: BufferId, vertices: Vec<Vertex>) {
        self.runner.post(move |ctx| Ok(ctx.backend().write_vertices(buffer, &vertices)?));
    }

    fn bind_tile_params(&self) {
        let (w, h) = atlas_size(self.config.tile_size);
        let shader = &self.tile_shader;
        shader.set_param_f32("texture_size", &[w as f32, h as f32]);
        shader.set_param_f32("trans_offset", &[self.offset.x as f32, self.offset.y as f32]);
        shader.set_param_f32("animation_offset", &self.animation_offset().to_array());
        shader.set_param_f32("tile_size", &[self.config.tile_size as f32]);
    }

    /// Draws the ground batch, then the flash overlay.
    pub fn composite_ground(&mut self) {
        if self.disposed || !self.visible {
            return;
        }
        if self.counts.ground > 0 {
            self.bind_tile_params();
            self.tile_shader.draw(DrawQuads {
                buffer: self.tile_buffer,
                first_quad: 0,
                quad_count: self.counts.ground,
            });
        }
        if self.counts.flash > 0 {
            let shader = &self.flash_shader;
            shader.set_param_f32("trans_offset", &[self.offset.x as f32, self.offset.y as f32]);
            shader.set_param_f32("alpha", &[self.flash_alpha()]);
            shader.draw(DrawQuads { buffer: self.flash_buffer, first_quad: 0, quad_count: self.counts.flash });
        }
    }

    /// Draws the above-player batch.
    pub fn composite_above(&mut self) {
        if self.disposed || !self.visible || self.counts.above == 0 {
            return;
        }
        self.bind_tile_params();
        self.tile_shader.draw(DrawQuads {
            buffer: self.tile_buffer,
            first_quad: self.counts.ground,
            quad_count: self.counts.above,
        });
    }

    // ── lifecycle ────────────────────────────────────────────────────────

    /// Releases the atlas, the buffers and the shaders on the render thread, once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.sheet_subscriptions.iter_mut().for_each(|s| *s = None);
        self.sheets.clear();
        self.map_data = Watched::default();
        self.flags = Watched::default();
        self.flash_data = Watched::default();
        self.counts = QuadCounts::default();

        self.tile_shader.dispose();
        self.flash_shader.dispose();
        let (atlas, tiles, flash) = (self.atlas, self.tile_buffer, self.flash_buffer);
        self.runner.post(move |ctx| {
            ctx.delete_texture(atlas);
            ctx.backend().delete_buffer(tiles);
            ctx.backend().delete_buffer(flash);
            Ok(())
        });
        log::debug!("Tilemap: disposed (atlas {atlas:?})");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn version(&self) -> FormatVersion {
        self.config.version
    }

    fn ensure_live(&self) -> Result<(), TilemapError> {
        if self.disposed {
            Err(TilemapError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl Drawable for Tilemap {
    fn layers(&self) -> Vec<LayerSlot> {
        let visible = self.visible && !self.disposed;
        vec![LayerSlot { z: GROUND_Z, visible }, LayerSlot { z: ABOVE_Z, visible }]
    }

    fn before_composite(&mut self, _layer: usize) {
        Tilemap::before_composite(self);
    }

    fn composite(&mut self, layer: usize) {
        match layer {
            0 => self.composite_ground(),
            _ => self.composite_above(),
        }
    }
}

impl Drop for Tilemap {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tessera_engine::config::RendererConfig;
    use tessera_engine::gpu::{GpuCall, HeadlessProbe};
    use tessera_engine::logging::{init_logging, LoggingConfig};
    use tessera_engine::scene::composite_frame;
    use tessera_engine::RenderRunner;

    use crate::anim::ANIMATION_PERIOD;
    use crate::autotile::REGULAR;
    use crate::config::OVER_PLAYER_FLAG;

    fn setup() -> (RenderRunner, HeadlessProbe) {
        init_logging(LoggingConfig::for_tests());
        RenderRunner::headless(RendererConfig::default()).unwrap()
    }

    /// One 32x32 tile: a 1x1 window once the spare row and column are removed.
    fn small_viewport() -> ViewportInfo {
        ViewportInfo::new(IRect::new(0, 0, 32, 32), Vec2i::default())
    }

    fn tilemap(runner: &RenderRunner) -> Tilemap {
        Tilemap::new(runner, small_viewport(), TilemapConfig::default()).unwrap()
    }

    fn count(calls: &[GpuCall], pred: impl Fn(&GpuCall) -> bool) -> usize {
        calls.iter().filter(|c| pred(c)).count()
    }

    fn vertex_writes(calls: &[GpuCall], buffer: BufferId) -> usize {
        count(calls, |c| matches!(c, GpuCall::WriteVertices { id, .. } if *id == buffer))
    }

    fn frame(runner: &RenderRunner, map: &mut Tilemap) {
        composite_frame(&mut [map as &mut dyn Drawable]);
        runner.sync().unwrap();
    }

    // ── construction ─────────────────────────────────────────────────────

    #[test]
    fn new_compiles_both_programs() {
        let (runner, probe) = setup();
        let map = tilemap(&runner);
        assert!(probe.has_program(map.tile_shader.handles().program));
        assert!(probe.has_program(map.flash_shader.handles().program));
        assert_eq!(runner.failure_count(), 0);
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let (runner, _) = setup();
        let config = TilemapConfig { tile_size: 0, ..TilemapConfig::default() };
        assert!(matches!(Tilemap::new(&runner, small_viewport(), config), Err(TilemapError::TileSize)));
    }

    // ── rebuilds ─────────────────────────────────────────────────────────

    #[test]
    fn water_tile_draws_four_ground_quads_per_cell() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        // A one-cell map: every window cell wraps onto the same tile.
        let data = Table::new(1, 1, 4);
        data.set(0, 0, 0, 0x0800);
        map.set_map_data(Some(data)).unwrap();
        frame(&runner, &mut map);

        let window = map.window();
        assert_eq!(window, IRect::new(0, -1, 2, 3));
        let cells = (window.width * window.height) as u32;
        assert_eq!(map.quad_counts(), QuadCounts { ground: 4 * cells, above: 0, flash: 0 });

        let vertices = probe.vertices(map.tile_buffer()).unwrap();
        let first = REGULAR[0];
        assert_eq!(vertices[0].texcoord, [first.x * 32.0 + 0.5, first.y * 32.0 + 0.5]);
        assert_eq!(probe.draws()[0].quad_count, 4 * cells);
    }

    #[test]
    fn unchanged_inputs_skip_the_rebuild() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        map.set_map_data(Some(Table::new(4, 4, 4))).unwrap();

        frame(&runner, &mut map);
        frame(&runner, &mut map);
        frame(&runner, &mut map);

        let calls = probe.calls();
        assert_eq!(vertex_writes(&calls, map.tile_buffer()), 1);
        assert_eq!(count(&calls, |c| matches!(c, GpuCall::ClearTexture(_))), 1);
    }

    #[test]
    fn table_edits_and_identity_changes_invalidate() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        let data = Table::new(4, 4, 4);
        map.set_map_data(Some(data.clone())).unwrap();
        frame(&runner, &mut map);
        probe.take_calls();

        // Same table again: nothing to do.
        map.set_map_data(Some(data.clone())).unwrap();
        frame(&runner, &mut map);
        assert_eq!(vertex_writes(&probe.take_calls(), map.tile_buffer()), 0);

        data.set(1, 1, 0, 0x0001);
        frame(&runner, &mut map);
        assert_eq!(vertex_writes(&probe.take_calls(), map.tile_buffer()), 1);
        assert!(map.quad_counts().ground > 0);

        let flags = Table::new(0x2000, 1, 1);
        map.set_flags(Some(flags.clone())).unwrap();
        frame(&runner, &mut map);
        assert_eq!(vertex_writes(&probe.take_calls(), map.tile_buffer()), 1);

        flags.set(5, 0, 0, OVER_PLAYER_FLAG);
        frame(&runner, &mut map);
        assert_eq!(vertex_writes(&probe.take_calls(), map.tile_buffer()), 1);
    }

    #[test]
    fn replaced_tables_stop_notifying() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        let old = Table::new(2, 2, 4);
        map.set_map_data(Some(old.clone())).unwrap();
        map.set_map_data(Some(Table::new(2, 2, 4))).unwrap();
        frame(&runner, &mut map);
        probe.take_calls();

        old.set(0, 0, 0, 1);
        frame(&runner, &mut map);
        assert_eq!(vertex_writes(&probe.take_calls(), map.tile_buffer()), 0);
    }

    #[test]
    fn scrolling_rebuilds_only_across_tile_boundaries() {
        let (runner, probe) = setup();
        let mut map = Tilemap::new(
            &runner,
            ViewportInfo::new(IRect::new(0, 0, 64, 64), Vec2i::default()),
            TilemapConfig::default(),
        )
        .unwrap();
        map.set_map_data(Some(Table::new(8, 8, 4))).unwrap();
        frame(&runner, &mut map);
        probe.take_calls();

        map.set_origin(Vec2i::new(10, 0)).unwrap();
        frame(&runner, &mut map);
        assert_eq!(vertex_writes(&probe.take_calls(), map.tile_buffer()), 0);
        assert_eq!(map.offset, Vec2i::new(-10, -32));

        map.set_origin(Vec2i::new(40, 0)).unwrap();
        frame(&runner, &mut map);
        assert_eq!(vertex_writes(&probe.take_calls(), map.tile_buffer()), 1);
        assert_eq!(map.window().x, 1);
    }

    #[test]
    fn viewport_rect_changes_invalidate_the_batches() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        map.set_map_data(Some(Table::new(8, 8, 4))).unwrap();
        frame(&runner, &mut map);
        probe.take_calls();

        // Moving the viewport keeps the window but still rebuilds.
        map.set_viewport(ViewportInfo::new(IRect::new(16, 16, 32, 32), Vec2i::default()));
        frame(&runner, &mut map);
        assert_eq!(vertex_writes(&probe.take_calls(), map.tile_buffer()), 1);

        map.set_viewport(ViewportInfo::new(IRect::new(16, 16, 32, 32), Vec2i::default()));
        frame(&runner, &mut map);
        assert_eq!(vertex_writes(&probe.take_calls(), map.tile_buffer()), 0);
    }

    #[test]
    fn bitmap_changes_rebuild_the_atlas() {
        let (runner, probe) = setup();
        let mut map = Tilemap::new(&runner, small_viewport(), TilemapConfig { tile_size: 2, ..TilemapConfig::default() })
            .unwrap();
        let sheet = Bitmap::from_image(&runner, RgbaImage::from_pixel(32, 32, Rgba([1, 2, 3, 255])));
        map.set_bitmap(TileSheet::B.index(), Some(sheet.clone())).unwrap();
        frame(&runner, &mut map);

        let atlas = probe.texture(map.atlas_texture()).unwrap();
        assert_eq!(atlas.dimensions(), (128, 64));
        assert_eq!(atlas.get_pixel(64, 0).0, [1, 2, 3, 255]);
        probe.take_calls();

        frame(&runner, &mut map);
        assert_eq!(count(&probe.take_calls(), |c| matches!(c, GpuCall::ClearTexture(_))), 0);

        sheet.write(0, 0, RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 255])));
        frame(&runner, &mut map);
        assert_eq!(probe.texture(map.atlas_texture()).unwrap().get_pixel(64, 0).0, [9, 9, 9, 255]);

        assert!(matches!(map.set_bitmap(TileSheet::COUNT, None), Err(TilemapError::SheetIndex(9))));
        assert!(map.bitmap(TileSheet::B.index()).unwrap().is_some_and(|b| b.ptr_eq(&sheet)));
    }

    // ── drawing ──────────────────────────────────────────────────────────

    #[test]
    fn layers_draw_their_own_quad_ranges() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        let data = Table::new(2, 2, 4);
        data.edit(|g| {
            for y in 0..2 {
                for x in 0..2 {
                    g.set(x, y, 0, 0x0001);
                    g.set(x, y, 2, 0x0002);
                }
            }
        });
        let flags = Table::new(0x2000, 1, 1);
        flags.set(2, 0, 0, OVER_PLAYER_FLAG);
        map.set_map_data(Some(data)).unwrap();
        map.set_flags(Some(flags)).unwrap();
        frame(&runner, &mut map);

        let counts = map.quad_counts();
        assert!(counts.ground > 0);
        assert_eq!(counts.ground, counts.above);

        let draws = probe.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!((draws[0].first_quad, draws[0].quad_count), (0, counts.ground));
        assert_eq!((draws[1].first_quad, draws[1].quad_count), (counts.ground, counts.above));
        assert_eq!(draws[0].textures.len(), 1);
        assert_eq!(runner.failure_count(), 0);
    }

    #[test]
    fn flash_draws_between_ground_and_above() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        let data = Table::new(1, 1, 4);
        data.edit(|g| {
            g.set(0, 0, 0, 0x0001);
            g.set(0, 0, 2, 0x0002);
        });
        let flags = Table::new(0x2000, 1, 1);
        flags.set(2, 0, 0, OVER_PLAYER_FLAG);
        let flash = Table::new(1, 1, 1);
        flash.set(0, 0, 0, 0xF00);
        map.set_map_data(Some(data)).unwrap();
        map.set_flags(Some(flags)).unwrap();
        map.set_flash_data(Some(flash)).unwrap();
        frame(&runner, &mut map);

        let programs: Vec<_> = probe.draws().iter().map(|d| d.program).collect();
        let (tiles, overlay) = (map.tile_shader.handles().program, map.flash_shader.handles().program);
        assert_eq!(programs, [tiles, overlay, tiles]);
        assert_eq!(map.quad_counts().flash, map.window().width as u32 * map.window().height as u32);
        assert_eq!(runner.failure_count(), 0);
    }

    #[test]
    fn hidden_tilemaps_draw_nothing() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        let data = Table::new(1, 1, 4);
        data.set(0, 0, 0, 0x0001);
        map.set_map_data(Some(data)).unwrap();
        map.set_visible(false).unwrap();
        frame(&runner, &mut map);
        assert!(probe.draws().is_empty());

        map.set_visible(true).unwrap();
        frame(&runner, &mut map);
        assert_eq!(probe.draws().len(), 1);
    }

    // ── clocks ───────────────────────────────────────────────────────────

    #[test]
    fn update_advances_both_clocks() {
        let (runner, _) = setup();
        let mut map = tilemap(&runner);
        let (offset, alpha) = (map.animation_offset(), map.flash_alpha());

        for _ in 0..30 {
            map.update().unwrap();
        }
        assert_eq!(map.animation_offset(), Vec2::new(64.0, 32.0));
        assert!(map.flash_alpha() != alpha);

        for _ in 30..ANIMATION_PERIOD {
            map.update().unwrap();
        }
        assert_eq!(map.animation_offset(), offset);
        assert_eq!(map.flash_clock.index(), 360 % 32);
    }

    // ── lifecycle ────────────────────────────────────────────────────────

    #[test]
    fn dispose_releases_resources_once() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        map.set_map_data(Some(Table::new(2, 2, 4))).unwrap();
        frame(&runner, &mut map);
        let (atlas, tiles) = (map.atlas_texture(), map.tile_buffer());
        assert!(probe.has_texture(atlas));
        assert!(probe.has_buffer(tiles));

        map.dispose();
        map.dispose();
        drop(map);
        runner.sync().unwrap();

        assert!(!probe.has_texture(atlas));
        assert!(!probe.has_buffer(tiles));
        let calls = probe.calls();
        assert_eq!(count(&calls, |c| *c == GpuCall::DeleteTexture(atlas)), 1);
    }

    #[test]
    fn operations_after_dispose_fail() {
        let (runner, probe) = setup();
        let mut map = tilemap(&runner);
        map.dispose();

        assert!(map.is_disposed());
        assert!(matches!(map.update(), Err(TilemapError::Disposed)));
        assert!(matches!(map.set_map_data(None), Err(TilemapError::Disposed)));
        assert!(map.layers().iter().all(|l| !l.visible));

        map.before_composite();
        map.composite_ground();
        runner.sync().unwrap();
        assert!(probe.draws().is_empty());
    }
}
