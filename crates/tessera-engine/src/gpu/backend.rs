use image::RgbaImage;

use crate::coords::{IRect, Vec2i};
use crate::error::GpuError;

use super::{
    BufferId, DrawCall, ProgramId, ShaderId, ShaderStage, TextureId, UniformLocation, UniformValue,
    Vertex,
};

/// GPU command surface driven by the render worker.
///
/// Objects are named by handles issued on the logic side; the backend creates the
/// object behind a handle on first use and forgets it on delete. Every method runs on
/// the render thread only.
pub trait GpuBackend: Send {
    fn create_shader(&mut self, id: ShaderId, stage: ShaderStage, source: &str) -> Result<(), GpuError>;

    /// Returns `true` if the shader existed.
    fn delete_shader(&mut self, id: ShaderId) -> bool;

    fn link_program(&mut self, id: ProgramId, vertex: ShaderId, fragment: ShaderId) -> Result<(), GpuError>;

    /// Returns `true` if the program existed.
    fn delete_program(&mut self, id: ProgramId) -> bool;

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    fn set_uniform(
        &mut self,
        program: ProgramId,
        location: UniformLocation,
        value: &UniformValue,
    ) -> Result<(), GpuError>;

    /// Creates (or recreates) a transparent texture.
    fn create_texture(&mut self, id: TextureId, width: u32, height: u32) -> Result<(), GpuError>;

    fn texture_size(&self, id: TextureId) -> Option<(u32, u32)>;

    /// Uploads `image` with its top-left corner at (`x`, `y`), clipped to the texture.
    fn write_texture(&mut self, id: TextureId, x: u32, y: u32, image: &RgbaImage) -> Result<(), GpuError>;

    /// Fills the texture with transparent black.
    fn clear_texture(&mut self, id: TextureId) -> Result<(), GpuError>;

    /// Copies `src_rect` of `src` to `dst_origin` in `dst`, clipped to both textures.
    fn copy_texture(
        &mut self,
        src: TextureId,
        src_rect: IRect,
        dst: TextureId,
        dst_origin: Vec2i,
    ) -> Result<(), GpuError>;

    /// Returns `true` if the texture existed.
    fn delete_texture(&mut self, id: TextureId) -> bool;

    /// Replaces the buffer contents, creating it if needed.
    fn write_vertices(&mut self, id: BufferId, vertices: &[Vertex]) -> Result<(), GpuError>;

    /// Returns `true` if the buffer existed.
    fn delete_buffer(&mut self, id: BufferId) -> bool;

    fn draw(&mut self, call: &DrawCall) -> Result<(), GpuError>;
}

/// Clips a copy region against source and destination bounds.
///
/// Returns the clipped source rectangle and destination origin, or `None` when
/// nothing overlaps.
pub fn clip_copy(
    src_size: (u32, u32),
    src_rect: IRect,
    dst_size: (u32, u32),
    dst_origin: Vec2i,
) -> Option<(IRect, Vec2i)> {
    let src_bounds = IRect::new(0, 0, src_size.0 as i32, src_size.1 as i32);
    let clipped = src_rect.intersect(src_bounds)?;
    let dst = dst_origin + (clipped.position() - src_rect.position());

    let dst_bounds = IRect::new(0, 0, dst_size.0 as i32, dst_size.1 as i32);
    let placed = IRect::new(dst.x, dst.y, clipped.width, clipped.height).intersect(dst_bounds)?;

    let src = IRect::new(
        clipped.x + (placed.x - dst.x),
        clipped.y + (placed.y - dst.y),
        placed.width,
        placed.height,
    );
    Some((src, placed.position()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_copy_inside_is_identity() {
        let r = clip_copy((64, 64), IRect::new(8, 8, 16, 16), (64, 64), Vec2i::new(0, 0));
        assert_eq!(r, Some((IRect::new(8, 8, 16, 16), Vec2i::new(0, 0))));
    }

    #[test]
    fn clip_copy_trims_source_overhang() {
        // Source rect runs 8px past the right edge.
        let r = clip_copy((32, 32), IRect::new(24, 0, 16, 8), (64, 64), Vec2i::new(10, 10));
        assert_eq!(r, Some((IRect::new(24, 0, 8, 8), Vec2i::new(10, 10))));
    }

    #[test]
    fn clip_copy_trims_negative_destination() {
        let r = clip_copy((32, 32), IRect::new(0, 0, 16, 16), (64, 64), Vec2i::new(-4, -2));
        assert_eq!(r, Some((IRect::new(4, 2, 12, 14), Vec2i::new(0, 0))));
    }

    #[test]
    fn clip_copy_disjoint_is_none() {
        assert!(clip_copy((32, 32), IRect::new(40, 40, 8, 8), (64, 64), Vec2i::new(0, 0)).is_none());
        assert!(clip_copy((32, 32), IRect::new(0, 0, 8, 8), (64, 64), Vec2i::new(64, 0)).is_none());
    }
}
