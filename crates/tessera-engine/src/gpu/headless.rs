//! CPU-side backend.
//!
//! Textures live as `RgbaImage`s and vertex buffers as plain vectors. Shaders are
//! validated and reflected exactly like on the GPU path, but draws are only recorded,
//! not rasterized. A [`HeadlessProbe`] shares the state so tests can inspect it after
//! a `sync()`.

use std::collections::HashMap;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use crate::coords::{IRect, Vec2i};
use crate::error::GpuError;

use super::backend::clip_copy;
use super::reflect::{reflect_stage, ProgramLayout, StageReflection};
use super::{
    BufferId, DrawCall, GpuBackend, ProgramId, ShaderId, ShaderStage, TextureId, UniformLocation,
    UniformValue, Vertex,
};

/// One backend call, as recorded by [`HeadlessBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateShader { id: ShaderId, stage: ShaderStage },
    DeleteShader(ShaderId),
    LinkProgram { id: ProgramId, vertex: ShaderId, fragment: ShaderId },
    DeleteProgram(ProgramId),
    SetUniform { program: ProgramId, name: String, value: UniformValue },
    CreateTexture { id: TextureId, width: u32, height: u32 },
    WriteTexture { id: TextureId, x: u32, y: u32, width: u32, height: u32 },
    ClearTexture(TextureId),
    CopyTexture { src: TextureId, src_rect: IRect, dst: TextureId, dst_origin: Vec2i },
    DeleteTexture(TextureId),
    WriteVertices { id: BufferId, quads: u32 },
    DeleteBuffer(BufferId),
    Draw(DrawCall),
}

struct HeadlessProgram {
    layout: ProgramLayout,
    uniforms: Vec<u8>,
}

#[derive(Default)]
struct HeadlessState {
    calls: Vec<GpuCall>,
    shaders: HashMap<ShaderId, StageReflection>,
    programs: HashMap<ProgramId, HeadlessProgram>,
    textures: HashMap<TextureId, RgbaImage>,
    buffers: HashMap<BufferId, Vec<Vertex>>,
}

pub struct HeadlessBackend {
    state: Arc<Mutex<HeadlessState>>,
}

/// Read access to a [`HeadlessBackend`] from another thread.
#[derive(Clone)]
pub struct HeadlessProbe {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessBackend {
    pub fn new() -> (Self, HeadlessProbe) {
        let state = Arc::new(Mutex::new(HeadlessState::default()));
        (Self { state: Arc::clone(&state) }, HeadlessProbe { state })
    }
}

impl GpuBackend for HeadlessBackend {
    fn create_shader(&mut self, id: ShaderId, stage: ShaderStage, source: &str) -> Result<(), GpuError> {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::CreateShader { id, stage });
        let reflection = reflect_stage(stage, source)?;
        s.shaders.insert(id, reflection);
        Ok(())
    }

    fn delete_shader(&mut self, id: ShaderId) -> bool {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::DeleteShader(id));
        s.shaders.remove(&id).is_some()
    }

    fn link_program(&mut self, id: ProgramId, vertex: ShaderId, fragment: ShaderId) -> Result<(), GpuError> {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::LinkProgram { id, vertex, fragment });
        let vs = s.shaders.get(&vertex).ok_or_else(|| vertex.unknown())?;
        let fs = s.shaders.get(&fragment).ok_or_else(|| fragment.unknown())?;
        let layout = ProgramLayout::link(vs, fs)?;
        let uniforms = vec![0; layout.uniform_size() as usize];
        s.programs.insert(id, HeadlessProgram { layout, uniforms });
        Ok(())
    }

    fn delete_program(&mut self, id: ProgramId) -> bool {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::DeleteProgram(id));
        s.programs.remove(&id).is_some()
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.state.lock().programs.get(&program)?.layout.location(name)
    }

    fn set_uniform(
        &mut self,
        program: ProgramId,
        location: UniformLocation,
        value: &UniformValue,
    ) -> Result<(), GpuError> {
        let mut s = self.state.lock();
        let p = s.programs.get_mut(&program).ok_or_else(|| program.unknown())?;
        let name = p.layout.slot(location).map(|slot| slot.name.clone()).unwrap_or_default();
        p.layout.encode(location, value, &mut p.uniforms)?;
        s.calls.push(GpuCall::SetUniform { program, name, value: value.clone() });
        Ok(())
    }

    fn create_texture(&mut self, id: TextureId, width: u32, height: u32) -> Result<(), GpuError> {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::CreateTexture { id, width, height });
        s.textures.insert(id, RgbaImage::new(width, height));
        Ok(())
    }

    fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.state.lock().textures.get(&id).map(|t| t.dimensions())
    }

    fn write_texture(&mut self, id: TextureId, x: u32, y: u32, image: &RgbaImage) -> Result<(), GpuError> {
        let mut s = self.state.lock();
        let (width, height) = image.dimensions();
        s.calls.push(GpuCall::WriteTexture { id, x, y, width, height });
        let tex = s.textures.get_mut(&id).ok_or_else(|| id.unknown())?;
        image::imageops::replace(tex, image, x as i64, y as i64);
        Ok(())
    }

    fn clear_texture(&mut self, id: TextureId) -> Result<(), GpuError> {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::ClearTexture(id));
        let tex = s.textures.get_mut(&id).ok_or_else(|| id.unknown())?;
        tex.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
        Ok(())
    }

    fn copy_texture(
        &mut self,
        src: TextureId,
        src_rect: IRect,
        dst: TextureId,
        dst_origin: Vec2i,
    ) -> Result<(), GpuError> {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::CopyTexture { src, src_rect, dst, dst_origin });

        let src_img = s.textures.get(&src).ok_or_else(|| src.unknown())?;
        let dst_size = s.textures.get(&dst).ok_or_else(|| dst.unknown())?.dimensions();
        let Some((rect, origin)) = clip_copy(src_img.dimensions(), src_rect, dst_size, dst_origin) else {
            return Ok(());
        };
        let region = image::imageops::crop_imm(
            src_img,
            rect.x as u32,
            rect.y as u32,
            rect.width as u32,
            rect.height as u32,
        )
        .to_image();

        let dst_img = s.textures.get_mut(&dst).ok_or_else(|| dst.unknown())?;
        image::imageops::replace(dst_img, &region, origin.x as i64, origin.y as i64);
        Ok(())
    }

    fn delete_texture(&mut self, id: TextureId) -> bool {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::DeleteTexture(id));
        s.textures.remove(&id).is_some()
    }

    fn write_vertices(&mut self, id: BufferId, vertices: &[Vertex]) -> Result<(), GpuError> {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::WriteVertices { id, quads: (vertices.len() / 4) as u32 });
        s.buffers.insert(id, vertices.to_vec());
        Ok(())
    }

    fn delete_buffer(&mut self, id: BufferId) -> bool {
        let mut s = self.state.lock();
        s.calls.push(GpuCall::DeleteBuffer(id));
        s.buffers.remove(&id).is_some()
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), GpuError> {
        let mut s = self.state.lock();
        if !s.programs.contains_key(&call.program) {
            return Err(call.program.unknown());
        }
        if !s.textures.contains_key(&call.target) {
            return Err(call.target.unknown());
        }
        let quads = s.buffers.get(&call.vertices).ok_or_else(|| call.vertices.unknown())?.len() / 4;
        if (call.first_quad + call.quad_count) as usize > quads {
            return Err(GpuError::Device(format!(
                "draw of quads {}..{} overruns a buffer of {quads}",
                call.first_quad,
                call.first_quad + call.quad_count
            )));
        }
        s.calls.push(GpuCall::Draw(call.clone()));
        Ok(())
    }
}

impl HeadlessProbe {
    pub fn calls(&self) -> Vec<GpuCall> {
        self.state.lock().calls.clone()
    }

    /// Returns and forgets the calls recorded so far.
    pub fn take_calls(&self) -> Vec<GpuCall> {
        std::mem::take(&mut self.state.lock().calls)
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                GpuCall::Draw(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn texture(&self, id: TextureId) -> Option<RgbaImage> {
        self.state.lock().textures.get(&id).cloned()
    }

    pub fn vertices(&self, id: BufferId) -> Option<Vec<Vertex>> {
        self.state.lock().buffers.get(&id).cloned()
    }

    pub fn uniform_block(&self, program: ProgramId) -> Option<Vec<u8>> {
        self.state.lock().programs.get(&program).map(|p| p.uniforms.clone())
    }

    pub fn has_shader(&self, id: ShaderId) -> bool {
        self.state.lock().shaders.contains_key(&id)
    }

    pub fn has_program(&self, id: ProgramId) -> bool {
        self.state.lock().programs.contains_key(&id)
    }

    pub fn has_texture(&self, id: TextureId) -> bool {
        self.state.lock().textures.contains_key(&id)
    }

    pub fn has_buffer(&self, id: BufferId) -> bool {
        self.state.lock().buffers.contains_key(&id)
    }
}
