use std::collections::{BTreeMap, HashMap};

use crate::coords::IRect;
use crate::error::RenderError;
use crate::gpu::{
    BlendConfig, BufferId, DrawCall, GpuBackend, GpuStateCache, ProgramId, ShaderId, ShaderStage,
    TextureBinding, TextureId, UniformLocation, UniformValue,
};

/// Uniform receiving the orthographic projection before every draw.
pub const PROJECTION_UNIFORM: &str = "projection";

/// The three GPU objects behind one shader program.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProgramHandles {
    pub vertex: ShaderId,
    pub fragment: ShaderId,
    pub program: ProgramId,
}

/// A range of quads in a vertex buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawQuads {
    pub buffer: BufferId,
    pub first_quad: u32,
    pub quad_count: u32,
}

#[derive(Debug, Copy, Clone)]
struct TextureUnit {
    texture: TextureId,
    location: Option<UniformLocation>,
}

/// Render-side half of a shader program.
#[derive(Debug, Default)]
struct ProgramRecord {
    vertex: Option<ShaderId>,
    fragment: Option<ShaderId>,
    linked: bool,
    locations: HashMap<String, Option<UniformLocation>>,
    texture_units: BTreeMap<u32, TextureUnit>,
}

impl ProgramRecord {
    fn invalidate(&mut self) {
        self.linked = false;
        self.locations.clear();
        self.texture_units.clear();
    }
}

/// Everything a render task may touch.
///
/// Lives on the render thread for the lifetime of the worker; tasks receive it by
/// mutable reference.
pub struct RenderContext {
    backend: Box<dyn GpuBackend>,
    state: GpuStateCache,
    programs: HashMap<ProgramId, ProgramRecord>,
    screen: TextureId,
}

impl RenderContext {
    pub(crate) fn new(
        mut backend: Box<dyn GpuBackend>,
        screen: TextureId,
        resolution: (u32, u32),
    ) -> Result<Self, RenderError> {
        let (w, h) = resolution;
        backend.create_texture(screen, w, h)?;
        Ok(Self {
            backend,
            state: GpuStateCache::new(screen, IRect::new(0, 0, w as i32, h as i32)),
            programs: HashMap::new(),
            screen,
        })
    }

    pub fn backend(&mut self) -> &mut dyn GpuBackend {
        self.backend.as_mut()
    }

    pub fn state(&self) -> &GpuStateCache {
        &self.state
    }

    /// The default render target, sized by `RendererConfig::resolution`.
    pub fn screen(&self) -> TextureId {
        self.screen
    }

    pub fn set_viewport(&mut self, viewport: IRect) {
        self.state.set_viewport(viewport);
    }

    pub fn set_target(&mut self, target: TextureId) {
        self.state.set_target(target);
    }

    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.backend.texture_size(id)
    }

    /// Creates the texture unless it already exists with this size.
    pub fn ensure_texture(&mut self, id: TextureId, width: u32, height: u32) -> Result<(), RenderError> {
        if self.backend.texture_size(id) == Some((width, height)) {
            return Ok(());
        }
        self.backend.create_texture(id, width, height)?;
        Ok(())
    }

    pub fn delete_texture(&mut self, id: TextureId) -> bool {
        self.state.forget_texture(id);
        self.backend.delete_texture(id)
    }

    // ── programs ─────────────────────────────────────────────────────────

    /// Replaces the program's stages and links them.
    ///
    /// On failure the program keeps whatever objects were created so far and stays
    /// unlinked.
    pub fn compile_program(
        &mut self,
        handles: ProgramHandles,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<(), RenderError> {
        let record = self.programs.entry(handles.program).or_default();
        record.invalidate();

        if self.backend.delete_program(handles.program) {
            self.state.forget_program(handles.program);
        }
        if record.vertex.take().is_some() {
            self.backend.delete_shader(handles.vertex);
        }
        if record.fragment.take().is_some() {
            self.backend.delete_shader(handles.fragment);
        }

        self.backend.create_shader(handles.vertex, ShaderStage::Vertex, vertex_source)?;
        record.vertex = Some(handles.vertex);
        self.backend.create_shader(handles.fragment, ShaderStage::Fragment, fragment_source)?;
        record.fragment = Some(handles.fragment);

        self.backend.link_program(handles.program, handles.vertex, handles.fragment)?;
        record.linked = true;
        Ok(())
    }

    /// Relinks the existing stages into a fresh program object.
    pub fn relink_program(&mut self, handles: ProgramHandles) -> Result<(), RenderError> {
        let Some(record) = self.programs.get_mut(&handles.program) else {
            return Err(RenderError::ProgramNotLinked(handles.program));
        };
        let (Some(vertex), Some(fragment)) = (record.vertex, record.fragment) else {
            return Err(RenderError::ProgramNotLinked(handles.program));
        };
        record.invalidate();

        if self.backend.delete_program(handles.program) {
            self.state.forget_program(handles.program);
        }
        self.backend.link_program(handles.program, vertex, fragment)?;
        record.linked = true;
        Ok(())
    }

    pub fn is_linked(&self, program: ProgramId) -> bool {
        self.programs.get(&program).is_some_and(|r| r.linked)
    }

    /// Makes `program` the active program.
    pub fn bind_program(&mut self, program: ProgramId) {
        self.state.set_program(Some(program));
    }

    /// Memoized location lookup. `None` for unknown names and unlinked programs.
    pub fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let record = self.programs.get_mut(&program)?;
        if !record.linked {
            return None;
        }
        if let Some(cached) = record.locations.get(name) {
            return *cached;
        }
        let location = self.backend.uniform_location(program, name);
        record.locations.insert(name.to_owned(), location);
        location
    }

    /// Writes a uniform of the active program.
    ///
    /// Unknown names are ignored, like writes to location -1.
    pub fn set_uniform(&mut self, name: &str, value: &UniformValue) -> Result<(), RenderError> {
        let Some(program) = self.state.program() else {
            return Err(RenderError::NoActiveProgram);
        };
        value
            .validate()
            .map_err(|reason| RenderError::InvalidParam { name: name.to_owned(), reason })?;

        let Some(location) = self.uniform_location(program, name) else {
            log::trace!("RenderContext: `{name}` is not a uniform of {program:?}");
            return Ok(());
        };
        self.backend.set_uniform(program, location, value)?;
        Ok(())
    }

    /// Records `texture` on `unit` of `program`; it is bound to the slot `name` at
    /// every draw for as long as the texture exists.
    pub fn set_texture_unit(
        &mut self,
        program: ProgramId,
        name: &str,
        unit: u32,
        texture: TextureId,
    ) -> Result<(), RenderError> {
        if !self.is_linked(program) {
            return Err(RenderError::ProgramNotLinked(program));
        }
        let location = self.uniform_location(program, name);
        if let Some(record) = self.programs.get_mut(&program) {
            record.texture_units.insert(unit, TextureUnit { texture, location });
        }
        Ok(())
    }

    /// Draws with `program`: applies the projection for the current viewport, binds
    /// every live texture unit, and issues the draw on the current target.
    pub fn draw_program(
        &mut self,
        program: ProgramId,
        blend: BlendConfig,
        quads: DrawQuads,
    ) -> Result<(), RenderError> {
        if !self.is_linked(program) {
            return Err(RenderError::ProgramNotLinked(program));
        }
        self.bind_program(program);

        let viewport = self.state.viewport();
        if let Some(location) = self.uniform_location(program, PROJECTION_UNIFORM) {
            let projection = ortho_projection(viewport.width, viewport.height);
            self.backend.set_uniform(program, location, &projection)?;
        }

        let units: Vec<(u32, TextureUnit)> = self
            .programs
            .get(&program)
            .map(|r| r.texture_units.iter().map(|(u, t)| (*u, *t)).collect())
            .unwrap_or_default();
        let mut textures = Vec::with_capacity(units.len());
        for (unit, bound) in units {
            // Disposed textures are skipped, not errors.
            let Some(location) = bound.location else { continue };
            if self.backend.texture_size(bound.texture).is_none() {
                continue;
            }
            self.state.bind_texture(unit, bound.texture);
            textures.push(TextureBinding { unit, location, texture: bound.texture });
        }

        self.state.set_blend(blend);
        self.backend.draw(&DrawCall {
            program,
            target: self.state.target(),
            viewport,
            vertices: quads.buffer,
            first_quad: quads.first_quad,
            quad_count: quads.quad_count,
            blend,
            textures,
        })?;
        Ok(())
    }

    /// Releases the program's objects, each only if it was created.
    pub fn dispose_program(&mut self, handles: ProgramHandles) {
        let Some(record) = self.programs.remove(&handles.program) else {
            return;
        };
        if record.vertex.is_some() {
            self.backend.delete_shader(handles.vertex);
        }
        if record.fragment.is_some() {
            self.backend.delete_shader(handles.fragment);
        }
        if record.linked {
            self.backend.delete_program(handles.program);
        }
        self.state.forget_program(handles.program);
    }
}

/// Column-major orthographic projection mapping `[0, w] x [0, h]` onto `[-1, 1]`.
pub fn ortho_projection(width: i32, height: i32) -> UniformValue {
    let a = 2.0 / width.max(1) as f32;
    let b = 2.0 / height.max(1) as f32;
    let c = -2.0;
    #[rustfmt::skip]
    let values = vec![
        a,    0.0,  0.0,  0.0,
        0.0,  b,    0.0,  0.0,
        0.0,  0.0,  c,    0.0,
        -1.0, -1.0, -1.0, 1.0,
    ];
    UniformValue::Matrix { dim: 4, transpose: false, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_maps_viewport_corners() {
        let UniformValue::Matrix { values, .. } = ortho_projection(640, 480) else {
            panic!("not a matrix");
        };
        // Column-major: x' = a*x + tx.
        let project = |x: f32, y: f32| (values[0] * x + values[12], values[5] * y + values[13]);
        assert_eq!(project(0.0, 0.0), (-1.0, -1.0));
        assert_eq!(project(640.0, 480.0), (1.0, 1.0));
        assert_eq!(values[10], -2.0);
        assert_eq!(values[14], -1.0);
    }

    #[test]
    fn projection_tolerates_empty_viewport() {
        let UniformValue::Matrix { values, .. } = ortho_projection(0, 0) else {
            panic!("not a matrix");
        };
        assert!(values.iter().all(|v| v.is_finite()));
    }
}
