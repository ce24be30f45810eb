use crate::bitmap::Bitmap;
use crate::error::RenderError;
use crate::gpu::{BlendConfig, TextureId, UniformLocation, UniformValue};
use crate::worker::{DrawQuads, ProgramHandles, RenderHandle};

/// Compiled WGSL program plus its blend state.
///
/// Parameter setters are fire-and-forget: they bind this program, then write to it,
/// on the render thread. FIFO execution makes them visible to the next draw.
pub struct ShaderProgram {
    runner: RenderHandle,
    handles: ProgramHandles,
    blend: BlendConfig,
    linked: bool,
    disposed: bool,
}

impl ShaderProgram {
    /// Creates an empty program. Nothing exists on the GPU until [`compile`](Self::compile).
    pub fn new(runner: &RenderHandle) -> Self {
        let ids = runner.handles();
        Self {
            handles: ProgramHandles {
                vertex: ids.shader(),
                fragment: ids.shader(),
                program: ids.program(),
            },
            runner: runner.clone(),
            blend: BlendConfig::default(),
            linked: false,
            disposed: false,
        }
    }

    /// Compiles and links both stages, waiting for the render thread.
    ///
    /// On failure the program stays unlinked until a later compile succeeds.
    pub fn compile(&mut self, vertex_source: &str, fragment_source: &str) -> Result<(), RenderError> {
        self.ensure_live()?;
        let handles = self.handles;
        let vs = vertex_source.to_owned();
        let fs = fragment_source.to_owned();

        let result = self
            .runner
            .call(move |ctx| ctx.compile_program(handles, &vs, &fs))
            .and_then(|r| r);
        self.linked = result.is_ok();
        if let Err(err) = &result {
            log::warn!("ShaderProgram: compile failed: {err}");
        }
        result
    }

    /// Relinks the current stages into a new program object, waiting for the render
    /// thread. Uniform locations and texture units must be set again afterwards.
    pub fn reset(&mut self) -> Result<(), RenderError> {
        self.ensure_live()?;
        let handles = self.handles;
        let result = self.runner.call(move |ctx| ctx.relink_program(handles)).and_then(|r| r);
        self.linked = result.is_ok();
        if let Err(err) = &result {
            log::warn!("ShaderProgram: relink failed: {err}");
        }
        result
    }

    pub fn is_linked(&self) -> bool {
        self.linked && !self.disposed
    }

    pub fn handles(&self) -> ProgramHandles {
        self.handles
    }

    pub fn blend(&self) -> BlendConfig {
        self.blend
    }

    /// Sets the blend state used by later draws. Survives recompilation.
    pub fn set_blend(&mut self, blend: BlendConfig) {
        self.blend = blend;
    }

    /// Makes this the active program on the render thread.
    pub fn bind(&self) {
        if self.skip_disposed("bind") {
            return;
        }
        let program = self.handles.program;
        self.runner.post(move |ctx| {
            ctx.bind_program(program);
            Ok(())
        });
    }

    /// Memoized location lookup; waits for the render thread.
    pub fn uniform_location(&self, name: &str) -> Result<Option<UniformLocation>, RenderError> {
        self.ensure_live()?;
        let program = self.handles.program;
        let name = name.to_owned();
        self.runner.call(move |ctx| ctx.uniform_location(program, &name))
    }

    // ── parameters ───────────────────────────────────────────────────────

    /// Sets a float, vec2, vec3 or vec4 uniform.
    pub fn set_param_f32(&self, name: &str, values: &[f32]) {
        self.set_param(name, UniformValue::float(values));
    }

    /// Sets an array of float vectors with `components` floats per element.
    pub fn set_param_f32_array(&self, name: &str, components: u8, values: &[f32]) {
        self.set_param(name, UniformValue::Float { components, values: values.to_vec() });
    }

    /// Sets an int, ivec2, ivec3 or ivec4 uniform.
    pub fn set_param_i32(&self, name: &str, values: &[i32]) {
        self.set_param(name, UniformValue::int(values));
    }

    pub fn set_param_i32_array(&self, name: &str, components: u8, values: &[i32]) {
        self.set_param(name, UniformValue::Int { components, values: values.to_vec() });
    }

    /// Sets a `dim`x`dim` matrix (or array of them). Values are column-major unless
    /// `transpose` is set.
    pub fn set_param_matrix(&self, name: &str, dim: u8, transpose: bool, values: &[f32]) {
        self.set_param(name, UniformValue::Matrix { dim, transpose, values: values.to_vec() });
    }

    pub fn set_param(&self, name: &str, value: UniformValue) {
        if self.skip_disposed(name) {
            return;
        }
        let program = self.handles.program;
        let name = name.to_owned();
        self.runner.post(move |ctx| {
            ctx.bind_program(program);
            ctx.set_uniform(&name, &value)
        });
    }

    /// Attaches `bitmap` to texture `unit`, sampled through the texture named `name`.
    pub fn set_texture(&self, name: &str, bitmap: &Bitmap, unit: u32) {
        self.set_texture_id(name, bitmap.texture(), unit);
    }

    pub fn set_texture_id(&self, name: &str, texture: TextureId, unit: u32) {
        if self.skip_disposed(name) {
            return;
        }
        let program = self.handles.program;
        let name = name.to_owned();
        self.runner.post(move |ctx| ctx.set_texture_unit(program, &name, unit, texture));
    }

    // ── drawing ──────────────────────────────────────────────────────────

    /// Draws a quad range with this program on the current target.
    pub fn draw(&self, quads: DrawQuads) {
        if self.skip_disposed("draw") {
            return;
        }
        let program = self.handles.program;
        let blend = self.blend;
        self.runner.post(move |ctx| ctx.draw_program(program, blend, quads));
    }

    // ── lifecycle ────────────────────────────────────────────────────────

    /// Releases the GPU objects. Asynchronous; `sync()` to wait for it.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.linked = false;
        let handles = self.handles;
        self.runner.post(move |ctx| {
            ctx.dispose_program(handles);
            Ok(())
        });
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> Result<(), RenderError> {
        if self.disposed {
            Err(RenderError::Disposed)
        } else {
            Ok(())
        }
    }

    fn skip_disposed(&self, what: &str) -> bool {
        if self.disposed {
            log::debug!("ShaderProgram: ignoring `{what}` on a disposed program");
        }
        self.disposed
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.dispose();
    }
}
