use std::collections::BTreeMap;

use crate::coords::IRect;

use super::{BlendConfig, ProgramId, TextureId};

/// Render-thread mirror of the bound GPU state.
///
/// Owned by the render context, so only tasks ever touch it. Setters report whether
/// the value actually changed, letting callers skip redundant work.
#[derive(Debug, Clone)]
pub struct GpuStateCache {
    program: Option<ProgramId>,
    blend: Option<BlendConfig>,
    viewport: IRect,
    target: TextureId,
    texture_units: BTreeMap<u32, TextureId>,
}

impl GpuStateCache {
    pub fn new(target: TextureId, viewport: IRect) -> Self {
        Self {
            program: None,
            blend: None,
            viewport,
            target,
            texture_units: BTreeMap::new(),
        }
    }

    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    pub fn set_program(&mut self, program: Option<ProgramId>) -> bool {
        let changed = self.program != program;
        self.program = program;
        changed
    }

    pub fn blend(&self) -> Option<BlendConfig> {
        self.blend
    }

    pub fn set_blend(&mut self, blend: BlendConfig) -> bool {
        let changed = self.blend != Some(blend);
        self.blend = Some(blend);
        changed
    }

    pub fn viewport(&self) -> IRect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: IRect) -> bool {
        let changed = self.viewport != viewport;
        self.viewport = viewport;
        changed
    }

    pub fn target(&self) -> TextureId {
        self.target
    }

    pub fn set_target(&mut self, target: TextureId) -> bool {
        let changed = self.target != target;
        self.target = target;
        changed
    }

    pub fn texture_unit(&self, unit: u32) -> Option<TextureId> {
        self.texture_units.get(&unit).copied()
    }

    pub fn bind_texture(&mut self, unit: u32, texture: TextureId) -> bool {
        self.texture_units.insert(unit, texture) != Some(texture)
    }

    /// Forgets every reference to a deleted program or texture.
    pub(crate) fn forget_program(&mut self, program: ProgramId) {
        if self.program == Some(program) {
            self.program = None;
        }
    }

    pub(crate) fn forget_texture(&mut self, texture: TextureId) {
        self.texture_units.retain(|_, t| *t != texture);
    }
}
