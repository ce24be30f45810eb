//! GPU abstraction.
//!
//! The render worker talks to the GPU through [`GpuBackend`], a GL-shaped command
//! surface keyed by opaque handles. Two implementations exist:
//! - [`WgpuBackend`]: real device
//! - [`HeadlessBackend`]: CPU textures and recorded draws, for tests and tooling

mod backend;
mod handles;
mod headless;
mod reflect;
mod state;
mod types;
mod wgpu_backend;

pub use backend::{clip_copy, GpuBackend};
pub use handles::{BufferId, HandleAllocator, ProgramId, ShaderId, TextureId};
pub use headless::{GpuCall, HeadlessBackend, HeadlessProbe};
pub use reflect::{reflect_stage, ProgramLayout, ProgramSlot, ScalarKind, SlotKind, StageReflection, UniformSlot};
pub use state::GpuStateCache;
pub use types::{
    BlendConfig, BlendEquation, BlendFactor, DrawCall, ShaderStage, TextureBinding, UniformLocation,
    UniformValue, Vertex,
};
pub use wgpu_backend::WgpuBackend;
