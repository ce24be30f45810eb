use thiserror::Error;

use crate::gpu::{ProgramId, ShaderStage};

/// Failures reported by a [`GpuBackend`](crate::gpu::GpuBackend).
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("program failed to link: {0}")]
    Link(String),

    #[error("unknown {kind} handle #{id}")]
    UnknownResource { kind: &'static str, id: u64 },

    #[error("invalid uniform value: {0}")]
    InvalidUniform(String),

    #[error("device error: {0}")]
    Device(String),
}

/// Failures surfaced by the render worker and the objects built on it.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error("render worker has stopped")]
    WorkerStopped,

    #[error("render task panicked: {0}")]
    TaskPanicked(String),

    #[error("failed to initialize render backend: {0}")]
    Init(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam { name: String, reason: String },

    #[error("no program is bound")]
    NoActiveProgram,

    #[error("program {0:?} is not linked")]
    ProgramNotLinked(ProgramId),

    #[error("resource has been disposed")]
    Disposed,
}
