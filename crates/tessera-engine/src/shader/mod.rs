//! Shader program objects.
//!
//! A [`ShaderProgram`] is the logic-side handle of a vertex + fragment program. All of
//! its GPU work runs as tasks on the render thread; only `compile` and `reset` wait
//! for completion.

mod program;

pub use program::ShaderProgram;
pub use crate::worker::DrawQuads;
