//! Command channel.
//!
//! A dedicated render thread owns every GPU object and the [`RenderContext`]. Other
//! threads reach it only by posting tasks through a [`RenderHandle`] and waiting on
//! the fence with [`RenderHandle::sync`].
//!
//! Ordering is global FIFO across producers. There is no cancellation and no retry:
//! a posted task always runs, and a failing task is logged (and passed to the error
//! hook) before the next one starts.

mod context;
mod runner;

pub use context::{ortho_projection, DrawQuads, ProgramHandles, RenderContext, PROJECTION_UNIFORM};
pub use runner::{ErrorHook, RenderHandle, RenderRunner, RenderTask};
