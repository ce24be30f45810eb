//! Tessera engine crate.
//!
//! Rendering core shared by higher layers: the render worker and its command
//! channel, GPU backends, shader programs, bitmaps and composite ordering.

pub mod bitmap;
pub mod config;
pub mod coords;
pub mod error;
pub mod gpu;
pub mod logging;
pub mod observer;
pub mod scene;
pub mod shader;
pub mod worker;

pub use bitmap::Bitmap;
pub use error::{GpuError, RenderError};
pub use shader::ShaderProgram;
pub use worker::{RenderContext, RenderHandle, RenderRunner};
