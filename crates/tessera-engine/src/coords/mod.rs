//! Coordinate and geometry types shared by the worker, shaders and the tilemap.
//!
//! Canonical CPU space:
//! - Pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Tile-space values use the same types; the unit is stated at each use site.

mod irect;
mod rect;
mod vec2;

pub use irect::{IRect, Vec2i};
pub use rect::Rect;
pub use vec2::Vec2;
