//! Tessera tilemap.
//!
//! Turns sparse tile-code tables into textured quads: an atlas assembled from the
//! tile sheets, autotile decoding, two vertex batches (ground and above-player),
//! animation and flash clocks, and a [`Tilemap`] drawable that rebuilds only what
//! changed.

pub mod anim;
pub mod atlas;
pub mod autotile;
pub mod builder;
pub mod config;
pub mod error;
pub mod flash;
pub mod sheets;
pub mod table;
pub mod tilemap;
pub mod window;

pub use config::{FormatVersion, TilemapConfig};
pub use error::TilemapError;
pub use sheets::TileSheet;
pub use table::Table;
pub use tilemap::Tilemap;
pub use window::ViewportInfo;
