//! Composite ordering.
//!
//! Responsibilities:
//! - deterministic back-to-front ordering (z-index + registration order)
//! - the two-phase `before_composite` / `composite` frame contract

mod drawable;
mod key;
mod z_index;

pub use drawable::{composite_frame, paint_order, Drawable, LayerSlot};
pub use key::SortKey;
pub use z_index::ZIndex;
