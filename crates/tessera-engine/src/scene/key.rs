use core::cmp::Ordering;

use super::{LayerSlot, ZIndex};

/// Position of one drawable layer in the composite order.
///
/// Layers sort by `z` first; equal depths keep the order in which the frame
/// registered them, so a tilemap's ground layer stays below a sprite added after it
/// at the same depth.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    /// Depth of the layer. Lower values are composited first.
    pub z: ZIndex,
    /// Registration index across every layer of the frame.
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }

    /// Key for `slot`, the `order`-th layer registered this frame.
    #[inline]
    pub const fn for_layer(slot: &LayerSlot, order: u32) -> Self {
        Self::new(slot.z, order)
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.z.cmp(&other.z).then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_wins_over_registration() {
        let ground = SortKey::for_layer(&LayerSlot { z: ZIndex(0), visible: true }, 5);
        let above = SortKey::for_layer(&LayerSlot { z: ZIndex(200), visible: true }, 0);
        assert!(ground < above);
        assert!(SortKey::new(ZIndex(0), 1) < SortKey::new(ZIndex(0), 2));
    }
}
