use tessera_engine::Bitmap;

/// Tile sheet classes, in bitmap-slot order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TileSheet {
    A1,
    A2,
    A3,
    A4,
    A5,
    B,
    C,
    D,
    E,
}

impl TileSheet {
    pub const COUNT: usize = 9;

    pub const ALL: [TileSheet; Self::COUNT] = [
        TileSheet::A1,
        TileSheet::A2,
        TileSheet::A3,
        TileSheet::A4,
        TileSheet::A5,
        TileSheet::B,
        TileSheet::C,
        TileSheet::D,
        TileSheet::E,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<TileSheet> {
        Self::ALL.get(index).copied()
    }
}

/// The tilemap's bitmap slots. Any slot may be empty.
#[derive(Clone, Default)]
pub struct BitmapSet {
    slots: [Option<Bitmap>; TileSheet::COUNT],
}

impl BitmapSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sheet: TileSheet) -> Option<&Bitmap> {
        self.slots[sheet.index()].as_ref()
    }

    /// Replaces a slot. Returns false when `bitmap` is the one already there.
    pub fn set(&mut self, sheet: TileSheet, bitmap: Option<Bitmap>) -> bool {
        let slot = &mut self.slots[sheet.index()];
        let same = match (slot.as_ref(), bitmap.as_ref()) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        };
        if !same {
            *slot = bitmap;
        }
        !same
    }

    /// Bitmaps that can be sampled: present and not disposed.
    pub fn live(&self, sheet: TileSheet) -> Option<&Bitmap> {
        self.get(sheet).filter(|b| !b.is_disposed())
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_engine::config::RendererConfig;
    use tessera_engine::RenderRunner;

    #[test]
    fn sheet_indices_round_trip() {
        for sheet in TileSheet::ALL {
            assert_eq!(TileSheet::from_index(sheet.index()), Some(sheet));
        }
        assert_eq!(TileSheet::from_index(TileSheet::COUNT), None);
        assert_eq!(TileSheet::E.index(), 8);
    }

    #[test]
    fn set_reports_identity_changes_only() {
        let (runner, _) = RenderRunner::headless(RendererConfig::default()).unwrap();
        let bitmap = Bitmap::new(&runner, 8, 8);
        let mut set = BitmapSet::new();

        assert!(!set.set(TileSheet::B, None));
        assert!(set.set(TileSheet::B, Some(bitmap.clone())));
        assert!(!set.set(TileSheet::B, Some(bitmap.clone())));
        assert!(set.set(TileSheet::B, Some(Bitmap::new(&runner, 8, 8))));
        assert!(set.set(TileSheet::B, None));
    }

    #[test]
    fn disposed_bitmaps_are_not_live() {
        let (runner, _) = RenderRunner::headless(RendererConfig::default()).unwrap();
        let bitmap = Bitmap::new(&runner, 8, 8);
        let mut set = BitmapSet::new();
        set.set(TileSheet::A1, Some(bitmap.clone()));
        assert!(set.live(TileSheet::A1).is_some());

        bitmap.dispose();
        assert!(set.get(TileSheet::A1).is_some());
        assert!(set.live(TileSheet::A1).is_none());
    }
}
