/// Content format generation of the map data.
///
/// The generations differ in how raised-table autotiles are recognized and in whether
/// the shadow layer exists.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatVersion {
    Rgss1,
    Rgss2,
    #[default]
    Rgss3,
}

impl FormatVersion {
    /// Whether map layer 3 carries shadow masks and the atlas holds the shadow set.
    pub fn has_shadows(self) -> bool {
        self >= FormatVersion::Rgss3
    }

    /// Whether table autotiles are marked by [`TABLE_FLAG`] rather than guessed from
    /// the tile code.
    pub fn has_table_flag(self) -> bool {
        self >= FormatVersion::Rgss3
    }
}

/// Flag bit: the tile is drawn above characters (layer 2 only).
pub const OVER_PLAYER_FLAG: i16 = 0x10;

/// Flag bit: the A2 autotile is a raised table.
pub const TABLE_FLAG: i16 = 0x80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilemapConfig {
    /// Edge length of one map cell in pixels.
    pub tile_size: u32,
    pub version: FormatVersion,
}

impl Default for TilemapConfig {
    fn default() -> Self {
        Self { tile_size: 32, version: FormatVersion::Rgss3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_format_has_shadows_and_table_flags() {
        assert!(FormatVersion::Rgss3.has_shadows());
        assert!(FormatVersion::Rgss3.has_table_flag());
        for old in [FormatVersion::Rgss1, FormatVersion::Rgss2] {
            assert!(!old.has_shadows());
            assert!(!old.has_table_flag());
        }
    }
}
