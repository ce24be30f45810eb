//! Frame clocks for autotile animation and the flash overlay.

use tessera_engine::coords::Vec2;

/// Ticks per full animation cycle.
pub const ANIMATION_PERIOD: u32 = 360;

/// Ticks spent on one animation phase.
const PHASE_TICKS: u32 = 30;

/// Regular water cycles back and forth over three frames.
const REGULAR_PHASES: [u32; 12] = [0, 1, 2, 1, 0, 1, 2, 1, 0, 1, 2, 1];

/// Waterfalls roll forward over three frames.
const WATERFALL_PHASES: [u32; 12] = [0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2];

/// Counts update ticks and derives the autotile animation phases.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AnimationClock {
    frame: u32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.frame += 1;
        if self.frame >= ANIMATION_PERIOD {
            self.frame = 0;
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Frame (0 to 2) of regular A1 autotiles.
    pub fn regular_phase(&self) -> u32 {
        REGULAR_PHASES[(self.frame / PHASE_TICKS) as usize]
    }

    /// Frame (0 to 2) of waterfall autotiles.
    pub fn waterfall_phase(&self) -> u32 {
        WATERFALL_PHASES[(self.frame / PHASE_TICKS) as usize]
    }

    /// Atlas pixel offset applied by the tile shader: regular frames sit two cells
    /// apart horizontally, waterfall frames one cell apart vertically.
    pub fn offset(&self, tile_size: u32) -> Vec2 {
        let ts = tile_size as f32;
        Vec2::new(self.regular_phase() as f32 * 2.0 * ts, self.waterfall_phase() as f32 * ts)
    }
}

/// Alpha levels of the flash overlay: fade in, then out.
pub const FLASH_ALPHA: [u8; 32] = [
    0x78, 0x78, 0x78, 0x78, 0x96, 0x96, 0x96, 0x96, //
    0xB4, 0xB4, 0xB4, 0xB4, 0xD2, 0xD2, 0xD2, 0xD2, //
    0xF0, 0xF0, 0xF0, 0xF0, 0xD2, 0xD2, 0xD2, 0xD2, //
    0xB4, 0xB4, 0xB4, 0xB4, 0x96, 0x96, 0x96, 0x96,
];

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FlashClock {
    index: usize,
}

impl FlashClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.index += 1;
        if self.index >= FLASH_ALPHA.len() {
            self.index = 0;
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Overlay opacity in [0, 0.5].
    pub fn alpha(&self) -> f32 {
        f32::from(FLASH_ALPHA[self.index]) / 255.0 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_wraps_after_a_full_period() {
        let mut clock = AnimationClock::new();
        let start = clock.offset(32);
        for _ in 0..ANIMATION_PERIOD - 1 {
            clock.tick();
        }
        assert_eq!(clock.frame(), ANIMATION_PERIOD - 1);
        clock.tick();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.offset(32), start);
    }

    #[test]
    fn phases_follow_their_cadence() {
        let mut clock = AnimationClock::new();
        let mut regular = Vec::new();
        let mut waterfall = Vec::new();
        for tick in 0..ANIMATION_PERIOD {
            if tick % PHASE_TICKS == 0 {
                regular.push(clock.regular_phase());
                waterfall.push(clock.waterfall_phase());
            }
            clock.tick();
        }
        assert_eq!(regular, REGULAR_PHASES);
        assert_eq!(waterfall, WATERFALL_PHASES);
    }

    #[test]
    fn offset_scales_with_tile_size() {
        let mut clock = AnimationClock::new();
        for _ in 0..60 {
            clock.tick();
        }
        // Third bucket: regular phase 2, waterfall phase 2.
        assert_eq!(clock.offset(32), Vec2::new(128.0, 64.0));
        assert_eq!(clock.offset(16), Vec2::new(64.0, 32.0));
    }

    #[test]
    fn flash_wraps_after_thirty_two_ticks() {
        let mut clock = FlashClock::new();
        let start = clock.alpha();
        for _ in 0..FLASH_ALPHA.len() {
            clock.tick();
        }
        assert_eq!(clock.index(), 0);
        assert_eq!(clock.alpha(), start);
    }

    #[test]
    fn flash_fades_in_then_out() {
        let peak = FLASH_ALPHA.iter().position(|&a| a == 0xF0).unwrap();
        assert!(FLASH_ALPHA[..=peak].windows(2).all(|w| w[0] <= w[1]));
        assert!(FLASH_ALPHA[peak..].windows(2).all(|w| w[0] >= w[1]));

        let clock = FlashClock::new();
        assert!((clock.alpha() - 120.0 / 255.0 / 2.0).abs() < f32::EPSILON);
    }
}
