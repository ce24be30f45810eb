use super::Vec2;

/// Axis-aligned float rectangle (top-left origin).
///
/// Used for quad geometry: texture rectangles in atlas pixels and destination
/// rectangles in target pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Returns the rectangle moved by `delta`.
    #[inline]
    pub fn translated(self, delta: Vec2) -> Self {
        Self { origin: self.origin + delta, size: self.size }
    }

    /// Returns the four corners in quad order: top-left, top-right, bottom-right,
    /// bottom-left.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
            Vec2::new(min.x, max.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    #[test]
    fn max_is_origin_plus_size() {
        assert_eq!(r(1.0, 2.0, 10.0, 20.0).max(), Vec2::new(11.0, 22.0));
    }

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(r(0.0, 0.0, 5.0, 0.0).is_empty());
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn corners_wind_clockwise_from_top_left() {
        let c = r(2.0, 4.0, 6.0, 8.0).corners();
        assert_eq!(c[0], Vec2::new(2.0, 4.0));
        assert_eq!(c[1], Vec2::new(8.0, 4.0));
        assert_eq!(c[2], Vec2::new(8.0, 12.0));
        assert_eq!(c[3], Vec2::new(2.0, 12.0));
    }

    #[test]
    fn translated_keeps_size() {
        let t = r(1.0, 1.0, 3.0, 3.0).translated(Vec2::new(-1.0, 2.0));
        assert_eq!(t, r(0.0, 3.0, 3.0, 3.0));
    }
}
