use core::ops::{Add, Sub};

/// Integer 2D vector (pixels or tiles, depending on context).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2i {
    type Output = Vec2i;
    #[inline]
    fn add(self, rhs: Vec2i) -> Vec2i {
        Vec2i::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2i {
    type Output = Vec2i;
    #[inline]
    fn sub(self, rhs: Vec2i) -> Vec2i {
        Vec2i::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Integer rectangle: viewports, copy regions and tile windows.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IRect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub const fn position(self) -> Vec2i {
        Vec2i::new(self.x, self.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2i) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }

    #[inline]
    pub fn intersect(self, other: IRect) -> Option<IRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(IRect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_overlapping() {
        let a = IRect::new(0, 0, 10, 10);
        let b = IRect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(b), Some(IRect::new(5, 5, 5, 5)));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        let a = IRect::new(0, 0, 10, 10);
        let b = IRect::new(10, 0, 10, 10);
        assert!(a.intersect(b).is_none());
    }

    #[test]
    fn contains_is_half_open() {
        let r = IRect::new(0, 0, 4, 4);
        assert!(r.contains(Vec2i::new(0, 0)));
        assert!(r.contains(Vec2i::new(3, 3)));
        assert!(!r.contains(Vec2i::new(4, 3)));
    }

    #[test]
    fn vec2i_arithmetic() {
        assert_eq!(Vec2i::new(3, -2) + Vec2i::new(1, 1), Vec2i::new(4, -1));
        assert_eq!(Vec2i::new(3, -2) - Vec2i::new(1, 1), Vec2i::new(2, -3));
    }
}
