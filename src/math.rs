pub mod utils;

use crate::vec::{Num, Vec, Vec2i};

/// Axis aligned rectangle. For integer boxes `width` and `height` count pixels, so the last
/// covered column is `x + width - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T: Copy> BBox<T> {
    pub fn new(corner: Vec<T, 2>, size: Size<T>) -> Self {
        BBox {
            x: corner.x,
            y: corner.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn intersects(&self, other: BBox<T>) -> bool
    where
        T: Num,
    {
        let x_intersection = min(self.x + self.width, other.x + other.width) - max(self.x, other.x);
        let y_intersection = min(self.y + self.height, other.y + other.height) - max(self.y, other.y);
        x_intersection > T::zero() && y_intersection > T::zero()
    }
}

impl BBox<i32> {
    /// Smallest box holding every point.
    pub fn enclosing(points: &[Vec2i]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (lo, hi) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(BBox {
            x: lo.x,
            y: lo.y,
            width: hi.x - lo.x + 1,
            height: hi.y - lo.y + 1,
        })
    }

    /// Overlapping region of both boxes, `None` if they are disjoint.
    pub fn intersection(&self, other: BBox<i32>) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right <= x || bottom <= y {
            return None;
        }
        Some(BBox {
            x,
            y,
            width: right - x,
            height: bottom - y,
        })
    }

    /// Inclusive lower right corner.
    pub fn max_corner(&self) -> Vec2i {
        Vec2i::from([self.x + self.width - 1, self.y + self.height - 1])
    }

    pub fn min_corner(&self) -> Vec2i {
        Vec2i::from([self.x, self.y])
    }
}

impl<T: Copy> From<(Vec<T, 2>, Size<T>)> for BBox<T> {
    fn from((corner, size): (Vec<T, 2>, Size<T>)) -> Self {
        BBox::new(corner, size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }
}

fn min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

fn max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosing() {
        let pts = [
            Vec2i::from([3, 1]),
            Vec2i::from([-2, 4]),
            Vec2i::from([5, 0]),
        ];
        let bbox = BBox::enclosing(&pts).unwrap();
        assert_eq!(bbox, BBox { x: -2, y: 0, width: 8, height: 5 });
        assert_eq!(bbox.max_corner(), Vec2i::from([5, 4]));
        assert_eq!(BBox::enclosing(&[]), None);
    }

    #[test]
    fn test_intersection() {
        let screen = BBox { x: 0, y: 0, width: 8, height: 8 };
        let tri = BBox { x: -2, y: 6, width: 4, height: 10 };
        assert_eq!(
            screen.intersection(tri),
            Some(BBox { x: 0, y: 6, width: 2, height: 2 })
        );
        assert!(screen.intersects(tri));

        let far = BBox { x: 8, y: 0, width: 3, height: 3 };
        assert_eq!(screen.intersection(far), None);
        assert!(!screen.intersects(far));
    }
}
