//! Axis-aligned rectangle.

use tile_grid::Axis;
use vek::*;


/// Axis-aligned rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AaRect {
    /// Rect minimum (bottom-left) corner position.
    pub pos: Vec2<f32>,
    /// Rect extent from `pos`. Assumed to be non-negative.
    pub ext: Extent2<f32>,
}

impl AaRect {
    /// Rect from <0,0> to <1,1>, the shape of one tile in tile units.
    pub const UNIT_RECT: AaRect = AaRect {
        pos: Vec2 { x: 0.0, y: 0.0 },
        ext: Extent2 { w: 1.0, h: 1.0 },
    };

    pub fn new<V: Into<Vec2<f32>>>(pos: V, ext: Extent2<f32>) -> Self {
        AaRect {
            pos: pos.into(),
            ext,
        }
    }

    /// Translate self by `v`.
    pub fn translate<V: Into<Vec2<f32>>>(mut self, v: V) -> Self {
        self.pos += v.into();
        self
    }

    /// Maximum (top-right) corner position.
    pub fn max(self) -> Vec2<f32> {
        Vec2::new(self.pos.x + self.ext.w, self.pos.y + self.ext.h)
    }

    /// Minimum coordinate along `axis`.
    pub fn min_on(self, axis: Axis) -> f32 {
        self.pos[axis as usize]
    }

    /// Maximum coordinate along `axis`.
    pub fn max_on(self, axis: Axis) -> f32 {
        self.max()[axis as usize]
    }

    /// Length along `axis`.
    pub fn ext_on(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.ext.w,
            Axis::Y => self.ext.h,
        }
    }

    /// Does self intersect with `rhs`? Rects which merely touch along an edge
    /// do not intersect.
    pub fn intersects(self, rhs: AaRect) -> bool {
        let (min1, max1) = (self.pos, self.max());
        let (min2, max2) = (rhs.pos, rhs.max());
        for i in 0..2 {
            if min1[i] >= max2[i] {
                return false;
            }
            if max1[i] <= min2[i] {
                return false;
            }
        }
        true
    }

    /// Smallest rect containing both self and `rhs`.
    pub fn union(self, rhs: AaRect) -> AaRect {
        let min = Vec2::<f32>::partial_min(self.pos, rhs.pos);
        let max = Vec2::<f32>::partial_max(self.max(), rhs.max());
        AaRect {
            pos: min,
            ext: Extent2::new(max.x - min.x, max.y - min.y),
        }
    }
}


#[test]
fn test_touching_rects_do_not_intersect() {
    let a = AaRect::UNIT_RECT;
    assert!(!a.intersects(a.translate([1.0, 0.0])));
    assert!(!a.intersects(a.translate([0.0, -1.0])));
    assert!(a.intersects(a.translate([0.999, 0.0])));
    assert!(a.intersects(a.translate([-0.5, 0.5])));
}

#[test]
fn test_union() {
    let a = AaRect::new([0.0, 0.0], Extent2::new(1.0, 2.0));
    let b = AaRect::new([3.0, -1.0], Extent2::new(1.0, 1.0));
    assert_eq!(
        a.union(b),
        AaRect::new([0.0, -1.0], Extent2::new(4.0, 3.0)),
    );
}
