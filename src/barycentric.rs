//! Barycentric coordinates under the convention `P = w*A + u*B + v*C`, so `w` weighs the
//! first vertex, `u` the second and `v` the third.

use std::ops::{Add, Mul};

use crate::vec::{Vec, Vec2};

pub use macros::Interpolate;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Barycentric {
    pub u: f32,
    pub v: f32,
    pub w: f32,
}

impl Barycentric {
    pub fn new(u: f32, v: f32) -> Self {
        Barycentric { u, v, w: 1. - u - v }
    }

    /// Builds the coordinates from the three edge functions of a pixel, each one the doubled
    /// signed area of the sub-triangle opposite to a vertex, in vertex order `A, B, C`.
    pub fn from_edges(edges: [i64; 3], area: i64) -> Self {
        let inv_area = 1. / area as f64;
        Barycentric {
            w: (edges[0] as f64 * inv_area) as f32,
            u: (edges[1] as f64 * inv_area) as f32,
            v: (edges[2] as f64 * inv_area) as f32,
        }
    }

    /// Weights in vertex order `A, B, C`.
    pub fn weights(&self) -> [f32; 3] {
        [self.w, self.u, self.v]
    }
}

/// Coordinates of `p` with respect to the triangle, or `None` when the triangle has zero area.
pub fn barycentric(tri: [Vec2; 3], p: Vec2) -> Option<Barycentric> {
    let [a, b, c] = tri;
    let ab = b - a;
    let ac = c - a;
    let area = ab.perp_dot(ac);
    if area == 0. || !area.is_finite() {
        return None;
    }

    let ap = p - a;
    let bp = p - b;
    let ca = a - c;
    Some(Barycentric::new(ca.perp_dot(ap) / area, ab.perp_dot(bp) / area))
}

/// Closed containment test, every weight within `[0, 1]`.
pub fn inside(bar: Barycentric) -> bool {
    let range = 0.0..=1.0;
    range.contains(&bar.u) && range.contains(&bar.v) && range.contains(&bar.w)
}

/// Maps coordinates back to an attribute: `w*A + u*B + v*C`.
pub fn barycentric_inverse<T>(tri: [T; 3], bar: Barycentric) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    tri[0] * bar.w + tri[1] * bar.u + tri[2] * bar.v
}

/// Attributes that can be blended across a triangle. `#[derive(Interpolate)]` implements it
/// field by field for structs whose fields are all `Interpolate`.
pub trait Interpolate: Sized {
    fn interpolate(a: &Self, b: &Self, c: &Self, bar: Barycentric) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(a: &f32, b: &f32, c: &f32, bar: Barycentric) -> f32 {
        barycentric_inverse([*a, *b, *c], bar)
    }
}

impl<const N: usize> Interpolate for Vec<f32, N> {
    fn interpolate(a: &Self, b: &Self, c: &Self, bar: Barycentric) -> Self {
        barycentric_inverse([*a, *b, *c], bar)
    }
}

/// Per-triangle cache written once per vertex by a shader's vertex stage and read back,
/// interpolated, by its fragment stage. Writing slot 0 starts a new triangle and forgets the
/// other two slots.
#[derive(Clone, Debug)]
pub struct Varying<T> {
    values: [Option<T>; 3],
}

impl<T> Default for Varying<T> {
    fn default() -> Self {
        Varying {
            values: [None, None, None],
        }
    }
}

impl<T> Varying<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, nth: usize, value: T) {
        debug_assert!(nth < 3, "vertex index {nth} out of range for a triangle");
        if nth == 0 {
            self.values = [Some(value), None, None];
        } else if let Some(slot) = self.values.get_mut(nth) {
            *slot = Some(value);
        }
    }

    pub fn get(&self, nth: usize) -> Option<&T> {
        self.values.get(nth)?.as_ref()
    }

    pub fn clear(&mut self) {
        self.values = [None, None, None];
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }
}

impl<T: Interpolate> Varying<T> {
    /// Interpolated value at `bar`. Reading before all three vertices were written is a
    /// contract violation: it asserts in debug builds and yields `None` otherwise.
    pub fn interpolate(&self, bar: Barycentric) -> Option<T> {
        match &self.values {
            [Some(a), Some(b), Some(c)] => Some(T::interpolate(a, b, c, bar)),
            _ => {
                debug_assert!(false, "fragment stage ran before all three vertices were set");
                None
            }
        }
    }
}
