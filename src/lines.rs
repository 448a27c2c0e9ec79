//! Debug primitives drawn straight into a color buffer: lines, outlines and dots. Nothing here
//! writes depth.

use crate::{
    math::utils::scale_color,
    texture::{ColorBuffer, DepthBuffer},
    vec::{Vec2i, Vec3},
    Pixel,
};

/// Points of the line from `from` to `to`, both ends included, together with the fraction of the
/// line done at each point. Steps one pixel at a time along the major axis.
pub struct LineIter {
    from: Vec2i,
    dx: i64,
    dy: i64,
    steps: i64,
    i: i64,
    /// Last step yielded, inclusive.
    last: i64,
}

impl LineIter {
    pub fn new(from: Vec2i, to: Vec2i) -> Self {
        let dx = to.x as i64 - from.x as i64;
        let dy = to.y as i64 - from.y as i64;
        let steps = dx.abs().max(dy.abs());
        LineIter {
            from,
            dx,
            dy,
            steps,
            i: 0,
            last: steps,
        }
    }

    /// Skips the steps whose major axis coordinate falls outside `[0, width) x [0, height)`.
    /// The points left are the same the full line would yield there.
    pub fn within(mut self, width: usize, height: usize) -> Self {
        let (start, delta, extent) = if self.dx.abs() >= self.dy.abs() {
            (self.from.x as i64, self.dx, width)
        } else {
            (self.from.y as i64, self.dy, height)
        };
        let extent = i64::try_from(extent).unwrap_or(i64::MAX);
        // along the major axis every step moves exactly one pixel
        let (lo, hi) = match delta.signum() {
            1 => (-start, extent - 1 - start),
            -1 => (start - (extent - 1), start),
            _ => (0, 0),
        };
        self.i = self.i.max(lo);
        self.last = self.last.min(hi);
        if extent == 0 || (delta == 0 && !(0..extent).contains(&start)) {
            self.last = -1;
        }
        self
    }
}

impl Iterator for LineIter {
    type Item = (Vec2i, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.i > self.last {
            return None;
        }
        let i = self.i;
        self.i += 1;
        if self.steps == 0 {
            return Some((self.from, 0.));
        }
        // `delta * i` needs up to 66 bits for lines spanning the whole i32 range
        let offset = |delta: i64| (delta as i128 * i as i128 / self.steps as i128) as i64;
        let x = self.from.x as i64 + offset(self.dx);
        let y = self.from.y as i64 + offset(self.dy);
        let t = i as f32 / self.steps as f32;
        Some((Vec2i::from([x as i32, y as i32]), t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.last + 1 - self.i).unwrap_or(0);
        (left, Some(left))
    }
}

impl ExactSizeIterator for LineIter {}

fn touches(pixels: &ColorBuffer, a: Vec2i, b: Vec2i) -> bool {
    let (width, height) = (pixels.width() as i64, pixels.height() as i64);
    let (x0, x1) = (a.x.min(b.x) as i64, a.x.max(b.x) as i64);
    let (y0, y1) = (a.y.min(b.y) as i64, a.y.max(b.y) as i64);
    x1 >= 0 && y1 >= 0 && x0 < width && y0 < height
}

pub fn line(pixels: &mut ColorBuffer, a: Vec2i, b: Vec2i, color: Pixel) {
    if !touches(pixels, a, b) {
        return;
    }
    for (p, _) in LineIter::new(a, b).within(pixels.width(), pixels.height()) {
        pixels.set(p.x, p.y, color);
    }
}

pub fn triangle_outline(pixels: &mut ColorBuffer, pts: [Vec2i; 3], color: Pixel) {
    let [a, b, c] = pts;
    line(pixels, a, b, color);
    line(pixels, b, c, color);
    line(pixels, c, a, color);
}

/// A plus sign five pixels wide.
pub fn fat_dot(pixels: &mut ColorBuffer, p: Vec2i, color: Pixel) {
    for (dx, dy) in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
        pixels.set(p.x.saturating_add(dx), p.y.saturating_add(dy), color);
    }
}

/// Draws `color` where the point is nearer than the depth buffer, and otherwise darkens what is
/// already there to half intensity.
pub fn dot_depth(pixels: &mut ColorBuffer, depth: &DepthBuffer, p: Vec3, color: Pixel) {
    if !p.is_finite() {
        return;
    }
    let at = p.xy().floor().to_i32();
    plot_depth(pixels, depth, at, p.z, color);
}

/// Line with depth interpolated between the end points, see [`dot_depth`].
pub fn line_depth(pixels: &mut ColorBuffer, depth: &DepthBuffer, a: Vec3, b: Vec3, color: Pixel) {
    if !a.is_finite() || !b.is_finite() {
        return;
    }
    let (from, to) = (a.xy().floor().to_i32(), b.xy().floor().to_i32());
    if !touches(pixels, from, to) {
        return;
    }
    for (p, t) in LineIter::new(from, to).within(pixels.width(), pixels.height()) {
        let z = a.z + (b.z - a.z) * t;
        plot_depth(pixels, depth, p, z, color);
    }
}

fn plot_depth(pixels: &mut ColorBuffer, depth: &DepthBuffer, p: Vec2i, z: f32, color: Pixel) {
    if !depth.contains(p.x, p.y) {
        return;
    }
    if depth.depth(p.x, p.y) < z {
        pixels.set(p.x, p.y, color);
    } else if let Some(behind) = pixels.get_mut(p.x, p.y) {
        *behind = scale_color(*behind, 0.5);
    }
}
