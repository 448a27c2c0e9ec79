use crate::{
    barycentric::{barycentric_inverse, Barycentric},
    pipeline::Metrics,
    shaders::Shader,
    texture::{ColorBuffer, DepthBuffer},
    vec::Vec2i,
};

use super::FillRule;

/// Vertices farther than this from the origin, in pixels, are rejected before rasterization so
/// edge functions stay exact in 64 bit integers.
pub(crate) const GUARD_BAND: f32 = (1 << 24) as f32;

/// Returns the oriented area of the paralelogram formed by the points `from`, `to`, `p`, `from + (p - to)`. The sign
/// is positive if the points in the paralelogram wind counterclockwise (according to the order given prior) and
/// negative otherwise. In other words, if you were at `from` looking towards `to`, when `p` is to your left, the
/// value would be positive, and if it is to your right the value is negative.
///
/// ## Relationship with barycentric coordinates
///
/// For any triangle ABC the coordinates of a point P under `P = w*A + u*B + v*C` are
///
/// - `w = orient_2d(B, C, P) / orient_2d(A, B, C)`
/// - `u = orient_2d(C, A, P) / orient_2d(A, B, C)`
/// - `v = orient_2d(A, B, P) / orient_2d(A, B, C)`
///
/// It's also worth noting that `orient_2d(A, B, C)` is twice the area of the triangle ABC.
#[inline]
pub fn orient_2d(from: Vec2i, to: Vec2i, p: Vec2i) -> i64 {
    let (ux, uy) = ((to.x - from.x) as i64, (to.y - from.y) as i64);
    let (vx, vy) = ((p.x - from.x) as i64, (p.y - from.y) as i64);
    ux * vy - uy * vx
}

/// Value of [`orient_2d`] at `p` together with how much it changes per step in `x` and in `y`.
#[inline(always)]
pub fn orient_2d_step(from: Vec2i, to: Vec2i, p: Vec2i) -> ((i64, i64), i64) {
    let ux = (to.x - from.x) as i64;
    let uy = (to.y - from.y) as i64;
    ((-uy, ux), orient_2d(from, to, p))
}

/// Check if a give edge is top or left. Acording to D3D10.
///
/// > A top edge, is an edge that is exactly horizontal and is above the other edges.
/// > A left edge, is an edge that is not exactly horizontal and is on the left side of the triangle.
///
/// Rows grow downwards, and the edge must be directed so the triangle interior is at positive
/// [`orient_2d`].
///
/// ## Sources:
/// - [Rasterization Rules](https://learn.microsoft.com/en-us/windows/win32/direct3d11/d3d10-graphics-programming-guide-rasterizer-stage-rules?redirectedfrom=MSDN#Triangle)
/// - [Triangle Rasterization in Practice](https://fgiesen.wordpress.com/2013/02/08/triangle-rasterization-in-practice/)
pub fn is_top_left(from: Vec2i, to: Vec2i) -> bool {
    let edge = to - from;
    let is_top = edge.y == 0 && edge.x > 0;
    let is_left = edge.y < 0;
    is_top || is_left
}

/// Screen space triangle after snapping, oriented so its doubled area is positive. Edge `i` is
/// the one opposite to vertex `i`, and `edges` keeps the original vertex order so barycentric
/// weights still refer to the vertices the shader saw.
pub(crate) struct Setup {
    pub points: [Vec2i; 3],
    pub depths: [f32; 3],
    pub area: i64,
    /// `1` if the vertices wind positively, `-1` otherwise.
    pub sign: i64,
    /// Added to each edge value before the `>= 0` coverage test.
    pub bias: [i64; 3],
}

impl Setup {
    pub fn new(points: [Vec2i; 3], depths: [f32; 3], fill_rule: FillRule) -> Option<Self> {
        let [p0, p1, p2] = points;
        let signed_area = orient_2d(p0, p1, p2);
        if signed_area == 0 {
            return None;
        }
        let sign = signed_area.signum();

        let bias = [(p1, p2), (p2, p0), (p0, p1)].map(|(from, to)| {
            // negated edge functions describe the same edge walked backwards
            let (from, to) = if sign > 0 { (from, to) } else { (to, from) };
            match fill_rule {
                FillRule::Closed => 0,
                FillRule::TopLeft if is_top_left(from, to) => 0,
                FillRule::TopLeft => -1,
            }
        });

        Some(Setup {
            points,
            depths,
            area: signed_area * sign,
            sign,
            bias,
        })
    }

    /// Oriented edge values at `p` and their per step increments.
    #[inline]
    pub fn edges_at(&self, p: Vec2i) -> ([i64; 3], [(i64, i64); 3]) {
        let [p0, p1, p2] = self.points;
        let mut values = [0; 3];
        let mut incs = [(0, 0); 3];
        for (i, (from, to)) in [(p1, p2), (p2, p0), (p0, p1)].into_iter().enumerate() {
            let ((dx, dy), w) = orient_2d_step(from, to, p);
            values[i] = w * self.sign;
            incs[i] = (dx * self.sign, dy * self.sign);
        }
        (values, incs)
    }

    #[inline(always)]
    pub fn covers(&self, edges: [i64; 3]) -> bool {
        edges[0] + self.bias[0] >= 0 && edges[1] + self.bias[1] >= 0 && edges[2] + self.bias[2] >= 0
    }
}

/// Depth test, then fragment stage, then the writes. A discarded fragment leaves both buffers
/// untouched. `(x, y)` must already be inside both surfaces.
#[inline]
pub(crate) fn shade_pixel<S: Shader + ?Sized>(
    x: usize,
    y: usize,
    edges: [i64; 3],
    setup: &Setup,
    shader: &S,
    pixels: &mut ColorBuffer,
    depth_buf: &mut Option<&mut DepthBuffer>,
    metrics: &mut Metrics,
) {
    let bar = Barycentric::from_edges(edges, setup.area);
    let z = barycentric_inverse(setup.depths, bar);

    if let Some(depth_buf) = depth_buf.as_deref() {
        // strict: equal depth keeps the earlier fragment, NaN never passes
        if !(depth_buf[(x, y)] < z) {
            metrics.depth_rejected += 1;
            return;
        }
    }

    metrics.fragments_shaded += 1;
    match shader.fragment(bar) {
        Some(color) => {
            if let Some(depth_buf) = depth_buf.as_deref_mut() {
                depth_buf[(x, y)] = z;
            }
            pixels[(x, y)] = color;
            metrics.pixels_written += 1;
        }
        None => metrics.fragments_discarded += 1,
    }
}
