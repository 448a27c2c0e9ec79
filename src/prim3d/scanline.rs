//! Edge walking fill. Vertices are sorted top to bottom and the triangle is split at the
//! middle vertex's row; each row only visits the span between the long edge and the active
//! short edge. Coverage of the span is still decided by the edge functions, so the pixel set
//! matches the bounding box fill exactly, seams included.

use crate::{
    math::BBox,
    pipeline::Metrics,
    shaders::Shader,
    texture::{ColorBuffer, DepthBuffer},
    vec::Vec2i,
};

use super::common::{shade_pixel, Setup};

struct Edge {
    start: Vec2i,
    end: Vec2i,
    /// Signed x increment per row, `None` for horizontal edges.
    inc: Option<f64>,
}

impl Edge {
    fn new(start: Vec2i, end: Vec2i) -> Self {
        let dy = end.y - start.y;
        let inc = (dy != 0).then(|| (end.x - start.x) as f64 / dy as f64);
        Edge { start, end, inc }
    }

    /// Leftmost and rightmost x of the edge on row `y`.
    fn span_at(&self, y: i32) -> (f64, f64) {
        match self.inc {
            Some(inc) => {
                let x = self.start.x as f64 + inc * (y - self.start.y) as f64;
                (x, x)
            }
            None => {
                let (a, b) = (self.start.x as f64, self.end.x as f64);
                (a.min(b), a.max(b))
            }
        }
    }
}

pub(crate) fn fill<S: Shader + ?Sized>(
    setup: &Setup,
    clip: BBox<i32>,
    shader: &S,
    pixels: &mut ColorBuffer,
    depth_buf: &mut Option<&mut DepthBuffer>,
    metrics: &mut Metrics,
) {
    // stable sort on indices, ties on y broken by x
    let mut order = [0, 1, 2];
    order.sort_by_key(|&i| (setup.points[i].y, setup.points[i].x));
    let [top, mid, bottom] = order.map(|i| setup.points[i]);

    let long = Edge::new(top, bottom);
    let upper = Edge::new(top, mid);
    let lower = Edge::new(mid, bottom);

    let clip_max = clip.max_corner();
    let y_start = top.y.max(clip.y);
    let y_end = bottom.y.min(clip_max.y);

    for y in y_start..=y_end {
        // a flat top leaves no rows above `mid.y`, so `upper` is never walked when horizontal
        let short = if y < mid.y { &upper } else { &lower };
        let (l0, r0) = long.span_at(y);
        let (l1, r1) = short.span_at(y);

        let x_start = (l0.min(l1).floor() as i32).saturating_sub(1).max(clip.x);
        let x_end = (r0.max(r1).ceil() as i32).saturating_add(1).min(clip_max.x);
        if x_start > x_end {
            continue;
        }

        let (mut w, incs) = setup.edges_at(Vec2i::from([x_start, y]));
        for x in x_start..=x_end {
            if setup.covers(w) {
                shade_pixel(x as usize, y as usize, w, setup, shader, pixels, depth_buf, metrics);
            }
            for (w, (dx, _)) in w.iter_mut().zip(incs) {
                *w += dx;
            }
        }
    }
}
