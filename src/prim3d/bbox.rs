use crate::{
    math::BBox,
    pipeline::Metrics,
    shaders::Shader,
    texture::{ColorBuffer, DepthBuffer},
};

use super::common::{shade_pixel, Setup};

/// Brute force fill: every pixel of the clipped bounding box is tested against the three
/// edges. The edge values are stepped incrementally instead of recomputed per pixel.
pub(crate) fn fill<S: Shader + ?Sized>(
    setup: &Setup,
    clip: BBox<i32>,
    shader: &S,
    pixels: &mut ColorBuffer,
    depth_buf: &mut Option<&mut DepthBuffer>,
    metrics: &mut Metrics,
) {
    let min = clip.min_corner();
    let max = clip.max_corner();
    let (mut row, incs) = setup.edges_at(min);

    for y in min.y..=max.y {
        let mut w = row;
        for x in min.x..=max.x {
            if setup.covers(w) {
                shade_pixel(x as usize, y as usize, w, setup, shader, pixels, depth_buf, metrics);
            }
            for (w, (dx, _)) in w.iter_mut().zip(incs) {
                *w += dx;
            }
        }
        for (w, (_, dy)) in row.iter_mut().zip(incs) {
            *w += dy;
        }
    }
}
