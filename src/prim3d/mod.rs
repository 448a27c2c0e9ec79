pub(crate) mod bbox;
pub(crate) mod common;
pub(crate) mod scanline;

use serde::Deserialize;
use tracing::trace;

use crate::{
    math::BBox,
    pipeline::Metrics,
    shaders::Shader,
    texture::{ColorBuffer, DepthBuffer},
    vec::{Vec2i, Vec3},
};

pub use common::{is_top_left, orient_2d};

use common::{Setup, GUARD_BAND};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum RasterizerImplementation {
    #[default]
    #[serde(rename = "bbox")]
    BBox,
    #[serde(rename = "scanline")]
    Scanline,
}

impl RasterizerImplementation {
    pub fn enumerate() -> impl Iterator<Item = Self> {
        [RasterizerImplementation::BBox, RasterizerImplementation::Scanline].into_iter()
    }
}

/// Decides pixels whose sample point lies exactly on an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum FillRule {
    /// Only top and left edges own their boundary pixels, so triangles sharing an edge never
    /// draw a pixel twice and never leave a gap.
    #[default]
    #[serde(rename = "top-left")]
    TopLeft,
    /// Every pixel with all barycentric weights in `[0, 1]`.
    #[serde(rename = "closed")]
    Closed,
}

/// Which winding gets rejected. Front faces wind counterclockwise once the image is flipped for
/// display, that is with positive [`orient_2d`] in buffer coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub enum CullingMode {
    #[serde(rename = "front-face")]
    FrontFace,
    #[serde(rename = "back-face")]
    BackFace,
    #[serde(rename = "disabled")]
    #[default]
    Disabled,
}

impl CullingMode {
    pub fn enumerate() -> impl Iterator<Item = Self> {
        [CullingMode::Disabled, CullingMode::BackFace, CullingMode::FrontFace].into_iter()
    }

    fn culls(&self, sign: i64) -> bool {
        match self {
            CullingMode::FrontFace => sign > 0,
            CullingMode::BackFace => sign < 0,
            CullingMode::Disabled => false,
        }
    }
}

impl std::fmt::Display for CullingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Per draw call rasterizer settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RasterizerConfig {
    pub implementation: RasterizerImplementation,
    #[serde(rename = "fill-rule")]
    pub fill_rule: FillRule,
    #[serde(rename = "cull-mode")]
    pub culling: CullingMode,
}

impl RasterizerConfig {
    pub fn with_implementation(mut self, implementation: RasterizerImplementation) -> Self {
        self.implementation = implementation;
        self
    }

    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    pub fn with_culling(mut self, culling: CullingMode) -> Self {
        self.culling = culling;
        self
    }
}

/// Draws one screen space triangle. `x` and `y` of each point are pixel coordinates (snapped
/// down to whole pixels, row `0` first in memory) and `z` is the depth, larger meaning nearer.
///
/// - Every covered pixel gets its barycentric coordinates with respect to `pts`, in the order given.
/// - With a depth buffer, a pixel is shaded only if its depth is strictly greater than the
///   stored one, and depth is written only if the fragment isn't discarded.
/// - Pixels outside `pixels` (or `depth_buf`) are never touched.
pub fn draw_triangle<S: Shader + ?Sized>(
    pts: [Vec3; 3],
    shader: &S,
    pixels: &mut ColorBuffer,
    mut depth_buf: Option<&mut DepthBuffer>,
    config: &RasterizerConfig,
    metrics: &mut Metrics,
) {
    let in_range = |p: &Vec3| p.is_finite() && p.x.abs() <= GUARD_BAND && p.y.abs() <= GUARD_BAND;
    if !pts.iter().all(in_range) {
        trace!(?pts, "triangle outside the guard band");
        metrics.clipped += 1;
        return;
    }

    let points: [Vec2i; 3] = pts.map(|p| p.xy().floor().to_i32());
    let depths = pts.map(|p| p.z);

    let Some(setup) = Setup::new(points, depths, config.fill_rule) else {
        trace!(?points, "degenerate triangle");
        metrics.degenerate_skipped += 1;
        return;
    };

    if config.culling.culls(setup.sign) {
        metrics.culled += 1;
        return;
    }

    let mut bounds = pixels.bounds();
    if let Some(depth_buf) = depth_buf.as_deref() {
        bounds = bounds.intersection(depth_buf.bounds()).unwrap_or(BBox {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        });
    }
    let Some(clip) = BBox::enclosing(&points).and_then(|bbox| bbox.intersection(bounds)) else {
        metrics.clipped += 1;
        return;
    };

    match config.implementation {
        RasterizerImplementation::BBox => {
            bbox::fill(&setup, clip, shader, pixels, &mut depth_buf, metrics)
        }
        RasterizerImplementation::Scanline => {
            scanline::fill(&setup, clip, shader, pixels, &mut depth_buf, metrics)
        }
    }

    metrics.sum_areas += setup.area;
    metrics.triangles_drawn += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{barycentric::Barycentric, math::utils::BLACK, Pixel};

    const RED: Pixel = [0xff, 0, 0, 0xff];

    struct Fill(Pixel);

    impl Shader for Fill {
        fn vertex(&mut self, _face: usize, _nth: usize) -> Option<Vec3> {
            None
        }

        fn fragment(&self, _bar: Barycentric) -> Option<Pixel> {
            Some(self.0)
        }
    }

    fn tri(pts: [[f32; 3]; 3]) -> [Vec3; 3] {
        pts.map(Vec3::from)
    }

    fn covered(pixels: &ColorBuffer) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..pixels.height() as i32 {
            for x in 0..pixels.width() as i32 {
                if pixels.pixel(x, y) != BLACK {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn render(pts: [Vec3; 3], config: RasterizerConfig) -> (ColorBuffer, Metrics) {
        let mut pixels = ColorBuffer::new(8, 8, BLACK);
        let mut metrics = Metrics::new();
        draw_triangle(pts, &Fill(RED), &mut pixels, None, &config, &mut metrics);
        (pixels, metrics)
    }

    #[test]
    fn test_flat_top_and_flat_bottom() {
        let flat_top = tri([[1., 1., 0.], [6., 1., 0.], [3., 6., 0.]]);
        let flat_bottom = tri([[3., 1., 0.], [6., 6., 0.], [1., 6., 0.]]);
        for pts in [flat_top, flat_bottom] {
            for fill_rule in [FillRule::TopLeft, FillRule::Closed] {
                let config = RasterizerConfig::default().with_fill_rule(fill_rule);
                let (a, _) = render(pts, config);
                let (b, _) =
                    render(pts, config.with_implementation(RasterizerImplementation::Scanline));
                assert!(!covered(&a).is_empty());
                assert_eq!(covered(&a), covered(&b));
            }
        }
    }

    #[test]
    fn test_degenerate_and_non_finite() {
        let (pixels, metrics) = render(
            tri([[0., 0., 0.], [2., 2., 0.], [5., 5., 0.]]),
            RasterizerConfig::default(),
        );
        assert!(covered(&pixels).is_empty());
        assert_eq!(metrics.degenerate_skipped, 1);

        let (pixels, metrics) = render(
            tri([[0., 0., 0.], [f32::NAN, 2., 0.], [5., 0., 0.]]),
            RasterizerConfig::default(),
        );
        assert!(covered(&pixels).is_empty());
        assert_eq!(metrics.clipped, 1);
    }

    #[test]
    fn test_culling() {
        let ccw = tri([[0., 0., 0.], [4., 0., 0.], [0., 4., 0.]]);
        let cw = tri([[0., 0., 0.], [0., 4., 0.], [4., 0., 0.]]);

        let back = RasterizerConfig::default().with_culling(CullingMode::BackFace);
        assert_eq!(render(ccw, back).1.triangles_drawn, 1);
        assert_eq!(render(cw, back).1.culled, 1);

        let front = RasterizerConfig::default().with_culling(CullingMode::FrontFace);
        assert_eq!(render(ccw, front).1.culled, 1);
        assert_eq!(render(cw, front).1.triangles_drawn, 1);
    }

    #[test]
    fn test_offscreen() {
        let (pixels, metrics) = render(
            tri([[20., 20., 0.], [30., 20., 0.], [20., 30., 0.]]),
            RasterizerConfig::default(),
        );
        assert!(covered(&pixels).is_empty());
        assert_eq!(metrics.clipped, 1);
    }

    #[test]
    fn test_config_deserialize() {
        let config: RasterizerConfig = toml::from_str(
            r#"
            implementation = "scanline"
            fill-rule = "closed"
            cull-mode = "back-face"
            "#,
        )
        .unwrap();
        assert_eq!(config.implementation, RasterizerImplementation::Scanline);
        assert_eq!(config.fill_rule, FillRule::Closed);
        assert_eq!(config.culling, CullingMode::BackFace);

        let config: RasterizerConfig = toml::from_str("").unwrap();
        assert_eq!(config, RasterizerConfig::default());
    }
}
