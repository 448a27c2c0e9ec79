use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    prim3d::{self, RasterizerConfig},
    shaders::Shader,
    texture::{ColorBuffer, DepthBuffer},
    vec::Vec3,
    Mesh,
};

/// Renders whole meshes into a color buffer and, optionally, a depth buffer. Holds the buffers
/// for the duration of a frame; metrics accumulate until [`Pipeline::finish`].
pub struct Pipeline<'a> {
    color_buf: &'a mut ColorBuffer,
    depth_buf: Option<&'a mut DepthBuffer>,
    config: RasterizerConfig,
    metrics: Metrics,
}

impl<'a> Pipeline<'a> {
    pub fn new(color_buf: &'a mut ColorBuffer, config: RasterizerConfig) -> Self {
        Pipeline {
            color_buf,
            depth_buf: None,
            config,
            metrics: Metrics::new(),
        }
    }

    /// Enables depth testing. The buffer must match the color buffer's size.
    pub fn with_depth_buffer(mut self, depth_buf: &'a mut DepthBuffer) -> Result<Self> {
        if depth_buf.size() != self.color_buf.size() {
            return Err(Error::SizeMismatch {
                expected: (self.color_buf.width(), self.color_buf.height()),
                actual: (depth_buf.width(), depth_buf.height()),
            });
        }
        self.depth_buf = Some(depth_buf);
        Ok(self)
    }

    pub fn config(&self) -> &RasterizerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RasterizerConfig) {
        self.config = config;
    }

    /// Runs the vertex stage for the three corners of `face`, then rasterizes. Returns `false`
    /// when the shader skipped the triangle.
    pub fn draw_face<S: Shader + ?Sized>(&mut self, face: usize, shader: &mut S) -> bool {
        let mut pts = [Vec3::zero(); 3];
        let mut complete = true;
        for (nth, pt) in pts.iter_mut().enumerate() {
            match shader.vertex(face, nth) {
                Some(p) => *pt = p,
                None => complete = false,
            }
        }
        if !complete {
            trace!(face, "vertex stage skipped triangle");
            self.metrics.vertex_skipped += 1;
            return false;
        }

        prim3d::draw_triangle(
            pts,
            &*shader,
            &mut *self.color_buf,
            self.depth_buf.as_deref_mut(),
            &self.config,
            &mut self.metrics,
        );
        true
    }

    /// Draws faces `0..triangle_count` with `shader`.
    pub fn draw<S: Shader + ?Sized>(&mut self, triangle_count: usize, shader: &mut S) {
        let before = self.metrics;
        for face in 0..triangle_count {
            self.draw_face(face, shader);
        }
        let drawn = self.metrics.triangles_drawn - before.triangles_drawn;
        debug!(
            triangles = triangle_count,
            drawn,
            pixels = self.metrics.pixels_written - before.pixels_written,
            implementation = ?self.config.implementation,
            "mesh rendered"
        );
    }

    pub fn draw_mesh<M: Mesh + ?Sized, S: Shader + ?Sized>(&mut self, mesh: &M, shader: &mut S) {
        self.draw(mesh.triangle_count(), shader);
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn finish(self) -> Metrics {
        self.metrics
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub triangles_drawn: usize,
    pub degenerate_skipped: usize,
    pub culled: usize,
    /// Fully outside the surface, or outside the guard band.
    pub clipped: usize,
    pub vertex_skipped: usize,
    pub fragments_shaded: usize,
    pub fragments_discarded: usize,
    pub depth_rejected: usize,
    pub pixels_written: usize,
    /// Sum of doubled triangle areas.
    pub sum_areas: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics::default()
    }

    pub fn clear(&mut self) {
        *self = Metrics::default();
    }
}

impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let &Metrics {
            triangles_drawn,
            degenerate_skipped,
            culled,
            clipped,
            vertex_skipped,
            fragments_shaded,
            fragments_discarded,
            depth_rejected,
            pixels_written,
            sum_areas,
        } = self;
        writeln!(f, "render metrics:")?;
        writeln!(f, "\ttriangles drawn: {triangles_drawn}")?;
        writeln!(f, "\tdegenerate skipped: {degenerate_skipped}")?;
        writeln!(f, "\tculled: {culled}")?;
        writeln!(f, "\tclipped: {clipped}")?;
        writeln!(f, "\tskipped by vertex stage: {vertex_skipped}")?;
        writeln!(f, "\tfragments shaded: {fragments_shaded}")?;
        writeln!(f, "\tfragments discarded: {fragments_discarded}")?;
        writeln!(f, "\tdepth rejected: {depth_rejected}")?;
        writeln!(f, "\tpixels written: {pixels_written}")?;
        if triangles_drawn > 0 {
            let mean_area = sum_areas as f64 / (2. * triangles_drawn as f64);
            writeln!(f, "\tmean triangle area: {mean_area:.2}")?;
        }
        Ok(())
    }
}
