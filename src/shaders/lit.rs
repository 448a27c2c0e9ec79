use crate::{
    barycentric::{Barycentric, Varying},
    math::utils::scale_color,
    vec::Vec3,
    Mesh, Pixel,
};

use super::{Shader, Uniforms};

/// One light intensity per face, from the face's geometric normal. Faces turned away from the
/// light are discarded.
pub struct FlatShader<'a, M: ?Sized> {
    mesh: &'a M,
    uniforms: Uniforms,
    color: Pixel,
    corners: [Vec3; 3],
    intensity: Option<f32>,
}

impl<'a, M: Mesh + ?Sized> FlatShader<'a, M> {
    pub fn new(mesh: &'a M, uniforms: Uniforms, color: Pixel) -> Self {
        FlatShader {
            mesh,
            uniforms,
            color,
            corners: [Vec3::zero(); 3],
            intensity: None,
        }
    }
}

impl<M: Mesh + ?Sized> Shader for FlatShader<'_, M> {
    fn vertex(&mut self, face: usize, nth: usize) -> Option<Vec3> {
        let vertex = self.mesh.vertex(face, nth)?;
        if nth == 0 {
            self.intensity = None;
        }
        *self.corners.get_mut(nth)? = vertex.position;

        if nth == 2 {
            let [a, b, c] = self.corners;
            // zero area faces have no normal
            let normal = self.uniforms.world_normal((b - a).cross(c - a))?;
            self.intensity = Some(normal.dot(self.uniforms.light_dir));
        }
        self.uniforms.project(vertex.position)
    }

    fn fragment(&self, _bar: Barycentric) -> Option<Pixel> {
        debug_assert!(
            self.intensity.is_some(),
            "fragment stage ran before all three vertices were set"
        );
        let intensity = self.intensity?;
        if intensity <= 0. {
            return None;
        }
        Some(scale_color(self.color, intensity.min(1.)))
    }
}

/// Lights every vertex from its normal and interpolates the intensity across the face.
pub struct GouraudShader<'a, M: ?Sized> {
    mesh: &'a M,
    uniforms: Uniforms,
    color: Pixel,
    intensities: Varying<f32>,
}

impl<'a, M: Mesh + ?Sized> GouraudShader<'a, M> {
    pub fn new(mesh: &'a M, uniforms: Uniforms, color: Pixel) -> Self {
        GouraudShader {
            mesh,
            uniforms,
            color,
            intensities: Varying::new(),
        }
    }
}

impl<M: Mesh + ?Sized> Shader for GouraudShader<'_, M> {
    fn vertex(&mut self, face: usize, nth: usize) -> Option<Vec3> {
        let vertex = self.mesh.vertex(face, nth)?;
        let normal = self.uniforms.world_normal(vertex.normal)?;
        self.intensities.set(nth, self.uniforms.diffuse(normal));
        self.uniforms.project(vertex.position)
    }

    fn fragment(&self, bar: Barycentric) -> Option<Pixel> {
        let intensity = self.intensities.interpolate(bar)?;
        Some(scale_color(self.color, intensity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::utils::WHITE,
        obj::Model,
        transform::{Camera, Transform},
        vec::Mat4x4,
    };

    fn uniforms(light: [f32; 3]) -> Uniforms {
        let camera = Camera {
            perspective: false,
            ..Camera::default()
        };
        let transform = Transform::new(Mat4x4::identity(), &camera, 16, 16, 255.);
        Uniforms::new(&transform, Vec3::from(light)).unwrap()
    }

    fn run_vertices<S: Shader>(shader: &mut S, face: usize) -> bool {
        (0..3).all(|nth| shader.vertex(face, nth).is_some())
    }

    #[test]
    fn test_flat_lit_and_unlit() {
        let quad = Model::quad();
        let bar = Barycentric::new(0.3, 0.3);

        // the quad's normal points to (-1, 0, 1)
        let mut facing = FlatShader::new(&quad, uniforms([-1., 0., 1.]), WHITE);
        assert!(run_vertices(&mut facing, 0));
        assert_eq!(facing.fragment(bar), Some(WHITE));

        let mut away = FlatShader::new(&quad, uniforms([1., 0., -1.]), WHITE);
        assert!(run_vertices(&mut away, 0));
        assert_eq!(away.fragment(bar), None);
    }

    #[test]
    fn test_gouraud_interpolates() {
        let quad = Model::quad();
        let mut shader = GouraudShader::new(&quad, uniforms([0., 0., 1.]), WHITE);
        assert!(run_vertices(&mut shader, 1));
        let [r, g, b, a] = shader.fragment(Barycentric::new(0.5, 0.25)).unwrap();
        // cos(45deg) of white
        assert!((r as i32 - 180).abs() <= 1);
        assert_eq!((r, g, b, a), (r, r, r, 255));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "before all three vertices")]
    fn test_flat_fragment_without_vertices_panics() {
        let quad = Model::quad();
        let shader = FlatShader::new(&quad, uniforms([0., 0., 1.]), WHITE);
        shader.fragment(Barycentric::new(0.3, 0.3));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "before all three vertices")]
    fn test_flat_partial_vertex_stage_panics() {
        let quad = Model::quad();
        let mut shader = FlatShader::new(&quad, uniforms([0., 0., 1.]), WHITE);
        assert!(run_vertices(&mut shader, 0));
        assert!(shader.vertex(1, 0).is_some());
        shader.fragment(Barycentric::new(0.3, 0.3));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "before all three vertices")]
    fn test_gouraud_partial_vertex_stage_panics() {
        let quad = Model::quad();
        let mut shader = GouraudShader::new(&quad, uniforms([0., 0., 1.]), WHITE);
        assert!(run_vertices(&mut shader, 0));
        assert!(shader.vertex(1, 0).is_some());
        shader.fragment(Barycentric::new(0.3, 0.3));
    }
}
