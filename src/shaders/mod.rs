//! Programmable stages. For every triangle `vertex` runs once per corner, in order, and only then
//! `fragment` runs for each covered pixel. Shaders keep whatever the fragment stage needs in
//! their own fields; the next triangle's vertex calls overwrite it.

pub mod lit;
pub mod textured;

use serde::Deserialize;

use crate::{
    barycentric::{Barycentric, Varying},
    error::Result,
    math::utils::color_to_pixel,
    transform::{embed, embed_direction, in_unit_cube, project, Transform},
    vec::{Mat4x4, Vec3, Vec4},
    Mesh, Pixel,
};

pub use lit::{FlatShader, GouraudShader};
pub use textured::TexturedShader;

pub trait Shader {
    /// Screen space position of the `nth` corner of `face`: pixel `x` and `y`, depth in `z`.
    /// `None` skips the whole triangle.
    fn vertex(&mut self, face: usize, nth: usize) -> Option<Vec3>;

    /// Color of a covered pixel, `None` to discard it.
    fn fragment(&self, bar: Barycentric) -> Option<Pixel>;
}

impl<S: Shader + ?Sized> Shader for &mut S {
    fn vertex(&mut self, face: usize, nth: usize) -> Option<Vec3> {
        (**self).vertex(face, nth)
    }

    fn fragment(&self, bar: Barycentric) -> Option<Pixel> {
        (**self).fragment(bar)
    }
}

impl<S: Shader + ?Sized> Shader for Box<S> {
    fn vertex(&mut self, face: usize, nth: usize) -> Option<Vec3> {
        (**self).vertex(face, nth)
    }

    fn fragment(&self, bar: Barycentric) -> Option<Pixel> {
        (**self).fragment(bar)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ShaderKind {
    #[serde(rename = "solid")]
    Solid,
    #[serde(rename = "normals")]
    Normals,
    #[serde(rename = "flat")]
    Flat,
    #[default]
    #[serde(rename = "gouraud")]
    Gouraud,
    #[serde(rename = "textured")]
    Textured,
}

/// Read-only inputs shared by the built-in shaders for one draw call.
#[derive(Clone, Copy, Debug)]
pub struct Uniforms {
    /// Object space to screen space.
    pub screen: Mat4x4,
    /// Object space to homogeneous clip space.
    pub clip: Mat4x4,
    /// Object space normals to world space.
    pub normal: Mat4x4,
    /// Unit vector pointing towards the light, in world space.
    pub light_dir: Vec3,
    /// Skip triangles with a corner outside the unit cube after projection.
    pub clip_to_unit_cube: bool,
}

impl Uniforms {
    /// Fails when the model matrix can't be inverted for transforming normals.
    pub fn new(transform: &Transform, light_dir: Vec3) -> Result<Self> {
        Ok(Uniforms {
            screen: transform.combined(),
            clip: transform.clip(),
            normal: transform.normal_matrix()?,
            light_dir: light_dir.try_normalize().unwrap_or(Vec3::zero()),
            clip_to_unit_cube: false,
        })
    }

    pub fn with_clipping(mut self, clip_to_unit_cube: bool) -> Self {
        self.clip_to_unit_cube = clip_to_unit_cube;
        self
    }

    /// Screen position of an object space point.
    pub fn project(&self, position: Vec3) -> Option<Vec3> {
        let p = embed(position);
        if self.clip_to_unit_cube {
            let ndc = project(self.clip * p);
            if !ndc.is_finite() || !in_unit_cube(ndc) {
                return None;
            }
        }
        let screen = project(self.screen * p);
        screen.is_finite().then_some(screen)
    }

    /// Unit world space normal, `None` for zero length normals.
    pub fn world_normal(&self, normal: Vec3) -> Option<Vec3> {
        (self.normal * embed_direction(normal)).xyz().try_normalize()
    }

    /// Lambert term, clamped to `[0, 1]`.
    pub fn diffuse(&self, world_normal: Vec3) -> f32 {
        world_normal.dot(self.light_dir).clamp(0., 1.)
    }
}

/// Every pixel gets the same color.
pub struct SolidShader<'a, M: ?Sized> {
    mesh: &'a M,
    uniforms: Uniforms,
    color: Pixel,
}

impl<'a, M: Mesh + ?Sized> SolidShader<'a, M> {
    pub fn new(mesh: &'a M, uniforms: Uniforms, color: Pixel) -> Self {
        SolidShader {
            mesh,
            uniforms,
            color,
        }
    }
}

impl<M: Mesh + ?Sized> Shader for SolidShader<'_, M> {
    fn vertex(&mut self, face: usize, nth: usize) -> Option<Vec3> {
        let vertex = self.mesh.vertex(face, nth)?;
        self.uniforms.project(vertex.position)
    }

    fn fragment(&self, _bar: Barycentric) -> Option<Pixel> {
        Some(self.color)
    }
}

/// Displays interpolated world space normals, each axis mapped from `[-1, 1]` to `[0, 255]`.
pub struct NormalShader<'a, M: ?Sized> {
    mesh: &'a M,
    uniforms: Uniforms,
    normals: Varying<Vec3>,
}

impl<'a, M: Mesh + ?Sized> NormalShader<'a, M> {
    pub fn new(mesh: &'a M, uniforms: Uniforms) -> Self {
        NormalShader {
            mesh,
            uniforms,
            normals: Varying::new(),
        }
    }
}

impl<M: Mesh + ?Sized> Shader for NormalShader<'_, M> {
    fn vertex(&mut self, face: usize, nth: usize) -> Option<Vec3> {
        let vertex = self.mesh.vertex(face, nth)?;
        self.normals.set(nth, self.uniforms.world_normal(vertex.normal)?);
        self.uniforms.project(vertex.position)
    }

    fn fragment(&self, bar: Barycentric) -> Option<Pixel> {
        let n = self.normals.interpolate(bar)?.try_normalize()?;
        let c = n * 0.5 + Vec3::repeat(0.5);
        Some(color_to_pixel(Vec4::from([c.x, c.y, c.z, 1.])))
    }
}
