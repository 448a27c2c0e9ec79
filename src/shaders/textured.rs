use crate::{
    barycentric::{Barycentric, Varying},
    math::utils::scale_color,
    texture::{ColorBuffer, Filter, TextureWrap},
    vec::{Vec2, Vec3},
    Mesh, Pixel,
};

use super::{Shader, Uniforms};

/// Samples a texture with interpolated uv coordinates, optionally modulated by Gouraud lighting.
pub struct TexturedShader<'a, M: ?Sized> {
    mesh: &'a M,
    uniforms: Uniforms,
    texture: &'a ColorBuffer,
    wrap: TextureWrap,
    filter: Filter,
    /// Texels with a smaller alpha are discarded.
    alpha_clip: Option<u8>,
    lit: bool,
    uvs: Varying<Vec2>,
    intensities: Varying<f32>,
}

impl<'a, M: Mesh + ?Sized> TexturedShader<'a, M> {
    pub fn new(mesh: &'a M, uniforms: Uniforms, texture: &'a ColorBuffer) -> Self {
        TexturedShader {
            mesh,
            uniforms,
            texture,
            wrap: TextureWrap::default(),
            filter: Filter::default(),
            alpha_clip: None,
            lit: false,
            uvs: Varying::new(),
            intensities: Varying::new(),
        }
    }

    pub fn with_sampling(mut self, wrap: TextureWrap, filter: Filter) -> Self {
        self.wrap = wrap;
        self.filter = filter;
        self
    }

    pub fn with_alpha_clip(mut self, alpha_clip: Option<u8>) -> Self {
        self.alpha_clip = alpha_clip;
        self
    }

    pub fn with_lighting(mut self, lit: bool) -> Self {
        self.lit = lit;
        self
    }
}

impl<M: Mesh + ?Sized> Shader for TexturedShader<'_, M> {
    fn vertex(&mut self, face: usize, nth: usize) -> Option<Vec3> {
        let vertex = self.mesh.vertex(face, nth)?;
        self.uvs.set(nth, vertex.uv);
        if self.lit {
            let normal = self.uniforms.world_normal(vertex.normal)?;
            self.intensities.set(nth, self.uniforms.diffuse(normal));
        }
        self.uniforms.project(vertex.position)
    }

    fn fragment(&self, bar: Barycentric) -> Option<Pixel> {
        let uv = self.uvs.interpolate(bar)?;
        let color = self.texture.sample_uv(uv, self.wrap, self.filter);
        if matches!(self.alpha_clip, Some(clip) if color[3] < clip) {
            return None;
        }
        if self.lit {
            Some(scale_color(color, self.intensities.interpolate(bar)?))
        } else {
            Some(color)
        }
    }
}
