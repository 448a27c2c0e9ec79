//! Loads the assets a [`Scene`] refers to and renders it into a frame.

use std::{
    path::Path,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::{
    config::{self, Scene},
    lines,
    obj::{self, Model},
    pipeline::{Metrics, Pipeline},
    prim3d::{common::GUARD_BAND, RasterizerImplementation},
    shaders::{
        FlatShader, GouraudShader, NormalShader, Shader, ShaderKind, SolidShader, TexturedShader,
        Uniforms,
    },
    texture::{ColorBuffer, DepthBuffer},
    transform::Transform,
    vec::Vec2i,
    Mesh, Pixel,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    /// Replaces the algorithm chosen by the scene.
    pub implementation: Option<RasterizerImplementation>,
    /// Outlines every drawn triangle after shading.
    pub wireframe: Option<Pixel>,
}

/// Result of rendering a scene. Buffers keep row `0` first; the image conversions flip them so
/// `+y` points up.
pub struct Frame {
    pub color: ColorBuffer,
    pub depth: DepthBuffer,
    pub metrics: Metrics,
    pub elapsed: Duration,
    max_depth: f32,
}

impl Frame {
    pub fn color_image(&self) -> Option<image::RgbaImage> {
        let mut color = self.color.clone();
        color.flip_vertically();
        color.to_rgba_image()
    }

    pub fn depth_image(&self) -> Option<image::GrayImage> {
        let mut depth = self.depth.clone();
        depth.flip_vertically();
        image::GrayImage::from_raw(
            depth.width() as u32,
            depth.height() as u32,
            depth.to_grayscale(self.max_depth),
        )
    }
}

struct LoadedModel {
    config: config::Model,
    mesh: Model,
    texture: Option<ColorBuffer>,
}

/// A scene with its meshes and textures in memory.
pub struct World {
    scene: Scene,
    models: Vec<LoadedModel>,
}

impl World {
    /// Relative asset paths are resolved against `base_dir`.
    pub fn load(scene: Scene, base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let mut models = Vec::with_capacity(scene.models.len());
        for config in &scene.models {
            let mesh = match &config.path {
                Some(path) => {
                    let path = base_dir.join(path);
                    obj::load_obj(&path)
                        .with_context(|| format!("failed to load model {path:?}"))?
                }
                None => Model::quad(),
            };
            let texture = match &config.texture {
                Some(path) => {
                    let path = base_dir.join(path);
                    let img = image::open(&path)
                        .with_context(|| format!("failed to load texture {path:?}"))?
                        .to_rgba8();
                    Some(ColorBuffer::from_rgba_image(&img))
                }
                None => None,
            };
            if config.shader == ShaderKind::Textured && texture.is_none() {
                bail!(
                    "model {} uses the textured shader but has no texture",
                    config.display_name()
                );
            }
            info!(
                model = %config.display_name(),
                triangles = mesh.triangle_count(),
                "model loaded"
            );
            models.push(LoadedModel {
                config: config.clone(),
                mesh,
                texture,
            });
        }
        Ok(World { scene, models })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn render(&self, options: &RenderOptions) -> Result<Frame> {
        let start = Instant::now();
        let rendering = &self.scene.rendering;
        let (width, height) = (rendering.width, rendering.height);
        let camera = self.scene.camera.into_camera();

        let mut rasterizer = self.scene.rasterizer;
        if let Some(implementation) = options.implementation {
            rasterizer.implementation = implementation;
        }

        let mut color = ColorBuffer::new(width, height, rendering.background);
        let mut depth = DepthBuffer::new_depth(width, height);

        let mut transforms = Vec::with_capacity(self.models.len());
        let metrics = {
            let mut pipeline = Pipeline::new(&mut color, rasterizer).with_depth_buffer(&mut depth)?;
            for model in &self.models {
                let transform = Transform::new(
                    model.config.model_matrix(),
                    &camera,
                    width,
                    height,
                    rendering.depth,
                );
                let uniforms = Uniforms::new(&transform, self.scene.light.direction)
                    .with_context(|| {
                        format!("model {} has a singular model matrix", model.config.display_name())
                    })?
                    .with_clipping(rendering.clip_to_unit_cube);

                let mut shader = model.shader(uniforms)?;
                pipeline.draw_mesh(&model.mesh, &mut shader);
                transforms.push(transform);
            }
            pipeline.finish()
        };

        if let Some(wire_color) = options.wireframe {
            for (model, transform) in self.models.iter().zip(&transforms) {
                draw_wireframe(&mut color, &model.mesh, transform, wire_color);
            }
        }

        let elapsed = start.elapsed();
        debug!(?elapsed, "{metrics}");
        Ok(Frame {
            color,
            depth,
            metrics,
            elapsed,
            max_depth: rendering.depth,
        })
    }
}

impl LoadedModel {
    fn shader(&self, uniforms: Uniforms) -> Result<Box<dyn Shader + '_>> {
        let config = &self.config;
        let mesh = &self.mesh;
        let shader: Box<dyn Shader + '_> = match config.shader {
            ShaderKind::Solid => Box::new(SolidShader::new(mesh, uniforms, config.color)),
            ShaderKind::Normals => Box::new(NormalShader::new(mesh, uniforms)),
            ShaderKind::Flat => Box::new(FlatShader::new(mesh, uniforms, config.color)),
            ShaderKind::Gouraud => Box::new(GouraudShader::new(mesh, uniforms, config.color)),
            ShaderKind::Textured => {
                let Some(texture) = &self.texture else {
                    bail!("model {} has no texture", config.display_name());
                };
                Box::new(
                    TexturedShader::new(mesh, uniforms, texture)
                        .with_sampling(config.wrap, config.filter)
                        .with_alpha_clip(config.alpha_clip)
                        .with_lighting(config.lit),
                )
            }
        };
        Ok(shader)
    }
}

/// Outlines every face whose corners all project inside the guard band.
pub fn draw_wireframe<M: Mesh + ?Sized>(
    pixels: &mut ColorBuffer,
    mesh: &M,
    transform: &Transform,
    color: Pixel,
) {
    for face in 0..mesh.triangle_count() {
        let mut pts = [Vec2i::zero(); 3];
        let projected = pts.iter_mut().enumerate().all(|(nth, pt)| {
            let screen = mesh
                .vertex(face, nth)
                .and_then(|v| transform.to_screen(v.position));
            match screen {
                Some(p) if p.x.abs() <= GUARD_BAND && p.y.abs() <= GUARD_BAND => {
                    *pt = p.xy().floor().to_i32();
                    true
                }
                _ => false,
            }
        });
        if projected {
            lines::triangle_outline(pixels, pts, color);
        }
    }
}
