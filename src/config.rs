use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    math::utils::{BLACK, WHITE},
    prim3d::RasterizerConfig,
    shaders::ShaderKind,
    texture::{Filter, TextureWrap},
    transform::Camera,
    vec::{Mat4x4, Vec3},
    Pixel,
};

#[derive(Clone, Debug, Deserialize)]
pub struct Scene {
    pub rendering: RenderingConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub rasterizer: RasterizerConfig,
    #[serde(default)]
    pub light: Light,
    pub models: Vec<Model>,
}

impl Scene {
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read file {path:?}"))?;
        let scene = toml::from_str(&contents)
            .with_context(|| format!("failed to parse scene {path:?}"))?;
        Ok(scene)
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RenderingConfig {
    pub width: usize,
    pub height: usize,
    /// Range of the z-buffer, the viewport maps NDC depth to `[0, depth]`.
    #[serde(default = "RenderingConfig::default_depth")]
    pub depth: f32,
    #[serde(
        default = "RenderingConfig::default_background",
        deserialize_with = "detail::deser_color"
    )]
    pub background: Pixel,
    /// Skip triangles with a corner outside the unit cube after projection.
    #[serde(default, rename = "clip-to-unit-cube")]
    pub clip_to_unit_cube: bool,
}

impl RenderingConfig {
    pub fn default_depth() -> f32 {
        255.
    }

    pub fn default_background() -> Pixel {
        BLACK
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_eye", deserialize_with = "detail::deser_vec3")]
    pub eye: Vec3,
    #[serde(default = "Vec3::zero", deserialize_with = "detail::deser_vec3")]
    pub center: Vec3,
    #[serde(default = "CameraConfig::default_axis")]
    pub up: Axis,
    #[serde(default = "CameraConfig::default_perspective")]
    pub perspective: bool,
}

impl CameraConfig {
    pub fn into_camera(self) -> Camera {
        Camera {
            eye: self.eye,
            center: self.center,
            up: self.up.into_vec(),
            perspective: self.perspective,
        }
    }

    fn default_eye() -> Vec3 {
        Vec3::from([0., 0., 3.])
    }

    fn default_axis() -> Axis {
        Axis::Y
    }

    fn default_perspective() -> bool {
        true
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            eye: CameraConfig::default_eye(),
            center: Vec3::zero(),
            up: CameraConfig::default_axis(),
            perspective: CameraConfig::default_perspective(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Axis {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "-x")]
    NegativeX,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "-y")]
    NegativeY,
    #[serde(rename = "z")]
    Z,
    #[serde(rename = "-z")]
    NegativeZ,
}

impl Axis {
    pub fn into_vec(self) -> Vec3 {
        use Axis::*;

        match self {
            X => Vec3::from([1., 0., 0.]),
            NegativeX => Vec3::from([-1., 0., 0.]),
            Y => Vec3::from([0., 1., 0.]),
            NegativeY => Vec3::from([0., -1., 0.]),
            Z => Vec3::from([0., 0., 1.]),
            NegativeZ => Vec3::from([0., 0., -1.]),
        }
    }
}

/// Directional light.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Light {
    /// Towards the light, in world space.
    #[serde(deserialize_with = "detail::deser_vec3")]
    pub direction: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Light {
            direction: Vec3::from([0., 0., 1.]),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub name: Option<String>,
    /// OBJ file, relative to the scene file. The built-in quad when missing.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub texture: Option<PathBuf>,
    #[serde(default)]
    pub shader: ShaderKind,
    #[serde(default = "Model::default_color", deserialize_with = "detail::deser_color")]
    pub color: Pixel,
    #[serde(default)]
    pub wrap: TextureWrap,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default, rename = "alpha-clip")]
    pub alpha_clip: Option<u8>,
    /// Modulates the texture with Gouraud lighting. Textured shader only.
    #[serde(default)]
    pub lit: bool,
    #[serde(default = "Vec3::zero", deserialize_with = "detail::deser_vec3")]
    pub position: Vec3,
    /// Euler angles measured in degrees
    #[serde(default = "Vec3::zero", deserialize_with = "detail::deser_vec3")]
    pub rotation: Vec3,
    #[serde(default = "Vec3::one", deserialize_with = "detail::deser_vec3")]
    pub scale: Vec3,
}

impl Model {
    fn default_color() -> Pixel {
        WHITE
    }

    /// Scale, then rotate, then translate.
    pub fn model_matrix(&self) -> Mat4x4 {
        let rotation = self.rotation.map(f32::to_radians).to_rotation();
        self.position.to_translation() * rotation * self.scale.to_scale()
    }

    pub fn display_name(&self) -> String {
        match (&self.name, &self.path) {
            (Some(name), _) => name.clone(),
            (None, Some(path)) => path.display().to_string(),
            (None, None) => String::from("quad"),
        }
    }
}

mod detail {
    use serde::de::{Deserialize, Deserializer, Error};

    use crate::{math::utils::parse_hex_color, vec::Vec3, Pixel};

    pub fn deser_vec3<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Vec3::from(<[f32; 3] as Deserialize>::deserialize(deserializer)?))
    }

    /// `#rrggbb` or `#rrggbbaa`.
    pub fn deser_color<'de, D>(deserializer: D) -> Result<Pixel, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_color: String = Deserialize::deserialize(deserializer)?;
        parse_hex_color(&hex_color)
            .ok_or_else(|| Error::custom(format!("invalid color {hex_color:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prim3d::{CullingMode, FillRule, RasterizerImplementation};

    const SCENE: &str = r##"
[rendering]
width = 320
height = 240
background = "#102030"

[camera]
eye = [1, 1, 3]
up = "y"
perspective = false

[rasterizer]
implementation = "scanline"
cull-mode = "back-face"

[light]
direction = [0, 1, 0]

[[models]]
path = "head.obj"
texture = "head.png"
shader = "textured"
filter = "bilinear"
alpha-clip = 128

[[models]]
color = "#ff000080"
shader = "flat"
position = [1, 0, 0]
rotation = [0, 0, 90]
"##;

    #[test]
    fn test_parse_scene() {
        let scene: Scene = toml::from_str(SCENE).unwrap();
        assert_eq!((scene.rendering.width, scene.rendering.height), (320, 240));
        assert_eq!(scene.rendering.depth, 255.);
        assert_eq!(scene.rendering.background, [0x10, 0x20, 0x30, 0xff]);
        assert!(!scene.camera.perspective);
        assert_eq!(scene.camera.into_camera().eye, Vec3::from([1., 1., 3.]));
        assert_eq!(
            scene.rasterizer.implementation,
            RasterizerImplementation::Scanline
        );
        assert_eq!(scene.rasterizer.fill_rule, FillRule::TopLeft);
        assert_eq!(scene.rasterizer.culling, CullingMode::BackFace);

        let [head, quad] = &scene.models[..] else {
            panic!("expected two models");
        };
        assert_eq!(head.shader, ShaderKind::Textured);
        assert_eq!(head.filter, Filter::Bilinear);
        assert_eq!(head.wrap, TextureWrap::Clamp);
        assert_eq!(head.alpha_clip, Some(128));
        assert_eq!(head.color, WHITE);
        assert_eq!(head.display_name(), "head.obj");

        assert!(quad.path.is_none());
        assert_eq!(quad.color, [0xff, 0, 0, 0x80]);
        assert_eq!(quad.display_name(), "quad");

        // 90 degrees around z, then one unit along x
        let p = quad.model_matrix() * crate::transform::embed(Vec3::from([1., 0., 0.]));
        assert!((p.x - 1.).abs() < 1e-6);
        assert!((p.y.abs() - 1.).abs() < 1e-6);
    }

    #[test]
    fn test_defaults() {
        let scene: Scene = toml::from_str(
            r#"
            models = [{}]
            [rendering]
            width = 8
            height = 8
            "#,
        )
        .unwrap();
        assert_eq!(scene.rendering.background, BLACK);
        assert!(scene.camera.perspective);
        assert_eq!(scene.camera.up, Axis::Y);
        assert_eq!(scene.light.direction, Vec3::from([0., 0., 1.]));
        assert_eq!(scene.models[0].shader, ShaderKind::Gouraud);
        assert_eq!(scene.models[0].model_matrix(), Mat4x4::identity());
    }

    #[test]
    fn test_invalid_color() {
        let err = toml::from_str::<Scene>(
            r##"
            models = []
            [rendering]
            width = 8
            height = 8
            background = "#12"
            "##,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid color"));
    }

    #[test]
    fn test_load_missing() {
        let err = Scene::load_toml("no/such/scene.toml").unwrap_err();
        assert!(format!("{err:#}").contains("failed to read file"));
    }
}
