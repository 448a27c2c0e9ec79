//! World to screen transforms. Points travel `viewport * projection * view * model`, right to
//! left, and are brought back to 3D with a perspective divide.

use tracing::warn;

use crate::{
    error::Result,
    vec::{Mat4x4, Vec3, Vec4},
};

/// Appends the homogeneous coordinate `1`.
pub fn embed(p: Vec3) -> Vec4 {
    Vec4::from([p.x, p.y, p.z, 1.])
}

/// Embeds a direction (`w = 0`), so translations don't affect it.
pub fn embed_direction(d: Vec3) -> Vec4 {
    Vec4::from([d.x, d.y, d.z, 0.])
}

/// Perspective divide. `w == 0` produces infinite or NaN components; check with
/// [`Vec::is_finite`](crate::vec::Vec) before using the result.
pub fn project(p: Vec4) -> Vec3 {
    p.xyz() / p.w
}

/// World to camera transform. The camera sits at `eye` looking at `center`, and `center`
/// ends up at the origin of camera space with the eye on the positive z axis.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4x4 {
    let Some(z) = (eye - center).try_normalize() else {
        warn!("look_at: eye and center coincide, using identity view");
        return Mat4x4::identity();
    };
    let x = match up.cross(z).try_normalize() {
        Some(x) => x,
        None => {
            warn!("look_at: up vector is parallel to the view direction");
            any_orthogonal(z)
        }
    };
    let y = z.cross(x);

    let mut m = Mat4x4::identity();
    for (row, axis) in [x, y, z].into_iter().enumerate() {
        m[(row, 0)] = axis.x;
        m[(row, 1)] = axis.y;
        m[(row, 2)] = axis.z;
        m[(row, 3)] = -axis.dot(center);
    }
    m
}

fn any_orthogonal(v: Vec3) -> Vec3 {
    let helper = if v.x.abs() < 0.9 {
        Vec3::from([1., 0., 0.])
    } else {
        Vec3::from([0., 1., 0.])
    };
    helper.cross(v).normalize()
}

/// Maps the cube `[-1, 1]^3` to `[x, x + w] x [y, y + h] x [0, depth]`.
pub fn viewport(x: f32, y: f32, w: f32, h: f32, depth: f32) -> Mat4x4 {
    let mut m = Mat4x4::identity();
    m[(0, 3)] = x + w / 2.;
    m[(1, 3)] = y + h / 2.;
    m[(2, 3)] = depth / 2.;

    m[(0, 0)] = w / 2.;
    m[(1, 1)] = h / 2.;
    m[(2, 2)] = depth / 2.;
    m
}

/// Identity with `m[3][2] = coeff`. Use `coeff = -1 / c` with `c` the camera distance;
/// `coeff = 0` is an orthographic projection.
pub fn perspective(coeff: f32) -> Mat4x4 {
    let mut m = Mat4x4::identity();
    m[(3, 2)] = coeff;
    m
}

/// `-1 / |eye - center|`, or `0` when both points coincide.
pub fn perspective_coeff(eye: Vec3, center: Vec3) -> f32 {
    let dist = (eye - center).mag();
    if dist > 0. {
        -1. / dist
    } else {
        0.
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// When `false` the projection is orthographic.
    pub perspective: bool,
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Camera {
            eye,
            center,
            up,
            perspective: true,
        }
    }

    pub fn view(&self) -> Mat4x4 {
        look_at(self.eye, self.center, self.up)
    }

    pub fn projection(&self) -> Mat4x4 {
        if self.perspective {
            perspective(perspective_coeff(self.eye, self.center))
        } else {
            perspective(0.)
        }
    }

    /// Unit vector from the scene towards the camera.
    pub fn forward(&self) -> Option<Vec3> {
        (self.eye - self.center).try_normalize()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(
            Vec3::from([0., 0., 3.]),
            Vec3::zero(),
            Vec3::from([0., 1., 0.]),
        )
    }
}

/// The matrices of one draw call. Built by the caller and handed to shaders explicitly;
/// nothing is kept between frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct Transform {
    pub model: Mat4x4,
    pub view: Mat4x4,
    pub projection: Mat4x4,
    pub viewport: Mat4x4,
}

impl Transform {
    pub fn new(model: Mat4x4, camera: &Camera, width: usize, height: usize, depth: f32) -> Self {
        Transform {
            model,
            view: camera.view(),
            projection: camera.projection(),
            viewport: viewport(0., 0., width as f32, height as f32, depth),
        }
    }

    /// `projection * view * model`, object space to homogeneous clip space.
    pub fn clip(&self) -> Mat4x4 {
        self.projection * self.view * self.model
    }

    /// `viewport * projection * view * model`.
    pub fn combined(&self) -> Mat4x4 {
        self.viewport * self.clip()
    }

    /// Inverse transpose of the model matrix, for carrying normals into world space.
    pub fn normal_matrix(&self) -> Result<Mat4x4> {
        Ok(self.model.inverse()?.transpose())
    }

    /// Screen position of an object space point, `None` when the divide is not finite.
    pub fn to_screen(&self, p: Vec3) -> Option<Vec3> {
        let screen = project(self.combined() * embed(p));
        screen.is_finite().then_some(screen)
    }

    /// Normalized device coordinates of an object space point.
    pub fn to_ndc(&self, p: Vec3) -> Option<Vec3> {
        let ndc = project(self.clip() * embed(p));
        ndc.is_finite().then_some(ndc)
    }
}

/// Whether a point in normalized device coordinates lies inside `[-1, 1]^3`.
pub fn in_unit_cube(ndc: Vec3) -> bool {
    let range = -1.0..=1.0;
    range.contains(&ndc.x) && range.contains(&ndc.y) && range.contains(&ndc.z)
}
