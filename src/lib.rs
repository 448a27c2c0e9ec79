//! CPU triangle rasterizer: transform pipeline, bounding box and scanline scan conversion,
//! z-buffering and a two stage shader interface.

// lets `#[derive(Interpolate)]` name `::scanraster` from inside this crate too
extern crate self as scanraster;

pub mod barycentric;
pub mod config;
pub mod error;
pub mod lines;
pub mod math;
pub mod obj;
pub mod pipeline;
pub mod prim3d;
pub mod scene;
pub mod shaders;
pub mod texture;
pub mod transform;
pub mod vec;

pub use error::{Error, Result};

use barycentric::Interpolate;
use vec::{Vec2, Vec3};

/// RGBA, one byte per channel.
pub type Pixel = [u8; 4];

/// Indices of one face corner into the mesh's position, uv and normal lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Index {
    pub position: usize,
    pub uv: usize,
    pub normal: usize,
}

/// Triangle mesh as seen by shaders.
pub trait Mesh {
    fn triangle_count(&self) -> usize;

    /// Corner indices of a face, `None` past the last face.
    fn face(&self, face: usize) -> Option<[Index; 3]>;

    fn position(&self, i: usize) -> Vec3;

    fn uv(&self, i: usize) -> Vec2;

    fn normal(&self, i: usize) -> Vec3;

    /// All attributes of the `nth` corner of `face`.
    fn vertex(&self, face: usize, nth: usize) -> Option<Vertex> {
        let index = *self.face(face)?.get(nth)?;
        Some(Vertex {
            position: self.position(index.position),
            uv: self.uv(index.uv),
            normal: self.normal(index.normal),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Interpolate)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}
