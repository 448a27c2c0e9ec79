use std::ops::{Index, IndexMut};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    math::{utils::TRANSPARENT, BBox, Size},
    vec::Vec2,
    Pixel,
};

/// Owned row major 2D surface. Row `0` is the first row in memory; nothing here flips the
/// image, that only happens on export with [`Texture::flip_vertically`].
#[derive(Clone, Debug, PartialEq)]
pub struct Texture<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

pub type ColorBuffer = Texture<Pixel>;
pub type DepthBuffer = Texture<f32>;

impl<T: Clone> Texture<T> {
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Texture {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Copies `other` into `self`; both must have the same size.
    pub fn load(&mut self, other: &Texture<T>) -> Result<()> {
        if self.size() != other.size() {
            return Err(Error::SizeMismatch {
                expected: (self.width, self.height),
                actual: (other.width, other.height),
            });
        }
        self.data.clone_from_slice(&other.data);
        Ok(())
    }
}

impl<T> Texture<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        if width * height != data.len() {
            return Err(Error::SizeMismatch {
                expected: (width, height),
                actual: (data.len(), 1),
            });
        }
        Ok(Texture { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> Size<usize> {
        Size::new(self.width, self.height)
    }

    /// The whole surface as a pixel box, used to clip primitives.
    pub fn bounds(&self) -> BBox<i32> {
        BBox {
            x: 0,
            y: 0,
            width: i32::try_from(self.width).unwrap_or(i32::MAX),
            height: i32::try_from(self.height).unwrap_or(i32::MAX),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y)
            .then(|| y as usize * self.width + x as usize)
    }

    pub fn get_ref(&self, x: i32, y: i32) -> Option<&T> {
        self.index_of(x, y).map(|idx| &self.data[idx])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        let idx = self.index_of(x, y)?;
        Some(&mut self.data[idx])
    }

    /// Writes `value` at `(x, y)`. Out of range coordinates are ignored and return `false`.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn flip_vertically(&mut self) {
        let w = self.width;
        let h = self.height;
        for y in 0..h / 2 {
            let (top, bottom) = self.data.split_at_mut((h - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }
}

impl<T: Copy> Texture<T> {
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.get_ref(x, y).copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TextureWrap {
    #[default]
    #[serde(rename = "clamp")]
    Clamp,
    #[serde(rename = "repeat")]
    Repeat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Filter {
    #[default]
    #[serde(rename = "nearest")]
    Nearest,
    #[serde(rename = "bilinear")]
    Bilinear,
}

impl Texture<Pixel> {
    /// Color at `(x, y)`, fully transparent black when out of range.
    pub fn pixel(&self, x: i32, y: i32) -> Pixel {
        self.get(x, y).unwrap_or(TRANSPARENT)
    }

    /// Samples with normalized coordinates. `v = 0` is the last row, matching image files
    /// whose origin is the lower left corner.
    pub fn sample_uv(&self, uv: Vec2, wrap: TextureWrap, filter: Filter) -> Pixel {
        if self.is_empty() || !uv.is_finite() {
            return TRANSPARENT;
        }

        let (u, v) = match wrap {
            TextureWrap::Clamp => (uv.x.clamp(0., 1.), uv.y.clamp(0., 1.)),
            TextureWrap::Repeat => (uv.x.rem_euclid(1.), uv.y.rem_euclid(1.)),
        };
        let x = u * self.width as f32;
        let y = (1. - v) * self.height as f32;

        match filter {
            Filter::Nearest => self.texel(x as i32, y as i32, wrap),
            Filter::Bilinear => {
                let fx = x - 0.5;
                let fy = y - 0.5;
                let x0 = fx.floor();
                let y0 = fy.floor();
                let tx = fx - x0;
                let ty = fy - y0;
                let (x0, y0) = (x0 as i32, y0 as i32);

                let top = lerp_pixel(self.texel(x0, y0, wrap), self.texel(x0 + 1, y0, wrap), tx);
                let bottom = lerp_pixel(
                    self.texel(x0, y0 + 1, wrap),
                    self.texel(x0 + 1, y0 + 1, wrap),
                    tx,
                );
                lerp_pixel(top, bottom, ty)
            }
        }
    }

    fn texel(&self, x: i32, y: i32, wrap: TextureWrap) -> Pixel {
        let w = i32::try_from(self.width).unwrap_or(i32::MAX);
        let h = i32::try_from(self.height).unwrap_or(i32::MAX);
        let (x, y) = match wrap {
            TextureWrap::Clamp => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
            TextureWrap::Repeat => (x.rem_euclid(w), y.rem_euclid(h)),
        };
        self.pixel(x, y)
    }

    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        Texture {
            width: img.width() as usize,
            height: img.height() as usize,
            data: img.pixels().map(|p| p.0).collect(),
        }
    }

    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        let raw = self.data.iter().flatten().copied().collect();
        image::RgbaImage::from_raw(self.width as u32, self.height as u32, raw)
    }
}

fn lerp_pixel(a: Pixel, b: Pixel, t: f32) -> Pixel {
    let mut out = a;
    for (chan, (&ca, &cb)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *chan = (ca as f32 + (cb as f32 - ca as f32) * t).round().clamp(0., 255.) as u8;
    }
    out
}

impl Texture<f32> {
    /// Depth buffer with every value at negative infinity, the farthest possible depth.
    pub fn new_depth(width: usize, height: usize) -> Self {
        Texture::new(width, height, f32::NEG_INFINITY)
    }

    pub fn clear_depth(&mut self) {
        self.fill(f32::NEG_INFINITY);
    }

    /// Depth at `(x, y)`, negative infinity when out of range.
    pub fn depth(&self, x: i32, y: i32) -> f32 {
        self.get(x, y).unwrap_or(f32::NEG_INFINITY)
    }

    /// Maps `[0, max_depth]` to gray levels; untouched pixels are black.
    pub fn to_grayscale(&self, max_depth: f32) -> Vec<u8> {
        self.data
            .iter()
            .map(|&z| {
                if z.is_finite() && max_depth > 0. {
                    (z / max_depth * 255.).clamp(0., 255.) as u8
                } else {
                    0
                }
            })
            .collect()
    }
}

impl<T> Index<(usize, usize)> for Texture<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(x < self.width && y < self.height, "out of bounds");
        &self.data[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Texture<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        assert!(x < self.width && y < self.height, "out of bounds");
        &mut self.data[y * self.width + x]
    }
}
