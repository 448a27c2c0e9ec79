use std::ops::Range;

use crate::{
    vec::{Vec, Vec3, Vec4},
    Pixel,
};

pub const BLACK: Pixel = [0, 0, 0, 0xff];
pub const WHITE: Pixel = [0xff, 0xff, 0xff, 0xff];
pub const TRANSPARENT: Pixel = [0, 0, 0, 0];

pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Pixel {
    [r, g, b, a]
}

/// Packs a pixel as `0xRRGGBBAA`.
pub fn pack_rgba(pixel: Pixel) -> u32 {
    u32::from_be_bytes(pixel)
}

pub fn unpack_rgba(c: u32) -> Pixel {
    c.to_be_bytes()
}

/// `0xRRGGBB` to normalized rgb.
pub fn rgb_hex(c: u32) -> Vec3 {
    let [_, r, g, b] = c.to_be_bytes();
    Vec::from([r as f32, g as f32, b as f32]) / 255.
}

/// Parses `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(s: &str) -> Option<Pixel> {
    let hex = s.strip_prefix('#')?;
    let value = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some(unpack_rgba((value << 8) | 0xff)),
        8 => Some(unpack_rgba(value)),
        _ => None,
    }
}

pub fn pixel_to_color(pixel: Pixel) -> Vec4 {
    Vec::from(pixel).map(|chan| chan as f32 / 255.)
}

pub fn color_to_pixel(c: Vec4) -> Pixel {
    c.map(|chan| (chan.clamp(0., 1.) * 255.).round() as u8).to_array()
}

/// Multiplies the rgb channels by `intensity`, leaving alpha untouched.
pub fn scale_color(pixel: Pixel, intensity: f32) -> Pixel {
    let [r, g, b, a] = pixel;
    let scale = |chan: u8| (chan as f32 * intensity).round().clamp(0., 255.) as u8;
    [scale(r), scale(g), scale(b), a]
}

pub fn lerp_color(a: Pixel, b: Pixel, t: f32) -> Pixel {
    let mix = pixel_to_color(a) * (1. - t) + pixel_to_color(b) * t;
    color_to_pixel(mix)
}

pub fn remap(val: f32, range: Range<f32>, dest: Range<f32>) -> f32 {
    dest.start + (dest.end - dest.start) * (val - range.start) / (range.end - range.start)
}
