//! Image → packed 1-bpp bitmap conversion.
//!
//! Packed output matches what the firmware draws: row-major, MSB first, each
//! row padded to a whole byte. A set bit is a dark source pixel.

use image::{imageops::FilterType, RgbaImage};

/// Threshold every pixel on the mean of its RGB channels: `< 128` sets the
/// bit.
pub fn threshold(image: &RgbaImage) -> Vec<u8> {
    let (width, height) = image.dimensions();
    let bits: Vec<bool> = image.pixels().map(|p| mean_rgb(p.0) < 128.0).collect();
    pack_bits(&bits, width, height)
}

/// Produce `frames` dithered steps that fade linearly from `a` to `b`.
///
/// Both images are resized to their common (smallest) size first. Frame `f`
/// uses `alpha = f / (frames - 1)`, so the first frame is `a` and the last is
/// `b`. `frames` is clamped to at least 2.
pub fn blend_dithered(a: &RgbaImage, b: &RgbaImage, frames: usize) -> (u32, u32, Vec<Vec<u8>>) {
    let frames = frames.max(2);
    let width = a.width().min(b.width());
    let height = a.height().min(b.height());
    let a = image::imageops::resize(a, width, height, FilterType::Triangle);
    let b = image::imageops::resize(b, width, height, FilterType::Triangle);

    let packed = (0..frames)
        .map(|f| {
            let alpha = f as f32 / (frames - 1) as f32;
            let mut gray: Vec<f32> = a
                .pixels()
                .zip(b.pixels())
                .map(|(pa, pb)| {
                    let mut rgb = [0u8; 3];
                    for (c, out) in rgb.iter_mut().enumerate() {
                        *out = (pa.0[c] as f32 * (1.0 - alpha) + pb.0[c] as f32 * alpha).round()
                            as u8;
                    }
                    mean_rgb([rgb[0], rgb[1], rgb[2], 255])
                })
                .collect();
            let bits = floyd_steinberg(&mut gray, width as usize, height as usize);
            pack_bits(&bits, width, height)
        })
        .collect();

    (width, height, packed)
}

/// Floyd–Steinberg dither of a grayscale buffer, in place. Returns `true`
/// for pixels quantised to black.
pub fn floyd_steinberg(gray: &mut [f32], width: usize, height: usize) -> Vec<bool> {
    let mut dark = vec![false; gray.len()];
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = gray[idx];
            let new = if old < 128.0 { 0.0 } else { 255.0 };
            dark[idx] = new == 0.0;
            let err = old - new;
            if x + 1 < width {
                gray[idx + 1] += err * 7.0 / 16.0;
            }
            if x > 0 && y + 1 < height {
                gray[idx + width - 1] += err * 3.0 / 16.0;
            }
            if y + 1 < height {
                gray[idx + width] += err * 5.0 / 16.0;
            }
            if x + 1 < width && y + 1 < height {
                gray[idx + width + 1] += err / 16.0;
            }
        }
    }
    dark
}

/// Pack row-major pixel flags into MSB-first bytes, `ceil(width / 8)` per
/// row.
pub fn pack_bits(bits: &[bool], width: u32, height: u32) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let stride = width.div_ceil(8);
    let mut packed = vec![0u8; stride * height];
    for y in 0..height {
        for x in 0..width {
            if bits[y * width + x] {
                packed[y * stride + (x >> 3)] |= 0x80 >> (x & 7);
            }
        }
    }
    packed
}

/// Flip every pixel, keeping row padding bits clear.
pub fn invert(packed: &mut [u8], width: u32) {
    let stride = (width as usize).div_ceil(8);
    let tail_bits = width as usize % 8;
    for (i, byte) in packed.iter_mut().enumerate() {
        *byte = !*byte;
        if tail_bits != 0 && i % stride == stride - 1 {
            *byte &= 0xFFu8 << (8 - tail_bits);
        }
    }
}

fn mean_rgb(p: [u8; 4]) -> f32 {
    (p[0] as f32 + p[1] as f32 + p[2] as f32) / 3.0
}
