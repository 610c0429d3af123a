use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::render::plan::PixelRect;

const ONE_Q16: u32 = 1 << 16;

/// Normalized gaussian weights in Q16 summing to exactly one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kernel {
    weights: Vec<u32>,
}

impl Kernel {
    pub fn gaussian(radius: u32, sigma: f32) -> SocialflowResult<Self> {
        if radius == 0 {
            return Ok(Self {
                weights: vec![ONE_Q16],
            });
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(SocialflowError::validation("blur sigma must be finite and > 0"));
        }
        let r = i64::from(radius);
        let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
        let raw: Vec<f64> = (-r..=r)
            .map(|i| {
                let x = i as f64;
                (-x * x / denom).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        if sum <= 0.0 {
            return Err(SocialflowError::export("gaussian kernel sum is zero"));
        }

        let mut weights: Vec<u32> = raw
            .iter()
            .map(|w| ((w / sum) * f64::from(ONE_Q16)).round().clamp(0.0, f64::from(ONE_Q16)) as u32)
            .collect();
        // Put the rounding error on the center tap.
        let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
        let mid = weights.len() / 2;
        let fixed = (i64::from(weights[mid]) + i64::from(ONE_Q16) - total).clamp(0, i64::from(ONE_Q16));
        weights[mid] = fixed as u32;
        Ok(Self { weights })
    }

    pub fn radius(&self) -> usize {
        self.weights.len() / 2
    }

    pub fn weights(&self) -> &[u32] {
        &self.weights
    }
}

/// Blur a premultiplied RGBA8 buffer. Samples past the edges repeat the edge pixel.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> SocialflowResult<Vec<u8>> {
    let len = buffer_len(width, height)?;
    if src.len() != len {
        return Err(SocialflowError::export(
            "blur expects a buffer of width*height*4 bytes",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }
    let kernel = Kernel::gaussian(radius, sigma)?;
    let (w, h) = (width as usize, height as usize);
    let mut tmp = vec![0u8; len];
    let mut out = vec![0u8; len];
    convolve(src, &mut tmp, w, h, &kernel, Axis::X);
    convolve(&tmp, &mut out, w, h, &kernel, Axis::Y);
    Ok(out)
}

/// Blur only `region` of `buf` in place; the rest of the buffer is untouched.
pub fn blur_region_in_place(
    buf: &mut [u8],
    width: u32,
    height: u32,
    region: PixelRect,
    radius: u32,
    sigma: f32,
) -> SocialflowResult<()> {
    if buf.len() != buffer_len(width, height)? {
        return Err(SocialflowError::export(
            "blur expects a buffer of width*height*4 bytes",
        ));
    }
    if region.x1 > width || region.y1 > height || region.x0 >= region.x1 || region.y0 >= region.y1 {
        return Err(SocialflowError::export("blur region out of bounds"));
    }
    let (rw, rh) = (region.width() as usize, region.height() as usize);
    let stride = width as usize * 4;
    let row_bytes = rw * 4;

    let mut crop = Vec::with_capacity(rw * rh * 4);
    for y in region.y0 as usize..region.y1 as usize {
        let start = y * stride + region.x0 as usize * 4;
        crop.extend_from_slice(&buf[start..start + row_bytes]);
    }
    let blurred = blur_rgba8_premul(&crop, region.width(), region.height(), radius, sigma)?;
    for (row, y) in (region.y0 as usize..region.y1 as usize).enumerate() {
        let start = y * stride + region.x0 as usize * 4;
        buf[start..start + row_bytes].copy_from_slice(&blurred[row * row_bytes..(row + 1) * row_bytes]);
    }
    Ok(())
}

fn buffer_len(width: u32, height: u32) -> SocialflowResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SocialflowError::export("blur buffer size overflow"))
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn convolve(src: &[u8], dst: &mut [u8], w: usize, h: usize, kernel: &Kernel, axis: Axis) {
    let r = kernel.radius() as isize;
    let (len, last) = match axis {
        Axis::X => (w, w as isize - 1),
        Axis::Y => (h, h as isize - 1),
    };
    for y in 0..h {
        for x in 0..w {
            let along = match axis {
                Axis::X => x,
                Axis::Y => y,
            } as isize;
            let mut acc = [0u64; 4];
            for (k, &weight) in kernel.weights().iter().enumerate() {
                let s = (along + k as isize - r).clamp(0, last) as usize;
                debug_assert!(s < len);
                let idx = match axis {
                    Axis::X => (y * w + s) * 4,
                    Axis::Y => (s * w + x) * 4,
                };
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(weight) * u64::from(src[idx + c]);
                }
            }
            let out = (y * w + x) * 4;
            for (c, a) in acc.iter().enumerate() {
                dst[out + c] = q16_to_u8(*a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + (u64::from(ONE_Q16) >> 1)) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
