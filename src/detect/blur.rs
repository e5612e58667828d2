use crate::foundation::error::{NoiseError, NoiseResult};
use crate::foundation::frame::RgbFrame;

/// Separable Gaussian blur for packed RGB8 frames with caller-owned scratch.
///
/// Weights are Q16 fixed point and sum to exactly `1 << 16`, so flat regions stay flat.
#[derive(Clone, Debug)]
pub(crate) struct GaussianBlur {
    kernel: Vec<u32>,
    tmp: Vec<u8>,
}

impl GaussianBlur {
    /// `radius` 2 gives the 5x5 kernel used ahead of background modelling.
    pub(crate) fn new(radius: u32, sigma: f32, byte_len: usize) -> NoiseResult<Self> {
        Ok(Self {
            kernel: gaussian_kernel_q16(radius, sigma)?,
            tmp: vec![0u8; byte_len],
        })
    }

    pub(crate) fn apply(&mut self, src: &RgbFrame, dst: &mut RgbFrame) -> NoiseResult<()> {
        if src.dims() != dst.dims() || self.tmp.len() != src.as_bytes().len() {
            return Err(NoiseError::validation(
                "blur expects src, dst and scratch of identical size",
            ));
        }
        let d = src.dims();
        horizontal_pass(src.as_bytes(), &mut self.tmp, d.width, d.height, &self.kernel);
        vertical_pass(&self.tmp, dst.as_bytes_mut(), d.width, d.height, &self.kernel);
        Ok(())
    }
}

/// Sigma of the 5-tap pre-blur kernel.
pub(crate) const SIGMA_5X5: f32 = 1.1;

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> NoiseResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(NoiseError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/detect/blur.rs"]
mod tests;
