use crate::foundation::error::NoiseResult;
use crate::foundation::frame::RgbFrame;

/// Interpolation used when scaling decoded frames to the target resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizeFilter {
    /// Cheapest possible lookup, used by the live preview.
    Nearest,
    /// Bilinear interpolation, used for full-quality renders.
    #[default]
    Bilinear,
}

/// Resize `src` into the preallocated `dst`. Equal sizes degrade to a copy.
pub fn resize_into(src: &RgbFrame, dst: &mut RgbFrame, filter: ResizeFilter) -> NoiseResult<()> {
    if src.dims() == dst.dims() {
        return dst.copy_from(src);
    }
    match filter {
        ResizeFilter::Nearest => nearest(src, dst),
        ResizeFilter::Bilinear => bilinear(src, dst),
    }
    Ok(())
}

fn nearest(src: &RgbFrame, dst: &mut RgbFrame) {
    let (sw, sh) = (src.dims().width as usize, src.dims().height as usize);
    let (dw, dh) = (dst.dims().width as usize, dst.dims().height as usize);
    let s = src.as_bytes();
    let d = dst.as_bytes_mut();

    for y in 0..dh {
        let sy = (y * sh / dh).min(sh - 1);
        for x in 0..dw {
            let sx = (x * sw / dw).min(sw - 1);
            let si = (sy * sw + sx) * 3;
            let di = (y * dw + x) * 3;
            d[di..di + 3].copy_from_slice(&s[si..si + 3]);
        }
    }
}

fn bilinear(src: &RgbFrame, dst: &mut RgbFrame) {
    let (sw, sh) = (src.dims().width as usize, src.dims().height as usize);
    let (dw, dh) = (dst.dims().width as usize, dst.dims().height as usize);
    let s = src.as_bytes();
    let d = dst.as_bytes_mut();
    let x_ratio = sw as f32 / dw as f32;
    let y_ratio = sh as f32 / dh as f32;

    for y in 0..dh {
        // Pixel-center mapping.
        let fy = ((y as f32 + 0.5) * y_ratio - 0.5).max(0.0);
        let y0 = (fy as usize).min(sh - 1);
        let y1 = (y0 + 1).min(sh - 1);
        let ty = fy - y0 as f32;
        for x in 0..dw {
            let fx = ((x as f32 + 0.5) * x_ratio - 0.5).max(0.0);
            let x0 = (fx as usize).min(sw - 1);
            let x1 = (x0 + 1).min(sw - 1);
            let tx = fx - x0 as f32;

            let di = (y * dw + x) * 3;
            for c in 0..3 {
                let p00 = f32::from(s[(y0 * sw + x0) * 3 + c]);
                let p01 = f32::from(s[(y0 * sw + x1) * 3 + c]);
                let p10 = f32::from(s[(y1 * sw + x0) * 3 + c]);
                let p11 = f32::from(s[(y1 * sw + x1) * 3 + c]);
                let top = p00 + (p01 - p00) * tx;
                let bottom = p10 + (p11 - p10) * tx;
                d[di + c] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/resize.rs"]
mod tests;
