use crate::foundation::error::{NoiseError, NoiseResult};
use crate::foundation::frame::{Mask, RgbFrame};
use crate::noise::pool::NoisePool;

/// Fill `out` with the static texture, then reveal `pool.cycled(pool_index)` wherever the
/// mask is set.
///
/// Outside nitro mode the mask is first grown by one 3x3 dilation into `dilated`, which closes
/// pinholes and slightly widens moving regions. Returns `true` when any foreground pixel was
/// drawn.
pub fn composite(
    out: &mut RgbFrame,
    pool: &NoisePool,
    mask: &Mask,
    dilated: &mut Mask,
    pool_index: u64,
    nitro: bool,
) -> NoiseResult<bool> {
    let dims = pool.dims();
    if out.dims() != dims || mask.dims() != dims || dilated.dims() != dims {
        return Err(NoiseError::validation(format!(
            "composite expects {dims} buffers, got out {} mask {} dilated {}",
            out.dims(),
            mask.dims(),
            dilated.dims()
        )));
    }

    out.copy_from(pool.static_texture())?;
    if !mask.any_set() {
        return Ok(false);
    }

    let region = if nitro {
        mask
    } else {
        dilate_3x3(mask, dilated)?;
        &*dilated
    };

    let fg = pool.cycled(pool_index);
    for ((dst, src), &m) in out
        .as_bytes_mut()
        .chunks_exact_mut(RgbFrame::CHANNELS)
        .zip(fg.as_bytes().chunks_exact(RgbFrame::CHANNELS))
        .zip(region.as_bytes())
    {
        if m != 0 {
            dst.copy_from_slice(src);
        }
    }
    Ok(true)
}

/// One iteration of binary dilation with a 3x3 rectangle. Out-of-bounds neighbours are ignored.
pub fn dilate_3x3(src: &Mask, dst: &mut Mask) -> NoiseResult<()> {
    if src.dims() != dst.dims() {
        return Err(NoiseError::validation("dilate expects equal-size masks"));
    }
    let w = src.dims().width as usize;
    let h = src.dims().height as usize;
    let s = src.as_bytes();
    let d = dst.as_bytes_mut();

    for y in 0..h {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(h - 1);
        for x in 0..w {
            let x0 = x.saturating_sub(1);
            let x1 = (x + 1).min(w - 1);
            let mut v = 0u8;
            for yy in y0..=y1 {
                let row = &s[yy * w + x0..=yy * w + x1];
                v = v.max(row.iter().copied().max().unwrap_or(0));
            }
            d[y * w + x] = v;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/composite.rs"]
mod tests;
