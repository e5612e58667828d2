use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use crate::foundation::error::{NoiseError, NoiseResult};
use crate::foundation::frame::RgbFrame;

/// JPEG quality used for live preview frames.
pub const STREAM_JPEG_QUALITY: u8 = 70;

/// Encode `frame` as a baseline JPEG.
pub fn encode_jpeg(frame: &RgbFrame, quality: u8) -> NoiseResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(NoiseError::validation(format!(
            "jpeg quality must be in 1..=100, got {quality}"
        )));
    }
    let dims = frame.dims();
    let mut out = Vec::with_capacity(frame.as_bytes().len() / 8);
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(
            frame.as_bytes(),
            dims.width,
            dims.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| NoiseError::render(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
