use crate::foundation::core::Dimensions;
use crate::foundation::error::{NoiseError, NoiseResult};

/// Packed RGB8 frame, row-major, tightly packed (3 bytes per pixel).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbFrame {
    dims: Dimensions,
    data: Vec<u8>,
}

/// Single-channel 8-bit frame. Foreground masks use this type with values in `{0, 255}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayFrame {
    dims: Dimensions,
    data: Vec<u8>,
}

/// Alias used where a [`GrayFrame`] carries a binary foreground mask.
pub type Mask = GrayFrame;

/// Value written to mask pixels classified as foreground.
pub const MASK_ON: u8 = 255;

impl RgbFrame {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 3;

    /// Allocate a black frame.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            data: vec![0u8; dims.pixel_count() * Self::CHANNELS],
        }
    }

    /// Wrap existing RGB8 bytes.
    pub fn from_raw(dims: Dimensions, data: Vec<u8>) -> NoiseResult<Self> {
        let expected = dims.pixel_count() * Self::CHANNELS;
        if data.len() != expected {
            return Err(NoiseError::validation(format!(
                "rgb frame {dims} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self { dims, data })
    }

    /// Frame dimensions.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Raw RGB8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGB8 bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the frame, returning its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// RGB triple at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.dims.width as usize + x as usize) * Self::CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Overwrite this frame with `src`, which must have identical dimensions.
    pub fn copy_from(&mut self, src: &RgbFrame) -> NoiseResult<()> {
        if src.dims != self.dims {
            return Err(NoiseError::validation(format!(
                "frame size mismatch: got {}, expected {}",
                src.dims, self.dims
            )));
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }
}

impl GrayFrame {
    /// Allocate an all-zero frame.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            data: vec![0u8; dims.pixel_count()],
        }
    }

    /// Wrap existing single-channel bytes.
    pub fn from_raw(dims: Dimensions, data: Vec<u8>) -> NoiseResult<Self> {
        if data.len() != dims.pixel_count() {
            return Err(NoiseError::validation(format!(
                "gray frame {dims} expects {} bytes, got {}",
                dims.pixel_count(),
                data.len()
            )));
        }
        Ok(Self { dims, data })
    }

    /// Frame dimensions.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Value at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.dims.width as usize + x as usize]
    }

    /// Return `true` when at least one pixel is nonzero.
    pub fn any_set(&self) -> bool {
        self.data.iter().any(|&v| v != 0)
    }

    /// Number of nonzero pixels.
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Set every pixel to zero.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

/// BT.601 luma in 8.8 fixed point.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * u32::from(r) + 150 * u32::from(g) + 29 * u32::from(b) + 128) >> 8) as u8
}

/// Convert an RGB frame to gray into a preallocated buffer.
pub fn rgb_to_gray(src: &RgbFrame, dst: &mut GrayFrame) -> NoiseResult<()> {
    if src.dims() != dst.dims() {
        return Err(NoiseError::validation(format!(
            "gray conversion size mismatch: {} vs {}",
            src.dims(),
            dst.dims()
        )));
    }
    for (d, s) in dst
        .as_bytes_mut()
        .iter_mut()
        .zip(src.as_bytes().chunks_exact(RgbFrame::CHANNELS))
    {
        *d = luma(s[0], s[1], s[2]);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/frame.rs"]
mod tests;
