use crate::foundation::error::{NoiseError, NoiseResult};

/// Frame rate assumed when a source reports a non-positive or non-finite rate.
pub const DEFAULT_FPS: f64 = 30.0;

/// Pixel dimensions of a frame or buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create validated dimensions (both axes must be non-zero).
    pub fn new(width: u32, height: u32) -> NoiseResult<Self> {
        if width == 0 || height == 0 {
            return Err(NoiseError::validation(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Apply a scale factor to both axes, truncating to whole pixels.
    ///
    /// Fails when the factor is not a positive finite number or when a scaled axis collapses
    /// to zero.
    pub fn scaled(self, scale: f64) -> NoiseResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(NoiseError::validation(format!(
                "scale must be a positive finite number, got {scale}"
            )));
        }
        let w = (f64::from(self.width) * scale).floor();
        let h = (f64::from(self.height) * scale).floor();
        if w < 1.0 || h < 1.0 || w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
            return Err(NoiseError::validation(format!(
                "scale {scale} turns {}x{} into an unusable {w}x{h} frame",
                self.width, self.height
            )));
        }
        Ok(Self {
            width: w as u32,
            height: h as u32,
        })
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Replace unusable source frame rates with [`DEFAULT_FPS`].
pub fn normalize_fps(fps: f64) -> f64 {
    if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        DEFAULT_FPS
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
