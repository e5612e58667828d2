use crate::foundation::core::Dimensions;
use crate::foundation::error::{NoiseError, NoiseResult};
use crate::foundation::frame::{GrayFrame, MASK_ON, Mask, RgbFrame, rgb_to_gray};

/// Absolute gray-level change above which a pixel counts as moving.
pub const DIFF_THRESHOLD: u8 = 25;

/// Nitro detector: threshold of the absolute gray difference to the previous frame.
#[derive(Clone, Debug)]
pub struct FrameDifference {
    gray: GrayFrame,
    prev: GrayFrame,
    primed: bool,
}

impl FrameDifference {
    /// Create a detector with no prior frame.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            gray: GrayFrame::new(dims),
            prev: GrayFrame::new(dims),
            primed: false,
        }
    }

    /// Compare `frame` with the previous one, then remember it.
    ///
    /// The first frame only seeds the state and yields an empty mask.
    pub fn apply(&mut self, frame: &RgbFrame, mask: &mut Mask) -> NoiseResult<()> {
        if mask.dims() != self.prev.dims() {
            return Err(NoiseError::validation(format!(
                "mask {} does not match detector {}",
                mask.dims(),
                self.prev.dims()
            )));
        }
        rgb_to_gray(frame, &mut self.gray)?;

        if !self.primed {
            mask.clear();
            self.primed = true;
        } else {
            for ((m, &cur), &old) in mask
                .as_bytes_mut()
                .iter_mut()
                .zip(self.gray.as_bytes())
                .zip(self.prev.as_bytes())
            {
                *m = if cur.abs_diff(old) > DIFF_THRESHOLD {
                    MASK_ON
                } else {
                    0
                };
            }
        }

        std::mem::swap(&mut self.prev, &mut self.gray);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/detect/difference.rs"]
mod tests;
