use crate::foundation::core::Dimensions;
use crate::foundation::frame::{Mask, RgbFrame};

/// Fixed set of per-job buffers, allocated once and overwritten every frame.
///
/// `decoded` has the source resolution; every other buffer has the target resolution.
#[derive(Clone, Debug)]
pub struct ScratchBuffers {
    /// Last decoded source frame.
    pub decoded: RgbFrame,
    /// `decoded` resized to the target resolution.
    pub resized: RgbFrame,
    /// Raw detector output.
    pub mask: Mask,
    /// Mask after dilation.
    pub dilated: Mask,
    /// Composited output frame.
    pub result: RgbFrame,
}

impl ScratchBuffers {
    /// Allocate all buffers.
    pub fn new(source: Dimensions, target: Dimensions) -> Self {
        Self {
            decoded: RgbFrame::new(source),
            resized: RgbFrame::new(target),
            mask: Mask::new(target),
            dilated: Mask::new(target),
            result: RgbFrame::new(target),
        }
    }

    /// Source resolution.
    pub fn source_dims(&self) -> Dimensions {
        self.decoded.dims()
    }

    /// Target resolution.
    pub fn target_dims(&self) -> Dimensions {
        self.result.dims()
    }

    /// Total bytes held.
    pub fn byte_len(&self) -> usize {
        self.decoded.as_bytes().len()
            + self.resized.as_bytes().len()
            + self.mask.as_bytes().len()
            + self.dilated.as_bytes().len()
            + self.result.as_bytes().len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/scratch.rs"]
mod tests;
