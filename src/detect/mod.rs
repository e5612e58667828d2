//! Foreground detection. One detector is chosen per job and owns all cross-frame state.

pub(crate) mod background;
pub(crate) mod blur;
pub(crate) mod difference;

use crate::foundation::core::Dimensions;
use crate::foundation::error::NoiseResult;
use crate::foundation::frame::{Mask, RgbFrame};

pub use background::BackgroundModel;
pub use difference::FrameDifference;

/// Detector variant, picked once per job from the `nitro` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    /// Thresholded difference to the previous frame.
    FrameDifference,
    /// Adaptive Gaussian mixture background model.
    BackgroundModel,
}

/// Motion detector with its per-job state.
#[derive(Clone, Debug)]
pub enum MotionDetector {
    /// See [`FrameDifference`].
    FrameDifference(FrameDifference),
    /// See [`BackgroundModel`].
    BackgroundModel(BackgroundModel),
}

impl MotionDetector {
    /// Build the detector for `kind` at the job's target resolution.
    pub fn new(kind: DetectorKind, dims: Dimensions) -> NoiseResult<Self> {
        Ok(match kind {
            DetectorKind::FrameDifference => Self::FrameDifference(FrameDifference::new(dims)),
            DetectorKind::BackgroundModel => Self::BackgroundModel(BackgroundModel::new(dims)?),
        })
    }

    /// Which variant this is.
    pub fn kind(&self) -> DetectorKind {
        match self {
            Self::FrameDifference(_) => DetectorKind::FrameDifference,
            Self::BackgroundModel(_) => DetectorKind::BackgroundModel,
        }
    }

    /// Write a binary foreground mask for `frame` and advance the detector state.
    pub fn apply(&mut self, frame: &RgbFrame, mask: &mut Mask) -> NoiseResult<()> {
        match self {
            Self::FrameDifference(d) => d.apply(frame, mask),
            Self::BackgroundModel(m) => m.apply(frame, mask),
        }
    }
}
