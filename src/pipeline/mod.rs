//! Per-frame decode -> resize -> detect -> composite over a fixed scratch arena.

pub(crate) mod resize;
pub(crate) mod scratch;

use crate::composite::composite;
use crate::config::JobParams;
use crate::detect::MotionDetector;
use crate::foundation::core::Dimensions;
use crate::foundation::error::NoiseResult;
use crate::foundation::frame::{Mask, RgbFrame};
use crate::noise::pool::NoisePool;

pub use resize::{ResizeFilter, resize_into};
pub use scratch::ScratchBuffers;

/// Job-scoped frame processor shared by the streaming and batch drivers.
///
/// Owns the noise pool, the detector state and the scratch buffers; nothing is allocated per
/// frame. Callers decode straight into [`FramePipeline::decode_buffer`] and then call
/// [`FramePipeline::process_decoded`].
#[derive(Debug)]
pub struct FramePipeline {
    pool: NoisePool,
    detector: MotionDetector,
    scratch: ScratchBuffers,
    filter: ResizeFilter,
    nitro: bool,
    pool_index: u64,
}

impl FramePipeline {
    /// Build a pipeline for a source of `source` dimensions.
    pub fn new(source: Dimensions, params: &JobParams, filter: ResizeFilter) -> NoiseResult<Self> {
        params.validate()?;
        let target = source.scaled(params.scale)?;
        let pool = NoisePool::generate(target, params.is_color, params.seed)?;
        Self::with_pool(source, pool, params, filter)
    }

    /// Build a pipeline around an existing pool, whose dimensions define the target resolution.
    pub fn with_pool(
        source: Dimensions,
        pool: NoisePool,
        params: &JobParams,
        filter: ResizeFilter,
    ) -> NoiseResult<Self> {
        let target = pool.dims();
        let detector = MotionDetector::new(params.detector_kind(), target)?;
        Ok(Self {
            pool,
            detector,
            scratch: ScratchBuffers::new(source, target),
            filter,
            nitro: params.nitro,
            pool_index: 0,
        })
    }

    /// Buffer the next source frame must be decoded into.
    pub fn decode_buffer(&mut self) -> &mut RgbFrame {
        &mut self.scratch.decoded
    }

    /// Run resize, detection and compositing on the decode buffer.
    ///
    /// The returned frame stays valid until the next call.
    pub fn process_decoded(&mut self) -> NoiseResult<&RgbFrame> {
        let s = &mut self.scratch;
        resize_into(&s.decoded, &mut s.resized, self.filter)?;
        self.detector.apply(&s.resized, &mut s.mask)?;
        composite(
            &mut s.result,
            &self.pool,
            &s.mask,
            &mut s.dilated,
            self.pool_index,
            self.nitro,
        )?;
        self.pool_index += 1;
        Ok(&s.result)
    }

    /// Output resolution.
    pub fn target_dims(&self) -> Dimensions {
        self.scratch.target_dims()
    }

    /// Input resolution.
    pub fn source_dims(&self) -> Dimensions {
        self.scratch.source_dims()
    }

    /// Frames processed so far; also the pool index of the next frame.
    pub fn frames_processed(&self) -> u64 {
        self.pool_index
    }

    /// Noise textures used by this job.
    pub fn pool(&self) -> &NoisePool {
        &self.pool
    }

    /// Active detector.
    pub fn detector(&self) -> &MotionDetector {
        &self.detector
    }

    /// Last raw detector mask.
    pub fn last_mask(&self) -> &Mask {
        &self.scratch.mask
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/frame_pipeline.rs"]
mod tests;
