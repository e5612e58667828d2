use rand::{RngCore as _, SeedableRng as _, rngs::StdRng};
use rayon::prelude::*;

use crate::foundation::core::Dimensions;
use crate::foundation::error::{NoiseError, NoiseResult};
use crate::foundation::frame::RgbFrame;

/// Number of textures generated per job.
///
/// A few dozen cycled textures already read as continuous noise; more only adds startup latency.
pub const POOL_SIZE: usize = 30;

/// Fixed, immutable set of random noise textures at a job's target resolution.
///
/// Element 0 doubles as the static texture that fills every output frame before foreground
/// compositing.
#[derive(Clone, Debug)]
pub struct NoisePool {
    frames: Vec<RgbFrame>,
    is_color: bool,
}

impl NoisePool {
    /// Generate [`POOL_SIZE`] textures.
    pub fn generate(dims: Dimensions, is_color: bool, seed: Option<u64>) -> NoiseResult<Self> {
        Self::with_len(dims, is_color, POOL_SIZE, seed)
    }

    /// Generate `len` textures in parallel, one independent RNG per slot.
    pub fn with_len(
        dims: Dimensions,
        is_color: bool,
        len: usize,
        seed: Option<u64>,
    ) -> NoiseResult<Self> {
        if dims.width == 0 || dims.height == 0 {
            return Err(NoiseError::validation(format!(
                "noise pool dimensions must be non-zero, got {dims}"
            )));
        }
        if len == 0 {
            return Err(NoiseError::validation("noise pool must hold at least one texture"));
        }

        let base_seed = seed.unwrap_or_else(rand::random::<u64>);
        let mut frames: Vec<RgbFrame> = (0..len).map(|_| RgbFrame::new(dims)).collect();
        frames.par_iter_mut().enumerate().for_each(|(i, frame)| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
            fill_noise(&mut rng, frame.as_bytes_mut(), is_color);
        });

        tracing::debug!(%dims, len, is_color, "generated noise pool");
        Ok(Self { frames, is_color })
    }

    /// Number of textures.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; pools hold at least one texture.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Texture dimensions.
    pub fn dims(&self) -> Dimensions {
        self.frames[0].dims()
    }

    /// Whether textures carry independent color channels.
    pub fn is_color(&self) -> bool {
        self.is_color
    }

    /// The background texture (element 0).
    pub fn static_texture(&self) -> &RgbFrame {
        &self.frames[0]
    }

    /// Texture for a frame counter, cycling through the pool.
    pub fn cycled(&self, index: u64) -> &RgbFrame {
        &self.frames[(index % self.frames.len() as u64) as usize]
    }

    /// All textures in order.
    pub fn frames(&self) -> &[RgbFrame] {
        &self.frames
    }
}

fn fill_noise(rng: &mut StdRng, rgb: &mut [u8], is_color: bool) {
    if is_color {
        rng.fill_bytes(rgb);
        return;
    }
    // One sample per pixel, replicated to all three channels.
    let mut gray = vec![0u8; rgb.len() / RgbFrame::CHANNELS];
    rng.fill_bytes(&mut gray);
    for (px, g) in rgb.chunks_exact_mut(RgbFrame::CHANNELS).zip(gray) {
        px.fill(g);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/noise/pool.rs"]
mod tests;
