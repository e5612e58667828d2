use crate::detect::blur::{GaussianBlur, SIGMA_5X5};
use crate::foundation::core::Dimensions;
use crate::foundation::error::{NoiseError, NoiseResult};
use crate::foundation::frame::{MASK_ON, Mask, RgbFrame};

/// Frames of history the learning rate settles to.
pub const HISTORY: u32 = 300;
/// Squared distance / variance above which a pixel is not explained by a background mode.
pub const VAR_THRESHOLD: f32 = 60.0;

const MAX_MODES: usize = 5;
const VAR_THRESHOLD_GEN: f32 = 9.0;
const BACKGROUND_RATIO: f32 = 0.9;
const VAR_INIT: f32 = 15.0;
const VAR_MIN: f32 = 4.0;
const VAR_MAX: f32 = 5.0 * VAR_INIT;
const COMPLEXITY_PRIOR: f32 = 0.05;

/// Adaptive per-pixel Gaussian mixture background model over RGB.
///
/// Each pixel keeps up to five weighted modes (isotropic variance), sorted by weight. A sample
/// is background when it falls within a mode whose predecessors carry less than 90% of the
/// total weight. Frames are blurred 5x5 before the update to keep sensor noise out of the model.
#[derive(Clone, Debug)]
pub struct BackgroundModel {
    dims: Dimensions,
    frames_seen: u64,
    modes_used: Vec<u8>,
    weight: Vec<f32>,
    variance: Vec<f32>,
    mean: Vec<f32>,
    blur: GaussianBlur,
    blurred: RgbFrame,
}

impl BackgroundModel {
    /// Create an empty model for frames of `dims`.
    pub fn new(dims: Dimensions) -> NoiseResult<Self> {
        let px = dims.pixel_count();
        Ok(Self {
            dims,
            frames_seen: 0,
            modes_used: vec![0; px],
            weight: vec![0.0; px * MAX_MODES],
            variance: vec![0.0; px * MAX_MODES],
            mean: vec![0.0; px * MAX_MODES * 3],
            blur: GaussianBlur::new(2, SIGMA_5X5, px * RgbFrame::CHANNELS)?,
            blurred: RgbFrame::new(dims),
        })
    }

    /// Number of frames folded into the model so far.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Classify `frame` against the model, write the binary mask, then adapt the model.
    ///
    /// The first frame seeds one mode per pixel and is classified as pure background.
    pub fn apply(&mut self, frame: &RgbFrame, mask: &mut Mask) -> NoiseResult<()> {
        if frame.dims() != self.dims || mask.dims() != self.dims {
            return Err(NoiseError::validation(format!(
                "background model {} got frame {} and mask {}",
                self.dims,
                frame.dims(),
                mask.dims()
            )));
        }
        self.blur.apply(frame, &mut self.blurred)?;
        self.frames_seen += 1;

        if self.frames_seen == 1 {
            self.seed_from_blurred();
            mask.clear();
            return Ok(());
        }

        let alpha = 1.0 / (2 * self.frames_seen).min(u64::from(HISTORY)) as f32;
        let px_bytes = self.blurred.as_bytes();
        for (p, m) in mask.as_bytes_mut().iter_mut().enumerate() {
            let s = &px_bytes[p * 3..p * 3 + 3];
            let sample = [f32::from(s[0]), f32::from(s[1]), f32::from(s[2])];
            let background = update_pixel(
                &mut self.modes_used[p],
                &mut self.weight[p * MAX_MODES..(p + 1) * MAX_MODES],
                &mut self.variance[p * MAX_MODES..(p + 1) * MAX_MODES],
                &mut self.mean[p * MAX_MODES * 3..(p + 1) * MAX_MODES * 3],
                sample,
                alpha,
            );
            *m = if background { 0 } else { MASK_ON };
        }
        Ok(())
    }

    fn seed_from_blurred(&mut self) {
        for (p, s) in self.blurred.as_bytes().chunks_exact(3).enumerate() {
            self.modes_used[p] = 1;
            self.weight[p * MAX_MODES] = 1.0;
            self.variance[p * MAX_MODES] = VAR_INIT;
            let mean = &mut self.mean[p * MAX_MODES * 3..p * MAX_MODES * 3 + 3];
            for c in 0..3 {
                mean[c] = f32::from(s[c]);
            }
        }
    }
}

fn swap_modes(weight: &mut [f32], variance: &mut [f32], mean: &mut [f32], a: usize, b: usize) {
    weight.swap(a, b);
    variance.swap(a, b);
    for c in 0..3 {
        mean.swap(a * 3 + c, b * 3 + c);
    }
}

/// One mixture update for a single pixel. Returns `true` when the sample is background.
fn update_pixel(
    modes_used: &mut u8,
    weight: &mut [f32],
    variance: &mut [f32],
    mean: &mut [f32],
    sample: [f32; 3],
    alpha: f32,
) -> bool {
    let retain = 1.0 - alpha;
    let prune = -alpha * COMPLEXITY_PRIOR;

    let mut n = *modes_used as usize;
    let mut fits = false;
    let mut background = false;
    let mut total_weight = 0.0f32;

    let mut mode = 0;
    while mode < n {
        let mut w = retain * weight[mode] + prune;
        let mut slot = mode;

        if !fits {
            let var = variance[mode];
            let m = &mut mean[mode * 3..mode * 3 + 3];
            let diff = [m[0] - sample[0], m[1] - sample[1], m[2] - sample[2]];
            let dist2 = diff[0] * diff[0] + diff[1] * diff[1] + diff[2] * diff[2];

            if total_weight < BACKGROUND_RATIO && dist2 < VAR_THRESHOLD * var {
                background = true;
            }

            if dist2 < VAR_THRESHOLD_GEN * var {
                fits = true;
                w += alpha;
                let k = alpha / w;
                for c in 0..3 {
                    m[c] -= k * diff[c];
                }
                variance[mode] = (var + k * (dist2 - var)).clamp(VAR_MIN, VAR_MAX);

                // Keep modes ordered by descending weight.
                while slot > 0 && w >= weight[slot - 1] {
                    swap_modes(weight, variance, mean, slot, slot - 1);
                    slot -= 1;
                }
            }
        }

        if w < -prune {
            w = 0.0;
        }
        weight[slot] = w;
        total_weight += w;
        mode += 1;
    }

    // Drop trailing modes that decayed to nothing.
    while n > 0 && weight[n - 1] <= 0.0 {
        n -= 1;
    }

    if total_weight > 0.0 {
        let inv = 1.0 / total_weight;
        for w in weight.iter_mut().take(n) {
            *w *= inv;
        }
    }

    if !fits {
        let slot = if n == MAX_MODES {
            MAX_MODES - 1
        } else {
            n += 1;
            n - 1
        };
        if n == 1 {
            weight[slot] = 1.0;
        } else {
            weight[slot] = alpha;
            for (i, w) in weight.iter_mut().enumerate().take(n) {
                if i != slot {
                    *w *= retain;
                }
            }
        }
        mean[slot * 3..slot * 3 + 3].copy_from_slice(&sample);
        variance[slot] = VAR_INIT;

        let mut i = slot;
        while i > 0 && alpha >= weight[i - 1] {
            swap_modes(weight, variance, mean, i, i - 1);
            i -= 1;
        }
    }

    *modes_used = n as u8;
    background
}

#[cfg(test)]
#[path = "../../tests/unit/detect/background.rs"]
mod tests;
