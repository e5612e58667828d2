use crate::foundation::core::Dimensions;
use crate::foundation::error::{NoiseError, NoiseResult};
use crate::foundation::frame::RgbFrame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output frame size.
    pub dims: Dimensions,
    /// Output frames per second.
    pub fps: f64,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing indices, starting at 0.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> NoiseResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: u64, frame: &RgbFrame) -> NoiseResult<()>;
    /// Called once after the last frame was pushed.
    fn end(&mut self) -> NoiseResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, RgbFrame)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(u64, RgbFrame)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> NoiseResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbFrame) -> NoiseResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(NoiseError::validation("push_frame called before begin"));
        };
        if frame.dims() != cfg.dims {
            return Err(NoiseError::validation(format!(
                "frame size mismatch: got {}, expected {}",
                frame.dims(),
                cfg.dims
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> NoiseResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
