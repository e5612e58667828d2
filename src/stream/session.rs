use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::JobParams;
use crate::encode::jpeg::{STREAM_JPEG_QUALITY, encode_jpeg};
use crate::foundation::core::Dimensions;
use crate::foundation::error::{NoiseError, NoiseResult};
use crate::io::source::{FfmpegSource, VideoSource};
use crate::pipeline::{FramePipeline, ResizeFilter};

/// Longest uninterrupted sleep while pacing; cancellation is polled in between.
pub const CANCEL_POLL_SLICE: Duration = Duration::from_millis(10);

/// Monotonic time source used for pacing.
pub trait Clock: Send {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    /// Block for `d`.
    fn sleep(&self, d: Duration);
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose origin is "now".
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Cloneable cancellation flag shared between a session and whoever consumes its frames.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// New, not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Why a session stopped producing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The source ran out of frames.
    Completed,
    /// The consumer cancelled.
    Cancelled,
    /// Decoding or processing failed; the error was returned once.
    SourceError,
}

/// Lifecycle of a [`StreamingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, no frame requested yet.
    Open,
    /// At least one frame was requested.
    Streaming,
    /// Terminal; all job resources have been released.
    Closed(CloseReason),
}

struct Resources {
    source: Box<dyn VideoSource>,
    pipeline: FramePipeline,
}

enum Step {
    Frame(Vec<u8>),
    Exhausted,
    Failed(NoiseError),
}

/// Paced, cancellable, pull-based producer of JPEG-encoded masked frames.
///
/// Frames are emitted no faster than `source_fps * speed`. With `speed > 1` only every
/// `round(speed)`-th decoded frame is processed. Every close path drops the source and the
/// pipeline (noise pool, detector, scratch buffers) exactly once.
pub struct StreamingSession {
    resources: Option<Resources>,
    clock: Box<dyn Clock>,
    cancel: CancelToken,
    state: SessionState,

    target: Dimensions,
    frame_interval: Duration,
    skip: u64,
    jpeg_quality: u8,

    last_start: Option<Duration>,
    frames_decoded: u64,
    frames_produced: u64,
}

impl std::fmt::Debug for StreamingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingSession")
            .field("state", &self.state)
            .field("target", &self.target)
            .field("frame_interval", &self.frame_interval)
            .field("skip", &self.skip)
            .field("frames_decoded", &self.frames_decoded)
            .field("frames_produced", &self.frames_produced)
            .finish_non_exhaustive()
    }
}

impl StreamingSession {
    /// Open `path` with the system decoder and pace with the wall clock.
    pub fn open(
        path: impl AsRef<Path>,
        params: &JobParams,
        cancel: CancelToken,
    ) -> NoiseResult<Self> {
        let source = FfmpegSource::open(path)?;
        Self::new(Box::new(source), params, cancel)
    }

    /// Stream from an already opened source, paced by the wall clock.
    pub fn new(
        source: Box<dyn VideoSource>,
        params: &JobParams,
        cancel: CancelToken,
    ) -> NoiseResult<Self> {
        Self::with_clock(source, params, cancel, Box::new(SystemClock::new()))
    }

    /// Stream from `source`, paced by `clock`.
    pub fn with_clock(
        source: Box<dyn VideoSource>,
        params: &JobParams,
        cancel: CancelToken,
        clock: Box<dyn Clock>,
    ) -> NoiseResult<Self> {
        let info = source.info().clone();
        let pipeline = FramePipeline::new(info.dims, params, ResizeFilter::Nearest)?;
        let frame_interval = Duration::try_from_secs_f64(1.0 / (info.fps * params.speed))
            .map_err(|_| {
                NoiseError::validation(format!(
                    "speed {} gives an unrepresentable frame interval at {} fps",
                    params.speed, info.fps
                ))
            })?;
        let skip = params.skip_factor();

        tracing::debug!(
            source = %info.dims,
            target = %pipeline.target_dims(),
            fps = info.fps,
            speed = params.speed,
            skip,
            interval_ms = frame_interval.as_secs_f64() * 1000.0,
            "streaming session opened"
        );

        Ok(Self {
            target: pipeline.target_dims(),
            resources: Some(Resources { source, pipeline }),
            clock,
            cancel,
            state: SessionState::Open,
            frame_interval,
            skip,
            jpeg_quality: STREAM_JPEG_QUALITY,
            last_start: None,
            frames_decoded: 0,
            frames_produced: 0,
        })
    }

    /// Produce the next JPEG, or `None` once the session is closed.
    ///
    /// A decode or processing failure is returned exactly once; later calls return `None`.
    pub fn next_frame(&mut self) -> NoiseResult<Option<Vec<u8>>> {
        if matches!(self.state, SessionState::Closed(_)) {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            self.close(CloseReason::Cancelled);
            return Ok(None);
        }
        if let Some(last) = self.last_start
            && !self.wait_until(last + self.frame_interval)
        {
            self.close(CloseReason::Cancelled);
            return Ok(None);
        }

        self.state = SessionState::Streaming;
        let started = self.clock.now();
        match self.produce() {
            Step::Frame(jpeg) => {
                self.last_start = Some(started);
                self.frames_produced += 1;
                Ok(Some(jpeg))
            }
            Step::Exhausted => {
                self.close(CloseReason::Completed);
                Ok(None)
            }
            Step::Failed(e) => {
                self.close(CloseReason::SourceError);
                Err(e)
            }
        }
    }

    fn produce(&mut self) -> Step {
        let Some(res) = self.resources.as_mut() else {
            return Step::Exhausted;
        };
        loop {
            match res.source.read_frame(res.pipeline.decode_buffer()) {
                Ok(true) => {}
                Ok(false) => return Step::Exhausted,
                Err(e) => return Step::Failed(e),
            }
            let idx = self.frames_decoded;
            self.frames_decoded += 1;
            if idx % self.skip != 0 {
                continue;
            }

            let encoded = res
                .pipeline
                .process_decoded()
                .and_then(|out| encode_jpeg(out, self.jpeg_quality));
            return match encoded {
                Ok(jpeg) => Step::Frame(jpeg),
                Err(e) => Step::Failed(e),
            };
        }
    }

    /// Sleep until `deadline` in slices, returning `false` if cancelled meanwhile.
    fn wait_until(&self, deadline: Duration) -> bool {
        loop {
            if self.cancel.is_cancelled() {
                return false;
            }
            let now = self.clock.now();
            if now >= deadline {
                return true;
            }
            self.clock.sleep((deadline - now).min(CANCEL_POLL_SLICE));
        }
    }

    fn close(&mut self, reason: CloseReason) {
        if matches!(self.state, SessionState::Closed(_)) {
            return;
        }
        self.resources = None;
        self.state = SessionState::Closed(reason);
        tracing::debug!(
            ?reason,
            decoded = self.frames_decoded,
            produced = self.frames_produced,
            "streaming session closed"
        );
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// JPEG frames returned so far.
    pub fn frames_produced(&self) -> u64 {
        self.frames_produced
    }

    /// Source frames decoded so far, including skipped ones.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Output resolution.
    pub fn target_dims(&self) -> Dimensions {
        self.target
    }

    /// Minimum spacing between frame starts.
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Decoded frames consumed per produced frame.
    pub fn skip_factor(&self) -> u64 {
        self.skip
    }

    /// Token that cancels this session.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl Iterator for StreamingSession {
    type Item = NoiseResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/session.rs"]
mod tests;
