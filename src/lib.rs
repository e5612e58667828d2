//! noisemask hides the content of a video behind animated noise.
//!
//! Every output frame starts as one fixed noise texture. Wherever a motion detector flags
//! change, the pixels are replaced by a texture cycled from a small pool, so moving shapes stay
//! visible as shimmering silhouettes while everything static dissolves into the background.
//!
//! Two drivers share the same [`FramePipeline`]:
//!
//! - [`StreamingSession`] pulls paced, cancellable JPEG frames for a live preview
//! - [`BatchRenderer`] / [`render_job`] render a whole file to MP4 and remux audio via
//!   [`AudioMuxer`], publishing progress to a [`ProgressRegistry`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod audio;
pub(crate) mod composite;
pub(crate) mod config;
pub(crate) mod detect;
pub(crate) mod encode;
pub(crate) mod io;
pub(crate) mod noise;
pub(crate) mod pipeline;
pub(crate) mod progress;
pub(crate) mod render;
pub(crate) mod stream;

pub use crate::foundation::core::{DEFAULT_FPS, Dimensions, normalize_fps};
pub use crate::foundation::error::{NoiseError, NoiseResult};
pub use crate::foundation::frame::{GrayFrame, MASK_ON, Mask, RgbFrame, luma, rgb_to_gray};

pub use crate::audio::mux::{
    AudioMuxer, AudioSpec, DEFAULT_PROBE_SECS, EncodeRequest, FfmpegTool, MediaTool, MuxOutcome,
    NoiseColor,
};
pub use crate::composite::{composite, dilate_3x3};
pub use crate::config::{AudioMode, JobParams};
pub use crate::detect::{BackgroundModel, DetectorKind, FrameDifference, MotionDetector};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::jpeg::{STREAM_JPEG_QUALITY, encode_jpeg};
pub use crate::encode::mjpeg::{stream_content_type, write_multipart_part};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::io::source::{FfmpegSource, InMemorySource, SourceInfo, VideoSource};
pub use crate::noise::pool::{NoisePool, POOL_SIZE};
pub use crate::pipeline::{FramePipeline, ResizeFilter, ScratchBuffers, resize_into};
pub use crate::progress::{ProgressHandle, ProgressRegistry};
pub use crate::render::batch::{
    BatchRenderer, PROGRESS_INTERVAL, RUNNING_PROGRESS_CAP, RenderReport, RenderStats,
    render_job, silent_path_for,
};
pub use crate::stream::session::{
    CancelToken, Clock, CloseReason, SessionState, StreamingSession, SystemClock,
};
