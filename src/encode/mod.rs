//! Encoding of composited frames: container sinks for renders, JPEG for the live preview.

/// `ffmpeg`-based MP4 sink.
pub(crate) mod ffmpeg;
/// JPEG encoding for streamed frames.
pub(crate) mod jpeg;
/// `multipart/x-mixed-replace` framing helpers.
pub(crate) mod mjpeg;
/// Generic frame sink trait and built-in sinks.
pub(crate) mod sink;
