use std::collections::VecDeque;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use crate::foundation::core::{Dimensions, normalize_fps};
use crate::foundation::error::{NoiseError, NoiseResult};
use crate::foundation::frame::RgbFrame;

/// Stream properties reported by a [`VideoSource`].
#[derive(Clone, Debug, PartialEq)]
pub struct SourceInfo {
    /// Native frame size.
    pub dims: Dimensions,
    /// Frames per second, already normalized (never <= 0).
    pub fps: f64,
    /// Approximate frame count, when the container reports one.
    pub total_frames: Option<u64>,
}

impl SourceInfo {
    /// Build info, replacing unusable frame rates with the default.
    pub fn new(dims: Dimensions, fps: f64, total_frames: Option<u64>) -> Self {
        Self {
            dims,
            fps: normalize_fps(fps),
            total_frames: total_frames.filter(|&n| n > 0),
        }
    }
}

/// Sequential frame decoder owned by exactly one driver for one job.
///
/// Dropping the source releases every underlying handle.
pub trait VideoSource: Send {
    /// Stream properties.
    fn info(&self) -> &SourceInfo;

    /// Decode the next frame into `dst` (which has [`SourceInfo::dims`]).
    ///
    /// Returns `Ok(false)` once the stream is exhausted.
    fn read_frame(&mut self, dst: &mut RgbFrame) -> NoiseResult<bool>;
}

/// In-memory source for tests and debugging.
#[derive(Debug)]
pub struct InMemorySource {
    info: SourceInfo,
    frames: VecDeque<RgbFrame>,
}

impl InMemorySource {
    /// Serve `frames` in order. All frames must share the first frame's dimensions.
    pub fn new(fps: f64, frames: Vec<RgbFrame>) -> NoiseResult<Self> {
        let first = frames
            .first()
            .ok_or_else(|| NoiseError::source_open("in-memory source has no frames"))?;
        let dims = first.dims();
        if frames.iter().any(|f| f.dims() != dims) {
            return Err(NoiseError::validation(
                "in-memory source frames must share dimensions",
            ));
        }
        let total = frames.len() as u64;
        Ok(Self {
            info: SourceInfo::new(dims, fps, Some(total)),
            frames: frames.into(),
        })
    }

    /// Override the reported frame count (e.g. to mimic containers that lie or omit it).
    pub fn with_reported_total(mut self, total: Option<u64>) -> Self {
        self.info.total_frames = total;
        self
    }

    /// Frames not yet read.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl VideoSource for InMemorySource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn read_frame(&mut self, dst: &mut RgbFrame) -> NoiseResult<bool> {
        match self.frames.pop_front() {
            Some(f) => {
                dst.copy_from(&f)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Source backed by the system `ffprobe` (metadata) and `ffmpeg` (rgb24 decode to a pipe).
pub struct FfmpegSource {
    path: PathBuf,
    info: SourceInfo,
    child: Child,
    stdout: BufReader<ChildStdout>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl std::fmt::Debug for FfmpegSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSource")
            .field("path", &self.path)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl FfmpegSource {
    /// Probe and open `path` for sequential decoding.
    ///
    /// Every failure here is a [`NoiseError::SourceOpen`].
    pub fn open(path: impl AsRef<Path>) -> NoiseResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(NoiseError::source_open(format!(
                "input '{}' does not exist or is not a file",
                path.display()
            )));
        }
        let info = probe_source(path)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-an", "-sn", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"]);
        Self::spawn_decoder(path, info, cmd)
    }

    /// Spawn `cmd` as the decoder; it must write packed rgb24 frames of `info.dims` to stdout.
    pub(crate) fn spawn_decoder(
        path: &Path,
        info: SourceInfo,
        mut cmd: Command,
    ) -> NoiseResult<Self> {
        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                NoiseError::source_open(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| NoiseError::source_open("failed to open ffmpeg stdout (unexpected)"))?;
        let stderr_drain = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                stderr.read_to_end(&mut buf)?;
                Ok(buf)
            })
        });

        tracing::debug!(path = %path.display(), dims = %info.dims, fps = info.fps, "opened source");
        Ok(Self {
            path: path.to_path_buf(),
            info,
            child,
            stdout: BufReader::new(stdout),
            stderr_drain,
        })
    }

    /// Reap the decoder once its stdout is closed. Stderr is only available on the first call.
    fn finish_decoder(&mut self) -> NoiseResult<(ExitStatus, String)> {
        let status = self
            .child
            .wait()
            .map_err(|e| NoiseError::render(format!("failed waiting for ffmpeg decoder: {e}")))?;
        let stderr = match self.stderr_drain.take().map(|h| h.join()) {
            Some(Ok(Ok(bytes))) => String::from_utf8_lossy(&bytes).trim().to_string(),
            _ => String::new(),
        };
        Ok((status, stderr))
    }
}

impl VideoSource for FfmpegSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn read_frame(&mut self, dst: &mut RgbFrame) -> NoiseResult<bool> {
        if dst.dims() != self.info.dims {
            return Err(NoiseError::validation(format!(
                "decode buffer {} does not match source {}",
                dst.dims(),
                self.info.dims
            )));
        }
        let buf = dst.as_bytes_mut();
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(NoiseError::render(format!(
                        "failed reading decoded frames from ffmpeg: {e}"
                    )));
                }
            }
        }

        if filled == buf.len() {
            return Ok(true);
        }
        let (status, stderr) = self.finish_decoder()?;
        if filled > 0 {
            return Err(NoiseError::render(format!(
                "ffmpeg decode of '{}' ended mid-frame ({filled} of {} bytes, {status}): {stderr}",
                self.path.display(),
                buf.len()
            )));
        }
        if !status.success() {
            return Err(NoiseError::render(format!(
                "ffmpeg decode of '{}' failed ({status}): {stderr}",
                self.path.display()
            )));
        }
        if !stderr.is_empty() {
            tracing::warn!(
                path = %self.path.display(),
                stderr = %stderr,
                "decoder reported recoverable errors"
            );
        }
        Ok(false)
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        // Killing an already exited child fails harmlessly.
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

fn probe_source(path: &Path) -> NoiseResult<SourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        avg_frame_rate: Option<String>,
        nb_frames: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| NoiseError::source_open(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(NoiseError::source_open(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| NoiseError::source_open(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| NoiseError::source_open("no video stream found"))?;
    let dims = Dimensions::new(video.width.unwrap_or(0), video.height.unwrap_or(0))
        .map_err(|e| NoiseError::source_open(e.to_string()))?;

    let fps = video
        .avg_frame_rate
        .as_deref()
        .and_then(parse_ff_ratio)
        .filter(|f| *f > 0.0)
        .or_else(|| video.r_frame_rate.as_deref().and_then(parse_ff_ratio))
        .unwrap_or(0.0);
    let fps = normalize_fps(fps);

    let total_frames = video
        .nb_frames
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&n| n > 0)
        .or_else(|| {
            parsed
                .format
                .as_ref()
                .and_then(|f| f.duration.as_deref())
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d > 0.0)
                .map(|d| (d * fps).round() as u64)
        });

    Ok(SourceInfo::new(dims, fps, total_frames))
}

/// Parse an ffmpeg `num/den` rational.
pub(crate) fn parse_ff_ratio(s: &str) -> Option<f64> {
    let (a, b) = s.split_once('/')?;
    let a = a.trim().parse::<f64>().ok()?;
    let b = b.trim().parse::<f64>().ok()?;
    if b == 0.0 {
        return None;
    }
    Some(a / b)
}

#[cfg(test)]
#[path = "../../tests/unit/io/source.rs"]
mod tests;
