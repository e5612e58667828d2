use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::AudioMode;
use crate::foundation::error::{NoiseError, NoiseResult};

/// Duration assumed for synthesized audio when the rendered video cannot be probed.
pub const DEFAULT_PROBE_SECS: f64 = 60.0;

/// Spectrum of synthesized noise audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoiseColor {
    /// Flat spectrum.
    White,
    /// Low-frequency weighted.
    Brown,
}

impl NoiseColor {
    /// Name understood by ffmpeg's `anoisesrc`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Brown => "brown",
        }
    }
}

/// Audio track requested for the final file.
#[derive(Clone, Debug, PartialEq)]
pub enum AudioSpec {
    /// Video only.
    None,
    /// First audio stream of another media file.
    FromFile(PathBuf),
    /// Synthesized noise lasting `duration_secs`.
    Noise {
        /// Noise spectrum.
        color: NoiseColor,
        /// Length of the generated track.
        duration_secs: f64,
    },
}

/// One encode invocation handed to a [`MediaTool`].
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeRequest {
    /// Picture source (the silent render).
    pub video: PathBuf,
    /// Audio source.
    pub audio: AudioSpec,
    /// Destination file.
    pub output: PathBuf,
    /// Output frame rate.
    pub fps: f64,
}

/// External media encoder/prober.
pub trait MediaTool: Send + Sync {
    /// Produce `req.output` from `req.video` and `req.audio`.
    fn encode(&self, req: &EncodeRequest) -> NoiseResult<()>;
    /// Container duration of `path` in seconds.
    fn probe_duration(&self, path: &Path) -> NoiseResult<f64>;
}

/// [`MediaTool`] backed by the system `ffmpeg` and `ffprobe` binaries.
#[derive(Clone, Debug)]
pub struct FfmpegTool {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegTool {
    /// Use `ffmpeg` and `ffprobe` from `PATH`.
    pub fn new() -> Self {
        Self::with_binaries("ffmpeg", "ffprobe")
    }

    /// Use explicit binaries.
    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    fn encode_args(req: &EncodeRequest) -> Vec<String> {
        let mut args: Vec<String> = ["-y", "-v", "error", "-nostdin", "-i"]
            .into_iter()
            .map(String::from)
            .collect();
        args.push(req.video.display().to_string());

        match &req.audio {
            AudioSpec::None => {
                args.extend(
                    [
                        "-an",
                        "-c:v",
                        "libx264",
                        "-pix_fmt",
                        "yuv420p",
                        "-r",
                    ]
                    .map(String::from),
                );
                args.push(format!("{:.6}", req.fps));
            }
            AudioSpec::FromFile(path) => {
                args.push("-i".into());
                args.push(path.display().to_string());
                args.extend(
                    [
                        "-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac",
                        "-shortest",
                    ]
                    .map(String::from),
                );
            }
            AudioSpec::Noise {
                color,
                duration_secs,
            } => {
                args.extend(["-f", "lavfi", "-i"].map(String::from));
                args.push(format!(
                    "anoisesrc=color={}:duration={duration_secs:.3}:sample_rate=44100",
                    color.as_str()
                ));
                args.extend(
                    [
                        "-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-af", "apad", "-c:a",
                        "aac", "-shortest",
                    ]
                    .map(String::from),
                );
            }
        }

        args.extend(["-movflags", "+faststart"].map(String::from));
        args.push(req.output.display().to_string());
        args
    }
}

impl MediaTool for FfmpegTool {
    fn encode(&self, req: &EncodeRequest) -> NoiseResult<()> {
        let out = Command::new(&self.ffmpeg)
            .args(Self::encode_args(req))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                NoiseError::mux(format!(
                    "failed to run '{}': {e}",
                    self.ffmpeg.display()
                ))
            })?;
        if !out.status.success() {
            return Err(NoiseError::mux(format!(
                "ffmpeg exited with status {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(())
    }

    fn probe_duration(&self, path: &Path) -> NoiseResult<f64> {
        let out = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .map_err(|e| {
                NoiseError::mux(format!(
                    "failed to run '{}': {e}",
                    self.ffprobe.display()
                ))
            })?;
        if !out.status.success() {
            return Err(NoiseError::mux(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        let text = String::from_utf8_lossy(&out.stdout);
        text.trim()
            .parse::<f64>()
            .map_err(|e| NoiseError::mux(format!("unparseable duration '{}': {e}", text.trim())))
    }
}

/// How the final file was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MuxOutcome {
    /// The requested audio strategy succeeded.
    Remuxed,
    /// The tool failed; the silent render was copied to the output instead.
    SilentFallback,
}

/// Turns a silent render into the final output according to an [`AudioMode`].
pub struct AudioMuxer<'a> {
    tool: &'a dyn MediaTool,
}

impl std::fmt::Debug for AudioMuxer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioMuxer").finish_non_exhaustive()
    }
}

impl<'a> AudioMuxer<'a> {
    /// Muxer delegating to `tool`.
    pub fn new(tool: &'a dyn MediaTool) -> Self {
        Self { tool }
    }

    /// Write `output` from `silent` (and `original` for [`AudioMode::Original`]).
    ///
    /// Tool failures never fail the job: they are logged and the silent video is copied to
    /// `output`. Only a failure of that copy is returned, as [`NoiseError::Mux`].
    #[tracing::instrument(skip(self))]
    pub fn mux(
        &self,
        original: &Path,
        silent: &Path,
        output: &Path,
        mode: AudioMode,
        fps: f64,
    ) -> NoiseResult<MuxOutcome> {
        let audio = match mode {
            AudioMode::Mute => AudioSpec::None,
            AudioMode::Original => AudioSpec::FromFile(original.to_path_buf()),
            AudioMode::White | AudioMode::Brown => AudioSpec::Noise {
                color: if mode == AudioMode::White {
                    NoiseColor::White
                } else {
                    NoiseColor::Brown
                },
                duration_secs: self.probe_or_default(silent),
            },
        };
        let req = EncodeRequest {
            video: silent.to_path_buf(),
            audio,
            output: output.to_path_buf(),
            fps,
        };

        let result = self.tool.encode(&req).and_then(|()| {
            if non_empty_file(output) {
                Ok(())
            } else {
                Err(NoiseError::mux("encoder reported success but wrote no output"))
            }
        });
        match result {
            Ok(()) => Ok(MuxOutcome::Remuxed),
            Err(e) => {
                tracing::error!(error = %e, "audio mux failed; delivering silent video");
                std::fs::copy(silent, output).map_err(|copy_err| {
                    NoiseError::mux(format!(
                        "fallback copy '{}' -> '{}' failed: {copy_err}",
                        silent.display(),
                        output.display()
                    ))
                })?;
                Ok(MuxOutcome::SilentFallback)
            }
        }
    }

    fn probe_or_default(&self, path: &Path) -> f64 {
        match self.tool.probe_duration(path) {
            Ok(d) if d.is_finite() && d > 0.0 => d,
            Ok(d) => {
                tracing::warn!(duration = d, "probe returned unusable duration; assuming 60s");
                DEFAULT_PROBE_SECS
            }
            Err(e) => {
                tracing::warn!(error = %e, "duration probe failed; assuming 60s");
                DEFAULT_PROBE_SECS
            }
        }
    }
}

fn non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mux.rs"]
mod tests;
