use std::path::{Path, PathBuf};

use crate::audio::mux::{AudioMuxer, MediaTool, MuxOutcome};
use crate::config::JobParams;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Dimensions;
use crate::foundation::error::{NoiseError, NoiseResult};
use crate::io::source::{FfmpegSource, VideoSource};
use crate::pipeline::{FramePipeline, ResizeFilter};
use crate::progress::{ProgressHandle, ProgressRegistry};

/// Processed frames between progress updates.
pub const PROGRESS_INTERVAL: u64 = 30;

/// Highest percentage published while frames are still being rendered.
pub const RUNNING_PROGRESS_CAP: u8 = 99;

/// Statistics of one batch render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStats {
    /// Frames decoded, processed and written.
    pub frames: u64,
    /// Output resolution.
    pub target: Dimensions,
    /// Output frame rate (the source rate).
    pub fps: f64,
}

/// Result of [`render_job`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderReport {
    /// Frame-level statistics.
    pub stats: RenderStats,
    /// How the audio step finished.
    pub mux: MuxOutcome,
}

/// Unpaced full-quality driver: every decoded frame is processed and written in order.
#[derive(Clone, Debug)]
pub struct BatchRenderer {
    params: JobParams,
}

impl BatchRenderer {
    /// Validate `params` and build a renderer.
    pub fn new(params: JobParams) -> NoiseResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Job parameters.
    pub fn params(&self) -> &JobParams {
        &self.params
    }

    /// Render all of `source` into `sink`.
    ///
    /// Every [`PROGRESS_INTERVAL`] frames `processed / total` is published, capped at
    /// [`RUNNING_PROGRESS_CAP`]; nothing is published when the total is unknown. Failures after
    /// setup are reported as [`NoiseError::Render`].
    pub fn render(
        &self,
        source: &mut dyn VideoSource,
        sink: &mut dyn FrameSink,
        progress: Option<&ProgressHandle>,
    ) -> NoiseResult<RenderStats> {
        let info = source.info().clone();
        let mut pipeline = FramePipeline::new(info.dims, &self.params, ResizeFilter::Bilinear)?;
        let target = pipeline.target_dims();

        sink.begin(SinkConfig {
            dims: target,
            fps: info.fps,
        })
        .map_err(as_render)?;

        let mut frames = 0u64;
        while source
            .read_frame(pipeline.decode_buffer())
            .map_err(as_render)?
        {
            let out = pipeline.process_decoded().map_err(as_render)?;
            sink.push_frame(frames, out).map_err(as_render)?;
            frames += 1;

            if frames % PROGRESS_INTERVAL == 0
                && let (Some(handle), Some(total)) = (progress, info.total_frames)
            {
                handle.report(running_percent(frames, total));
            }
        }

        sink.end().map_err(as_render)?;
        tracing::debug!(frames, %target, "batch render finished");
        Ok(RenderStats {
            frames,
            target,
            fps: info.fps,
        })
    }
}

fn running_percent(done: u64, total: u64) -> u8 {
    let pct = done.saturating_mul(100) / total.max(1);
    pct.min(u64::from(RUNNING_PROGRESS_CAP)) as u8
}

fn as_render(e: NoiseError) -> NoiseError {
    match e {
        NoiseError::Render(_) => e,
        other => NoiseError::render(other.to_string()),
    }
}

/// Sibling path the silent render is written to before audio muxing.
pub fn silent_path_for(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!("{stem}.silent.mp4"))
}

/// Render `input` to `output` end to end: decode, mask, encode, mux, publish progress.
///
/// Progress for `job_id` lives in `registry` from the start of the job until this function
/// returns, on success or failure. An input that cannot be opened fails with
/// [`NoiseError::SourceOpen`] before anything is written.
#[tracing::instrument(skip(params, registry, tool), fields(scale = params.scale, nitro = params.nitro))]
pub fn render_job(
    input: &Path,
    output: &Path,
    params: &JobParams,
    registry: &ProgressRegistry,
    job_id: &str,
    tool: &dyn MediaTool,
) -> NoiseResult<RenderReport> {
    let renderer = BatchRenderer::new(params.clone())?;
    let progress = registry.begin(job_id)?;

    let mut source = FfmpegSource::open(input)?;
    tracing::info!(
        job = job_id,
        source = %source.info().dims,
        fps = source.info().fps,
        frames = ?source.info().total_frames,
        "render job started"
    );

    ensure_parent_dir(output)?;
    let silent = silent_path_for(output);
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&silent));
    let rendered = renderer.render(&mut source, &mut sink, Some(&progress));
    drop(sink);
    drop(source);
    let stats = match rendered {
        Ok(stats) => stats,
        Err(e) => {
            remove_if_exists(&silent);
            return Err(e);
        }
    };

    let mux = AudioMuxer::new(tool).mux(input, &silent, output, params.audio_mode, stats.fps);
    remove_if_exists(&silent);
    let mux = mux?;

    progress.complete();
    tracing::info!(
        job = job_id,
        frames = stats.frames,
        target = %stats.target,
        ?mux,
        "render job finished"
    );
    Ok(RenderReport { stats, mux })
}

fn remove_if_exists(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary file");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/batch.rs"]
mod tests;
