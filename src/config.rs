use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;

use crate::detect::DetectorKind;
use crate::foundation::error::{NoiseError, NoiseResult};

/// Where the audio track of a batch render comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioMode {
    /// No audio track.
    #[default]
    Mute,
    /// The input video's own audio.
    Original,
    /// Synthesized white noise.
    White,
    /// Synthesized low-frequency weighted (brown) noise.
    Brown,
}

impl AudioMode {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mute => "mute",
            Self::Original => "original",
            Self::White => "white",
            Self::Brown => "brown",
        }
    }
}

impl FromStr for AudioMode {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mute" => Ok(Self::Mute),
            "original" => Ok(Self::Original),
            "white" => Ok(Self::White),
            "brown" => Ok(Self::Brown),
            other => Err(NoiseError::validation(format!(
                "unknown audio mode '{other}' (expected mute, original, white or brown)"
            ))),
        }
    }
}

impl std::fmt::Display for AudioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-job parameters shared by the streaming and batch drivers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobParams {
    /// Scale factor applied to both source axes (truncated to whole pixels).
    pub scale: f64,
    /// Color noise when `true`, gray noise replicated to three channels otherwise.
    pub is_color: bool,
    /// Playback speed multiplier. Values above 1 also enable frame skipping when streaming.
    pub speed: f64,
    /// Use the cheap frame-difference detector instead of the background model.
    pub nitro: bool,
    /// Audio remux strategy for batch renders.
    pub audio_mode: AudioMode,
    /// Seed for noise generation. `None` draws fresh entropy per job.
    pub seed: Option<u64>,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            is_color: true,
            speed: 1.0,
            nitro: false,
            audio_mode: AudioMode::Mute,
            seed: None,
        }
    }
}

impl JobParams {
    /// Load and validate parameters from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> NoiseResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job params '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate parameters from a JSON string.
    pub fn from_json_str(s: &str) -> NoiseResult<Self> {
        let params: Self = serde_json::from_str(s)
            .map_err(|e| NoiseError::validation(format!("job params json: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    /// Check numeric ranges.
    pub fn validate(&self) -> NoiseResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(NoiseError::validation(format!(
                "scale must be > 0, got {}",
                self.scale
            )));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(NoiseError::validation(format!(
                "speed must be > 0, got {}",
                self.speed
            )));
        }
        Ok(())
    }

    /// Process every n-th decoded frame when streaming: `round(speed)` above 1, else 1.
    pub fn skip_factor(&self) -> u64 {
        if self.speed > 1.0 {
            (self.speed.round() as u64).max(1)
        } else {
            1
        }
    }

    /// Detector selected by the `nitro` flag.
    pub fn detector_kind(&self) -> DetectorKind {
        if self.nitro {
            DetectorKind::FrameDifference
        } else {
            DetectorKind::BackgroundModel
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
