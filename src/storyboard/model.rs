use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    draw::room::RoomConfig,
    encode::{ffmpeg::FfmpegEncoder, sink::PngSequenceSink},
    foundation::error::{BelleError, BelleResult},
    scene::extract::ExtractorConfig,
};

/// Reveal one layer of a scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawStep {
    pub scene: String,
    pub layer: String,
    /// Time spent revealing the layer.
    pub seconds: f64,
}

/// One instruction of a storyboard.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Hold the current picture for this many seconds.
    Delay(f64),
    Draw(DrawStep),
    /// Wipe the canvas. Saves no frame.
    Clear,
}

/// A complete render session: canvas settings, where things go and what to draw.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Storyboard {
    #[serde(flatten)]
    pub room: RoomConfig,
    #[serde(default = "default_frames_dir")]
    pub frames_dir: PathBuf,
    #[serde(default = "default_frame_digits")]
    pub frame_digits: usize,
    /// Video file to export; frames only when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Delete the frame directory after export.
    #[serde(default = "default_cleanup")]
    pub cleanup: bool,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub encoder: FfmpegEncoder,
    pub steps: Vec<Step>,
}

fn default_frames_dir() -> PathBuf {
    PathBuf::from("frames")
}

fn default_frame_digits() -> usize {
    PngSequenceSink::DEFAULT_DIGITS
}

fn default_cleanup() -> bool {
    true
}

impl Storyboard {
    /// Parse a storyboard from JSON text. The result is not validated.
    pub fn from_json_str(s: &str) -> BelleResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a storyboard JSON file.
    pub fn from_path(path: &Path) -> BelleResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read storyboard '{}'", path.display()))?;
        Self::from_json_str(&text)
            .map_err(|e| BelleError::serde(format!("storyboard '{}': {e}", path.display())))
    }

    /// Check room settings and every step's durations and names.
    pub fn validate(&self) -> BelleResult<()> {
        self.room.validate()?;
        if self.frame_digits == 0 {
            return Err(BelleError::validation("frame_digits must be > 0"));
        }
        if self.steps.is_empty() {
            return Err(BelleError::validation("storyboard has no steps"));
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Delay(secs) => check_secs(i, *secs)?,
                Step::Draw(d) => {
                    if d.scene.is_empty() || d.layer.is_empty() {
                        return Err(BelleError::validation(format!(
                            "step {i}: draw needs a scene and a layer name"
                        )));
                    }
                    check_secs(i, d.seconds)?;
                }
                Step::Clear => {}
            }
        }
        Ok(())
    }

    /// Scenes referenced by draw steps, in first-use order.
    pub fn scene_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for step in &self.steps {
            if let Step::Draw(d) = step
                && !names.contains(&d.scene.as_str())
            {
                names.push(&d.scene);
            }
        }
        names
    }
}

/// Longest duration a single step may request.
pub const MAX_STEP_SECS: f64 = 24.0 * 60.0 * 60.0;

fn check_secs(step: usize, secs: f64) -> BelleResult<()> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(BelleError::validation(format!(
            "step {step}: duration must be finite and non-negative, got {secs}"
        )));
    }
    if secs > MAX_STEP_SECS {
        return Err(BelleError::validation(format!(
            "step {step}: duration {secs}s exceeds the {MAX_STEP_SECS}s limit"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/model.rs"]
mod tests;
