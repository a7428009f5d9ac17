use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::foundation::{
    core::Fps,
    error::{BelleError, BelleResult},
};

/// One request to turn a numbered image sequence into a video file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeJob {
    /// printf-style input pattern, e.g. `frames/%010d.png`.
    pub input_pattern: PathBuf,
    /// Input frame rate.
    pub fps: Fps,
    /// Target video file.
    pub out_path: PathBuf,
}

impl EncodeJob {
    /// Reject an invalid frame rate or an empty output path.
    pub fn validate(&self) -> BelleResult<()> {
        self.fps.validate()?;
        if self.out_path.as_os_str().is_empty() {
            return Err(BelleError::validation("encode output path must not be empty"));
        }
        Ok(())
    }
}

/// Captured encoder output streams.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Something that can assemble a saved frame sequence into a video.
pub trait VideoEncoder {
    /// Fail early when the encoder cannot run at all.
    fn check_available(&self) -> BelleResult<()> {
        Ok(())
    }

    /// Run the encode to completion.
    fn encode(&self, job: &EncodeJob) -> BelleResult<EncodeOutput>;
}

/// Encodes with the system `ffmpeg` binary.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FfmpegEncoder {
    /// Executable to run.
    pub program: PathBuf,
    /// Output pixel format.
    pub pix_fmt: String,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            pix_fmt: "yuv420p".to_string(),
        }
    }
}

impl FfmpegEncoder {
    /// Command-line arguments for `job`.
    pub fn args(&self, job: &EncodeJob) -> Vec<OsString> {
        vec![
            "-framerate".into(),
            job.fps.to_ffmpeg_rate().into(),
            "-i".into(),
            job.input_pattern.clone().into_os_string(),
            "-pix_fmt".into(),
            self.pix_fmt.clone().into(),
            job.out_path.clone().into_os_string(),
        ]
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn check_available(&self) -> BelleResult<()> {
        if is_program_on_path(&self.program) {
            return Ok(());
        }
        Err(BelleError::encode(format!(
            "{} is required for video export, but was not found on PATH",
            self.program.display()
        )))
    }

    #[tracing::instrument(skip(self))]
    fn encode(&self, job: &EncodeJob) -> BelleResult<EncodeOutput> {
        job.validate()?;

        let output = Command::new(&self.program)
            .args(self.args(job))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                BelleError::encode(format!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;

        let captured = EncodeOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(BelleError::encode(format!(
                "{} exited with status {}: {}",
                self.program.display(),
                output.status,
                captured.stderr.trim()
            )));
        }

        Ok(captured)
    }
}

fn is_program_on_path(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> BelleResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Make room for a fresh output file: delete any existing file and create its directory.
pub fn prepare_output_path(path: &Path) -> BelleResult<()> {
    if path.is_file() {
        tracing::debug!(path = %path.display(), "removing existing output");
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing output '{}'", path.display()))?;
    }
    ensure_parent_dir(path)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
