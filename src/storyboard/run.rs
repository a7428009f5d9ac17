use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    draw::room::BelleRoom,
    encode::{
        ffmpeg::VideoEncoder,
        sink::{FrameSink, PngSequenceSink},
    },
    foundation::error::{BelleError, BelleResult},
    scene::{
        extract::{LayerExtractor, load_scene},
        model::Scene,
    },
    storyboard::model::{Step, Storyboard},
};

/// What a storyboard run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames saved.
    pub frames: u64,
    /// Exported video, if any.
    pub output: Option<PathBuf>,
}

/// Execute `steps` against `room`; returns the number of frames saved.
pub fn play_steps<S: FrameSink>(
    room: &mut BelleRoom<S>,
    scenes: &BTreeMap<String, Scene>,
    steps: &[Step],
) -> BelleResult<u64> {
    let start = room.sink().frames_written();
    for (i, step) in steps.iter().enumerate() {
        match step {
            Step::Delay(secs) => {
                room.delay(*secs)?;
            }
            Step::Draw(d) => {
                let scene = scenes.get(&d.scene).ok_or_else(|| {
                    BelleError::validation(format!("step {i}: scene \"{}\" is not loaded", d.scene))
                })?;
                let layer = scene.require_layer(&d.layer)?;
                let stats = room.draw_layer(layer, d.seconds)?;
                tracing::debug!(step = i, ?stats, "drew layer");
            }
            Step::Clear => room.clear(),
        }
    }
    Ok(room.sink().frames_written() - start)
}

/// Load every scene, render all steps into the frame directory and export the video when an
/// encoder is given and the storyboard names an output.
#[tracing::instrument(skip_all, fields(name = %storyboard.room.name))]
pub fn run_storyboard(
    storyboard: &Storyboard,
    extractor: &dyn LayerExtractor,
    encoder: Option<&dyn VideoEncoder>,
) -> BelleResult<RunSummary> {
    storyboard.validate()?;
    let export = match (encoder, &storyboard.output) {
        (Some(enc), Some(out)) => {
            enc.check_available()?;
            Some((enc, out))
        }
        _ => None,
    };

    let mut scenes = BTreeMap::new();
    for name in storyboard.scene_names() {
        scenes.insert(name.to_string(), load_scene(extractor, name)?);
    }

    let sink = PngSequenceSink::create(&storyboard.frames_dir, storyboard.frame_digits)?;
    let mut room = BelleRoom::new(storyboard.room.clone(), sink)?;
    let frames = play_steps(&mut room, &scenes, &storyboard.steps)?;
    tracing::info!(frames, dir = %storyboard.frames_dir.display(), "rendered frames");

    let output = match export {
        Some((enc, out)) => {
            room.output(enc, out, storyboard.cleanup)?;
            tracing::info!(out = %out.display(), "exported video");
            Some(out.clone())
        }
        None => None,
    };

    Ok(RunSummary { frames, output })
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/run.rs"]
mod tests;
