//! belleroom draws stop-motion style line animations from layered GIMP scenes.
//!
//! # Pipeline overview
//!
//! 1. **Extract**: a [`LayerExtractor`] flattens each layer of a scene into a PNG, and
//!    [`load_scene`] decodes them into a [`Scene`] of [`Layer`]s.
//! 2. **Trace**: [`Layer::get_lines`] runs Canny edge detection, a 5x5 dilation and border
//!    following; [`Layer::line_colors`] samples the mean colour inside each outline.
//! 3. **Reveal**: [`BelleRoom::draw_layer`] adds the outlines as [`Contour`]s and reveals them
//!    point by point, saving an evenly paced number of frames through a [`FrameSink`].
//! 4. **Encode**: [`BelleRoom::output`] hands the numbered PNG sequence to a [`VideoEncoder`]
//!    (the system `ffmpeg` by default).
//!
//! A [`Storyboard`] describes a whole session as JSON; [`run_storyboard`] plays one.
#![forbid(unsafe_code)]

mod draw;
mod encode;
mod foundation;
mod scene;
mod storyboard;

pub use draw::contour::{Contour, Jitter};
pub use draw::raster::{draw_closed_outline, draw_polyline, fill_polygon};
pub use draw::room::{BelleRoom, DrawStats, RoomConfig};
pub use draw::schedule::RevealPacer;
pub use encode::ffmpeg::{
    EncodeJob, EncodeOutput, FfmpegEncoder, VideoEncoder, ensure_parent_dir, prepare_output_path,
};
pub use encode::sink::{FrameSink, InMemorySink, PngSequenceSink};
pub use foundation::core::{Canvas, Fps, FrameIndex, Rgb8};
pub use foundation::error::{BelleError, BelleResult};
pub use scene::extract::{
    ExtractedLayer, ExtractorConfig, LayerExtractor, PngDirExtractor, XcfLayerExtractor,
    load_scene, parse_layer_names,
};
pub use scene::layer::{CANNY_HIGH, CANNY_LOW, Layer, Line};
pub use scene::model::Scene;
pub use storyboard::model::{DrawStep, MAX_STEP_SECS, Step, Storyboard};
pub use storyboard::run::{RunSummary, play_steps, run_storyboard};

/// Re-exported so callers can build outlines without depending on `imageproc` directly.
pub use imageproc::point::Point;
