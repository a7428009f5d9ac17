use std::path::Path;

use image::RgbImage;
use imageproc::point::Point;

use crate::{
    draw::{
        contour::{Contour, Jitter},
        raster::{draw_closed_outline, draw_polyline, fill_polygon},
        schedule::RevealPacer,
    },
    encode::{
        ffmpeg::{EncodeJob, EncodeOutput, VideoEncoder, prepare_output_path},
        sink::{FrameSink, PngSequenceSink},
    },
    foundation::{
        core::{Canvas, Fps, FrameIndex, Rgb8},
        error::{BelleError, BelleResult},
    },
    scene::layer::Layer,
};

/// Canvas and timing settings of a drawing session.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Session name, used in logs.
    pub name: String,
    pub canvas: Canvas,
    pub background: Rgb8,
    /// Colour of partial polylines and of the outline around finished shapes.
    pub outline: Rgb8,
    pub fps: Fps,
    /// Apply noise jitter to contour points.
    pub wiggle: bool,
    /// Noise time advanced per second of output.
    pub wiggle_rate: f64,
    pub jitter: Jitter,
    /// Seed of the x jitter field; the y field uses `noise_seed + 1`.
    pub noise_seed: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            name: "Belle".to_string(),
            canvas: Canvas::default(),
            background: Rgb8::WHITE,
            outline: Rgb8::BLACK,
            fps: Fps::default(),
            wiggle: true,
            wiggle_rate: 0.5,
            jitter: Jitter::default(),
            noise_seed: 0,
        }
    }
}

impl RoomConfig {
    /// Reject a degenerate canvas or frame rate and non-finite jitter settings.
    pub fn validate(&self) -> BelleResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(BelleError::validation("canvas width/height must be non-zero"));
        }
        self.fps.validate()?;
        if !self.wiggle_rate.is_finite() || self.wiggle_rate < 0.0 {
            return Err(BelleError::validation(
                "wiggle_rate must be finite and non-negative",
            ));
        }
        if !self.jitter.roughness.is_finite() || !self.jitter.amplitude.is_finite() {
            return Err(BelleError::validation("jitter parameters must be finite"));
        }
        Ok(())
    }
}

/// Summary of one [`BelleRoom::draw_outlines`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Contours added to the canvas.
    pub contours: usize,
    /// Total points revealed.
    pub points: u64,
    /// Frames saved, including the final one.
    pub frames: u64,
}

/// The drawing canvas: a frame buffer, the contours drawn so far and where frames go.
pub struct BelleRoom<S> {
    cfg: RoomConfig,
    frame: RgbImage,
    contours: Vec<Contour>,
    sink: S,
}

impl<S: FrameSink> BelleRoom<S> {
    /// Validate `cfg` and start with an empty background frame.
    pub fn new(cfg: RoomConfig, sink: S) -> BelleResult<Self> {
        cfg.validate()?;
        let frame = RgbImage::from_pixel(
            cfg.canvas.width,
            cfg.canvas.height,
            cfg.background.to_pixel(),
        );
        Ok(Self {
            cfg,
            frame,
            contours: Vec::new(),
            sink,
        })
    }

    /// Settings this room was created with.
    pub fn config(&self) -> &RoomConfig {
        &self.cfg
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }

    /// Active contours in draw order.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Where saved frames go.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the room and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Turn noise jitter on or off for subsequent renders.
    pub fn set_wiggle(&mut self, wiggle: bool) {
        self.cfg.wiggle = wiggle;
    }

    fn jitter(&self) -> Option<Jitter> {
        self.cfg.wiggle.then_some(self.cfg.jitter)
    }

    /// Repaint the background and every active contour in insertion order.
    pub fn render(&mut self) {
        let bg = self.cfg.background.to_pixel();
        self.frame.pixels_mut().for_each(|px| *px = bg);

        let jitter = self.jitter();
        let outline = self.cfg.outline.to_pixel();
        for contour in &self.contours {
            let pts = contour.get_points(jitter);
            if contour.is_complete() {
                fill_polygon(&mut self.frame, &pts, contour.color().to_pixel());
                draw_closed_outline(&mut self.frame, &pts, outline);
            } else {
                draw_polyline(&mut self.frame, &pts, outline);
            }
        }
    }

    /// Render, advance every contour's noise time and persist the frame.
    pub fn save(&mut self) -> BelleResult<FrameIndex> {
        self.render();
        let dt = self.cfg.wiggle_rate * self.cfg.fps.frame_duration_secs();
        for contour in &mut self.contours {
            contour.advance_time(dt);
        }
        self.sink.write_frame(&self.frame)
    }

    /// Drop every contour and repaint the empty background. No frame is saved.
    pub fn clear(&mut self) {
        self.contours.clear();
        self.render();
    }

    /// Hold the current picture for `secs`, saving `floor(secs * fps)` frames.
    pub fn delay(&mut self, secs: f64) -> BelleResult<u64> {
        let frames = self.frames_for(secs);
        tracing::debug!(room = %self.cfg.name, secs, frames, "delay");
        for _ in 0..frames {
            self.save()?;
        }
        Ok(frames)
    }

    /// Trace the outlines of `layer` and reveal them over `secs`.
    #[tracing::instrument(skip(self, layer), fields(room = %self.cfg.name, layer = %layer.name()))]
    pub fn draw_layer(&mut self, layer: &Layer, secs: f64) -> BelleResult<DrawStats> {
        let lines = layer.get_lines();
        let colors = layer.line_colors(&lines);
        let outlines = lines
            .into_iter()
            .zip(colors)
            .map(|(line, color)| (line.points, color))
            .collect();
        self.draw_outlines(outlines, secs)
    }

    /// Reveal `outlines` one point at a time, saving `floor(secs * fps)` frames spread
    /// evenly over all points, then one final frame.
    pub fn draw_outlines(
        &mut self,
        outlines: Vec<(Vec<Point<i32>>, Rgb8)>,
        secs: f64,
    ) -> BelleResult<DrawStats> {
        let points: u64 = outlines.iter().map(|(p, _)| p.len() as u64).sum();
        let budget = self.frames_for(secs);
        let mut pacer = RevealPacer::new(points, budget);
        tracing::debug!(
            contours = outlines.len(),
            points,
            frames = budget,
            period = pacer.period(),
            "revealing outlines"
        );

        let contours = outlines.len();
        for (pts, color) in outlines {
            self.contours
                .push(Contour::new(pts, color, self.cfg.noise_seed));
            let idx = self.contours.len() - 1;
            while self.contours[idx].reveal_next() {
                for _ in 0..pacer.tick() {
                    self.save()?;
                }
            }
        }
        self.save()?;

        Ok(DrawStats {
            contours,
            points,
            frames: pacer.emitted() + 1,
        })
    }

    fn frames_for(&self, secs: f64) -> u64 {
        if !secs.is_finite() {
            return 0;
        }
        self.cfg.fps.secs_to_frames_floor(secs)
    }
}

impl BelleRoom<PngSequenceSink> {
    /// Encode the saved PNG sequence into `out`, replacing any existing file.
    ///
    /// With `cleanup` the frame directory is deleted after a successful encode.
    #[tracing::instrument(skip(self, encoder), fields(room = %self.cfg.name))]
    pub fn output(
        self,
        encoder: &dyn VideoEncoder,
        out: &Path,
        cleanup: bool,
    ) -> BelleResult<EncodeOutput> {
        prepare_output_path(out)?;
        let job = EncodeJob {
            input_pattern: self.sink.ffmpeg_pattern(),
            fps: self.cfg.fps,
            out_path: out.to_path_buf(),
        };
        tracing::info!(
            frames = self.sink.frames_written(),
            out = %out.display(),
            "encoding video"
        );
        let output = encoder.encode(&job)?;
        tracing::debug!(stdout = %output.stdout, stderr = %output.stderr, "encoder output");

        if cleanup {
            tracing::debug!(dir = %self.sink.dir().display(), "removing frames");
            self.sink.remove()?;
        }
        Ok(output)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/room.rs"]
mod tests;
