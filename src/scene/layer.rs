use std::fmt;
use std::path::Path;

use anyhow::Context as _;
use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use imageproc::point::Point;
use rayon::prelude::*;

use crate::{
    draw::raster::fill_polygon,
    foundation::core::Rgb8,
    foundation::error::BelleResult,
};

/// Canny hysteresis thresholds.
pub const CANNY_LOW: f32 = 100.0;
pub const CANNY_HIGH: f32 = 200.0;

// L-infinity radius 2 is a 5x5 square structuring element.
const MORPH_RADIUS: u8 = 2;

/// One extracted outline together with its place in the contour hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// Border pixels in tracing order.
    pub points: Vec<Point<i32>>,
    /// Index of the enclosing line, if any.
    pub parent: Option<usize>,
    /// Whether this is the inner border of a hole.
    pub is_hole: bool,
}

impl Line {
    /// An outer border with no parent.
    pub fn outer(points: Vec<Point<i32>>) -> Self {
        Self {
            points,
            parent: None,
            is_hole: false,
        }
    }
}

/// One named raster image from a scene.
#[derive(Clone)]
pub struct Layer {
    name: String,
    image: RgbImage,
}

impl Layer {
    pub fn new(name: impl Into<String>, image: RgbImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    /// Decode an image file into an RGB layer.
    pub fn open(name: impl Into<String>, path: &Path) -> BelleResult<Self> {
        let image = image::open(path)
            .with_context(|| format!("decode layer image '{}'", path.display()))?
            .to_rgb8();
        Ok(Self::new(name, image))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Canny edge map of the layer's luma.
    pub fn edges(&self) -> GrayImage {
        let luma = image::imageops::grayscale(&self.image);
        imageproc::edges::canny(&luma, CANNY_LOW, CANNY_HIGH)
    }

    /// Edge-detect, thicken the edges with one 5x5 dilation and trace every border.
    ///
    /// Lines come back in tracing order, which always lists a parent before its children.
    #[tracing::instrument(skip(self), fields(layer = %self.name))]
    pub fn get_lines(&self) -> Vec<Line> {
        let dilated = dilate(&self.edges(), Norm::LInf, MORPH_RADIUS);
        let lines: Vec<Line> = find_contours::<i32>(&dilated)
            .into_iter()
            .map(|c| Line {
                points: c.points,
                parent: c.parent,
                is_hole: matches!(c.border_type, BorderType::Hole),
            })
            .collect();
        tracing::debug!(count = lines.len(), "found contours");
        lines
    }

    /// Mean colour of the region enclosed by line `i`, excluding its descendants.
    ///
    /// The mask is eroded twice by 5x5 so anti-aliased boundary pixels are not sampled. When
    /// nothing survives the erosion the result is black.
    pub fn get_line_color(&self, lines: &[Line], i: usize) -> Rgb8 {
        let (w, h) = self.image.dimensions();
        let mut mask = GrayImage::new(w, h);
        let Some(line) = lines.get(i) else {
            return Rgb8::BLACK;
        };
        fill_polygon(&mut mask, &line.points, Luma([255u8]));
        for (j, other) in lines.iter().enumerate() {
            if is_descendant(lines, j, i) {
                fill_polygon(&mut mask, &other.points, Luma([0u8]));
            }
        }
        let mask = erode(&erode(&mask, Norm::LInf, MORPH_RADIUS), Norm::LInf, MORPH_RADIUS);
        masked_mean(&self.image, &mask)
    }

    /// Colour of every line, sampled in parallel; index-aligned with `lines`.
    pub fn line_colors(&self, lines: &[Line]) -> Vec<Rgb8> {
        (0..lines.len())
            .into_par_iter()
            .map(|i| self.get_line_color(lines, i))
            .collect()
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("name", &self.name)
            .field("size", &self.image.dimensions())
            .finish()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer: \"{}\"", self.name)
    }
}

/// Whether line `j` sits (transitively) inside line `ancestor`.
fn is_descendant(lines: &[Line], j: usize, ancestor: usize) -> bool {
    let mut cur = lines.get(j).and_then(|l| l.parent);
    // bounded walk so a malformed hierarchy cannot loop forever
    for _ in 0..lines.len() {
        match cur {
            Some(p) if p == ancestor => return true,
            Some(p) => cur = lines.get(p).and_then(|l| l.parent),
            None => return false,
        }
    }
    false
}

fn masked_mean(image: &RgbImage, mask: &GrayImage) -> Rgb8 {
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for (px, m) in image.pixels().zip(mask.pixels()) {
        if m[0] == 0 {
            continue;
        }
        for (s, c) in sum.iter_mut().zip(px.0) {
            *s += u64::from(c);
        }
        count += 1;
    }
    if count == 0 {
        return Rgb8::BLACK;
    }
    let avg = |s: u64| ((s as f64) / (count as f64)).round() as u8;
    Rgb8::new(avg(sum[0]), avg(sum[1]), avg(sum[2]))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layer.rs"]
mod tests;
