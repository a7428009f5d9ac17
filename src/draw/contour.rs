use std::fmt;

use imageproc::point::Point;
use noise::{NoiseFn, OpenSimplex};

use crate::foundation::core::Rgb8;

/// Coherent-noise jitter parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Jitter {
    /// Spatial frequency: noise is sampled at `point * roughness`.
    pub roughness: f64,
    /// Maximum offset in pixels.
    pub amplitude: f64,
}

impl Default for Jitter {
    fn default() -> Self {
        Self {
            roughness: 0.01,
            amplitude: 15.0,
        }
    }
}

/// One outline being revealed point by point.
///
/// `revealed` only ever grows, and never past `points.len()`.
pub struct Contour {
    points: Vec<Point<i32>>,
    color: Rgb8,
    revealed: usize,
    time: f64,
    x_field: OpenSimplex,
    y_field: OpenSimplex,
}

impl Contour {
    /// A fresh, unrevealed contour. The x and y jitter fields use `seed` and `seed + 1`.
    pub fn new(points: Vec<Point<i32>>, color: Rgb8, seed: u32) -> Self {
        Self {
            points,
            color,
            revealed: 0,
            time: 0.0,
            x_field: OpenSimplex::new(seed),
            y_field: OpenSimplex::new(seed.wrapping_add(1)),
        }
    }

    /// Total number of points, revealed or not.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fill colour used once the contour is complete.
    pub fn color(&self) -> Rgb8 {
        self.color
    }

    /// Number of points revealed so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Current position along the noise time axis.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Fully revealed contours are drawn filled.
    pub fn is_complete(&self) -> bool {
        self.revealed == self.points.len()
    }

    /// Reveal one more point. Returns `false` once the contour is complete.
    pub fn reveal_next(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.revealed += 1;
        true
    }

    /// Reveal every remaining point.
    pub fn reveal_all(&mut self) {
        self.revealed = self.points.len();
    }

    /// Move the jitter forward by `dt` noise units.
    pub fn advance_time(&mut self, dt: f64) {
        self.time += dt;
    }

    /// The revealed prefix, optionally displaced by the noise fields at the current time.
    pub fn get_points(&self, jitter: Option<Jitter>) -> Vec<Point<i32>> {
        let prefix = &self.points[..self.revealed];
        let Some(j) = jitter else {
            return prefix.to_vec();
        };
        prefix
            .iter()
            .map(|p| {
                let (x, y) = (f64::from(p.x), f64::from(p.y));
                let at = [x * j.roughness, y * j.roughness, self.time];
                let dx = j.amplitude * self.x_field.get(at);
                let dy = j.amplitude * self.y_field.get(at);
                Point::new((x + dx) as i32, (y + dy) as i32)
            })
            .collect()
    }
}

impl fmt::Debug for Contour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contour")
            .field("len", &self.points.len())
            .field("revealed", &self.revealed)
            .field("color", &self.color)
            .field("time", &self.time)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/contour.rs"]
mod tests;
