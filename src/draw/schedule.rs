/// Spreads a frame budget evenly over the points of a layer.
///
/// Each revealed point adds `frames` to an integer accumulator; every time the accumulator
/// holds `points` a frame is due. After all `points` ticks exactly `frames` frames have been
/// requested, whatever the per-contour distribution of points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealPacer {
    points: u64,
    frames: u64,
    /// Always `< points` between ticks; wide enough that adding `frames` cannot overflow.
    acc: u128,
    emitted: u64,
}

impl RevealPacer {
    /// Pace `frames` saves over `points` reveals.
    pub fn new(points: u64, frames: u64) -> Self {
        Self {
            points,
            frames,
            acc: 0,
            emitted: 0,
        }
    }

    /// Points revealed per frame (may be fractional, infinite for a zero frame budget).
    pub fn period(&self) -> f64 {
        if self.frames == 0 {
            return f64::INFINITY;
        }
        self.points as f64 / self.frames as f64
    }

    /// Account for one revealed point and return how many frames are now due.
    pub fn tick(&mut self) -> u64 {
        if self.points == 0 {
            return 0;
        }
        let points = u128::from(self.points);
        self.acc += u128::from(self.frames);
        let due = (self.acc / points) as u64;
        self.acc %= points;
        self.emitted = self.emitted.saturating_add(due);
        due
    }

    /// Frames requested so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/schedule.rs"]
mod tests;
