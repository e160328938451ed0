//! Closed intervals for root-finder domains and ray parameter ranges.

/// Closed interval [min, max] for range checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Calculate the size (width) of the interval
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Check if the interval contains the given value (inclusive bounds)
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Widen the interval by `slack` on both sides.
    pub fn expand(&self, slack: f32) -> Self {
        Self::new(self.min - slack, self.max + slack)
    }

    /// Clamp the given value to be within this interval's bounds
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Evenly spaced sample points starting at `min`, `step` apart.
    ///
    /// The last point is clamped to `max` so every sample stays in the domain.
    /// Points are computed by index rather than accumulated, which keeps long
    /// scans from drifting. A non-positive step yields only `min`.
    pub fn samples(&self, step: f32) -> impl Iterator<Item = f32> + '_ {
        let count = if step > 0.0 && self.size() > 0.0 {
            // Tolerate rounding so an exact multiple does not repeat `max`.
            (self.size() / step - 1e-4).ceil().max(0.0) as usize
        } else {
            0
        };
        (0..=count).map(move |i| self.clamp(self.min + i as f32 * step))
    }
}
