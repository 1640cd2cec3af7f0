use crate::math::CONCAVITY_TOLERANCE;

/// Open diameter range `(min, max)` of the holes to close.
///
/// Both bounds are non-negative and `min <= max` always holds: lowering
/// `max` below `min` drags `min` down with it, and raising `min` above
/// `max` stops it at `max`. `NaN` inputs count as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    min: f64,
    max: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl Limits {
    /// Creates limits, clamping `min` down to `max` if needed.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        let max = non_negative(max);
        Self {
            min: non_negative(min).min(max),
            max,
        }
    }

    /// Limits accepting every positive finite diameter.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }

    /// Exclusive lower bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Exclusive upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Sets the lower bound, clamped to the current upper bound.
    pub fn set_min(&mut self, min: f64) {
        self.min = non_negative(min).min(self.max);
    }

    /// Sets the upper bound, dragging the lower bound down if it is larger.
    pub fn set_max(&mut self, max: f64) {
        self.max = non_negative(max);
        self.min = self.min.min(self.max);
    }

    /// Returns `true` if `diameter` lies strictly between the bounds.
    #[must_use]
    pub fn contains(&self, diameter: f64) -> bool {
        self.min < diameter && diameter < self.max
    }
}

fn non_negative(value: f64) -> f64 {
    // `f64::max` returns the non-NaN operand.
    value.max(0.0)
}

/// Parameters of the detection phase.
#[derive(Debug, Clone, Copy)]
pub struct DetectOptions {
    /// Threshold the concavity predicate has to exceed for two faces to
    /// join the same patch.
    pub tolerance: f64,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            tolerance: CONCAVITY_TOLERANCE,
        }
    }
}
