/// Closed parametric range `[min, max]`, used for slab-test windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// An interval is empty once its max does not exceed its min.
    pub fn is_empty(&self) -> bool {
        self.max <= self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Narrow this window to its overlap with `[lo, hi]`.
    ///
    /// NaN bounds (0 * inf in the slab test) leave the window untouched.
    pub fn clip(&self, lo: f32, hi: f32) -> Interval {
        Interval::new(lo.max(self.min), hi.min(self.max))
    }

    /// Parametric window of a ray in front of its origin.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };
}
