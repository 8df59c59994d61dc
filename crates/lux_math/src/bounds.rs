use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box given by its minimum and maximum corners.
///
/// `Bounds3d::EMPTY` holds inverted infinities so that any union absorbs it.
/// Unbounded figures (infinite planes) use `Bounds3d::UNBOUNDED`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3d {
    pub p_min: Vec3,
    pub p_max: Vec3,
}

impl Bounds3d {
    /// Empty box, the identity of [`Bounds3d::union`].
    pub const EMPTY: Bounds3d = Bounds3d {
        p_min: Vec3::splat(f32::INFINITY),
        p_max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Box spanning every representable coordinate.
    pub const UNBOUNDED: Bounds3d = Bounds3d {
        p_min: Vec3::splat(f32::MIN),
        p_max: Vec3::splat(f32::MAX),
    };

    /// Create a box from its corners as given.
    pub fn new(p_min: Vec3, p_max: Vec3) -> Self {
        Self { p_min, p_max }
    }

    /// Create the box spanned by two arbitrary corner points.
    ///
    /// Flat axes are padded so that the slab test never sees a zero-width box.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut bounds = Self {
            p_min: a.min(b),
            p_max: a.max(b),
        };
        bounds.pad_to_minimums();
        bounds
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Bounds3d) -> Self {
        Self {
            p_min: self.p_min.min(other.p_min),
            p_max: self.p_max.max(other.p_max),
        }
    }

    /// Smallest box containing both `self` and `p`.
    pub fn union_point(&self, p: Vec3) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// True if the box has never absorbed a point.
    pub fn is_empty(&self) -> bool {
        self.p_min.cmpgt(self.p_max).any()
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains(&self, other: &Bounds3d) -> bool {
        self.p_min.cmple(other.p_min).all() && self.p_max.cmpge(other.p_max).all()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.p_min.cmple(p).all() && self.p_max.cmpge(p).all()
    }

    /// Index of the axis with the largest extent: 0 (x), 1 (y) or 2 (z).
    pub fn maximum_extent(&self) -> usize {
        let d = self.p_max - self.p_min;

        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Center point of the box.
    ///
    /// Halves each corner first so that `UNBOUNDED` does not overflow.
    pub fn centroid(&self) -> Vec3 {
        self.p_min * 0.5 + self.p_max * 0.5
    }

    /// Slab test against the ray in front of its origin.
    ///
    /// Returns the parametric window `[t_min, t_max]` in which the ray is
    /// inside the box, or `None` if it misses.
    pub fn hit(&self, ray: &Ray) -> Option<Interval> {
        let origin = ray.origin();
        let direction = ray.direction();
        let mut window = Interval::FORWARD;

        for axis in 0..3 {
            let inv_d = 1.0 / direction[axis];
            let mut t0 = (self.p_min[axis] - origin[axis]) * inv_d;
            let mut t1 = (self.p_max[axis] - origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            window = window.clip(t0, t1);
            if window.is_empty() {
                return None;
            }
        }

        Some(window)
    }

    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        for axis in 0..3 {
            if self.p_max[axis] - self.p_min[axis] < delta {
                self.p_min[axis] -= delta / 2.0;
                self.p_max[axis] += delta / 2.0;
            }
        }
    }
}

impl Default for Bounds3d {
    fn default() -> Self {
        Self::EMPTY
    }
}
