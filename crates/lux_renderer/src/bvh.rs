//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree whose nodes are figures themselves, so a subtree is
//! indistinguishable from a primitive during traversal. Leaves are the
//! scene's figures, shared with `Arc`; a range holding a single figure
//! duplicates it on both sides so that every branch has two children.
//!
//! Construction is available sequentially ([`BvhNode::build`]) or as a
//! fork-join over a bounded rayon pool ([`BvhNode::build_concurrent`]).

use crate::{nearest, stats, Figure, HitRegister, RenderError};
use lux_math::{Bounds3d, Ray};
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How often the build watcher reports progress.
const WATCH_INTERVAL: Duration = Duration::from_millis(500);

/// Strategy used to split a range of figures in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    /// Stable sort by the minimum bound on the split axis, cut at the middle.
    Sort,
    /// Partition around the middle of the centroid bounds; falls back to
    /// `Sort` when every figure lands on one side.
    #[default]
    Centroid,
}

/// BVH node: a branch with two children or the empty tree.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Arc<dyn Figure>,
        right: Arc<dyn Figure>,
        bounds: Bounds3d,
    },
    /// Tree built from zero figures.
    Empty,
}

impl BvhNode {
    /// Build a BVH on the calling thread.
    pub fn build(mut figures: Vec<Arc<dyn Figure>>, split: SplitMethod) -> Self {
        if figures.is_empty() {
            return BvhNode::Empty;
        }

        let inserted = AtomicUsize::new(0);
        watch_build(figures.len(), &inserted, || {
            build_range(&mut figures, split, &inserted)
        })
    }

    /// Build a BVH forking subtree construction onto at most `max_threads` workers.
    ///
    /// Forking stops once the threads handed out along a path reach
    /// `max_threads - 1`; deeper subtrees are built sequentially.
    pub fn build_concurrent(
        mut figures: Vec<Arc<dyn Figure>>,
        split: SplitMethod,
        max_threads: usize,
    ) -> Result<Self, RenderError> {
        if figures.is_empty() {
            return Ok(BvhNode::Empty);
        }

        let max_threads = max_threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads)
            .thread_name(|i| format!("bvh-build-{i}"))
            .build()?;

        let inserted = AtomicUsize::new(0);
        Ok(watch_build(figures.len(), &inserted, || {
            pool.install(|| build_forked(&mut figures, split, &inserted, 1, max_threads))
        }))
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        fn depth_of(figure: &dyn Figure) -> usize {
            match figure.children() {
                Some([left, right]) => 1 + depth_of(left).max(depth_of(right)),
                None => 0,
            }
        }
        depth_of(self)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BvhNode::Empty)
    }
}

impl Figure for BvhNode {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        match self {
            BvhNode::Empty => None,
            BvhNode::Branch { left, right, bounds } => {
                stats::count_bounds_test();
                bounds.hit(ray)?;

                // Children may overlap, so both are always tested
                nearest(left.intersect(ray), right.intersect(ray))
            }
        }
    }

    fn bounds(&self) -> Bounds3d {
        match self {
            BvhNode::Empty => Bounds3d::EMPTY,
            BvhNode::Branch { bounds, .. } => *bounds,
        }
    }

    fn children(&self) -> Option<[&dyn Figure; 2]> {
        match self {
            BvhNode::Empty => None,
            BvhNode::Branch { left, right, .. } => Some([left.as_ref(), right.as_ref()]),
        }
    }
}

fn branch(left: Arc<dyn Figure>, right: Arc<dyn Figure>) -> BvhNode {
    let bounds = left.bounds().union(&right.bounds());
    BvhNode::Branch { left, right, bounds }
}

fn min_on_axis(figure: &Arc<dyn Figure>, axis: usize) -> f32 {
    figure.bounds().p_min[axis]
}

fn compare_on_axis(a: &Arc<dyn Figure>, b: &Arc<dyn Figure>, axis: usize) -> CmpOrdering {
    min_on_axis(a, axis).total_cmp(&min_on_axis(b, axis))
}

/// Axis with the largest spread of figure centroids.
fn split_axis(figures: &[Arc<dyn Figure>]) -> (usize, Bounds3d) {
    let centroids = figures
        .iter()
        .fold(Bounds3d::EMPTY, |acc, f| acc.union_point(f.bounds().centroid()));
    (centroids.maximum_extent(), centroids)
}

/// Handle the one- and two-figure ranges, which become nodes directly.
fn build_small(figures: &[Arc<dyn Figure>], axis: usize, inserted: &AtomicUsize) -> Option<BvhNode> {
    match figures {
        [only] => {
            inserted.fetch_add(1, Ordering::Relaxed);
            Some(branch(Arc::clone(only), Arc::clone(only)))
        }
        [a, b] => {
            inserted.fetch_add(2, Ordering::Relaxed);
            if min_on_axis(b, axis) < min_on_axis(a, axis) {
                Some(branch(Arc::clone(b), Arc::clone(a)))
            } else {
                Some(branch(Arc::clone(a), Arc::clone(b)))
            }
        }
        _ => None,
    }
}

/// Reorder `figures` and return the index where the right half starts.
fn split_range(figures: &mut [Arc<dyn Figure>], split: SplitMethod, axis: usize, centroids: &Bounds3d) -> usize {
    let sort_split = |figures: &mut [Arc<dyn Figure>]| {
        figures.sort_by(|a, b| compare_on_axis(a, b, axis));
        figures.len() / 2
    };

    match split {
        SplitMethod::Sort => sort_split(figures),
        SplitMethod::Centroid => {
            let pivot = centroids.centroid()[axis];
            let mid = partition(figures, |f| f.bounds().centroid()[axis] < pivot);
            if mid == 0 || mid == figures.len() {
                sort_split(figures)
            } else {
                mid
            }
        }
    }
}

/// In-place partition: elements matching `pred` move to the front.
/// Returns the number of matching elements.
fn partition<T>(items: &mut [T], pred: impl Fn(&T) -> bool) -> usize {
    let mut first = 0;
    for i in 0..items.len() {
        if pred(&items[i]) {
            items.swap(first, i);
            first += 1;
        }
    }
    first
}

fn build_range(figures: &mut [Arc<dyn Figure>], split: SplitMethod, inserted: &AtomicUsize) -> BvhNode {
    let (axis, centroids) = split_axis(figures);
    if let Some(node) = build_small(figures, axis, inserted) {
        return node;
    }

    let mid = split_range(figures, split, axis, &centroids);
    let (left, right) = figures.split_at_mut(mid);
    let left = build_range(left, split, inserted);
    let right = build_range(right, split, inserted);
    branch(Arc::new(left), Arc::new(right))
}

fn build_forked(
    figures: &mut [Arc<dyn Figure>],
    split: SplitMethod,
    inserted: &AtomicUsize,
    threads_used: usize,
    max_threads: usize,
) -> BvhNode {
    if threads_used + 1 >= max_threads {
        return build_range(figures, split, inserted);
    }

    let (axis, centroids) = split_axis(figures);
    if let Some(node) = build_small(figures, axis, inserted) {
        return node;
    }

    let mid = split_range(figures, split, axis, &centroids);
    let (left, right) = figures.split_at_mut(mid);
    let (left, right) = rayon::join(
        || build_forked(left, split, inserted, threads_used + 2, max_threads),
        || build_forked(right, split, inserted, threads_used + 2, max_threads),
    );
    branch(Arc::new(left), Arc::new(right))
}

/// Run `build` while a background thread logs how many figures have been inserted.
fn watch_build<F>(total: usize, inserted: &AtomicUsize, build: F) -> BvhNode
where
    F: FnOnce() -> BvhNode,
{
    let done = Mutex::new(false);
    let finished = Condvar::new();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            let mut guard = done.lock();
            while !*guard {
                finished.wait_for(&mut guard, WATCH_INTERVAL);
                if *guard {
                    break;
                }
                let count = inserted.load(Ordering::Relaxed);
                log::info!(
                    "BVH: {count}/{total} figures inserted ({:.1}%)",
                    100.0 * count as f64 / total as f64
                );
            }
        });

        let start = std::time::Instant::now();
        let node = build();

        *done.lock() = true;
        finished.notify_all();

        log::info!(
            "BVH: built over {total} figures in {:.2?}, depth {}",
            start.elapsed(),
            node.depth()
        );
        node
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Plane, Sphere};
    use lux_math::{Color, Vec3};

    fn spheres(n: usize) -> Vec<Arc<dyn Figure>> {
        (0..n)
            .map(|i| {
                Arc::new(Sphere::new(
                    Vec3::new(i as f32, 0.0, -5.0),
                    0.4,
                    Material::diffuse(Color::splat(0.5)),
                )) as Arc<dyn Figure>
            })
            .collect()
    }

    fn assert_contains_children(figure: &dyn Figure) {
        if let Some([left, right]) = figure.children() {
            assert!(figure.bounds().contains(&left.bounds()));
            assert!(figure.bounds().contains(&right.bounds()));
            assert_contains_children(left);
            assert_contains_children(right);
        }
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::build(vec![], SplitMethod::Sort);
        assert!(bvh.is_empty());
        assert!(bvh.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z)).is_none());
        assert!(bvh.bounds().is_empty());
    }

    #[test]
    fn test_bvh_single_figure_is_duplicated() {
        let bvh = BvhNode::build(spheres(1), SplitMethod::Centroid);
        let [left, right] = bvh.children().unwrap();

        assert!(std::ptr::addr_eq(left, right));
        assert!(bvh.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z)).is_some());
    }

    #[test]
    fn test_bvh_pair_orders_by_min_bound() {
        let mut figures = spheres(2);
        figures.reverse();
        let bvh = BvhNode::build(figures, SplitMethod::Sort);
        let [left, right] = bvh.children().unwrap();

        assert!(left.bounds().p_min.x < right.bounds().p_min.x);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        for split in [SplitMethod::Sort, SplitMethod::Centroid] {
            let bvh = BvhNode::build(spheres(10), split);

            let hit = bvh
                .intersect(&Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::Z))
                .unwrap();
            assert!((hit.point.z - (-4.6)).abs() < 1e-3);

            assert!(bvh
                .intersect(&Ray::new(Vec3::new(5.0, 3.0, 0.0), -Vec3::Z))
                .is_none());
            assert_contains_children(&bvh);
        }
    }

    #[test]
    fn test_bvh_is_balanced() {
        let bvh = BvhNode::build(spheres(64), SplitMethod::Sort);
        assert_eq!(bvh.depth(), 6);
    }

    #[test]
    fn test_centroid_split_falls_back_on_coincident_centroids() {
        // Same centroid everywhere, so the partition puts everything on one side
        let figures: Vec<Arc<dyn Figure>> = (1..=5)
            .map(|i| {
                Arc::new(Sphere::new(Vec3::ZERO, i as f32, Material::BLACK)) as Arc<dyn Figure>
            })
            .collect();

        let bvh = BvhNode::build(figures, SplitMethod::Centroid);
        let hit = bvh.intersect(&Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z)).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_with_unbounded_plane() {
        let mut figures = spheres(4);
        figures.push(Arc::new(Plane::new(1.0, Vec3::Y, Material::BLACK)));
        let bvh = BvhNode::build(figures, SplitMethod::Centroid);

        let hit = bvh
            .intersect(&Ray::new(Vec3::new(30.0, 0.0, 0.0), -Vec3::Y))
            .unwrap();
        assert!((hit.t - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_concurrent_build_matches_sequential() {
        let sequential = BvhNode::build(spheres(100), SplitMethod::Centroid);
        let concurrent = BvhNode::build_concurrent(spheres(100), SplitMethod::Centroid, 4).unwrap();

        assert_eq!(sequential.bounds(), concurrent.bounds());
        assert_eq!(sequential.depth(), concurrent.depth());
        assert_contains_children(&concurrent);

        for i in 0..100 {
            let ray = Ray::new(Vec3::new(i as f32 * 0.37, 0.1, 0.0), -Vec3::Z);
            let a = sequential.intersect(&ray).map(|h| h.t);
            let b = concurrent.intersect(&ray).map(|h| h.t);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_partition() {
        let mut values = [5, 1, 4, 2, 3];
        let mid = partition(&mut values, |v| *v < 3);
        assert_eq!(mid, 2);
        assert!(values[..mid].iter().all(|v| *v < 3));
        assert!(values[mid..].iter().all(|v| *v >= 3));
    }
}
