//! Photons deposited by the scattering pass and the map that indexes them.

use kd_tree::{ItemAndDistance, KdPoint, KdTree};
use lux_math::{Color, Vec3};

/// Energy packet stored where a photon walk hit a diffuse surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    pub position: Vec3,
    /// Direction the photon was travelling when it arrived
    pub direction: Vec3,
    pub flux: Color,
}

impl Photon {
    pub fn new(position: Vec3, direction: Vec3, flux: Color) -> Self {
        Self {
            position,
            direction,
            flux,
        }
    }
}

impl KdPoint for Photon {
    type Scalar = f32;
    type Dim = typenum::U3;

    #[inline]
    fn at(&self, k: usize) -> f32 {
        self.position[k]
    }
}

/// Stored photons in a k-d tree keyed by position.
pub struct PhotonMap {
    tree: KdTree<Photon>,
    len: usize,
}

impl PhotonMap {
    pub fn build(photons: Vec<Photon>) -> Self {
        let len = photons.len();
        Self {
            tree: KdTree::build_by_ordered_float(photons),
            len,
        }
    }

    /// The `min(k, len)` photons closest to `point` with their distances, nearest first.
    pub fn nearest(&self, point: Vec3, k: usize) -> Vec<(&Photon, f32)> {
        if k == 0 || self.len == 0 {
            return Vec::new();
        }

        let mut found: Vec<(&Photon, f32)> = self
            .tree
            .nearests(&point.to_array(), k.min(self.len))
            .into_iter()
            .map(|ItemAndDistance { item, squared_distance }| (item, squared_distance.sqrt()))
            .collect();
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_photons(n: usize, seed: u64) -> Vec<Photon> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let position = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                Photon::new(position, -Vec3::Y, Color::ONE)
            })
            .collect()
    }

    #[test]
    fn test_empty_map() {
        let map = PhotonMap::build(Vec::new());
        assert!(map.nearest(Vec3::ZERO, 5).is_empty());
    }

    #[test]
    fn test_returns_min_of_k_and_len() {
        let map = PhotonMap::build(random_photons(10, 1));
        assert_eq!(map.nearest(Vec3::ZERO, 25).len(), 10);
        assert_eq!(map.nearest(Vec3::ZERO, 3).len(), 3);
        assert!(map.nearest(Vec3::ZERO, 0).is_empty());
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let photons = random_photons(500, 42);
        let map = PhotonMap::build(photons.clone());
        let k = 25;

        for query in random_photons(50, 7) {
            let query = query.position;
            let found = map.nearest(query, k);
            assert_eq!(found.len(), k);

            let mut distances: Vec<f32> = photons.iter().map(|p| p.position.distance(query)).collect();
            distances.sort_by(f32::total_cmp);
            for ((photon, distance), expected) in found.iter().zip(&distances[..k]) {
                assert!((distance - expected).abs() < 1e-5);
                assert!((photon.position.distance(query) - distance).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_results_are_sorted_nearest_first() {
        let map = PhotonMap::build(random_photons(200, 3));
        let found = map.nearest(Vec3::new(0.2, -0.1, 0.4), 10);
        for pair in found.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn test_duplicate_positions() {
        let map = PhotonMap::build(vec![Photon::new(Vec3::ONE, Vec3::Y, Color::ONE); 30]);
        let found = map.nearest(Vec3::ONE, 25);
        assert_eq!(found.len(), 25);
        assert!(found.iter().all(|(p, d)| p.position == Vec3::ONE && *d == 0.0));
    }
}
