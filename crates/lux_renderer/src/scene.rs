//! Scene description and the read-only world the integrators trace against.

use crate::{BvhNode, Camera, Figure, FigureList, HitRegister, PointLight, RenderError, HIT_EPSILON};
use lux_math::{Bounds3d, Ray, Vec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::bvh::SplitMethod;

/// Acceleration structure the figures are gathered into before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accelerator {
    /// Linear scan over every figure.
    None,
    /// BVH built on the calling thread.
    Bvh(SplitMethod),
    /// BVH built with a bounded fork-join pool.
    ConcurrentBvh(SplitMethod),
}

impl Default for Accelerator {
    fn default() -> Self {
        Accelerator::Bvh(SplitMethod::default())
    }
}

/// Figures, point lights and a camera.
pub struct Scene {
    pub figures: Vec<Arc<dyn Figure>>,
    pub lights: Vec<PointLight>,
    pub camera: Camera,
}

impl Scene {
    /// Create a scene with no figures and no lights.
    pub fn new(camera: Camera) -> Self {
        Self {
            figures: Vec::new(),
            lights: Vec::new(),
            camera,
        }
    }

    /// Add a figure to the scene.
    pub fn add(&mut self, figure: impl Figure + 'static) {
        self.figures.push(Arc::new(figure));
    }

    /// Add a point light to the scene.
    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Move the figures into the chosen accelerator.
    ///
    /// The scene keeps its camera and lights; its figure list is left empty
    /// since the accelerator now owns the figures.
    pub fn build_world(&mut self, accelerator: Accelerator, threads: usize) -> Result<World, RenderError> {
        let figures = std::mem::take(&mut self.figures);
        log::info!("Scene: {} figures, {} point lights, accelerator {accelerator:?}", figures.len(), self.lights.len());

        let root: Arc<dyn Figure> = match accelerator {
            Accelerator::None => Arc::new(figures.into_iter().collect::<FigureList>()),
            Accelerator::Bvh(split) => Arc::new(BvhNode::build(figures, split)),
            Accelerator::ConcurrentBvh(split) => Arc::new(BvhNode::build_concurrent(figures, split, threads)?),
        };

        Ok(World::new(root, self.lights.clone()))
    }
}

/// Geometry root and lights shared read-only by every worker.
pub struct World {
    root: Arc<dyn Figure>,
    lights: Vec<PointLight>,
}

impl World {
    pub fn new(root: Arc<dyn Figure>, lights: Vec<PointLight>) -> Self {
        Self { root, lights }
    }

    /// Nearest hit along `ray`.
    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        self.root.intersect(ray)
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn bounds(&self) -> Bounds3d {
        self.root.bounds()
    }

    /// True if nothing blocks the segment from `from` to `to`.
    pub fn visible(&self, from: Vec3, to: Vec3) -> bool {
        let offset = to - from;
        let distance = offset.length();
        match self.intersect(&Ray::new(from, offset)) {
            Some(hit) => hit.t >= distance - HIT_EPSILON,
            None => true,
        }
    }
}
