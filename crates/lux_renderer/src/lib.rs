//! Lux - offline CPU renderer
//!
//! Path tracing with Russian roulette and next-event estimation, and
//! photon mapping with a k-d tree for density estimation. Scenes are
//! accelerated by a BVH that can be built on several threads, and pixels
//! and photon walks are dispatched to a pool of worker threads.

mod camera;
mod channel;
mod counter;
mod csg;
mod disk;
mod ellipsoid;
mod error;
mod hit;
mod light;
mod material;
mod mesh;
mod photon;
mod plane;
mod progress;
mod quadric;
mod renderer;
mod scene;
mod sphere;
mod transformed;
mod triangle;

pub mod bvh;
pub mod config;
pub mod dispatch;
pub mod pathtracer;
pub mod photon_map;
pub mod sampling;
pub mod stats;
pub mod tonemap;

pub use bvh::{BvhNode, SplitMethod};
pub use camera::Camera;
pub use channel::Channel;
pub use config::{PhotonConfig, RenderConfig};
pub use counter::ThreadSafeCounter;
pub use csg::{CsgDifference, CsgUnion};
pub use disk::Disk;
pub use dispatch::{Message, WorkerPool};
pub use ellipsoid::Ellipsoid;
pub use error::RenderError;
pub use hit::{nearest, Figure, FigureList, HitRegister, HIT_EPSILON};
pub use light::PointLight;
pub use material::{Material, AIR_REFRACTION_INDEX};
pub use mesh::{load_obj, read_obj};
pub use photon::{Photon, PhotonMap};
pub use photon_map::{DirectLightMethod, GatherSettings, Kernel};
pub use plane::Plane;
pub use progress::{format_duration, ProgressTracker};
pub use quadric::{Cone, Cylinder};
pub use renderer::{
    color_to_rgba, render_path_traced, render_photon_mapped, scatter_photons_pass, ImageBuffer, ScatterResult,
};
pub use scene::{Accelerator, Scene, World};
pub use sphere::Sphere;
pub use transformed::TransformedFigure;
pub use triangle::Triangle;

/// Re-export the math types used throughout the public API
pub use lux_math::{Bounds3d, Color, Mat4, Ray, Vec3};
