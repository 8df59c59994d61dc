//! Preset Cornell box scenes.
//!
//! The box spans [-1, 1] on every axis with the camera outside its open
//! front, looking down +Z.

use anyhow::Result;
use clap::ValueEnum;
use lux_renderer::{
    Camera, Color, Cone, CsgDifference, CsgUnion, Cylinder, Disk, Ellipsoid, Figure, Mat4, Material, Plane,
    PointLight, Scene, Sphere, TransformedFigure, Triangle, Vec3,
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Glossy and glass spheres under a point light
    PointLight,
    /// Glossy and glass spheres under an emitting ceiling
    AreaLight,
    /// Two diffuse spheres under a point light
    DiffuseSpheres,
    /// Dim emitting ceiling plus a point light
    TwoLights,
    /// Triangles, transformed spheres and CSG
    Showcase,
    /// Cylinder, cone, mirror disk and ellipsoid under a point light
    Quadrics,
}

pub fn build(preset: Preset, width: usize, height: usize, rays_per_pixel: usize) -> Result<Scene> {
    let camera = Camera::new(
        Vec3::new(0.0, 0.0, -3.5),
        Vec3::Y,
        Vec3::new(0.0, 0.0, 3.0),
        width,
        height,
        rays_per_pixel,
    );
    let mut scene = Scene::new(camera);

    let ceiling = match preset {
        Preset::AreaLight | Preset::Showcase => Material::area_light(Color::ONE),
        Preset::TwoLights => Material::area_light(Color::splat(0.5)),
        Preset::PointLight | Preset::DiffuseSpheres | Preset::Quadrics => Material::diffuse(Color::splat(0.6)),
    };
    add_box(&mut scene, ceiling);

    match preset {
        Preset::PointLight => {
            add_glass_pair(&mut scene, Color::new(0.1, 1.0 / 6.0, 0.7 / 3.0), Color::splat(0.8));
            scene.add_light(PointLight::new(Vec3::new(0.0, 0.5, 0.0), Color::ONE));
        }
        Preset::AreaLight => {
            add_glass_pair(&mut scene, Color::new(0.3, 0.5, 0.7), Color::splat(0.25));
        }
        Preset::TwoLights => {
            add_glass_pair(&mut scene, Color::new(0.3, 0.5, 0.7), Color::splat(0.25));
            scene.add_light(PointLight::new(Vec3::new(0.0, 0.5, 0.0), Color::splat(0.5)));
        }
        Preset::DiffuseSpheres => {
            scene.add(Sphere::new(
                Vec3::new(-0.5, -0.7, 0.25),
                0.3,
                Material::diffuse(Color::new(0.8, 0.0, 0.8)),
            ));
            scene.add(Sphere::new(
                Vec3::new(0.5, -0.7, -0.25),
                0.3,
                Material::diffuse(Color::new(0.0, 0.8, 0.8)),
            ));
            scene.add_light(PointLight::new(Vec3::new(0.0, 0.5, 0.0), Color::ONE));
        }
        Preset::Showcase => add_showcase(&mut scene)?,
        Preset::Quadrics => {
            add_quadrics(&mut scene)?;
            scene.add_light(PointLight::new(Vec3::new(0.0, 0.5, 0.0), Color::ONE));
        }
    }

    Ok(scene)
}

/// Red left wall, green right wall, grey floor and back wall.
fn add_box(scene: &mut Scene, ceiling: Material) {
    let grey = Material::diffuse(Color::splat(0.6));
    scene.add(Plane::new(1.0, Vec3::X, Material::diffuse(Color::new(0.8, 0.0, 0.0))));
    scene.add(Plane::new(1.0, -Vec3::X, Material::diffuse(Color::new(0.0, 0.8, 0.0))));
    scene.add(Plane::new(1.0, Vec3::Y, grey));
    scene.add(Plane::new(1.0, -Vec3::Y, ceiling));
    scene.add(Plane::new(1.0, -Vec3::Z, grey));
}

/// A diffuse and glossy sphere on the left, a glass sphere on the right.
fn add_glass_pair(scene: &mut Scene, diffuse: Color, specular: Color) {
    scene.add(Sphere::new(
        Vec3::new(-0.5, -0.7, 0.25),
        0.3,
        Material::diffuse(diffuse).with_specular(specular),
    ));
    scene.add(Sphere::new(
        Vec3::new(0.5, -0.7, -0.25),
        0.3,
        Material::glass(Color::splat(0.85), Color::splat(0.1), 1.5),
    ));
}

fn add_showcase(scene: &mut Scene) -> Result<()> {
    let blue = Material::diffuse(Color::new(0.3, 0.5, 0.7));

    // Yellow panel in front of the back wall with a round hole
    let panel = Arc::new(Plane::new(
        0.8,
        -Vec3::Z,
        Material::diffuse(Color::new(249.0 / 255.0, 215.0 / 255.0, 28.0 / 255.0)),
    ));
    let hole = Arc::new(Sphere::new(Vec3::new(0.0, 0.0, 0.35), 0.7, blue));
    scene.add(CsgDifference::new(panel, hole));

    // Two ellipsoids crossing each other
    let unit = Arc::new(Sphere::new(Vec3::ZERO, 1.0, blue));
    let upright = TransformedFigure::new(
        unit.clone(),
        Mat4::from_translation(Vec3::new(0.0, -0.3, 0.3)) * Mat4::from_scale(Vec3::new(0.15, 0.45, 0.15)),
    )?;
    let lying = TransformedFigure::new(
        unit,
        Mat4::from_translation(Vec3::new(0.0, -0.3, 0.3))
            * Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2)
            * Mat4::from_scale(Vec3::new(0.15, 0.45, 0.15)),
    )?
    .with_material(Material::mirror(Color::splat(0.9)));
    scene.add(CsgUnion::new(Arc::new(upright), Arc::new(lying)));

    // Tetrahedron of triangles on the floor
    let apex = Vec3::new(-0.55, -0.4, -0.2);
    let base = [
        Vec3::new(-0.85, -1.0, -0.4),
        Vec3::new(-0.25, -1.0, -0.4),
        Vec3::new(-0.55, -1.0, 0.1),
    ];
    let red = Material::diffuse(Color::new(0.8, 0.2, 0.2)).with_specular(Color::splat(0.15));
    for i in 0..3 {
        scene.add(Triangle::new(base[i], base[(i + 1) % 3], apex, red));
    }

    scene.add(Sphere::new(
        Vec3::new(0.55, -0.75, -0.3),
        0.25,
        Material::glass(Color::splat(0.9), Color::splat(0.05), 1.5),
    ));

    Ok(())
}

fn add_quadrics(scene: &mut Scene) -> Result<()> {
    // Cones and cylinders hang along -Z; turn them to stand on the floor
    let upright = |figure: Arc<dyn Figure>, top: Vec3| {
        TransformedFigure::new(
            figure,
            Mat4::from_translation(top) * Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2),
        )
    };

    let cylinder: Arc<dyn Figure> = Arc::new(Cylinder::new(
        Vec3::ZERO,
        0.2,
        0.6,
        Material::diffuse(Color::new(0.8, 0.6, 0.2)),
    ));
    scene.add(upright(cylinder, Vec3::new(-0.5, -0.4, 0.3))?);

    let cone: Arc<dyn Figure> = Arc::new(Cone::new(
        Vec3::ZERO,
        0.6,
        0.25,
        Material::diffuse(Color::new(0.2, 0.4, 0.8)).with_specular(Color::splat(0.1)),
    ));
    scene.add(upright(cone, Vec3::new(0.5, -0.4, 0.3))?);

    scene.add(Disk::new(
        Vec3::new(0.0, 0.2, 0.99),
        -Vec3::Z,
        0.35,
        Material::mirror(Color::splat(0.9)),
    ));
    scene.add(Ellipsoid::new(
        Vec3::new(0.0, -0.8, -0.3),
        Vec3::new(0.3, 0.2, 0.2),
        Material::glass(Color::splat(0.9), Color::splat(0.05), 1.5),
    )?);

    Ok(())
}
