//! Wavefront OBJ meshes loaded as flat-shaded triangles.

use crate::{Material, RenderError, Triangle};
use lux_math::Vec3;
use std::io::BufRead;
use std::path::Path;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// Load every model in an OBJ file as triangles sharing `material`.
///
/// Texture coordinates, normals and MTL materials are ignored.
pub fn load_obj(path: impl AsRef<Path>, material: Material) -> Result<Vec<Triangle>, RenderError> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &load_options())?;
    let triangles = triangles(&models, material);
    log::info!("Loaded {} triangles from {}", triangles.len(), path.display());
    Ok(triangles)
}

/// Like [`load_obj`], reading OBJ text from `reader`.
pub fn read_obj(reader: &mut impl BufRead, material: Material) -> Result<Vec<Triangle>, RenderError> {
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| Err(tobj::LoadError::OpenFileFailed))?;
    Ok(triangles(&models, material))
}

fn triangles(models: &[tobj::Model], material: Material) -> Vec<Triangle> {
    let mut triangles = Vec::new();
    for model in models {
        let mesh = &model.mesh;
        let vertex = |index: u32| {
            let i = index as usize * 3;
            Vec3::from_slice(&mesh.positions[i..i + 3])
        };

        for face in mesh.indices.chunks_exact(3) {
            triangles.push(Triangle::new(vertex(face[0]), vertex(face[1]), vertex(face[2]), material));
        }
        log::debug!("Model {}: {} faces", model.name, mesh.indices.len() / 3);
    }
    triangles
}
