//! Wavefront OBJ models.
//!
//! Loading happens in two steps. [`ModelData::load`] parses the OBJ/MTL pair
//! and decodes material textures on the CPU; [`Model::upload`] turns that into
//! GPU meshes and textures. [`Model::load`] does both.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::{Vec2, Vec3, Vec4};

use crate::{
    abs::{Mesh, ModelVertex, ShaderProgram, Texture},
    error::{Error, Result},
    pixels::Image,
};

/// Shininess used when a material does not specify one.
pub const DEFAULT_SHININESS: f32 = 32.0;

/// Texture units the material samplers are bound to.
pub const DIFFUSE_UNIT: u32 = 0;
pub const SPECULAR_UNIT: u32 = 1;

/// CPU side copy of one submesh.
#[derive(Debug, Clone)]
pub struct SubmeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    pub diffuse: Option<Image>,
    pub specular: Option<Image>,
    pub shininess: f32,
}

/// A parsed model, not yet on the GPU.
#[derive(Debug, Clone)]
pub struct ModelData {
    pub submeshes: Vec<SubmeshData>,
    pub materials: Vec<MaterialData>,
}

impl ModelData {
    /// Parses an OBJ file and its material library. Faces are triangulated and
    /// re-indexed so position, normal and UV share one index.
    pub fn load(path: &Path) -> Result<Self> {
        let (models, materials) =
            tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|source| Error::Model {
                path: path.to_path_buf(),
                source,
            })?;
        let materials = materials.unwrap_or_else(|e| {
            log::warn!("{}: no usable material library ({e})", path.display());
            Vec::new()
        });

        let base_dir = path.parent().unwrap_or(Path::new("."));
        let materials = materials
            .iter()
            .map(|material| MaterialData {
                name: material.name.clone(),
                diffuse: load_material_texture(base_dir, material.diffuse_texture.as_deref()),
                specular: load_material_texture(base_dir, material.specular_texture.as_deref()),
                shininess: material.shininess.unwrap_or(DEFAULT_SHININESS),
            })
            .collect();

        let submeshes = models
            .into_iter()
            .map(|model| SubmeshData {
                vertices: vertices_from_mesh(&model.mesh),
                indices: model.mesh.indices,
                material: model.mesh.material_id,
                name: model.name,
            })
            .collect();

        Ok(Self {
            submeshes,
            materials,
        })
    }
}

/// Interleaves the flat attribute arrays of a single-index mesh. Missing
/// normals or UVs become zero.
fn vertices_from_mesh(mesh: &tobj::Mesh) -> Vec<ModelVertex> {
    let count = mesh.positions.len() / 3;
    (0..count)
        .map(|i| {
            let position = Vec3::from_slice(&mesh.positions[3 * i..3 * i + 3]);
            let normal = mesh
                .normals
                .get(3 * i..3 * i + 3)
                .map(Vec3::from_slice)
                .unwrap_or(Vec3::ZERO);
            let tex_coord = mesh
                .texcoords
                .get(2 * i..2 * i + 2)
                .map(Vec2::from_slice)
                .unwrap_or(Vec2::ZERO);
            ModelVertex {
                position,
                normal,
                tex_coord,
            }
        })
        .collect()
}

/// Decodes a material texture. A texture that fails to load is logged and
/// replaced by the fallback at draw time.
fn load_material_texture(base_dir: &Path, file: Option<&str>) -> Option<Image> {
    let file = file.filter(|f| !f.is_empty())?;
    let path: PathBuf = base_dir.join(file.replace('\\', "/"));
    match Image::load(&path, true) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("{e}, using fallback texture");
            None
        }
    }
}

/// Textures used for material maps a model does not provide.
pub struct MaterialDefaults {
    pub diffuse: Texture,
    pub specular: Texture,
}

impl MaterialDefaults {
    /// A mid gray diffuse map and a dark gray specular map.
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self> {
        let gray = Image::single_color(4, 4, Vec4::new(0.5, 0.5, 0.5, 1.0));
        let dark_gray = Image::single_color(4, 4, Vec4::new(0.2, 0.2, 0.2, 1.0));
        Ok(Self {
            diffuse: Texture::from_image(gl, &gray)?,
            specular: Texture::from_image(gl, &dark_gray)?,
        })
    }
}

struct Material {
    diffuse: Option<Texture>,
    specular: Option<Texture>,
    shininess: f32,
}

/// Binds the maps of `material` (or the defaults) and points the material
/// samplers at them.
fn bind_material(
    material: Option<&Material>,
    program: &ShaderProgram,
    defaults: &MaterialDefaults,
) {
    material
        .and_then(|m| m.diffuse.as_ref())
        .unwrap_or(&defaults.diffuse)
        .bind(DIFFUSE_UNIT);
    material
        .and_then(|m| m.specular.as_ref())
        .unwrap_or(&defaults.specular)
        .bind(SPECULAR_UNIT);
    program.set_uniform("material.diffuse", DIFFUSE_UNIT as i32);
    program.set_uniform("material.specular", SPECULAR_UNIT as i32);
    program.set_uniform(
        "material.shininess",
        material.map_or(DEFAULT_SHININESS, |m| m.shininess),
    );
}

/// A model on the GPU: submesh buffers plus the textures of its materials.
pub struct Model {
    meshes: Vec<(Mesh, Option<usize>)>,
    materials: Vec<Material>,
}

impl Model {
    /// Parses and uploads an OBJ model.
    pub fn load(gl: &Arc<glow::Context>, path: &Path) -> Result<Self> {
        let data = ModelData::load(path)?;
        let model = Self::upload(gl, &data)?;
        log::info!(
            "loaded model {}: {} meshes, {} materials",
            path.display(),
            model.meshes.len(),
            model.materials.len()
        );
        Ok(model)
    }

    pub fn upload(gl: &Arc<glow::Context>, data: &ModelData) -> Result<Self> {
        let materials = data
            .materials
            .iter()
            .map(|material| {
                Ok(Material {
                    diffuse: material
                        .diffuse
                        .as_ref()
                        .map(|image| Texture::from_image(gl, image))
                        .transpose()?,
                    specular: material
                        .specular
                        .as_ref()
                        .map(|image| Texture::from_image(gl, image))
                        .transpose()?,
                    shininess: material.shininess,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let meshes = data
            .submeshes
            .iter()
            .map(|submesh| {
                let mesh = Mesh::new(gl, &submesh.vertices, &submesh.indices, glow::TRIANGLES)?;
                Ok((mesh, submesh.material))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { meshes, materials })
    }

    /// Draws every submesh with `program`, which must already be in use.
    pub fn draw(&self, program: &ShaderProgram, defaults: &MaterialDefaults) {
        for (mesh, material) in &self.meshes {
            bind_material(
                material.and_then(|i| self.materials.get(i)),
                program,
                defaults,
            );
            mesh.draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_OBJ: &str = "\
mtllib quad.mtl
o quad
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 1.0 1.0 0.0
v -1.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
usemtl painted
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    const QUAD_MTL: &str = "\
newmtl painted
Ns 64.0
map_Kd diffuse.png
map_Ks missing.png
";

    #[test]
    fn test_load_triangulates_and_reads_materials() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quad.obj"), QUAD_OBJ).unwrap();
        std::fs::write(dir.path().join("quad.mtl"), QUAD_MTL).unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]))
            .save(dir.path().join("diffuse.png"))
            .unwrap();

        let data = ModelData::load(&dir.path().join("quad.obj")).unwrap();
        assert_eq!(data.submeshes.len(), 1);
        let quad = &data.submeshes[0];
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.indices.len(), 6);
        assert_eq!(quad.material, Some(0));
        assert!(quad.vertices.iter().all(|v| v.normal == Vec3::Z));
        assert_eq!(quad.vertices[2].tex_coord, Vec2::ONE);

        let material = &data.materials[0];
        assert_eq!(material.name, "painted");
        assert_eq!(material.shininess, 64.0);
        assert_eq!(material.diffuse.as_ref().map(Image::channels), Some(4));
        // Broken texture references fall back instead of failing the load.
        assert!(material.specular.is_none());
    }

    #[test]
    fn test_missing_attributes_default_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let data = ModelData::load(&path).unwrap();
        let mesh = &data.submeshes[0];
        assert_eq!(mesh.material, None);
        assert!(data.materials.is_empty());
        assert!(mesh.vertices.iter().all(|v| v.normal == Vec3::ZERO));
        assert_eq!(mesh.vertices[1].position, Vec3::X);
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ModelData::load(&dir.path().join("helmet.obj"));
        assert!(matches!(result, Err(Error::Model { .. })));
    }
}
