//! Parts and their materials.
//!
//! A [`Part`] is one named piece of the assembly. It exclusively owns its
//! geometry and material; nothing else mutates them without going through the
//! viewer's material controller or the resource lifecycle manager.

use cgmath::Vector3;

use crate::{
    data_structures::geometry::Geometry,
    render::{GeometryHandle, MaterialHandle, TextureHandle},
};

/// Phong-style material state mirrored to the render backend.
///
/// Colors are packed `0xRRGGBB`. `needs_update` marks the material dirty for
/// re-upload; the backend sync clears it.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: u32,
    pub specular: u32,
    pub shininess: f64,
    pub emissive: u32,
    pub metalness: f64,
    pub textures: TextureSlots,
    pub needs_update: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: 0x333333,
            specular: 0x111111,
            shininess: 200.0,
            emissive: 0x000000,
            metalness: 0.0,
            textures: TextureSlots::default(),
            needs_update: false,
        }
    }
}

impl Material {
    /// Merge only the fields present in `patch` and mark the material dirty.
    /// Returns whether anything was patched.
    pub fn apply(&mut self, patch: &MaterialPatch) -> bool {
        let mut changed = false;
        if let Some(color) = patch.color {
            self.color = color;
            changed = true;
        }
        if let Some(specular) = patch.specular {
            self.specular = specular;
            changed = true;
        }
        if let Some(shininess) = patch.shininess {
            self.shininess = shininess;
            changed = true;
        }
        if let Some(emissive) = patch.emissive {
            self.emissive = emissive;
            changed = true;
        }
        if let Some(metalness) = patch.metalness {
            self.metalness = metalness;
            changed = true;
        }
        if changed {
            self.needs_update = true;
        }
        changed
    }
}

/// Partial material update: a closed set of recognized fields, each optional.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialPatch {
    pub color: Option<u32>,
    pub specular: Option<u32>,
    pub shininess: Option<f64>,
    pub emissive: Option<u32>,
    pub metalness: Option<f64>,
}

impl MaterialPatch {
    pub fn color(color: u32) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn shininess(shininess: f64) -> Self {
        Self {
            shininess: Some(shininess),
            ..Default::default()
        }
    }
}

/// Texture slots a material may hold on the backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextureSlots {
    pub map: Option<TextureHandle>,
    pub normal_map: Option<TextureHandle>,
    pub roughness_map: Option<TextureHandle>,
    pub metalness_map: Option<TextureHandle>,
}

impl TextureSlots {
    pub fn iter(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        [
            self.map,
            self.normal_map,
            self.roughness_map,
            self.metalness_map,
        ]
        .into_iter()
        .flatten()
    }
}

/// Backend resources held by a live part. Taken exactly once at disposal.
#[derive(Debug)]
pub struct GpuHandles {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
}

/// One named piece of the assembly.
///
/// `original_position` is the centroid of the raw mesh in world space at load
/// time and never changes afterwards; `current_position` is re-derived from
/// the assembly progress every animation tick.
#[derive(Debug)]
pub struct Part {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    pub selected: bool,
    pub(crate) gpu: Option<GpuHandles>,
    original_position: Vector3<f64>,
    pub(crate) current_position: Vector3<f64>,
}

impl Part {
    /// Build a part from origin-centered geometry and its load-time centroid.
    pub fn new(name: impl Into<String>, geometry: Geometry, centroid: Vector3<f64>) -> Self {
        Self {
            name: name.into(),
            geometry,
            material: Material::default(),
            selected: false,
            gpu: None,
            original_position: centroid,
            current_position: centroid,
        }
    }

    pub fn original_position(&self) -> Vector3<f64> {
        self.original_position
    }

    pub fn current_position(&self) -> Vector3<f64> {
        self.current_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_only_present_fields() {
        let mut material = Material::default();
        let changed = material.apply(&MaterialPatch {
            color: Some(0xff0000),
            shininess: Some(80.0),
            ..Default::default()
        });
        assert!(changed);
        assert!(material.needs_update);
        assert_eq!(material.color, 0xff0000);
        assert_eq!(material.shininess, 80.0);
        // untouched fields keep their defaults
        assert_eq!(material.specular, 0x111111);
        assert_eq!(material.emissive, 0x000000);
    }

    #[test]
    fn empty_patch_leaves_material_clean() {
        let mut material = Material::default();
        assert!(!material.apply(&MaterialPatch::default()));
        assert!(!material.needs_update);
    }
}
