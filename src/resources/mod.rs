//! Part loading and resource lifetime management.
//!
//! Mesh fetching and parsing is delegated to a [`MeshSource`] collaborator;
//! this module owns everything around it: centroid computation and
//! re-centering at load time, progress forwarding, registration with the
//! render backend, and exactly-once disposal of backend resources.

use std::rc::Rc;

use cgmath::Vector3;
use futures::future::LocalBoxFuture;

use crate::{
    data_structures::{
        geometry::Geometry,
        part::{GpuHandles, Part},
        scene::SceneModel,
    },
    error::ViewerError,
    render::RenderBackend,
    viewer::ViewerHooks,
};

/// One part to load: where from and what to call it.
#[derive(Clone, Debug)]
pub struct PartDescriptor {
    pub name: String,
    pub url: String,
}

impl PartDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Byte-level progress callback: `(loaded, total)`. A `total` of zero means
/// the overall size is unknown.
pub type ProgressSink = Box<dyn FnMut(u64, u64)>;

/// Mesh loading collaborator. One call per part; the future suspends at the
/// fetch/parse boundary and resumes on the viewer's cooperative scheduler.
pub trait MeshSource {
    fn load<'a>(
        &'a self,
        url: &str,
        on_progress: ProgressSink,
    ) -> LocalBoxFuture<'a, anyhow::Result<Geometry>>;
}

/// Loads parts and guarantees their backend resources are released exactly
/// once.
pub struct ResourceLifecycleManager {
    source: Box<dyn MeshSource>,
}

impl ResourceLifecycleManager {
    pub fn new(source: Box<dyn MeshSource>) -> Self {
        Self { source }
    }

    /// Fetch one part, re-center its geometry and anchor it at the mesh
    /// centroid.
    ///
    /// Progress events are forwarded to the hooks as a percentage; an unknown
    /// total size reports 0 rather than dividing by zero. On failure the part
    /// is never created, so nothing needs rolling back.
    pub async fn load_part(
        &self,
        descriptor: &PartDescriptor,
        hooks: Rc<dyn ViewerHooks>,
    ) -> Result<Part, ViewerError> {
        let name = descriptor.name.clone();
        let progress_name = name.clone();
        let sink: ProgressSink = Box::new(move |loaded, total| {
            let percent = if total > 0 {
                loaded as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            hooks.on_progress(&progress_name, percent);
        });

        let mut geometry = self
            .source
            .load(&descriptor.url, sink)
            .await
            .map_err(|err| ViewerError::load(name.clone(), err))?;

        // Anchor the part at its mesh centroid and keep the geometry itself
        // origin-centered so local rotations behave.
        let centroid = geometry
            .aabb()
            .map(|aabb| aabb.center())
            .unwrap_or_else(|| Vector3::new(0.0, 0.0, 0.0));
        geometry.translate(-centroid);

        log::debug!("loaded part `{}` with centroid {:?}", name, centroid);
        Ok(Part::new(name, geometry, centroid))
    }

    /// Upload a freshly loaded part to the backend, insert it into the scene
    /// graph and register it with the model.
    pub fn register(mut part: Part, scene: &mut SceneModel, backend: &mut dyn RenderBackend) {
        let geometry = backend.upload_geometry(&part.name, &part.geometry);
        let material = backend.upload_material(&part.name, &part.material);
        backend.add_object(&part.name, geometry, material, part.current_position());
        part.gpu = Some(GpuHandles { geometry, material });
        scene.add_part(part);
    }

    /// Remove a part from the backend scene graph and release its geometry,
    /// texture slots and material.
    ///
    /// Safe against double disposal: the handles are taken out of the part on
    /// the first call and later calls find nothing to release.
    pub fn dispose(part: &mut Part, backend: &mut dyn RenderBackend) {
        let Some(gpu) = part.gpu.take() else {
            return;
        };
        backend.remove_object(&part.name);
        backend.dispose_geometry(gpu.geometry);
        for texture in part.material.textures.iter() {
            backend.dispose_texture(texture);
        }
        backend.dispose_material(gpu.material);
    }
}
