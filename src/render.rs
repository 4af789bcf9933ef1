//! Render backend contract.
//!
//! The engine never rasterizes. It drives an external render engine through
//! this trait: object-graph mutation, camera pose, lights, background, and
//! resource disposal. Handles are opaque tokens minted by the backend when
//! resources are uploaded; the engine's only obligation is to hand every
//! handle back for disposal exactly once.

use cgmath::{Point3, Vector3};

use crate::{
    data_structures::{geometry::Geometry, part::Material},
    lighting::LightChannel,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Scene-graph mutation primitives the engine drives each operation/tick.
///
/// Implementations are expected to be cheap: the engine may call
/// `set_object_position` once per part per animation tick.
pub trait RenderBackend {
    fn upload_geometry(&mut self, name: &str, geometry: &Geometry) -> GeometryHandle;
    fn upload_material(&mut self, name: &str, material: &Material) -> MaterialHandle;

    /// Insert an uploaded object into the scene graph at `position`.
    fn add_object(
        &mut self,
        name: &str,
        geometry: GeometryHandle,
        material: MaterialHandle,
        position: Vector3<f64>,
    );
    fn remove_object(&mut self, name: &str);
    fn set_object_position(&mut self, name: &str, position: Vector3<f64>);

    /// Re-upload a dirty material.
    fn update_material(&mut self, name: &str, material: &Material);

    fn set_background(&mut self, color: u32);

    /// Install a light channel: directional lights carry a position, ambient
    /// does not.
    fn configure_light(
        &mut self,
        channel: LightChannel,
        position: Option<Vector3<f64>>,
        intensity: f64,
    );
    fn set_light_intensity(&mut self, channel: LightChannel, intensity: f64);

    fn set_camera_pose(&mut self, position: Point3<f64>, target: Point3<f64>);

    /// Update the target of an orbit-style control, if the backend has one.
    /// Backends without a target-tracking control keep the default no-op.
    fn set_control_target(&mut self, _target: Point3<f64>) {}

    fn dispose_geometry(&mut self, handle: GeometryHandle);
    fn dispose_material(&mut self, handle: MaterialHandle);
    fn dispose_texture(&mut self, handle: TextureHandle);

    /// Release the backend's own resources at viewer teardown.
    fn dispose(&mut self);
}
