//! The viewer orchestrator.
//!
//! [`Viewer`] ties the engine components together and exposes the whole
//! operation surface: batch loading, assembly animation, camera framing,
//! selection, material and lighting control, and teardown. It owns the scene
//! model and drives the two collaborators (mesh source and render backend)
//! supplied at construction.
//!
//! # Lifecycle
//!
//! 1. `Viewer::new` validates the mount (viewport), paints the background,
//!    installs the light rig and the initial camera pose
//! 2. `load_parts` fetches all parts concurrently and frames the camera once
//!    the batch settles
//! 3. the external tick driver calls `advance(now)` every frame; assembly
//!    animations progress only through it
//! 4. picks and setter calls mutate parts through the viewer at any time
//! 5. `dispose` tears every resource down exactly once
//!
//! Notifications go through the [`ViewerHooks`] observer: named hook slots the
//! viewer invokes synchronously. The defaults just log.

use std::{cell::RefCell, rc::Rc};

use cgmath::{Deg, Point3, Vector3};
use futures::future;
use instant::Duration;

use crate::{
    animation::{self, AssemblyAnimator, Tick},
    camera::{Camera, FitOutcome, Viewport},
    data_structures::{part::MaterialPatch, scene::SceneModel},
    error::ViewerError,
    lighting::{LightChannel, LightRig},
    pick::{self, Ray},
    render::RenderBackend,
    resources::{MeshSource, PartDescriptor, ResourceLifecycleManager},
};

/// Observer interface for viewer notifications, invoked synchronously.
///
/// Every slot has a logging default, so implementors override only what they
/// care about. Implementors needing mutable state use interior mutability;
/// hooks are shared with in-flight loads.
pub trait ViewerHooks {
    fn on_progress(&self, part_name: &str, percent: f64) {
        log::debug!("loading {}: {:.2}%", part_name, percent);
    }

    fn on_load_complete(&self) {
        log::info!("all parts loaded");
    }

    fn on_error(&self, error: &ViewerError) {
        log::error!("viewer error: {}", error);
    }

    fn on_part_selected(&self, part_name: &str) {
        log::info!("part selected: {}", part_name);
    }

    fn on_animation_complete(&self) {
        log::debug!("assembly animation complete");
    }
}

/// The do-nothing-but-log hook set used until the caller installs its own.
pub struct DefaultHooks;

impl ViewerHooks for DefaultHooks {}

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Scene background, packed `0xRRGGBB`.
    pub background: u32,
    pub camera_position: Point3<f64>,
    pub fov_y: Deg<f64>,
    pub viewport: Viewport,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: 0x1a1a1a,
            camera_position: Point3::new(0.0, 5.0, 10.0),
            fov_y: Deg(75.0),
            viewport: Viewport::new(800, 600),
        }
    }
}

pub struct Viewer {
    scene: SceneModel,
    animator: AssemblyAnimator,
    camera: Camera,
    lights: LightRig,
    loader: ResourceLifecycleManager,
    backend: Box<dyn RenderBackend>,
    hooks: Rc<dyn ViewerHooks>,
    viewport: Viewport,
}

impl Viewer {
    /// Mount the viewer: validate the output surface, then push background,
    /// lights and the initial camera pose to the backend.
    pub fn new(
        config: ViewerConfig,
        mut backend: Box<dyn RenderBackend>,
        source: Box<dyn MeshSource>,
    ) -> Result<Self, ViewerError> {
        if config.viewport.is_degenerate() {
            return Err(ViewerError::InvalidMount {
                reason: format!(
                    "viewport is {}x{}",
                    config.viewport.width, config.viewport.height
                ),
            });
        }

        backend.set_background(config.background);
        let lights = LightRig::default();
        lights.install(backend.as_mut());

        let camera = Camera::new(config.camera_position, config.fov_y, config.viewport.aspect());
        backend.set_camera_pose(camera.position, camera.target);

        Ok(Self {
            scene: SceneModel::new(),
            animator: AssemblyAnimator::new(),
            camera,
            lights,
            loader: ResourceLifecycleManager::new(source),
            backend,
            hooks: Rc::new(DefaultHooks),
            viewport: config.viewport,
        })
    }

    pub fn set_hooks(&mut self, hooks: Rc<dyn ViewerHooks>) {
        self.hooks = hooks;
    }

    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Load a batch of parts concurrently and register each as it arrives.
    ///
    /// Fails fast: the first load error aborts the wait and is returned (and
    /// reported through `on_error`), but parts that completed before the
    /// failure stay registered; there is no automatic rollback. The camera is
    /// framed once after the whole batch settles, not per arrival.
    pub async fn load_parts(&mut self, descriptors: &[PartDescriptor]) -> Result<(), ViewerError> {
        if self.animator.is_animating() {
            log::warn!("load_parts rejected: scene is animating");
            return Ok(());
        }

        let loaded: RefCell<Vec<_>> = RefCell::new(Vec::new());
        let loader = &self.loader;
        let hooks = self.hooks.clone();
        let result = future::try_join_all(descriptors.iter().map(|descriptor| {
            let loaded = &loaded;
            let hooks = hooks.clone();
            async move {
                let part = loader.load_part(descriptor, hooks).await?;
                loaded.borrow_mut().push(part);
                Ok::<_, ViewerError>(())
            }
        }))
        .await
        .map(|_| ());

        for part in loaded.into_inner() {
            ResourceLifecycleManager::register(part, &mut self.scene, self.backend.as_mut());
        }
        // keep new parts consistent with the current assembly progress
        animation::update_part_positions(&mut self.scene);
        self.sync_positions();
        self.fit();

        match result {
            Ok(()) => {
                self.hooks.on_load_complete();
                Ok(())
            }
            Err(err) => {
                self.hooks.on_error(&err);
                Err(err)
            }
        }
    }

    /// Dispose every part and empty the scene. Rejected (no-op) while an
    /// assembly animation is running; the part sequence is only mutated
    /// between animations.
    pub fn clear(&mut self) {
        if self.animator.is_animating() {
            log::warn!("clear rejected: scene is animating");
            return;
        }
        self.clear_highlight();
        self.drop_all_parts();
    }

    /// Start an assembly animation towards `target` progress.
    ///
    /// Single-flight: returns `false` and changes nothing while another
    /// animation is running. A zero duration snaps synchronously and fires
    /// the completion hook before returning.
    pub fn animate_to(&mut self, target: f64, duration_ms: u64) -> bool {
        let started = self.animator.begin(&mut self.scene, target, duration_ms);
        if started && !self.animator.is_animating() {
            // zero-duration snap: progress and positions are already final
            self.sync_positions();
            self.hooks.on_animation_complete();
        }
        started
    }

    /// Per-frame step function, called by the external tick driver.
    pub fn advance(&mut self, now: Duration) -> Tick {
        let tick = self.animator.advance(now, &mut self.scene);
        match tick {
            Tick::Idle => {}
            Tick::Running => self.sync_positions(),
            Tick::Completed => {
                self.sync_positions();
                self.hooks.on_animation_complete();
            }
        }
        tick
    }

    /// Set the assembly progress directly (slider-style scrubbing). Rejected
    /// while an animation is running.
    pub fn set_progress(&mut self, progress: f64) {
        if self.animator.is_animating() {
            log::warn!("set_progress rejected: scene is animating");
            return;
        }
        self.scene.set_progress(progress);
        animation::update_part_positions(&mut self.scene);
        self.sync_positions();
    }

    /// Merge a material patch into the named part. Unknown names are no-ops.
    pub fn set_material(&mut self, name: &str, patch: &MaterialPatch) {
        let Some(part) = self.scene.find_mut(name) else {
            log::warn!("set_material: no part named `{}`", name);
            return;
        };
        if part.material.apply(patch) {
            self.backend.update_material(&part.name, &part.material);
            part.material.needs_update = false;
        }
    }

    pub fn set_background(&mut self, color: u32) {
        self.backend.set_background(color);
    }

    /// Adjust a light channel by name. Unknown channels are no-ops.
    pub fn set_light_intensity(&mut self, channel: &str, intensity: f64) {
        let Some(channel) = LightChannel::from_name(channel) else {
            log::warn!("set_light_intensity: unknown channel `{}`", channel);
            return;
        };
        self.lights
            .set_intensity(channel, intensity, self.backend.as_mut());
    }

    /// Select a part by name, clearing any previous highlight first. A name
    /// that resolves to no part clears the selection entirely.
    pub fn select_by_name(&mut self, name: &str) {
        self.clear_highlight();

        let Some(index) = self.scene.index_of(name) else {
            log::debug!("select_by_name: no part named `{}`, selection cleared", name);
            return;
        };
        let part = &mut self.scene.parts_mut()[index];
        part.selected = true;
        part.material.emissive = 0x444444;
        self.backend.update_material(&part.name, &part.material);
        part.material.needs_update = false;
        self.scene.set_selected(Some(index));
        self.hooks.on_part_selected(name);
    }

    /// Select the nearest part hit by a world-space ray, if any. Misses leave
    /// the current selection untouched.
    pub fn select_by_ray(&mut self, origin: Point3<f64>, direction: Vector3<f64>) {
        let ray = Ray::new(origin, direction);
        let hit = pick::nearest_hit(&ray, self.scene.parts()).map(|(part, _)| part.name.clone());
        if let Some(name) = hit {
            self.select_by_name(&name);
        }
    }

    /// Select whatever sits under the device pixel `(x, y)`.
    pub fn select_at(&mut self, x: f64, y: f64) {
        let ray = pick::screen_ray(&self.camera, self.viewport, x, y);
        self.select_by_ray(ray.origin, ray.direction);
    }

    /// Frame the camera over the current part set and mirror the pose to the
    /// backend (including any target-tracking control).
    pub fn fit(&mut self) {
        match self.camera.fit_to(self.scene.parts()) {
            FitOutcome::Unchanged => {}
            FitOutcome::Defaulted | FitOutcome::Framed { .. } => {
                self.backend
                    .set_camera_pose(self.camera.position, self.camera.target);
                self.backend.set_control_target(self.camera.target);
            }
        }
    }

    /// The output surface was resized; update the projection inputs.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_degenerate() {
            log::warn!(
                "resize ignored: viewport is {}x{}",
                viewport.width,
                viewport.height
            );
            return;
        }
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
    }

    /// Tear the viewer down: abort any animation, dispose every part and let
    /// the backend release its own resources.
    pub fn dispose(&mut self) {
        self.animator.abort();
        self.clear_highlight();
        self.drop_all_parts();
        self.backend.dispose();
    }

    /// Mirror every part's derived position to the backend scene graph.
    fn sync_positions(&mut self) {
        let backend = self.backend.as_mut();
        for part in self.scene.parts() {
            backend.set_object_position(&part.name, part.current_position());
        }
    }

    fn drop_all_parts(&mut self) {
        for mut part in self.scene.take_parts() {
            ResourceLifecycleManager::dispose(&mut part, self.backend.as_mut());
        }
    }

    /// Reset the selected part's emissive to neutral and drop the selection.
    fn clear_highlight(&mut self) {
        let Some(index) = self.scene.selected_index() else {
            return;
        };
        if let Some(part) = self.scene.parts_mut().get_mut(index) {
            part.selected = false;
            part.material.emissive = 0x000000;
            self.backend.update_material(&part.name, &part.material);
            part.material.needs_update = false;
        }
        self.scene.set_selected(None);
    }
}
