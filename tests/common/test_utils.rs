use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

use asmview::{
    PartDescriptor, Viewer, ViewerConfig, ViewerError, ViewerHooks,
    data_structures::{geometry::Geometry, part::Material},
    lighting::LightChannel,
    render::{GeometryHandle, MaterialHandle, RenderBackend, TextureHandle},
    resources::{MeshSource, ProgressSink},
};
use cgmath::{Point3, Vector3};
use futures::{FutureExt, future::LocalBoxFuture};

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Cube as a triangle soup centered at `center`, in world coordinates. The
/// loader derives the centroid from these positions, so `center` becomes the
/// part's original position.
pub(crate) fn cube(center: Vector3<f64>, half: f64) -> Geometry {
    let corner = |mask: usize| -> Vector3<f64> {
        center
            + Vector3::new(
                if mask & 1 == 0 { -half } else { half },
                if mask & 2 == 0 { -half } else { half },
                if mask & 4 == 0 { -half } else { half },
            )
    };
    // two triangles per face, winding irrelevant for the engine
    let faces: [[usize; 4]; 6] = [
        [0, 1, 3, 2], // -z
        [4, 5, 7, 6], // +z
        [0, 1, 5, 4], // -y
        [2, 3, 7, 6], // +y
        [0, 2, 6, 4], // -x
        [1, 3, 7, 5], // +x
    ];
    let mut positions = Vec::new();
    for [a, b, c, d] in faces {
        positions.extend([corner(a), corner(b), corner(c)]);
        positions.extend([corner(a), corner(c), corner(d)]);
    }
    Geometry::soup(positions)
}

/// Everything the engine told the backend, for post-hoc assertions.
#[derive(Default)]
pub(crate) struct BackendLog {
    next_handle: u64,
    pub uploaded_geometries: Vec<String>,
    pub uploaded_materials: Vec<String>,
    pub objects: HashSet<String>,
    pub removed: Vec<String>,
    pub positions: HashMap<String, Vector3<f64>>,
    pub materials: HashMap<String, Material>,
    pub background: Option<u32>,
    pub light_intensities: HashMap<LightChannel, f64>,
    pub configured_lights: Vec<LightChannel>,
    pub camera_pose: Option<(Point3<f64>, Point3<f64>)>,
    pub control_target: Option<Point3<f64>>,
    pub disposed_geometries: Vec<GeometryHandle>,
    pub disposed_materials: Vec<MaterialHandle>,
    pub disposed_textures: Vec<TextureHandle>,
    pub disposed: bool,
}

pub(crate) struct RecordingBackend {
    pub log: Rc<RefCell<BackendLog>>,
}

impl RecordingBackend {
    pub fn new() -> (Self, Rc<RefCell<BackendLog>>) {
        let log = Rc::new(RefCell::new(BackendLog::default()));
        (Self { log: log.clone() }, log)
    }
}

impl RenderBackend for RecordingBackend {
    fn upload_geometry(&mut self, name: &str, _geometry: &Geometry) -> GeometryHandle {
        let mut log = self.log.borrow_mut();
        log.next_handle += 1;
        log.uploaded_geometries.push(name.to_string());
        GeometryHandle(log.next_handle)
    }

    fn upload_material(&mut self, name: &str, material: &Material) -> MaterialHandle {
        let mut log = self.log.borrow_mut();
        log.next_handle += 1;
        log.uploaded_materials.push(name.to_string());
        log.materials.insert(name.to_string(), material.clone());
        MaterialHandle(log.next_handle)
    }

    fn add_object(
        &mut self,
        name: &str,
        _geometry: GeometryHandle,
        _material: MaterialHandle,
        position: Vector3<f64>,
    ) {
        let mut log = self.log.borrow_mut();
        log.objects.insert(name.to_string());
        log.positions.insert(name.to_string(), position);
    }

    fn remove_object(&mut self, name: &str) {
        let mut log = self.log.borrow_mut();
        log.objects.remove(name);
        log.removed.push(name.to_string());
    }

    fn set_object_position(&mut self, name: &str, position: Vector3<f64>) {
        self.log
            .borrow_mut()
            .positions
            .insert(name.to_string(), position);
    }

    fn update_material(&mut self, name: &str, material: &Material) {
        self.log
            .borrow_mut()
            .materials
            .insert(name.to_string(), material.clone());
    }

    fn set_background(&mut self, color: u32) {
        self.log.borrow_mut().background = Some(color);
    }

    fn configure_light(
        &mut self,
        channel: LightChannel,
        _position: Option<Vector3<f64>>,
        intensity: f64,
    ) {
        let mut log = self.log.borrow_mut();
        log.configured_lights.push(channel);
        log.light_intensities.insert(channel, intensity);
    }

    fn set_light_intensity(&mut self, channel: LightChannel, intensity: f64) {
        self.log
            .borrow_mut()
            .light_intensities
            .insert(channel, intensity);
    }

    fn set_camera_pose(&mut self, position: Point3<f64>, target: Point3<f64>) {
        self.log.borrow_mut().camera_pose = Some((position, target));
    }

    fn set_control_target(&mut self, target: Point3<f64>) {
        self.log.borrow_mut().control_target = Some(target);
    }

    fn dispose_geometry(&mut self, handle: GeometryHandle) {
        self.log.borrow_mut().disposed_geometries.push(handle);
    }

    fn dispose_material(&mut self, handle: MaterialHandle) {
        self.log.borrow_mut().disposed_materials.push(handle);
    }

    fn dispose_texture(&mut self, handle: TextureHandle) {
        self.log.borrow_mut().disposed_textures.push(handle);
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().disposed = true;
    }
}

/// Mesh source backed by a url → geometry map, with optional scripted
/// failures and progress events.
pub(crate) struct StaticMeshSource {
    meshes: HashMap<String, Geometry>,
    failing: HashSet<String>,
    progress_events: Vec<(u64, u64)>,
}

impl StaticMeshSource {
    pub fn new() -> Self {
        Self {
            meshes: HashMap::new(),
            failing: HashSet::new(),
            progress_events: vec![(512, 1024), (1024, 1024)],
        }
    }

    pub fn with_mesh(mut self, url: &str, geometry: Geometry) -> Self {
        self.meshes.insert(url.to_string(), geometry);
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn with_progress_events(mut self, events: Vec<(u64, u64)>) -> Self {
        self.progress_events = events;
        self
    }
}

impl MeshSource for StaticMeshSource {
    fn load<'a>(
        &'a self,
        url: &str,
        mut on_progress: ProgressSink,
    ) -> LocalBoxFuture<'a, anyhow::Result<Geometry>> {
        let url = url.to_string();
        async move {
            if self.failing.contains(&url) {
                anyhow::bail!("scripted failure for {url}");
            }
            let geometry = self
                .meshes
                .get(&url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no mesh at {url}"))?;
            for (loaded, total) in &self.progress_events {
                on_progress(*loaded, *total);
            }
            Ok(geometry)
        }
        .boxed_local()
    }
}

/// Hook recorder; shared with the viewer through `Rc`.
#[derive(Default)]
pub(crate) struct RecordingHooks {
    pub events: RefCell<Vec<HookEvent>>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum HookEvent {
    Progress(String, f64),
    LoadComplete,
    Error(String),
    PartSelected(String),
    AnimationComplete,
}

impl RecordingHooks {
    pub fn count(&self, matcher: impl Fn(&HookEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| matcher(e)).count()
    }
}

impl ViewerHooks for RecordingHooks {
    fn on_progress(&self, part_name: &str, percent: f64) {
        self.events
            .borrow_mut()
            .push(HookEvent::Progress(part_name.to_string(), percent));
    }

    fn on_load_complete(&self) {
        self.events.borrow_mut().push(HookEvent::LoadComplete);
    }

    fn on_error(&self, error: &ViewerError) {
        self.events
            .borrow_mut()
            .push(HookEvent::Error(error.to_string()));
    }

    fn on_part_selected(&self, part_name: &str) {
        self.events
            .borrow_mut()
            .push(HookEvent::PartSelected(part_name.to_string()));
    }

    fn on_animation_complete(&self) {
        self.events.borrow_mut().push(HookEvent::AnimationComplete);
    }
}

pub(crate) struct TestViewer {
    pub viewer: Viewer,
    pub backend: Rc<RefCell<BackendLog>>,
    pub hooks: Rc<RecordingHooks>,
}

/// Viewer over a recording backend and the given mesh source.
pub(crate) fn viewer_with_source(source: StaticMeshSource) -> TestViewer {
    init_logging();
    let (backend, log) = RecordingBackend::new();
    let mut viewer = Viewer::new(
        ViewerConfig::default(),
        Box::new(backend),
        Box::new(source),
    )
    .expect("default config must mount");
    let hooks = Rc::new(RecordingHooks::default());
    viewer.set_hooks(hooks.clone());
    TestViewer {
        viewer,
        backend: log,
        hooks,
    }
}

/// Two-cube source: `frame` centered at the origin, `barrel` at (0, 2, 0).
pub(crate) fn two_part_source() -> StaticMeshSource {
    StaticMeshSource::new()
        .with_mesh("models/frame.stl", cube(Vector3::new(0.0, 0.0, 0.0), 1.0))
        .with_mesh("models/barrel.stl", cube(Vector3::new(0.0, 2.0, 0.0), 0.5))
}

pub(crate) fn two_part_descriptors() -> Vec<PartDescriptor> {
    vec![
        PartDescriptor::new("frame", "models/frame.stl"),
        PartDescriptor::new("barrel", "models/barrel.stl"),
    ]
}
