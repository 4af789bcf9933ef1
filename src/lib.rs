//! asmview
//!
//! The control engine of an interactive multi-part 3D assembly viewer. The
//! crate owns the parts of the problem with real semantics: the assembly
//! animation state machine, the camera-framing math, ray picking, and the
//! resource lifecycle that keeps a mutable scene of named parts consistent
//! under load, animate and dispose operations. Rendering and mesh parsing
//! stay behind collaborator traits, so the whole engine runs deterministic
//! and clockless under test.
//!
//! High-level modules
//! - `viewer`: the orchestrator exposing the full operation surface and hooks
//! - `animation`: single-flight assembly animation with eased progress
//! - `camera`: camera pose and bounding-volume framing
//! - `pick`: screen rays and ray/part intersection
//! - `lighting`: the closed light-channel set and the default rig
//! - `data_structures`: parts, geometry and the scene model
//! - `resources`: mesh-source collaborator, batch loading, disposal
//! - `render`: the render backend contract the engine drives
//!

pub mod animation;
pub mod camera;
pub mod data_structures;
pub mod error;
pub mod lighting;
pub mod pick;
pub mod render;
pub mod resources;
pub mod viewer;

// Re-exports commonly used types for convenience in downstream code.
pub use camera::Viewport;
pub use cgmath::{Deg, Point3, Rad, Vector3};
pub use error::ViewerError;
pub use resources::PartDescriptor;
pub use viewer::{Viewer, ViewerConfig, ViewerHooks};
