//! Engine data structures: geometry, parts, and the scene model.
//!
//! - `geometry` holds raw triangle geometry with bounding-volume math
//! - `part` contains the named assembly part and its material state
//! - `scene` is the mutable scene model (part order, selection, progress)

pub mod geometry;
pub mod part;
pub mod scene;
