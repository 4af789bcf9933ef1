//! Camera pose and the framing algorithm.
//!
//! The engine keeps its own copy of the camera pose (the render backend only
//! mirrors it) so that framing and ray picking stay pure math, testable
//! without any GPU. Framing derives the camera distance from the bounding
//! volume of all parts and the vertical field of view, padded by a fixed
//! factor so the model never touches the viewport edges.

use cgmath::{Angle, Deg, EuclideanSpace, Point3, Rad, Vector3};

use crate::data_structures::{geometry::Aabb, part::Part};

/// Extra distance factor applied when framing, so the fit leaves a margin.
const FIT_PADDING: f64 = 1.5;

/// Fallback pose used when there is nothing to frame.
const DEFAULT_POSITION: Vector3<f64> = Vector3::new(0.0, 5.0, 10.0);

/// Output surface size in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub fov_y: Rad<f64>,
    pub aspect: f64,
}

/// What `fit_to` did with the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitOutcome {
    /// No parts: camera moved to the fixed default pose, looking at origin.
    Defaulted,
    /// Camera repositioned to frame the given center.
    Framed { center: Point3<f64> },
    /// Bounding volume was degenerate; the camera was left alone.
    Unchanged,
}

impl Camera {
    pub fn new(position: Point3<f64>, fov_y: Deg<f64>, aspect: f64) -> Self {
        Self {
            position,
            target: Point3::origin(),
            fov_y: fov_y.into(),
            aspect,
        }
    }

    /// Frame the camera over `parts`, each taken at its current world
    /// position.
    ///
    /// An empty part set is not an error: the camera falls back to the default
    /// pose. A part set whose combined bounding volume is degenerate (no
    /// vertices at all) leaves the camera untouched.
    pub fn fit_to(&mut self, parts: &[Part]) -> FitOutcome {
        if parts.is_empty() {
            log::warn!("no parts to fit camera to");
            self.position = Point3::origin() + DEFAULT_POSITION;
            self.target = Point3::origin();
            return FitOutcome::Defaulted;
        }

        let mut bounds: Option<Aabb> = None;
        for part in parts {
            let Some(part_box) = part.geometry.aabb() else {
                continue;
            };
            let offset = part.current_position();
            bounds = Some(match bounds {
                Some(mut combined) => {
                    combined.union_shifted(&part_box, offset);
                    combined
                }
                None => Aabb {
                    min: part_box.min + offset,
                    max: part_box.max + offset,
                },
            });
        }
        let Some(bounds) = bounds else {
            return FitOutcome::Unchanged;
        };

        let size = bounds.size();
        let center = Point3::from_vec(bounds.center());
        let max_dim = size.x.max(size.y).max(size.z);
        let distance = (max_dim / 2.0 / (self.fov_y / 2.0).tan()).abs() * FIT_PADDING;

        self.position = center + Vector3::new(0.0, 0.0, distance);
        self.target = center;
        FitOutcome::Framed { center }
    }
}
