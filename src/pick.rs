//! Part picking: screen rays and ray/part intersection.
//!
//! Converts a device-pixel click into a world-space ray through the camera,
//! then intersects that ray against the triangles of every part (taken at the
//! part's current world position) to find the nearest hit. All of it is pure
//! geometry; the render backend is not involved.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::{
    camera::{Camera, Viewport},
    data_structures::part::Part,
};

/// Rejection threshold for rays parallel to a triangle plane.
const EPSILON: f64 = 1e-12;

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Build a world ray through the pixel `(x, y)` of `viewport`.
///
/// Pixels map to normalized device coordinates first (`x` right, `y` up,
/// both in `[-1, 1]`), then through a pinhole model built from the camera's
/// pose, vertical field of view and aspect ratio.
pub fn screen_ray(camera: &Camera, viewport: Viewport, x: f64, y: f64) -> Ray {
    let ndc_x = x / f64::from(viewport.width) * 2.0 - 1.0;
    let ndc_y = -(y / f64::from(viewport.height) * 2.0 - 1.0);

    let forward = (camera.target - camera.position).normalize();
    // looking straight up or down leaves no well-defined right vector
    let mut right = forward.cross(Vector3::unit_y());
    if right.magnitude2() < EPSILON {
        right = Vector3::unit_x();
    }
    let right = right.normalize();
    let up = right.cross(forward);

    let half_height = (camera.fov_y.0 / 2.0).tan();
    let half_width = half_height * camera.aspect;

    let direction = forward + right * (ndc_x * half_width) + up * (ndc_y * half_height);
    Ray::new(camera.position, direction)
}

/// Distance along `ray` to the nearest triangle of `part`, if any.
///
/// Triangles are taken in the part's local (origin-centered) space shifted by
/// its current world position. Back faces count as hits; a viewer wants to
/// select a part from any side.
pub fn intersect_part(ray: &Ray, part: &Part) -> Option<f64> {
    let offset = part.current_position();
    let mut nearest: Option<f64> = None;
    for [a, b, c] in part.geometry.triangles() {
        if let Some(t) = intersect_triangle(ray, a + offset, b + offset, c + offset) {
            if nearest.map_or(true, |n| t < n) {
                nearest = Some(t);
            }
        }
    }
    nearest
}

/// Nearest part hit by `ray`, by distance along the ray.
pub fn nearest_hit<'a>(ray: &Ray, parts: &'a [Part]) -> Option<(&'a Part, f64)> {
    parts
        .iter()
        .filter_map(|part| intersect_part(ray, part).map(|t| (part, t)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}

/// Möller–Trumbore ray/triangle intersection. Returns the ray parameter `t`
/// for hits in front of the origin.
fn intersect_triangle(
    ray: &Ray,
    a: Vector3<f64>,
    b: Vector3<f64>,
    c: Vector3<f64>,
) -> Option<f64> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let origin = Vector3::new(ray.origin.x, ray.origin.y, ray.origin.z);
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}
