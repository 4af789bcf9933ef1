//! Mesh geometry owned by the engine.
//!
//! The engine never parses mesh files itself; a [`crate::resources::MeshSource`]
//! collaborator hands over raw vertex data. What the engine needs from a mesh
//! is purely geometric: bounding volumes for camera framing, the load-time
//! centroid that anchors a part in world space, and triangles for ray picking.
//!
//! All engine math is `f64`. Positions come out of loaders as doubles and stay
//! doubles so that the assembly spread formula and framing distances are
//! bit-for-bit reproducible in tests.

use cgmath::Vector3;

/// Triangle geometry: a vertex soup, optionally indexed.
///
/// When `indices` is empty the positions are interpreted as a plain triangle
/// soup (three consecutive positions per face), which is what STL-style
/// loaders produce.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<Vector3<f64>>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn soup(positions: Vec<Vector3<f64>>) -> Self {
        Self {
            positions,
            indices: Vec::new(),
        }
    }

    pub fn indexed(positions: Vec<Vector3<f64>>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounding box over all vertices, `None` for empty geometry.
    pub fn aabb(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().copied())
    }

    /// Translate every vertex by `offset`. Used once at load time to re-center
    /// the mesh at its local origin.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for position in self.positions.iter_mut() {
            *position += offset;
        }
    }

    /// Iterate the triangles of this geometry, indexed or soup alike.
    /// Truncated faces (a trailing chunk of fewer than three vertices) are
    /// skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f64>; 3]> + '_ {
        let indexed = !self.indices.is_empty();
        let count = if indexed {
            self.indices.len() / 3
        } else {
            self.positions.len() / 3
        };
        (0..count).filter_map(move |face| {
            let vertex = |corner: usize| -> Option<Vector3<f64>> {
                if indexed {
                    let idx = *self.indices.get(face * 3 + corner)? as usize;
                    self.positions.get(idx).copied()
                } else {
                    self.positions.get(face * 3 + corner).copied()
                }
            };
            Some([vertex(0)?, vertex(1)?, vertex(2)?])
        })
    }
}

/// Minimal axis-aligned box enclosing a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Vector3<f64>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for point in points {
            aabb.expand(point);
        }
        Some(aabb)
    }

    pub fn expand(&mut self, point: Vector3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Grow to enclose `other` shifted by `offset`.
    pub fn union_shifted(&mut self, other: &Aabb, offset: Vector3<f64>) {
        self.expand(other.min + offset);
        self.expand(other.max + offset);
    }

    pub fn center(&self) -> Vector3<f64> {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }
}
