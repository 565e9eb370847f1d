use serde::Serialize;
use std::ops::Sub;

/// A point or direction with three `f32` components
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn dot(self, other: Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// True when every component is neither NaN nor infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// One facet of a mesh: the stored normal and three vertices in file order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Triangle {
    normal: Vector3,
    vertices: [Vector3; 3],
}

impl Triangle {
    /// Create a triangle with the normal exactly as stored in the file
    pub fn new(normal: Vector3, vertices: [Vector3; 3]) -> Self {
        Self { normal, vertices }
    }

    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    pub fn vertices(&self) -> &[Vector3; 3] {
        &self.vertices
    }

    /// Normal derived from the winding order (right-hand rule)
    ///
    /// Returns `None` for degenerate triangles where no direction exists.
    pub fn computed_normal(&self) -> Option<Vector3> {
        let [v0, v1, v2] = self.vertices;
        let n = (v1 - v0).cross(v2 - v0);
        let len = n.length();
        if len > 1e-10 {
            Some(Vector3::new(n.x / len, n.y / len, n.z / len))
        } else {
            None
        }
    }

    /// Surface area of the triangle
    pub fn area(&self) -> f32 {
        let [v0, v1, v2] = self.vertices;
        0.5 * (v1 - v0).cross(v2 - v0).length()
    }
}

/// Axis-aligned bounds of all vertices in a mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl BoundingBox {
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3 {
        Vector3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }
}

/// A decoded STL solid
///
/// Triangles keep the order they had in the file. Binary files carry no
/// name, so `solid_name` is empty for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    solid_name: String,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(solid_name: impl Into<String>, triangles: Vec<Triangle>) -> Self {
        Self {
            solid_name: solid_name.into(),
            triangles,
        }
    }

    pub fn solid_name(&self) -> &str {
        &self.solid_name
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of vertex positions (three per triangle, unshared)
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Consume the mesh and return the triangles
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }

    /// Bounds of every vertex, or `None` for an empty mesh
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = *vertices.next()?;
        let mut bounds = BoundingBox {
            min: first,
            max: first,
        };
        for v in vertices {
            bounds.min.x = bounds.min.x.min(v.x);
            bounds.min.y = bounds.min.y.min(v.y);
            bounds.min.z = bounds.min.z.min(v.z);
            bounds.max.x = bounds.max.x.max(v.x);
            bounds.max.y = bounds.max.y.max(v.y);
            bounds.max.z = bounds.max.z.max(v.z);
        }
        Some(bounds)
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_triangle() -> Triangle {
        Triangle::new(
            Vector3::new(0.0, 0.0, 1.0),
            [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_computed_normal() {
        // A triangle in the XY plane should have a Z-pointing normal
        let n = xy_triangle().computed_normal().unwrap();

        assert!(n.x.abs() < 0.001);
        assert!(n.y.abs() < 0.001);
        assert!((n.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_computed_normal_degenerate() {
        let tri = Triangle::new(
            Vector3::default(),
            [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(2.0, 0.0, 0.0),
            ],
        );
        assert!(tri.computed_normal().is_none());
        assert_eq!(tri.area(), 0.0);
    }

    #[test]
    fn test_triangle_area() {
        assert!((xy_triangle().area() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_bounding_box() {
        let far = Triangle::new(
            Vector3::new(0.0, 0.0, 1.0),
            [
                Vector3::new(-2.0, 3.0, 1.0),
                Vector3::new(4.0, 0.5, -1.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
        );
        let mesh = Mesh::new("bounds", vec![xy_triangle(), far]);

        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.min, Vector3::new(-2.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vector3::new(4.0, 3.0, 1.0));
        assert_eq!(bounds.size(), Vector3::new(6.0, 3.0, 2.0));
        assert_eq!(bounds.center(), Vector3::new(1.0, 1.5, 0.0));
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.solid_name(), "");
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_mesh_counts() {
        let mesh = Mesh::new("pair", vec![xy_triangle(), xy_triangle()]);
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.iter().count(), 2);
        assert_eq!(mesh.into_triangles().len(), 2);
    }
}
