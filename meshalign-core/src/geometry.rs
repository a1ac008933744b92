/// Geometry primitives: indexed meshes, scenes and bounding boxes
use nalgebra::{Matrix4, Point3, Vector3};
use std::collections::HashMap;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Corner pairs that form the 12 box edges, indexed like [`Aabb::corners`]
    pub const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (2, 3),
        (4, 5),
        (6, 7),
        (0, 2),
        (1, 3),
        (4, 6),
        (5, 7),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// A box with min > max that any point expands
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand(point);
        }
        aabb
    }

    pub fn expand(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extents(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    /// The eight corners; bit 0 of the index selects max X, bit 1 max Y, bit 2 max Z
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let mut corners = [self.min; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        corners
    }
}

/// A triangle mesh: vertex positions plus index triples into them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Build an indexed mesh from loose triangles, sharing bit-identical positions
    pub fn from_triangles(triangles: &[[Point3<f64>; 3]]) -> Self {
        let mut mesh = Self::with_capacity(triangles.len(), triangles.len());
        let mut index: HashMap<[u64; 3], usize> = HashMap::new();

        for triangle in triangles {
            let mut face = [0usize; 3];
            for (slot, point) in face.iter_mut().zip(triangle) {
                // + 0.0 folds -0.0 into 0.0 so both hash alike
                let key = [
                    (point.x + 0.0).to_bits(),
                    (point.y + 0.0).to_bits(),
                    (point.z + 0.0).to_bits(),
                ];
                *slot = *index.entry(key).or_insert_with(|| {
                    mesh.vertices.push(*point);
                    mesh.vertices.len() - 1
                });
            }
            mesh.faces.push(face);
        }

        mesh
    }

    /// Closed box mesh covering `aabb`, outward-facing triangles
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let vertices = aabb.corners().to_vec();
        let faces = vec![
            // -X / +X
            [0, 4, 6],
            [0, 6, 2],
            [1, 3, 7],
            [1, 7, 5],
            // -Y / +Y
            [0, 1, 5],
            [0, 5, 4],
            [2, 6, 7],
            [2, 7, 3],
            // -Z / +Z
            [0, 2, 3],
            [0, 3, 1],
            [4, 5, 7],
            [4, 7, 6],
        ];
        Self { vertices, faces }
    }

    /// Cube of edge `size` centered at the origin
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        Self::from_aabb(&Aabb::new(
            Point3::new(-half, -half, -half),
            Point3::new(half, half, half),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    pub fn triangle(&self, face: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.faces[face];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Unit face normal, or zero for a degenerate face
    pub fn face_normal(&self, face: usize) -> Vector3<f64> {
        let [v0, v1, v2] = self.triangle(face);
        let normal = (v1 - v0).cross(&(v2 - v0));
        normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Transform every vertex in place by a homogeneous matrix
    pub fn apply_transform(&mut self, matrix: &Matrix4<f64>) {
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_point(vertex);
        }
    }

    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    /// Append another mesh, shifting its face indices past our vertices
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }
}

/// A named sub-mesh inside a scene
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub name: String,
    pub mesh: Mesh,
}

/// The loader's view of a file: one or more geometries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub geometries: Vec<Geometry>,
}

impl Scene {
    pub fn single(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            geometries: vec![Geometry {
                name: name.into(),
                mesh,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Concatenate every geometry into one mesh
    pub fn merge(self) -> Mesh {
        let mut geometries = self.geometries.into_iter();
        let Some(first) = geometries.next() else {
            return Mesh::new();
        };

        let mut mesh = first.mesh;
        for geometry in geometries {
            mesh.append(&geometry.mesh);
        }
        mesh
    }
}
