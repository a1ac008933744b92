/// 3D transformation matrices and rotation state
use nalgebra::{Matrix4, Point3, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub fn from_degrees(x: f64, y: f64, z: f64) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians())
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// A configured rotation, with angles in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rotation {
    /// Single angle about the vertical (Y) axis
    Single(f64),
    /// Angles about X, then Y, then Z
    Sequence([f64; 3]),
}

impl Rotation {
    /// Per-axis angles in radians
    pub fn radians(&self) -> RotationState {
        match *self {
            Rotation::Single(degrees) => RotationState::from_degrees(0.0, degrees, 0.0),
            Rotation::Sequence([x, y, z]) => RotationState::from_degrees(x, y, z),
        }
    }

    pub fn matrix(&self) -> Matrix4<f64> {
        Transform::rotation_matrix(&self.radians())
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f64> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // X is applied first, then Y, then Z
        rz * ry * rx
    }

    /// Rotation about an arbitrary pivot instead of the origin
    pub fn rotation_about(rotation: &RotationState, pivot: &Point3<f64>) -> Matrix4<f64> {
        Self::translation_matrix(pivot.coords)
            * Self::rotation_matrix(rotation)
            * Self::translation_matrix(-pivot.coords)
    }

    /// Create a translation matrix
    pub fn translation_matrix(offset: Vector3<f64>) -> Matrix4<f64> {
        Matrix4::new_translation(&offset)
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(factor: f64) -> Matrix4<f64> {
        Matrix4::new_scaling(factor)
    }
}
