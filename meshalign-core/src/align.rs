/// Pose normalization steps: scale, rotate, and ground the mesh
use log::{info, warn};
use nalgebra::{Point3, Vector3};

use crate::config::RotationSetting;
use crate::geometry::{Aabb, Mesh};
use crate::transform::{Rotation, Transform};

/// Bounding-box measurements of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub bounds: Aabb,
    /// X extent
    pub width: f64,
    /// Y extent
    pub height: f64,
    /// Z extent
    pub length: f64,
    pub center: Point3<f64>,
}

impl Dimensions {
    /// Zeroed dimensions for an empty mesh
    pub fn empty() -> Self {
        Self {
            bounds: Aabb::new(Point3::origin(), Point3::origin()),
            width: 0.0,
            height: 0.0,
            length: 0.0,
            center: Point3::origin(),
        }
    }

    pub fn of(mesh: &Mesh) -> Self {
        if mesh.is_empty() {
            return Self::empty();
        }

        let bounds = mesh.bounds();
        let size = bounds.extents();
        Self {
            bounds,
            width: size.x,
            height: size.y,
            length: size.z,
            center: bounds.center(),
        }
    }

    /// Extents divided by `divisor`, as (width, length, height)
    pub fn in_units(&self, divisor: f64) -> (f64, f64, f64) {
        (
            self.width / divisor,
            self.length / divisor,
            self.height / divisor,
        )
    }
}

/// Multiply every coordinate by `factor`
pub fn scale(mesh: &mut Mesh, factor: f64) {
    mesh.apply_transform(&Transform::scale_matrix(factor));
}

/// Apply a rotation about the origin
pub fn rotate(mesh: &mut Mesh, rotation: &Rotation) {
    let radians = rotation.radians();
    match rotation {
        Rotation::Single(_) => info!("Rotate the mesh by {:.6} radian about Y", radians.y),
        Rotation::Sequence(_) => info!(
            "Rotate the mesh by: X-axis {:.6}, Y-axis {:.6}, Z-axis {:.6}",
            radians.x, radians.y, radians.z
        ),
    }
    mesh.apply_transform(&rotation.matrix());
}

/// Rotate according to a config setting; returns whether a rotation was applied
pub fn apply_rotation_setting(mesh: &mut Mesh, setting: &RotationSetting) -> bool {
    match setting {
        RotationSetting::Skip => {
            info!("No rotation is needed");
            false
        }
        RotationSetting::Apply(rotation) => {
            match rotation {
                Rotation::Single(degrees) => {
                    info!("Rotating the mesh with {degrees} degree");
                }
                Rotation::Sequence([x, y, z]) => {
                    info!("Rotating the mesh with: X-axis {x}, Y-axis {y}, Z-axis {z}");
                }
            }
            rotate(mesh, rotation);
            true
        }
        RotationSetting::Malformed(value) => {
            warn!(
                "Check the configuration of the rotation angle: expected a number or three numbers, got {value}"
            );
            false
        }
    }
}

/// Offset that centers X/Z on the origin and puts the lowest point on Y=0
pub fn ground_offset(bounds: &Aabb) -> Vector3<f64> {
    let center = bounds.center();
    Vector3::new(-center.x, -bounds.min.y, -center.z)
}

/// Center the mesh on X/Z and rest it on the ground plane
pub fn translate_to_ground(mesh: &mut Mesh) -> Dimensions {
    if mesh.is_empty() {
        warn!("Nothing to translate: mesh has no vertices");
        return Dimensions::empty();
    }

    let before = Dimensions::of(mesh);
    info!("Before translation:");
    log_bounds(&before);

    let offset = ground_offset(&before.bounds);
    mesh.translate(&offset);

    let after = Dimensions::of(mesh);
    info!("After translation:");
    log_bounds(&after);
    after
}

fn log_bounds(dims: &Dimensions) {
    let Aabb { min, max } = dims.bounds;
    info!("Max X: {:.6}, Min X: {:.6}", max.x, min.x);
    info!("Max Y: {:.6}, Min Y: {:.6}", max.y, min.y);
    info!("Max Z: {:.6}, Min Z: {:.6}", max.z, min.z);
    info!(
        "Center: ({:.6}, {:.6}, {:.6})",
        dims.center.x, dims.center.y, dims.center.z
    );
}

/// Log the extents as meters after dividing by `divisor`
pub fn report_dimensions(dims: &Dimensions, divisor: f64) {
    let (width, length, height) = dims.in_units(divisor);
    info!("Height of the vehicle: {height:.6} m");
    info!("Width of the vehicle: {width:.6} m");
    info!("Length of the vehicle: {length:.6} m");
}
