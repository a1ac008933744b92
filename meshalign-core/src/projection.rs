/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::Aabb;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f64::consts::PI / 4.0, // 45 degrees
            aspect: width as f64 / height.max(1) as f64,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Look at the box center from slightly above, far enough back to fit it
    pub fn framing(bounds: &Aabb, width: u32, height: u32) -> Self {
        let mut camera = Self::new(width, height);
        if bounds.is_empty() {
            return camera;
        }

        let center = bounds.center();
        let radius = (bounds.extents().norm() / 2.0).max(1e-3);
        let distance = radius / (camera.fov / 2.0).sin();
        let direction = Vector3::new(0.0, 0.35, 1.0).normalize();

        camera.target = center;
        camera.position = center + direction * distance;
        camera.near = (distance - radius).max(distance * 1e-3);
        camera.far = distance + radius * 2.0;
        camera
    }

    /// Switch between perspective and orthographic projection
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a 3D point to 2D screen space, returning (x, y, depth)
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        model_matrix: &Matrix4<f64>,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Behind the camera or degenerate
        if clip.w <= 1e-9 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f64;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f64;

        Some((screen_x, screen_y, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_framing_projects_target_to_center() {
        let bounds = Aabb::new(Point3::new(-2.0, 0.0, -5.0), Point3::new(2.0, 1.5, 5.0));
        let camera = Camera::framing(&bounds, 80, 40);

        let (x, y, _) = camera
            .project_to_screen(&bounds.center(), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert!((x - 40.0).abs() < 1e-6);
        assert!((y - 20.0).abs() < 1e-6);

        for corner in bounds.corners() {
            assert!(camera
                .project_to_screen(&corner, &Matrix4::identity(), 80, 40)
                .is_some());
        }
    }

    #[test]
    fn test_orthographic_framing_keeps_box_on_screen() {
        let bounds = Aabb::new(Point3::new(-2.0, 0.0, -5.0), Point3::new(2.0, 1.5, 5.0));
        let mut camera = Camera::framing(&bounds, 80, 40);
        camera.toggle_mode();
        assert_eq!(camera.mode, ProjectionMode::Orthographic);

        let (x, y, _) = camera
            .project_to_screen(&bounds.center(), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert!((x - 40.0).abs() < 1e-6);
        assert!((y - 20.0).abs() < 1e-6);

        for corner in bounds.corners() {
            let (x, y, _) = camera
                .project_to_screen(&corner, &Matrix4::identity(), 80, 40)
                .unwrap();
            assert!((0.0..=80.0).contains(&x));
            assert!((0.0..=40.0).contains(&y));
        }

        camera.toggle_mode();
        assert_eq!(camera.mode, ProjectionMode::Perspective);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let camera = Camera::new(80, 40);
        let behind = Point3::new(0.0, 0.0, 10.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 80, 40)
            .is_none());
    }
}
