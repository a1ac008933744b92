/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use meshalign_core::{Aabb, Camera, Mesh};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph used for bounding-box edges
const WIREFRAME_CHAR: char = 'o';

type ScreenPoint = (f64, f64, f64);

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
    overlay: Vec<bool>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
            overlay: vec![false; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
        self.overlay.fill(false);
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f64>, camera: &Camera) {
        let light_dir = (camera.position - camera.target).normalize();
        for face in 0..mesh.faces.len() {
            let world = mesh
                .triangle(face)
                .map(|vertex| model_matrix.transform_point(&vertex));
            self.render_triangle(&world, &light_dir, camera);
        }
    }

    fn render_triangle(&mut self, world: &[Point3<f64>; 3], light_dir: &Vector3<f64>, camera: &Camera) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(world) {
            match self.project(vertex, camera) {
                Some(point) => *slot = point,
                None => return, // Triangle is clipped
            }
        }

        // Face normal in world space for shading; either side faces the light
        let normal = (world[1] - world[0]).cross(&(world[2] - world[0]));
        let Some(normal) = normal.try_normalize(f64::EPSILON) else {
            return;
        };
        let brightness = normal.dot(light_dir).abs();

        // Map brightness to character, skipping the blank first entry
        let steps = LUMINOSITY_RAMP.len() - 1;
        let char_index = 1 + (brightness * (steps - 1) as f64).round() as usize;
        let character = LUMINOSITY_RAMP[char_index.min(steps)];

        self.rasterize_triangle(&screen_coords, character);
    }

    /// Draw the 12 edges of a bounding box on top of the shaded mesh
    pub fn render_bounds(&mut self, bounds: &Aabb, model_matrix: &Matrix4<f64>, camera: &Camera) {
        if bounds.is_empty() {
            return;
        }

        let corners = bounds
            .corners()
            .map(|corner| self.project(&model_matrix.transform_point(&corner), camera));

        for (a, b) in Aabb::EDGES {
            if let (Some(start), Some(end)) = (corners[a], corners[b]) {
                self.draw_line(start, end);
            }
        }
    }

    fn project(&self, point: &Point3<f64>, camera: &Camera) -> Option<ScreenPoint> {
        camera.project_to_screen(
            point,
            &Matrix4::identity(),
            self.width as u32,
            self.height as u32,
        )
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                        }
                    }
                }
            }
        }
    }

    /// Bresenham line between two projected points, clipped per cell
    fn draw_line(&mut self, start: ScreenPoint, end: ScreenPoint) {
        let (mut x, mut y) = (start.0.floor() as i64, start.1.floor() as i64);
        let (x1, y1) = (end.0.floor() as i64, end.1.floor() as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
                let idx = y as usize * self.width + x as usize;
                self.char_buffer[idx] = WIREFRAME_CHAR;
                self.overlay[idx] = true;
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Color based on character intensity
                let color = if self.overlay[idx] {
                    Color::Yellow
                } else {
                    match c {
                        ' ' | '.' | ':' => Color::DarkGrey,
                        '-' | '=' => Color::Grey,
                        '+' | '*' => Color::White,
                        '#' | '%' | '@' => Color::Cyan,
                        _ => Color::White,
                    }
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
