/// Terminal-based viewer for aligned meshes
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use meshalign_core::{Aabb, Camera, Dimensions, Mesh, RotationState, Transform};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod renderer;

pub use renderer::AsciiRenderer;

/// Rows kept free at the top of the screen for the status line
const STATUS_ROWS: u16 = 1;

/// Interactive view of a mesh and its bounding box
pub struct TerminalApp {
    mesh: Mesh,
    bounds: Aabb,
    dimensions: Dimensions,
    unit_divisor: f64,
    title: String,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    spinning: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, title: impl Into<String>) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(mesh, title, width, height))
    }

    /// Build a viewer for a fixed terminal size
    pub fn with_size(mesh: Mesh, title: impl Into<String>, width: u16, height: u16) -> Self {
        let rows = height.saturating_sub(STATUS_ROWS).max(1);
        let bounds = mesh.bounds();
        let dimensions = Dimensions::of(&mesh);

        Self {
            camera: Camera::framing(&bounds, width as u32, rows as u32),
            renderer: AsciiRenderer::new(width as usize, rows as usize),
            mesh,
            bounds,
            dimensions,
            unit_divisor: 1.0,
            title: title.into(),
            rotation: RotationState::zero(),
            spinning: true,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    /// Show the status-line dimensions divided by `divisor`, as the log does
    pub fn with_unit_divisor(mut self, divisor: f64) -> Self {
        self.unit_divisor = divisor;
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup runs even when the loop failed
        let restore_screen = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let restore_mode = terminal::disable_raw_mode();

        result.and(restore_screen).and(restore_mode)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code);
            }
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.rotation.rotate(0.1, 0.0, 0.0);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.rotation.rotate(-0.1, 0.0, 0.0);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.rotation.rotate(0.0, -0.1, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.rotation.rotate(0.0, 0.1, 0.0);
            }
            KeyCode::Char('e') => {
                self.rotation.rotate(0.0, 0.0, 0.1);
            }
            KeyCode::Char('r') => {
                self.rotation.rotate(0.0, 0.0, -0.1);
            }
            KeyCode::Char(' ') => {
                self.spinning = !self.spinning;
            }
            KeyCode::Char('p') => {
                self.camera.toggle_mode();
            }
            _ => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(STATUS_ROWS).max(1);
        let mode = self.camera.mode;
        self.camera = Camera::framing(&self.bounds, width as u32, rows as u32);
        self.camera.mode = mode;
        self.renderer = AsciiRenderer::new(width as usize, rows as usize);
    }

    fn update(&mut self) {
        // Slow turntable spin about the vertical axis
        if self.spinning {
            self.rotation.rotate(0.0, 0.02, 0.0);
        }
    }

    /// Rotation about the bounding-box center
    fn model_matrix(&self) -> nalgebra::Matrix4<f64> {
        Transform::rotation_about(&self.rotation, &self.bounds.center())
    }

    /// Rasterize the mesh and its bounding box into the renderer's buffers
    pub fn render_frame(&mut self) {
        let model = self.model_matrix();

        self.renderer.clear();
        self.renderer.render_mesh(&self.mesh, &model, &self.camera);
        self.renderer.render_bounds(&self.bounds, &model, &self.camera);
    }

    fn status_line(&self) -> String {
        let (width, length, height) = self.dimensions.in_units(self.unit_divisor);
        format!(
            "{} | W {:.3}m L {:.3}m H {:.3}m | {:?} | FPS: {:.1} | WASD/Arrows=Rotate E/R=Roll Space=Spin P=Projection Q=Quit",
            self.title, width, length, height, self.camera.mode, self.fps
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.render_frame();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, STATUS_ROWS))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let status: String = self
            .status_line()
            .chars()
            .take(self.renderer.width())
            .collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }
}
