/// The load → scale → rotate → translate → export sequence for one vehicle
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::align::{self, Dimensions};
use crate::config::AlignConfig;
use crate::error::Result;
use crate::geometry::Mesh;
use crate::io;

/// Inputs for aligning one vehicle mesh
#[derive(Debug, Clone)]
pub struct AlignJob {
    pub config_path: PathBuf,
    pub root_dir: PathBuf,
    pub vehicle: String,
    pub suffix: String,
    /// Extents are divided by this when reported as meters
    pub unit_divisor: f64,
}

impl AlignJob {
    pub fn new(config_path: impl AsRef<Path>, root_dir: impl AsRef<Path>, vehicle: &str) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            root_dir: root_dir.as_ref().to_path_buf(),
            vehicle: vehicle.to_string(),
            suffix: ".obj".to_string(),
            unit_divisor: 10.0,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_unit_divisor(mut self, divisor: f64) -> Self {
        self.unit_divisor = divisor;
        self
    }
}

/// The aligned mesh plus where it was written
#[derive(Debug, Clone)]
pub struct AlignedMesh {
    pub mesh: Mesh,
    pub dimensions: Dimensions,
    pub source: PathBuf,
    pub output: PathBuf,
}

fn log_vertex_sample(mesh: &Mesh) {
    let sample: Vec<_> = mesh
        .vertices
        .iter()
        .take(3)
        .map(|v| format!("({:.6}, {:.6}, {:.6})", v.x, v.y, v.z))
        .collect();
    info!("Vertex example: {}", sample.join(" "));
}

/// Run every step for `job.vehicle` and export the result next to the source
pub fn run(job: &AlignJob) -> Result<AlignedMesh> {
    let config = AlignConfig::load(&job.config_path)?;
    run_with_config(&config, job)
}

/// Same as [`run`] with an already-loaded config
pub fn run_with_config(config: &AlignConfig, job: &AlignJob) -> Result<AlignedMesh> {
    let entry = config.vehicle(&job.vehicle)?;
    let source = entry.mesh_path(&job.root_dir, &job.suffix);

    // 1. Load
    let mut mesh = io::load_mesh(&source)?;
    info!("Number of vertices: {}", mesh.vertices.len());
    log_vertex_sample(&mesh);

    // 2. Scale
    match entry.scale_factor(&job.vehicle)? {
        Some(factor) => {
            warn!("Scaling the mesh by {factor}");
            align::scale(&mut mesh, factor);
            log_vertex_sample(&mesh);
        }
        None => warn!("No scaling is needed"),
    }

    // 3. Rotate
    align::apply_rotation_setting(&mut mesh, &entry.rotation());

    // 4. Translate
    let dimensions = align::translate_to_ground(&mut mesh);
    align::report_dimensions(&dimensions, job.unit_divisor);

    // 5. Export
    let output = entry.aligned_path(&job.root_dir, &job.suffix);
    io::save_mesh(&mesh, &output)?;
    info!("Mesh saved to: {}", output.display());

    Ok(AlignedMesh {
        mesh,
        dimensions,
        source,
        output,
    })
}
