//! Command-line flags for the `meshalign` binary

use clap::Parser;
use meshalign_core::AlignJob;
use std::path::PathBuf;

/// Normalize the pose of a vehicle mesh and preview it in the terminal
///
/// Loads `<root>/<subfolder>/<name><suffix>`, applies the scale and rotation
/// configured for the vehicle, rests it centered on the ground plane and
/// writes `<name>_aligned<suffix>` next to the source.
#[derive(Debug, Parser)]
#[command(name = "meshalign")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Path of the YAML file with per-vehicle parameters
    #[arg(long, default_value = "./params/mesh_align_params.yaml")]
    pub yaml_path: PathBuf,

    /// Root directory of the vehicle meshes
    #[arg(long, default_value = "./vehicle_models")]
    pub vehicle_meshes_root_dir: PathBuf,

    /// Name of the vehicle entry in the YAML file
    #[arg(long, default_value = "VEHICLE_1")]
    pub vehicle_yaml_name: String,

    /// Suffix of the mesh file (selects OBJ or STL)
    #[arg(long, default_value = ".obj")]
    pub suffix: String,

    /// Divisor applied to extents when reporting them in meters
    #[arg(long, default_value_t = 10.0, value_parser = parse_divisor)]
    pub unit_divisor: f64,

    /// Skip the interactive viewer
    #[arg(long)]
    pub no_view: bool,
}

impl Cli {
    pub fn job(&self) -> AlignJob {
        AlignJob::new(
            &self.yaml_path,
            &self.vehicle_meshes_root_dir,
            &self.vehicle_yaml_name,
        )
        .with_suffix(self.suffix.clone())
        .with_unit_divisor(self.unit_divisor)
    }
}

fn parse_divisor(value: &str) -> Result<f64, String> {
    let divisor: f64 = value.parse().map_err(|err| format!("{err}"))?;
    if divisor.is_finite() && divisor > 0.0 {
        Ok(divisor)
    } else {
        Err(format!("must be a positive number, got {divisor}"))
    }
}
