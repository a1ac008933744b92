/// meshalign - normalize the pose of a vehicle mesh
///
/// Loads the configured mesh, scales, rotates and grounds it, writes the
/// `_aligned` copy and opens the terminal viewer.
/// Viewer controls:
///   - WASD / Arrow Keys: Rotate the mesh
///   - E/R: Roll rotation
///   - Space: Toggle spin
///   - P: Toggle perspective/orthographic projection
///   - Q/ESC: Quit

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use meshalign_core::pipeline;
use meshalign_terminal::{cli::Cli, TerminalApp};

fn main() -> Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let job = cli.job();

    let aligned = pipeline::run(&job).with_context(|| {
        format!(
            "failed to align {:?} using {}",
            job.vehicle,
            job.config_path.display()
        )
    })?;

    if cli.no_view {
        return Ok(());
    }

    info!("Starting terminal viewer (press Q to quit)...");
    let title = aligned
        .output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| job.vehicle.clone());

    let mut app = TerminalApp::new(aligned.mesh, title)
        .context("failed to start viewer")?
        .with_unit_divisor(job.unit_divisor);
    app.run().context("viewer failed")?;

    Ok(())
}
