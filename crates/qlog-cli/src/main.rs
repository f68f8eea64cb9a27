//! qlog - Convert basis normal maps to and from quaternion-logarithm maps

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use qlog_core::{ConvertConfig, ConvertJob, Direction};
use std::path::PathBuf;
use tracing::{debug, warn};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "qlog")]
#[command(author, version, about = "Convert between basis vector normal maps and quaternion logarithm normal maps")]
#[command(long_about = "
Convert between basis vector (XYZ) normal maps and two-channel quaternion
logarithm (QLog) normal maps. QLog maps can be blended and added linearly
while approximating correct spherical interpolation.

Examples:
  qlog normal.png qlog.png                  # Basis normal -> QLog
  qlog -i qlog.png normal.png               # QLog -> basis normal
  qlog --derive-z normal_xy.tif qlog.exr    # Rebuild Z from XY first
  qlog -b 1.5 normal.exr qlog.png -d 16     # More precision near the normal
  qlog -i -b 1.5 qlog.png normal.exr        # Decode with the same bias
")]
struct Cli {
    /// Input image followed by output image
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Convert from a QLog map to a basis normal map
    #[arg(short, long)]
    inverse: bool,

    /// Calculate Z of the basis normal from X and Y (basis -> QLog only)
    #[arg(short = 'z', long = "derive-z", alias = "deriveZ")]
    derive_z: bool,

    /// Precision bias on the angle from the normal: positive values bias
    /// precision towards the normal, negative values away from it, 0 is linear
    #[arg(short, long, default_value = "0.0", allow_negative_numbers = true)]
    bias: f32,

    /// Output bit depth: 8, 16, half, 32 (default: same as input)
    #[arg(short = 'd', long)]
    depth: Option<String>,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Also write log output to this file
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

impl Cli {
    /// Builds the immutable run configuration from the parsed flags.
    fn config(&self) -> ConvertConfig {
        let direction = if self.inverse {
            Direction::Inverse
        } else {
            Direction::Forward
        };

        ConvertConfig::new()
            .with_direction(direction)
            .with_derive_z(self.derive_z)
            .with_bias(self.bias)
    }

    /// Validates the file list and configuration into a job.
    fn job(&self) -> qlog_core::Result<ConvertJob> {
        ConvertJob::new(self.files.clone(), self.config())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(cli.verbose, cli.log.as_deref())?;

    // Configuration problems are reported before any image is touched.
    let job = cli.job()?;
    for notice in job.config.warnings() {
        warn!("{}", notice);
    }

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }
    debug!(threads = rayon::current_num_threads(), "Thread pool ready");

    commands::convert::run(&job, cli.depth.as_deref(), cli.verbose)
}
