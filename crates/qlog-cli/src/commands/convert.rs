//! Normal map conversion command.
//!
//! Loads the input image, runs every pixel through the QLog converter in
//! the configured direction, and saves the result at the input's bit depth
//! unless a depth override is given.

use anyhow::{Context, Result};
use qlog_core::ConvertJob;
use qlog_io::ImageData;
use qlog_ops::QLogConverter;
use tracing::{debug, info, trace};

/// Runs the conversion described by `job`.
pub fn run(job: &ConvertJob, depth: Option<&str>, verbose: u8) -> Result<()> {
    trace!(input = %job.input.display(), output = %job.output.display(), "convert::run");

    let config = &job.config;
    let target_format = depth.map(super::parse_depth).transpose()?;

    info!(
        input = %job.input.display(),
        output = %job.output.display(),
        direction = %config.direction,
        derive_z = config.derive_z,
        bias = config.bias,
        "Converting normal map"
    );

    if verbose > 0 {
        println!(
            "Converting {} -> {} ({})",
            job.input.display(),
            job.output.display(),
            config.direction
        );
    }

    let image = super::load_image(&job.input)?;
    debug!(pixels = image.pixel_count(), channels = image.channels, "Loaded input");
    let (samples, channels) = QLogConverter::new(config)
        .convert_image(
            image.to_f32(),
            image.width as usize,
            image.height as usize,
            image.channels as usize,
        )
        .with_context(|| format!("Failed to convert: {}", job.input.display()))?;

    let format = target_format.unwrap_or(image.format);
    debug!(from = ?image.format, to = ?format, "Output bit depth");
    if verbose > 0 && format != image.format {
        println!("  Converting depth: {:?} -> {:?}", image.format, format);
    }

    let output = ImageData::from_f32(image.width, image.height, channels as u32, samples)
        .convert_to(format);
    super::save_image(&job.output, &output)?;

    if verbose > 0 {
        println!("Done.");
    }

    Ok(())
}
