use std::fs;

use pixv::{Pixv, PixvResult};
use tracing::debug;

use crate::cli::Cli;

use super::utils::derive_svg_path;

/// The main function to run the vectorize command.
pub fn run(cli: Cli) -> PixvResult<()> {
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| derive_svg_path(&cli.input));

    let pixv = Pixv::new(cli.method.into())
        .with_scale(cli.scale)
        .with_workers(cli.workers);
    let svg = pixv.vectorize_path(&cli.input)?;
    debug!(bytes = svg.len(), "Composed SVG document");

    fs::write(&output_path, &svg)?;
    println!("SVG saved to {}", output_path.display());

    Ok(())
}
