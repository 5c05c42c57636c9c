use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pixv::Strategy;

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    /// Input image path (PNG, JPEG, GIF, BMP)
    pub input: PathBuf,
    /// Output SVG path (defaults to input name with `.svg`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Vectorization method
    #[arg(short = 'm', long, value_enum, env = pixv::ENV_METHOD, default_value_t = MethodArg::Path)]
    pub method: MethodArg,
    /// Integer scale factor applied to the output document
    #[arg(short = 's', long, env = pixv::ENV_SCALE, default_value_t = 1, allow_negative_numbers = true)]
    pub scale: i64,
    /// Worker threads for the rectangle and square methods (defaults to one per core)
    #[arg(long)]
    pub workers: Option<NonZeroUsize>,
}

/// Vectorization methods selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Trace region outlines, holes included
    Path,
    /// Tile regions with rectangles
    Rectangle,
    /// One square per pixel
    Square,
}

impl From<MethodArg> for Strategy {
    /// Convert MethodArg to pixv::Strategy.
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Path => Strategy::Path,
            MethodArg::Rectangle => Strategy::Rectangle,
            MethodArg::Square => Strategy::Square,
        }
    }
}
