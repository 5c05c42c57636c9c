pub mod cancel;
pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod grid;
pub mod svg;

pub use cancel::CancellationToken;
pub use config::{Strategy, VectorizeOptions};
pub use error::{PixvError, PixvResult};
pub use extract::{
    ContourTracer, FragmentMap, RectangleMerger, RegionExtractor, ShapeOutline, SquareEmitter,
};
pub use grid::{Color, PixelGrid};
pub use svg::compose_svg;

use std::num::NonZeroUsize;
use std::path::Path;

use image::RgbaImage;
use tracing::{debug, info};

/// Environment variable read by the CLI for the default method.
pub const ENV_METHOD: &str = "PIXV_METHOD";
/// Environment variable read by the CLI for the default scale.
pub const ENV_SCALE: &str = "PIXV_SCALE";

/// Vectorize a decoded RGBA image into an SVG document.
pub fn vectorize(image: &RgbaImage, options: &VectorizeOptions) -> PixvResult<String> {
    let grid = PixelGrid::from_image(image);
    vectorize_grid(&grid, options)
}

/// Vectorize a prepared pixel grid into an SVG document.
///
/// The selected strategy claims the pixels it covers, so a grid is only
/// meaningful for a single call; a second call on the same grid yields an
/// empty document.
pub fn vectorize_grid(grid: &PixelGrid, options: &VectorizeOptions) -> PixvResult<String> {
    let scale = validate_scale(options.scale)?;
    let workers = options.worker_count();
    debug!(
        strategy = %options.strategy,
        width = grid.width(),
        height = grid.height(),
        workers,
        opaque = grid.opaque_pixel_count(),
        "Vectorizing"
    );

    let fragments = match options.strategy {
        Strategy::Path => ContourTracer.extract(grid, &options.cancel),
        Strategy::Rectangle => RectangleMerger::new(workers).extract(grid, &options.cancel),
        Strategy::Square => SquareEmitter::new(workers).extract(grid, &options.cancel),
    }
    .inspect_err(|err| {
        if matches!(err, PixvError::Cancelled) {
            info!(
                strategy = %options.strategy,
                claimed = grid.claimed_count(),
                "Vectorization cancelled"
            );
        }
    })?;

    Ok(compose_svg(grid.width(), grid.height(), scale, &fragments))
}

/// Decode an image file into a pixel grid.
pub fn load_grid(path: impl AsRef<Path>) -> PixvResult<PixelGrid> {
    let image = image::open(path.as_ref())?.to_rgba8();
    Ok(PixelGrid::from_image(&image))
}

fn validate_scale(scale: i64) -> PixvResult<u32> {
    if scale <= 0 {
        return Err(PixvError::InvalidScale { scale });
    }
    u32::try_from(scale).map_err(|_| PixvError::InvalidScale { scale })
}

/// Entry point for configuring and running vectorization of image files.
#[derive(Debug, Clone, Default)]
pub struct Pixv {
    options: VectorizeOptions,
}

impl Pixv {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            options: VectorizeOptions::new(strategy),
        }
    }

    /// Set the integer scale factor applied to the output document.
    pub fn with_scale(mut self, scale: i64) -> Self {
        self.options.scale = scale;
        self
    }

    /// Set the worker count for the parallel strategies (None for one per core).
    pub fn with_workers(mut self, workers: Option<NonZeroUsize>) -> Self {
        self.options.workers = workers;
        self
    }

    /// Share a cancellation token with the caller.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.options.cancel = cancel;
        self
    }

    /// Get a reference to the accumulated options.
    pub fn options(&self) -> &VectorizeOptions {
        &self.options
    }

    pub fn vectorize_image(&self, image: &RgbaImage) -> PixvResult<String> {
        vectorize(image, &self.options)
    }

    /// Load the image at `path` and vectorize it.
    pub fn vectorize_path(&self, path: impl AsRef<Path>) -> PixvResult<String> {
        let path = path.as_ref();
        let grid = load_grid(path)?;
        debug!(path = %path.display(), "Loaded image");
        vectorize_grid(&grid, &self.options)
    }
}
