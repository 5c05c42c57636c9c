use thiserror::Error;

/// Result type alias for operations that may fail with [`PixvError`].
pub type PixvResult<T> = std::result::Result<T, PixvError>;

/// Error types that can occur while vectorizing an image.
///
/// `Image` and `Io` are raised by the loading layer; everything else comes
/// from the engine itself.
#[derive(Debug, Error)]
pub enum PixvError {
    /// Scale factor is zero or negative.
    #[error("Scale must be a positive integer, got {scale}")]
    InvalidScale { scale: i64 },
    /// Strategy name is not one of `path`, `rectangle` or `square`.
    #[error("Unknown vectorization method: {0}")]
    UnknownStrategy(String),
    /// The cancellation token was triggered while the strategy was running.
    #[error("Vectorization cancelled")]
    Cancelled,
    /// Raw color buffer length does not match the requested dimensions.
    #[error("Color buffer holds {found} pixels but {expected} were expected")]
    DimensionMismatch { expected: usize, found: usize },
    /// The worker pool for a parallel strategy could not be started.
    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Image loading or decoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
