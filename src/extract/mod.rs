use std::collections::BTreeMap;
use std::ops::Range;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::PixvResult;
use crate::cancel::CancellationToken;
use crate::grid::{Color, PixelGrid};

pub mod contour;
pub mod rectangle;
pub mod square;

pub use contour::{ContourTracer, ShapeOutline};
pub use rectangle::RectangleMerger;
pub use square::SquareEmitter;

/// Serialized path fragments per color. Iterates in `(r, g, b, a)` order.
pub type FragmentMap = BTreeMap<Color, Vec<String>>;

/// A strategy that turns the opaque pixels of a grid into path fragments.
///
/// Implementations claim every pixel they cover, so a grid can only be
/// extracted once.
pub trait RegionExtractor {
    fn extract(&self, grid: &PixelGrid, cancel: &CancellationToken) -> PixvResult<FragmentMap>;
}

/// Dedicated pool for one extraction run, sized to the requested worker count.
pub(crate) fn worker_pool(workers: usize) -> PixvResult<ThreadPool> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("pixv-worker-{i}"))
        .build()?;
    Ok(pool)
}

/// Split `0..height` into at most `workers` contiguous, disjoint row ranges.
pub(crate) fn row_ranges(height: u32, workers: usize) -> Vec<Range<u32>> {
    let workers = u32::try_from(workers.max(1)).unwrap_or(u32::MAX);
    let rows_per_worker = height.div_ceil(workers).max(1);
    (0..workers)
        .map(|i| {
            let start = i.saturating_mul(rows_per_worker).min(height);
            let end = start.saturating_add(rows_per_worker).min(height);
            start..end
        })
        .filter(|rows| !rows.is_empty())
        .collect()
}

/// Combine per-worker results in the order of their work units, so the
/// fragment order within a color does not depend on thread scheduling.
pub(crate) fn reduce_partials<T>(
    mut partials: Vec<(usize, BTreeMap<Color, Vec<T>>)>,
) -> BTreeMap<Color, Vec<T>> {
    partials.sort_by_key(|(order, _)| *order);
    let mut merged: BTreeMap<Color, Vec<T>> = BTreeMap::new();
    for (_, partial) in partials {
        for (color, mut items) in partial {
            merged.entry(color).or_default().append(&mut items);
        }
    }
    merged
}
