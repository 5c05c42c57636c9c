use rayon::prelude::*;
use tracing::debug;

use super::{FragmentMap, RegionExtractor, reduce_partials, worker_pool};
use crate::PixvResult;
use crate::cancel::CancellationToken;
use crate::grid::PixelGrid;

/// Emitted rows tagged with their scanline index.
type Scanlines = Vec<(usize, FragmentMap)>;

/// One unit square per opaque pixel, with scanlines spread over a fixed-size
/// worker pool.
#[derive(Debug, Clone, Copy)]
pub struct SquareEmitter {
    workers: usize,
}

impl SquareEmitter {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl RegionExtractor for SquareEmitter {
    fn extract(&self, grid: &PixelGrid, cancel: &CancellationToken) -> PixvResult<FragmentMap> {
        let pool = worker_pool(self.workers)?;

        // Each worker folds its scanlines into a local list; lists are joined
        // once per split and put back in scanline order by the reduction.
        let partials = pool
            .install(|| {
                (0..grid.height())
                    .into_par_iter()
                    .try_fold(Vec::new, |mut rows, y| -> PixvResult<Scanlines> {
                        cancel.check()?;
                        rows.push((y as usize, emit_row(grid, y)));
                        Ok(rows)
                    })
                    .try_reduce(Vec::new, |mut left, mut right| {
                        left.append(&mut right);
                        Ok(left)
                    })
            })
            .inspect_err(|err| debug!(%err, "Square emission stopped"))?;

        let fragments = reduce_partials(partials);
        let count: usize = fragments.values().map(Vec::len).sum();
        debug!(squares = count, colors = fragments.len(), "Squares emitted");
        Ok(fragments)
    }
}

/// Unit squares for the opaque pixels of row `y`.
fn emit_row(grid: &PixelGrid, y: u32) -> FragmentMap {
    let mut row = FragmentMap::new();
    for x in 0..grid.width() {
        let color = grid.pixel(x, y);
        if color.is_transparent() || !grid.try_claim(x, y) {
            continue;
        }
        row.entry(color).or_default().push(square_path(x, y));
    }
    row
}

pub fn square_path(x: u32, y: u32) -> String {
    format!("M{x},{y}h1v1h-1")
}
