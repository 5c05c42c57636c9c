use std::collections::BTreeMap;
use std::ops::Range;

use rayon::prelude::*;
use tracing::debug;

use super::{FragmentMap, RegionExtractor, reduce_partials, row_ranges, worker_pool};
use crate::PixvResult;
use crate::cancel::CancellationToken;
use crate::geometry::Rect;
use crate::grid::{Color, PixelGrid};

/// Rectangles per color, in discovery order.
pub type RectMap = BTreeMap<Color, Vec<Rect>>;

/// Greedy rectangle tiling, parallel over contiguous row ranges.
///
/// A rectangle never grows past the last row of the range its seed pixel
/// belongs to, so workers only ever read and claim their own rows.
#[derive(Debug, Clone, Copy)]
pub struct RectangleMerger {
    workers: usize,
}

impl RectangleMerger {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Cover every opaque pixel with exactly one single-color rectangle.
    pub fn merge(&self, grid: &PixelGrid, cancel: &CancellationToken) -> PixvResult<RectMap> {
        let ranges = row_ranges(grid.height(), self.workers);
        let pool = worker_pool(self.workers)?;

        let partials = pool
            .install(|| {
                ranges
                    .into_par_iter()
                    .enumerate()
                    .map(|(order, rows)| scan_rows(grid, rows, cancel).map(|local| (order, local)))
                    .collect::<PixvResult<Vec<_>>>()
            })
            .inspect_err(|err| debug!(%err, "Rectangle merge stopped"))?;

        Ok(reduce_partials(partials))
    }
}

impl RegionExtractor for RectangleMerger {
    fn extract(&self, grid: &PixelGrid, cancel: &CancellationToken) -> PixvResult<FragmentMap> {
        let rects = self.merge(grid, cancel)?;
        debug!(
            rectangles = rects.values().map(Vec::len).sum::<usize>(),
            pixels = rects.values().flatten().map(Rect::area).sum::<u64>(),
            colors = rects.len(),
            "Rectangles merged"
        );

        Ok(rects
            .into_iter()
            .map(|(color, rects)| (color, rects.iter().map(rect_path).collect()))
            .collect())
    }
}

/// Closed path around a rectangle: `M{x},{y}h{w}v{h}h-{w}`.
pub fn rect_path(rect: &Rect) -> String {
    format!(
        "M{},{}h{}v{}h-{}",
        rect.x, rect.y, rect.width, rect.height, rect.width
    )
}

/// Scan one worker's rows in row-major order, seeding a rectangle at every
/// opaque pixel it manages to claim.
fn scan_rows(
    grid: &PixelGrid,
    rows: Range<u32>,
    cancel: &CancellationToken,
) -> PixvResult<RectMap> {
    let mut local = RectMap::new();
    for y in rows.clone() {
        for x in 0..grid.width() {
            cancel.check()?;
            if !grid.try_claim(x, y) {
                continue;
            }
            let color = grid.pixel(x, y);
            if color.is_transparent() {
                continue;
            }
            let rect = grow_rect(grid, x, y, rows.end, color);
            grid.claim_region(rect);
            local.entry(color).or_default().push(rect);
        }
    }
    Ok(local)
}

/// Grow a rectangle from the seed at `(x, y)`: first rightward over
/// unclaimed pixels of `color`, then downward (stopping before `row_end`)
/// while the whole next row of that width matches.
///
/// Height growth skips the claim check. Within one row range any claimed
/// pixel below the seed row belongs to a rectangle that also covers the
/// seed row, and width growth has already stopped short of it.
fn grow_rect(grid: &PixelGrid, x: u32, y: u32, row_end: u32, color: Color) -> Rect {
    let mut width = 1;
    while x + width < grid.width()
        && !grid.is_claimed(x + width, y)
        && grid.pixel(x + width, y) == color
    {
        width += 1;
    }

    let mut height = 1;
    while y + height < row_end && (x..x + width).all(|cx| grid.pixel(cx, y + height) == color) {
        height += 1;
    }

    Rect::new(x, y, width, height)
}
