//! Boundary tracing of connected same-color regions, holes included.
//!
//! The boundary walk is a wall follower that keeps the shape on its right:
//! the walker sits on a shape pixel, facing along the edge it is tracing, and
//! at each step decides from the left-hand and forward neighbors whether to
//! turn left, go straight or turn right. After the outer loop is traced, a
//! flood fill claims the region and starts one more walk for every enclosed
//! hole it runs into.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::{FragmentMap, RegionExtractor};
use crate::PixvResult;
use crate::cancel::CancellationToken;
use crate::geometry::{Direction, LineSegment, Point};
use crate::grid::{Color, PixelGrid};

/// The closed loops bounding one connected region: the outer loop first,
/// then one loop per hole in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeOutline {
    pub color: Color,
    pub loops: Vec<Vec<LineSegment>>,
}

impl ShapeOutline {
    pub fn segments(&self) -> impl Iterator<Item = &LineSegment> {
        self.loops.iter().flatten()
    }

    pub fn hole_count(&self) -> usize {
        self.loops.len().saturating_sub(1)
    }
}

/// Single-threaded contour strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContourTracer;

impl ContourTracer {
    /// Trace every connected region of the grid in row-major discovery order.
    pub fn trace_shapes(
        &self,
        grid: &PixelGrid,
        cancel: &CancellationToken,
    ) -> PixvResult<Vec<ShapeOutline>> {
        let (width, height) = grid.dimensions();
        let mut marks = VertexMarks::new(width, height);
        let mut shapes = Vec::new();

        for y in 0..height {
            for x in 0..width {
                if grid.is_claimed(x, y) {
                    continue;
                }
                let color = grid.pixel(x, y);
                if color.is_transparent() {
                    continue;
                }
                cancel.check()?;
                let entry = Point::new(i64::from(x), i64::from(y));
                shapes.push(trace_shape(grid, entry, color, &mut marks));
            }
        }

        Ok(shapes)
    }
}

impl RegionExtractor for ContourTracer {
    fn extract(&self, grid: &PixelGrid, cancel: &CancellationToken) -> PixvResult<FragmentMap> {
        let shapes = self.trace_shapes(grid, cancel)?;
        let holes: usize = shapes.iter().map(ShapeOutline::hole_count).sum();
        debug!(shapes = shapes.len(), holes, "Contours traced");

        let mut by_color: BTreeMap<Color, Vec<LineSegment>> = BTreeMap::new();
        for shape in shapes {
            by_color
                .entry(shape.color)
                .or_default()
                .extend(shape.loops.into_iter().flatten());
        }

        Ok(by_color
            .into_iter()
            .map(|(color, segments)| (color, vec![path_data(&segments)]))
            .collect())
    }
}

/// Serialize segments into compact relative path data. A moveto is emitted
/// only where a segment does not start at the previous segment's end.
pub fn path_data<'a>(segments: impl IntoIterator<Item = &'a LineSegment>) -> String {
    let mut d = String::new();
    let mut previous_end = None;
    for segment in segments {
        if previous_end != Some(segment.start) {
            d.push_str(&format!("M{},{}", segment.start.x, segment.start.y));
        }
        let command = match segment.direction {
            Direction::Up => format!("v-{}", segment.len),
            Direction::Right => format!("h{}", segment.len),
            Direction::Down => format!("v{}", segment.len),
            Direction::Left => format!("h-{}", segment.len),
        };
        d.push_str(&command);
        previous_end = Some(segment.end());
    }
    d
}

/// Vertices recorded by the traces of the current shape.
///
/// Stamps are compared against a per-shape generation, so moving on to the
/// next shape does not clear the buffer.
#[derive(Debug)]
pub struct VertexMarks {
    stride: usize,
    stamps: Vec<u32>,
    generation: u32,
}

impl VertexMarks {
    /// Marks for a `width x height` pixel grid, i.e. `(width + 1) x (height + 1)` vertices.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width as usize + 1;
        Self {
            stride,
            stamps: vec![0; stride * (height as usize + 1)],
            generation: 1,
        }
    }

    /// Forget the marks of the previous shape.
    pub fn next_shape(&mut self) {
        if self.generation == u32::MAX {
            self.stamps.fill(0);
            self.generation = 0;
        }
        self.generation += 1;
    }

    fn slot(&self, vertex: Point) -> Option<usize> {
        let x = usize::try_from(vertex.x).ok()?;
        let y = usize::try_from(vertex.y).ok()?;
        (x < self.stride)
            .then(|| y * self.stride + x)
            .filter(|&i| i < self.stamps.len())
    }

    pub fn mark(&mut self, vertex: Point) {
        if let Some(i) = self.slot(vertex) {
            self.stamps[i] = self.generation;
        }
    }

    pub fn is_marked(&self, vertex: Point) -> bool {
        self.slot(vertex)
            .is_some_and(|i| self.stamps[i] == self.generation)
    }
}

/// Next move of the wall follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    TurnLeft,
    Forward,
    TurnRight,
}

/// Wall-follower state: the shape pixel it stands on and where it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walker {
    pub pixel: Point,
    pub facing: Direction,
}

impl Walker {
    pub fn new(pixel: Point, facing: Direction) -> Self {
        Self { pixel, facing }
    }

    pub fn left_hand(&self) -> Point {
        self.pixel.moved(self.facing.rotated(Direction::Left))
    }

    pub fn ahead(&self) -> Point {
        self.pixel.moved(self.facing)
    }

    /// Decide the next move from the colors around the walker.
    pub fn next_move(&self, grid: &PixelGrid) -> Move {
        let here = grid.color_at(self.pixel);
        if grid.color_at(self.left_hand()) == here {
            Move::TurnLeft
        } else if grid.color_at(self.ahead()) == here {
            Move::Forward
        } else {
            Move::TurnRight
        }
    }

    /// State after performing `step`. Turning left also steps into the
    /// left-hand pixel; turning right stays on the same pixel.
    pub fn apply(self, step: Move) -> Walker {
        match step {
            Move::TurnLeft => {
                let facing = self.facing.rotated(Direction::Left);
                Walker::new(self.pixel.moved(facing), facing)
            }
            Move::Forward => Walker::new(self.ahead(), self.facing),
            Move::TurnRight => Walker::new(self.pixel, self.facing.rotated(Direction::Right)),
        }
    }

    /// The loop is closed once the current segment ends back at `start` and
    /// the walker would not turn left there. A left-hand match means the end
    /// only touches `start` provisionally and the walk must go on.
    fn has_closed(&self, grid: &PixelGrid, current: &LineSegment, start: Point) -> bool {
        current.end() == start && grid.color_at(self.pixel) != grid.color_at(self.left_hand())
    }
}

/// Walk one closed boundary loop starting at vertex `start`, with the walker
/// on pixel `start` facing `facing`.
///
/// Every straight run is provisionally extended by one unit when the walker
/// moves forward; a following left turn takes that unit back. The start
/// vertex of each finished segment is recorded in `marks`.
pub fn trace_path(
    grid: &PixelGrid,
    start: Point,
    facing: Direction,
    marks: &mut VertexMarks,
) -> Vec<LineSegment> {
    let mut walker = Walker::new(start, facing);
    let mut path = vec![LineSegment::new(start, facing)];

    loop {
        let last = path.len() - 1;
        if walker.has_closed(grid, &path[last], start) {
            break;
        }

        let step = walker.next_move(grid);
        walker = walker.apply(step);
        match step {
            Move::TurnLeft => {
                path[last].len -= 1;
                marks.mark(path[last].start);
                path.push(LineSegment::new(path[last].end(), walker.facing));
            }
            Move::Forward => path[last].len += 1,
            Move::TurnRight => {
                marks.mark(path[last].start);
                path.push(LineSegment::new(path[last].end(), walker.facing));
            }
        }
    }

    path
}

/// Trace the region containing `entry`, claiming all of its pixels.
///
/// `entry` must be the first pixel of the region in row-major order so that
/// the first walk follows the outer boundary.
pub fn trace_shape(
    grid: &PixelGrid,
    entry: Point,
    color: Color,
    marks: &mut VertexMarks,
) -> ShapeOutline {
    marks.next_shape();
    let mut loops = vec![trace_path(grid, entry, Direction::Right, marks)];

    let mut stack = vec![entry];
    while let Some(pixel) = stack.pop() {
        let (x, y) = pixel_xy(pixel);
        if !grid.try_claim(x, y) {
            continue;
        }

        for direction in Direction::ALL {
            let neighbor = pixel.moved(direction);
            let Some(neighbor_color) = grid.color_at(neighbor) else {
                continue;
            };

            if neighbor_color == color {
                let (nx, ny) = pixel_xy(neighbor);
                if !grid.is_claimed(nx, ny) {
                    stack.push(neighbor);
                }
                continue;
            }

            if direction != Direction::Right {
                continue;
            }
            if let Some(hole_start) = hole_entry(grid, pixel, neighbor, color, marks) {
                trace!(x = hole_start.x, y = hole_start.y, "Tracing hole");
                loops.push(trace_path(grid, hole_start, Direction::Right, marks));
            }
        }
    }

    ShapeOutline { color, loops }
}

/// A different-colored right neighbor whose bottom edge borders the shape
/// below both pixels marks a hole boundary, unless a previous walk of this
/// shape already passed the vertex below the neighbor.
fn hole_entry(
    grid: &PixelGrid,
    pixel: Point,
    neighbor: Point,
    color: Color,
    marks: &VertexMarks,
) -> Option<Point> {
    let below = pixel.moved(Direction::Down);
    let below_neighbor = neighbor.moved(Direction::Down);
    let encloses = grid.color_at(below) == Some(color)
        && grid.color_at(below_neighbor) == Some(color)
        && !marks.is_marked(below_neighbor);
    encloses.then_some(below_neighbor)
}

fn pixel_xy(pixel: Point) -> (u32, u32) {
    (pixel.x as u32, pixel.y as u32)
}
