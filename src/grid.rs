use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use image::{Rgba, RgbaImage};

use crate::geometry::{Point, Rect};
use crate::{PixvError, PixvResult};

/// Straight (non-premultiplied) RGBA color. Orders by `(r, g, b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl From<Rgba<u8>> for Color {
    fn from(value: Rgba<u8>) -> Self {
        let [r, g, b, a] = value.0;
        Self { r, g, b, a }
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Formats as `#rrggbb`; alpha goes into a separate `fill-opacity`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Immutable color buffer plus a concurrently claimable visitation bitmap.
///
/// Colors are read without synchronization. Each pixel's visitation flag
/// moves from unclaimed to claimed at most once and is never reset.
#[derive(Debug)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    colors: Vec<Color>,
    claimed: Vec<AtomicBool>,
}

impl PixelGrid {
    /// Build a grid from a row-major color buffer.
    pub fn new(width: u32, height: u32, colors: Vec<Color>) -> PixvResult<Self> {
        let expected = width as usize * height as usize;
        if colors.len() != expected {
            return Err(PixvError::DimensionMismatch {
                expected,
                found: colors.len(),
            });
        }
        Ok(Self {
            width,
            height,
            colors,
            claimed: unclaimed(expected),
        })
    }

    /// Copy a decoded `image` buffer into a fresh, fully unclaimed grid.
    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let colors: Vec<Color> = image.pixels().map(|px| Color::from(*px)).collect();
        let claimed = unclaimed(colors.len());
        Self {
            width,
            height,
            colors,
            claimed,
        }
    }

    /// Grid filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            colors: vec![color; len],
            claimed: unclaimed(len),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Whether the signed coordinate lies on the grid.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && point.x < i64::from(self.width)
            && point.y < i64::from(self.height)
    }

    /// Color of the pixel at `point`, or `None` off the grid. `None` never
    /// equals a real color, so grid edges always read as a boundary.
    pub fn color_at(&self, point: Point) -> Option<Color> {
        if self.contains(point) {
            Some(self.colors[self.index(point.x as u32, point.y as u32)])
        } else {
            None
        }
    }

    /// Color of an in-bounds pixel.
    ///
    /// Panics if `(x, y)` is off the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.colors[self.index(x, y)]
    }

    /// Atomically claim a pixel. Returns `true` only for the first caller.
    pub fn try_claim(&self, x: u32, y: u32) -> bool {
        self.claimed[self.index(x, y)]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_claimed(&self, x: u32, y: u32) -> bool {
        self.claimed[self.index(x, y)].load(Ordering::Acquire)
    }

    /// Mark every pixel of `rect` as claimed.
    pub fn claim_region(&self, rect: Rect) {
        for y in rect.y..rect.y + rect.height {
            let row = self.index(rect.x, y);
            for flag in &self.claimed[row..row + rect.width as usize] {
                flag.store(true, Ordering::Release);
            }
        }
    }

    /// Number of pixels with a non-zero alpha channel.
    pub fn opaque_pixel_count(&self) -> usize {
        self.colors.iter().filter(|c| !c.is_transparent()).count()
    }

    /// Number of pixels claimed so far.
    pub fn claimed_count(&self) -> usize {
        self.claimed
            .iter()
            .filter(|flag| flag.load(Ordering::Acquire))
            .count()
    }
}

fn unclaimed(len: usize) -> Vec<AtomicBool> {
    std::iter::repeat_with(|| AtomicBool::new(false))
        .take(len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    mod new {
        use super::*;

        #[test]
        fn wrong_buffer_length_is_rejected() {
            let err = PixelGrid::new(2, 2, vec![RED; 3]).unwrap_err();
            match err {
                PixvError::DimensionMismatch { expected, found } => {
                    assert_eq!(expected, 4);
                    assert_eq!(found, 3);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn empty_grid_is_allowed() {
            let grid = PixelGrid::new(0, 0, Vec::new()).unwrap();
            assert_eq!(grid.dimensions(), (0, 0));
            assert_eq!(grid.opaque_pixel_count(), 0);
        }
    }

    mod from_image {
        use super::*;

        #[test]
        fn copies_pixels_row_major() {
            let mut image = RgbaImage::new(2, 1);
            image.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
            image.put_pixel(1, 0, Rgba([5, 6, 7, 8]));

            let grid = PixelGrid::from_image(&image);
            assert_eq!(grid.pixel(0, 0), Color::rgba(1, 2, 3, 4));
            assert_eq!(grid.pixel(1, 0), Color::rgba(5, 6, 7, 8));
            assert_eq!(grid.claimed_count(), 0);
        }
    }

    mod color_at {
        use super::*;

        #[test]
        fn off_grid_is_none() {
            let grid = PixelGrid::filled(2, 2, RED);
            assert_eq!(grid.color_at(Point::new(-1, 0)), None);
            assert_eq!(grid.color_at(Point::new(0, -1)), None);
            assert_eq!(grid.color_at(Point::new(2, 0)), None);
            assert_eq!(grid.color_at(Point::new(0, 2)), None);
            assert_eq!(grid.color_at(Point::new(1, 1)), Some(RED));
        }

        #[test]
        fn off_grid_differs_from_transparent() {
            let grid = PixelGrid::filled(1, 1, Color::default());
            assert_ne!(grid.color_at(Point::new(1, 0)), grid.color_at(Point::new(0, 0)));
        }
    }

    mod claim {
        use super::*;

        #[test]
        fn first_claim_wins() {
            let grid = PixelGrid::filled(2, 2, RED);
            assert!(!grid.is_claimed(1, 0));
            assert!(grid.try_claim(1, 0));
            assert!(!grid.try_claim(1, 0));
            assert!(grid.is_claimed(1, 0));
            assert!(!grid.is_claimed(0, 0));
        }

        #[test]
        fn claim_region_marks_exactly_the_rect() {
            let grid = PixelGrid::filled(4, 4, BLUE);
            let rect = Rect::new(1, 1, 2, 3);
            grid.claim_region(rect);
            for y in 0..4 {
                for x in 0..4 {
                    assert_eq!(grid.is_claimed(x, y), rect.contains(x, y), "({x}, {y})");
                }
            }
            assert_eq!(grid.claimed_count(), 6);
        }

        #[test]
        fn concurrent_claims_are_exactly_once() {
            let grid = PixelGrid::filled(16, 16, RED);
            let wins: usize = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..8)
                    .map(|_| {
                        scope.spawn(|| {
                            let mut won = 0;
                            for y in 0..16 {
                                for x in 0..16 {
                                    if grid.try_claim(x, y) {
                                        won += 1;
                                    }
                                }
                            }
                            won
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).sum()
            });
            assert_eq!(wins, 256);
            assert_eq!(grid.claimed_count(), 256);
        }
    }

    mod color {
        use super::*;

        #[test]
        fn displays_as_lowercase_hex_without_alpha() {
            assert_eq!(Color::rgba(255, 16, 1, 7).to_string(), "#ff1001");
        }

        #[test]
        fn orders_by_channels() {
            let mut colors = vec![
                Color::rgba(1, 0, 0, 0),
                Color::rgba(0, 0, 0, 255),
                Color::rgba(0, 1, 0, 0),
                Color::rgba(0, 0, 0, 1),
            ];
            colors.sort();
            assert_eq!(
                colors,
                vec![
                    Color::rgba(0, 0, 0, 1),
                    Color::rgba(0, 0, 0, 255),
                    Color::rgba(0, 1, 0, 0),
                    Color::rgba(1, 0, 0, 0),
                ]
            );
        }
    }
}
