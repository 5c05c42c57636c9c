//! Integer, axis-aligned geometry shared by the extraction strategies.

/// One of the four grid directions. `Up` is towards smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn index(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            _ => Direction::Left,
        }
    }

    /// Compose two directions by mod-4 addition: rotating by `Right` turns
    /// 90 degrees clockwise, by `Left` 90 degrees counter-clockwise.
    pub fn rotated(self, by: Direction) -> Direction {
        Direction::from_index(self.index() + by.index())
    }

    /// Unit offset `(dx, dy)` of one step in this direction.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

/// Integer point. Used both for pixels and for the vertices between them;
/// vertex `(x, y)` is the top-left corner of pixel `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn moved_by(self, direction: Direction, steps: i64) -> Point {
        let (dx, dy) = direction.offset();
        Point::new(self.x + dx * steps, self.y + dy * steps)
    }

    pub fn moved(self, direction: Direction) -> Point {
        self.moved_by(direction, 1)
    }
}

/// Directed, axis-aligned run of `len` unit edges starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub start: Point,
    pub direction: Direction,
    pub len: i64,
}

impl LineSegment {
    pub fn new(start: Point, direction: Direction) -> Self {
        Self {
            start,
            direction,
            len: 1,
        }
    }

    pub fn end(&self) -> Point {
        self.start.moved_by(self.direction, self.len)
    }
}

/// Pixel rectangle `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x - self.x < self.width && y >= self.y && y - self.y < self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod direction {
        use super::*;

        #[test]
        fn rotating_right_is_clockwise() {
            assert_eq!(Direction::Up.rotated(Direction::Right), Direction::Right);
            assert_eq!(Direction::Right.rotated(Direction::Right), Direction::Down);
            assert_eq!(Direction::Down.rotated(Direction::Right), Direction::Left);
            assert_eq!(Direction::Left.rotated(Direction::Right), Direction::Up);
        }

        #[test]
        fn rotating_left_is_counter_clockwise() {
            assert_eq!(Direction::Up.rotated(Direction::Left), Direction::Left);
            assert_eq!(Direction::Right.rotated(Direction::Left), Direction::Up);
        }

        #[test]
        fn rotating_by_up_is_identity() {
            for d in Direction::ALL {
                assert_eq!(d.rotated(Direction::Up), d);
            }
        }

        #[test]
        fn four_right_turns_return_home() {
            for d in Direction::ALL {
                let turned = (0..4).fold(d, |acc, _| acc.rotated(Direction::Right));
                assert_eq!(turned, d);
            }
        }
    }

    mod line_segment {
        use super::*;

        #[test]
        fn end_follows_direction_and_length() {
            let mut seg = LineSegment::new(Point::new(2, 3), Direction::Up);
            seg.len = 2;
            assert_eq!(seg.end(), Point::new(2, 1));

            let seg = LineSegment::new(Point::new(2, 3), Direction::Left);
            assert_eq!(seg.end(), Point::new(1, 3));
        }
    }

    mod rect {
        use super::*;

        #[test]
        fn contains_is_half_open() {
            let r = Rect::new(1, 1, 2, 3);
            assert!(r.contains(1, 1));
            assert!(r.contains(2, 3));
            assert!(!r.contains(3, 1));
            assert!(!r.contains(1, 4));
            assert!(!r.contains(0, 1));
            assert_eq!(r.area(), 6);
        }
    }
}
