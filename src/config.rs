use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::PixvError;
use crate::cancel::CancellationToken;

/// Region extraction algorithm used to vectorize the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Trace the outline of every connected region, holes included.
    #[default]
    Path,
    /// Tile regions with greedily grown rectangles.
    Rectangle,
    /// Emit one unit square per opaque pixel.
    Square,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Path, Strategy::Rectangle, Strategy::Square];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Path => "path",
            Strategy::Rectangle => "rectangle",
            Strategy::Square => "square",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = PixvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PixvError::UnknownStrategy(s.to_string()))
    }
}

/// Options for a single vectorization run.
#[derive(Debug, Clone)]
pub struct VectorizeOptions {
    /// Extraction algorithm.
    pub strategy: Strategy,
    /// Output scale factor; must be at least 1.
    pub scale: i64,
    /// Worker threads for the parallel strategies (None to use every core).
    pub workers: Option<NonZeroUsize>,
    /// Checked cooperatively while the strategy runs.
    pub cancel: CancellationToken,
}

impl VectorizeOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: i64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_workers(mut self, workers: Option<NonZeroUsize>) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Resolved worker count for the parallel strategies.
    pub fn worker_count(&self) -> usize {
        self.workers
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }
}

impl Default for VectorizeOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Path,
            scale: 1,
            workers: None,
            cancel: CancellationToken::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod strategy {
        use super::*;

        #[test]
        fn parses_known_names() {
            assert_eq!("path".parse::<Strategy>().unwrap(), Strategy::Path);
            assert_eq!("Rectangle".parse::<Strategy>().unwrap(), Strategy::Rectangle);
            assert_eq!(" square ".parse::<Strategy>().unwrap(), Strategy::Square);
        }

        #[test]
        fn unknown_name_is_an_error() {
            match "triangle".parse::<Strategy>() {
                Err(PixvError::UnknownStrategy(name)) => assert_eq!(name, "triangle"),
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[test]
        fn display_round_trips_through_from_str() {
            for strategy in Strategy::ALL {
                assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
            }
        }
    }

    mod options {
        use super::*;

        #[test]
        fn defaults() {
            let options = VectorizeOptions::default();
            assert_eq!(options.strategy, Strategy::Path);
            assert_eq!(options.scale, 1);
            assert!(options.workers.is_none());
            assert!(!options.cancel.is_cancelled());
            assert!(options.worker_count() >= 1);
        }

        #[test]
        fn explicit_workers_win() {
            let options = VectorizeOptions::new(Strategy::Square).with_workers(NonZeroUsize::new(3));
            assert_eq!(options.worker_count(), 3);
        }
    }
}
