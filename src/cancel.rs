use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{PixvError, PixvResult};

/// Cooperative cancellation signal shared between the caller and the workers.
///
/// Clones observe the same flag, so the caller keeps one handle and passes
/// another into [`VectorizeOptions`](crate::VectorizeOptions).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Returns `Err(Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> PixvResult<()> {
        if self.is_cancelled() {
            Err(PixvError::Cancelled)
        } else {
            Ok(())
        }
    }
}
