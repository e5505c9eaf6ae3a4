//! External cancellation signal

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cancel signal honored at stage boundaries only
///
/// An in-flight stage invocation is allowed to complete (or time out)
/// before the run transitions to its terminal state; cancellation never
/// aborts mid-transition, so a run is always in exactly one well-defined
/// stage.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a flag in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect at the next stage boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
