use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::TraverseError;
use crate::node::Node;

/// The output of a completed walk.
///
/// `errors` is opt-in: enable it with `.collect_errors(true)` on the builder.
#[derive(Debug)]
pub struct Results {
    /// How many times the callback fired, per node kind.
    pub invoked: Invocations,

    /// Walk statistics.
    pub stats: WalkStats,

    /// Recoverable errors met during the walk (permission denied, etc.).
    /// Only populated if `.collect_errors(true)` was set on the builder.
    pub errors: Vec<TraverseError>,

    /// `true` when the walk was stopped early by a skip-all signal.
    pub halted: bool,
}

/// Callback invocation counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Invocations {
    pub files: usize,
    pub directories: usize,
}

/// Statistics for a completed walk.
#[derive(Debug, Clone)]
pub struct WalkStats {
    /// Files visited (invoked or not).
    pub files: usize,

    /// Directories visited, root included.
    pub directories: usize,

    /// Wall-clock time from walk start to completion.
    pub duration: Duration,
}

/// Invocation counters ticked by the anchor.
///
/// Atomic so a caller may share them (through an `Arc`) with whatever drives
/// the guardian.
#[derive(Debug, Default)]
pub struct Metrics {
    files: AtomicUsize,
    directories: AtomicUsize,
}

impl Metrics {
    pub(crate) fn tick(&self, node: &Node) {
        let counter = if node.is_dir() {
            &self.directories
        } else {
            &self.files
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Invocations {
        Invocations {
            files: self.files.load(Ordering::Relaxed),
            directories: self.directories.load(Ordering::Relaxed),
        }
    }
}
