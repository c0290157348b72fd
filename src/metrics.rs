//! Observability events for lookup operations.
//!
//! Components receive an `Arc<dyn MetricsSink>` at construction and report
//! every hit, upstream resolution, error and latency to it. Nothing here is
//! process-global, so tests can pass a recording sink and assert on it.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::time::Duration;
//! use word_cache::{ErrorStage, MetricsSink, Operation};
//!
//! #[derive(Default)]
//! struct HitCounter(AtomicU64);
//!
//! impl MetricsSink for HitCounter {
//!     fn record_hit(&self, _operation: Operation) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!     fn record_resolved(&self, _operation: Operation) {}
//!     fn record_error(&self, _operation: Operation, _stage: ErrorStage) {}
//!     fn record_latency(&self, _operation: Operation, _latency: Duration) {}
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// The user-facing operation an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Definition lookup for a caller-supplied word.
    Define,
    /// Random word followed by its definition lookup.
    Random,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Define => "define",
            Operation::Random => "random",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which collaborator call an error event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStage {
    /// Cache read failed and was treated as a miss.
    CacheRead,
    /// Cache write failed after a successful upstream fetch.
    CacheWrite,
    /// The upstream provider failed.
    Upstream,
}

impl ErrorStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStage::CacheRead => "cache_read",
            ErrorStage::CacheWrite => "cache_write",
            ErrorStage::Upstream => "upstream",
        }
    }
}

impl fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for receiving lookup events.
///
/// These are called synchronously in the hot path of every lookup.
/// Implementations should be fast (e.g., bump counters or buffer in memory).
pub trait MetricsSink: Send + Sync {
    /// A definition was served from the cache.
    fn record_hit(&self, operation: Operation);

    /// A definition was fetched from upstream.
    fn record_resolved(&self, operation: Operation);

    /// A collaborator call failed. Cache errors do not necessarily fail the
    /// operation.
    fn record_error(&self, operation: Operation, stage: ErrorStage);

    /// Total time spent in one operation, successful or not.
    fn record_latency(&self, operation: Operation, latency: Duration);
}

/// Sink that reports events as `tracing` events under the `word_cache::metrics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MetricsSink for TracingSink {
    fn record_hit(&self, operation: Operation) {
        tracing::debug!(target: "word_cache::metrics", operation = %operation, "cache hit");
    }

    fn record_resolved(&self, operation: Operation) {
        tracing::debug!(target: "word_cache::metrics", operation = %operation, "upstream resolved");
    }

    fn record_error(&self, operation: Operation, stage: ErrorStage) {
        tracing::info!(
            target: "word_cache::metrics",
            operation = %operation,
            stage = %stage,
            "lookup error"
        );
    }

    fn record_latency(&self, operation: Operation, latency: Duration) {
        tracing::debug!(
            target: "word_cache::metrics",
            operation = %operation,
            latency_ms = latency.as_secs_f64() * 1000.0,
            "lookup latency"
        );
    }
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record_hit(&self, _operation: Operation) {}

    fn record_resolved(&self, _operation: Operation) {}

    fn record_error(&self, _operation: Operation, _stage: ErrorStage) {}

    fn record_latency(&self, _operation: Operation, _latency: Duration) {}
}
