//! Identifier generation
//!
//! Shapes are identified by a monotonically increasing number handed out by
//! an [`IdGenerator`]. Generators are ordinary values owned by whoever builds
//! shapes (see [`crate::physics::ShapeFactory`]), but every generator draws
//! from one process-wide counter, so identifiers never repeat across worlds,
//! factories or threads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide shape id source shared by every generator.
static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique, immutable identifier of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(u64);

impl ShapeId {
    /// Raw numeric value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Thread-safe monotonically increasing id source. Never reuses a value,
/// including values handed out by other generators.
#[derive(Debug)]
pub struct IdGenerator {
    issued: AtomicU64,
}

impl IdGenerator {
    /// Create a generator that has issued nothing yet
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
        }
    }

    /// Hand out the next identifier
    pub fn next_id(&self) -> ShapeId {
        self.issued.fetch_add(1, Ordering::Relaxed);
        ShapeId(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of identifiers this generator has handed out
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
