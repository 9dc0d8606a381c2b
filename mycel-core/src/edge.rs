//! The typed FIFO connecting one output port to one input port.

use crate::error::{Error, Result};
use crate::types::{Datum, TypeDesc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Shared handle to an [`Edge`].
pub type EdgePtr = Arc<Edge>;

/// A bounded-in-spirit FIFO of transported values.
///
/// The queue itself grows without bound; a bound (the single-slot window) is
/// enforced by the multi-threaded scheduler's readiness predicate, not here.
/// Push and pop are single-producer/single-consumer: one source port feeds
/// one sink port.
#[derive(Debug)]
pub struct Edge {
    queue: Mutex<VecDeque<Datum>>,
    desc: TypeDesc,
    from_port: String,
    to_port: String,
}

impl Edge {
    /// A new empty edge carrying `desc`-typed values between the named ports.
    #[must_use]
    pub fn new(desc: TypeDesc, from_port: impl Into<String>, to_port: impl Into<String>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            desc,
            from_port: from_port.into(),
            to_port: to_port.into(),
        }
    }

    /// The element type transported by this edge.
    #[must_use]
    pub fn desc(&self) -> TypeDesc {
        self.desc
    }

    /// The source port name.
    #[must_use]
    pub fn from_port(&self) -> &str {
        &self.from_port
    }

    /// The sink port name.
    #[must_use]
    pub fn to_port(&self) -> &str {
        &self.to_port
    }

    /// Append a value.
    pub fn push(&self, datum: Datum) -> Result<()> {
        if !self.desc.compatible(&datum.desc()) {
            return Err(Error::TypeMismatch {
                name: format!("{}->{}", self.from_port, self.to_port),
                expected: self.desc.name().to_string(),
                actual: datum.desc().name().to_string(),
            });
        }
        self.queue.lock().push_back(datum);
        Ok(())
    }

    /// Remove and return the head.
    pub fn pop_front(&self) -> Result<Datum> {
        self.queue.lock().pop_front().ok_or(Error::EmptyEdge)
    }

    /// Clone the head without removing it, if any.
    #[must_use]
    pub fn front_cloned(&self) -> Option<Datum> {
        self.queue.lock().front().cloned()
    }

    /// Number of values in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Whether no values are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Drop all values in flight.
    pub fn clear(&self) {
        self.queue.lock().clear();
    }
}
