//! Thread-affinity tokens for mutual exclusion groups.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// An opaque affinity token identifying a single-threaded execution domain.
///
/// Equality is by identity: two handles are equal iff they were cloned from
/// the same original. Cells sharing a strand never have `process` calls in
/// flight at the same time, regardless of how many scheduler workers exist.
#[derive(Clone)]
pub struct Strand {
    token: Arc<()>,
}

impl Strand {
    /// A fresh strand identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: Arc::new(()),
        }
    }

    /// The process-wide strand assigned to cells whose implementation is not
    /// marked thread-safe.
    #[must_use]
    pub fn process_default() -> Self {
        static DEFAULT: OnceLock<Strand> = OnceLock::new();
        DEFAULT.get_or_init(Strand::new).clone()
    }

    /// A stable identifier for this strand's identity.
    #[must_use]
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.token) as usize
    }
}

impl Default for Strand {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Strand {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.token, &other.token)
    }
}

impl Eq for Strand {}

impl Hash for Strand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strand({:#x})", self.id())
    }
}
