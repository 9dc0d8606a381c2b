//! Convenience re-exports for cell authors and embedders.

pub use crate::cell::{Cell, CellHost, CellPtr, LifecyclePhase, ProcessStats, ReturnCode};
pub use crate::error::{Error, Result, ResultExt};
pub use crate::plasm::{Plasm, PlasmPtr};
pub use crate::registry::Registry;
pub use crate::strand::Strand;
pub use crate::tendril::Tendril;
pub use crate::tendrils::Tendrils;
pub use crate::types::{Datum, TypeDesc};
