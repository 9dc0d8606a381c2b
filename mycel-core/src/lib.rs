//! Mycel core library.
//!
//! Foundational types for the mycel dataflow engine: a computation is a
//! directed graph (a *plasm*) of *cells* whose typed ports (*tendrils*) are
//! connected by FIFO *edges*; *strands* pin mutually-exclusive cells to a
//! single logical thread.
//!
//! # Key components
//!
//! - **[`Tendril`] / [`Tendrils`]**: typed value slots and the
//!   insertion-ordered port collections built from them
//! - **[`Cell`] / [`CellHost`]**: the author trait and the engine-facing
//!   host enforcing the life-cycle contract
//! - **[`Plasm`]**: the graph container with connectivity invariants and
//!   YAML topology persistence
//! - **[`Registry`]**: tag → factory table for cell types
//!
//! Scheduling lives in the `mycel-executor` crate; library cells in
//! `mycel-cells`.
//!
//! # Example
//!
//! ```
//! use mycel_core::prelude::*;
//!
//! #[derive(Default)]
//! struct Emit;
//!
//! impl Cell for Emit {
//!     fn declare_io(
//!         &self,
//!         _params: &Tendrils,
//!         _inputs: &mut Tendrils,
//!         outputs: &mut Tendrils,
//!     ) -> Result<()> {
//!         outputs.declare::<i64>("out", "the answer")?;
//!         Ok(())
//!     }
//!
//!     fn process(&mut self, _inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
//!         outputs.write("out", 42i64)?;
//!         Ok(ReturnCode::Ok)
//!     }
//! }
//!
//! let emit = CellHost::wrap_named::<Emit>("emit");
//! let plasm = Plasm::new();
//! plasm.insert(&emit);
//! plasm.configure_all().unwrap();
//! emit.process().unwrap();
//! assert_eq!(emit.output_value::<i64>("out").unwrap(), 42);
//! ```

pub mod cell;
pub mod codec;
pub mod definition;
pub mod edge;
pub mod error;
pub mod plasm;
pub mod prelude;
pub mod registry;
pub mod strand;
pub mod tendril;
pub mod tendrils;
pub mod types;

pub use cell::{Cell, CellHost, CellPtr, LifecyclePhase, ProcessStats, ReturnCode};
pub use definition::{CellDefinition, EdgeDefinition, PlasmDefinition};
pub use edge::{Edge, EdgePtr};
pub use error::{Error, Result, ResultExt};
pub use plasm::{Connection, Plasm, PlasmPtr};
pub use registry::Registry;
pub use strand::Strand;
pub use tendril::Tendril;
pub use tendrils::Tendrils;
pub use types::{Datum, TypeDesc};
