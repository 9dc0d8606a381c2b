//! Mycel executor.
//!
//! Drives a plasm's cells according to a scheduling policy:
//!
//! - [`SingleThreaded`] walks the topological order once per sweep
//! - [`Multithreaded`] runs ready cells on a worker pool, with at most one
//!   in-flight `process` per strand identity
//!
//! Both policies honor the cell return codes (OK publishes, BREAK/CONTINUE
//! suppress, QUIT terminates with success), wrap hook failures into
//! `CellFault`, and expose the control surface `stop` / `interrupt` /
//! `wait`. The [`execute`] free function selects the policy from the worker
//! count.
//!
//! # Example
//!
//! ```
//! use mycel_cells::register_standard_cells;
//! use mycel_core::prelude::*;
//! use std::sync::Arc;
//!
//! register_standard_cells();
//! let registry = Registry::global();
//!
//! let generate = registry.create_named("std::generate", "gen").unwrap();
//! generate.set_param("start", 1i64).unwrap();
//! let log = registry.create_named("std::log", "log").unwrap();
//!
//! let plasm = Arc::new(Plasm::new());
//! plasm.connect(&generate, "out", &log, "in").unwrap();
//!
//! mycel_executor::execute(&plasm, 3, 1).unwrap();
//! assert_eq!(generate.tick(), 3);
//! ```

pub mod config;
pub mod plan;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use plan::{ExecutionPlan, PlannedCell, StepOutcome};
pub use scheduler::{execute, Multithreaded, SingleThreaded};
