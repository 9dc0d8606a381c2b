//! Scheduling policies for plasm execution.
//!
//! Two policies are provided:
//! - [`SingleThreaded`]: one worker sweeping the topological order
//! - [`Multithreaded`]: a worker pool over a shared ready-set, respecting
//!   strand affinity
//!
//! Both drive the same per-cell step (bind → process → publish → consume)
//! from [`crate::plan`], and both run the full life cycle around a run:
//! configure_all, check, start every cell, execute, stop every cell.

mod multithreaded;
mod singlethreaded;

pub use multithreaded::Multithreaded;
pub use singlethreaded::SingleThreaded;

use crate::plan::ExecutionPlan;
use mycel_core::error::Result;
use mycel_core::plasm::{Plasm, PlasmPtr};

/// Configure, check, and plan a plasm for execution.
///
/// Also withdraws any cooperative stop left over from a previous run, so a
/// plasm can be executed repeatedly.
pub(crate) fn prepare(plasm: &Plasm) -> Result<ExecutionPlan> {
    plasm.configure_all()?;
    plasm.check()?;
    for cell in plasm.cells() {
        cell.request_stop(false);
    }
    ExecutionPlan::build(plasm)
}

/// Start every cell; on failure, stop the ones already started.
pub(crate) fn start_all(plan: &ExecutionPlan) -> Result<()> {
    let mut started = Vec::with_capacity(plan.len());
    for planned in plan.cells() {
        match planned.cell.start() {
            Ok(()) => started.push(&planned.cell),
            Err(e) => {
                for cell in started {
                    if let Err(stop_err) = cell.stop() {
                        tracing::warn!(cell = %cell.name(), error = %stop_err, "stop after failed start");
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Stop every cell, attempting all of them; the first failure wins.
pub(crate) fn stop_all(plan: &ExecutionPlan) -> Result<()> {
    let mut first_error = None;
    for planned in plan.cells() {
        if let Err(e) = planned.cell.stop() {
            tracing::warn!(cell = %planned.cell.name(), error = %e, "stop failed");
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Execute a plasm with the policy selected by `nthreads`.
///
/// `niter == 0` means unbounded; `nthreads <= 1` selects the single-threaded
/// iterative policy.
pub fn execute(plasm: &PlasmPtr, niter: usize, nthreads: usize) -> Result<()> {
    if nthreads <= 1 {
        SingleThreaded::new(plasm.clone()).execute(niter)
    } else {
        Multithreaded::new(plasm.clone()).execute(niter, nthreads)
    }
}
