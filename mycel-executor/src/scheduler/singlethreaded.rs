//! The single-threaded iterative policy.

use super::{prepare, start_all, stop_all};
use crate::plan::{step_cell, ExecutionPlan, StepOutcome};
use mycel_core::cell::ReturnCode;
use mycel_core::error::{Error, Result};
use mycel_core::plasm::PlasmPtr;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// One worker; per iteration, one sweep over the topological order.
///
/// Unready cells (an incoming edge is empty) are skipped for the sweep.
/// BREAK and CONTINUE end the current sweep; QUIT ends the run with success.
pub struct SingleThreaded {
    plasm: PlasmPtr,
    interrupted: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<Result<()>>>>,
}

impl SingleThreaded {
    /// A scheduler over the given plasm.
    #[must_use]
    pub fn new(plasm: PlasmPtr) -> Self {
        Self {
            plasm,
            interrupted: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    /// The plasm this scheduler drives.
    #[must_use]
    pub fn plasm(&self) -> &PlasmPtr {
        &self.plasm
    }

    /// Execute `niter` sweeps (0 = unbounded) on the calling thread.
    ///
    /// Fails with [`Error::Cancelled`] if the scheduler was interrupted.
    pub fn execute(&self, niter: usize) -> Result<()> {
        if self.interrupted.load(Ordering::SeqCst) {
            return Err(Error::Cancelled);
        }
        let plan = prepare(&self.plasm)?;
        start_all(&plan)?;
        tracing::debug!(cells = plan.len(), niter, "single-threaded run starting");
        let run_result = self.run(&plan, niter);
        let stop_result = stop_all(&plan);
        run_result.and(stop_result)
    }

    /// Execute in a background thread; collect the result with [`wait`].
    ///
    /// [`wait`]: SingleThreaded::wait
    pub fn execute_async(self: &Arc<Self>, niter: usize) {
        let this = Arc::clone(self);
        let handle = std::thread::spawn(move || this.execute(niter));
        *self.handle.lock() = Some(handle);
    }

    fn run(&self, plan: &ExecutionPlan, niter: usize) -> Result<()> {
        let mut sweep = 0usize;
        'run: loop {
            if niter != 0 && sweep >= niter {
                break;
            }
            if self.interrupted.load(Ordering::SeqCst) {
                break;
            }
            // A full cooperative stop ends the run at a sweep boundary.
            if plan.cells().iter().all(|p| p.cell.stop_requested()) {
                break;
            }
            for planned in plan.cells() {
                if self.interrupted.load(Ordering::SeqCst) {
                    break 'run;
                }
                if planned.cell.stop_requested() {
                    continue;
                }
                match step_cell(planned)? {
                    StepOutcome::Unready => {}
                    StepOutcome::Ran(ReturnCode::Ok) => {}
                    StepOutcome::Ran(ReturnCode::Break) => {
                        // Abort the rest of this sweep.
                        break;
                    }
                    StepOutcome::Ran(ReturnCode::Continue) => {
                        // Skip the remaining cells, move on to the next sweep.
                        break;
                    }
                    StepOutcome::Ran(ReturnCode::Quit) => {
                        tracing::debug!(cell = %planned.cell.name(), sweep, "QUIT");
                        return Ok(());
                    }
                }
            }
            sweep += 1;
        }
        Ok(())
    }

    /// Cooperative stop: set `stop_requested` on every cell.
    pub fn stop(&self) {
        for cell in self.plasm.cells() {
            cell.request_stop(true);
        }
    }

    /// Prompt stop: no further `process` calls are initiated; in-flight
    /// calls run to completion. Subsequent executes fail with `Cancelled`.
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    /// Block until a background execution finishes and return its result.
    pub fn wait(&self) -> Result<()> {
        let handle = self.handle.lock().take();
        match handle {
            Some(handle) => handle.join().map_err(|_| Error::CellFault {
                cell: "<scheduler>".to_string(),
                phase: "execute",
                kind: "panic".to_string(),
                message: "scheduler thread panicked".to_string(),
            })?,
            None => Ok(()),
        }
    }
}
