//! The strand-respecting multi-threaded policy.
//!
//! N workers share a coordinator holding the ready-set. A cell is ready iff
//! every incoming edge has a value, every outgoing edge is below the
//! single-slot window, it is not already in flight, and its tick budget
//! remains. Strand affinity is enforced at dispatch: at most one in-flight
//! `process` per strand identity, FIFO on ready time.
//!
//! A bounded run finishes when every cell has spent its budget or the graph
//! quiesces (nothing ready, nothing in flight).

use super::{prepare, start_all, stop_all};
use crate::config::SchedulerConfig;
use crate::plan::{step_cell, ExecutionPlan, StepOutcome};
use mycel_core::cell::ReturnCode;
use mycel_core::error::{Error, Result};
use mycel_core::plasm::PlasmPtr;
use parking_lot::{Condvar, Mutex};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// The multi-threaded scheduler.
pub struct Multithreaded {
    plasm: PlasmPtr,
    config: SchedulerConfig,
    interrupted: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<Result<()>>>>,
}

impl Multithreaded {
    /// A scheduler over the given plasm with default configuration.
    #[must_use]
    pub fn new(plasm: PlasmPtr) -> Self {
        Self::with_config(plasm, SchedulerConfig::default())
    }

    /// A scheduler with an explicit configuration (edge window).
    #[must_use]
    pub fn with_config(plasm: PlasmPtr, config: SchedulerConfig) -> Self {
        Self {
            plasm,
            config,
            interrupted: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    /// The plasm this scheduler drives.
    #[must_use]
    pub fn plasm(&self) -> &PlasmPtr {
        &self.plasm
    }

    /// Execute with `nthreads` workers until every cell has run `niter`
    /// times (0 = unbounded), the graph quiesces, or a cell returns QUIT.
    pub fn execute(&self, niter: usize, nthreads: usize) -> Result<()> {
        if self.interrupted.load(Ordering::SeqCst) {
            return Err(Error::Cancelled);
        }
        let plan = prepare(&self.plasm)?;
        start_all(&plan)?;
        let nthreads = nthreads.max(1);
        tracing::debug!(
            cells = plan.len(),
            niter,
            nthreads,
            window = self.config.edge_window,
            "multi-threaded run starting"
        );

        let coordinator = Coordinator::new(
            &plan,
            niter,
            self.config.edge_window,
            Arc::clone(&self.interrupted),
        );
        std::thread::scope(|scope| {
            for _ in 0..nthreads {
                scope.spawn(|| coordinator.run_worker(&plan));
            }
        });

        let run_result = coordinator.into_result();
        let stop_result = stop_all(&plan);
        run_result.and(stop_result)
    }

    /// Execute using the configured worker count.
    pub fn execute_configured(&self, niter: usize) -> Result<()> {
        self.execute(niter, self.config.nthreads)
    }

    /// Execute in a background thread; collect the result with [`wait`].
    ///
    /// [`wait`]: Multithreaded::wait
    pub fn execute_async(self: &Arc<Self>, niter: usize, nthreads: usize) {
        let this = Arc::clone(self);
        let handle = std::thread::spawn(move || this.execute(niter, nthreads));
        *self.handle.lock() = Some(handle);
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

struct MtState {
    running: Vec<bool>,
    ticks: Vec<u64>,
    ready_seq: Vec<Option<u64>>,
    next_seq: u64,
    busy_strands: HashSet<usize>,
    in_flight: usize,
    quit: bool,
    done: bool,
    failure: Option<Error>,
}

struct Coordinator {
    state: Mutex<MtState>,
    workers_idle: Condvar,
    niter: usize,
    window: usize,
    interrupted: Arc<AtomicBool>,
}

impl Coordinator {
    fn new(plan: &ExecutionPlan, niter: usize, window: usize, interrupted: Arc<AtomicBool>) -> Self {
        let n = plan.len();
        let coordinator = Self {
            state: Mutex::new(MtState {
                running: vec![false; n],
                ticks: vec![0; n],
                ready_seq: vec![None; n],
                next_seq: 0,
                busy_strands: HashSet::new(),
                in_flight: 0,
                quit: false,
                done: false,
                failure: None,
            }),
            workers_idle: Condvar::new(),
            niter,
            window,
            interrupted,
        };
        coordinator.refresh(&mut coordinator.state.lock(), plan);
        coordinator
    }

    fn base_ready(&self, state: &MtState, plan: &ExecutionPlan, idx: usize) -> bool {
        if state.running[idx] {
            return false;
        }
        if self.niter != 0 && state.ticks[idx] >= self.niter as u64 {
            return false;
        }
        let planned = plan.get(idx);
        if planned.cell.stop_requested() {
            return false;
        }
        planned.in_edges.iter().all(|e| !e.is_empty())
            && planned.out_edges.iter().all(|e| e.len() < self.window)
    }

    /// Stamp cells that just became ready; clear cells that no longer are.
    /// The stamp is what gives FIFO-on-ready-time order within a strand.
    fn refresh(&self, state: &mut MtState, plan: &ExecutionPlan) {
        for idx in 0..plan.len() {
            if self.base_ready(state, plan, idx) {
                if state.ready_seq[idx].is_none() {
                    state.ready_seq[idx] = Some(state.next_seq);
                    state.next_seq += 1;
                }
            } else {
                state.ready_seq[idx] = None;
            }
        }
    }

    fn pick(&self, state: &MtState, plan: &ExecutionPlan) -> Option<usize> {
        (0..plan.len())
            .filter(|&idx| state.ready_seq[idx].is_some())
            .filter(|&idx| {
                plan.get(idx)
                    .strand
                    .as_ref()
                    .map_or(true, |s| !state.busy_strands.contains(&s.id()))
            })
            .min_by_key(|&idx| state.ready_seq[idx])
    }

    fn run_worker(&self, plan: &ExecutionPlan) {
        loop {
            let idx = {
                let mut state = self.state.lock();
                loop {
                    if state.done
                        || state.quit
                        || state.failure.is_some()
                        || self.interrupted.load(Ordering::SeqCst)
                    {
                        state.done = true;
                        self.workers_idle.notify_all();
                        return;
                    }
                    if let Some(idx) = self.pick(&state, plan) {
                        state.running[idx] = true;
                        state.ready_seq[idx] = None;
                        if let Some(strand) = &plan.get(idx).strand {
                            state.busy_strands.insert(strand.id());
                        }
                        state.in_flight += 1;
                        break idx;
                    }
                    if state.in_flight == 0 {
                        // Quiescent: nothing ready, nothing running.
                        state.done = true;
                        self.workers_idle.notify_all();
                        return;
                    }
                    self.workers_idle.wait(&mut state);
                }
            };

            let outcome = step_cell(plan.get(idx));

            let mut state = self.state.lock();
            state.running[idx] = false;
            if let Some(strand) = &plan.get(idx).strand {
                state.busy_strands.remove(&strand.id());
            }
            state.in_flight -= 1;
            match outcome {
                Err(e) => {
                    state.failure.get_or_insert(e);
                }
                Ok(StepOutcome::Unready) => {}
                Ok(StepOutcome::Ran(code)) => {
                    state.ticks[idx] += 1;
                    if code == ReturnCode::Quit {
                        tracing::debug!(cell = %plan.get(idx).cell.name(), "QUIT");
                        state.quit = true;
                    }
                }
            }
            self.refresh(&mut state, plan);
            self.workers_idle.notify_all();
        }
    }

    fn into_result(self) -> Result<()> {
        match self.state.into_inner().failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
