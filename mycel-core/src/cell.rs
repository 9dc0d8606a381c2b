//! The cell abstraction: author trait, life-cycle contract, and host.
//!
//! A cell author implements [`Cell`]; every hook is optional. The engine
//! never touches the implementation directly: it goes through [`CellHost`],
//! which owns the tendrils collections, enforces the life-cycle state
//! machine, serializes `process` calls, collects statistics, and wraps hook
//! failures (including panics) into [`Error::CellFault`].

use crate::error::{Error, Result, ResultExt};
use crate::strand::Strand;
use crate::tendrils::Tendrils;
use crate::types::{Datum, TypeDesc};
use parking_lot::Mutex;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Control-flow signal returned by [`Cell::process`].
///
/// These are not errors; the scheduler's main loop pattern-matches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    /// Outputs may be published; advance normally.
    Ok,
    /// Terminate the scheduler run with success.
    Quit,
    /// Abort the current sweep; do not publish this call's outputs.
    Break,
    /// Skip the remaining cells in the current sweep; start the next one.
    Continue,
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "OK",
            Self::Quit => "QUIT",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
        };
        f.write_str(s)
    }
}

/// Where a cell is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecyclePhase {
    /// Freshly constructed; nothing declared.
    Created,
    /// Parameters declared, defaults in place.
    ParamsDeclared,
    /// Inputs and outputs declared.
    IoDeclared,
    /// Configured; `process` may run.
    Configured,
    /// Between `start` and `stop`.
    Running,
    /// Stopped after a run; may be started again.
    Stopped,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::ParamsDeclared => "params-declared",
            Self::IoDeclared => "io-declared",
            Self::Configured => "configured",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Execution statistics maintained per cell.
#[derive(Debug, Clone, Default)]
pub struct ProcessStats {
    /// Completed `process` calls.
    pub ncalls: u64,
    /// True while a `process` call is in flight.
    pub on: bool,
    /// Accumulated time spent inside `process`.
    pub total_time: Duration,
    /// Duration of the most recent `process` call.
    pub last_time: Duration,
}

/// The capability set a cell implementation may provide.
///
/// Every hook has a default no-op implementation, so a cell implements only
/// what it needs. A unit struct with a bare `process` is a complete cell.
///
/// ```
/// use mycel_core::prelude::*;
///
/// #[derive(Default)]
/// struct Doubler;
///
/// impl Cell for Doubler {
///     fn declare_io(
///         &self,
///         _params: &Tendrils,
///         inputs: &mut Tendrils,
///         outputs: &mut Tendrils,
///     ) -> Result<()> {
///         inputs.declare::<i64>("in", "value to double")?;
///         outputs.declare::<i64>("out", "doubled value")?;
///         Ok(())
///     }
///
///     fn process(&mut self, inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
///         let v = *inputs.read::<i64>("in")?;
///         outputs.write("out", v * 2)?;
///         Ok(ReturnCode::Ok)
///     }
/// }
/// ```
pub trait Cell: Send {
    /// Declare parameters by name, type, doc, default, and required flag.
    fn declare_params(&self, _params: &mut Tendrils) -> Result<()> {
        Ok(())
    }

    /// Declare typed input and output ports; parameters already carry their
    /// defaults and any user-supplied values.
    fn declare_io(
        &self,
        _params: &Tendrils,
        _inputs: &mut Tendrils,
        _outputs: &mut Tendrils,
    ) -> Result<()> {
        Ok(())
    }

    /// One-time configuration after port declaration, before any `process`.
    fn configure(
        &mut self,
        _params: &Tendrils,
        _inputs: &Tendrils,
        _outputs: &Tendrils,
    ) -> Result<()> {
        Ok(())
    }

    /// One execution step. Read bound inputs, write outputs, return a
    /// [`ReturnCode`].
    fn process(&mut self, _inputs: &Tendrils, _outputs: &mut Tendrils) -> Result<ReturnCode> {
        Ok(ReturnCode::Ok)
    }

    /// The scheduler is about to call `process` zero or more times.
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// The scheduler will not call `process` for a while.
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether multiple instances may execute concurrently without a strand.
    ///
    /// Implementations that are not thread-safe are assigned the process-wide
    /// default strand at construction.
    fn thread_safe(&self) -> bool {
        false
    }

    /// One-line description of the cell.
    fn short_doc(&self) -> &str {
        ""
    }
}

/// Shared handle to a hosted cell.
pub type CellPtr = Arc<CellHost>;

struct HostState {
    cell: Box<dyn Cell>,
    type_tag: String,
    instance_name: Option<String>,
    params: Tendrils,
    inputs: Tendrils,
    outputs: Tendrils,
    strand: Option<Strand>,
    stats: ProcessStats,
    phase: LifecyclePhase,
    stop_requested: bool,
    tick: u64,
}

/// The engine-facing wrapper around a cell implementation.
///
/// Owns the parameter/input/output tendrils and the life-cycle state. All
/// access is serialized through one mutex, which is also what makes
/// `process` serial per cell.
pub struct CellHost {
    state: Mutex<HostState>,
    factory: fn() -> Box<dyn Cell>,
}

impl CellHost {
    /// Host a fresh instance of `C`.
    ///
    /// If `C` is not thread-safe, the process-wide default strand is assigned
    /// here, so that no scheduler can ever run two such cells concurrently.
    #[must_use]
    pub fn wrap<C: Cell + Default + 'static>() -> CellPtr {
        let cell = C::default();
        let strand = if cell.thread_safe() {
            None
        } else {
            Some(Strand::process_default())
        };
        Arc::new(Self {
            state: Mutex::new(HostState {
                cell: Box::new(cell),
                type_tag: short_type_name(std::any::type_name::<C>()),
                instance_name: None,
                params: Tendrils::new(),
                inputs: Tendrils::new(),
                outputs: Tendrils::new(),
                strand,
                stats: ProcessStats::default(),
                phase: LifecyclePhase::Created,
                stop_requested: false,
                tick: 0,
            }),
            factory: || Box::new(C::default()),
        })
    }

    /// Host a fresh instance of `C` with an instance name.
    #[must_use]
    pub fn wrap_named<C: Cell + Default + 'static>(name: impl Into<String>) -> CellPtr {
        let host = Self::wrap::<C>();
        host.set_name(name);
        host
    }

    fn fallback_name(&self) -> String {
        format!("{:p}", self as *const Self)
    }

    /// The instance name, or an address-like token if none was given.
    #[must_use]
    pub fn name(&self) -> String {
        self.state
            .lock()
            .instance_name
            .clone()
            .unwrap_or_else(|| self.fallback_name())
    }

    /// Set the instance name.
    pub fn set_name(&self, name: impl Into<String>) {
        self.state.lock().instance_name = Some(name.into());
    }

    /// The concrete type tag: the Rust type name, or the registry tag for
    /// registry-created cells.
    #[must_use]
    pub fn type_tag(&self) -> String {
        self.state.lock().type_tag.clone()
    }

    pub(crate) fn set_type_tag(&self, tag: &str) {
        self.state.lock().type_tag = tag.to_string();
    }

    /// One-line description from the implementation.
    #[must_use]
    pub fn short_doc(&self) -> String {
        self.state.lock().cell.short_doc().to_string()
    }

    /// The strand this cell is affine to, if any.
    #[must_use]
    pub fn strand(&self) -> Option<Strand> {
        self.state.lock().strand.clone()
    }

    /// Pin the cell to a strand.
    pub fn set_strand(&self, strand: Strand) {
        self.state.lock().strand = Some(strand);
    }

    /// Remove any strand affinity.
    pub fn reset_strand(&self) {
        self.state.lock().strand = None;
    }

    /// The life-cycle phase.
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        self.state.lock().phase
    }

    /// Monotonic count of `process` invocations.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.state.lock().tick
    }

    /// Zero the tick counter.
    pub fn reset_tick(&self) {
        self.state.lock().tick = 0;
    }

    /// Snapshot of the execution statistics.
    #[must_use]
    pub fn stats(&self) -> ProcessStats {
        self.state.lock().stats.clone()
    }

    /// Whether a cooperative stop has been requested.
    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.state.lock().stop_requested
    }

    /// Request (or withdraw) a cooperative stop.
    pub fn request_stop(&self, requested: bool) {
        self.state.lock().stop_requested = requested;
    }

    /// A fresh, unconfigured host of the same concrete type.
    ///
    /// The clone shares no parameters, tendrils, or statistics and must go
    /// through the life cycle anew.
    #[must_use]
    pub fn clone_cell(&self) -> CellPtr {
        let state = self.state.lock();
        let cell = (self.factory)();
        let strand = if cell.thread_safe() {
            None
        } else {
            Some(Strand::process_default())
        };
        Arc::new(Self {
            state: Mutex::new(HostState {
                cell,
                type_tag: state.type_tag.clone(),
                instance_name: None,
                params: Tendrils::new(),
                inputs: Tendrils::new(),
                outputs: Tendrils::new(),
                strand,
                stats: ProcessStats::default(),
                phase: LifecyclePhase::Created,
                stop_requested: false,
                tick: 0,
            }),
            factory: self.factory,
        })
    }

    fn name_of(&self, state: &HostState) -> String {
        state
            .instance_name
            .clone()
            .unwrap_or_else(|| self.fallback_name())
    }

    fn fault(&self, state: &HostState, phase: &'static str, err: Error) -> Error {
        match err {
            already @ Error::CellFault { .. } => already,
            other => Error::CellFault {
                cell: self.name_of(state),
                phase,
                kind: other.kind().to_string(),
                message: other.to_string(),
            },
        }
    }

    fn panic_fault(&self, state: &HostState, phase: &'static str, payload: Box<dyn std::any::Any + Send>) -> Error {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "(non-string panic payload)".to_string());
        Error::CellFault {
            cell: self.name_of(state),
            phase,
            kind: "panic".to_string(),
            message,
        }
    }

    fn expect_phase(
        &self,
        state: &HostState,
        attempted: &'static str,
        allowed: &[LifecyclePhase],
    ) -> Result<()> {
        if allowed.contains(&state.phase) {
            Ok(())
        } else {
            Err(Error::LifecycleViolation {
                cell: self.name_of(state),
                attempted,
                phase: state.phase,
            })
        }
    }

    /// Dispatch the parameter declaration hook. Created → ParamsDeclared.
    pub fn declare_params(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.expect_phase(&state, "declare_params", &[LifecyclePhase::Created])?;
        let HostState { cell, params, .. } = &mut *state;
        let outcome = catch_unwind(AssertUnwindSafe(|| cell.declare_params(params)));
        match outcome {
            Ok(Ok(())) => {
                state.phase = LifecyclePhase::ParamsDeclared;
                Ok(())
            }
            Ok(Err(e)) => Err(self.fault(&state, "declare_params", e)),
            Err(payload) => Err(self.panic_fault(&state, "declare_params", payload)),
        }
    }

    /// Dispatch the I/O declaration hook. ParamsDeclared → IoDeclared.
    pub fn declare_io(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.expect_phase(&state, "declare_io", &[LifecyclePhase::ParamsDeclared])?;
        let HostState {
            cell,
            params,
            inputs,
            outputs,
            ..
        } = &mut *state;
        let outcome = catch_unwind(AssertUnwindSafe(|| cell.declare_io(params, inputs, outputs)));
        match outcome {
            Ok(Ok(())) => {
                state.phase = LifecyclePhase::IoDeclared;
                Ok(())
            }
            Ok(Err(e)) => Err(self.fault(&state, "declare_io", e)),
            Err(payload) => Err(self.panic_fault(&state, "declare_io", payload)),
        }
    }

    /// Dispatch the configuration hook. IoDeclared → Configured.
    ///
    /// Required parameters with neither a value nor a default fail here,
    /// before the implementation sees anything.
    pub fn configure(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.expect_phase(&state, "configure", &[LifecyclePhase::IoDeclared])?;
        for (name, tendril) in state.params.iter() {
            if tendril.is_required() && !tendril.has_value() {
                let cell = self.name_of(&state);
                return Err(Error::NotSet {
                    name: format!("{cell}.{name}"),
                });
            }
        }
        let HostState {
            cell,
            params,
            inputs,
            outputs,
            ..
        } = &mut *state;
        let outcome = catch_unwind(AssertUnwindSafe(|| cell.configure(params, inputs, outputs)));
        match outcome {
            Ok(Ok(())) => {
                state.phase = LifecyclePhase::Configured;
                Ok(())
            }
            Ok(Err(e)) => Err(self.fault(&state, "configure", e)),
            Err(payload) => Err(self.panic_fault(&state, "configure", payload)),
        }
    }

    /// Run any pending declare transitions (no-op once I/O is declared).
    pub fn ensure_declared(&self) -> Result<()> {
        if self.phase() == LifecyclePhase::Created {
            self.declare_params()?;
        }
        if self.phase() == LifecyclePhase::ParamsDeclared {
            self.declare_io()?;
        }
        Ok(())
    }

    /// Run all pending transitions up to and including `configure`.
    pub fn setup(&self) -> Result<()> {
        self.ensure_declared()?;
        if self.phase() == LifecyclePhase::IoDeclared {
            self.configure()?;
        }
        Ok(())
    }

    /// Dispatch the start hook. Configured|Stopped → Running.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.expect_phase(
            &state,
            "start",
            &[LifecyclePhase::Configured, LifecyclePhase::Stopped],
        )?;
        let outcome = catch_unwind(AssertUnwindSafe(|| state.cell.start()));
        match outcome {
            Ok(Ok(())) => {
                state.phase = LifecyclePhase::Running;
                Ok(())
            }
            Ok(Err(e)) => Err(self.fault(&state, "start", e)),
            Err(payload) => Err(self.panic_fault(&state, "start", payload)),
        }
    }

    /// Dispatch the stop hook. Running → Stopped.
    pub fn stop(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.expect_phase(&state, "stop", &[LifecyclePhase::Running])?;
        let outcome = catch_unwind(AssertUnwindSafe(|| state.cell.stop()));
        match outcome {
            Ok(Ok(())) => {
                state.phase = LifecyclePhase::Stopped;
                Ok(())
            }
            Ok(Err(e)) => Err(self.fault(&state, "stop", e)),
            Err(payload) => Err(self.panic_fault(&state, "stop", payload)),
        }
    }

    /// Dispatch one `process` call.
    ///
    /// Serial per cell by construction (the host mutex is held for the whole
    /// call). Updates tick and statistics; wraps failures into `CellFault`.
    pub fn process(&self) -> Result<ReturnCode> {
        let mut state = self.state.lock();
        self.expect_phase(
            &state,
            "process",
            &[LifecyclePhase::Configured, LifecyclePhase::Running],
        )?;
        state.stats.on = true;
        let started = Instant::now();
        let HostState {
            cell,
            inputs,
            outputs,
            ..
        } = &mut *state;
        let outcome = catch_unwind(AssertUnwindSafe(|| cell.process(inputs, outputs)));
        let elapsed = started.elapsed();
        state.stats.on = false;
        state.stats.ncalls += 1;
        state.stats.last_time = elapsed;
        state.stats.total_time += elapsed;
        state.tick += 1;
        match outcome {
            Ok(Ok(code)) => Ok(code),
            Ok(Err(e)) => Err(self.fault(&state, "process", e)),
            Err(payload) => Err(self.panic_fault(&state, "process", payload)),
        }
    }

    /// Read-write access to the parameter tendrils.
    pub fn with_params<R>(&self, f: impl FnOnce(&mut Tendrils) -> R) -> R {
        f(&mut self.state.lock().params)
    }

    /// Read-write access to the input tendrils.
    pub fn with_inputs<R>(&self, f: impl FnOnce(&mut Tendrils) -> R) -> R {
        f(&mut self.state.lock().inputs)
    }

    /// Read-write access to the output tendrils.
    pub fn with_outputs<R>(&self, f: impl FnOnce(&mut Tendrils) -> R) -> R {
        f(&mut self.state.lock().outputs)
    }

    /// Set a parameter value.
    pub fn set_param<T: Clone + Send + Sync + 'static>(&self, name: &str, value: T) -> Result<()> {
        let mut state = self.state.lock();
        let cell = self.name_of(&state);
        state.params.write(name, value).with_cell(&cell)
    }

    /// Read a parameter value.
    pub fn param<T: Clone + 'static>(&self, name: &str) -> Result<T> {
        let state = self.state.lock();
        let cell = self.name_of(&state);
        state.params.read::<T>(name).cloned().with_cell(&cell)
    }

    /// The declared type of an input port.
    pub fn input_desc(&self, port: &str) -> Result<TypeDesc> {
        let state = self.state.lock();
        let cell = self.name_of(&state);
        state.inputs.desc(port).with_cell(&cell)
    }

    /// The declared type of an output port.
    pub fn output_desc(&self, port: &str) -> Result<TypeDesc> {
        let state = self.state.lock();
        let cell = self.name_of(&state);
        state.outputs.desc(port).with_cell(&cell)
    }

    /// Bind a transported value into an input port (scheduler side).
    pub fn write_input(&self, port: &str, datum: Datum) -> Result<()> {
        let mut state = self.state.lock();
        let cell = self.name_of(&state);
        state.inputs.get_mut(port).with_cell(&cell)?.write(datum)
    }

    /// Reset an input port's dirty bit after its value has been consumed
    /// (scheduler side).
    pub fn clear_input_dirty(&self, port: &str) -> Result<()> {
        let mut state = self.state.lock();
        let cell = self.name_of(&state);
        state.inputs.get_mut(port).with_cell(&cell)?.clear_dirty();
        Ok(())
    }

    /// Clone an output port's current value for transport (scheduler side).
    pub fn read_output(&self, port: &str) -> Result<Datum> {
        let state = self.state.lock();
        let cell = self.name_of(&state);
        state.outputs.get(port).with_cell(&cell)?.sample().with_cell(&cell)
    }

    /// Typed read of an output port's current value (diagnostics, tests).
    pub fn output_value<T: Clone + 'static>(&self, port: &str) -> Result<T> {
        let state = self.state.lock();
        let cell = self.name_of(&state);
        state.outputs.read::<T>(port).cloned().with_cell(&cell)
    }

    /// Typed read of an input port's current value (diagnostics, tests).
    pub fn input_value<T: Clone + 'static>(&self, port: &str) -> Result<T> {
        let state = self.state.lock();
        let cell = self.name_of(&state);
        state.inputs.read::<T>(port).cloned().with_cell(&cell)
    }
}

impl fmt::Debug for CellHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CellHost")
            .field("type", &state.type_tag)
            .field("name", &self.name_of(&state))
            .field("phase", &state.phase)
            .field("tick", &state.tick)
            .finish()
    }
}

/// Strip module paths from a Rust type name, keeping generic arguments
/// readable: `mycel_cells::sources::Generate` → `Generate`.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            '<' | '>' | ',' | ' ' => {
                out.push_str(&segment);
                segment.clear();
                out.push(ch);
            }
            ':' => segment.clear(),
            _ => segment.push(ch),
        }
    }
    out.push_str(&segment);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Doubler;

    impl Cell for Doubler {
        fn declare_params(&self, params: &mut Tendrils) -> Result<()> {
            params.declare_tendril("gain", crate::tendril::Tendril::typed::<i64>("multiplier").with_default(2i64))?;
            Ok(())
        }

        fn declare_io(
            &self,
            _params: &Tendrils,
            inputs: &mut Tendrils,
            outputs: &mut Tendrils,
        ) -> Result<()> {
            inputs.declare::<i64>("in", "value")?;
            outputs.declare::<i64>("out", "value times gain")?;
            Ok(())
        }

        fn process(&mut self, inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
            let v = *inputs.read::<i64>("in")?;
            outputs.write("out", v * 2)?;
            Ok(ReturnCode::Ok)
        }
    }

    #[derive(Default)]
    struct Panicky;

    impl Cell for Panicky {
        fn process(&mut self, _inputs: &Tendrils, _outputs: &mut Tendrils) -> Result<ReturnCode> {
            panic!("boom");
        }
    }

    #[test]
    fn lifecycle_happy_path() {
        let host = CellHost::wrap::<Doubler>();
        assert_eq!(host.phase(), LifecyclePhase::Created);
        host.declare_params().unwrap();
        host.declare_io().unwrap();
        host.configure().unwrap();
        host.start().unwrap();
        assert_eq!(host.phase(), LifecyclePhase::Running);

        host.write_input("in", Datum::new(21i64)).unwrap();
        assert_eq!(host.process().unwrap(), ReturnCode::Ok);
        assert_eq!(host.output_value::<i64>("out").unwrap(), 42);

        host.stop().unwrap();
        assert_eq!(host.phase(), LifecyclePhase::Stopped);
    }

    #[test]
    fn out_of_order_dispatch_fails() {
        let host = CellHost::wrap::<Doubler>();
        assert!(matches!(
            host.declare_io(),
            Err(Error::LifecycleViolation { .. })
        ));
        assert!(matches!(
            host.configure(),
            Err(Error::LifecycleViolation { .. })
        ));
        assert!(matches!(
            host.process(),
            Err(Error::LifecycleViolation { .. })
        ));
        host.declare_params().unwrap();
        assert!(matches!(
            host.declare_params(),
            Err(Error::LifecycleViolation { .. })
        ));
    }

    #[test]
    fn tick_and_stats_advance() {
        let host = CellHost::wrap::<Doubler>();
        host.setup().unwrap();
        host.write_input("in", Datum::new(1i64)).unwrap();
        assert_eq!(host.tick(), 0);
        host.process().unwrap();
        host.process().unwrap();
        assert_eq!(host.tick(), 2);
        let stats = host.stats();
        assert_eq!(stats.ncalls, 2);
        assert!(!stats.on);
        host.reset_tick();
        assert_eq!(host.tick(), 0);
    }

    #[test]
    fn panic_becomes_cell_fault() {
        let host = CellHost::wrap_named::<Panicky>("kaboom");
        host.setup().unwrap();
        match host.process().unwrap_err() {
            Error::CellFault {
                cell,
                phase,
                kind,
                message,
            } => {
                assert_eq!(cell, "kaboom");
                assert_eq!(phase, "process");
                assert_eq!(kind, "panic");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        // The failed call still counted.
        assert_eq!(host.tick(), 1);
    }

    #[test]
    fn clone_is_fresh_and_unconfigured() {
        let host = CellHost::wrap_named::<Doubler>("original");
        host.setup().unwrap();
        host.set_param("gain", 5i64).unwrap();

        let copy = host.clone_cell();
        assert_eq!(copy.phase(), LifecyclePhase::Created);
        assert_eq!(copy.type_tag(), host.type_tag());
        assert_ne!(copy.name(), "original");
        copy.setup().unwrap();
        // The clone got the declared default, not the original's value.
        assert_eq!(copy.param::<i64>("gain").unwrap(), 2);
    }

    #[test]
    fn non_thread_safe_cells_share_the_default_strand() {
        let a = CellHost::wrap::<Doubler>();
        let b = CellHost::wrap::<Panicky>();
        let (sa, sb) = (a.strand().unwrap(), b.strand().unwrap());
        assert_eq!(sa, sb);
        assert_eq!(sa, Strand::process_default());
    }

    #[test]
    fn required_param_without_value_fails_configure() {
        #[derive(Default)]
        struct Needy;
        impl Cell for Needy {
            fn declare_params(&self, params: &mut Tendrils) -> Result<()> {
                params.declare_tendril(
                    "path",
                    crate::tendril::Tendril::typed::<String>("mandatory").required(true),
                )?;
                Ok(())
            }
        }
        let host = CellHost::wrap_named::<Needy>("needy");
        host.declare_params().unwrap();
        host.declare_io().unwrap();
        assert!(matches!(host.configure(), Err(Error::NotSet { .. })));
        host.set_param("path", String::from("/tmp/x")).unwrap();
        host.configure().unwrap();
    }

    #[test]
    fn default_name_is_address_like() {
        let host = CellHost::wrap::<Doubler>();
        assert!(host.name().starts_with("0x"));
        host.set_name("gen");
        assert_eq!(host.name(), "gen");
    }

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("mycel_cells::sources::Generate"), "Generate");
        assert_eq!(
            short_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec<String>"
        );
        assert_eq!(short_type_name("i64"), "i64");
    }
}
