//! Fixture cells shared by the integration tests.
#![allow(dead_code)]

use mycel_core::prelude::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Records every integer it consumes in its `seen` output tendril.
#[derive(Debug, Default)]
pub struct Collect;

impl Cell for Collect {
    fn declare_io(
        &self,
        _params: &Tendrils,
        inputs: &mut Tendrils,
        outputs: &mut Tendrils,
    ) -> Result<()> {
        inputs.declare_tendril("in", Tendril::typed::<i64>("value to record").required(true))?;
        outputs.declare::<Vec<i64>>("seen", "all values recorded so far")?;
        Ok(())
    }

    fn process(&mut self, inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
        let value = *inputs.read::<i64>("in")?;
        let mut seen = match outputs.get("seen")?.has_value() {
            true => outputs.read::<Vec<i64>>("seen")?.clone(),
            false => Vec::new(),
        };
        seen.push(value);
        outputs.write("seen", seen)?;
        Ok(ReturnCode::Ok)
    }

    fn thread_safe(&self) -> bool {
        true
    }
}

/// Read what a [`Collect`] cell has seen.
pub fn seen(cell: &CellPtr) -> Vec<i64> {
    cell.output_value::<Vec<i64>>("seen").unwrap_or_default()
}

/// Install a test subscriber so `RUST_LOG` works while debugging.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Forwards integers until it sees a trigger value, then returns QUIT.
#[derive(Debug, Default)]
pub struct QuitAt {
    at: i64,
}

impl Cell for QuitAt {
    fn declare_params(&self, params: &mut Tendrils) -> Result<()> {
        params.declare_tendril(
            "at",
            Tendril::typed::<i64>("value that triggers QUIT").required(true),
        )?;
        Ok(())
    }

    fn declare_io(
        &self,
        _params: &Tendrils,
        inputs: &mut Tendrils,
        outputs: &mut Tendrils,
    ) -> Result<()> {
        inputs.declare::<i64>("in", "")?;
        outputs.declare::<i64>("out", "")?;
        Ok(())
    }

    fn configure(
        &mut self,
        params: &Tendrils,
        _inputs: &Tendrils,
        _outputs: &Tendrils,
    ) -> Result<()> {
        self.at = *params.read::<i64>("at")?;
        Ok(())
    }

    fn process(&mut self, inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
        let value = *inputs.read::<i64>("in")?;
        if value == self.at {
            return Ok(ReturnCode::Quit);
        }
        outputs.write("out", value)?;
        Ok(ReturnCode::Ok)
    }

    fn thread_safe(&self) -> bool {
        true
    }
}

/// A sink that takes strings, for type-mismatch tests.
#[derive(Debug, Default)]
pub struct TextSink;

impl Cell for TextSink {
    fn declare_io(
        &self,
        _params: &Tendrils,
        inputs: &mut Tendrils,
        _outputs: &mut Tendrils,
    ) -> Result<()> {
        inputs.declare::<String>("in", "text")?;
        Ok(())
    }
}

static ACTIVE_EXCLUSIVE: AtomicUsize = AtomicUsize::new(0);
static MAX_ACTIVE_EXCLUSIVE: AtomicUsize = AtomicUsize::new(0);

/// A deliberately not-thread-safe identity cell.
///
/// Instances track how many `process` calls across the type are in flight at
/// once; because the type is not marked thread-safe, every instance shares
/// the process-wide default strand and the maximum must stay at 1.
#[derive(Debug, Default)]
pub struct ExclusiveProbe;

impl ExclusiveProbe {
    pub fn reset_overlap() {
        ACTIVE_EXCLUSIVE.store(0, Ordering::SeqCst);
        MAX_ACTIVE_EXCLUSIVE.store(0, Ordering::SeqCst);
    }

    pub fn max_overlap() -> usize {
        MAX_ACTIVE_EXCLUSIVE.load(Ordering::SeqCst)
    }
}

impl Cell for ExclusiveProbe {
    fn declare_io(
        &self,
        _params: &Tendrils,
        inputs: &mut Tendrils,
        outputs: &mut Tendrils,
    ) -> Result<()> {
        inputs.declare::<i64>("in", "")?;
        outputs.declare::<i64>("out", "")?;
        Ok(())
    }

    fn process(&mut self, inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
        let now = ACTIVE_EXCLUSIVE.fetch_add(1, Ordering::SeqCst) + 1;
        MAX_ACTIVE_EXCLUSIVE.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(1));
        let value = *inputs.read::<i64>("in")?;
        outputs.write("out", value)?;
        ACTIVE_EXCLUSIVE.fetch_sub(1, Ordering::SeqCst);
        Ok(ReturnCode::Ok)
    }
}

static LIFE_EVENTS: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

/// Records the order in which its hooks are dispatched.
#[derive(Debug, Default)]
pub struct LifeRecorder;

impl LifeRecorder {
    pub fn reset_events() {
        LIFE_EVENTS.lock().clear();
    }

    pub fn events() -> Vec<&'static str> {
        LIFE_EVENTS.lock().clone()
    }
}

impl Cell for LifeRecorder {
    fn declare_params(&self, _params: &mut Tendrils) -> Result<()> {
        LIFE_EVENTS.lock().push("declare_params");
        Ok(())
    }

    fn declare_io(
        &self,
        _params: &Tendrils,
        _inputs: &mut Tendrils,
        _outputs: &mut Tendrils,
    ) -> Result<()> {
        LIFE_EVENTS.lock().push("declare_io");
        Ok(())
    }

    fn configure(
        &mut self,
        _params: &Tendrils,
        _inputs: &Tendrils,
        _outputs: &Tendrils,
    ) -> Result<()> {
        LIFE_EVENTS.lock().push("configure");
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, _outputs: &mut Tendrils) -> Result<ReturnCode> {
        LIFE_EVENTS.lock().push("process");
        Ok(ReturnCode::Ok)
    }

    fn start(&mut self) -> Result<()> {
        LIFE_EVENTS.lock().push("start");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        LIFE_EVENTS.lock().push("stop");
        Ok(())
    }

    fn thread_safe(&self) -> bool {
        true
    }
}
