//! Source cells: no inputs, produce values.

use mycel_core::prelude::*;

/// Emits an arithmetic sequence, one value per process call.
#[derive(Debug, Default)]
pub struct Generate {
    next: i64,
    step: i64,
}

impl Cell for Generate {
    fn declare_params(&self, params: &mut Tendrils) -> Result<()> {
        params.declare_tendril(
            "start",
            Tendril::typed::<i64>("first value emitted").with_default(0i64),
        )?;
        params.declare_tendril(
            "step",
            Tendril::typed::<i64>("difference between consecutive values").with_default(1i64),
        )?;
        Ok(())
    }

    fn declare_io(
        &self,
        _params: &Tendrils,
        _inputs: &mut Tendrils,
        outputs: &mut Tendrils,
    ) -> Result<()> {
        outputs.declare::<i64>("out", "the current value of the sequence")?;
        Ok(())
    }

    fn configure(
        &mut self,
        params: &Tendrils,
        _inputs: &Tendrils,
        _outputs: &Tendrils,
    ) -> Result<()> {
        self.next = *params.read::<i64>("start")?;
        self.step = *params.read::<i64>("step")?;
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
        outputs.write("out", self.next)?;
        self.next += self.step;
        Ok(ReturnCode::Ok)
    }

    fn thread_safe(&self) -> bool {
        true
    }

    fn short_doc(&self) -> &str {
        "Emits an arithmetic sequence of integers."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_sequence_from_params() {
        let host = CellHost::wrap_named::<Generate>("gen");
        host.declare_params().unwrap();
        host.set_param("start", 10i64).unwrap();
        host.set_param("step", 5i64).unwrap();
        host.declare_io().unwrap();
        host.configure().unwrap();

        for expected in [10i64, 15, 20] {
            host.process().unwrap();
            assert_eq!(host.output_value::<i64>("out").unwrap(), expected);
        }
    }

    #[test]
    fn defaults_count_from_zero() {
        let host = CellHost::wrap::<Generate>();
        host.setup().unwrap();
        host.process().unwrap();
        assert_eq!(host.output_value::<i64>("out").unwrap(), 0);
        host.process().unwrap();
        assert_eq!(host.output_value::<i64>("out").unwrap(), 1);
    }
}
