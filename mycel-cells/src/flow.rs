//! Flow-shaping cells: delay and passthrough.

use mycel_core::prelude::*;
use std::collections::VecDeque;

/// Delays its input by `num` iterations.
///
/// Buffers incoming values and returns BREAK until the buffer holds more
/// than `num` of them, then forwards the oldest value per call. Because
/// BREAK consumes the input without publishing, a delay cell also resolves
/// the readiness chicken-and-egg of feedback loops.
#[derive(Debug, Default)]
pub struct Delay {
    queue: VecDeque<Datum>,
    num: usize,
}

impl Cell for Delay {
    fn declare_params(&self, params: &mut Tendrils) -> Result<()> {
        params.declare_tendril(
            "num",
            Tendril::typed::<i64>("number of iterations to delay the output").required(true),
        )?;
        Ok(())
    }

    fn declare_io(
        &self,
        _params: &Tendrils,
        inputs: &mut Tendrils,
        outputs: &mut Tendrils,
    ) -> Result<()> {
        inputs.declare_dynamic("in", "any type")?;
        outputs.declare_dynamic("out", "the input, num iterations later")?;
        Ok(())
    }

    fn configure(
        &mut self,
        params: &Tendrils,
        _inputs: &Tendrils,
        _outputs: &Tendrils,
    ) -> Result<()> {
        self.num = usize::try_from(*params.read::<i64>("num")?).unwrap_or(0);
        Ok(())
    }

    fn process(&mut self, inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
        self.queue.push_back(inputs.get("in")?.sample()?);
        if self.queue.len() > self.num {
            let datum = self
                .queue
                .pop_front()
                .unwrap_or_else(|| unreachable!("queue length checked above"));
            outputs.get_mut("out")?.write(datum)?;
            Ok(ReturnCode::Ok)
        } else {
            Ok(ReturnCode::Break)
        }
    }

    fn thread_safe(&self) -> bool {
        true
    }

    fn short_doc(&self) -> &str {
        "Delays the output of an object."
    }
}

/// Forwards its input unchanged.
#[derive(Debug, Default)]
pub struct Passthrough;

impl Cell for Passthrough {
    fn declare_io(
        &self,
        _params: &Tendrils,
        inputs: &mut Tendrils,
        outputs: &mut Tendrils,
    ) -> Result<()> {
        inputs.declare_dynamic("in", "any type")?;
        outputs.declare_dynamic("out", "the input, unchanged")?;
        Ok(())
    }

    fn process(&mut self, inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
        let datum = inputs.get("in")?.sample()?;
        outputs.get_mut("out")?.write(datum)?;
        Ok(ReturnCode::Ok)
    }

    fn thread_safe(&self) -> bool {
        true
    }

    fn short_doc(&self) -> &str {
        "Forwards its input unchanged."
    }
}
