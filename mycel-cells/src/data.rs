//! Data-combining cells.

use mycel_core::prelude::*;

/// Adds its two integer inputs.
#[derive(Debug, Default)]
pub struct Add;

impl Cell for Add {
    fn declare_io(
        &self,
        _params: &Tendrils,
        inputs: &mut Tendrils,
        outputs: &mut Tendrils,
    ) -> Result<()> {
        inputs.declare::<i64>("left", "left operand")?;
        inputs.declare::<i64>("right", "right operand")?;
        outputs.declare::<i64>("out", "left + right")?;
        Ok(())
    }

    fn process(&mut self, inputs: &Tendrils, outputs: &mut Tendrils) -> Result<ReturnCode> {
        let left = *inputs.read::<i64>("left")?;
        let right = *inputs.read::<i64>("right")?;
        outputs.write("out", left + right)?;
        Ok(ReturnCode::Ok)
    }

    fn thread_safe(&self) -> bool {
        true
    }

    fn short_doc(&self) -> &str {
        "Adds two integers."
    }
}
