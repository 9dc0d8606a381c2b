//! Observability cells.

use mycel_core::prelude::*;

/// Logs each incoming value through `tracing` at info level.
#[derive(Debug, Default)]
pub struct Log {
    prefix: String,
}

fn render(datum: &Datum) -> String {
    if let Some(v) = datum.downcast_ref::<i64>() {
        v.to_string()
    } else if let Some(v) = datum.downcast_ref::<f64>() {
        v.to_string()
    } else if let Some(v) = datum.downcast_ref::<bool>() {
        v.to_string()
    } else if let Some(v) = datum.downcast_ref::<String>() {
        v.clone()
    } else {
        format!("<{}>", datum.desc())
    }
}

impl Cell for Log {
    fn declare_params(&self, params: &mut Tendrils) -> Result<()> {
        params.declare_tendril(
            "prefix",
            Tendril::typed::<String>("text prepended to every line").with_default(String::new()),
        )?;
        Ok(())
    }

    fn declare_io(
        &self,
        _params: &Tendrils,
        inputs: &mut Tendrils,
        _outputs: &mut Tendrils,
    ) -> Result<()> {
        inputs.declare_dynamic("in", "any value to log")?;
        Ok(())
    }

    fn configure(
        &mut self,
        params: &Tendrils,
        _inputs: &Tendrils,
        _outputs: &Tendrils,
    ) -> Result<()> {
        self.prefix = params.read::<String>("prefix")?.clone();
        Ok(())
    }

    fn process(&mut self, inputs: &Tendrils, _outputs: &mut Tendrils) -> Result<ReturnCode> {
        let datum = inputs.get("in")?.datum()?;
        tracing::info!("{}{}", self.prefix, render(datum));
        Ok(ReturnCode::Ok)
    }

    fn thread_safe(&self) -> bool {
        true
    }

    fn short_doc(&self) -> &str {
        "Logs incoming values."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_common_types() {
        assert_eq!(render(&Datum::new(5i64)), "5");
        assert_eq!(render(&Datum::new(true)), "true");
        assert_eq!(render(&Datum::new(String::from("hi"))), "hi");
        assert!(render(&Datum::new(vec![1u8])).starts_with('<'));
    }

    #[test]
    fn logs_without_output_ports() {
        let host = CellHost::wrap_named::<Log>("log");
        host.setup().unwrap();
        host.write_input("in", Datum::new(3i64)).unwrap();
        assert_eq!(host.process().unwrap(), ReturnCode::Ok);
    }
}
