//! Standard library cells for the mycel dataflow engine.
//!
//! Small, composable cells used directly and as fixtures for testing
//! topologies: sequence sources, delays, arithmetic, and logging sinks.
//! [`register_standard_cells`] publishes them all to the global registry
//! under `std::` tags so persisted topologies can resolve them.

pub mod data;
pub mod flow;
pub mod logging;
pub mod sources;

pub use data::Add;
pub use flow::{Delay, Passthrough};
pub use logging::Log;
pub use sources::Generate;

use mycel_core::registry::Registry;

/// Register every standard cell with the global registry.
///
/// Idempotent; call once at startup before loading persisted topologies.
pub fn register_standard_cells() {
    register_with(Registry::global());
}

/// Register every standard cell with an explicit registry.
pub fn register_with(registry: &Registry) {
    registry.register::<Generate>("std::generate");
    registry.register::<Delay>("std::delay");
    registry.register::<Passthrough>("std::passthrough");
    registry.register::<Add>("std::add");
    registry.register::<Log>("std::log");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tags_resolve() {
        let registry = Registry::new();
        register_with(&registry);
        assert_eq!(
            registry.tags(),
            vec![
                "std::add",
                "std::delay",
                "std::generate",
                "std::log",
                "std::passthrough"
            ]
        );
        let generate = registry.create("std::generate").unwrap();
        assert_eq!(generate.type_tag(), "std::generate");
    }
}
