//! Topology persistence through a scheduler run.

mod common;

use common::{seen, Collect};
use mycel_core::prelude::*;
use mycel_core::PlasmDefinition;
use mycel_executor::SingleThreaded;
use std::io::{Seek, SeekFrom, Write};
use std::sync::Arc;

fn registry() -> &'static Registry {
    mycel_cells::register_standard_cells();
    Registry::global().register::<Collect>("test::collect");
    Registry::global()
}

fn build_pipeline(registry: &Registry) -> Result<PlasmPtr> {
    let plasm = Arc::new(Plasm::new());
    let gen = registry.create_named("std::generate", "gen")?;
    gen.set_param("start", 1i64)?;
    let delay = registry.create_named("std::delay", "delay")?;
    delay.set_param("num", 1i64)?;
    let sink = registry.create_named("test::collect", "sink")?;
    plasm.connect(&gen, "out", &delay, "in")?;
    plasm.connect(&delay, "out", &sink, "in")?;
    Ok(plasm)
}

#[test]
fn saved_plasm_reloads_and_runs() {
    let registry = registry();
    let original = build_pipeline(registry).unwrap();

    let mut file = tempfile::tempfile().unwrap();
    original.save(&mut file).unwrap();
    file.flush().unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let restored = Arc::new(Plasm::load(&mut file).unwrap());

    // Same graph: vertices by type+name, edges by endpoint ports.
    let original_def = original.definition().unwrap();
    let restored_def = restored.definition().unwrap();
    assert_eq!(
        original_def.to_yaml().unwrap(),
        restored_def.to_yaml().unwrap()
    );

    // And it actually runs: delay num=1 means 4 iterations deliver 3 values.
    SingleThreaded::new(Arc::clone(&restored)).execute(4).unwrap();
    let sink = restored
        .cells()
        .into_iter()
        .find(|c| c.name() == "sink")
        .unwrap();
    assert_eq!(seen(&sink), vec![1, 2, 3]);
}

#[test]
fn definition_round_trips_through_yaml_text() {
    let registry = registry();
    let plasm = build_pipeline(registry).unwrap();

    let yaml = plasm.definition().unwrap().to_yaml().unwrap();
    let definition = PlasmDefinition::from_yaml(&yaml).unwrap();
    assert_eq!(definition.cells.len(), 3);
    assert_eq!(definition.edges.len(), 2);
    assert_eq!(definition.cells[0].type_tag, "std::generate");
    assert_eq!(definition.cells[0].params["start"], serde_json::json!(1));

    let rebuilt = Plasm::from_definition(&definition, registry).unwrap();
    assert_eq!(rebuilt.size(), 3);
    assert_eq!(rebuilt.connections().len(), 2);
}
