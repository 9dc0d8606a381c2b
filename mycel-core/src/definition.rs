//! Persisted topology: save and load a plasm as YAML.
//!
//! The format captures the ordered cell list (type tag, instance name,
//! user-supplied parameter values) and the ordered edge list (cell indices
//! plus port names). Loading resolves type tags through the [`Registry`] and
//! parameter values through the codec table, so a connected plasm
//! round-trips losslessly as long as its cell types are registered.

use crate::codec;
use crate::error::{Error, Result};
use crate::plasm::Plasm;
use crate::registry::Registry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// A persisted cell: concrete type tag, instance name, parameter values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellDefinition {
    /// Registry tag of the concrete cell type.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Instance name.
    pub name: String,
    /// User-supplied parameter values, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, serde_json::Value>,
}

/// A persisted edge: endpoint cell indices and port names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDefinition {
    /// Index of the source cell in the cell list.
    pub from: usize,
    /// Source output port.
    pub from_port: String,
    /// Index of the sink cell in the cell list.
    pub to: usize,
    /// Sink input port.
    pub to_port: String,
}

/// A complete persisted topology.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlasmDefinition {
    /// Cells in insertion order.
    #[serde(default)]
    pub cells: Vec<CellDefinition>,
    /// Edges in creation order.
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
}

impl PlasmDefinition {
    /// Parse a definition from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Serialization {
            cause: e.to_string(),
        })
    }

    /// Serialize the definition to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Serialization {
            cause: e.to_string(),
        })
    }
}

impl Plasm {
    /// Capture this plasm as a [`PlasmDefinition`].
    ///
    /// Fails with [`Error::Unserializable`] if a user-supplied parameter has
    /// no registered codec.
    pub fn definition(&self) -> Result<PlasmDefinition> {
        let (cells, connections) = self.snapshot();

        let mut cell_defs = Vec::with_capacity(cells.len());
        for cell in &cells {
            let name = cell.name();
            let params = cell.with_params(|params| {
                let mut encoded = IndexMap::new();
                for (pname, tendril) in params.iter() {
                    if !tendril.is_user_supplied() {
                        continue;
                    }
                    let datum = tendril.datum()?;
                    let json = codec::encode(datum).ok_or_else(|| Error::Unserializable {
                        cell: name.clone(),
                        param: pname.to_string(),
                        type_name: datum.desc().name().to_string(),
                    })??;
                    encoded.insert(pname.to_string(), json);
                }
                Ok::<_, Error>(encoded)
            })?;
            cell_defs.push(CellDefinition {
                type_tag: cell.type_tag(),
                name,
                params,
            });
        }

        let edge_defs = connections
            .iter()
            .map(|c| EdgeDefinition {
                from: c.from,
                from_port: c.edge.from_port().to_string(),
                to: c.to,
                to_port: c.edge.to_port().to_string(),
            })
            .collect();

        Ok(PlasmDefinition {
            cells: cell_defs,
            edges: edge_defs,
        })
    }

    /// Persist the topology as YAML.
    pub fn save(&self, writer: &mut dyn Write) -> Result<()> {
        let yaml = self.definition()?.to_yaml()?;
        writer.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Restore a plasm from YAML, resolving cell types through the global
    /// registry.
    pub fn load(reader: &mut dyn Read) -> Result<Plasm> {
        Self::load_with(reader, Registry::global())
    }

    /// Restore a plasm from YAML with an explicit registry.
    pub fn load_with(reader: &mut dyn Read, registry: &Registry) -> Result<Plasm> {
        let mut yaml = String::new();
        reader.read_to_string(&mut yaml)?;
        Self::from_definition(&PlasmDefinition::from_yaml(&yaml)?, registry)
    }

    /// Materialize a plasm from a definition.
    pub fn from_definition(def: &PlasmDefinition, registry: &Registry) -> Result<Plasm> {
        let mut hosts = Vec::with_capacity(def.cells.len());
        for cell_def in &def.cells {
            let host = registry.create_named(&cell_def.type_tag, &cell_def.name)?;
            host.with_params(|params| {
                for (pname, json) in &cell_def.params {
                    let tendril = params.get_mut(pname)?;
                    let datum =
                        codec::decode(tendril.desc(), json).ok_or_else(|| Error::Unserializable {
                            cell: cell_def.name.clone(),
                            param: pname.clone(),
                            type_name: tendril.desc().name().to_string(),
                        })??;
                    tendril.assign(datum)?;
                }
                Ok::<_, Error>(())
            })?;
            host.declare_io()?;
            hosts.push(host);
        }

        let plasm = Plasm::new();
        for host in &hosts {
            plasm.insert(host);
        }
        for edge_def in &def.edges {
            let from = hosts.get(edge_def.from).ok_or_else(|| Error::Serialization {
                cause: format!("edge references missing cell index {}", edge_def.from),
            })?;
            let to = hosts.get(edge_def.to).ok_or_else(|| Error::Serialization {
                cause: format!("edge references missing cell index {}", edge_def.to),
            })?;
            plasm.connect(from, &edge_def.from_port, to, &edge_def.to_port)?;
        }
        Ok(plasm)
    }
}
