//! The plasm: the directed multigraph of cells and edges.

use crate::cell::CellPtr;
use crate::edge::{Edge, EdgePtr};
use crate::error::{Error, Result};
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// Shared handle to a [`Plasm`].
pub type PlasmPtr = Arc<Plasm>;

/// One edge record: cell indices plus the transport queue.
///
/// Indices are positions in [`Plasm::cells`], which is insertion-ordered and
/// stable (cells are never removed).
#[derive(Debug, Clone)]
pub struct Connection {
    /// Index of the source cell.
    pub from: usize,
    /// Index of the sink cell.
    pub to: usize,
    /// The transport queue; carries the port names.
    pub edge: EdgePtr,
}

#[derive(Default)]
struct Graph {
    cells: Vec<CellPtr>,
    edges: Vec<Connection>,
}

impl Graph {
    fn index_of(&self, cell: &CellPtr) -> Option<usize> {
        self.cells.iter().position(|c| Arc::ptr_eq(c, cell))
    }

    fn insert(&mut self, cell: &CellPtr) -> usize {
        match self.index_of(cell) {
            Some(idx) => idx,
            None => {
                self.cells.push(Arc::clone(cell));
                self.cells.len() - 1
            }
        }
    }
}

/// The graph container: owns edges, shares cell ownership with the embedder.
///
/// Structure must not be mutated while a scheduler run is in progress;
/// mutation is single-writer, exclusive of execution.
#[derive(Default)]
pub struct Plasm {
    graph: RwLock<Graph>,
}

impl Plasm {
    /// An empty plasm.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell. Idempotent by identity; returns true if it was new.
    pub fn insert(&self, cell: &CellPtr) -> bool {
        let mut graph = self.graph.write();
        let before = graph.cells.len();
        graph.insert(cell);
        graph.cells.len() != before
    }

    /// Connect `from.output` to `to.input`, inserting either cell if absent.
    ///
    /// Runs any pending declare phases on both cells, then type-checks the
    /// port pair and enforces the at-most-one-edge-per-input invariant.
    pub fn connect(&self, from: &CellPtr, output: &str, to: &CellPtr, input: &str) -> Result<()> {
        from.ensure_declared()?;
        to.ensure_declared()?;

        let from_desc = from.output_desc(output)?;
        let to_desc = to.input_desc(input)?;
        if !from_desc.compatible(&to_desc) {
            return Err(Error::TypeMismatch {
                name: format!("{}.{} -> {}.{}", from.name(), output, to.name(), input),
                expected: from_desc.name().to_string(),
                actual: to_desc.name().to_string(),
            });
        }
        // A dynamic endpoint adopts the concrete side's element type.
        let desc = if from_desc.is_dynamic() { to_desc } else { from_desc };

        let mut graph = self.graph.write();
        let from_idx = graph.insert(from);
        let to_idx = graph.insert(to);
        let occupied = graph
            .edges
            .iter()
            .any(|c| c.to == to_idx && c.edge.to_port() == input);
        if occupied {
            return Err(Error::AlreadyConnected {
                cell: to.name(),
                port: input.to_string(),
            });
        }
        tracing::debug!(
            from = %from.name(),
            output,
            to = %to.name(),
            input,
            "connect"
        );
        graph.edges.push(Connection {
            from: from_idx,
            to: to_idx,
            edge: Arc::new(Edge::new(desc, output, input)),
        });
        Ok(())
    }

    /// Remove the edge between `from.output` and `to.input`, draining it.
    pub fn disconnect(&self, from: &CellPtr, output: &str, to: &CellPtr, input: &str) -> Result<()> {
        let mut graph = self.graph.write();
        let (from_idx, to_idx) = match (graph.index_of(from), graph.index_of(to)) {
            (Some(f), Some(t)) => (f, t),
            _ => {
                return Err(Error::NotConnected {
                    cell: to.name(),
                    port: input.to_string(),
                })
            }
        };
        let position = graph.edges.iter().position(|c| {
            c.from == from_idx
                && c.to == to_idx
                && c.edge.from_port() == output
                && c.edge.to_port() == input
        });
        match position {
            Some(idx) => {
                let removed = graph.edges.remove(idx);
                removed.edge.clear();
                Ok(())
            }
            None => Err(Error::NotConnected {
                cell: to.name(),
                port: input.to_string(),
            }),
        }
    }

    /// Drive every cell through its remaining declare/configure transitions.
    ///
    /// `configure` itself is local, so insertion order is as good as any.
    pub fn configure_all(&self) -> Result<()> {
        for cell in self.cells() {
            cell.setup()?;
        }
        Ok(())
    }

    /// Verify that every required input and output port is connected.
    pub fn check(&self) -> Result<()> {
        let graph = self.graph.read();
        for (idx, cell) in graph.cells.iter().enumerate() {
            let connected_inputs: Vec<&Connection> =
                graph.edges.iter().filter(|c| c.to == idx).collect();
            let connected_outputs: Vec<&Connection> =
                graph.edges.iter().filter(|c| c.from == idx).collect();

            let missing = cell.with_inputs(|inputs| {
                inputs
                    .iter()
                    .find(|(name, t)| {
                        t.is_required()
                            && !connected_inputs.iter().any(|c| c.edge.to_port() == *name)
                    })
                    .map(|(name, _)| name.to_string())
            });
            if let Some(port) = missing {
                return Err(Error::NotConnected {
                    cell: cell.name(),
                    port,
                });
            }

            let missing = cell.with_outputs(|outputs| {
                outputs
                    .iter()
                    .find(|(name, t)| {
                        t.is_required()
                            && !connected_outputs.iter().any(|c| c.edge.from_port() == *name)
                    })
                    .map(|(name, _)| name.to_string())
            });
            if let Some(port) = missing {
                return Err(Error::NotConnected {
                    cell: cell.name(),
                    port,
                });
            }
        }
        Ok(())
    }

    /// All cells in insertion order.
    #[must_use]
    pub fn cells(&self) -> Vec<CellPtr> {
        self.graph.read().cells.clone()
    }

    /// Number of cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.graph.read().cells.len()
    }

    /// All edge records.
    #[must_use]
    pub fn connections(&self) -> Vec<Connection> {
        self.graph.read().edges.clone()
    }

    /// Atomic snapshot of cells and edge records under one lock, for
    /// schedulers and serialization.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<CellPtr>, Vec<Connection>) {
        let graph = self.graph.read();
        (graph.cells.clone(), graph.edges.clone())
    }

    /// Cells in a total order consistent with edge directions, ties broken
    /// by insertion order. Fails with [`Error::Cyclic`] on a directed cycle.
    pub fn iter_topological(&self) -> Result<Vec<CellPtr>> {
        let graph = self.graph.read();
        let n = graph.cells.len();
        let mut in_degree = vec![0usize; n];
        for connection in &graph.edges {
            in_degree[connection.to] += 1;
        }

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(idx, _)| Reverse(idx))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(idx);
            for connection in graph.edges.iter().filter(|c| c.from == idx) {
                in_degree[connection.to] -= 1;
                if in_degree[connection.to] == 0 {
                    ready.push(Reverse(connection.to));
                }
            }
        }

        if order.len() != n {
            let cells = (0..n)
                .filter(|idx| !order.contains(idx))
                .map(|idx| graph.cells[idx].name())
                .collect();
            return Err(Error::Cyclic { cells });
        }

        Ok(order.into_iter().map(|idx| Arc::clone(&graph.cells[idx])).collect())
    }

    /// Zero every cell's tick counter and drain every edge.
    pub fn reset_ticks(&self) {
        let graph = self.graph.read();
        for cell in &graph.cells {
            cell.reset_tick();
        }
        for connection in &graph.edges {
            connection.edge.clear();
        }
    }
}

impl std::fmt::Debug for Plasm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let graph = self.graph.read();
        f.debug_struct("Plasm")
            .field("cells", &graph.cells.len())
            .field("edges", &graph.edges.len())
            .finish()
    }
}
