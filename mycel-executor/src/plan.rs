//! Execution planning shared by both scheduling policies.
//!
//! A plan is an immutable snapshot of a plasm: cells in topological order
//! with their incoming and outgoing edges resolved per cell. Building the
//! plan is also where directed cycles are rejected.

use mycel_core::cell::{CellPtr, ReturnCode};
use mycel_core::edge::EdgePtr;
use mycel_core::error::Result;
use mycel_core::plasm::Plasm;
use mycel_core::strand::Strand;
use std::sync::Arc;

/// One cell slot in the plan.
pub struct PlannedCell {
    /// The cell.
    pub cell: CellPtr,
    /// Edges feeding this cell's input ports.
    pub in_edges: Vec<EdgePtr>,
    /// Edges fed by this cell's output ports.
    pub out_edges: Vec<EdgePtr>,
    /// The cell's strand affinity, sampled at plan time.
    pub strand: Option<Strand>,
}

/// Topologically ordered execution snapshot of a plasm.
pub struct ExecutionPlan {
    cells: Vec<PlannedCell>,
}

impl ExecutionPlan {
    /// Build a plan. Fails with [`mycel_core::Error::Cyclic`] on a directed
    /// cycle.
    pub fn build(plasm: &Plasm) -> Result<Self> {
        let order = plasm.iter_topological()?;
        let (insertion, connections) = plasm.snapshot();

        let cells = order
            .into_iter()
            .map(|cell| {
                let insertion_idx = insertion
                    .iter()
                    .position(|c| Arc::ptr_eq(c, &cell))
                    .unwrap_or_else(|| unreachable!("topological order returned a foreign cell"));
                let in_edges = connections
                    .iter()
                    .filter(|c| c.to == insertion_idx)
                    .map(|c| c.edge.clone())
                    .collect();
                let out_edges = connections
                    .iter()
                    .filter(|c| c.from == insertion_idx)
                    .map(|c| c.edge.clone())
                    .collect();
                let strand = cell.strand();
                PlannedCell {
                    cell,
                    in_edges,
                    out_edges,
                    strand,
                }
            })
            .collect();

        Ok(Self { cells })
    }

    /// Number of cells in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the plan is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The planned cells in topological order.
    #[must_use]
    pub fn cells(&self) -> &[PlannedCell] {
        &self.cells
    }

    /// One planned cell.
    #[must_use]
    pub fn get(&self, idx: usize) -> &PlannedCell {
        &self.cells[idx]
    }
}

/// Result of offering one execution step to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An incoming edge was empty; the cell did not run.
    Unready,
    /// The cell ran and returned this code.
    Ran(ReturnCode),
}

/// Run one cell once: bind edge heads, process, publish on OK, consume.
///
/// Bound inputs are popped, and their dirty bits cleared, after every
/// completed call regardless of the return code; outputs are pushed to
/// every outgoing edge only on OK. Hook failures propagate as `CellFault`
/// without consuming inputs.
pub fn step_cell(planned: &PlannedCell) -> Result<StepOutcome> {
    for edge in &planned.in_edges {
        match edge.front_cloned() {
            None => return Ok(StepOutcome::Unready),
            Some(datum) => planned.cell.write_input(edge.to_port(), datum)?,
        }
    }

    let code = planned.cell.process()?;

    if code == ReturnCode::Ok {
        for edge in &planned.out_edges {
            let datum = planned.cell.read_output(edge.from_port())?;
            edge.push(datum)?;
        }
    } else {
        tracing::debug!(cell = %planned.cell.name(), code = %code, "suppressing outputs");
    }

    for edge in &planned.in_edges {
        // The head we bound is still there: this cell is the only consumer.
        let _ = edge.pop_front();
        planned.cell.clear_input_dirty(edge.to_port())?;
    }

    Ok(StepOutcome::Ran(code))
}
