//! Error types for the mycel engine.
//!
//! One enum covers the whole engine so that errors compose across the
//! tendril, graph, and scheduler layers without conversion boilerplate.
//! Every variant carries the identifiers (cell name, port name, type names)
//! needed to act on it.

use thiserror::Error;

/// The main error type for mycel operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A value or declaration did not match the tendril's declared type.
    #[error("type mismatch on '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// The tendril or port involved.
        name: String,
        /// The declared type.
        expected: String,
        /// The offending type.
        actual: String,
    },

    /// A tendril was read before any value or default was supplied.
    #[error("'{name}' has no value and no default")]
    NotSet {
        /// The tendril name.
        name: String,
    },

    /// A tendril was declared with an invalid (empty) name.
    #[error("invalid tendril name {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// A port lookup failed.
    #[error("unknown port '{port}' on cell '{cell}'")]
    UnknownPort {
        /// The cell whose ports were searched (empty until context is attached).
        cell: String,
        /// The missing port name.
        port: String,
    },

    /// An input port already has an incoming edge.
    #[error("input '{port}' on cell '{cell}' is already connected")]
    AlreadyConnected {
        /// The sink cell.
        cell: String,
        /// The sink port.
        port: String,
    },

    /// A required port has no edge, or a disconnect found no matching edge.
    #[error("port '{port}' on cell '{cell}' is not connected")]
    NotConnected {
        /// The cell owning the port.
        cell: String,
        /// The unconnected port.
        port: String,
    },

    /// A cell life-cycle hook was dispatched out of order.
    #[error("cell '{cell}': cannot {attempted} while {phase}")]
    LifecycleViolation {
        /// The offending cell.
        cell: String,
        /// The transition that was attempted.
        attempted: &'static str,
        /// The phase the cell was actually in.
        phase: crate::cell::LifecyclePhase,
    },

    /// A directed cycle was found while computing the topological order.
    #[error("plasm contains a directed cycle through: {cells:?}")]
    Cyclic {
        /// Names of the cells on the cycle.
        cells: Vec<String>,
    },

    /// A cell hook failed or panicked; wraps the underlying failure.
    #[error("cell '{cell}' failed during {phase}: [{kind}] {message}")]
    CellFault {
        /// The cell instance name.
        cell: String,
        /// The life-cycle phase being dispatched.
        phase: &'static str,
        /// Kind tag of the underlying failure ("panic" for caught panics).
        kind: String,
        /// The underlying message.
        message: String,
    },

    /// Pop from an empty edge. Never escapes the scheduler, which translates
    /// it into cell unreadiness.
    #[error("edge is empty")]
    EmptyEdge,

    /// The scheduler was interrupted; no further executions are accepted.
    #[error("scheduler was interrupted")]
    Cancelled,

    /// A persisted topology referenced a type tag no factory is registered for.
    #[error("no cell type registered for tag '{type_tag}'")]
    UnknownCellType {
        /// The unresolved tag.
        type_tag: String,
    },

    /// A user-supplied parameter has no registered codec and cannot round-trip.
    #[error("parameter '{param}' on cell '{cell}' has unserializable type {type_name}")]
    Unserializable {
        /// The owning cell.
        cell: String,
        /// The parameter name.
        param: String,
        /// The parameter's Rust type.
        type_name: String,
    },

    /// Encoding or decoding a persisted topology failed.
    #[error("serialization failed: {cause}")]
    Serialization {
        /// Description of the failure.
        cause: String,
    },

    /// I/O failure while saving or loading a topology.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Static tag for the error kind, for logs and fault wrapping.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::NotSet { .. } => "NotSet",
            Self::InvalidName { .. } => "InvalidName",
            Self::UnknownPort { .. } => "UnknownPort",
            Self::AlreadyConnected { .. } => "AlreadyConnected",
            Self::NotConnected { .. } => "NotConnected",
            Self::LifecycleViolation { .. } => "LifecycleViolation",
            Self::Cyclic { .. } => "Cyclic",
            Self::CellFault { .. } => "CellFault",
            Self::EmptyEdge => "EmptyEdge",
            Self::Cancelled => "Cancelled",
            Self::UnknownCellType { .. } => "UnknownCellType",
            Self::Unserializable { .. } => "Unserializable",
            Self::Serialization { .. } => "Serialization",
            Self::Io(_) => "Io",
        }
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for attaching cell context to port-level errors.
///
/// Tendrils collections do not know which cell owns them, so they raise
/// [`Error::UnknownPort`] with an empty cell field; callers that do know
/// fill it in.
pub trait ResultExt<T> {
    /// Fill the `cell` field of a contextual error if it is still empty.
    fn with_cell(self, cell: &str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_cell(self, cell: &str) -> Result<T> {
        self.map_err(|e| match e {
            Error::UnknownPort { cell: c, port } if c.is_empty() => Error::UnknownPort {
                cell: cell.to_string(),
                port,
            },
            Error::NotSet { name } => Error::NotSet {
                name: format!("{cell}.{name}"),
            },
            other => other,
        })
    }
}
