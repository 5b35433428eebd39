//! Unified error type for the network model and the audit built on top of it.
//!
//! Every failure here means the collaborator handed over malformed input:
//! a panel with the wrong number of rows, a line pointing at a bus that does
//! not exist, or a polars frame that could not be assembled. Missing data is
//! *not* an error; checks skip it and record a diagnostic instead.
//!
//! # Example
//!
//! ```
//! use lopf_core::{LopfError, LopfResult, Snapshots};
//!
//! fn weighted(snapshots: &Snapshots, power: &[f64]) -> LopfResult<Vec<f64>> {
//!     snapshots.to_energy("Generator.p", power)
//! }
//!
//! let snapshots = Snapshots::hourly(3);
//! assert!(matches!(
//!     weighted(&snapshots, &[1.0, 2.0]),
//!     Err(LopfError::Shape { .. })
//! ));
//! ```

use polars::prelude::PolarsError;
use thiserror::Error;

/// Unified error type for all network model operations.
#[derive(Error, Debug)]
pub enum LopfError {
    /// A series or panel does not span the snapshot axis it should
    #[error("Shape mismatch for {what}: expected {expected} rows, found {found}")]
    Shape {
        what: String,
        expected: usize,
        found: usize,
    },

    /// A panel exists but lacks the column for an entity that needs it
    #[error("Missing column '{entity}' in {kind}.{field}")]
    MissingColumn {
        kind: String,
        field: String,
        entity: String,
    },

    /// A reference to an entity absent from its static table
    #[error("Unknown {kind} '{entity}'")]
    MissingEntity { kind: String, entity: String },

    /// Network structure errors (inconsistent topology, bad cycle matrix)
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors raised while building or reading polars frames
    #[error("Panel error: {0}")]
    Panel(#[from] PolarsError),
}

/// Convenience type alias for Results using LopfError.
pub type LopfResult<T> = Result<T, LopfError>;

impl LopfError {
    pub fn shape(what: impl Into<String>, expected: usize, found: usize) -> Self {
        LopfError::Shape {
            what: what.into(),
            expected,
            found,
        }
    }

    pub fn missing_column(
        kind: impl Into<String>,
        field: impl Into<String>,
        entity: impl Into<String>,
    ) -> Self {
        LopfError::MissingColumn {
            kind: kind.into(),
            field: field.into(),
            entity: entity.into(),
        }
    }

    pub fn missing_entity(kind: impl Into<String>, entity: impl Into<String>) -> Self {
        LopfError::MissingEntity {
            kind: kind.into(),
            entity: entity.into(),
        }
    }
}
