//! Errors for checked basis construction.

use fv_core::{PartialKeys, ScopeError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BasisError {
    #[error("invalid scope: {0}")]
    Scope(#[from] ScopeError),
    #[error("invalid action scope: {0}")]
    ActionScope(ScopeError),
    #[error("table has {got} values, scope {tag:?} needs {expected}")]
    TableLength {
        tag: PartialKeys,
        expected: usize,
        got: usize,
    },
    #[error("table is {rows}x{cols}, scopes need {expected_rows}x{expected_cols}")]
    TableShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("table row {row} has {got} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("basis {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: Box<BasisError>,
    },
}

impl BasisError {
    pub(crate) fn entry(index: usize, source: BasisError) -> Self {
        BasisError::Entry {
            index,
            source: Box::new(source),
        }
    }
}
