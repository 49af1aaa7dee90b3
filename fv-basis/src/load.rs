//! Conversion between [`FunctionConfig`] sections and validated functions.

use fv_core::{BasisConfig, FunctionConfig, QBasisConfig};
use nalgebra::{DMatrix, DVector};

use crate::error::BasisError;
use crate::matrix::{BasisMatrix, Factored2DMatrix};
use crate::vector::{BasisFunction, FactoredVector};

/// Build the state-value function described by `config.bases`.
pub fn vector_from_config(config: &FunctionConfig) -> Result<FactoredVector, BasisError> {
    let bases = config
        .bases
        .iter()
        .enumerate()
        .map(|(index, b)| {
            BasisFunction::new(
                b.scope.clone(),
                DVector::from_column_slice(&b.values),
                &config.state_space,
            )
            .map_err(|e| BasisError::entry(index, e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FactoredVector::new(bases))
}

/// Build the action-value function described by `config.q_bases`.
pub fn matrix_from_config(config: &FunctionConfig) -> Result<Factored2DMatrix, BasisError> {
    let bases = config
        .q_bases
        .iter()
        .enumerate()
        .map(|(index, b)| {
            let values = rows_to_matrix(&b.values).map_err(|e| BasisError::entry(index, e))?;
            BasisMatrix::new(
                b.state_scope.clone(),
                b.action_scope.clone(),
                values,
                &config.state_space,
                &config.action_space,
            )
            .map_err(|e| BasisError::entry(index, e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Factored2DMatrix::new(bases))
}

pub fn vector_to_config(v: &FactoredVector) -> Vec<BasisConfig> {
    v.bases()
        .iter()
        .map(|b| BasisConfig {
            scope: b.tag.clone(),
            values: b.values.iter().copied().collect(),
        })
        .collect()
}

pub fn matrix_to_config(m: &Factored2DMatrix) -> Vec<QBasisConfig> {
    m.bases()
        .iter()
        .map(|b| QBasisConfig {
            state_scope: b.tag.clone(),
            action_scope: b.action_tag.clone(),
            values: b
                .values
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
        })
        .collect()
}

fn rows_to_matrix(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, BasisError> {
    let ncols = rows.first().map_or(0, Vec::len);
    for (row, r) in rows.iter().enumerate() {
        if r.len() != ncols {
            return Err(BasisError::RaggedRow {
                row,
                expected: ncols,
                got: r.len(),
            });
        }
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(rows.len(), ncols, &flat))
}
