//! Matrix form: an action-value function as a sum of state-action tables.
//!
//! Each basis selects a row from its state scope and a column from its action
//! scope; both indices follow the partial-index layout of [`fv_core::partial`].

use std::ops::{Mul, MulAssign};

use fv_core::{
    factor_space_size, partial_size, to_factors, to_factors_partial, to_index_partial,
    validate_scope, PartialKeys,
};
use nalgebra::{DMatrix, DVector};

use crate::error::BasisError;
use crate::weights::{bias_share, split_weights};

/// A dense table over (state-scope assignment, action-scope assignment) pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisMatrix {
    /// State variables; select the row.
    pub tag: PartialKeys,
    /// Action variables; select the column.
    pub action_tag: PartialKeys,
    pub values: DMatrix<f64>,
}

impl BasisMatrix {
    /// Build a basis, checking both scopes and the table shape.
    pub fn new(
        tag: PartialKeys,
        action_tag: PartialKeys,
        values: DMatrix<f64>,
        space: &[usize],
        actions: &[usize],
    ) -> Result<Self, BasisError> {
        let basis = Self {
            tag,
            action_tag,
            values,
        };
        basis.validate(space, actions)?;
        Ok(basis)
    }

    /// Build a basis by calling `f(state_values, action_values)` for every cell.
    ///
    /// Both argument slices are in scope order.
    pub fn from_fn<F>(
        tag: PartialKeys,
        action_tag: PartialKeys,
        space: &[usize],
        actions: &[usize],
        mut f: F,
    ) -> Result<Self, BasisError>
    where
        F: FnMut(&[usize], &[usize]) -> f64,
    {
        validate_scope(&tag, space)?;
        validate_scope(&action_tag, actions).map_err(BasisError::ActionScope)?;

        let rows = partial_size(&tag, space);
        let cols = partial_size(&action_tag, actions);
        let values = DMatrix::from_fn(rows, cols, |r, c| {
            f(
                &to_factors_partial(&tag, space, r),
                &to_factors_partial(&action_tag, actions, c),
            )
        });
        Ok(Self {
            tag,
            action_tag,
            values,
        })
    }

    pub fn validate(&self, space: &[usize], actions: &[usize]) -> Result<(), BasisError> {
        validate_scope(&self.tag, space)?;
        validate_scope(&self.action_tag, actions).map_err(BasisError::ActionScope)?;

        let expected_rows = partial_size(&self.tag, space);
        let expected_cols = partial_size(&self.action_tag, actions);
        if self.values.shape() != (expected_rows, expected_cols) {
            return Err(BasisError::TableShape {
                rows: self.values.nrows(),
                cols: self.values.ncols(),
                expected_rows,
                expected_cols,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn value(
        &self,
        space: &[usize],
        actions: &[usize],
        value: &[usize],
        action: &[usize],
    ) -> f64 {
        let fid = to_index_partial(&self.tag, space, value);
        let aid = to_index_partial(&self.action_tag, actions, action);
        self.values[(fid, aid)]
    }
}

/// `Q(x, a) = Σ_i bases[i].values[(pI(tag_i, S, x), pI(action_tag_i, A, a))]`.
///
/// Same ownership rules and contracts as [`crate::FactoredVector`], with one state
/// space and one action space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Factored2DMatrix {
    bases: Vec<BasisMatrix>,
}

impl Factored2DMatrix {
    pub fn new(bases: Vec<BasisMatrix>) -> Self {
        Self { bases }
    }

    pub fn bases(&self) -> &[BasisMatrix] {
        &self.bases
    }

    pub fn into_bases(self) -> Vec<BasisMatrix> {
        self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn validate(&self, space: &[usize], actions: &[usize]) -> Result<(), BasisError> {
        for (index, b) in self.bases.iter().enumerate() {
            b.validate(space, actions)
                .map_err(|e| BasisError::entry(index, e))?;
        }
        Ok(())
    }

    pub fn get_value(
        &self,
        space: &[usize],
        actions: &[usize],
        value: &[usize],
        action: &[usize],
    ) -> f64 {
        let mut retval = 0.0;
        for b in &self.bases {
            retval += b.value(space, actions, value, action);
        }
        retval
    }

    /// # Panics
    /// If `weights` has neither `len()` nor `len() + 1` entries.
    pub fn get_weighted_value(
        &self,
        space: &[usize],
        actions: &[usize],
        value: &[usize],
        action: &[usize],
        weights: &DVector<f64>,
    ) -> f64 {
        let (w, bias) = split_weights(weights.as_slice(), self.bases.len());

        let mut retval = bias.unwrap_or(0.0);
        for (b, &wi) in self.bases.iter().zip(w) {
            retval += b.value(space, actions, value, action) * wi;
        }
        retval
    }

    /// Multiply each table by its coefficient; a bias is spread over every cell of
    /// every table (`bias / len()` each).
    ///
    /// # Panics
    /// If `weights` has neither `len()` nor `len() + 1` entries.
    pub fn scale_by_weights(&mut self, weights: &DVector<f64>) -> &mut Self {
        let n = self.bases.len();
        let (w, bias) = split_weights(weights.as_slice(), n);
        let to_add = bias.map(|b| bias_share(b, n));

        for (b, &wi) in self.bases.iter_mut().zip(w) {
            b.values *= wi;
            if let Some(to_add) = to_add {
                b.values.add_scalar_mut(to_add);
            }
        }
        self
    }

    pub fn scale(&mut self, v: f64) -> &mut Self {
        for b in &mut self.bases {
            b.values *= v;
        }
        self
    }

    /// Full `|S| x |A|` table, rows by `to_index(space, x)`, columns by `to_index(actions, a)`.
    pub fn to_dense(&self, space: &[usize], actions: &[usize]) -> DMatrix<f64> {
        DMatrix::from_fn(factor_space_size(space), factor_space_size(actions), |r, c| {
            self.get_value(space, actions, &to_factors(space, r), &to_factors(actions, c))
        })
    }
}

impl MulAssign<&DVector<f64>> for Factored2DMatrix {
    fn mul_assign(&mut self, weights: &DVector<f64>) {
        self.scale_by_weights(weights);
    }
}

impl MulAssign<f64> for Factored2DMatrix {
    fn mul_assign(&mut self, v: f64) {
        self.scale(v);
    }
}

impl Mul<&DVector<f64>> for Factored2DMatrix {
    type Output = Factored2DMatrix;

    fn mul(mut self, weights: &DVector<f64>) -> Factored2DMatrix {
        self *= weights;
        self
    }
}

impl Mul<Factored2DMatrix> for &DVector<f64> {
    type Output = Factored2DMatrix;

    fn mul(self, mut rhs: Factored2DMatrix) -> Factored2DMatrix {
        rhs *= self;
        rhs
    }
}

impl Mul<f64> for Factored2DMatrix {
    type Output = Factored2DMatrix;

    fn mul(mut self, v: f64) -> Factored2DMatrix {
        self *= v;
        self
    }
}

impl Mul<Factored2DMatrix> for f64 {
    type Output = Factored2DMatrix;

    fn mul(self, mut rhs: Factored2DMatrix) -> Factored2DMatrix {
        rhs *= self;
        rhs
    }
}
