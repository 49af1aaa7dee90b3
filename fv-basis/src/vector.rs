//! Vector form: a state-value function as a sum of scoped tables.

use std::ops::{Mul, MulAssign};

use fv_core::{
    factor_space_size, partial_size, to_index_partial, validate_scope, PartialFactorsEnumerator,
    PartialKeys,
};
use nalgebra::DVector;

use crate::error::BasisError;
use crate::weights::{bias_share, split_weights};

/// A dense table over every assignment of the variables in `tag`.
///
/// `values[to_index_partial(tag, space, x)]` is the basis value at `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisFunction {
    pub tag: PartialKeys,
    pub values: DVector<f64>,
}

impl BasisFunction {
    /// Build a basis, checking the scope and the table length against `space`.
    pub fn new(
        tag: PartialKeys,
        values: DVector<f64>,
        space: &[usize],
    ) -> Result<Self, BasisError> {
        let basis = Self { tag, values };
        basis.validate(space)?;
        Ok(basis)
    }

    /// Build a basis by calling `f` on every assignment of `tag` (values in scope order).
    ///
    /// The table is filled in partial-index order, so it always agrees with
    /// [`BasisFunction::value`].
    pub fn from_fn<F>(tag: PartialKeys, space: &[usize], mut f: F) -> Result<Self, BasisError>
    where
        F: FnMut(&[usize]) -> f64,
    {
        validate_scope(&tag, space)?;
        let values = DVector::from_iterator(
            partial_size(&tag, space),
            PartialFactorsEnumerator::new(&tag, space).map(|x| f(&x)),
        );
        Ok(Self { tag, values })
    }

    pub fn validate(&self, space: &[usize]) -> Result<(), BasisError> {
        validate_scope(&self.tag, space)?;
        let expected = partial_size(&self.tag, space);
        if self.values.len() != expected {
            return Err(BasisError::TableLength {
                tag: self.tag.clone(),
                expected,
                got: self.values.len(),
            });
        }
        Ok(())
    }

    /// Table value for the full assignment `value`.
    #[inline]
    pub fn value(&self, space: &[usize], value: &[usize]) -> f64 {
        self.values[to_index_partial(&self.tag, space, value)]
    }
}

/// `V(x) = Σ_i bases[i].values[to_index_partial(bases[i].tag, space, x)]`.
///
/// The function owns its bases. No operation adds or removes a basis, changes a
/// scope, or resizes a table; scaling only rewrites table contents.
///
/// # Contracts
/// - Coefficient vectors must have `len()` or `len() + 1` entries (checked in all builds).
/// - Assignments must be complete and in range for the space passed in; this is
///   checked in debug builds only. In release builds a bad assignment yields an
///   unspecified value or an index panic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FactoredVector {
    bases: Vec<BasisFunction>,
}

impl FactoredVector {
    pub fn new(bases: Vec<BasisFunction>) -> Self {
        Self { bases }
    }

    pub fn bases(&self) -> &[BasisFunction] {
        &self.bases
    }

    pub fn into_bases(self) -> Vec<BasisFunction> {
        self.bases
    }

    /// Number of bases (the expected coefficient count, without bias).
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Check every basis against `space`.
    pub fn validate(&self, space: &[usize]) -> Result<(), BasisError> {
        for (index, b) in self.bases.iter().enumerate() {
            b.validate(space).map_err(|e| BasisError::entry(index, e))?;
        }
        Ok(())
    }

    /// Unweighted value at the full assignment `value`.
    pub fn get_value(&self, space: &[usize], value: &[usize]) -> f64 {
        let mut retval = 0.0;
        for b in &self.bases {
            retval += b.value(space, value);
        }
        retval
    }

    /// Weighted value at `value`; a trailing bias in `weights` is added once.
    ///
    /// # Panics
    /// If `weights` has neither `len()` nor `len() + 1` entries.
    pub fn get_weighted_value(
        &self,
        space: &[usize],
        value: &[usize],
        weights: &DVector<f64>,
    ) -> f64 {
        let (w, bias) = split_weights(weights.as_slice(), self.bases.len());

        let mut retval = bias.unwrap_or(0.0);
        for (b, &wi) in self.bases.iter().zip(w) {
            retval += b.value(space, value) * wi;
        }
        retval
    }

    /// Multiply each table by its coefficient, folding any bias into the tables.
    ///
    /// Afterwards `get_value(space, x)` equals the old `get_weighted_value(space, x, weights)`.
    /// A bias given to a function with no bases is dropped.
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

    /// Multiply every table by `v`.
    pub fn scale(&mut self, v: f64) -> &mut Self {
        for b in &mut self.bases {
            b.values *= v;
        }
        self
    }

    /// Materialize the function over the full joint space, indexed by [`fv_core::to_index`].
    ///
    /// The result has `factor_space_size(space)` entries; only use on small spaces.
    pub fn to_dense(&self, space: &[usize]) -> DVector<f64> {
        DVector::from_iterator(
            factor_space_size(space),
            PartialFactorsEnumerator::full(space).map(|x| self.get_value(space, &x)),
        )
    }
}

impl MulAssign<&DVector<f64>> for FactoredVector {
    fn mul_assign(&mut self, weights: &DVector<f64>) {
        self.scale_by_weights(weights);
    }
}

impl MulAssign<f64> for FactoredVector {
    fn mul_assign(&mut self, v: f64) {
        self.scale(v);
    }
}

impl Mul<&DVector<f64>> for FactoredVector {
    type Output = FactoredVector;

    fn mul(mut self, weights: &DVector<f64>) -> FactoredVector {
        self *= weights;
        self
    }
}

impl Mul<FactoredVector> for &DVector<f64> {
    type Output = FactoredVector;

    fn mul(self, mut rhs: FactoredVector) -> FactoredVector {
        rhs *= self;
        rhs
    }
}

impl Mul<f64> for FactoredVector {
    type Output = FactoredVector;

    fn mul(mut self, v: f64) -> FactoredVector {
        self *= v;
        self
    }
}

impl Mul<FactoredVector> for f64 {
    type Output = FactoredVector;

    fn mul(self, mut rhs: FactoredVector) -> FactoredVector {
        rhs *= self;
        rhs
    }
}
