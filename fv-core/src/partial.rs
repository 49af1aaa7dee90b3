//! Partial indexing: flat offsets for assignments restricted to a scope.
//!
//! A scope (`PartialKeys`, also called a tag) is an ordered list of variable ids.
//! The partial index of an assignment `x` under scope `keys` is the mixed-radix
//! number whose digits are `x[keys[0]], x[keys[1]], ...`, with `keys[0]` the least
//! significant digit:
//!
//! `to_index_partial(keys, space, x) = Σ_k x[keys[k]] * Π_{j<k} space[keys[j]]`
//!
//! This is the layout every basis table uses. Build tables with
//! [`PartialFactorsEnumerator`] (or [`to_factors_partial`]) and read them with
//! [`to_index_partial`]; both follow the rule above.

use std::collections::HashSet;

use thiserror::Error;

use crate::space::Factors;

/// Ordered list of variable ids a basis depends on.
pub type PartialKeys = Vec<usize>;

/// Scope validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("scope variable {var} is unknown to a space of {num_vars} variables")]
    UnknownVariable { var: usize, num_vars: usize },
    #[error("scope variable {var} appears more than once")]
    DuplicateVariable { var: usize },
    #[error("scope variable {var} has cardinality 0")]
    EmptyVariable { var: usize },
    #[error("table size for scope {keys:?} overflows usize")]
    SizeOverflow { keys: PartialKeys },
}

/// Check that every id in `keys` names a variable of `space`, exactly once.
pub fn validate_scope(keys: &[usize], space: &[usize]) -> Result<(), ScopeError> {
    let mut seen = HashSet::with_capacity(keys.len());
    for &var in keys {
        if var >= space.len() {
            return Err(ScopeError::UnknownVariable {
                var,
                num_vars: space.len(),
            });
        }
        if !seen.insert(var) {
            return Err(ScopeError::DuplicateVariable { var });
        }
        if space[var] == 0 {
            return Err(ScopeError::EmptyVariable { var });
        }
    }
    if checked_partial_size(keys, space).is_none() {
        return Err(ScopeError::SizeOverflow {
            keys: keys.to_vec(),
        });
    }
    Ok(())
}

/// Number of assignments of the scoped variables (the length of a basis table).
pub fn partial_size(keys: &[usize], space: &[usize]) -> usize {
    keys.iter().map(|&k| space[k]).product()
}

/// [`partial_size`], or `None` on overflow.
pub fn checked_partial_size(keys: &[usize], space: &[usize]) -> Option<usize> {
    keys.iter()
        .try_fold(1usize, |acc, &k| acc.checked_mul(*space.get(k)?))
}

/// Flat index of `factors` restricted to `keys`.
///
/// # Contract
/// `factors` must be a complete assignment of `space`, and `keys` a valid scope of it.
/// Both are checked in debug builds only; in release builds a violation yields an
/// unspecified index or a bounds-check panic.
#[inline]
pub fn to_index_partial(keys: &[usize], space: &[usize], factors: &[usize]) -> usize {
    debug_assert_eq!(
        space.len(),
        factors.len(),
        "assignment has {} values for a space of {} variables",
        factors.len(),
        space.len()
    );

    let mut result = 0usize;
    let mut multiplier = 1usize;
    for &k in keys {
        debug_assert!(
            factors[k] < space[k],
            "value {} of variable {} out of range for cardinality {}",
            factors[k],
            k,
            space[k]
        );
        result += multiplier * factors[k];
        multiplier *= space[k];
    }
    result
}

/// Inverse of [`to_index_partial`]: the values of the scoped variables, in scope order.
///
/// # Contract
/// `id < partial_size(keys, space)` (checked in debug builds only).
pub fn to_factors_partial(keys: &[usize], space: &[usize], mut id: usize) -> Factors {
    debug_assert!(
        id < partial_size(keys, space),
        "partial index {} out of range for scope {:?}",
        id,
        keys
    );

    keys.iter()
        .map(|&k| {
            let v = id % space[k];
            id /= space[k];
            v
        })
        .collect()
}

/// The values of `factors` at the scoped variables, in scope order.
pub fn restrict(keys: &[usize], factors: &[usize]) -> Factors {
    keys.iter().map(|&k| factors[k]).collect()
}

/// Iterates over every assignment of a scope, in table order.
///
/// The n-th item is the restricted assignment whose partial index is n, so
/// `.enumerate()` pairs each assignment with its table offset.
#[derive(Debug, Clone)]
pub struct PartialFactorsEnumerator {
    cards: Vec<usize>,
    current: Factors,
    next_id: usize,
    total: usize,
}

impl PartialFactorsEnumerator {
    pub fn new(keys: &[usize], space: &[usize]) -> Self {
        let cards: Vec<usize> = keys.iter().map(|&k| space[k]).collect();
        let total = cards.iter().product();
        Self {
            current: vec![0; cards.len()],
            cards,
            next_id: 0,
            total,
        }
    }

    /// Enumerate the full space (every variable, in order).
    pub fn full(space: &[usize]) -> Self {
        let keys: Vec<usize> = (0..space.len()).collect();
        Self::new(&keys, space)
    }
}

impl Iterator for PartialFactorsEnumerator {
    type Item = Factors;

    fn next(&mut self) -> Option<Factors> {
        if self.next_id >= self.total {
            return None;
        }
        let out = self.current.clone();
        self.next_id += 1;

        // Increment the least significant digit first, carrying upwards.
        for (v, &card) in self.current.iter_mut().zip(&self.cards) {
            *v += 1;
            if *v < card {
                break;
            }
            *v = 0;
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.total - self.next_id;
        (rem, Some(rem))
    }
}

impl ExactSizeIterator for PartialFactorsEnumerator {}
