//! Factor spaces and full-space indexing.
//!
//! A factor space is the list of per-variable cardinalities. A joint assignment
//! (`Factors`) holds one value per variable, each in `0..space[i]`.
//!
//! ### Mixed-radix convention
//! Variable 0 is the **least significant** digit:
//!
//! `to_index(space, x) = x[0] + space[0] * (x[1] + space[1] * (x[2] + ...))`
//!
//! The partial routines in [`crate::partial`] use the same rule with the scope order
//! standing in for variable order. A table filled under one convention and read
//! under another returns wrong values without any detectable error.

/// A factor space (cardinalities) or a joint assignment (values), depending on use.
pub type Factors = Vec<usize>;

/// Number of joint assignments of `space`.
///
/// The empty space has exactly one (empty) assignment.
pub fn factor_space_size(space: &[usize]) -> usize {
    space.iter().product()
}

/// Whether `factors` is a complete assignment of `space`.
pub fn is_valid_assignment(space: &[usize], factors: &[usize]) -> bool {
    space.len() == factors.len() && factors.iter().zip(space).all(|(&v, &card)| v < card)
}

/// Flat index of a full joint assignment.
///
/// # Contract
/// `factors` must be a complete assignment of `space` (checked in debug builds only).
pub fn to_index(space: &[usize], factors: &[usize]) -> usize {
    debug_assert_eq!(
        space.len(),
        factors.len(),
        "assignment has {} values for a space of {} variables",
        factors.len(),
        space.len()
    );

    let mut result = 0usize;
    let mut multiplier = 1usize;
    for (&v, &card) in factors.iter().zip(space) {
        debug_assert!(v < card, "value {} out of range for cardinality {}", v, card);
        result += multiplier * v;
        multiplier *= card;
    }
    result
}

/// Inverse of [`to_index`].
///
/// # Contract
/// `id < factor_space_size(space)` (checked in debug builds only).
pub fn to_factors(space: &[usize], mut id: usize) -> Factors {
    debug_assert!(
        id < factor_space_size(space),
        "index {} out of range for space {:?}",
        id,
        space
    );

    space
        .iter()
        .map(|&card| {
            let v = id % card;
            id /= card;
            v
        })
        .collect()
}
