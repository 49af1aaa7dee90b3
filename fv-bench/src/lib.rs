//! Deterministic fixtures shared by the benchmarks.

use fv_basis::{BasisError, BasisFunction, BasisMatrix, Factored2DMatrix, FactoredVector};
use nalgebra::DVector;

/// Simple deterministic xorshift64, no rand dependency.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// `num_vars` variables of cardinality `card`, one basis per sliding window of `width` variables.
///
/// # Panics
/// If `width > num_vars`.
pub fn chain_vector(
    num_vars: usize,
    card: usize,
    width: usize,
    seed: u64,
) -> Result<(Vec<usize>, FactoredVector), BasisError> {
    assert!(width <= num_vars, "window width {} exceeds {} variables", width, num_vars);
    let space = vec![card; num_vars];
    let mut rng = XorShift::new(seed);
    let bases = (0..=num_vars - width)
        .map(|start| {
            let tag: Vec<usize> = (start..start + width).collect();
            BasisFunction::from_fn(tag, &space, |_| rng.unit())
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((space, FactoredVector::new(bases)))
}

/// Like [`chain_vector`], with each basis also depending on one action variable.
///
/// # Panics
/// If `width > num_vars` or `num_actions == 0`.
pub fn chain_matrix(
    num_vars: usize,
    num_actions: usize,
    card: usize,
    width: usize,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>, Factored2DMatrix), BasisError> {
    assert!(width <= num_vars, "window width {} exceeds {} variables", width, num_vars);
    assert!(num_actions > 0, "chain_matrix needs at least one action variable");
    let space = vec![card; num_vars];
    let actions = vec![card; num_actions];
    let mut rng = XorShift::new(seed);
    let bases = (0..=num_vars - width)
        .map(|start| {
            let tag: Vec<usize> = (start..start + width).collect();
            let action_tag = vec![start % num_actions];
            BasisMatrix::from_fn(tag, action_tag, &space, &actions, |_, _| rng.unit())
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((space, actions, Factored2DMatrix::new(bases)))
}

pub fn gen_assignments(space: &[usize], n: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = XorShift::new(seed);
    (0..n)
        .map(|_| space.iter().map(|&c| rng.below(c)).collect())
        .collect()
}

pub fn gen_weights(n: usize, seed: u64) -> DVector<f64> {
    let mut rng = XorShift::new(seed);
    DVector::from_iterator(n, (0..n).map(|_| rng.unit() * 2.0 - 1.0))
}
