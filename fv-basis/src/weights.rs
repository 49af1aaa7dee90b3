//! Coefficient vectors: one weight per basis, plus an optional trailing bias.

/// Split `weights` into the per-basis coefficients and the bias, if present.
///
/// # Panics
/// Panics unless `weights.len()` is `n_bases` or `n_bases + 1`. A mismatch is a
/// caller bug, so this is checked in every build.
#[inline]
pub fn split_weights(weights: &[f64], n_bases: usize) -> (&[f64], Option<f64>) {
    assert!(
        weights.len() == n_bases || weights.len() == n_bases + 1,
        "expected {} or {} coefficients, got {}",
        n_bases,
        n_bases + 1,
        weights.len()
    );

    match weights.split_at(n_bases) {
        (w, [bias]) => (w, Some(*bias)),
        (w, _) => (w, None),
    }
}

/// The amount added to every table element when a bias is folded into the bases.
///
/// Each assignment reads exactly one element per basis, so `n_bases` shares of
/// `bias / n_bases` add back up to `bias` whatever the per-basis weights were.
/// With no bases there is nowhere to keep the bias and the share is zero.
#[inline]
pub fn bias_share(bias: f64, n_bases: usize) -> f64 {
    if n_bases == 0 {
        0.0
    } else {
        bias / n_bases as f64
    }
}
