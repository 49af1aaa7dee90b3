//! fv-basis: Linear factored value functions.
//!
//! - [`FactoredVector`]: `V(x) = Σ_i table_i[ to_index_partial(tag_i, S, x) ]`
//! - [`Factored2DMatrix`]: `Q(x, a) = Σ_i table_i[ to_index_partial(tag_i, S, x), to_index_partial(action_tag_i, A, a) ]`
//!
//! Both can be evaluated with or without a coefficient vector, and scaled in place by
//! a coefficient vector or a scalar. A coefficient vector has one entry per basis,
//! optionally followed by a bias. Scaling by a biased vector spreads the bias evenly
//! over every table so that plain evaluation of the scaled function reproduces the
//! weighted evaluation of the original.
//!
//! Tables use the layout of [`fv_core::partial`]: the first scope variable is the
//! least significant digit. Build tables with `from_fn` to get that layout for free.

pub mod error;
pub mod load;
pub mod matrix;
pub mod vector;
pub mod weights;

pub use error::BasisError;
pub use load::{matrix_from_config, matrix_to_config, vector_from_config, vector_to_config};
pub use matrix::{BasisMatrix, Factored2DMatrix};
pub use vector::{BasisFunction, FactoredVector};
pub use weights::{bias_share, split_weights};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod vector_tests;
