//! fv-core: Factor spaces, mixed-radix indexing, and function configuration.
//!
//! Everything that turns a (possibly partial) joint assignment into a flat table
//! offset lives here, so table builders and evaluators cannot disagree on layout.

pub mod config;
pub mod partial;
pub mod space;

pub use config::{BasisConfig, ConfigError, FunctionConfig, QBasisConfig};
pub use partial::{
    checked_partial_size, partial_size, restrict, to_factors_partial, to_index_partial,
    validate_scope, PartialFactorsEnumerator, PartialKeys, ScopeError,
};
pub use space::{factor_space_size, is_valid_assignment, to_factors, to_index, Factors};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
