//! Polynomial containers consumed by the `Expand`/`Factor`/`Collect`/`GCD`/
//! `PolynomialQuotient` builtins.
//!
//! Two representations are provided: a dense coefficient vector for polynomials in one
//! variable, and a sparse monomial map for several. Division and GCD are only defined for
//! the univariate form; multivariate input reaches them through a single-variable
//! projection in [`convert`].

pub mod convert;
pub mod multivariate;
pub mod univariate;

pub use multivariate::{Monomial, MultiPolynomial};
pub use univariate::Polynomial;

/// Coefficients with an absolute value below this threshold are treated as zero, absorbing
/// the rounding noise of repeated floating point division.
pub const EPSILON: f64 = 1e-10;
