//! Convenience re-exports of the most commonly used types and functions.
//!
//! ```
//! use modlinalg::prelude::*;
//! ```

pub use crate::error::{LinalgError, Result};
pub use crate::ring::{Modulus, Z, Zr};

pub use crate::glue::{det, det_z, inv, rank, similarity, trace, trace_z, CharPoly, MinPoly};

pub use crate::sparse::dixon::{multi_crt_ui as sparse_multi_crt_ui, multi_mod_ui as sparse_multi_mod_ui, solve_dixon};
pub use crate::sparse::fflu::{det_bareiss, det_cofactor, det_divisor, det_modular};
pub use crate::sparse::hnf::{hnf_classical, hnf_minors, hnf_modular, hnf_modular_eldiv, hnf_xgcd};
pub use crate::sparse::howell::howell_form;
pub use crate::sparse::lu::lu;
pub use crate::sparse::matrix::SparseMatrix;
pub use crate::sparse::nullspace::nullspace;
pub use crate::sparse::rref::rref;
pub use crate::sparse::solve::{can_solve, solve};
pub use crate::sparse::vector::SparseVector;

pub use crate::dense::matrix::DenseMatrix;

pub use crate::krylov::lanczos;
pub use crate::krylov::wiedemann;

pub use crate::mpoly::{divexact_array, divides_array, divrem_array, MPoly};
