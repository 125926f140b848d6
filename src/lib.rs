//! Exact linear algebra over `Z/nZ` and `Z`.
//!
//! This crate provides exact (not floating-point) linear algebra over a
//! prime field `Z/pZ` and over the integers `Z`: dense and sparse Gaussian
//! elimination, reduced row echelon form, Howell form, nullspace and
//! linear-solve, Hermite Normal Form (four variants), fraction-free
//! LU/Bareiss determinants, Dixon p-adic lifting for rational solutions,
//! black-box Krylov solvers (Wiedemann and Lanczos, scalar and block), and
//! a multivariate polynomial exact-division engine.
//!
//! ## Overview
//!
//! * [`ring`] - the coefficient rings: `Zr` (normalized `Z/nZ` elements)
//!   and the `Z` alias for arbitrary-precision integers
//! * [`collections`] - the index structures the sparse solvers are built
//!   on: an integer-keyed hash map and a min-heap keyed by live index
//! * [`sparse`] - sparse matrices/vectors over `Zr` and `Z`: LU, RREF,
//!   solve, nullspace, Howell form, HNF, fraction-free determinants, Dixon
//!   lifting, and multi-modulus/CRT helpers
//! * [`dense`] - the dense-matrix counterparts of the sparse solvers, used
//!   when a matrix is small or already dense
//! * [`krylov`] - black-box iterative solvers (Wiedemann, Lanczos, scalar
//!   and block) for matrices too large or too sparse for elimination
//! * [`mpoly`] - multivariate polynomial exact division via the packed
//!   "array" method
//! * [`glue`] - trace, determinant, inverse, rank, and similarity built
//!   from the above, plus a trait boundary for characteristic/minimal
//!   polynomials
//!
//! ## Examples
//!
//! Exact determinant and solve over a prime field:
//!
//! ```
//! use modlinalg::ring::{Modulus, Zr};
//! use modlinalg::sparse::matrix::SparseMatrix;
//! use modlinalg::glue::det;
//!
//! let m = Modulus::from_u64(101).unwrap();
//! let a = SparseMatrix::from_entries(
//!     2, 2,
//!     vec![
//!         (0, 0, Zr::new(2, m.clone())),
//!         (0, 1, Zr::new(3, m.clone())),
//!         (1, 0, Zr::new(5, m.clone())),
//!         (1, 1, Zr::new(7, m.clone())),
//!     ],
//! );
//! let d = det(&a).unwrap();
//! assert_eq!(d, Zr::new(100, m)); // 2*7 - 3*5 = -1 = 100 (mod 101)
//! ```
//!
//! Fraction-free determinant over the integers, via Bareiss elimination:
//!
//! ```
//! use modlinalg::ring::Z;
//! use modlinalg::sparse::matrix::SparseMatrix;
//! use modlinalg::sparse::fflu::det_bareiss;
//!
//! let a = SparseMatrix::from_entries(
//!     2, 2,
//!     vec![
//!         (0, 0, Z::from(2)),
//!         (0, 1, Z::from(3)),
//!         (1, 0, Z::from(5)),
//!         (1, 1, Z::from(7)),
//!     ],
//! );
//! assert_eq!(det_bareiss(&a).unwrap(), Z::from(-1));
//! ```

pub mod collections;
pub mod dense;
pub mod error;
pub mod glue;
pub mod krylov;
pub mod mpoly;
pub mod ring;
pub mod sparse;

pub mod prelude;

pub use error::{LinalgError, Result};
pub use ring::{Modulus, Z, Zr};
