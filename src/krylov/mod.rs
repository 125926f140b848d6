//! Iterative black-box Krylov-subspace solvers over a prime field:
//! scalar and block Wiedemann (minimal polynomial via Berlekamp–Massey),
//! scalar and block Lanczos (symmetrization via `MᵀM`), and
//! random-nullvector assembly built on top of any of them. Useful when
//! `A` is large and sparse enough that even Markowitz-pivoted elimination
//! is too expensive, since every step costs only a handful of
//! matrix-vector products.

pub mod berlekamp_massey;
pub(crate) mod block_matrix;
pub mod block_lanczos;
pub mod block_wiedemann;
pub mod lanczos;
pub mod nullspace;
pub mod wiedemann;
