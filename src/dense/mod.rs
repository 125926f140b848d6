//! Dense modular linear algebra: an `ndarray`-backed matrix over `Z/nZ`
//! with the same elimination/solve/nullspace/Howell-form surface as the
//! sparse engine, used once a sparse matrix has filled in enough to no
//! longer be worth representing as one.

pub mod howell;
pub mod lu;
pub mod matrix;
pub mod nullspace;
pub mod reduce;
pub mod solve;

pub use matrix::DenseMatrix;
