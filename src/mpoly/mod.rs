//! Multivariate polynomial exact division over the integers: the dense
//! "array" method used when the product of per-variable degree bounds is
//! small enough to pack every monomial into a flat coefficient buffer.

pub mod array_div;

pub use array_div::{divexact_array, divides_array, divrem_array, CoeffBuf, MPoly, MAX_ARRAY_SIZE};
