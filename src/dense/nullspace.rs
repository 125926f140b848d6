//! Nullspace basis over a prime field, dense counterpart of
//! [`crate::sparse::nullspace`]: read directly off RREF, one basis vector
//! per free column.

use crate::dense::lu::rref;
use crate::dense::matrix::DenseMatrix;
use crate::error::Result;
use crate::ring::Zr;

/// A basis for `{x : Ax = 0}`, one vector per free column of `A`'s RREF.
pub fn nullspace(a: &DenseMatrix) -> Result<Vec<Vec<Zr>>> {
    let reduced = rref(a)?;
    let ncols = a.ncols();
    let modulus = a.modulus().clone();
    let pivot_set: std::collections::HashSet<usize> = reduced.pivot_cols.iter().copied().collect();
    let free_cols: Vec<usize> = (0..ncols).filter(|c| !pivot_set.contains(c)).collect();

    let mut basis = Vec::with_capacity(free_cols.len());
    for &fc in &free_cols {
        let mut v = vec![Zr::zero_in(modulus.clone()); ncols];
        v[fc] = Zr::one_in(modulus.clone());
        for (k, &pivot_col) in reduced.pivot_cols.iter().enumerate() {
            let coeff = reduced.rows[k][fc].clone();
            if !coeff.is_zero() {
                v[pivot_col] = coeff.neg();
            }
        }
        basis.push(v);
    }
    Ok(basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::Modulus;

    #[test]
    fn basis_vectors_are_annihilated_by_a() {
        let m = Modulus::from_u64(7).unwrap();
        let a = DenseMatrix::from_rows(
            vec![vec![Zr::new(1, m.clone()), Zr::new(2, m.clone()), Zr::new(3, m.clone())]],
            m.clone(),
        )
        .unwrap();
        let basis = nullspace(&a).unwrap();
        assert_eq!(basis.len(), 2);
        for v in &basis {
            let w = a.mul_vec(v).unwrap();
            assert!(w.iter().all(|x| x.is_zero()));
        }
    }
}
