//! Nullspace basis over a prime field, read directly off RREF: one basis
//! vector per free column.

use crate::error::Result;
use crate::ring::Zr;
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::rref::rref;

/// A basis for `{x : Ax = 0}`, one vector per free column of `A`'s RREF.
pub fn nullspace(a: &SparseMatrix<Zr>) -> Result<Vec<Vec<Zr>>> {
    let reduced = rref(a)?;
    let ncols = a.ncols();
    let modulus = a
        .modulus()
        .expect("nullspace needs at least one non-zero entry to infer a modulus");
    let pivot_set: std::collections::HashSet<i64> = reduced.pivot_cols.iter().copied().collect();
    let free_cols: Vec<i64> = (0..ncols as i64).filter(|c| !pivot_set.contains(c)).collect();

    let mut basis = Vec::with_capacity(free_cols.len());
    for &fc in &free_cols {
        let mut v = vec![Zr::zero_in(modulus.clone()); ncols];
        v[fc as usize] = Zr::one_in(modulus.clone());
        for row in reduced.mat.rows().iter().take(reduced.rank) {
            let pivot_col = match row.leading() {
                Some((c, _)) => *c,
                None => continue,
            };
            let coeff = row
                .entries()
                .iter()
                .find(|(c, _)| *c == fc)
                .map(|(_, val)| val.clone());
            if let Some(coeff) = coeff {
                v[pivot_col as usize] = coeff.neg();
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
        let a = SparseMatrix::from_entries(
            1,
            3,
            vec![
                (0, 0, Zr::new(1, m.clone())),
                (0, 1, Zr::new(2, m.clone())),
                (0, 2, Zr::new(3, m.clone())),
            ],
        );
        let basis = nullspace(&a).unwrap();
        assert_eq!(basis.len(), 2);
        for v in &basis {
            let w = a.mul_dense_vec(v, &Zr::zero_in(m.clone()));
            assert!(w.iter().all(|x| x.is_zero()));
        }
    }
}
