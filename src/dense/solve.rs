//! Solving `Ax = b` over a prime field, dense counterpart of
//! [`crate::sparse::solve`]: full linear solve built on [`crate::dense::lu::rref`].

use crate::dense::lu::rref;
use crate::dense::matrix::DenseMatrix;
use crate::error::Result;
use crate::ring::Zr;

/// Solve `Ax = b`. Returns `None` if the system is inconsistent; free
/// variables (columns with no pivot) are set to zero.
pub fn solve(a: &DenseMatrix, b: &[Zr]) -> Result<Option<Vec<Zr>>> {
    let ncols = a.ncols();
    let modulus = a.modulus().clone();
    let mut aug_rows = Vec::with_capacity(a.nrows());
    for i in 0..a.nrows() {
        let mut row: Vec<Zr> = (0..ncols).map(|j| a.get(i, j).clone()).collect();
        row.push(b[i].clone());
        aug_rows.push(row);
    }
    let aug = DenseMatrix::from_rows(aug_rows, modulus.clone())?;
    let reduced = rref(&aug)?;

    for row in &reduced.rows {
        let only_rhs = row.iter().take(ncols).all(|v| v.is_zero()) && !row[ncols].is_zero();
        if only_rhs {
            return Ok(None);
        }
    }

    let mut x = vec![Zr::zero_in(modulus.clone()); ncols];
    for (k, &pivot_col) in reduced.pivot_cols.iter().enumerate() {
        x[pivot_col] = reduced.rows[k][ncols].clone();
    }
    Ok(Some(x))
}

/// `true` iff `Ax = b` has a solution.
pub fn can_solve(a: &DenseMatrix, b: &[Zr]) -> Result<bool> {
    Ok(solve(a, b)?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::Modulus;

    #[test]
    fn solves_full_rank_system() {
        let m = Modulus::from_u64(7).unwrap();
        let a = DenseMatrix::from_rows(
            vec![
                vec![Zr::new(2, m.clone()), Zr::new(1, m.clone())],
                vec![Zr::new(1, m.clone()), Zr::new(3, m.clone())],
            ],
            m.clone(),
        )
        .unwrap();
        let b = vec![Zr::new(5, m.clone()), Zr::new(4, m.clone())];
        let x = solve(&a, &b).unwrap().unwrap();
        let check = a.mul_vec(&x).unwrap();
        assert_eq!(check, b);
    }

    #[test]
    fn detects_inconsistent_system() {
        let m = Modulus::from_u64(5).unwrap();
        let a = DenseMatrix::from_rows(
            vec![
                vec![Zr::new(1, m.clone()), Zr::new(1, m.clone())],
                vec![Zr::new(2, m.clone()), Zr::new(2, m.clone())],
            ],
            m.clone(),
        )
        .unwrap();
        let b = vec![Zr::new(1, m.clone()), Zr::new(3, m.clone())];
        assert!(solve(&a, &b).unwrap().is_none());
    }
}
