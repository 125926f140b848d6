//! Solving `Ax = b` over a prime field: full linear solve built on
//! [`crate::sparse::rref`], plus standalone triangular solvers used by the
//! Dixon and HNF pipelines.

use crate::error::Result;
use crate::ring::Zr;
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::rref::rref;
use crate::sparse::vector::SparseVector;

/// Solve `Ax = b`. Returns `None` if the system is inconsistent; free
/// variables (columns with no pivot) are set to zero, matching the
/// "any particular solution" contract of a rank-deficient solve.
pub fn solve(a: &SparseMatrix<Zr>, b: &[Zr]) -> Result<Option<Vec<Zr>>> {
    let ncols = a.ncols();
    let modulus = b
        .first()
        .map(|v| v.modulus().clone())
        .or_else(|| a.modulus())
        .expect("solve needs at least one ring element to know the modulus");
    let b_mat = SparseMatrix::from_entries(
        a.nrows(),
        1,
        b.iter()
            .enumerate()
            .filter(|(_, v)| !v.is_zero())
            .map(|(i, v)| (i, 0i64, v.clone()))
            .collect(),
    );
    let aug = a.concat_horizontal(&b_mat)?;
    let reduced = rref(&aug)?;

    for row in reduced.mat.rows() {
        let only_rhs = row
            .entries()
            .iter()
            .all(|(c, _)| *c as usize == ncols);
        if only_rhs && !row.is_zero() {
            return Ok(None);
        }
    }

    let mut x = vec![Zr::zero_in(modulus.clone()); ncols];
    for row in reduced.mat.rows() {
        if let Some((pivot_col, _)) = row.leading() {
            if (*pivot_col as usize) < ncols {
                let rhs = row
                    .entries()
                    .iter()
                    .find(|(c, _)| *c as usize == ncols)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_else(|| Zr::zero_in(modulus.clone()));
                x[*pivot_col as usize] = rhs;
            }
        }
    }
    Ok(Some(x))
}

/// `true` iff `Ax = b` has a solution.
pub fn can_solve(a: &SparseMatrix<Zr>, b: &[Zr]) -> Result<bool> {
    Ok(solve(a, b)?.is_some())
}

/// Forward substitution: `l` is unit lower-triangular (`l[i][i] = 1`),
/// `rank x rank`. Solves `Ly = rhs`.
pub fn solve_tril(l: &SparseMatrix<Zr>, rhs: &[Zr]) -> Vec<Zr> {
    let n = l.nrows();
    let modulus = rhs[0].modulus().clone();
    let mut y = vec![Zr::zero_in(modulus); n];
    for i in 0..n {
        let mut acc = rhs[i].clone();
        for (c, v) in l.row(i).entries() {
            let c = *c as usize;
            if c < i {
                acc = acc.sub(&v.mul(&y[c]).unwrap()).unwrap();
            }
        }
        y[i] = acc;
    }
    y
}

/// Back substitution against an upper-triangular system whose `k`-th row
/// has its pivot at column `pivot_cols[k]`, with every earlier pivot
/// column already zero in that row (the staircase shape sparse LU's `U`
/// produces). Non-pivot columns are left at zero (free variables).
pub fn solve_triu(u: &SparseMatrix<Zr>, pivot_cols: &[usize], rhs: &[Zr], ncols: usize) -> Result<Vec<Zr>> {
    let modulus = rhs[0].modulus().clone();
    let mut x = vec![Zr::zero_in(modulus.clone()); ncols];
    for k in (0..u.nrows()).rev() {
        let pivot_col = pivot_cols[k];
        let row = u.row(k);
        let mut acc = rhs[k].clone();
        let mut pivot_val = None;
        for (c, v) in row.entries() {
            let c = *c as usize;
            if c == pivot_col {
                pivot_val = Some(v.clone());
            } else {
                acc = acc.sub(&v.mul(&x[c]).unwrap()).unwrap();
            }
        }
        let pivot_val = pivot_val.expect("pivot column must be non-zero in its own row");
        x[pivot_col] = acc.mul(&pivot_val.try_inv()?).unwrap();
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::Modulus;

    #[test]
    fn solves_full_rank_system() {
        let m = Modulus::from_u64(7).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![
                (0, 0, Zr::new(2, m.clone())),
                (0, 1, Zr::new(1, m.clone())),
                (1, 0, Zr::new(1, m.clone())),
                (1, 1, Zr::new(3, m.clone())),
            ],
        );
        let b = vec![Zr::new(5, m.clone()), Zr::new(4, m.clone())];
        let x = solve(&a, &b).unwrap().unwrap();
        let check = a.mul_dense_vec(&x, &Zr::zero_in(m.clone()));
        assert_eq!(check, b);
    }

    #[test]
    fn detects_inconsistent_system() {
        let m = Modulus::from_u64(5).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![
                (0, 0, Zr::new(1, m.clone())),
                (0, 1, Zr::new(1, m.clone())),
                (1, 0, Zr::new(2, m.clone())),
                (1, 1, Zr::new(2, m.clone())),
            ],
        );
        let b = vec![Zr::new(1, m.clone()), Zr::new(3, m.clone())];
        assert!(solve(&a, &b).unwrap().is_none());
    }
}
