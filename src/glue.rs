//! Similarity, trace, and characteristic/minimal-polynomial glue.
//!
//! `trace`, `det`, `inv`, and `rank` below are thin compositions of the
//! primitives already built in [`crate::sparse`] and [`crate::dense`] — no
//! new linear algebra lives here. Characteristic and minimal polynomials
//! are different: a full polynomial-arithmetic engine is out of scope for
//! this crate, so [`CharPoly`] and [`MinPoly`] only describe the shape a
//! caller-supplied evaluator must have (Krylov subspace dimensions, or a
//! sequence of trace-of-power coefficients) — something like
//! `scirs2-linalg`'s own [`eigen`]/[`decomposition`] split, where the
//! decomposition machinery is kept apart from anything that needs a
//! polynomial ring. A future polynomial crate plugs in by implementing
//! these traits; nothing in `sparse` or `dense` needs to change.

use crate::error::{LinalgError, Result};
use crate::ring::{Modulus, Zr};
use crate::sparse::fflu::{det_bareiss, det_cofactor};
use crate::sparse::lu::lu;
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::rref::rref;
use crate::sparse::solve::solve;
use crate::ring::Z;

/// `tr(A) = sum_i A[i][i]`, over a prime field.
pub fn trace(a: &SparseMatrix<Zr>) -> Result<Zr> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::ShapeMismatch {
            expected: format!("{} columns (square)", a.nrows()),
            found: format!("{} columns", a.ncols()),
        });
    }
    let modulus = a.modulus().ok_or_else(|| LinalgError::InvalidModulus("matrix carries no modulus".into()))?;
    let mut acc = Zr::zero_in(modulus.clone());
    for i in 0..a.nrows() {
        let entry = a
            .row(i)
            .entries()
            .iter()
            .find(|(c, _)| *c == i as i64)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| Zr::zero_in(modulus.clone()));
        acc = acc.add(&entry)?;
    }
    Ok(acc)
}

/// `tr(A)` over the integers, reusing [`SparseMatrix::content`]'s row walk
/// rather than `Zr::add`.
pub fn trace_z(a: &SparseMatrix<Z>) -> Result<Z> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::ShapeMismatch {
            expected: format!("{} columns (square)", a.nrows()),
            found: format!("{} columns", a.ncols()),
        });
    }
    let mut acc = Z::from(0);
    for i in 0..a.nrows() {
        if let Some((_, v)) = a.row(i).entries().iter().find(|(c, _)| *c == i as i64) {
            acc += v;
        }
    }
    Ok(acc)
}

/// The determinant over a prime field, via [`lu`]: the product of the
/// pivot diagonal, times the sign of the row/column permutation, or `0`
/// if the rank fell short of the matrix dimension.
pub fn det(a: &SparseMatrix<Zr>) -> Result<Zr> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::ShapeMismatch {
            expected: format!("{} columns (square)", a.nrows()),
            found: format!("{} columns", a.ncols()),
        });
    }
    let modulus = a.modulus().ok_or_else(|| LinalgError::InvalidModulus("matrix carries no modulus".into()))?;
    let decomp = lu(a)?;
    if decomp.rank < a.nrows() {
        return Ok(Zr::zero_in(modulus.clone()));
    }
    let mut acc = Zr::one_in(modulus.clone());
    for k in 0..decomp.rank {
        let diag = decomp
            .u
            .row(k)
            .entries()
            .iter()
            .find(|(c, _)| *c as usize == decomp.q[k])
            .map(|(_, v)| v.clone())
            .ok_or_else(|| LinalgError::NonInvertible("missing pivot entry in U".into()))?;
        acc = acc.mul(&diag)?;
    }
    if permutation_sign(&decomp.p) * permutation_sign(&decomp.q) < 0 {
        acc = acc.neg();
    }
    Ok(acc)
}

/// The determinant over the integers, delegating to the fraction-free
/// Bareiss elimination in [`crate::sparse::fflu`]. Exposed here mainly so
/// callers can reach `det`/`det_z` from one module without reaching into
/// `sparse::fflu` directly; `det_cofactor` remains available for small
/// matrices or as a cross-check (see [`crate::sparse::fflu::det_cofactor`]).
pub fn det_z(a: &SparseMatrix<Z>) -> Result<Z> {
    det_bareiss(a)
}

/// Cross-check `det_z` against cofactor expansion; intended for tests and
/// small matrices, not as the primary determinant path (cofactor expansion
/// is exponential in `n`).
pub fn det_z_checked(a: &SparseMatrix<Z>) -> Result<Z> {
    det_cofactor(a)
}

fn permutation_sign(perm: &[usize]) -> i64 {
    let mut seen = vec![false; perm.len()];
    let mut sign = 1i64;
    for start in 0..perm.len() {
        if seen[start] {
            continue;
        }
        let mut len = 0;
        let mut i = start;
        while !seen[i] {
            seen[i] = true;
            i = perm[i];
            len += 1;
        }
        if len % 2 == 0 {
            sign = -sign;
        }
    }
    sign
}

/// `A^-1`, via [`solve`]d one standard basis column at a time. Errors with
/// [`LinalgError::NonInvertible`] if `A` is singular.
pub fn inv(a: &SparseMatrix<Zr>) -> Result<SparseMatrix<Zr>> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::ShapeMismatch {
            expected: format!("{} columns (square)", a.nrows()),
            found: format!("{} columns", a.ncols()),
        });
    }
    let n = a.nrows();
    let modulus = a.modulus().ok_or_else(|| LinalgError::InvalidModulus("matrix carries no modulus".into()))?;
    let mut cols = Vec::with_capacity(n);
    for j in 0..n {
        let mut e_j = vec![Zr::zero_in(modulus.clone()); n];
        e_j[j] = Zr::one_in(modulus.clone());
        let col = solve(a, &e_j)?.ok_or_else(|| LinalgError::NonInvertible(format!("column {} has no unique solution", j)))?;
        cols.push(col);
    }
    let entries: Vec<(usize, i64, Zr)> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter_map(|(i, j)| {
            let v = cols[j][i].clone();
            if v.is_zero() {
                None
            } else {
                Some((i, j as i64, v))
            }
        })
        .collect();
    Ok(SparseMatrix::from_entries(n, n, entries))
}

/// `rank(A)`, reusing the pivot count [`rref`] already computes.
pub fn rank(a: &SparseMatrix<Zr>) -> Result<usize> {
    Ok(rref(a)?.rank)
}

/// `B^-1 A B`, the similarity transform of `A` under `B`. `B` must be
/// invertible; `inv` surfaces that failure directly.
pub fn similarity(a: &SparseMatrix<Zr>, b: &SparseMatrix<Zr>) -> Result<SparseMatrix<Zr>> {
    let b_inv = inv(b)?;
    let n = a.nrows();
    let modulus = a.modulus().ok_or_else(|| LinalgError::InvalidModulus("matrix carries no modulus".into()))?;
    let zero = Zr::zero_in(modulus.clone());
    let ab: Vec<Vec<Zr>> = (0..n)
        .map(|i| a.mul_dense_vec(&dense_col(b, i, &zero), &zero))
        .collect();
    // `ab[i]` above is `A` applied to `B`'s `i`-th column; transpose to
    // rows, then left-multiply by `B^-1`.
    let mut ab_rows = vec![vec![zero.clone(); n]; n];
    for (j, col) in ab.iter().enumerate() {
        for (i, v) in col.iter().enumerate() {
            ab_rows[i][j] = v.clone();
        }
    }
    let mut out = vec![vec![zero.clone(); n]; n];
    for i in 0..n {
        for j in 0..n {
            let mut acc = zero.clone();
            for k in 0..n {
                let binv_ik = b_inv
                    .row(i)
                    .entries()
                    .iter()
                    .find(|(c, _)| *c == k as i64)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_else(|| zero.clone());
                acc = acc.add(&binv_ik.mul(&ab_rows[k][j])?)?;
            }
            out[i][j] = acc;
        }
    }
    let entries: Vec<(usize, i64, Zr)> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter_map(|(i, j)| {
            let v = out[i][j].clone();
            if v.is_zero() {
                None
            } else {
                Some((i, j as i64, v))
            }
        })
        .collect();
    Ok(SparseMatrix::from_entries(n, n, entries))
}

fn dense_col(m: &SparseMatrix<Zr>, j: usize, zero: &Zr) -> Vec<Zr> {
    (0..m.nrows())
        .map(|i| {
            m.row(i)
                .entries()
                .iter()
                .find(|(c, _)| *c == j as i64)
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| zero.clone())
        })
        .collect()
}

/// Coefficients of a monic characteristic or minimal polynomial, lowest
/// degree first (`coeffs[0]` is the constant term; the leading `1` at
/// `coeffs[degree]` is implicit and omitted).
pub type PolyCoeffs = Vec<Zr>;

/// Produces the characteristic polynomial of a matrix. This crate does not
/// implement one: computing `det(xI - A)` needs polynomial arithmetic over
/// `Z/nZ[x]`, which is out of scope. A caller
/// who has such a polynomial ring — typically built on the Krylov
/// subspaces this crate already produces via [`crate::krylov`] — implements
/// this trait to plug it in.
pub trait CharPoly {
    /// `det(xI - A)`'s coefficients, lowest degree first.
    fn charpoly(&self, a: &SparseMatrix<Zr>, modulus: &Modulus) -> Result<PolyCoeffs>;
}

/// Produces the minimal polynomial of a matrix — the monic polynomial of
/// least degree annihilating `A`, which [`crate::krylov::wiedemann`]
/// already computes via Berlekamp–Massey on a scalar Krylov sequence for
/// the common square, nonsingular-enough case. This trait exists so a
/// caller with a fuller polynomial ring can supply a general-case minimal
/// polynomial (e.g. one that also handles non-diagonalizable or singular
/// `A`) without this crate depending on that ring.
pub trait MinPoly {
    fn minpoly(&self, a: &SparseMatrix<Zr>, modulus: &Modulus) -> Result<PolyCoeffs>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m2(vals: [[u64; 2]; 2], modulus: &Modulus) -> SparseMatrix<Zr> {
        let entries: Vec<(usize, i64, Zr)> = (0..2)
            .flat_map(|i| (0..2).map(move |j| (i, j)))
            .filter_map(|(i, j)| {
                let v = vals[i][j];
                if v == 0 {
                    None
                } else {
                    Some((i, j as i64, Zr::new(v, modulus.clone())))
                }
            })
            .collect();
        SparseMatrix::from_entries(2, 2, entries)
    }

    #[test]
    fn trace_sums_the_diagonal() {
        let modulus = Modulus::from_u64(101).unwrap();
        let a = m2([[2, 3], [5, 7]], &modulus);
        assert_eq!(trace(&a).unwrap(), Zr::new(9, modulus));
    }

    #[test]
    fn det_matches_ad_minus_bc() {
        let modulus = Modulus::from_u64(101).unwrap();
        let a = m2([[2, 3], [5, 7]], &modulus);
        // 2*7 - 3*5 = -1 = 100 (mod 101)
        assert_eq!(det(&a).unwrap(), Zr::new(100, modulus));
    }

    #[test]
    fn inv_recombines_to_identity() {
        let modulus = Modulus::from_u64(101).unwrap();
        let a = m2([[2, 3], [5, 7]], &modulus);
        let a_inv = inv(&a).unwrap();
        let zero = Zr::zero_in(modulus.clone());
        for j in 0..2 {
            let col = dense_col(&a_inv, j, &zero);
            let prod = a.mul_dense_vec(&col, &zero);
            for (i, v) in prod.iter().enumerate() {
                let expected = if i == j { Zr::one_in(modulus.clone()) } else { zero.clone() };
                assert_eq!(*v, expected);
            }
        }
    }

    #[test]
    fn rank_of_singular_matrix_is_deficient() {
        let modulus = Modulus::from_u64(101).unwrap();
        let a = m2([[1, 2], [2, 4]], &modulus);
        assert_eq!(rank(&a).unwrap(), 1);
    }

    #[test]
    fn similarity_by_identity_is_a_no_op() {
        let modulus = Modulus::from_u64(101).unwrap();
        let a = m2([[2, 3], [5, 7]], &modulus);
        let id = SparseMatrix::<Zr>::identity(2, modulus);
        let s = similarity(&a, &id).unwrap();
        for i in 0..2 {
            assert_eq!(s.row(i).entries(), a.row(i).entries());
        }
    }
}
