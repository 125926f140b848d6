//! Scalar Wiedemann: a black-box solver that only ever touches `M`
//! through matrix-vector products, well suited to `M` too large or too
//! sparse to factor directly.
//!
//! For probe row `i`, the sequence `s_ij = (M^j b)_i` satisfies the same
//! linear recurrence as `M`'s minimal polynomial restricted to the
//! Krylov subspace generated by `b`; [`crate::krylov::berlekamp_massey::minimal_poly`]
//! recovers it, and if its constant term is non-zero the recurrence can
//! be solved for `x` directly.

use crate::error::{LinalgError, Result};
use crate::krylov::berlekamp_massey::minimal_poly;
use crate::ring::{Modulus, Zr};
use crate::sparse::matrix::SparseMatrix;
use rand::Rng;

/// `s[i][j] = (M^j b)_i` for `i` in `0..ns`, `j` in `0..len`.
fn make_sequences(m: &SparseMatrix<Zr>, b: &[Zr], ns: usize, len: usize, zero: &Zr) -> Vec<Vec<Zr>> {
    let mut s = vec![Vec::with_capacity(len); ns];
    let mut y = b.to_vec();
    for j in 0..len {
        if j > 0 {
            y = m.mul_dense_vec(&y, zero);
        }
        for (i, row) in s.iter_mut().enumerate() {
            row.push(y[i].clone());
        }
    }
    s
}

/// `x = sum_{i=0}^{len-1} coeffs[i] * M^i * b`.
fn make_sum(m: &SparseMatrix<Zr>, coeffs: &[Zr], b: &[Zr], zero: &Zr) -> Vec<Zr> {
    let mut x: Vec<Zr> = b.iter().map(|v| v.mul(&coeffs[0]).unwrap()).collect();
    let mut y = b.to_vec();
    for coeff in coeffs.iter().skip(1) {
        y = m.mul_dense_vec(&y, zero);
        for (xi, yi) in x.iter_mut().zip(y.iter()) {
            *xi = xi.add(&yi.mul(coeff).unwrap()).unwrap();
        }
    }
    x
}

/// Solve `Mx = b` for square `M` via scalar Wiedemann: probe a couple of
/// rows (`min(n, 2)`, matching the untried-block-Berlekamp fallback in
/// the original construction), and accept the first probe whose
/// recovered recurrence has non-zero constant term and whose candidate
/// solution verifies.
pub fn solve(m: &SparseMatrix<Zr>, b: &[Zr], modulus: &Modulus) -> Result<Vec<Zr>> {
    let n = m.nrows();
    if m.ncols() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: "square matrix".into(),
            found: format!("{}x{}", n, m.ncols()),
        });
    }
    let zero = Zr::zero_in(modulus.clone());
    if b.iter().all(|v| v.is_zero()) {
        return Ok(vec![zero; n]);
    }

    let ns = n.min(2);
    let len = 2 * n + 1;
    let s = make_sequences(m, b, ns, len, &zero);

    for seq in &s {
        let poly = minimal_poly(seq, modulus);
        if poly[0].is_zero() {
            continue;
        }
        let l = poly.len() - 1;
        // x = -1/C_0 * sum_{j=0}^{L-1} C_{j+1} * M^j * b
        let shifted = &poly[1..=l];
        let mut x = make_sum(m, shifted, b, &zero);
        let scale = poly[0].try_inv()?.neg();
        for xi in x.iter_mut() {
            *xi = xi.mul(&scale).unwrap();
        }
        let check = m.mul_dense_vec(&x, &zero);
        if check.as_slice() == b {
            return Ok(x);
        }
    }
    Err(LinalgError::IterativeFailure { iters: len })
}

/// Find a non-trivial vector in `ker M`: pick a random `x`, run the same
/// recipe on `b = Mx`, whose recovered recurrence gives a combination
/// `sum_{j=0}^{L} C_j M^j x` that Wiedemann's own derivation says lies in
/// the kernel with non-zero probability.
pub fn nullvector(m: &SparseMatrix<Zr>, modulus: &Modulus, rng: &mut impl Rng) -> Result<Vec<Zr>> {
    let n = m.nrows();
    if m.ncols() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: "square matrix".into(),
            found: format!("{}x{}", n, m.ncols()),
        });
    }
    let zero = Zr::zero_in(modulus.clone());
    let x0: Vec<Zr> = (0..n).map(|_| Zr::new(rng.gen_range(0..u64::MAX), modulus.clone())).collect();
    let b = m.mul_dense_vec(&x0, &zero);

    let ns = n.min(2);
    let len = 2 * n + 1;
    let s = make_sequences(m, &b, ns, len, &zero);

    for seq in &s {
        let poly = minimal_poly(seq, modulus);
        let x = make_sum(m, &poly, &x0, &zero);
        let check = m.mul_dense_vec(&x, &zero);
        if x.iter().any(|v| !v.is_zero()) && check.iter().all(|v| v.is_zero()) {
            return Ok(x);
        }
    }
    Err(LinalgError::IterativeFailure { iters: len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn solves_small_diagonal_system() {
        let m = Modulus::from_u64(101).unwrap();
        let a = SparseMatrix::from_entries(
            3,
            3,
            vec![
                (0, 0, Zr::new(2, m.clone())),
                (1, 1, Zr::new(3, m.clone())),
                (2, 2, Zr::new(5, m.clone())),
            ],
        );
        let b = vec![Zr::new(4, m.clone()), Zr::new(9, m.clone()), Zr::new(10, m.clone())];
        let x = solve(&a, &b, &m).unwrap();
        let check = a.mul_dense_vec(&x, &Zr::zero_in(m.clone()));
        assert_eq!(check, b);
    }

    #[test]
    fn nullvector_is_annihilated_and_nonzero() {
        let m = Modulus::from_u64(7).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![
                (0, 0, Zr::new(1, m.clone())),
                (0, 1, Zr::new(2, m.clone())),
                (1, 0, Zr::new(2, m.clone())),
                (1, 1, Zr::new(4, m.clone())),
            ],
        );
        let mut rng = SmallRng::seed_from_u64(7);
        let x = nullvector(&a, &m, &mut rng).unwrap();
        let check = a.mul_dense_vec(&x, &Zr::zero_in(m.clone()));
        assert!(check.iter().all(|v| v.is_zero()));
        assert!(x.iter().any(|v| !v.is_zero()));
    }
}
