//! Block Wiedemann: Coppersmith's generalization of scalar Wiedemann from
//! a single probe sequence to a `block_size`-wide one, amortizing the
//! `M`-product cost over `block_size` directions per step instead of one.
//!
//! Where scalar Wiedemann recovers a single annihilating polynomial via
//! Berlekamp–Massey on a scalar sequence `s_j = (M^j y)_0`, the block
//! construction tracks `2b` polynomials at once (`b` "generator" rows and
//! `b` "auxiliary" rows) against the `b x b` block sequence
//! `S_k = (M^{k+1} Y_0)^T` restricted to its top `b` rows, and runs a
//! specialized Gaussian elimination (pivoting by minimal row degree) to
//! advance all `2b` polynomials by one degree per step. This is
//! Coppersmith's block Berlekamp–Massey, not `block_size` independent
//! scalar attempts.

use crate::error::{LinalgError, Result};
use crate::krylov::block_matrix::{self, Mat};
use crate::ring::{Modulus, Zr};
use crate::sparse::matrix::SparseMatrix;
use rand::Rng;

/// `S[iter] = transpose(top b x b block of M^{iter+1} Y0)` for `iter` in
/// `0..ns`, ping-ponging between two `n x b` scratch buffers.
fn make_block_sequences(m: &SparseMatrix<Zr>, my0: &Mat, ns: usize, b: usize, zero: &Zr) -> Vec<Mat> {
    let mut s = Vec::with_capacity(ns);
    let mut y = [my0.clone(), block_matrix::zero(my0.len(), b, zero)];
    let mut i = 0usize;
    for iter in 0..ns {
        if iter > 0 {
            y[i] = block_matrix::sparse_mul_dense(m, &y[1 - i], zero);
        }
        let top: Mat = y[i][..b].to_vec();
        s.push(block_matrix::transpose(&top));
        i = 1 - i;
    }
    s
}

/// Row-reduce the `2b x 3b` augmented matrix `[D | I]`, choosing among
/// the `b` "generator" rows the one of minimal degree as pivot for each
/// column, promoting an auxiliary row into the generator set (or folding
/// a generator row into its paired auxiliary row) as needed. `d` holds
/// the current degree of each of the `2b` rows and is permuted in step
/// with the matrix rows.
fn coppersmith_aux_gauss(aug: &mut [Vec<Zr>], d: &mut [i64], b: usize) {
    let mut gamma = vec![true; b];
    for pc in 0..b {
        let mut pr = b + pc;
        for r in 0..b {
            if gamma[r] && !aug[r][pc].is_zero() && d[r] < d[pr] {
                pr = r;
            }
        }
        if aug[pr][pc].is_zero() {
            continue;
        }

        if pr != b + pc {
            d.swap(pr, b + pc);
            if !aug[b + pc][pr].is_zero() {
                aug.swap(pr, b + pc);
                pr = b + pc;
            } else {
                let absorbed = aug[pr].clone();
                for (dst, src) in aug[b + pc].iter_mut().zip(absorbed.iter()) {
                    *dst = dst.add(src).unwrap();
                }
                gamma[pr] = false;
            }
        }

        let cinv = aug[pr][pc].try_inv().unwrap();
        let pivot_row = aug[pr].clone();
        for r in 0..b {
            if gamma[r] && !aug[r][pc].is_zero() {
                let factor = aug[r][pc].mul(&cinv).unwrap().neg();
                for (dst, src) in aug[r].iter_mut().zip(pivot_row.iter()) {
                    *dst = dst.add(&src.mul(&factor).unwrap()).unwrap();
                }
            }
        }
    }
}

/// `-1` if the current degree sum is still short of `delta`, `1` on
/// success, `0` on outright failure (insufficient total degree).
fn coppersmith_stopping_criterion(d: &[i64], delta: i64, b: usize) -> i32 {
    let mut sum_gen: i64 = d[0];
    for &v in &d[1..b] {
        sum_gen += v;
    }
    let mut delta = delta - sum_gen;
    if delta < 0 {
        return 0;
    }
    let mut max_gen = d[0];
    for &v in &d[1..b] {
        if v > max_gen {
            max_gen = v;
        }
    }
    delta += max_gen;
    let mut min_aux = d[b];
    for &v in &d[b + 1..2 * b] {
        if v < min_aux {
            min_aux = v;
        }
    }
    delta -= min_aux;
    if delta < 0 {
        1
    } else {
        -1
    }
}

/// Iteratively builds the `2b x b` polynomial matrix `F` (coefficients
/// indexed by degree) against the block sequence `s`, advancing degree
/// by degree until [`coppersmith_stopping_criterion`] fires. On return,
/// `s` has been overwritten in place: `s[k][r]` (row `r`, matrix index
/// `k`) holds the `k`-th coefficient of the `r`-th recovered generator
/// polynomial, reversed so degree `d[r]` is first.
fn find_block_min_poly(s: &mut [Mat], d: &mut [i64], n_terms: usize, delta: i64, b: usize, zero: &Zr, one: &Zr) -> i32 {
    let mut f: Vec<Mat> = vec![block_matrix::zero(2 * b, b, zero)];
    for i in 0..b {
        d[i] = 0;
        d[b + i] = 1;
        f[0][i][i] = one.clone();
    }

    let mut f_len = 1usize;
    let mut ret = -1i32;
    let mut t = 0usize;
    while t < n_terms && ret == -1 {
        let mut disc = block_matrix::zero(2 * b, b, zero);
        for k in 0..=t {
            let prod = block_matrix::mul(&f[k], &s[t - k], zero);
            block_matrix::add_assign(&mut disc, &prod);
        }
        let mut aug: Vec<Vec<Zr>> = (0..2 * b)
            .map(|r| {
                let mut row = disc[r].clone();
                for c in 0..2 * b {
                    row.push(if c == r { one.clone() } else { zero.clone() });
                }
                row
            })
            .collect();
        coppersmith_aux_gauss(&mut aug, d, b);
        let tau: Mat = aug.iter().map(|row| row[b..3 * b].to_vec()).collect();

        f.push(block_matrix::zero(2 * b, b, zero));
        f_len += 1;
        for k in (1..f_len).rev() {
            let prev = f[k - 1].clone();
            f[k] = block_matrix::mul(&tau, &prev, zero);
        }
        for k in 0..f_len {
            for r in 0..b {
                if k < f_len - 1 {
                    f[k][r] = f[k + 1][r].clone();
                } else {
                    f[k][r] = vec![zero.clone(); b];
                }
            }
        }
        for r in b..2 * b {
            f[0][r] = vec![zero.clone(); b];
            d[r] += 1;
        }
        ret = coppersmith_stopping_criterion(d, delta, b);
        t += 1;
    }

    for r in 0..b {
        for k in 0..=(d[r] as usize) {
            s[k][r] = f[d[r] as usize - k][r].clone();
        }
    }
    ret
}

/// `x = sum_{iter=0}^{d[l]-dd} M^{iter} Z0 * S[dd+iter].row(l)`, skipping
/// leading all-zero coefficients (`dd`) in row `l` of the recovered
/// generator polynomial.
fn make_block_sum(s: &[Mat], d: &[i64], m: &SparseMatrix<Zr>, z0: &Mat, l: usize, n: usize, zero: &Zr) -> Vec<Zr> {
    let mut dd = 0usize;
    while s[dd][l].iter().all(|v| v.is_zero()) {
        dd += 1;
    }

    let b = z0.first().map(|row| row.len()).unwrap_or(0);
    let mut z = [z0.clone(), block_matrix::zero(n, b, zero)];
    let mut x = vec![zero.clone(); n];
    let mut i = 0usize;
    let dl = d[l] as usize;
    for iter in 0..=(dl - dd) {
        if iter > 0 {
            z[i] = block_matrix::sparse_mul_dense(m, &z[1 - i], zero);
        }
        let xi = block_matrix::mul_vec(&z[i], &s[dd + iter][l], zero);
        for (xv, xiv) in x.iter_mut().zip(xi.iter()) {
            *xv = xv.add(xiv).unwrap();
        }
        i = 1 - i;
    }
    x
}

/// Find a non-trivial vector in `ker M` for square `M` via block
/// Wiedemann: draw a random `n x block_size` block `Y0`, build its block
/// sequence against `M`, recover the generator polynomials, then test
/// each of the `block_size` reconstructed combinations until one is
/// non-zero and annihilated.
pub fn nullvector(m: &SparseMatrix<Zr>, modulus: &Modulus, block_size: usize, rng: &mut impl Rng) -> Result<Vec<Zr>> {
    let n = m.nrows();
    if m.ncols() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: "square matrix".into(),
            found: format!("{}x{}", n, m.ncols()),
        });
    }
    let b = block_size.max(1);
    let zero = Zr::zero_in(modulus.clone());
    let one = Zr::one_in(modulus.clone());

    let mut y0;
    loop {
        y0 = (0..n)
            .map(|_| (0..b).map(|_| Zr::new(rng.gen_range(0..u64::MAX), modulus.clone())).collect::<Vec<_>>())
            .collect::<Mat>();
        if !block_matrix::is_zero(&y0) {
            break;
        }
    }
    let my0 = block_matrix::sparse_mul_dense(m, &y0, &zero);

    let ns = 2 * n / b + 3;
    let mut s = make_block_sequences(m, &my0, ns, b, &zero);
    let mut d = vec![0i64; 2 * b];
    find_block_min_poly(&mut s, &mut d, ns, n as i64, b, &zero, &one);

    for l in 0..b {
        let x = make_block_sum(&s, &d, m, &y0, l, n, &zero);
        let check = m.mul_dense_vec(&x, &zero);
        if x.iter().any(|v| !v.is_zero()) && check.iter().all(|v| v.is_zero()) {
            return Ok(x);
        }
    }
    Err(LinalgError::IterativeFailure { iters: ns })
}

/// Solve `Mx = b` for square `M` by embedding into the homogeneous
/// system `[M | b; 0 | 0] y = 0`: a nullvector with non-zero last
/// coordinate `y_n` gives `x = -y[..n] / y_n`.
pub fn solve(m: &SparseMatrix<Zr>, b_vec: &[Zr], modulus: &Modulus, block_size: usize, rng: &mut impl Rng) -> Result<Vec<Zr>> {
    let n = m.nrows();
    if m.ncols() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: "square matrix".into(),
            found: format!("{}x{}", n, m.ncols()),
        });
    }
    let zero = Zr::zero_in(modulus.clone());
    if b_vec.iter().all(|v| v.is_zero()) {
        return Ok(vec![zero; n]);
    }

    let mut entries: Vec<(usize, i64, Zr)> = Vec::new();
    for i in 0..n {
        for (c, v) in m.row(i).entries() {
            entries.push((i, *c, v.clone()));
        }
        if !b_vec[i].is_zero() {
            entries.push((i, n as i64, b_vec[i].clone()));
        }
    }
    let augmented = SparseMatrix::from_entries(n + 1, n + 1, entries);

    let y = nullvector(&augmented, modulus, block_size, rng)?;
    if y[n].is_zero() {
        return Err(LinalgError::IterativeFailure { iters: 1 });
    }
    let scale = y[n].try_inv()?.neg();
    Ok(y[..n].iter().map(|v| v.mul(&scale).unwrap()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn solves_small_diagonal_system_with_block_width_two() {
        let m = Modulus::from_u64(101).unwrap();
        let a = SparseMatrix::from_entries(
            4,
            4,
            vec![
                (0, 0, Zr::new(2, m.clone())),
                (1, 1, Zr::new(3, m.clone())),
                (2, 2, Zr::new(5, m.clone())),
                (3, 3, Zr::new(7, m.clone())),
            ],
        );
        let b = vec![Zr::new(2, m.clone()), Zr::new(6, m.clone()), Zr::new(15, m.clone()), Zr::new(28, m.clone())];
        let mut rng = SmallRng::seed_from_u64(5);
        let x = solve(&a, &b, &m, 2, &mut rng).unwrap();
        let check = a.mul_dense_vec(&x, &Zr::zero_in(m.clone()));
        assert_eq!(check, b);
    }

    #[test]
    fn nullvector_is_annihilated_and_nonzero() {
        let m = Modulus::from_u64(101).unwrap();
        let a = SparseMatrix::from_entries(
            4,
            4,
            vec![
                (0, 0, Zr::new(1, m.clone())),
                (0, 1, Zr::new(2, m.clone())),
                (0, 2, Zr::new(3, m.clone())),
                (0, 3, Zr::new(4, m.clone())),
                (1, 0, Zr::new(2, m.clone())),
                (1, 1, Zr::new(4, m.clone())),
                (1, 2, Zr::new(6, m.clone())),
                (1, 3, Zr::new(8, m.clone())),
                (2, 2, Zr::new(1, m.clone())),
                (3, 3, Zr::new(1, m.clone())),
            ],
        );
        let mut rng = SmallRng::seed_from_u64(9);
        let x = nullvector(&a, &m, 2, &mut rng).unwrap();
        let check = a.mul_dense_vec(&x, &Zr::zero_in(m.clone()));
        assert!(check.iter().all(|v| v.is_zero()));
        assert!(x.iter().any(|v| !v.is_zero()));
    }
}
