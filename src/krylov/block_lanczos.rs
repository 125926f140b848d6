//! Block Lanczos (Montgomery): amortizes the three-term Lanczos
//! recurrence over `block_size` directions at once by replacing the
//! scalar inverse `1/v^tAv` with an "anti-inverse" `-S(W)^{-1}S^t`,
//! where `S` is the largest projection of the current `c x b` direction
//! block `V_i` making `(V_iS)^tA(V_iS)` invertible. Columns outside `S`
//! are carried (never dropped) but zeroed out of every product they'd
//! otherwise contaminate, and the update for `V_{i+1}` (Equation (19) of
//! Montgomery's paper) mixes in `V_i`, `V_{i-1}`, and `V_{i-2}` through
//! coefficient matrices `D`, `E`, `F` built from the accumulated
//! anti-inverses. See Figure 1 and Equation (19) of P. Montgomery, "A
//! Block Lanczos Algorithm for Finding Dependencies over GF(2)",
//! EUROCRYPT '95 (the construction here works over a general prime
//! field, not just GF(2)).

use crate::error::{LinalgError, Result};
use crate::krylov::block_matrix::{self, Mat};
use crate::ring::{Modulus, Zr};
use crate::sparse::matrix::SparseMatrix;
use rand::Rng;

/// Row-reduce `[VtAV | I]`, picking viable pivots from `VtAV` first and
/// falling back to the accumulated inverse when a column has none,
/// mirroring Montgomery's handling of "singular" steps. `s_flags[c]` is
/// updated in place to record whether column `c` was pivoted from `VtAV`
/// (viable) or had to fall back (dropped for this round, zeroed out).
/// Returns `(-W^{-1}, rank)`.
fn compute_nwi_s(vt_av: &Mat, s_flags: &mut [bool], zero: &Zr, one: &Zr) -> (Mat, usize) {
    let b = vt_av.len();
    let mut t = vt_av.to_vec();
    let mut nwi = block_matrix::identity(b, zero, one);

    let mut p = Vec::with_capacity(b);
    for (c, &viable) in s_flags.iter().enumerate() {
        if !viable {
            p.push(c);
        }
    }
    for (c, &viable) in s_flags.iter().enumerate() {
        if viable {
            p.push(c);
        }
    }

    let mut rk = 0usize;
    for j in 0..b {
        let pc = p[j];

        let mut i = j;
        let mut use_t = true;
        while i < b && t[p[i]][pc].is_zero() {
            i += 1;
        }
        if i == b {
            use_t = false;
            i = j;
            while i < b && nwi[p[i]][pc].is_zero() {
                i += 1;
            }
        }
        let pr = p[i];
        s_flags[pc] = use_t;
        t.swap(pc, pr);
        nwi.swap(pc, pr);

        let pivot_val = if use_t { t[pc][pc].clone() } else { nwi[pc][pc].clone() };
        let cc = pivot_val.try_inv().unwrap();
        for v in t[pc].iter_mut() {
            *v = v.mul(&cc).unwrap();
        }
        for v in nwi[pc].iter_mut() {
            *v = v.mul(&cc).unwrap();
        }

        for i2 in 0..b {
            let row = p[i2];
            let src = if use_t { t[row][pc].clone() } else { nwi[row][pc].clone() };
            if i2 == j || src.is_zero() {
                continue;
            }
            let cc2 = src.neg();
            let t_pivot = t[pc].clone();
            let nwi_pivot = nwi[pc].clone();
            for (v, pv) in t[row].iter_mut().zip(t_pivot.iter()) {
                *v = v.add(&pv.mul(&cc2).unwrap()).unwrap();
            }
            for (v, pv) in nwi[row].iter_mut().zip(nwi_pivot.iter()) {
                *v = v.add(&pv.mul(&cc2).unwrap()).unwrap();
            }
        }

        if s_flags[pc] {
            rk += 1;
        } else {
            for v in t[pc].iter_mut() {
                *v = zero.clone();
            }
            for v in nwi[pc].iter_mut() {
                *v = zero.clone();
            }
        }
    }

    (block_matrix::neg(&nwi), rk)
}

/// Solve `Mx = b`, `M` not necessarily square: symmetrize via
/// `A = MᵀM` as scalar Lanczos does, but carry `block_size` directions
/// per step through the Montgomery recurrence above.
pub fn solve(m: &SparseMatrix<Zr>, b: &[Zr], modulus: &Modulus, block_size: usize, rng: &mut impl Rng) -> Result<Vec<Zr>> {
    let nc = m.ncols();
    let zero = Zr::zero_in(modulus.clone());
    let one = Zr::one_in(modulus.clone());
    if b.iter().all(|v| v.is_zero()) {
        return Ok(vec![zero; nc]);
    }
    let bsz = block_size.max(1);
    let mt = m.transpose();
    let mtb = mt.mul_dense_vec(b, &zero);

    let mut v: Vec<Mat> = vec![block_matrix::zero(nc, bsz, &zero); 3];
    v[0] = (0..nc)
        .map(|_| (0..bsz).map(|_| Zr::new(rng.gen_range(0..u64::MAX), modulus.clone())).collect::<Vec<_>>())
        .collect();
    let mut nwi: Vec<Mat> = vec![block_matrix::zero(bsz, bsz, &zero); 3];
    let mut s_flags = vec![true; bsz];
    let ident = block_matrix::identity(bsz, &zero, &one);

    let mut x = vec![zero.clone(); nc];
    let mut vt_av = block_matrix::zero(bsz, bsz, &zero);
    let mut av_vt_av_sst = block_matrix::zero(bsz, bsz, &zero);
    let mut def_mat = block_matrix::zero(bsz, bsz, &zero);
    let mut total_dim = 0usize;

    let mut ret_ok = false;
    let mut iter = 0usize;
    loop {
        let i = iter % 3;
        let next_i = (iter + 1) % 3;
        let prev_i = (iter + 2) % 3;

        if iter >= 2 {
            let t1 = block_matrix::addmul(&ident, &vt_av, &nwi[prev_i], &zero);
            let t2 = block_matrix::mul(&nwi[next_i], &t1, &zero);
            def_mat = block_matrix::mul(&t2, &av_vt_av_sst, &zero);
        }

        let mv = block_matrix::sparse_mul_dense(m, &v[i], &zero);
        let av = block_matrix::sparse_mul_dense(&mt, &mv, &zero);
        let vt = block_matrix::transpose(&v[i]);
        vt_av = block_matrix::mul(&vt, &av, &zero);
        if block_matrix::is_zero(&vt_av) {
            ret_ok = true;
            break;
        }

        let (new_nwi, cur_dim) = compute_nwi_s(&vt_av, &mut s_flags, &zero, &one);
        nwi[i] = new_nwi;
        total_dim += cur_dim;
        if cur_dim == 0 || total_dim > nc {
            break;
        }

        let mut vsst = v[i].clone();
        block_matrix::kill_columns(&mut vsst, &s_flags, &zero);
        let vsst_t = block_matrix::transpose(&vsst);
        let sst_vt_mtb = block_matrix::mul_vec(&vsst_t, &mtb, &zero);
        let wi_sst_vt_mtb = block_matrix::mul_vec(&nwi[i], &sst_vt_mtb, &zero);
        let vsst_wi_sst_vt_mtb = block_matrix::mul_vec(&vsst, &wi_sst_vt_mtb, &zero);
        for (xv, dv) in x.iter_mut().zip(vsst_wi_sst_vt_mtb.iter()) {
            *xv = xv.add(dv).unwrap();
        }

        // V_{i+1} = AV_i S_iS_i^t + V_i D + V_{i-1} E + V_{i-2} F
        if iter >= 2 {
            block_matrix::kill_columns(&mut def_mat, &s_flags, &zero);
            v[next_i] = block_matrix::mul(&v[next_i], &def_mat, &zero);
        }
        if iter >= 1 {
            let mut e_mat = block_matrix::mul(&nwi[prev_i], &vt_av, &zero);
            block_matrix::kill_columns(&mut e_mat, &s_flags, &zero);
            let add = block_matrix::mul(&v[prev_i], &e_mat, &zero);
            block_matrix::add_assign(&mut v[next_i], &add);
        }

        let av_t = block_matrix::transpose(&av);
        let mut av_t_av = block_matrix::mul(&av_t, &av, &zero);
        block_matrix::kill_columns(&mut av_t_av, &s_flags, &zero);
        av_vt_av_sst = av_t_av;
        block_matrix::add_assign(&mut av_vt_av_sst, &vt_av);
        let d_mat = block_matrix::addmul(&ident, &nwi[i], &av_vt_av_sst, &zero);
        let d_term = block_matrix::mul(&v[i], &d_mat, &zero);
        block_matrix::add_assign(&mut v[next_i], &d_term);

        let mut av_killed = av;
        block_matrix::kill_columns(&mut av_killed, &s_flags, &zero);
        block_matrix::add_assign(&mut v[next_i], &av_killed);

        if block_matrix::is_zero(&v[next_i]) {
            ret_ok = true;
            break;
        }
        iter += 1;
    }

    for xi in x.iter_mut() {
        *xi = xi.neg();
    }
    if ret_ok {
        Ok(x)
    } else {
        Err(LinalgError::IterativeFailure { iters: iter })
    }
}

/// Find a non-trivial vector in `ker M`: draw random `x0`, solve back
/// for `x2` with `b = Mx0`, and return `x0 - x2` if non-zero and
/// annihilated.
pub fn nullvector(m: &SparseMatrix<Zr>, modulus: &Modulus, block_size: usize, rng: &mut impl Rng) -> Result<Vec<Zr>> {
    let nc = m.ncols();
    let zero = Zr::zero_in(modulus.clone());
    let x0: Vec<Zr> = (0..nc).map(|_| Zr::new(rng.gen_range(0..u64::MAX), modulus.clone())).collect();
    let b = m.mul_dense_vec(&x0, &zero);
    let x2 = solve(m, &b, modulus, block_size, rng)?;
    let diff: Vec<Zr> = x0.iter().zip(x2.iter()).map(|(a, b)| a.sub(b).unwrap()).collect();
    let check = m.mul_dense_vec(&diff, &zero);
    if diff.iter().any(|v| !v.is_zero()) && check.iter().all(|v| v.is_zero()) {
        Ok(diff)
    } else {
        Err(LinalgError::IterativeFailure { iters: 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn solves_small_symmetric_system_with_block_width_two() {
        let m = Modulus::from_u64(101).unwrap();
        let a = SparseMatrix::from_entries(
            4,
            4,
            vec![
                (0, 0, Zr::new(4, m.clone())),
                (0, 1, Zr::new(1, m.clone())),
                (1, 0, Zr::new(1, m.clone())),
                (1, 1, Zr::new(3, m.clone())),
                (2, 2, Zr::new(2, m.clone())),
                (3, 3, Zr::new(5, m.clone())),
            ],
        );
        let b = vec![Zr::new(9, m.clone()), Zr::new(7, m.clone()), Zr::new(6, m.clone()), Zr::new(15, m.clone())];
        let mut rng = SmallRng::seed_from_u64(2);
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
        let mut rng = SmallRng::seed_from_u64(4);
        let x = nullvector(&a, &m, 2, &mut rng).unwrap();
        let check = a.mul_dense_vec(&x, &Zr::zero_in(m.clone()));
        assert!(check.iter().all(|v| v.is_zero()));
        assert!(x.iter().any(|v| !v.is_zero()));
    }
}
