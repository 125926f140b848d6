//! Scalar Lanczos: symmetrizes the (possibly non-symmetric, possibly
//! rectangular) system via `A = Mᵀ M` and runs the three-term Lanczos
//! recurrence against that implicit symmetric operator, never
//! materializing `A` itself — every step costs one `M` product and one
//! `Mᵀ` product.

use crate::error::{LinalgError, Result};
use crate::ring::{Modulus, Zr};
use crate::sparse::matrix::SparseMatrix;
use rand::Rng;

fn dot(u: &[Zr], v: &[Zr], zero: &Zr) -> Zr {
    u.iter().zip(v.iter()).fold(zero.clone(), |acc, (a, b)| acc.add(&a.mul(b).unwrap()).unwrap())
}

fn addmul(x: &mut [Zr], v: &[Zr], c: &Zr) {
    for (xi, vi) in x.iter_mut().zip(v.iter()) {
        *xi = xi.add(&vi.mul(c).unwrap()).unwrap();
    }
}

fn scalar_mul(v: &[Zr], c: &Zr) -> Vec<Zr> {
    v.iter().map(|x| x.mul(c).unwrap()).collect()
}

/// Solve `Mx = b`, where `M` need not be symmetric or square: work with
/// `A = Mᵀ M` (`c x c`, symmetric) and target `Mᵀb`, alternating between
/// two direction vectors `v[0], v[1]` instead of storing the whole
/// sequence.
pub fn solve(m: &SparseMatrix<Zr>, b: &[Zr], modulus: &Modulus, rng: &mut impl Rng) -> Result<Vec<Zr>> {
    let c = m.ncols();
    let zero = Zr::zero_in(modulus.clone());
    let mut x = vec![zero.clone(); c];
    if b.iter().all(|v| v.is_zero()) {
        return Ok(x);
    }

    let mt = m.transpose();
    let mtb = mt.mul_dense_vec(b, &zero);

    let mut v = [
        (0..c).map(|_| Zr::new(rng.gen_range(0..u64::MAX), modulus.clone())).collect::<Vec<_>>(),
        vec![zero.clone(); c],
    ];
    let mut vt_av = [zero.clone(), Zr::one_in(modulus.clone())];

    let mut j = 0usize;
    let max_iters = 2 * c + 16;
    for _ in 0..max_iters {
        let mv = m.mul_dense_vec(&v[j], &zero);
        let av = mt.mul_dense_vec(&mv, &zero);
        vt_av[j] = dot(&v[j], &av, &zero);
        if vt_av[j].is_zero() {
            break;
        }

        let v_mtb = dot(&v[j], &mtb, &zero).mul(&vt_av[j].try_inv()?).unwrap();
        addmul(&mut x, &v[j], &v_mtb);

        let av_av = dot(&av, &av, &zero);
        let other = 1 - j;
        let beta = vt_av[j].mul(&vt_av[other].try_inv()?).unwrap().neg();
        v[other] = scalar_mul(&v[other], &beta);
        let alpha = av_av.mul(&vt_av[j].try_inv()?).unwrap().neg();
        addmul(&mut v[other], &v[j], &alpha);
        for (vi, avi) in v[other].iter_mut().zip(av.iter()) {
            *vi = vi.add(avi).unwrap();
        }

        j = other;
    }

    let mv = m.mul_dense_vec(&x, &zero);
    let av = mt.mul_dense_vec(&mv, &zero);
    if av == mtb {
        Ok(x)
    } else {
        Err(LinalgError::IterativeFailure { iters: max_iters })
    }
}

/// Find a non-trivial vector in `ker M`: draw random `x`, set `b = Mx`,
/// solve back for `x2` via Lanczos, and return `x - x2` if it is
/// non-zero and annihilated by `M`.
pub fn nullvector(m: &SparseMatrix<Zr>, modulus: &Modulus, rng: &mut impl Rng) -> Result<Vec<Zr>> {
    let c = m.ncols();
    let zero = Zr::zero_in(modulus.clone());
    let x0: Vec<Zr> = (0..c).map(|_| Zr::new(rng.gen_range(0..u64::MAX), modulus.clone())).collect();
    let b = m.mul_dense_vec(&x0, &zero);
    let x2 = solve(m, &b, modulus, rng)?;
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
    fn solves_small_symmetric_system() {
        let m = Modulus::from_u64(101).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![
                (0, 0, Zr::new(4, m.clone())),
                (0, 1, Zr::new(1, m.clone())),
                (1, 0, Zr::new(1, m.clone())),
                (1, 1, Zr::new(3, m.clone())),
            ],
        );
        let b = vec![Zr::new(9, m.clone()), Zr::new(7, m.clone())];
        let mut rng = SmallRng::seed_from_u64(11);
        let x = solve(&a, &b, &m, &mut rng).unwrap();
        let check = a.mul_dense_vec(&x, &Zr::zero_in(m.clone()));
        assert_eq!(check, b);
    }

    #[test]
    fn nullvector_is_annihilated_and_nonzero() {
        let m = Modulus::from_u64(13).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![
                (0, 0, Zr::new(2, m.clone())),
                (0, 1, Zr::new(4, m.clone())),
                (1, 0, Zr::new(1, m.clone())),
                (1, 1, Zr::new(2, m.clone())),
            ],
        );
        let mut rng = SmallRng::seed_from_u64(3);
        let x = nullvector(&a, &m, &mut rng).unwrap();
        let check = a.mul_dense_vec(&x, &Zr::zero_in(m.clone()));
        assert!(check.iter().all(|v| v.is_zero()));
        assert!(x.iter().any(|v| !v.is_zero()));
    }
}
