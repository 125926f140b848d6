//! Nullspace assembly via iterative solvers: repeatedly draw a random
//! `x`, set `b = Mx`, solve back for `x2`; if `x - x2` is a non-trivial
//! kernel element, reduce it against the kernel basis collected so far
//! (eliminating by each previous basis vector's pivot column), normalize
//! the new pivot to 1, and append. Gives up after `max_iters` fruitless
//! draws in a row.

use crate::error::{LinalgError, Result};
use crate::ring::{Modulus, Zr};
use crate::sparse::matrix::SparseMatrix;
use rand::Rng;

fn leading(v: &[Zr]) -> Option<usize> {
    v.iter().position(|x| !x.is_zero())
}

/// Reduce `v` against `basis` (each basis vector already pivot-normalized
/// to 1 at its own leading column), then normalize `v`'s own new pivot to
/// 1. Returns `None` if `v` reduces entirely to zero.
fn reduce_against_basis(mut v: Vec<Zr>, basis: &[Vec<Zr>]) -> Option<Vec<Zr>> {
    for b in basis {
        let pivot = leading(b)?;
        if !v[pivot].is_zero() {
            let coeff = v[pivot].clone();
            for (vi, bi) in v.iter_mut().zip(b.iter()) {
                *vi = vi.sub(&bi.mul(&coeff).unwrap()).unwrap();
            }
        }
    }
    let pivot = leading(&v)?;
    let inv = v[pivot].try_inv().ok()?;
    for vi in v.iter_mut() {
        *vi = vi.mul(&inv).unwrap();
    }
    Some(v)
}

/// Assemble a basis for `ker M` by repeatedly solving `Mx2 = Mx` for a
/// random `x` (via `solve_back`, typically [`crate::krylov::wiedemann::solve`]
/// or [`crate::krylov::lanczos::solve`]) and folding `x - x2` into the
/// basis collected so far. Stops once `max_iters` consecutive draws add
/// nothing new.
pub fn random_nullspace<R, F>(
    m: &SparseMatrix<Zr>,
    modulus: &Modulus,
    max_iters: usize,
    rng: &mut R,
    mut solve_back: F,
) -> Result<Vec<Vec<Zr>>>
where
    R: Rng,
    F: FnMut(&SparseMatrix<Zr>, &[Zr], &Modulus, &mut R) -> Result<Vec<Zr>>,
{
    let n = m.ncols();
    let zero = Zr::zero_in(modulus.clone());
    let mut basis: Vec<Vec<Zr>> = Vec::new();
    let mut fruitless = 0usize;

    while fruitless < max_iters {
        let x: Vec<Zr> = (0..n).map(|_| Zr::new(rng.gen_range(0..u64::MAX), modulus.clone())).collect();
        let b = m.mul_dense_vec(&x, &zero);
        let x2 = match solve_back(m, &b, modulus, rng) {
            Ok(x2) => x2,
            Err(_) => {
                fruitless += 1;
                continue;
            }
        };
        let diff: Vec<Zr> = x.iter().zip(x2.iter()).map(|(a, b)| a.sub(b).unwrap()).collect();
        if diff.iter().all(|v| v.is_zero()) {
            fruitless += 1;
            continue;
        }
        match reduce_against_basis(diff, &basis) {
            Some(v) => {
                basis.push(v);
                fruitless = 0;
            }
            None => fruitless += 1,
        }
    }

    for v in &basis {
        let check = m.mul_dense_vec(v, &zero);
        if !check.iter().all(|x| x.is_zero()) {
            return Err(LinalgError::IterativeFailure { iters: max_iters });
        }
    }
    Ok(basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::krylov::lanczos;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn assembles_basis_for_rank_deficient_matrix() {
        let m = Modulus::from_u64(101).unwrap();
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
        let mut rng = SmallRng::seed_from_u64(21);
        let basis = random_nullspace(&a, &m, 20, &mut rng, |mat, b, modulus, rng| lanczos::solve(mat, b, modulus, rng)).unwrap();
        assert!(!basis.is_empty());
        for v in &basis {
            let check = a.mul_dense_vec(v, &Zr::zero_in(m.clone()));
            assert!(check.iter().all(|x| x.is_zero()));
        }
    }
}
