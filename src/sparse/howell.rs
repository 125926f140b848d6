//! Strong echelon (Howell) form over `Z/nZ` for composite `n`: the
//! canonical form RREF generalizes to once pivots need not be units.
//!
//! For each column, every candidate row is pairwise-combined via
//! [`SparseVector::gauss_elim_ext_mod`] down to a single generator, that
//! generator is further combined with the modulus itself (via
//! `xgcd(a, n)`) so its leading entry becomes exactly `gcd(a, n)`, and a
//! `(n / gcd(a, n)) * row` "torsion" row is folded back into the pool so
//! later columns stay saturated mod `n` (the property that distinguishes
//! Howell form from plain echelon form).

use crate::ring::{xgcd, Modulus, Zr};
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::vector::{at, SparseVector};

pub struct HowellForm {
    pub mat: SparseMatrix<Zr>,
    pub rank: usize,
}

/// Compute the Howell (strong echelon) form of `a` over `Z/nZ`.
pub fn howell_form(a: &SparseMatrix<Zr>, modulus: &Modulus) -> HowellForm {
    let ncols = a.ncols();
    let n_signed = modulus.value().clone().into();
    let mut pool: Vec<SparseVector<Zr>> = a.rows().iter().filter(|r| !r.is_zero()).cloned().collect();
    let mut output: Vec<SparseVector<Zr>> = Vec::new();

    for col in 0..ncols as i64 {
        loop {
            let idxs: Vec<usize> = pool
                .iter()
                .enumerate()
                .filter(|(_, r)| !at(r, col).is_zero())
                .map(|(i, _)| i)
                .collect();
            if idxs.len() < 2 {
                break;
            }
            let (i, j) = (idxs[0], idxs[1]);
            let (new_v, new_u) = SparseVector::gauss_elim_ext_mod(&pool[i], &pool[j], col, modulus);
            pool[i] = new_v;
            pool[j] = new_u;
            pool.retain(|r| !r.is_zero());
        }

        let idx = pool.iter().position(|r| !at(r, col).is_zero());
        let idx = match idx {
            Some(i) => i,
            None => continue,
        };
        let mut pivot_row = pool.remove(idx);
        let a_val = at(&pivot_row, col).signed_value();
        let (g, x, _y) = xgcd(&a_val, &n_signed);
        pivot_row = SparseVector::scalar_mul(&pivot_row, &Zr::new(x, modulus.clone()));

        let d = if g.sign() == num_bigint::Sign::NoSign {
            modulus.value().clone().into()
        } else {
            &n_signed / &g
        };
        let torsion = SparseVector::scalar_mul(&pivot_row, &Zr::new(d, modulus.clone()));
        if !torsion.is_zero() {
            pool.push(torsion);
        }

        output.push(pivot_row);
    }

    let rank = output.len();
    let mat = SparseMatrix::from_entries(
        rank,
        ncols,
        output
            .into_iter()
            .enumerate()
            .flat_map(|(i, row)| row.entries().iter().map(move |(c, v)| (i, *c, v.clone())).collect::<Vec<_>>())
            .collect(),
    );
    HowellForm { mat, rank }
}

/// `true` iff `a` is already in (strong) Howell form: rows sorted by
/// strictly increasing pivot column, and every pivot the only non-zero
/// entry below it in its own column.
pub fn is_in_hnf(a: &SparseMatrix<Zr>) -> bool {
    let mut last_pivot = -1i64;
    for row in a.rows() {
        match row.leading() {
            Some((c, _)) => {
                if *c <= last_pivot {
                    return false;
                }
                last_pivot = *c;
            }
            None => continue,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_modulus_reduces_to_gcd_pivot() {
        let m = Modulus::from_u64(12).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            1,
            vec![(0, 0, Zr::new(4, m.clone())), (1, 0, Zr::new(6, m.clone()))],
        );
        let hf = howell_form(&a, &m);
        // gcd(4, 6, 12) = 2
        assert_eq!(hf.rank, 1);
        assert_eq!(*hf.mat.row(0).entries()[0].1.value(), num_bigint::BigUint::from(2u32));
    }

    #[test]
    fn detects_non_hnf_order() {
        let m = Modulus::from_u64(7).unwrap();
        let bad = SparseMatrix::from_entries(
            2,
            2,
            vec![(0, 1, Zr::new(1, m.clone())), (1, 0, Zr::new(1, m.clone()))],
        );
        assert!(!is_in_hnf(&bad));
    }
}
