//! Strong echelon (Howell) form over `Z/nZ` for composite `n`, dense
//! counterpart of [`crate::sparse::howell`]. Same construction: for each
//! column, pairwise-combine every candidate row down to a single
//! generator, fold the modulus itself in via `xgcd(a, n)` so the pivot
//! becomes exactly `gcd(a, n)`, and push a `(n / gcd(a, n)) * row`
//! torsion row back into the pool so later columns stay saturated mod `n`.

use crate::dense::matrix::DenseMatrix;
use crate::ring::{xgcd, Modulus, Zr};

pub struct DenseHowellForm {
    pub rows: Vec<Vec<Zr>>,
    pub rank: usize,
}

fn row_scalar_mul(row: &[Zr], c: &Zr) -> Vec<Zr> {
    row.iter().map(|v| v.mul(c).unwrap()).collect()
}

fn row_is_zero(row: &[Zr]) -> bool {
    row.iter().all(|v| v.is_zero())
}

/// Combine rows `v` and `u` at `col` the way [`crate::sparse::vector::SparseVector::gauss_elim_ext_mod`]
/// does: compute `(g, a, b) = xgcd(v[col], u[col])` lifted to `Z`, then
/// apply the unimodular transform `[[v[col]/g, -u[col]/g], [a, b]]` to
/// `(v, u)`, reducing modulo `n` on the way back in.
fn gauss_elim_ext_mod_row(v: &[Zr], u: &[Zr], col: usize, modulus: &Modulus) -> (Vec<Zr>, Vec<Zr>) {
    let vc = v[col].signed_value();
    let uc = u[col].signed_value();
    let (g, a, b) = xgcd(&vc, &uc);
    let zero = crate::ring::Z::from(0);
    let vc_g = if g == zero { zero.clone() } else { &vc / &g };
    let uc_g = if g == zero { zero.clone() } else { &uc / &g };
    let to_zr = |x: &crate::ring::Z| Zr::new(x.clone(), modulus.clone());
    let (c11, c12, c21, c22) = (to_zr(&vc_g), to_zr(&(-uc_g)), to_zr(&a), to_zr(&b));
    let new_v: Vec<Zr> = v
        .iter()
        .zip(u.iter())
        .map(|(vi, ui)| vi.mul(&c11).unwrap().add(&ui.mul(&c12).unwrap()).unwrap())
        .collect();
    let new_u: Vec<Zr> = v
        .iter()
        .zip(u.iter())
        .map(|(vi, ui)| vi.mul(&c21).unwrap().add(&ui.mul(&c22).unwrap()).unwrap())
        .collect();
    (new_v, new_u)
}

/// Compute the Howell (strong echelon) form of `a` over `Z/nZ`.
pub fn howell_form(a: &DenseMatrix, modulus: &Modulus) -> DenseHowellForm {
    let ncols = a.ncols();
    let n_signed: crate::ring::Z = modulus.value().clone().into();
    let mut pool: Vec<Vec<Zr>> = (0..a.nrows())
        .map(|i| (0..ncols).map(|j| a.get(i, j).clone()).collect())
        .filter(|r: &Vec<Zr>| !row_is_zero(r))
        .collect();
    let mut output: Vec<Vec<Zr>> = Vec::new();

    for col in 0..ncols {
        loop {
            let idxs: Vec<usize> = pool
                .iter()
                .enumerate()
                .filter(|(_, r)| !r[col].is_zero())
                .map(|(i, _)| i)
                .collect();
            if idxs.len() < 2 {
                break;
            }
            let (i, j) = (idxs[0], idxs[1]);
            let (new_v, new_u) = gauss_elim_ext_mod_row(&pool[i], &pool[j], col, modulus);
            pool[i] = new_v;
            pool[j] = new_u;
            pool.retain(|r| !row_is_zero(r));
        }

        let idx = pool.iter().position(|r| !r[col].is_zero());
        let idx = match idx {
            Some(i) => i,
            None => continue,
        };
        let mut pivot_row = pool.remove(idx);
        let a_val = pivot_row[col].signed_value();
        let (g, x, _y) = xgcd(&a_val, &n_signed);
        pivot_row = row_scalar_mul(&pivot_row, &Zr::new(x, modulus.clone()));

        let d = if g.sign() == num_bigint::Sign::NoSign {
            modulus.value().clone().into()
        } else {
            &n_signed / &g
        };
        let torsion = row_scalar_mul(&pivot_row, &Zr::new(d, modulus.clone()));
        if !row_is_zero(&torsion) {
            pool.push(torsion);
        }

        output.push(pivot_row);
    }

    let rank = output.len();
    DenseHowellForm { rows: output, rank }
}

/// `true` iff `a`'s rows are sorted by strictly increasing pivot column
/// (the order a Howell-form basis must have).
pub fn is_in_hnf(rows: &[Vec<Zr>]) -> bool {
    let mut last_pivot: i64 = -1;
    for row in rows {
        let pivot = row.iter().position(|v| !v.is_zero());
        match pivot {
            Some(c) => {
                if c as i64 <= last_pivot {
                    return false;
                }
                last_pivot = c as i64;
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
        let a = DenseMatrix::from_rows(vec![vec![Zr::new(4, m.clone())], vec![Zr::new(6, m.clone())]], m.clone()).unwrap();
        let hf = howell_form(&a, &m);
        // gcd(4, 6, 12) = 2
        assert_eq!(hf.rank, 1);
        assert_eq!(*hf.rows[0][0].value(), num_bigint::BigUint::from(2u32));
    }

    #[test]
    fn detects_non_hnf_order() {
        let m = Modulus::from_u64(7).unwrap();
        let bad = vec![
            vec![Zr::zero_in(m.clone()), Zr::new(1, m.clone())],
            vec![Zr::new(1, m.clone()), Zr::zero_in(m.clone())],
        ];
        assert!(!is_in_hnf(&bad));
    }
}
