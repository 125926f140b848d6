//! Hermite Normal Form over `Z`, with the four construction strategies:
//! `classical` (repeated Euclidean-style reduction), `xgcd` (one-shot
//! extended-gcd combination per column), `minors` (Kannan-Bachem,
//! incorporating one input row at a time), and `modular`/`modular_eldiv`
//! (bound the entry growth by a known determinant divisor along the way).

use crate::ring::{gcd, Z};
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::vector::{at_z, SparseVector};

pub struct Hnf {
    pub mat: SparseMatrix<Z>,
    pub rank: usize,
}

fn finalize(mut output: Vec<SparseVector<Z>>, ncols: usize) -> Hnf {
    output.sort_by_key(|r| r.leading().map(|(c, _)| *c).unwrap_or(i64::MAX));
    for row in output.iter_mut() {
        if let Some((_, v)) = row.leading() {
            if num_traits::Signed::is_negative(v) {
                *row = SparseVector::neg(row);
            }
        }
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
    Hnf { mat, rank }
}

/// Reduce every already-finalized pivot row's entry in `col` modulo the
/// new pivot's leading value, keeping the canonical `0 <= entry < pivot`
/// shape of Hermite form.
fn reduce_above(output: &mut [SparseVector<Z>], col: i64, pivot_val: &Z) {
    for row in output.iter_mut() {
        *row = SparseVector::gauss_elim_col(row, &SparseVector::from_sorted_entries(vec![(col, pivot_val.clone())]), col);
    }
}

/// Pairwise-combine every row in `pool` with a non-zero entry at `col`
/// down to a single row via `combine`, returning it (or `None` if no row
/// had a non-zero entry there).
fn reduce_column(
    pool: &mut Vec<SparseVector<Z>>,
    col: i64,
    mut combine: impl FnMut(&SparseVector<Z>, &SparseVector<Z>, i64) -> (SparseVector<Z>, SparseVector<Z>),
) -> Option<SparseVector<Z>> {
    loop {
        let idxs: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, r)| at_z(r, col) != Z::from(0))
            .map(|(i, _)| i)
            .collect();
        if idxs.is_empty() {
            return None;
        }
        if idxs.len() == 1 {
            return Some(pool.remove(idxs[0]));
        }
        let (i, j) = (idxs[0], idxs[1]);
        let (new_v, new_u) = combine(&pool[i], &pool[j], col);
        pool[i] = new_v;
        pool[j] = new_u;
        pool.retain(|r| !r.is_zero());
    }
}

/// One-shot extended-gcd combination per column.
pub fn hnf_xgcd(a: &SparseMatrix<Z>) -> Hnf {
    let ncols = a.ncols();
    let mut pool: Vec<SparseVector<Z>> = a.rows().iter().filter(|r| !r.is_zero()).cloned().collect();
    let mut output: Vec<SparseVector<Z>> = Vec::new();
    for col in 0..ncols as i64 {
        if let Some(pivot) = reduce_column(&mut pool, col, SparseVector::gauss_elim_ext) {
            let pivot_val = at_z(&pivot, col);
            reduce_above(&mut output, col, &pivot_val);
            output.push(pivot);
        }
    }
    finalize(output, ncols)
}

/// Repeated Euclidean-style long division instead of one-shot `xgcd`:
/// the larger-magnitude row is reduced by the smaller, swapping as needed,
/// until one side's entry at `col` vanishes (classic GCD by repeated
/// remainder, applied to whole rows).
pub fn hnf_classical(a: &SparseMatrix<Z>) -> Hnf {
    let ncols = a.ncols();
    let mut pool: Vec<SparseVector<Z>> = a.rows().iter().filter(|r| !r.is_zero()).cloned().collect();
    let mut output: Vec<SparseVector<Z>> = Vec::new();
    for col in 0..ncols as i64 {
        loop {
            let idxs: Vec<usize> = pool
                .iter()
                .enumerate()
                .filter(|(_, r)| at_z(r, col) != Z::from(0))
                .map(|(i, _)| i)
                .collect();
            if idxs.len() < 2 {
                break;
            }
            let (i, j) = (idxs[0], idxs[1]);
            use num_traits::Signed;
            let (big, small) = if at_z(&pool[i], col).abs() >= at_z(&pool[j], col).abs() {
                (i, j)
            } else {
                (j, i)
            };
            let reduced = SparseVector::gauss_elim_col(&pool[big], &pool[small], col);
            pool[big] = reduced;
            pool.retain(|r| !r.is_zero());
        }
        let pivot = pool
            .iter()
            .position(|r| at_z(r, col) != Z::from(0))
            .map(|idx| pool.remove(idx));
        if let Some(pivot) = pivot {
            let pivot_val = at_z(&pivot, col);
            reduce_above(&mut output, col, &pivot_val);
            output.push(pivot);
        }
    }
    finalize(output, ncols)
}

/// Kannan-Bachem: fold in one input row at a time, keeping the running
/// result in Hermite form after every row instead of processing whole
/// columns against the full row pool at once.
pub fn hnf_minors(a: &SparseMatrix<Z>) -> Hnf {
    let ncols = a.ncols();
    let mut output: Vec<SparseVector<Z>> = Vec::new();
    for row in a.rows() {
        if row.is_zero() {
            continue;
        }
        let mut incoming = row.clone();
        for col in 0..ncols as i64 {
            if at_z(&incoming, col) == Z::from(0) {
                continue;
            }
            let existing_idx = output
                .iter()
                .position(|r| r.leading().map(|(c, _)| *c) == Some(col));
            match existing_idx {
                Some(idx) => {
                    let (new_v, new_u) = SparseVector::gauss_elim_ext(&output[idx], &incoming, col);
                    let pivot_val = at_z(&new_v, col);
                    output[idx] = new_v;
                    reduce_above(&mut output, col, &pivot_val);
                    incoming = new_u;
                }
                None => {
                    output.push(incoming.clone());
                    break;
                }
            }
        }
    }
    finalize(output, ncols)
}

/// Identical construction to [`hnf_xgcd`], additionally reducing every
/// entry modulo a known multiple `bound` of the Hermite form's
/// determinant divisor (e.g. `|det(A)|` for a square `A`) to keep
/// intermediate coefficients from growing unboundedly. `bound` must be a
/// non-zero multiple of every elementary divisor of `a`, or the result is
/// wrong — callers that do not have such a bound should use
/// [`hnf_xgcd`] instead.
pub fn hnf_modular(a: &SparseMatrix<Z>, bound: &Z) -> Hnf {
    let ncols = a.ncols();
    let mut pool: Vec<SparseVector<Z>> = a.rows().iter().filter(|r| !r.is_zero()).cloned().collect();
    let mut output: Vec<SparseVector<Z>> = Vec::new();
    for col in 0..ncols as i64 {
        if let Some(pivot) = reduce_column(&mut pool, col, SparseVector::gauss_elim_ext) {
            let pivot_val = gcd(&at_z(&pivot, col), bound);
            reduce_above(&mut output, col, &pivot_val);
            let pivot = SparseVector::scalar_mod(&pivot, bound);
            output.push(pivot);
        }
    }
    finalize(output, ncols)
}

/// [`hnf_modular`], additionally returning the elementary divisors (the
/// final diagonal entries) alongside the Hermite form.
pub fn hnf_modular_eldiv(a: &SparseMatrix<Z>, bound: &Z) -> (Hnf, Vec<Z>) {
    let hnf = hnf_modular(a, bound);
    let eldiv = hnf
        .mat
        .rows()
        .iter()
        .map(|r| r.leading().map(|(_, v)| v.clone()).unwrap_or_else(|| Z::from(0)))
        .collect();
    (hnf, eldiv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xgcd_and_classical_agree_on_small_matrix() {
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![(0, 0, Z::from(4)), (0, 1, Z::from(7)), (1, 0, Z::from(2)), (1, 1, Z::from(5))],
        );
        let h1 = hnf_xgcd(&a);
        let h2 = hnf_classical(&a);
        assert_eq!(h1.rank, h2.rank);
        assert_eq!(h1.mat, h2.mat);
    }

    #[test]
    fn resulting_form_is_upper_triangular_with_positive_diagonal() {
        let a = SparseMatrix::from_entries(
            3,
            3,
            vec![
                (0, 0, Z::from(2)),
                (0, 1, Z::from(3)),
                (1, 1, Z::from(6)),
                (1, 2, Z::from(4)),
                (2, 0, Z::from(5)),
                (2, 2, Z::from(7)),
            ],
        );
        let h = hnf_xgcd(&a);
        for (i, row) in h.mat.rows().iter().enumerate() {
            let (c, v) = row.leading().unwrap();
            assert_eq!(*c as usize, i);
            use num_traits::Signed;
            assert!(!v.is_negative());
        }
    }

    #[test]
    fn minors_matches_xgcd_rank() {
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![(0, 0, Z::from(4)), (0, 1, Z::from(7)), (1, 0, Z::from(2)), (1, 1, Z::from(5))],
        );
        let h1 = hnf_minors(&a);
        let h2 = hnf_xgcd(&a);
        assert_eq!(h1.rank, h2.rank);
    }
}
