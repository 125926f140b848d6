//! Markowitz-style sparse Gaussian elimination over a prime field: a
//! rank-revealing `P A Q = L U` factorization that picks pivot columns in
//! increasing order of current non-zero count, using [`IndexedHeap`] to
//! always have the lightest column on hand and [`WithTranspose`] to find,
//! for a given column, which rows still have a non-zero there.

use crate::collections::IndexedHeap;
use crate::error::{LinalgError, Result};
use crate::ring::Zr;
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::transpose::WithTranspose;
use crate::sparse::vector::SparseVector;

/// The result of sparse LU factorization: `P A Q = L U` where `L` is unit
/// lower-triangular (in pivot order) and `U` is upper-triangular, both
/// stored as `rank`-row sparse matrices in pivot order.
pub struct LuDecomposition {
    /// `p[k]` is the original row index chosen as the `k`-th pivot.
    pub p: Vec<usize>,
    /// `q[k]` is the original column index chosen as the `k`-th pivot.
    pub q: Vec<usize>,
    /// Unit lower-triangular multipliers, `rank` rows, `rank` columns,
    /// indexed in pivot order (`l[i][k]` is the multiplier applied to the
    /// `k`-th pivot row while reducing the row that became the `i`-th
    /// pivot).
    pub l: SparseMatrix<Zr>,
    /// The `rank` pivot rows, reduced by every earlier pivot, in pivot
    /// order and original column indexing.
    pub u: SparseMatrix<Zr>,
    pub rank: usize,
}

/// Factor `a` (an `m x n` matrix over a prime field) via sparse Markowitz
/// elimination. Column pivots are chosen greedily by current non-zero
/// count (an approximation of the true Markowitz product, which also
/// weighs row density; see DESIGN.md); row choice among candidates in the
/// lightest column breaks ties by the first available row.
pub fn lu(a: &SparseMatrix<Zr>) -> Result<LuDecomposition> {
    let nrows = a.nrows();
    let ncols = a.ncols();
    let mut wt = WithTranspose::new(a.clone());

    let mut heap = IndexedHeap::new(ncols.max(1));
    for c in 0..ncols {
        heap.push(wt.col_weight(c as i64) as i64);
    }

    let mut used_row = vec![false; nrows];
    let mut p = Vec::new();
    let mut q = Vec::new();
    let mut l_entries: Vec<(usize, i64, Zr)> = Vec::new();
    let mut u_rows: Vec<SparseVector<Zr>> = Vec::new();

    while let Some((col, weight)) = heap.pop() {
        if weight == 0 {
            continue;
        }
        let candidates: Vec<usize> = wt
            .rows_in_col(col as i64)
            .filter(|r| !used_row[*r])
            .collect();
        let pivot_row = match candidates.first().copied() {
            Some(r) => r,
            None => continue,
        };
        let pivot_index = p.len();
        let pivot_vec = wt.matrix().row(pivot_row).clone();

        let mut touched_cols = std::collections::HashSet::new();
        for (c, _) in pivot_vec.entries() {
            touched_cols.insert(*c);
        }

        for r in candidates.into_iter().skip(1) {
            let row_r = wt.matrix().row(r).clone();
            let quotient = SparseVector::field_quotient_at(&row_r, &pivot_vec, col as i64)?;
            if !quotient.is_zero() {
                l_entries.push((r, pivot_index as i64, quotient.clone()));
                for (c, _) in row_r.entries() {
                    touched_cols.insert(*c);
                }
                let new_row = SparseVector::scalar_submul(&row_r, &pivot_vec, &quotient);
                for (c, _) in new_row.entries() {
                    touched_cols.insert(*c);
                }
                wt.resync_row(r, new_row);
            }
        }

        used_row[pivot_row] = true;
        l_entries.push((pivot_row, pivot_index as i64, Zr::one_in(
            pivot_vec
                .entries()
                .first()
                .map(|(_, v)| v.modulus().clone())
                .expect("pivot row has at least the pivot entry"),
        )));
        p.push(pivot_row);
        q.push(col);
        u_rows.push(pivot_vec);

        touched_cols.remove(&(col as i64));
        for c in touched_cols {
            if (c as usize) < ncols {
                let w = wt.col_weight(c);
                heap.adjust(c as usize, w as i64);
            }
        }
    }

    let rank = p.len();
    let u = SparseMatrix::from_entries(
        rank,
        ncols,
        u_rows
            .into_iter()
            .enumerate()
            .flat_map(|(i, row)| row.entries().iter().map(move |(c, v)| (i, *c, v.clone())).collect::<Vec<_>>())
            .collect(),
    );
    // Remap `l_entries`' row indices from original-row-space to
    // pivot-order-space (row `p[i]` becomes L-row `i`).
    let row_to_pivot_index: std::collections::HashMap<usize, usize> =
        p.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let l_entries: Vec<(usize, i64, Zr)> = l_entries
        .into_iter()
        .filter_map(|(r, k, v)| row_to_pivot_index.get(&r).map(|&i| (i, k, v)))
        .collect();
    let l = SparseMatrix::from_entries(rank, rank, l_entries);

    if rank == 0 {
        return Err(LinalgError::NonInvertible("matrix has rank 0".into()));
    }

    Ok(LuDecomposition { p, q, l, u, rank })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::Modulus;

    #[test]
    fn factors_full_rank_matrix() {
        let m = Modulus::from_u64(7).unwrap();
        let a = SparseMatrix::from_entries(
            3,
            3,
            vec![
                (0, 0, Zr::new(1, m.clone())),
                (0, 1, Zr::new(2, m.clone())),
                (1, 1, Zr::new(3, m.clone())),
                (1, 2, Zr::new(1, m.clone())),
                (2, 0, Zr::new(1, m.clone())),
                (2, 2, Zr::new(5, m.clone())),
            ],
        );
        let decomp = lu(&a).unwrap();
        assert_eq!(decomp.rank, 3);
        assert_eq!(decomp.p.len(), 3);
        assert_eq!(decomp.q.len(), 3);
    }

    #[test]
    fn detects_rank_deficiency() {
        let m = Modulus::from_u64(5).unwrap();
        // row 1 = 2 * row 0
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
        let decomp = lu(&a).unwrap();
        assert_eq!(decomp.rank, 1);
    }
}
