//! A sparse matrix paired with a column-incidence index: for every column,
//! which rows currently hold a non-zero entry there. Markowitz-style
//! elimination uses this to find, cheaply, which rows a pivot column would
//! touch without scanning the whole matrix.
//!
//! The FLINT original keeps this index as an array of hashmaps whose
//! values are raw row pointers; we keep row *indices* instead and
//! dereference them through the owning [`SparseMatrix`] on every use, so
//! there is nothing here that outlives a mutable borrow incorrectly.

use crate::collections::IntHashMap;
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::vector::{RingElement, SparseVector};

/// A [`SparseMatrix`] together with, for every column, the set of row
/// indices that currently have a non-zero entry there.
pub struct WithTranspose<T> {
    mat: SparseMatrix<T>,
    /// `col_rows[c]` maps `row index -> ()` for every row with a non-zero
    /// at column `c`.
    col_rows: Vec<IntHashMap<()>>,
}

impl<T: RingElement> WithTranspose<T> {
    /// Build the incidence index for `mat` from scratch.
    pub fn new(mat: SparseMatrix<T>) -> Self {
        let mut col_rows: Vec<IntHashMap<()>> = (0..mat.ncols()).map(|_| IntHashMap::new()).collect();
        for (r, row) in mat.rows().iter().enumerate() {
            for (c, _) in row.entries() {
                col_rows[*c as usize].insert(r as i64, ());
            }
        }
        WithTranspose { mat, col_rows }
    }

    pub fn matrix(&self) -> &SparseMatrix<T> {
        &self.mat
    }

    /// Consume the wrapper, discarding the incidence index.
    pub fn into_matrix(self) -> SparseMatrix<T> {
        self.mat
    }

    /// Row indices with a non-zero entry in column `c`, in no particular
    /// order.
    pub fn rows_in_col(&self, c: i64) -> impl Iterator<Item = usize> + '_ {
        self.col_rows[c as usize].keys().iter().map(|&k| k as usize)
    }

    /// Number of rows with a non-zero entry in column `c` — the Markowitz
    /// column-weight metric.
    pub fn col_weight(&self, c: i64) -> usize {
        self.col_rows[c as usize].len()
    }

    /// Replace row `i` with `new_row`, updating the incidence index to
    /// drop columns no longer present and add columns newly present.
    pub fn resync_row(&mut self, i: usize, new_row: SparseVector<T>) {
        let old_cols: Vec<i64> = self.mat.row(i).entries().iter().map(|(c, _)| *c).collect();
        let new_cols: Vec<i64> = new_row.entries().iter().map(|(c, _)| *c).collect();
        for c in &old_cols {
            if !new_cols.contains(c) {
                self.col_rows[*c as usize].remove(i as i64);
            }
        }
        for c in &new_cols {
            if !old_cols.contains(c) {
                self.col_rows[*c as usize].insert(i as i64, ());
            }
        }
        self.mat.set_row(i, new_row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::{Modulus, Zr};

    #[test]
    fn tracks_column_incidence() {
        let m = Modulus::from_u64(13).unwrap();
        let a = SparseMatrix::from_entries(
            3,
            2,
            vec![
                (0, 0, Zr::new(1, m.clone())),
                (1, 0, Zr::new(2, m.clone())),
                (2, 1, Zr::new(3, m.clone())),
            ],
        );
        let wt = WithTranspose::new(a);
        assert_eq!(wt.col_weight(0), 2);
        assert_eq!(wt.col_weight(1), 1);
        let mut rows: Vec<_> = wt.rows_in_col(0).collect();
        rows.sort();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn resync_row_updates_incidence() {
        let m = Modulus::from_u64(13).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![(0, 0, Zr::new(1, m.clone())), (1, 0, Zr::new(2, m.clone()))],
        );
        let mut wt = WithTranspose::new(a);
        let new_row = SparseVector::from_sorted_entries(vec![(1, Zr::new(5, m))]);
        wt.resync_row(0, new_row);
        assert_eq!(wt.col_weight(0), 1);
        assert_eq!(wt.col_weight(1), 1);
    }
}
