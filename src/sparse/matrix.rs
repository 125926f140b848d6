//! Row-major sparse matrix: a vector of [`SparseVector`] rows sharing a
//! common shape (and, for `Zr`, a common modulus).

use crate::error::{LinalgError, Result};
use crate::ring::{Modulus, Z, Zr};
use crate::sparse::vector::{RingElement, SparseVector};
use std::fmt;

/// A sparse matrix stored as one [`SparseVector`] per row.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix<T> {
    rows: Vec<SparseVector<T>>,
    ncols: usize,
}

impl<T> SparseMatrix<T> {
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn row(&self, i: usize) -> &SparseVector<T> {
        &self.rows[i]
    }

    pub fn rows(&self) -> &[SparseVector<T>] {
        &self.rows
    }

    pub fn set_row(&mut self, i: usize, row: SparseVector<T>) {
        self.rows[i] = row;
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.nnz()).sum()
    }

    /// Swap two rows in place (no copy of entries).
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        self.rows.swap(i, j);
    }

    /// Permute rows according to `perm` (`perm[i]` = the source row that
    /// ends up at destination `i`).
    pub fn permute_rows(&self, perm: &[usize]) -> SparseMatrix<T>
    where
        T: Clone,
    {
        let rows = perm.iter().map(|&p| self.rows[p].clone()).collect();
        SparseMatrix { rows, ncols: self.ncols }
    }

    /// A window of full rows `[r0, r1)` and columns `[c0, c1)`.
    pub fn window(&self, r0: usize, r1: usize, c0: i64, c1: i64) -> SparseMatrix<T>
    where
        T: Clone,
    {
        let rows = self.rows[r0..r1].iter().map(|row| row.window(c0, c1)).collect();
        SparseMatrix {
            rows,
            ncols: (c1 - c0).max(0) as usize,
        }
    }

    /// Stack `self` on top of `other` (must share column count).
    pub fn concat_vertical(&self, other: &SparseMatrix<T>) -> Result<SparseMatrix<T>>
    where
        T: Clone,
    {
        if self.ncols != other.ncols {
            return Err(LinalgError::ShapeMismatch {
                expected: format!("{} columns", self.ncols),
                found: format!("{} columns", other.ncols),
            });
        }
        let mut rows = self.rows.clone();
        rows.extend(other.rows.iter().cloned());
        Ok(SparseMatrix { rows, ncols: self.ncols })
    }

    /// Place `other`'s columns after `self`'s (must share row count).
    pub fn concat_horizontal(&self, other: &SparseMatrix<T>) -> Result<SparseMatrix<T>>
    where
        T: Clone,
    {
        if self.rows.len() != other.rows.len() {
            return Err(LinalgError::ShapeMismatch {
                expected: format!("{} rows", self.rows.len()),
                found: format!("{} rows", other.rows.len()),
            });
        }
        let off = self.ncols as i64;
        let rows = self
            .rows
            .iter()
            .zip(other.rows.iter())
            .map(|(a, b)| {
                let mut entries: Vec<_> = a.entries().to_vec();
                entries.extend(b.entries().iter().map(|(i, v)| (*i + off, v.clone())));
                SparseVector::from_sorted_entries(entries)
            })
            .collect();
        Ok(SparseMatrix {
            rows,
            ncols: self.ncols + other.ncols,
        })
    }

    /// The matrix transpose, materialised as a fresh sparse matrix (not the
    /// shared-storage [`crate::sparse::transpose::WithTranspose`] view).
    pub fn transpose(&self) -> SparseMatrix<T>
    where
        T: Clone,
    {
        let mut cols: Vec<Vec<(i64, T)>> = vec![Vec::new(); self.ncols];
        for (r, row) in self.rows.iter().enumerate() {
            for (c, v) in row.entries() {
                cols[*c as usize].push((r as i64, v.clone()));
            }
        }
        let rows = cols.into_iter().map(SparseVector::from_sorted_entries).collect();
        SparseMatrix {
            rows,
            ncols: self.rows.len(),
        }
    }
}

impl<T: RingElement> SparseMatrix<T> {
    /// An all-zero `r x c` matrix.
    pub fn zeros(r: usize, c: usize) -> Self {
        SparseMatrix {
            rows: vec![SparseVector::new(); r],
            ncols: c,
        }
    }

    /// Build from a row-major, unsorted `(row, col, value)` triple list.
    pub fn from_entries(r: usize, c: usize, mut entries: Vec<(usize, i64, T)>) -> Self {
        entries.sort_by_key(|(row, col, _)| (*row, *col));
        let mut rows: Vec<Vec<(i64, T)>> = vec![Vec::new(); r];
        for (row, col, val) in entries {
            if !val.is_zero_elem() {
                rows[row].push((col, val));
            }
        }
        SparseMatrix {
            rows: rows.into_iter().map(SparseVector::from_sorted_entries).collect(),
            ncols: c,
        }
    }

    /// `true` iff every row is empty.
    pub fn is_zero(&self) -> bool {
        self.rows.iter().all(|r| r.is_zero())
    }

    /// `w = A*v`, a dense column vector result indexed by row.
    pub fn mul_vec(&self, v: &SparseVector<T>, zero: &T) -> Vec<T> {
        self.rows.iter().map(|row| SparseVector::dot(row, v, zero)).collect()
    }

    /// `w = A*v` against a dense `v`.
    pub fn mul_dense_vec(&self, v: &[T], zero: &T) -> Vec<T> {
        self.rows
            .iter()
            .map(|row| SparseVector::dot_dense(row, v, zero))
            .collect()
    }
}

impl SparseMatrix<Zr> {
    /// Identity matrix of size `n` in the given ring.
    pub fn identity(n: usize, modulus: Modulus) -> Self {
        let rows = (0..n)
            .map(|i| SparseVector::from_sorted_entries(vec![(i as i64, Zr::one_in(modulus.clone()))]))
            .collect();
        SparseMatrix { rows, ncols: n }
    }

    /// The modulus shared by every entry (taken from the first non-empty
    /// row; a matrix with no entries at all has no inherent modulus and
    /// the caller must track it separately).
    pub fn modulus(&self) -> Option<Modulus> {
        self.rows.iter().find_map(|r| r.entries().first().map(|(_, v)| v.modulus().clone()))
    }

    /// Materialise as a dense row-major `Vec<Vec<Zr>>`, filling absent
    /// entries with the ring's zero.
    pub fn to_dense(&self, modulus: Modulus) -> Vec<Vec<Zr>> {
        (0..self.nrows())
            .map(|i| {
                let mut row = vec![Zr::zero_in(modulus.clone()); self.ncols];
                for (c, v) in self.rows[i].entries() {
                    row[*c as usize] = v.clone();
                }
                row
            })
            .collect()
    }

    /// Build from a dense row-major matrix.
    pub fn from_dense(dense: &[Vec<Zr>]) -> Self {
        let r = dense.len();
        let c = dense.first().map(|row| row.len()).unwrap_or(0);
        let mut entries = Vec::new();
        for (i, row) in dense.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                if !v.is_zero() {
                    entries.push((i, j as i64, v.clone()));
                }
            }
        }
        SparseMatrix::from_entries(r, c, entries)
    }
}

impl SparseMatrix<Z> {
    /// Identity matrix of size `n` over `Z`.
    pub fn identity(n: usize) -> Self {
        let rows = (0..n)
            .map(|i| SparseVector::from_sorted_entries(vec![(i as i64, Z::from(1))]))
            .collect();
        SparseMatrix { rows, ncols: n }
    }

    /// `gcd` of every entry in the matrix (0 for the zero matrix), used by
    /// the integer content/primitive-part decomposition.
    pub fn content(&self) -> Z {
        let mut g = Z::from(0);
        for row in &self.rows {
            for (_, v) in row.entries() {
                g = crate::ring::gcd(&g, v);
            }
        }
        g
    }

    /// `max(|a_ij|).bits()`, an upper bound used by Dixon's solve-bound
    /// heuristic.
    pub fn max_bits(&self) -> u64 {
        use num_traits::Signed;
        self.rows
            .iter()
            .flat_map(|r| r.entries())
            .map(|(_, v)| v.abs().bits())
            .max()
            .unwrap_or(0)
    }

    /// `A * A^T`, the Gram matrix used by some Dixon solve-bound variants.
    pub fn gram(&self) -> SparseMatrix<Z> {
        let t = self.transpose();
        let mut entries = Vec::new();
        for i in 0..self.nrows() {
            for j in 0..self.nrows() {
                let v = SparseVector::dot(&self.rows[i], t.row(j), &Z::from(0));
                if !num_traits::Zero::is_zero(&v) {
                    entries.push((i, j as i64, v));
                }
            }
        }
        SparseMatrix::from_entries(self.nrows(), self.nrows(), entries)
    }

    /// Reduce every entry modulo `p`, lifting into `Zr`.
    pub fn mod_reduce(&self, modulus: Modulus) -> SparseMatrix<Zr> {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let entries = row
                    .entries()
                    .iter()
                    .map(|(i, v)| (*i, Zr::new(v.clone(), modulus.clone())))
                    .filter(|(_, v)| !v.is_zero())
                    .collect();
                SparseVector::from_sorted_entries(entries)
            })
            .collect();
        SparseMatrix { rows, ncols: self.ncols }
    }
}

impl fmt::Display for SparseMatrix<Zr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<{}x{} sparse matrix, {} nnz>", self.nrows(), self.ncols(), self.nnz())?;
        for row in &self.rows {
            let mut dense = vec!["0".to_string(); self.ncols];
            for (c, v) in row.entries() {
                dense[*c as usize] = v.to_string();
            }
            writeln!(f, "[{}]", dense.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_entries_drops_zeros_and_sorts() {
        let m = Modulus::from_u64(7).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![
                (0, 1, Zr::new(3, m.clone())),
                (0, 0, Zr::new(0, m.clone())),
                (1, 0, Zr::new(5, m.clone())),
            ],
        );
        assert_eq!(a.nnz(), 2);
        assert_eq!(a.row(0).entries(), &[(1, Zr::new(3, m.clone()))]);
    }

    #[test]
    fn transpose_round_trips() {
        let m = Modulus::from_u64(13).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            3,
            vec![(0, 0, Zr::new(1, m.clone())), (1, 2, Zr::new(4, m.clone()))],
        );
        let t = a.transpose();
        assert_eq!(t.nrows(), 3);
        assert_eq!(t.ncols(), 2);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn mul_vec_matches_manual_computation() {
        let m = Modulus::from_u64(11).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![
                (0, 0, Zr::new(2, m.clone())),
                (0, 1, Zr::new(3, m.clone())),
                (1, 0, Zr::new(1, m.clone())),
            ],
        );
        let v = SparseVector::from_sorted_entries(vec![(0, Zr::new(5, m.clone())), (1, Zr::new(7, m.clone()))]);
        let zero = Zr::zero_in(m.clone());
        let w = a.mul_vec(&v, &zero);
        assert_eq!(w[0], Zr::new(2 * 5 + 3 * 7, m.clone()));
        assert_eq!(w[1], Zr::new(5, m));
    }

    #[test]
    fn integer_content_is_gcd_of_entries() {
        let a = SparseMatrix::from_entries(2, 2, vec![(0, 0, Z::from(6)), (1, 1, Z::from(9))]);
        assert_eq!(a.content(), Z::from(3));
    }
}
