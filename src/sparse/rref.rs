//! Reduced row echelon form over a prime field: every pivot is normalized
//! to `1` and is the only non-zero entry in its column.

use crate::error::Result;
use crate::ring::Zr;
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::vector::SparseVector;

/// Row-reduce `a` to RREF. Returns the reduced matrix together with the
/// pivot column of each non-zero row (rows past the last pivot, if any,
/// are entirely zero) and the overall rank.
pub struct Rref {
    pub mat: SparseMatrix<Zr>,
    pub pivot_cols: Vec<i64>,
    pub rank: usize,
}

pub fn rref(a: &SparseMatrix<Zr>) -> Result<Rref> {
    let nrows = a.nrows();
    let ncols = a.ncols();
    let mut rows: Vec<SparseVector<Zr>> = a.rows().to_vec();
    let mut used_row = vec![false; nrows];
    let mut pivot_cols = Vec::new();

    for col in 0..ncols as i64 {
        let pivot_row = (0..nrows)
            .find(|&r| !used_row[r] && rows[r].entries().iter().any(|(c, v)| *c == col && !v.is_zero()));
        let pivot_row = match pivot_row {
            Some(r) => r,
            None => continue,
        };
        let pivot_val = rows[pivot_row]
            .entries()
            .iter()
            .find(|(c, _)| *c == col)
            .map(|(_, v)| v.clone())
            .unwrap();
        let inv = pivot_val.try_inv()?;
        rows[pivot_row] = SparseVector::scalar_mul(&rows[pivot_row], &inv);
        let pivot_clone = rows[pivot_row].clone();
        for r in 0..nrows {
            if r == pivot_row {
                continue;
            }
            let coeff = rows[r].entries().iter().find(|(c, _)| *c == col).map(|(_, v)| v.clone());
            if let Some(coeff) = coeff {
                if !coeff.is_zero() {
                    rows[r] = SparseVector::scalar_submul(&rows[r], &pivot_clone, &coeff);
                }
            }
        }
        used_row[pivot_row] = true;
        pivot_cols.push(col);
    }

    // Reorder so pivot rows come first, in increasing pivot-column order,
    // followed by the (necessarily zero) remaining rows.
    let mut pivot_rows: Vec<(i64, SparseVector<Zr>)> = Vec::new();
    let mut zero_rows: Vec<SparseVector<Zr>> = Vec::new();
    for (r, row) in rows.into_iter().enumerate() {
        if used_row[r] {
            let col = *row.leading().map(|(c, _)| c).unwrap_or(&-1);
            pivot_rows.push((col, row));
        } else {
            zero_rows.push(row);
        }
    }
    pivot_rows.sort_by_key(|(c, _)| *c);
    let rank = pivot_rows.len();
    let mut out_rows: Vec<SparseVector<Zr>> = pivot_rows.into_iter().map(|(_, r)| r).collect();
    out_rows.extend(zero_rows);

    let mat = SparseMatrix::from_entries(
        nrows,
        ncols,
        out_rows
            .into_iter()
            .enumerate()
            .flat_map(|(i, row)| row.entries().iter().map(move |(c, v)| (i, *c, v.clone())).collect::<Vec<_>>())
            .collect(),
    );
    pivot_cols.sort();
    Ok(Rref { mat, pivot_cols, rank })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::Modulus;

    #[test]
    fn reduces_to_identity_for_full_rank_square() {
        let m = Modulus::from_u64(7).unwrap();
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![
                (0, 0, Zr::new(2, m.clone())),
                (0, 1, Zr::new(1, m.clone())),
                (1, 0, Zr::new(1, m.clone())),
                (1, 1, Zr::new(3, m.clone())),
            ],
        );
        let r = rref(&a).unwrap();
        assert_eq!(r.rank, 2);
        assert_eq!(r.pivot_cols, vec![0, 1]);
        let dense = r.mat.to_dense(m.clone());
        assert_eq!(dense[0][0], Zr::one_in(m.clone()));
        assert_eq!(dense[0][1], Zr::zero_in(m.clone()));
        assert_eq!(dense[1][0], Zr::zero_in(m.clone()));
        assert_eq!(dense[1][1], Zr::one_in(m));
    }

    #[test]
    fn rank_deficient_leaves_a_free_column() {
        let m = Modulus::from_u64(5).unwrap();
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
        let r = rref(&a).unwrap();
        assert_eq!(r.rank, 1);
        assert_eq!(r.pivot_cols, vec![0]);
    }
}
