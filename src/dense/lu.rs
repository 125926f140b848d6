//! Dense rank-revealing row reduction over a prime field, parallelised
//! per [`crate::dense::reduce::worker_count`].

use crate::dense::matrix::DenseMatrix;
use crate::dense::reduce::eliminate_column;
use crate::error::Result;
use crate::ring::Zr;

pub struct DenseRref {
    pub rows: Vec<Vec<Zr>>,
    pub pivot_cols: Vec<usize>,
    pub rank: usize,
}

/// Row-reduce `a` to RREF, eliminating every pivot column from every
/// other row (above and below) in one parallel pass per pivot.
pub fn rref(a: &DenseMatrix) -> Result<DenseRref> {
    let modulus = a.modulus().clone();
    let nrows = a.nrows();
    let ncols = a.ncols();
    let mut rows: Vec<Vec<Zr>> = (0..nrows).map(|i| (0..ncols).map(|j| a.get(i, j).clone()).collect()).collect();
    let mut used = vec![false; nrows];
    let mut pivot_cols = Vec::new();

    for col in 0..ncols {
        let pivot_row = (0..nrows).find(|&r| !used[r] && !rows[r][col].is_zero());
        let pivot_row = match pivot_row {
            Some(r) => r,
            None => continue,
        };
        let inv = rows[pivot_row][col].try_inv()?;
        for v in rows[pivot_row].iter_mut() {
            *v = v.mul(&inv)?;
        }
        let pivot = rows[pivot_row].clone();
        eliminate_column(&mut rows, pivot_row, &pivot, col, &modulus)?;
        used[pivot_row] = true;
        pivot_cols.push(col);
    }

    let rank = pivot_cols.len();
    Ok(DenseRref { rows, pivot_cols, rank })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::Modulus;

    #[test]
    fn reduces_to_identity_for_full_rank_square() {
        let m = Modulus::from_u64(13).unwrap();
        let a = DenseMatrix::from_rows(
            vec![
                vec![Zr::new(2, m.clone()), Zr::new(3, m.clone())],
                vec![Zr::new(1, m.clone()), Zr::new(4, m.clone())],
            ],
            m.clone(),
        )
        .unwrap();
        let r = rref(&a).unwrap();
        assert_eq!(r.rank, 2);
        assert_eq!(r.pivot_cols, vec![0, 1]);
        assert_eq!(r.rows[0][0], Zr::one_in(m.clone()));
        assert!(r.rows[0][1].is_zero());
        assert!(r.rows[1][0].is_zero());
        assert_eq!(r.rows[1][1], Zr::one_in(m));
    }

    #[test]
    fn rank_deficient_leaves_a_free_column() {
        let m = Modulus::from_u64(7).unwrap();
        let a = DenseMatrix::from_rows(
            vec![
                vec![Zr::new(1, m.clone()), Zr::new(2, m.clone())],
                vec![Zr::new(2, m.clone()), Zr::new(4, m.clone())],
            ],
            m,
        )
        .unwrap();
        let r = rref(&a).unwrap();
        assert_eq!(r.rank, 1);
        assert_eq!(r.pivot_cols, vec![0]);
    }
}
