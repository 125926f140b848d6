//! Parallel row reduction: the work of eliminating a pivot column from
//! every other row is independent per row, so it is split across a
//! worker pool sized by how big the ring and matrix are. Below a size
//! threshold the overhead of spawning work isn't worth it and everything
//! runs on the calling thread.

use crate::ring::{Modulus, Zr};

/// Number of workers to use for reducing an `r x c` dense matrix over a
/// ring whose modulus has `bits(n)` bits: `clamp((bits(n) + r + c - 64) /
/// 64, 0, r)`. Small problems collapse to a single (sequential) worker.
pub fn worker_count(modulus: &Modulus, rows: usize, cols: usize) -> usize {
    let bits = modulus.bits() as i64;
    let estimate = (bits + rows as i64 + cols as i64 - 64) / 64;
    estimate.clamp(0, rows as i64).max(1) as usize
}

/// Eliminate `pivot_col` from every row in `rows` other than `skip`
/// (the pivot row itself, already normalized and passed separately as
/// `pivot`), using `coeff(row) = rows[row][pivot_col] / pivot[pivot_col]`:
/// each row becomes `row - coeff(row) * pivot`. Runs on the calling thread
/// unless the `parallel` feature is enabled and the worker-count heuristic
/// picks more than one worker.
pub fn eliminate_column(
    rows: &mut [Vec<Zr>],
    skip: usize,
    pivot: &[Zr],
    pivot_col: usize,
    modulus: &Modulus,
) -> crate::error::Result<()> {
    let workers = worker_count(modulus, rows.len(), pivot.len());

    #[cfg(feature = "parallel")]
    {
        if workers > 1 {
            use rayon::prelude::*;
            let pivot_inv = pivot[pivot_col].try_inv()?;
            rows.par_iter_mut()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .try_for_each(|(_, row)| -> crate::error::Result<()> { eliminate_one_row(row, pivot, pivot_col, &pivot_inv) })?;
            return Ok(());
        }
    }
    let _ = workers;
    let pivot_inv = pivot[pivot_col].try_inv()?;
    for (i, row) in rows.iter_mut().enumerate() {
        if i == skip {
            continue;
        }
        eliminate_one_row(row, pivot, pivot_col, &pivot_inv)?;
    }
    Ok(())
}

fn eliminate_one_row(row: &mut [Zr], pivot: &[Zr], pivot_col: usize, pivot_inv: &Zr) -> crate::error::Result<()> {
    let coeff = row[pivot_col].mul(pivot_inv)?;
    if coeff.is_zero() {
        return Ok(());
    }
    for (r, p) in row.iter_mut().zip(pivot.iter()) {
        *r = r.sub(&p.mul(&coeff)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_is_at_least_one() {
        let m = Modulus::from_u64(7).unwrap();
        assert!(worker_count(&m, 2, 2) >= 1);
    }

    #[test]
    fn worker_count_scales_with_problem_size() {
        let m = Modulus::from_u64(7).unwrap();
        assert!(worker_count(&m, 10_000, 10_000) >= worker_count(&m, 2, 2));
    }

    #[test]
    fn eliminate_column_zeros_out_target_entries() {
        let m = Modulus::from_u64(11).unwrap();
        let pivot = vec![Zr::new(1, m.clone()), Zr::new(2, m.clone())];
        let mut rows = vec![pivot.clone(), vec![Zr::new(3, m.clone()), Zr::new(5, m.clone())]];
        eliminate_column(&mut rows, 0, &pivot, 0, &m).unwrap();
        assert!(rows[1][0].is_zero());
    }
}
