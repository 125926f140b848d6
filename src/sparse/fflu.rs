//! Fraction-free (Bareiss) LU over `Z`: every intermediate entry stays an
//! exact integer by dividing through the previous pivot instead of
//! introducing rationals, and the final corner entry is `det(A)` (up to
//! sign, for a square input).

use crate::error::{LinalgError, Result};
use crate::ring::Z;
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::vector::{at_z, SparseVector};

pub struct Fflu {
    pub mat: SparseMatrix<Z>,
    /// Row permutation applied before elimination (`perm[k]` = original
    /// row placed at position `k`).
    pub perm: Vec<usize>,
    /// `true` iff `perm` is an odd permutation (needed to get `det`'s
    /// sign right from the corner entry).
    pub sign_flipped: bool,
}

/// Fraction-free Gaussian elimination (Bareiss' algorithm): after step
/// `k`, every entry `a[i][j]` for `i, j > k` equals the `(k+2) x (k+2)`
/// minor of the original matrix using rows/cols `{0..=k, i}`/`{0..=k, j}`,
/// divided exactly by the previous pivot `a[k-1][k-1]` (or `1` for
/// `k == 0`).
pub fn fflu(a: &SparseMatrix<Z>) -> Result<Fflu> {
    let n = a.nrows();
    let m = a.ncols();
    let mut dense: Vec<Vec<Z>> = a.to_dense_vec();
    let mut perm: Vec<usize> = (0..n).collect();
    let mut sign_flipped = false;
    let mut prev_pivot = Z::from(1);

    for k in 0..n.min(m) {
        if num_traits::Zero::is_zero(&dense[k][k]) {
            let swap_with = (k + 1..n).find(|&r| !num_traits::Zero::is_zero(&dense[r][k]));
            match swap_with {
                Some(r) => {
                    dense.swap(k, r);
                    perm.swap(k, r);
                    sign_flipped = !sign_flipped;
                }
                None => continue,
            }
        }
        let pivot = dense[k][k].clone();
        for i in (k + 1)..n {
            for j in (k + 1)..m {
                let cross = &dense[i][j] * &pivot - &dense[i][k] * &dense[k][j];
                dense[i][j] = if num_traits::Zero::is_zero(&prev_pivot) {
                    cross
                } else {
                    &cross / &prev_pivot
                };
            }
            dense[i][k] = Z::from(0);
        }
        prev_pivot = pivot;
    }

    let mat = SparseMatrix::from_dense_z(&dense);
    Ok(Fflu { mat, perm, sign_flipped })
}

/// `det(A)` for a square `A`, via Bareiss elimination (the bottom-right
/// corner entry after full elimination, sign-corrected for row swaps).
pub fn det_bareiss(a: &SparseMatrix<Z>) -> Result<Z> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::ShapeMismatch {
            expected: "square matrix".into(),
            found: format!("{}x{}", a.nrows(), a.ncols()),
        });
    }
    let decomp = fflu(a)?;
    let n = a.nrows();
    let corner = at_z(decomp.mat.row(n - 1), (n - 1) as i64);
    Ok(if decomp.sign_flipped { -corner } else { corner })
}

/// `det(A)` via cofactor expansion along the first row. Exponential in
/// general but useful as an independent check for small matrices, and
/// matches the supplemented `det_cofactor` entry point of the original
/// FLINT sparse-matrix API.
pub fn det_cofactor(a: &SparseMatrix<Z>) -> Result<Z> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::ShapeMismatch {
            expected: "square matrix".into(),
            found: format!("{}x{}", a.nrows(), a.ncols()),
        });
    }
    let n = a.nrows();
    if n == 0 {
        return Ok(Z::from(1));
    }
    if n == 1 {
        return Ok(at_z(a.row(0), 0));
    }
    let dense = a.to_dense_vec();
    let mut det = Z::from(0);
    for j in 0..n {
        let coeff = &dense[0][j];
        if num_traits::Zero::is_zero(coeff) {
            continue;
        }
        let minor: Vec<Vec<Z>> = dense[1..]
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(c, _)| *c != j)
                    .map(|(_, v)| v.clone())
                    .collect()
            })
            .collect();
        let minor_mat = SparseMatrix::from_dense_z(&minor);
        let sub_det = det_cofactor(&minor_mat)?;
        let term = coeff * &sub_det;
        det = if j % 2 == 0 { det + term } else { det - term };
    }
    Ok(det)
}

/// `det(A) / divisor`, failing with [`LinalgError::Inexact`] if
/// `divisor` does not evenly divide the determinant. Used when a caller
/// already knows a factor of the determinant (e.g. from an HNF diagonal)
/// and wants the cofactor cheaply.
pub fn det_divisor(a: &SparseMatrix<Z>, divisor: &Z) -> Result<Z> {
    let d = det_bareiss(a)?;
    if num_traits::Zero::is_zero(divisor) {
        return Err(LinalgError::DivisionByZero("det_divisor divisor is zero".into()));
    }
    if (&d % divisor) != Z::from(0) {
        return Err(LinalgError::Inexact(format!("{} does not divide det {}", divisor, d)));
    }
    Ok(&d / divisor)
}

/// `det(A) mod p`, computed over the modular image directly (cheaper than
/// lifting a full integer determinant when only a residue is needed, e.g.
/// for a CRT reconstruction witness).
pub fn det_modular(a: &SparseMatrix<Z>, modulus: &crate::ring::Modulus) -> Result<crate::ring::Zr> {
    let reduced = a.mod_reduce(modulus.clone());
    let decomp = crate::sparse::lu::lu(&reduced)?;
    if decomp.rank < a.nrows() {
        return Ok(crate::ring::Zr::zero_in(modulus.clone()));
    }
    let mut det = crate::ring::Zr::one_in(modulus.clone());
    for row in decomp.u.rows() {
        if let Some((_, v)) = row.leading() {
            det = det.mul(v)?;
        }
    }
    let mut swaps = 0usize;
    let mut perm = decomp.p.clone();
    for i in 0..perm.len() {
        while perm[i] != i {
            let j = perm[i];
            perm.swap(i, j);
            swaps += 1;
        }
    }
    if swaps % 2 == 1 {
        det = det.neg();
    }
    Ok(det)
}

/// `det(A) mod p`, given a known non-modular divisor of the determinant
/// already factored out (so only the cofactor needs to be computed mod
/// `p`); combines with [`det_divisor`]-style reasoning applied in the
/// modular image.
pub fn det_modular_given_divisor(
    a: &SparseMatrix<Z>,
    modulus: &crate::ring::Modulus,
    divisor: &Z,
) -> Result<crate::ring::Zr> {
    let d_mod = det_modular(a, modulus)?;
    let divisor_mod = crate::ring::Zr::new(divisor.clone(), modulus.clone());
    d_mod.mul(&divisor_mod.try_inv()?)
}

impl SparseMatrix<Z> {
    pub(crate) fn to_dense_vec(&self) -> Vec<Vec<Z>> {
        (0..self.nrows())
            .map(|i| {
                let mut row = vec![Z::from(0); self.ncols()];
                for (c, v) in self.row(i).entries() {
                    row[*c as usize] = v.clone();
                }
                row
            })
            .collect()
    }

    pub(crate) fn from_dense_z(dense: &[Vec<Z>]) -> Self {
        let r = dense.len();
        let c = dense.first().map(|row| row.len()).unwrap_or(0);
        let mut entries = Vec::new();
        for (i, row) in dense.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                if !num_traits::Zero::is_zero(v) {
                    entries.push((i, j as i64, v.clone()));
                }
            }
        }
        SparseMatrix::from_entries(r, c, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bareiss_matches_cofactor_determinant() {
        let a = SparseMatrix::from_entries(
            3,
            3,
            vec![
                (0, 0, Z::from(1)),
                (0, 1, Z::from(2)),
                (0, 2, Z::from(3)),
                (1, 0, Z::from(4)),
                (1, 1, Z::from(5)),
                (1, 2, Z::from(6)),
                (2, 0, Z::from(7)),
                (2, 1, Z::from(8)),
                (2, 2, Z::from(10)),
            ],
        );
        let d1 = det_bareiss(&a).unwrap();
        let d2 = det_cofactor(&a).unwrap();
        assert_eq!(d1, d2);
        assert_eq!(d1, Z::from(-3));
    }

    #[test]
    fn det_divisor_divides_exactly() {
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![(0, 0, Z::from(2)), (0, 1, Z::from(0)), (1, 0, Z::from(0)), (1, 1, Z::from(6))],
        );
        assert_eq!(det_divisor(&a, &Z::from(2)).unwrap(), Z::from(6));
        assert!(det_divisor(&a, &Z::from(5)).is_err());
    }
}
