//! A dense row-major matrix over `Z/nZ`, backed by [`ndarray::Array2`].

use crate::error::{LinalgError, Result};
use crate::ring::{Modulus, Zr};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};

#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    data: Array2<Zr>,
    modulus: Modulus,
}

impl DenseMatrix {
    pub fn zeros(r: usize, c: usize, modulus: Modulus) -> Self {
        let data = Array2::from_elem((r, c), Zr::zero_in(modulus.clone()));
        DenseMatrix { data, modulus }
    }

    pub fn identity(n: usize, modulus: Modulus) -> Self {
        let mut m = Self::zeros(n, n, modulus.clone());
        for i in 0..n {
            m.data[[i, i]] = Zr::one_in(modulus.clone());
        }
        m
    }

    pub fn from_rows(rows: Vec<Vec<Zr>>, modulus: Modulus) -> Result<Self> {
        let r = rows.len();
        let c = rows.first().map(|row| row.len()).unwrap_or(0);
        if rows.iter().any(|row| row.len() != c) {
            return Err(LinalgError::ShapeMismatch {
                expected: format!("every row with {} columns", c),
                found: "ragged rows".into(),
            });
        }
        let flat: Vec<Zr> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((r, c), flat)
            .map_err(|e| LinalgError::ShapeMismatch { expected: "rectangular data".into(), found: e.to_string() })?;
        Ok(DenseMatrix { data, modulus })
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    pub fn get(&self, i: usize, j: usize) -> &Zr {
        &self.data[[i, j]]
    }

    pub fn set(&mut self, i: usize, j: usize, v: Zr) {
        self.data[[i, j]] = v;
    }

    pub fn view(&self) -> ArrayView2<'_, Zr> {
        self.data.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, Zr> {
        self.data.view_mut()
    }

    /// A borrowed window over rows `[r0, r1)` and columns `[c0, c1)`.
    pub fn window(&self, r0: usize, r1: usize, c0: usize, c1: usize) -> ArrayView2<'_, Zr> {
        self.data.slice(ndarray::s![r0..r1, c0..c1])
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for k in 0..self.ncols() {
            self.data.swap([i, k], [j, k]);
        }
    }

    pub fn transpose(&self) -> DenseMatrix {
        DenseMatrix {
            data: self.data.t().to_owned(),
            modulus: self.modulus.clone(),
        }
    }

    /// `A * v` against a dense column vector.
    pub fn mul_vec(&self, v: &[Zr]) -> Result<Vec<Zr>> {
        if v.len() != self.ncols() {
            return Err(LinalgError::ShapeMismatch {
                expected: format!("vector of length {}", self.ncols()),
                found: format!("length {}", v.len()),
            });
        }
        let mut out = Vec::with_capacity(self.nrows());
        for i in 0..self.nrows() {
            let mut acc = Zr::zero_in(self.modulus.clone());
            for j in 0..self.ncols() {
                acc = acc.add(&self.data[[i, j]].mul(&v[j])?)?;
            }
            out.push(acc);
        }
        Ok(out)
    }

    /// `A * B`, classical triple-loop matrix multiplication (no BLAS:
    /// every entry lives in `Z/nZ`, not a floating-point field).
    pub fn mul_mat(&self, other: &DenseMatrix) -> Result<DenseMatrix> {
        if self.ncols() != other.nrows() {
            return Err(LinalgError::ShapeMismatch {
                expected: format!("{} rows", self.ncols()),
                found: format!("{} rows", other.nrows()),
            });
        }
        let mut out = DenseMatrix::zeros(self.nrows(), other.ncols(), self.modulus.clone());
        for i in 0..self.nrows() {
            for k in 0..self.ncols() {
                let a_ik = &self.data[[i, k]];
                if a_ik.is_zero() {
                    continue;
                }
                for j in 0..other.ncols() {
                    let term = a_ik.mul(&other.data[[k, j]])?;
                    out.data[[i, j]] = out.data[[i, j]].add(&term)?;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_multiplicative_unit() {
        let m = Modulus::from_u64(13).unwrap();
        let a = DenseMatrix::from_rows(
            vec![
                vec![Zr::new(2, m.clone()), Zr::new(3, m.clone())],
                vec![Zr::new(1, m.clone()), Zr::new(4, m.clone())],
            ],
            m.clone(),
        )
        .unwrap();
        let i = DenseMatrix::identity(2, m);
        let prod = a.mul_mat(&i).unwrap();
        assert_eq!(prod, a);
    }

    #[test]
    fn transpose_is_involutive() {
        let m = Modulus::from_u64(7).unwrap();
        let a = DenseMatrix::from_rows(
            vec![
                vec![Zr::new(1, m.clone()), Zr::new(2, m.clone()), Zr::new(3, m.clone())],
                vec![Zr::new(4, m.clone()), Zr::new(5, m.clone()), Zr::new(6, m.clone())],
            ],
            m,
        )
        .unwrap();
        assert_eq!(a.transpose().transpose(), a);
    }
}
