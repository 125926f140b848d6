//! Small dense matrix helpers over `Z/nZ`, shared by the block-Wiedemann
//! and block-Lanczos constructions: both work with `b x b` and `n x b`
//! "block" matrices rather than single vectors, but never need anything
//! as general as [`crate::dense::matrix::DenseMatrix`] (no windowing, no
//! row-swap-in-place API) — just multiply, add, transpose, and a
//! sparse-matrix-times-block-of-columns product.

use crate::ring::Zr;
use crate::sparse::matrix::SparseMatrix;

/// A dense matrix stored row-major, `rows[i][j]`.
pub type Mat = Vec<Vec<Zr>>;

pub fn zero(rows: usize, cols: usize, zero: &Zr) -> Mat {
    vec![vec![zero.clone(); cols]; rows]
}

pub fn identity(n: usize, zero: &Zr, one: &Zr) -> Mat {
    let mut m = self::zero(n, n, zero);
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = one.clone();
    }
    m
}

pub fn is_zero(a: &Mat) -> bool {
    a.iter().all(|row| row.iter().all(|v| v.is_zero()))
}

pub fn transpose(a: &Mat) -> Mat {
    if a.is_empty() {
        return Vec::new();
    }
    let cols = a[0].len();
    (0..cols).map(|c| a.iter().map(|row| row[c].clone()).collect()).collect()
}

pub fn mul(a: &Mat, b: &Mat, zero: &Zr) -> Mat {
    let rows = a.len();
    let inner = b.len();
    let cols = b.first().map(|row| row.len()).unwrap_or(0);
    let mut out = self::zero(rows, cols, zero);
    for i in 0..rows {
        for k in 0..inner {
            if a[i][k].is_zero() {
                continue;
            }
            for j in 0..cols {
                out[i][j] = out[i][j].add(&a[i][k].mul(&b[k][j]).unwrap()).unwrap();
            }
        }
    }
    out
}

/// `c + a*b`.
pub fn addmul(c: &Mat, a: &Mat, b: &Mat, zero: &Zr) -> Mat {
    let mut out = mul(a, b, zero);
    add_assign(&mut out, c);
    out
}

pub fn add_assign(a: &mut Mat, b: &Mat) {
    for (ar, br) in a.iter_mut().zip(b.iter()) {
        for (av, bv) in ar.iter_mut().zip(br.iter()) {
            *av = av.add(bv).unwrap();
        }
    }
}

pub fn neg(a: &Mat) -> Mat {
    a.iter().map(|row| row.iter().map(|v| v.neg()).collect()).collect()
}

/// `a * v` for a length-`b` column vector `v`.
pub fn mul_vec(a: &Mat, v: &[Zr], zero: &Zr) -> Vec<Zr> {
    a.iter()
        .map(|row| row.iter().zip(v.iter()).fold(zero.clone(), |acc, (x, y)| acc.add(&x.mul(y).unwrap()).unwrap()))
        .collect()
}

/// Zero out every column not flagged in `good`.
pub fn kill_columns(a: &mut Mat, good: &[bool], zero: &Zr) {
    for row in a.iter_mut() {
        for (c, v) in row.iter_mut().enumerate() {
            if !good[c] {
                *v = zero.clone();
            }
        }
    }
}

/// `M * y` where `y` is an `n x b` block of dense columns: apply
/// [`SparseMatrix::mul_dense_vec`] one column at a time.
pub fn sparse_mul_dense(m: &SparseMatrix<Zr>, y: &Mat, zero: &Zr) -> Mat {
    let b = y.first().map(|row| row.len()).unwrap_or(0);
    let cols: Vec<Vec<Zr>> = (0..b)
        .map(|j| {
            let col: Vec<Zr> = y.iter().map(|row| row[j].clone()).collect();
            m.mul_dense_vec(&col, zero)
        })
        .collect();
    let n_rows = m.nrows();
    (0..n_rows).map(|i| (0..b).map(|j| cols[j][i].clone()).collect()).collect()
}
