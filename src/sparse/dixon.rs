//! Dixon p-adic lifting: solve `Ax = b` exactly over `Q` by lifting a
//! single-prime modular inverse through increasing powers of `p`, then
//! rationally reconstructing the result, combined with plain multi-modulus
//! CRT helpers used elsewhere to rebuild integer results from several
//! independent modular images.

use crate::error::{LinalgError, Result};
use crate::ring::{xgcd, Modulus, Z};
use crate::sparse::matrix::SparseMatrix;
use crate::sparse::solve::solve as solve_mod;
use crate::ring::Zr;
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};

/// A rough bound on the number of p-adic digits Dixon lifting needs
/// before rational reconstruction is guaranteed to recover the exact
/// answer: `2 * max(|det(A)|, max|b_i|) * max|a_ij|^n`-ish growth, here
/// approximated from the matrix/vector entry sizes and dimension the way
/// `fmpz_sparse_mat`'s `solve_bound` estimates it without computing a
/// full determinant up front.
pub fn solve_bound(a: &SparseMatrix<Z>, b: &[Z]) -> u64 {
    let n = a.nrows().max(1) as u64;
    let a_bits = a.max_bits();
    let b_bits = b.iter().map(|v| v.abs().bits()).max().unwrap_or(0);
    2 * (n * a_bits + b_bits) + 64
}

/// Solve `Ax = b` over `Q`, returning `(numerators, denominator)` with
/// `A * numerators = denominator * b`, or `None` if `A` has no prime `p`
/// in a small search window that keeps it invertible mod `p` (practically
/// only possible if `A` itself is singular over `Q`).
pub fn solve_dixon(a: &SparseMatrix<Z>, b: &[Z]) -> Result<Option<(Vec<Z>, Z)>> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: "square matrix".into(),
            found: format!("{}x{}", n, a.ncols()),
        });
    }
    let prime = match find_good_prime(a) {
        Some(p) => p,
        None => return Ok(None),
    };
    let modulus = Modulus::from_u64(prime)?;
    let a_mod = a.mod_reduce(modulus.clone());

    let bits_needed = solve_bound(a, b);
    let prime_bits = (64 - prime.leading_zeros()) as u64;
    let iterations = (bits_needed / prime_bits + 2) as usize;

    let mut xs = vec![Z::from(0); n];
    let mut r: Vec<Z> = b.to_vec();
    let p_big = Z::from(prime);
    let mut p_power = Z::from(1);

    for _ in 0..iterations.max(1) {
        let r_mod: Vec<Zr> = r.iter().map(|v| Zr::new(v.clone(), modulus.clone())).collect();
        let t_mod = match solve_mod(&a_mod, &r_mod)? {
            Some(t) => t,
            None => return Ok(None),
        };
        let t: Vec<Z> = t_mod.iter().map(|v| v.signed_value()).collect();
        for i in 0..n {
            xs[i] = &xs[i] + &t[i] * &p_power;
        }
        let at = a.mul_dense_vec(&t, &Z::from(0));
        for i in 0..n {
            r[i] = (&r[i] - &at[i]) / &p_big;
        }
        p_power = &p_power * &p_big;
    }

    let mut den_lcm = Z::from(1);
    let mut recon = Vec::with_capacity(n);
    for xi in &xs {
        let (num, den) = match rational_reconstruct(xi, &p_power) {
            Some(pair) => pair,
            None => return Ok(None),
        };
        den_lcm = lcm(&den_lcm, &den);
        recon.push((num, den));
    }
    let numerators = recon
        .into_iter()
        .map(|(num, den)| &num * (&den_lcm / &den))
        .collect();
    Ok(Some((numerators, den_lcm)))
}

/// [`solve_dixon`], but pre-dividing by the common denominator when it
/// evenly divides every numerator (returning a pure integer solution in
/// that case rather than a formal fraction).
pub fn solve_dixon_den(a: &SparseMatrix<Z>, b: &[Z]) -> Result<Option<Vec<Z>>> {
    match solve_dixon(a, b)? {
        Some((nums, den)) => {
            if den == Z::from(1) {
                Ok(Some(nums))
            } else if nums.iter().all(|v| (v % &den) == Z::from(0)) {
                Ok(Some(nums.iter().map(|v| v / &den).collect()))
            } else {
                Err(LinalgError::Inexact(format!(
                    "solution is not integral: denominator {} does not divide every numerator",
                    den
                )))
            }
        }
        None => Ok(None),
    }
}

fn find_good_prime(a: &SparseMatrix<Z>) -> Option<u64> {
    const CANDIDATES: &[u64] = &[
        2147483647, 2147483629, 2147483587, 2147483579, 2147483563, 2147483549,
    ];
    for &p in CANDIDATES {
        let modulus = Modulus::from_u64(p).ok()?;
        let reduced = a.mod_reduce(modulus);
        if let Ok(decomp) = crate::sparse::lu::lu(&reduced) {
            if decomp.rank == a.nrows() {
                return Some(p);
            }
        }
    }
    None
}

/// Rational reconstruction: find `(num, den)` with `num/den ≡ a (mod m)`
/// and `|num|, |den| <= sqrt(m/2)`, via the extended-Euclid partial-GCD
/// stopping rule. Returns `None` if no such pair exists within the bound.
fn rational_reconstruct(a: &Z, m: &Z) -> Option<(Z, Z)> {
    let bound = isqrt(&(m / 2i32));
    let a_mod = ((a % m) + m) % m;
    let (mut old_r, mut r) = (m.clone(), a_mod);
    let (mut old_s, mut s) = (Z::from(0), Z::from(1));
    while r.abs() > bound {
        if r.is_zero() {
            return None;
        }
        let q = &old_r / &r;
        let new_r = &old_r - &q * &r;
        let new_s = &old_s - &q * &s;
        old_r = r;
        r = new_r;
        old_s = s;
        s = new_s;
    }
    if s.is_zero() {
        return None;
    }
    let (mut num, mut den) = (r, s);
    if den.is_negative() {
        num = -num;
        den = -den;
    }
    if crate::ring::gcd(&num, &den) != Z::from(1) {
        return None;
    }
    Some((num, den))
}

fn isqrt(n: &Z) -> Z {
    if n.sign() == Sign::Minus {
        return Z::from(0);
    }
    let (sign, digits) = n.to_bytes_be();
    let _ = sign;
    let u = num_bigint::BigUint::from_bytes_be(&digits);
    BigInt::from(u.sqrt())
}

fn lcm(a: &Z, b: &Z) -> Z {
    if a.is_zero() || b.is_zero() {
        return Z::from(0);
    }
    (a / crate::ring::gcd(a, b)) * b
}

/// Reduce an integer vector modulo each of `moduli`, one residue vector
/// per modulus (the sparse-matrix analogue reduces every row the same
/// way via [`SparseMatrix::mod_reduce`]).
pub fn multi_mod_ui(v: &[Z], moduli: &[Modulus]) -> Vec<Vec<Zr>> {
    moduli
        .iter()
        .map(|m| v.iter().map(|x| Zr::new(x.clone(), m.clone())).collect())
        .collect()
}

/// Reconstruct an integer vector from per-modulus residues via CRT,
/// given pairwise coprime `moduli`.
pub fn multi_crt_ui(residues: &[Vec<Zr>], moduli: &[Modulus]) -> Vec<Z> {
    let len = residues.first().map(|r| r.len()).unwrap_or(0);
    (0..len)
        .map(|i| {
            let vals: Vec<Z> = residues.iter().map(|r| r[i].signed_value()).collect();
            crt_ui(&vals, moduli)
        })
        .collect()
}

/// CRT-combine a list of residues against pairwise coprime moduli into a
/// single integer in `(-M/2, M/2]` where `M` is the product of `moduli`.
pub fn crt_ui(residues: &[Z], moduli: &[Modulus]) -> Z {
    let m_values: Vec<Z> = moduli.iter().map(|m| m.value().clone().into()).collect();
    let total: Z = m_values.iter().fold(Z::from(1), |acc, m| &acc * m);
    let mut acc = Z::from(0);
    for (r, m) in residues.iter().zip(m_values.iter()) {
        let ni = &total / m;
        let (_, inv, _) = xgcd(&ni, m);
        acc += r * &ni * inv;
    }
    let reduced = ((&acc % &total) + &total) % &total;
    if &reduced > &(&total / 2) {
        reduced - total
    } else {
        reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_bound_grows_with_matrix_size() {
        let small = SparseMatrix::from_entries(1, 1, vec![(0, 0, Z::from(2))]);
        let large = SparseMatrix::from_entries(
            3,
            3,
            vec![(0, 0, Z::from(1000)), (1, 1, Z::from(1000)), (2, 2, Z::from(1000))],
        );
        assert!(solve_bound(&large, &[Z::from(1), Z::from(1), Z::from(1)]) > solve_bound(&small, &[Z::from(1)]));
    }

    #[test]
    fn solves_simple_integer_system_exactly() {
        let a = SparseMatrix::from_entries(
            2,
            2,
            vec![
                (0, 0, Z::from(2)),
                (0, 1, Z::from(1)),
                (1, 0, Z::from(1)),
                (1, 1, Z::from(3)),
            ],
        );
        let b = vec![Z::from(5), Z::from(10)];
        let (nums, den) = solve_dixon(&a, &b).unwrap().unwrap();
        // check A*nums == den*b
        let lhs = a.mul_dense_vec(&nums, &Z::from(0));
        let rhs: Vec<Z> = b.iter().map(|v| v * &den).collect();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn crt_roundtrips_small_values() {
        let m1 = Modulus::from_u64(7).unwrap();
        let m2 = Modulus::from_u64(11).unwrap();
        let value = Z::from(-15);
        let r1 = ((&value % 7i32) + 7i32) % 7i32;
        let r2 = ((&value % 11i32) + 11i32) % 11i32;
        let combined = crt_ui(&[r1, r2], &[m1, m2]);
        assert_eq!(combined, value);
    }
}
