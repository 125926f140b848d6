//! Multivariate polynomial "array" exact division: pack every monomial
//! of the dividend into a dense coefficient array indexed by a mixed-
//! radix packed exponent (feasible iff the product of per-variable
//! degree bounds stays under [`MAX_ARRAY_SIZE`]), then walk the array in
//! ascending index order dividing out the divisor's leading term at
//! every non-zero cell and block-subtracting the scaled divisor back in.
//!
//! Coefficients are held in a [`CoeffBuf`] sized to the smallest of
//! `i64`/`i128`/a 192-bit `BigInt`/an unbounded `BigInt` that can hold
//! the products involved, rather than three duplicated fixed-width
//! loops: the loop body is one `match` per chunk instead of one
//! monomorphized function per width.

use crate::error::{LinalgError, Result};
use crate::ring::Z;
use num_traits::{Signed, Zero};

/// Above this many packed array cells, the array method is not used (the
/// caller should fall back to a different multiplication/division
/// strategy, e.g. heap-based).
pub const MAX_ARRAY_SIZE: usize = 300_000;

/// A sparse multivariate polynomial in `nvars` variables: one exponent
/// vector (length `nvars`, entry `k` is the degree in variable `k`) per
/// term, paired with an integer coefficient. No term has a zero
/// coefficient and no two terms share an exponent vector.
#[derive(Clone, Debug, PartialEq)]
pub struct MPoly {
    pub nvars: usize,
    pub terms: Vec<(Vec<u64>, Z)>,
}

impl MPoly {
    pub fn new(nvars: usize, mut terms: Vec<(Vec<u64>, Z)>) -> Self {
        terms.retain(|(_, c)| !c.is_zero());
        MPoly { nvars, terms }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Per-variable `(max exponent) + 1`, the degree bound used to size
    /// the packed array.
    fn degree_bounds(&self) -> Vec<u64> {
        let mut bounds = vec![0u64; self.nvars];
        for (exps, _) in &self.terms {
            for (b, &e) in bounds.iter_mut().zip(exps.iter()) {
                *b = (*b).max(e + 1);
            }
        }
        bounds
    }
}

/// Mixed-radix "stride" for each variable: `radices[k] = prod_{j<k} bounds[j]`.
fn radices(bounds: &[u64]) -> Vec<u64> {
    let mut r = vec![1u64; bounds.len()];
    for k in 1..bounds.len() {
        r[k] = r[k - 1] * bounds[k - 1];
    }
    r
}

fn pack(exps: &[u64], radices: &[u64]) -> usize {
    exps.iter().zip(radices.iter()).map(|(&e, &r)| e as usize * r as usize).sum()
}

/// Coefficient storage sized to the smallest width that can safely hold
/// every intermediate product `coeff(P2) * coeff(P3)` the division's
/// block-subtraction step computes, rather than always paying for
/// arbitrary precision.
#[derive(Clone, Debug)]
pub enum CoeffBuf {
    OneWord(Vec<i64>),
    TwoWord(Vec<i128>),
    ThreeWord(Vec<Z>),
    Big(Vec<Z>),
}

impl CoeffBuf {
    fn zeros(len: usize, kind: BufKind) -> Self {
        match kind {
            BufKind::OneWord => CoeffBuf::OneWord(vec![0i64; len]),
            BufKind::TwoWord => CoeffBuf::TwoWord(vec![0i128; len]),
            BufKind::ThreeWord => CoeffBuf::ThreeWord(vec![Z::from(0); len]),
            BufKind::Big => CoeffBuf::Big(vec![Z::from(0); len]),
        }
    }

    fn get(&self, i: usize) -> Z {
        match self {
            CoeffBuf::OneWord(v) => Z::from(v[i]),
            CoeffBuf::TwoWord(v) => Z::from(v[i]),
            CoeffBuf::ThreeWord(v) | CoeffBuf::Big(v) => v[i].clone(),
        }
    }

    fn is_zero_at(&self, i: usize) -> bool {
        match self {
            CoeffBuf::OneWord(v) => v[i] == 0,
            CoeffBuf::TwoWord(v) => v[i] == 0,
            CoeffBuf::ThreeWord(v) | CoeffBuf::Big(v) => v[i].is_zero(),
        }
    }

    fn set(&mut self, i: usize, value: &Z) {
        match self {
            CoeffBuf::OneWord(v) => v[i] = to_i64(value),
            CoeffBuf::TwoWord(v) => v[i] = to_i128(value),
            CoeffBuf::ThreeWord(v) | CoeffBuf::Big(v) => v[i] = value.clone(),
        }
    }

    /// `self[i] -= coeff * other[j]` for every non-zero entry `other[j]`
    /// at packed offset `base + j`, the tight inner loop every division
    /// step runs once per non-zero dividend cell.
    fn submul_shifted(&mut self, base: usize, coeff: &Z, other: &[(usize, Z)]) {
        for (off, val) in other {
            let idx = base + off;
            let delta = coeff * val;
            let cur = self.get(idx);
            self.set(idx, &(cur - delta));
        }
    }
}

#[derive(Clone, Copy)]
enum BufKind {
    OneWord,
    TwoWord,
    ThreeWord,
    Big,
}

fn to_i64(v: &Z) -> i64 {
    use num_traits::ToPrimitive;
    v.to_i64().expect("value fits the chosen CoeffBuf width")
}

fn to_i128(v: &Z) -> i128 {
    use num_traits::ToPrimitive;
    v.to_i128().expect("value fits the chosen CoeffBuf width")
}

/// Pick the narrowest buffer width that safely bounds `max|P2| * max|P3| *
/// len3` (the largest magnitude a single block-subtract step can add),
/// with generous headroom since repeated subtraction accumulates.
fn choose_kind(p2: &MPoly, p3: &MPoly) -> BufKind {
    let max2 = p2.terms.iter().map(|(_, c)| c.abs().bits()).max().unwrap_or(0);
    let max3 = p3.terms.iter().map(|(_, c)| c.abs().bits()).max().unwrap_or(0);
    let len3_bits = 64 - (p3.terms.len().max(1) as u64).leading_zeros() as u64;
    let bits = max2 + max3 + len3_bits + 8;
    if bits < 63 {
        BufKind::OneWord
    } else if bits < 127 {
        BufKind::TwoWord
    } else if bits < 190 {
        BufKind::ThreeWord
    } else {
        BufKind::Big
    }
}

/// Digit-wise subtract `min3` from the packed index `i`'s exponent
/// vector, returning `None` if any per-variable digit of `i` is smaller
/// than the corresponding digit of `min3` (the borrow-across-variables
/// case that plain integer subtraction on packed indices would miss).
fn monomial_divide(i: usize, min3: &[u64], bounds: &[u64]) -> Option<usize> {
    let mut rem = i;
    let mut digits = vec![0u64; bounds.len()];
    for k in 0..bounds.len() {
        let b = bounds[k] as usize;
        digits[k] = (rem % b) as u64;
        rem /= b;
    }
    for (d, &m) in digits.iter_mut().zip(min3.iter()) {
        if *d < m {
            return None;
        }
        *d -= m;
    }
    let r = radices(bounds);
    Some(pack(&digits, &r))
}

/// Divide `p2` by `p3` exactly, returning `Err(LinalgError::Inexact)` if
/// the division is not exact or the array would exceed
/// [`MAX_ARRAY_SIZE`].
pub fn divexact_array(p2: &MPoly, p3: &MPoly) -> Result<MPoly> {
    let (q, r) = divrem_array(p2, p3)?;
    if r.is_zero() {
        Ok(q)
    } else {
        Err(LinalgError::Inexact("multivariate division left a non-zero remainder".into()))
    }
}

/// `true` iff `p3` divides `p2` exactly.
pub fn divides_array(p2: &MPoly, p3: &MPoly) -> Result<bool> {
    Ok(divrem_array(p2, p3)?.1.is_zero())
}

/// Divide `p2` by `p3`, returning `(quotient, remainder)` with `quotient
/// * p3 + remainder == p2`. Built from the same forward sweep as exact
/// division: every cell that divides evenly and passes the monomial
/// check is folded into the quotient and subtracted out; everything
/// else — cells past the point where a multiple of `p3`'s trailing term
/// could still land, or a cell that fails either check along the way —
/// is left untouched and reported back as remainder. `remainder.is_zero()`
/// is exactly the exact-division case.
pub fn divrem_array(p2: &MPoly, p3: &MPoly) -> Result<(MPoly, MPoly)> {
    if p3.is_zero() {
        return Err(LinalgError::DivisionByZero("multivariate division by the zero polynomial".into()));
    }
    let nvars = p2.nvars;
    let mut bounds = p2.degree_bounds();
    let p3_bounds = p3.degree_bounds();
    for (b, &pb) in bounds.iter_mut().zip(p3_bounds.iter()) {
        *b = (*b).max(pb);
    }
    let prod: usize = bounds.iter().map(|&b| b as usize).product();
    if prod > MAX_ARRAY_SIZE {
        return Err(LinalgError::Inexact(format!(
            "packed array size {} exceeds the {} cell limit",
            prod, MAX_ARRAY_SIZE
        )));
    }
    let rad = radices(&bounds);

    let kind = match choose_kind(p2, p3) {
        BufKind::OneWord => BufKind::OneWord,
        other => other,
    };
    let mut array = CoeffBuf::zeros(prod, kind);
    for (exps, c) in &p2.terms {
        array.set(pack(exps, &rad), c);
    }

    // p3 sorted ascending by packed exponent: index 0 is the divisor's
    // trailing term, and its own exponent vector is `min3`, the baseline
    // every cell index is measured against. A cell at index `i` divides
    // iff `i`'s exponent dominates `min3` digit-wise; the quotient
    // exponent is then `i - min3`, and the divisor's whole contribution
    // (each term's raw packed exponent added to that quotient position)
    // is what gets subtracted back into the array.
    let mut p3_sorted: Vec<(Vec<u64>, Z)> = p3.terms.clone();
    p3_sorted.sort_by(|a, b| pack(&a.0, &rad).cmp(&pack(&b.0, &rad)));
    let lead_coeff = p3_sorted[0].1.clone();
    let min3 = p3_sorted[0].0.clone();
    let offsets: Vec<(usize, Z)> = p3_sorted.iter().map(|(e, c)| (pack(e, &rad), c.clone())).collect();
    let max3_packed = offsets.iter().map(|(off, _)| *off).max().unwrap_or(0);

    // Cells at index >= limit can never carry a multiple of the divisor's
    // trailing term (there isn't room for `max3` more), so only the
    // range below is worth attempting; anything left non-zero anywhere
    // in the array — including a cell in this range that fails to
    // divide evenly or fails the monomial check — becomes remainder.
    let mut quotient_terms = Vec::new();
    let limit = prod.saturating_sub(max3_packed);
    for i in 0..limit {
        if array.is_zero_at(i) {
            continue;
        }
        let cell = array.get(i);
        let (q, r) = div_rem_floor_toward_zero(&cell, &lead_coeff);
        if !r.is_zero() {
            continue;
        }
        let shifted = match monomial_divide(i, &min3, &bounds) {
            Some(idx) => idx,
            None => continue,
        };
        array.submul_shifted(shifted, &q, &offsets);
        array.set(i, &Z::from(0));

        let mut exps = vec![0u64; nvars];
        let mut rem = shifted;
        for k in 0..nvars {
            let b = bounds[k] as usize;
            exps[k] = (rem % b) as u64;
            rem /= b;
        }
        quotient_terms.push((exps, q));
    }

    let mut remainder_terms = Vec::new();
    for i in 0..prod {
        if array.is_zero_at(i) {
            continue;
        }
        let mut exps = vec![0u64; nvars];
        let mut rem = i;
        for k in 0..nvars {
            let b = bounds[k] as usize;
            exps[k] = (rem % b) as u64;
            rem /= b;
        }
        remainder_terms.push((exps, array.get(i)));
    }

    Ok((MPoly::new(nvars, quotient_terms), MPoly::new(nvars, remainder_terms)))
}

/// Exact-division-style quotient/remainder: truncates toward zero, the
/// convention that makes "remainder zero" mean genuinely exact division
/// regardless of sign.
fn div_rem_floor_toward_zero(a: &Z, b: &Z) -> (Z, Z) {
    let q = a / b;
    let r = a - &q * b;
    (q, r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(exps: &[u64], c: i64) -> (Vec<u64>, Z) {
        (exps.to_vec(), Z::from(c))
    }

    #[test]
    fn divides_exactly_when_divisor_is_a_factor() {
        // (x^2 - y^2) / (x - y) = x + y, two variables x, y
        let p2 = MPoly::new(2, vec![term(&[2, 0], 1), term(&[0, 2], -1)]);
        let p3 = MPoly::new(2, vec![term(&[1, 0], 1), term(&[0, 1], -1)]);
        let q = divexact_array(&p2, &p3).unwrap();
        let mut got = q.terms.clone();
        got.sort();
        let mut want = vec![term(&[1, 0], 1), term(&[0, 1], 1)];
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn detects_inexact_division() {
        // x^2 + 1 is not divisible by x - 1 (remainder 2)
        let p2 = MPoly::new(1, vec![term(&[2], 1), term(&[0], 1)]);
        let p3 = MPoly::new(1, vec![term(&[1], 1), term(&[0], -1)]);
        assert!(divexact_array(&p2, &p3).is_err());
        assert!(!divides_array(&p2, &p3).unwrap());
    }

    #[test]
    fn divrem_recombines_to_dividend() {
        let p2 = MPoly::new(1, vec![term(&[3], 1), term(&[0], 5)]);
        let p3 = MPoly::new(1, vec![term(&[1], 1), term(&[0], -2)]);
        let (q, r) = divrem_array(&p2, &p3).unwrap();
        // reconstruct q*p3 + r and compare against p2 by evaluating at a point
        let eval = |p: &MPoly, x: i64| -> Z {
            p.terms.iter().fold(Z::from(0), |acc, (e, c)| {
                let mut power = Z::from(1);
                for _ in 0..e[0] {
                    power = &power * Z::from(x);
                }
                acc + c * power
            })
        };
        let x = 7i64;
        let lhs = &eval(&q, x) * &eval(&p3, x) + eval(&r, x);
        assert_eq!(lhs, eval(&p2, x));
    }
}
