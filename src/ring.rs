//! The big-integer façade: a narrow ring layer built on
//! `num-bigint`/`num-integer` that the rest of the crate treats as its
//! big-integer collaborator.
//!
//! `Modulus` is the ambient ring context shared by matrices and vectors.
//! `Zr` is a normalized element of `Z/nZ`; `Z` is a plain integer used by
//! the integer-sparse engines (HNF, FFLU, Dixon).

use crate::error::{LinalgError, Result};
use num_bigint::{BigInt, BigUint, ToBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::fmt;
use std::sync::Arc;

/// A positive modulus `n >= 1`, shared cheaply between matrices/vectors
/// that all operate in the same ring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modulus(Arc<BigUint>);

impl Modulus {
    /// Construct a modulus from a `BigUint`. Fails if `n == 0`.
    pub fn new(n: BigUint) -> Result<Self> {
        if n.is_zero() {
            return Err(LinalgError::InvalidModulus("modulus must be >= 1".into()));
        }
        Ok(Modulus(Arc::new(n)))
    }

    /// Construct a modulus from a small integer, for tests and examples.
    pub fn from_u64(n: u64) -> Result<Self> {
        Self::new(BigUint::from(n))
    }

    /// The underlying value.
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Number of bits in the modulus, used by the dense-reduction worker
    /// count heuristic.
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// `true` when the modulus is known not to be prime; this is a cheap
    /// Fermat-style probabilistic check, used only to choose a code path
    /// (sparse LU vs Howell), never to certify primality.
    pub fn probably_prime(&self) -> bool {
        if *self.0 == BigUint::from(2u32) || *self.0 == BigUint::from(3u32) {
            return true;
        }
        if self.0.is_even() {
            return false;
        }
        let base = BigUint::from(2u32);
        let exp = &*self.0 - BigUint::one();
        base.modpow(&exp, &self.0) == BigUint::one()
    }

    fn reduce_bigint(&self, v: BigInt) -> BigUint {
        let n = self.0.to_bigint().unwrap();
        let r = ((v % &n) + &n) % &n;
        r.to_biguint().unwrap()
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An element of `Z/nZ`, always kept normalized to `[0, n)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zr {
    val: BigUint,
    modulus: Modulus,
}

impl Zr {
    /// Build an element from a raw integer, reducing it modulo `n`.
    pub fn new(v: impl Into<BigInt>, modulus: Modulus) -> Self {
        let val = modulus.reduce_bigint(v.into());
        Zr { val, modulus }
    }

    /// Build the zero element of the given ring.
    pub fn zero_in(modulus: Modulus) -> Self {
        Zr {
            val: BigUint::zero(),
            modulus,
        }
    }

    /// Build the one element of the given ring.
    pub fn one_in(modulus: Modulus) -> Self {
        Zr {
            val: BigUint::one() % modulus.value(),
            modulus,
        }
    }

    /// The normalized representative in `[0, n)`.
    pub fn value(&self) -> &BigUint {
        &self.val
    }

    /// The ring this element belongs to.
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// `true` iff this is the additive identity.
    pub fn is_zero(&self) -> bool {
        self.val.is_zero()
    }

    fn check_same_ring(&self, other: &Zr) -> Result<()> {
        if self.modulus != other.modulus {
            return Err(LinalgError::ModulusMismatch(format!(
                "{} vs {}",
                self.modulus, other.modulus
            )));
        }
        Ok(())
    }

    /// `self + other`.
    pub fn add(&self, other: &Zr) -> Result<Zr> {
        self.check_same_ring(other)?;
        let mut s = &self.val + &other.val;
        if s >= *self.modulus.value() {
            s -= self.modulus.value();
        }
        Ok(Zr {
            val: s,
            modulus: self.modulus.clone(),
        })
    }

    /// `self - other`.
    pub fn sub(&self, other: &Zr) -> Result<Zr> {
        self.check_same_ring(other)?;
        let n = self.modulus.value();
        let s = if self.val >= other.val {
            &self.val - &other.val
        } else {
            n - (&other.val - &self.val)
        };
        Ok(Zr {
            val: s,
            modulus: self.modulus.clone(),
        })
    }

    /// `-self`.
    pub fn neg(&self) -> Zr {
        if self.val.is_zero() {
            self.clone()
        } else {
            Zr {
                val: self.modulus.value() - &self.val,
                modulus: self.modulus.clone(),
            }
        }
    }

    /// `self * other`.
    pub fn mul(&self, other: &Zr) -> Result<Zr> {
        self.check_same_ring(other)?;
        let p = (&self.val * &other.val) % self.modulus.value();
        Ok(Zr {
            val: p,
            modulus: self.modulus.clone(),
        })
    }

    /// Multiplicative inverse. Fails with `NonInvertible` if
    /// `gcd(self, n) != 1`, which can only happen over a composite modulus.
    pub fn try_inv(&self) -> Result<Zr> {
        let n_signed = self.modulus.value().to_bigint().unwrap();
        let a_signed = self.val.to_bigint().unwrap();
        let (g, a, _b) = xgcd(&a_signed, &n_signed);
        if g != BigInt::one() && g != -BigInt::one() {
            return Err(LinalgError::NonInvertible(format!(
                "gcd({}, {}) = {}",
                self.val, self.modulus, g
            )));
        }
        let inv = self.modulus.reduce_bigint(a);
        Ok(Zr {
            val: inv,
            modulus: self.modulus.clone(),
        })
    }

    /// `gcd(self, n)`, used by Howell-form pivot scaling.
    pub fn gcd_with_modulus(&self) -> BigUint {
        self.val.gcd(self.modulus.value())
    }

    /// Signed representative in `(-n/2, n/2]`, used when comparing "leading
    /// term magnitude" the way the integer engines do.
    pub fn signed_value(&self) -> BigInt {
        let n = self.modulus.value();
        let half = n >> 1u32;
        if self.val > half {
            self.val.to_bigint().unwrap() - n.to_bigint().unwrap()
        } else {
            self.val.to_bigint().unwrap()
        }
    }
}

impl fmt::Display for Zr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.val)
    }
}

/// An arbitrary-precision integer, used by the integer-sparse engines
/// (HNF, FFLU, Dixon, the multivariate polynomial array engine).
pub type Z = BigInt;

/// Extended Euclidean algorithm: returns `(g, a, b)` with
/// `a*x + b*y = g = gcd(x, y)`, normalized so `g >= 0`.
pub fn xgcd(x: &BigInt, y: &BigInt) -> (BigInt, BigInt, BigInt) {
    let ext = x.extended_gcd(y);
    if ext.gcd.is_negative() {
        (-ext.gcd, -ext.x, -ext.y)
    } else {
        (ext.gcd, ext.x, ext.y)
    }
}

/// Plain `gcd`.
pub fn gcd(x: &BigInt, y: &BigInt) -> BigInt {
    x.gcd(y)
}

/// Floor division, used by the integer sparse-vector elimination step.
pub fn floor_div(a: &BigInt, b: &BigInt) -> BigInt {
    a.div_floor(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(n: u64) -> Modulus {
        Modulus::from_u64(n).unwrap()
    }

    #[test]
    fn add_sub_roundtrip() {
        let n = m(7);
        let a = Zr::new(5, n.clone());
        let b = Zr::new(4, n.clone());
        let s = a.add(&b).unwrap();
        assert_eq!(*s.value(), BigUint::from(2u32));
        let back = s.sub(&b).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn inverse_mod_prime() {
        let n = m(7);
        let a = Zr::new(3, n);
        let inv = a.try_inv().unwrap();
        let prod = a.mul(&inv).unwrap();
        assert_eq!(*prod.value(), BigUint::one());
    }

    #[test]
    fn inverse_noninvertible_on_composite() {
        let n = m(6);
        let a = Zr::new(2, n);
        assert!(a.try_inv().is_err());
    }

    #[test]
    fn xgcd_matches_bezout() {
        let (g, a, b) = xgcd(&BigInt::from(240), &BigInt::from(46));
        assert_eq!(g, BigInt::from(2));
        assert_eq!(
            a * BigInt::from(240) + b * BigInt::from(46),
            BigInt::from(2)
        );
    }
}
