//! Sparse vector algebra: an ordered list of `(index, value)`
//! entries with strictly increasing indices and non-zero values, plus the
//! merge-based binary ops and Gaussian-elimination steps every sparse
//! engine in this crate is built from.

use crate::ring::{floor_div, xgcd, Modulus, Z, Zr};

/// A single non-zero entry of a sparse vector.
pub type Entry<T> = (i64, T);

/// A finite ordered sequence of `(index, value)` pairs with strictly
/// increasing indices and non-zero values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseVector<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for SparseVector<T> {
    fn default() -> Self {
        SparseVector { entries: Vec::new() }
    }
}

impl<T> SparseVector<T> {
    /// The empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// `true` iff there are no non-zero entries.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only access to the entry list.
    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    /// The leading (smallest-index) entry, if any.
    pub fn leading(&self) -> Option<&Entry<T>> {
        self.entries.first()
    }

    /// Build directly from a caller-sorted, non-zero-filtered entry list.
    /// Callers must uphold the sorted/non-zero invariant; used by
    /// constructors that already know it holds (`from_entries`,
    /// deserialization-free construction).
    pub fn from_sorted_entries(entries: Vec<Entry<T>>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        SparseVector { entries }
    }

    /// Iterate the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.entries.iter()
    }
}

impl<T: Clone> SparseVector<T> {
    /// A window into a contiguous index range `[lo, hi)`, reusing the
    /// parent's entries (no copy); indices are re-based to be relative to
    /// `lo` is *not* performed here — callers that need column-offset
    /// semantics track that separately (see `SparseMatrix::c_off`).
    pub fn window(&self, lo: i64, hi: i64) -> SparseVector<T> {
        let entries: Vec<_> = self
            .entries
            .iter()
            .filter(|(i, _)| *i >= lo && *i < hi)
            .cloned()
            .collect();
        SparseVector { entries }
    }
}

/// Entrywise ring ops needed by the generic merge-based algebra below.
/// Implemented for [`Zr`] (assuming two operands always share a modulus,
/// an invariant enforced by every public matrix/vector constructor) and
/// for [`Z`] (plain integer arithmetic).
pub trait RingElement: Clone + PartialEq {
    /// `true` iff this is the additive identity.
    fn is_zero_elem(&self) -> bool;
    fn add_elem(&self, other: &Self) -> Self;
    fn sub_elem(&self, other: &Self) -> Self;
    fn neg_elem(&self) -> Self;
    fn mul_elem(&self, other: &Self) -> Self;
}

impl RingElement for Zr {
    fn is_zero_elem(&self) -> bool {
        Zr::is_zero(self)
    }
    fn add_elem(&self, other: &Self) -> Self {
        self.add(other)
            .expect("sparse vector entries always share a modulus")
    }
    fn sub_elem(&self, other: &Self) -> Self {
        self.sub(other)
            .expect("sparse vector entries always share a modulus")
    }
    fn neg_elem(&self) -> Self {
        Zr::neg(self)
    }
    fn mul_elem(&self, other: &Self) -> Self {
        self.mul(other)
            .expect("sparse vector entries always share a modulus")
    }
}

impl RingElement for Z {
    fn is_zero_elem(&self) -> bool {
        use num_traits::Zero;
        self.is_zero()
    }
    fn add_elem(&self, other: &Self) -> Self {
        self + other
    }
    fn sub_elem(&self, other: &Self) -> Self {
        self - other
    }
    fn neg_elem(&self) -> Self {
        -self.clone()
    }
    fn mul_elem(&self, other: &Self) -> Self {
        self * other
    }
}

/// Descending merge of two operand entry slices, calling `combine(a, b)`
/// for every merge step (one or both operands may be `None` at the
/// boundary) and keeping only non-zero results. This is the single
/// primitive every binary op in this module is built from.
fn merge_combine<T: RingElement>(
    u: &[Entry<T>],
    v: &[Entry<T>],
    mut combine: impl FnMut(Option<&T>, Option<&T>) -> T,
) -> Vec<Entry<T>> {
    let mut out = Vec::with_capacity(u.len() + v.len());
    let (mut i, mut j) = (0usize, 0usize);
    while i < u.len() || j < v.len() {
        let (ui, vi) = (u.get(i), v.get(j));
        let idx = match (ui, vi) {
            (Some((a, _)), Some((b, _))) => (*a).min(*b),
            (Some((a, _)), None) => *a,
            (None, Some((b, _))) => *b,
            (None, None) => unreachable!(),
        };
        let a_val = ui.filter(|(a, _)| *a == idx).map(|(_, v)| v);
        let b_val = vi.filter(|(b, _)| *b == idx).map(|(_, v)| v);
        let val = combine(a_val, b_val);
        if a_val.is_some() {
            i += 1;
        }
        if b_val.is_some() {
            j += 1;
        }
        if !val.is_zero_elem() {
            out.push((idx, val));
        }
    }
    out
}

impl<T: RingElement> SparseVector<T> {
    /// `w = u + v`.
    pub fn add(u: &SparseVector<T>, v: &SparseVector<T>) -> SparseVector<T> {
        let entries = merge_combine(&u.entries, &v.entries, |a, b| match (a, b) {
            (Some(a), Some(b)) => a.add_elem(b),
            (Some(a), None) => a.clone(),
            (None, Some(b)) => b.clone(),
            (None, None) => unreachable!(),
        });
        SparseVector { entries }
    }

    /// `w = u - v`.
    pub fn sub(u: &SparseVector<T>, v: &SparseVector<T>) -> SparseVector<T> {
        let entries = merge_combine(&u.entries, &v.entries, |a, b| match (a, b) {
            (Some(a), Some(b)) => a.sub_elem(b),
            (Some(a), None) => a.clone(),
            (None, Some(b)) => b.neg_elem(),
            (None, None) => unreachable!(),
        });
        SparseVector { entries }
    }

    /// `-u`.
    pub fn neg(u: &SparseVector<T>) -> SparseVector<T> {
        SparseVector {
            entries: u.entries.iter().map(|(i, v)| (*i, v.neg_elem())).collect(),
        }
    }

    /// `w = u + c*v`, specialised for the common `c` in `{0, 1, -1}` cases.
    pub fn scalar_addmul(u: &SparseVector<T>, v: &SparseVector<T>, c: &T) -> SparseVector<T> {
        if c.is_zero_elem() {
            return u.clone();
        }
        let entries = merge_combine(&u.entries, &v.entries, |a, b| match (a, b) {
            (Some(a), Some(b)) => a.add_elem(&b.mul_elem(c)),
            (Some(a), None) => a.clone(),
            (None, Some(b)) => b.mul_elem(c),
            (None, None) => unreachable!(),
        });
        SparseVector { entries }
    }

    /// `w = u - c*v`.
    pub fn scalar_submul(u: &SparseVector<T>, v: &SparseVector<T>, c: &T) -> SparseVector<T> {
        if c.is_zero_elem() {
            return u.clone();
        }
        let entries = merge_combine(&u.entries, &v.entries, |a, b| match (a, b) {
            (Some(a), Some(b)) => a.sub_elem(&b.mul_elem(c)),
            (Some(a), None) => a.clone(),
            (None, Some(b)) => b.mul_elem(c).neg_elem(),
            (None, None) => unreachable!(),
        });
        SparseVector { entries }
    }

    /// `u . v`, the standard index-matching scan. `zero` supplies the
    /// ring's additive identity for the case where `u` and `v` share no
    /// index (callers always have one on hand: the matrix/vector's own
    /// ambient ring).
    pub fn dot(u: &SparseVector<T>, v: &SparseVector<T>, zero: &T) -> T {
        let (mut i, mut j) = (0usize, 0usize);
        let mut acc: Option<T> = None;
        while i < u.entries.len() && j < v.entries.len() {
            let (ia, va) = &u.entries[i];
            let (ib, vb) = &v.entries[j];
            match ia.cmp(ib) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    let term = va.mul_elem(vb);
                    acc = Some(match acc {
                        Some(a) => a.add_elem(&term),
                        None => term,
                    });
                    i += 1;
                    j += 1;
                }
            }
        }
        acc.unwrap_or_else(|| zero.clone())
    }

    /// `u . vdense`, indexed accumulation against a dense slice.
    pub fn dot_dense(u: &SparseVector<T>, vdense: &[T], zero: &T) -> T {
        let mut acc: Option<T> = None;
        for (idx, val) in &u.entries {
            let term = val.mul_elem(&vdense[*idx as usize]);
            acc = Some(match acc {
                Some(a) => a.add_elem(&term),
                None => term,
            });
        }
        acc.unwrap_or_else(|| zero.clone())
    }

    /// Scale every entry of `u` by `c`, dropping the result entirely if
    /// `c` is zero.
    pub fn scalar_mul(u: &SparseVector<T>, c: &T) -> SparseVector<T> {
        if c.is_zero_elem() {
            return SparseVector::new();
        }
        SparseVector {
            entries: u.entries.iter().map(|(i, v)| (*i, v.mul_elem(c))).collect(),
        }
    }
}

impl SparseVector<Zr> {
    /// `⌊u[col]/v[col]⌋`-style quotient over a field: `u[col] * v[col]^-1`.
    /// Used by [`Self::gauss_elim`] when the ambient modulus is prime.
    pub fn field_quotient_at(u: &SparseVector<Zr>, v: &SparseVector<Zr>, col: i64) -> crate::error::Result<Zr> {
        let uc = at(u, col);
        let vc = at(v, col).try_inv()?;
        Ok(uc.mul_elem(&vc))
    }

    /// When `v`'s leading column is `<=` the column of `u`'s first
    /// non-zero at or after that column, reduce `u` by `v` using the
    /// field quotient at `v`'s leading column.
    pub fn gauss_elim(u: &SparseVector<Zr>, v: &SparseVector<Zr>) -> crate::error::Result<SparseVector<Zr>> {
        let (vcol, _) = match v.leading() {
            Some(e) => *e,
            None => return Ok(u.clone()),
        };
        let q = Self::field_quotient_at(u, v, vcol)?;
        if q.is_zero() {
            return Ok(u.clone());
        }
        Ok(SparseVector::scalar_submul(u, v, &q))
    }

    /// Extended elimination step used by the Howell-form algorithm
    /// when the modulus may be composite: compute
    /// `(g, a, b) = xgcd(v[lead], u[lead])` lifted to `Z`, then apply the
    /// unimodular transform `gauss_elim_ext` describes over `Z`,
    /// reducing everything modulo `n` on the way back in.
    pub fn gauss_elim_ext_mod(
        v: &SparseVector<Zr>,
        u: &SparseVector<Zr>,
        col: i64,
        modulus: &Modulus,
    ) -> (SparseVector<Zr>, SparseVector<Zr>) {
        let vc = at(v, col).signed_value();
        let uc = at(u, col).signed_value();
        let (g, a, b) = xgcd(&vc, &uc);
        // unimodular transform: [[vc/g, -uc/g], [a, b]] applied to (v, u)
        let vc_g = if g.sign() == num_bigint::Sign::NoSign {
            num_bigint::BigInt::from(0)
        } else {
            &vc / &g
        };
        let uc_g = if g.sign() == num_bigint::Sign::NoSign {
            num_bigint::BigInt::from(0)
        } else {
            &uc / &g
        };
        let to_zr = |x: &num_bigint::BigInt| Zr::new(x.clone(), modulus.clone());
        let (c11, c12, c21, c22) = (to_zr(&vc_g), to_zr(&(-uc_g)), to_zr(&a), to_zr(&b));
        let new_v = SparseVector::add(
            &SparseVector::scalar_mul(v, &c11),
            &SparseVector::scalar_mul(u, &c12),
        );
        let new_u = SparseVector::add(
            &SparseVector::scalar_mul(v, &c21),
            &SparseVector::scalar_mul(u, &c22),
        );
        (new_v, new_u)
    }
}

/// Value at `col` in a sorted sparse vector, or the ring's zero if absent.
/// `Zr`-only helper (the other elimination routines for `Z` build their own
/// floor-division quotient instead).
pub fn at(v: &SparseVector<Zr>, col: i64) -> Zr {
    for (i, val) in v.entries() {
        if *i == col {
            return val.clone();
        }
    }
    // Absent entries are zero in the ring of the vector's own values; we
    // need one concrete element to build a zero from.
    let modulus = v
        .entries()
        .first()
        .map(|(_, v)| v.modulus().clone())
        .unwrap_or_else(|| Modulus::from_u64(1).unwrap());
    Zr::zero_in(modulus)
}

impl SparseVector<Z> {
    /// `⌊u[col]/v[col]⌋`, the integer floor-division quotient elimination
    /// reduces by.
    pub fn gauss_elim_col(u: &SparseVector<Z>, v: &SparseVector<Z>, col: i64) -> SparseVector<Z> {
        let uc = at_z(u, col);
        let vc = at_z(v, col);
        if vc == Z::from(0) {
            return u.clone();
        }
        let q = floor_div(&uc, &vc);
        if q == Z::from(0) {
            return u.clone();
        }
        SparseVector::scalar_submul(u, v, &q)
    }

    /// Reduce `u` by `v` at `v`'s leading column, as in [`Self::gauss_elim_col`],
    /// but driven by `v`'s own leading entry.
    pub fn gauss_elim(u: &SparseVector<Z>, v: &SparseVector<Z>) -> SparseVector<Z> {
        match v.leading() {
            Some((col, _)) => Self::gauss_elim_col(u, v, *col),
            None => u.clone(),
        }
    }

    /// Extended elimination: unimodular combination of `v` and `u` so that
    /// the new `v`'s leading entry becomes `gcd(v[lead], u[lead])` and the
    /// new `u`'s leading entry becomes zero.
    /// Pre-normalises so `|v[lead]| >= |u[lead]|` and `sign(v[lead]) >= 0`,
    /// falling back to plain `gauss_elim` when divisibility already holds.
    pub fn gauss_elim_ext(v: &SparseVector<Z>, u: &SparseVector<Z>, col: i64) -> (SparseVector<Z>, SparseVector<Z>) {
        use num_traits::Zero;
        let mut vc = at_z(v, col);
        let mut uc = at_z(u, col);
        let (mut vv, mut uu) = (v.clone(), u.clone());
        if num_traits::Signed::abs(&vc) < num_traits::Signed::abs(&uc) {
            std::mem::swap(&mut vv, &mut uu);
            std::mem::swap(&mut vc, &mut uc);
        }
        if num_traits::Signed::is_negative(&vc) {
            vv = SparseVector::neg(&vv);
            vc = -vc;
        }
        if uc.clone() % vc.clone() == Z::zero() {
            let reduced = Self::gauss_elim_col(&uu, &vv, col);
            return (vv, reduced);
        }
        let (g, a, b) = xgcd(&vc, &uc);
        let vc_g = if g.is_zero() { Z::from(0) } else { &vc / &g };
        let uc_g = if g.is_zero() { Z::from(0) } else { &uc / &g };
        let new_v = SparseVector::add(&SparseVector::scalar_mul(&vv, &vc_g), &SparseVector::scalar_mul(&uu, &(-uc_g)));
        let new_u = SparseVector::add(&SparseVector::scalar_mul(&vv, &a), &SparseVector::scalar_mul(&uu, &b));
        (new_v, new_u)
    }

    /// Reduce every entry modulo `n` (used by the HNF-modular / Howell
    /// pipelines, which track integer rows mod a running divisor).
    pub fn scalar_mod(u: &SparseVector<Z>, n: &Z) -> SparseVector<Z> {
        let entries = u
            .entries
            .iter()
            .map(|(i, v)| {
                let r = ((v % n) + n) % n;
                (*i, r)
            })
            .filter(|(_, v)| !num_traits::Zero::is_zero(v))
            .collect();
        SparseVector { entries }
    }
}

/// Value at `col` in a sorted `Z`-valued sparse vector, or zero if absent.
pub fn at_z(v: &SparseVector<Z>, col: i64) -> Z {
    for (i, val) in v.entries() {
        if *i == col {
            return val.clone();
        }
    }
    Z::from(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zr(n: u64, v: i64) -> Zr {
        Zr::new(v, Modulus::from_u64(n).unwrap())
    }

    #[test]
    fn add_merges_and_drops_zeros() {
        let u = SparseVector::from_sorted_entries(vec![(0, zr(7, 3)), (2, zr(7, 5))]);
        let v = SparseVector::from_sorted_entries(vec![(0, zr(7, 4)), (1, zr(7, 1))]);
        let w = SparseVector::add(&u, &v);
        // index 0: 3+4=7=0 mod 7 -> dropped
        assert_eq!(w.entries(), &[(1, zr(7, 1)), (2, zr(7, 5))]);
    }

    #[test]
    fn dot_matches_dense_computation() {
        let u = SparseVector::from_sorted_entries(vec![(0, zr(11, 2)), (3, zr(11, 5))]);
        let v = SparseVector::from_sorted_entries(vec![(0, zr(11, 3)), (3, zr(11, 4))]);
        let d = SparseVector::dot(&u, &v, &Zr::zero_in(Modulus::from_u64(11).unwrap()));
        assert_eq!(*d.value(), num_bigint::BigUint::from((2 * 3 + 5 * 4) % 11));
    }

    #[test]
    fn integer_gauss_elim_col_floor_divides() {
        let u = SparseVector::from_sorted_entries(vec![(0, Z::from(7))]);
        let v = SparseVector::from_sorted_entries(vec![(0, Z::from(3))]);
        let r = SparseVector::gauss_elim_col(&u, &v, 0);
        // 7 - floor(7/3)*3 = 7 - 2*3 = 1
        assert_eq!(at_z(&r, 0), Z::from(1));
    }

    #[test]
    fn gauss_elim_ext_zeroes_u_leading() {
        let v = SparseVector::from_sorted_entries(vec![(0, Z::from(6)), (1, Z::from(2))]);
        let u = SparseVector::from_sorted_entries(vec![(0, Z::from(4)), (1, Z::from(1))]);
        let (nv, nu) = SparseVector::gauss_elim_ext(&v, &u, 0);
        assert_eq!(at_z(&nu, 0), Z::from(0));
        assert_eq!(at_z(&nv, 0), Z::from(2)); // gcd(6,4) = 2
    }
}
