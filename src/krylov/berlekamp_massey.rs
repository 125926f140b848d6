//! Berlekamp–Massey: the minimal linear recurrence satisfied by a
//! sequence over `Z/pZ`, the core subroutine scalar Wiedemann runs on
//! each probe sequence `s_i = (M^j b)_i`.

use crate::ring::{Modulus, Zr};

/// Find the minimal polynomial `C(x) = 1 + C_1 x + ... + C_L x^L` such
/// that `sum_{i=0}^{L} C_i s[n-i] = 0` for every `n >= L`, given the first
/// `s.len()` terms of the sequence. Returns the coefficients `C_0..C_L`
/// (so `result[0] == 1`), the textbook two-sequence recurrence with
/// degree tracking and discrepancy updates.
pub fn minimal_poly(s: &[Zr], modulus: &Modulus) -> Vec<Zr> {
    let n_terms = s.len();
    let mut l: usize = 0;
    let mut deg_c: usize = 0;
    let mut deg_b: usize = 0;
    let mut c = vec![Zr::zero_in(modulus.clone()); n_terms + 1];
    let mut b = vec![Zr::zero_in(modulus.clone()); n_terms + 1];
    let mut t = vec![Zr::zero_in(modulus.clone()); n_terms + 1];
    let mut deg_t: usize = 0;
    c[0] = Zr::one_in(modulus.clone());
    b[0] = Zr::one_in(modulus.clone());
    let mut d_b = Zr::one_in(modulus.clone());

    for n in 0..n_terms {
        let m = n + 1;
        let mut d_c = s[n].clone();
        for i in 1..=l {
            d_c = d_c.add(&c[i].mul(&s[n - i]).unwrap()).unwrap();
        }
        if d_c.is_zero() {
            continue;
        }

        if l <= 2 * n {
            deg_t = deg_c;
            t[..=deg_c].clone_from_slice(&c[..=deg_c]);
        }

        let coeff = d_c.mul(&d_b.try_inv().unwrap()).unwrap().neg();
        for i in 0..=deg_b {
            c[m + i] = c[m + i].add(&b[i].mul(&coeff).unwrap()).unwrap();
        }
        deg_c = deg_c.max(deg_b + m);
        while deg_c > 0 && c[deg_c].is_zero() {
            deg_c -= 1;
        }

        if 2 * l <= n {
            l = n + 1 - l;
            d_b = d_c;
            deg_b = deg_t;
            b[..=deg_t].clone_from_slice(&t[..=deg_t]);
        }
    }

    c.truncate(l + 1);
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_linear_recurrence_of_known_order() {
        let m = Modulus::from_u64(101).unwrap();
        // s_n = 2*s_{n-1} - s_{n-2} (arithmetic progression), minimal poly 1 - 2x + x^2
        let mut s = vec![Zr::new(1, m.clone()), Zr::new(2, m.clone())];
        for n in 2..10 {
            let next = s[n - 1].mul(&Zr::new(2, m.clone())).unwrap().sub(&s[n - 2]).unwrap();
            s.push(next);
        }
        let poly = minimal_poly(&s, &m);
        assert_eq!(poly.len(), 3);
        assert_eq!(poly[0], Zr::one_in(m.clone()));
        assert_eq!(poly[1], Zr::new(-2, m.clone()));
        assert_eq!(poly[2], Zr::one_in(m));
    }

    #[test]
    fn constant_sequence_has_degree_one_poly() {
        let m = Modulus::from_u64(13).unwrap();
        let s = vec![Zr::new(5, m.clone()); 6];
        let poly = minimal_poly(&s, &m);
        assert_eq!(poly.len(), 2);
        assert_eq!(poly[0], Zr::one_in(m.clone()));
        assert_eq!(poly[1], Zr::new(-1, m));
    }
}
