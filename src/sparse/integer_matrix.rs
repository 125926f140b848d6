//! Matrix-level CRT/multi-modulus helpers and a random test-matrix
//! generator, the integer-matrix counterparts of the vector-level
//! helpers in [`crate::sparse::dixon`].

use crate::ring::{Modulus, Z, Zr};
use crate::sparse::dixon::crt_ui;
use crate::sparse::matrix::SparseMatrix;
use rand::Rng;

/// Reduce every row of `a` modulo each of `moduli`.
pub fn multi_mod_ui(a: &SparseMatrix<Z>, moduli: &[Modulus]) -> Vec<SparseMatrix<Zr>> {
    moduli.iter().map(|m| a.mod_reduce(m.clone())).collect()
}

/// Reconstruct an integer matrix from per-modulus residue matrices via
/// CRT. All residue matrices must share the same shape.
pub fn multi_crt_ui(residues: &[SparseMatrix<Zr>], moduli: &[Modulus]) -> SparseMatrix<Z> {
    let r = residues[0].nrows();
    let c = residues[0].ncols();
    let mut entries = Vec::new();
    for i in 0..r {
        for j in 0..c as i64 {
            let vals: Vec<Z> = residues
                .iter()
                .map(|mat| {
                    mat.row(i)
                        .entries()
                        .iter()
                        .find(|(col, _)| *col == j)
                        .map(|(_, v)| v.signed_value())
                        .unwrap_or_else(|| Z::from(0))
                })
                .collect();
            let combined = crt_ui(&vals, moduli);
            if !num_traits::Zero::is_zero(&combined) {
                entries.push((i, j, combined));
            }
        }
    }
    SparseMatrix::from_entries(r, c, entries)
}

/// A random sparse matrix with roughly `density` of its `r * c` entries
/// non-zero, each entry uniform in `[0, modulus)`. Used by randomized
/// property tests and benchmarks rather than production code.
pub fn randtest(r: usize, c: usize, density: f64, modulus: Modulus, rng: &mut impl Rng) -> SparseMatrix<Zr> {
    use num_traits::ToPrimitive;
    let n = modulus.value().to_u64().unwrap_or(u64::MAX).max(2);
    let mut entries = Vec::new();
    for i in 0..r {
        for j in 0..c {
            if rng.gen_bool(density) {
                let v: u64 = rng.gen_range(1..n);
                entries.push((i, j as i64, Zr::new(v, modulus.clone())));
            }
        }
    }
    SparseMatrix::from_entries(r, c, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn multi_mod_then_crt_round_trips() {
        let a = SparseMatrix::from_entries(2, 2, vec![(0, 0, Z::from(100)), (1, 1, Z::from(-55))]);
        let moduli = vec![Modulus::from_u64(101).unwrap(), Modulus::from_u64(103).unwrap()];
        let residues = multi_mod_ui(&a, &moduli);
        let back = multi_crt_ui(&residues, &moduli);
        assert_eq!(back, a);
    }

    #[test]
    fn randtest_respects_shape() {
        let mut rng = SmallRng::seed_from_u64(42);
        let m = Modulus::from_u64(13).unwrap();
        let a = randtest(4, 5, 0.5, m, &mut rng);
        assert_eq!(a.nrows(), 4);
        assert_eq!(a.ncols(), 5);
    }
}
