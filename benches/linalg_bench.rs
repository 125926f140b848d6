use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use modlinalg::ring::{Modulus, Zr};
use modlinalg::sparse::fflu::det_bareiss;
use modlinalg::sparse::lu::lu;
use modlinalg::sparse::matrix::SparseMatrix;
use modlinalg::sparse::rref::rref;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_dense_mod_matrix(n: usize, modulus: &Modulus, rng: &mut impl Rng) -> SparseMatrix<Zr> {
    let entries: Vec<(usize, i64, Zr)> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| (i, j as i64, Zr::new(rng.gen_range(0..u64::MAX), modulus.clone())))
        .collect();
    SparseMatrix::from_entries(n, n, entries)
}

fn random_integer_matrix(n: usize, rng: &mut impl Rng) -> SparseMatrix<modlinalg::ring::Z> {
    let entries: Vec<(usize, i64, modlinalg::ring::Z)> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| (i, j as i64, modlinalg::ring::Z::from(rng.gen_range(-9i64..9))))
        .collect();
    SparseMatrix::from_entries(n, n, entries)
}

fn bench_sparse_lu(c: &mut Criterion) {
    let modulus = Modulus::from_u64(1_000_003).unwrap();
    let mut group = c.benchmark_group("sparse_lu");
    for &n in &[16usize, 32, 64] {
        let mut rng = SmallRng::seed_from_u64(n as u64);
        let a = random_dense_mod_matrix(n, &modulus, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &a, |b, a| {
            b.iter(|| lu(a).unwrap());
        });
    }
    group.finish();
}

fn bench_sparse_rref(c: &mut Criterion) {
    let modulus = Modulus::from_u64(1_000_003).unwrap();
    let mut group = c.benchmark_group("sparse_rref");
    for &n in &[16usize, 32, 64] {
        let mut rng = SmallRng::seed_from_u64(n as u64 + 1);
        let a = random_dense_mod_matrix(n, &modulus, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &a, |b, a| {
            b.iter(|| rref(a).unwrap());
        });
    }
    group.finish();
}

fn bench_bareiss_det(c: &mut Criterion) {
    let mut group = c.benchmark_group("bareiss_det");
    for &n in &[8usize, 16, 24] {
        let mut rng = SmallRng::seed_from_u64(n as u64 + 2);
        let a = random_integer_matrix(n, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &a, |b, a| {
            b.iter(|| det_bareiss(a).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sparse_lu, bench_sparse_rref, bench_bareiss_det);
criterion_main!(benches);
