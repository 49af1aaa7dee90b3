use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fv_bench::{chain_matrix, chain_vector, gen_assignments, gen_weights};

fn bench_vector_eval(c: &mut Criterion) {
    let mut g = c.benchmark_group("fv_vector_eval");
    for &num_vars in &[16usize, 64usize] {
        let (space, f) = chain_vector(num_vars, 3, 3, 0x1234_5678).unwrap();
        let xs = gen_assignments(&space, 256, 7);
        let w = gen_weights(f.len() + 1, 11);

        g.bench_with_input(BenchmarkId::new("get_value_batch", num_vars), &xs, |b, xs| {
            b.iter(|| {
                for x in xs {
                    black_box(f.get_value(black_box(&space), black_box(x)));
                }
            })
        });
        g.bench_with_input(BenchmarkId::new("get_weighted_value_batch", num_vars), &xs, |b, xs| {
            b.iter(|| {
                for x in xs {
                    black_box(f.get_weighted_value(black_box(&space), black_box(x), &w));
                }
            })
        });
    }
    g.finish();
}

fn bench_matrix_eval(c: &mut Criterion) {
    let mut g = c.benchmark_group("fv_matrix_eval");
    for &num_vars in &[16usize, 64usize] {
        let (space, actions, q) = chain_matrix(num_vars, 4, 3, 2, 0xA5A5_A5A5).unwrap();
        let xs = gen_assignments(&space, 256, 3);
        let us = gen_assignments(&actions, 256, 5);

        g.bench_with_input(BenchmarkId::new("get_value_batch", num_vars), &xs, |b, xs| {
            b.iter(|| {
                for (x, u) in xs.iter().zip(&us) {
                    black_box(q.get_value(&space, &actions, black_box(x), black_box(u)));
                }
            })
        });
    }
    g.finish();
}

criterion_group!(benches, bench_vector_eval, bench_matrix_eval);
criterion_main!(benches);
