use criterion::{black_box, criterion_group, criterion_main, Criterion};
use knap_solver::{generate_instance, DistributedSolver, GenerateParams, SharedMemorySolver, Solver};

pub fn criterion_benchmark(c: &mut Criterion) {
    let instance = generate_instance(&[7; 32], &GenerateParams::new(500, 5000)).unwrap();
    let solvers = [
        ("sequential", Solver::Sequential),
        (
            "shared_memory",
            Solver::SharedMemory(SharedMemorySolver::new(None, 256).unwrap()),
        ),
        (
            "distributed",
            Solver::Distributed(DistributedSolver::new(4, 64, 512).unwrap()),
        ),
    ];

    let mut group = c.benchmark_group("pack");
    for (name, solver) in &solvers {
        group.bench_function(*name, |b| {
            b.iter(|| {
                let mut knapsack = instance.knapsack();
                black_box(solver.pack(&mut knapsack, black_box(&instance.items)).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
