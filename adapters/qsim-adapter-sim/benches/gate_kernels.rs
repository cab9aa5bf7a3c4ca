//! Benchmarks for the state-vector gate kernels and sampling
//!
//! Run with: cargo bench -p qsim-adapter-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsim_adapter_sim::{Engine, Sampler, StateVector};
use qsim_ir::{Circuit, Gate, QubitId, StandardGate};

/// Benchmark single gates on states of growing width
fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernels");

    for num_qubits in [8u32, 12, 16] {
        let h = Gate::new(StandardGate::H, [QubitId(0)]);
        let cx = Gate::new(StandardGate::CX, [QubitId(0), QubitId(num_qubits - 1)]);
        let zz = Gate::with_parameter(StandardGate::ZZ, [QubitId(1), QubitId(2)], 0.25);
        let mcz = Gate::new(StandardGate::MCZ, (0..num_qubits).map(QubitId));

        for (label, gate) in [("h", h), ("cx", cx), ("zz", zz), ("mcz", mcz)] {
            group.bench_with_input(BenchmarkId::new(label, num_qubits), &gate, |b, gate| {
                let mut state = StateVector::new(num_qubits);
                b.iter(|| state.apply(black_box(gate)).unwrap());
            });
        }
    }

    group.finish();
}

/// Benchmark full circuit evolution
fn bench_circuits(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuits");
    let engine = Engine::default();

    for num_qubits in [4u32, 8, 12] {
        let ghz = Circuit::ghz(num_qubits).unwrap();
        group.bench_with_input(BenchmarkId::new("ghz", num_qubits), &ghz, |b, circuit| {
            b.iter(|| engine.execute(black_box(circuit)).unwrap());
        });
    }

    let grover = Circuit::grover(&["10110"], None).unwrap();
    group.bench_function("grover_5", |b| {
        b.iter(|| engine.execute(black_box(&grover)).unwrap());
    });

    group.finish();
}

/// Benchmark sequential vs. parallel sampling
fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    let state = Engine::default()
        .execute(&Circuit::uniform_superposition(10).unwrap())
        .unwrap()
        .state;

    for (label, sampler) in [
        ("sequential", Sampler::default()),
        ("parallel", Sampler::default().with_parallel(true)),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| sampler.sample(black_box(&state), 100_000, Some(7)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kernels, bench_circuits, bench_sampling);
criterion_main!(benches);
