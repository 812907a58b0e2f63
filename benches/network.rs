use criterion::{Criterion, black_box, criterion_group, criterion_main};

use mlp_live::{Activation, Network, NetworkConfig};

fn wide_config() -> NetworkConfig {
    NetworkConfig {
        learning_rate: 0.05,
        hidden_activation: Activation::ReLU,
        output_activation: Activation::Sigmoid,
        input_nodes: 64,
        hidden_nodes: 128,
        output_nodes: 10,
    }
}

fn network_forward_bench(c: &mut Criterion) {
    let mut net = Network::with_seed(wide_config(), 0);
    let input = vec![0.1_f32; 64];

    c.bench_function("network_forward_64_128_10", |b| {
        b.iter(|| {
            net.forward(black_box(&input));
            black_box(net.outputs().sum::<f32>());
        })
    });
}

fn network_train_step_bench(c: &mut Criterion) {
    let mut net = Network::with_seed(wide_config(), 0);
    let input = vec![0.1_f32; 64];
    let target = vec![0.0_f32; 10];

    c.bench_function("network_train_step_64_128_10", |b| {
        b.iter(|| {
            let stats = net.train_step(black_box(&input), black_box(&target));
            black_box(stats);
        })
    });
}

fn snapshot_bench(c: &mut Criterion) {
    let net = Network::with_seed(wide_config(), 0);

    c.bench_function("network_snapshot_64_128_10", |b| {
        b.iter(|| black_box(net.snapshot()))
    });
}

criterion_group!(
    benches,
    network_forward_bench,
    network_train_step_bench,
    snapshot_bench
);
criterion_main!(benches);
