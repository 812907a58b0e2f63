use mlp_live::loss;
use mlp_live::{Activation, Applied, ConfigPatch, Network, NetworkConfig, Preset, WeightMatrix};

fn and_config() -> NetworkConfig {
    NetworkConfig {
        learning_rate: 0.5,
        hidden_activation: Activation::ReLU,
        output_activation: Activation::Sigmoid,
        input_nodes: 2,
        hidden_nodes: 4,
        output_nodes: 1,
    }
}

/// An in-range starting point (weights within 0.5, biases within 0.1) so the run does
/// not depend on the RNG stream.
fn and_network() -> Network {
    Network::from_parts(
        and_config(),
        vec![vec![0.0, 0.0], vec![0.1, 0.05, -0.05, 0.08], vec![0.0]],
        vec![
            WeightMatrix::from_rows(&[vec![0.4, -0.3, 0.25, 0.35], vec![0.3, 0.45, -0.2, 0.4]])
                .unwrap(),
            WeightMatrix::from_rows(&[vec![0.45], vec![0.3], vec![-0.25], vec![0.4]]).unwrap(),
        ],
    )
    .unwrap()
}

fn output_for(net: &mut Network, input: &[f32]) -> Vec<f32> {
    net.forward(input);
    net.outputs().collect()
}

#[test]
fn and_gate_converges_with_cycled_samples() {
    let mut net = and_network();
    let data = Preset::And.dataset();

    for step in 0..2000 {
        let s = data.sample(step % data.len());
        net.train_step(&s.input, &s.target);
    }
    assert_eq!(net.iteration(), 2000);

    for s in &data {
        let out = output_for(&mut net, &s.input);
        let l = loss::mse(&out, &s.target);
        assert!(l < 0.05, "loss {l} too high for {:?}", s.input);
    }
    assert!(output_for(&mut net, &[1.0, 1.0])[0] > 0.8);
    assert!(output_for(&mut net, &[0.0, 0.0])[0] < 0.2);
}

#[test]
fn nan_hidden_neuron_is_contained_and_loss_reported_as_one() {
    let config = NetworkConfig {
        learning_rate: 0.1,
        hidden_activation: Activation::Tanh,
        output_activation: Activation::Sigmoid,
        input_nodes: 2,
        hidden_nodes: 3,
        output_nodes: 2,
    };
    let mut net = Network::from_parts(
        config,
        vec![vec![0.0, 0.0], vec![0.0, 0.0, 0.0], vec![0.0, 0.0]],
        vec![
            WeightMatrix::from_rows(&[vec![0.1, f32::NAN, 0.2], vec![0.3, -0.4, 0.1]]).unwrap(),
            WeightMatrix::from_rows(&[vec![0.2, 0.1], vec![0.3, -0.3], vec![0.1, 0.4]]).unwrap(),
        ],
    )
    .unwrap();

    let stats = net.train_step(&[1.0, 1.0], &[1.0, 0.0]);

    assert!(stats.raw_loss.is_nan());
    assert_eq!(stats.loss, 1.0);
    assert!(net.loss().is_finite());
    // All 6 hidden->output edges see NaN output deltas, plus the 2 edges into the
    // poisoned hidden neuron.
    assert_eq!(stats.skipped_edges, 8);
    assert!(net.layer(1)[1].delta().is_nan());
    assert!(net.weight(0, 0, 1).unwrap().is_nan());
    assert_eq!(net.weight(0, 1, 1), Some(-0.4));
    assert_eq!(net.weight(1, 0, 0), Some(0.2));

    let again = net.train_step(&[1.0, 1.0], &[1.0, 0.0]);
    assert_eq!(again.loss, 1.0);
    assert_eq!(net.iteration(), 2);
}

#[test]
fn short_inputs_do_not_leave_stale_values() {
    let mut net = Network::with_seed(NetworkConfig::default(), 1);
    net.forward(&[0.7, 0.8, 0.9]);
    net.forward(&[0.7]);

    let inputs: Vec<f32> = net.layer(0).iter().map(|n| n.value()).collect();
    assert_eq!(inputs, vec![0.7, 0.0, 0.0]);

    let mut fresh = Network::with_seed(NetworkConfig::default(), 1);
    fresh.forward(&[0.7, 0.0, 0.0]);
    assert_eq!(fresh.snapshot(), net.snapshot());
}

#[test]
fn instances_are_independent() {
    let mut a = Network::with_seed(NetworkConfig::default(), 9);
    let b = Network::with_seed(NetworkConfig::default(), 9);

    for _ in 0..10 {
        a.train_step(&[1.0, 0.0, 1.0], &[1.0, 0.0]);
    }
    assert_eq!(a.iteration(), 10);
    assert_eq!(b.iteration(), 0);

    let untouched = Network::with_seed(NetworkConfig::default(), 9);
    assert_eq!(b.snapshot(), untouched.snapshot());
}

#[test]
fn live_activation_swap_keeps_weights() {
    let mut net = Network::with_seed(NetworkConfig::default(), 2);
    net.train_step(&[0.3, 0.3, 0.3], &[0.0, 1.0]);
    let before = net.snapshot();

    let patch = ConfigPatch::from_json_str(r#"{"hiddenActivation": "Tanh"}"#).unwrap();
    let applied = net.apply(&patch);
    assert_eq!(applied, Applied::Live);
    assert_eq!(net.weights(0).as_slice(), before.weights[0].weights.as_slice());

    // Same weights, different hidden activation: the next forward differs.
    net.forward(&[0.3, 0.3, 0.3]);
    let hidden: Vec<f32> = net.layer(1).iter().map(|n| n.value()).collect();
    assert!(hidden.iter().all(|h| (-1.0..=1.0).contains(h)));
}

#[test]
fn output_layer_biases_are_not_trained() {
    let mut net = Network::with_seed(and_config(), 4);
    let before = net.layer(2)[0].bias();
    for _ in 0..50 {
        net.train_step(&[1.0, 1.0], &[1.0]);
    }
    assert_eq!(net.layer(2)[0].bias(), before);
}
