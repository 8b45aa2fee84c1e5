use crate::error::{NetworkError, Result};
use crate::network::Network;

/// Trains `network` on one (input, target) pair for `rounds` rounds of
/// online gradient descent.
///
/// Both vector lengths are validated against the network before anything is
/// touched, so a `ShapeMismatch` leaves weights, biases, and the round
/// counter exactly as they were.
///
/// One round, in order:
/// 1. forward pass with `input`;
/// 2. output-layer deltas from `target`;
/// 3. hidden-layer deltas, nearest-output layer first (each hidden layer
///    needs the finished deltas of the layer after it);
/// 4. bias/weight updates on every non-input layer, scaled by the network's
///    learning rate;
/// 5. round-counter increment.
///
/// The forward pass is re-run every round, so each round trains against the
/// weights the previous round produced.
pub fn train_network(
    network: &mut Network,
    input: &[f64],
    target: &[f64],
    rounds: u64,
) -> Result<()> {
    if input.len() != network.input_size() {
        return Err(NetworkError::ShapeMismatch {
            expected: network.input_size(),
            actual: input.len(),
        });
    }
    if target.len() != network.output_size() {
        return Err(NetworkError::ShapeMismatch {
            expected: network.output_size(),
            actual: target.len(),
        });
    }

    for _ in 0..rounds {
        network.forward(input)?;
        output_deltas(network, target);
        hidden_deltas(network);
        apply_updates(network);
        network.training_rounds += 1;
    }

    Ok(())
}

/// δ_i = g'(value_i) · (target_i − value_i) for every output neuron.
fn output_deltas(network: &mut Network, target: &[f64]) {
    let activation = network.activation;
    let last = network.layers.len() - 1;
    for (neuron, &t) in network.layers[last].neurons.iter_mut().zip(target) {
        neuron.delta = activation.derivative_from_output(neuron.value) * (t - neuron.value);
    }
}

/// δ_k = g'(value_k) · Σ_i weight(k→i) · δ_i over all next-layer neurons.
///
/// Hidden layers are processed strictly from the output end toward the
/// input: each layer reads the already-final deltas of its successor.
/// Input-layer neurons get no delta; nothing updates their (nonexistent)
/// dendrites.
fn hidden_deltas(network: &mut Network) {
    let activation = network.activation;
    for l in (1..network.layers.len() - 1).rev() {
        let (up_to_layer, rest) = network.layers.split_at_mut(l + 1);
        let layer = &mut up_to_layer[l];
        let next = &rest[0];
        for (k, neuron) in layer.neurons.iter_mut().enumerate() {
            let downstream: f64 = next
                .neurons
                .iter()
                .map(|n| n.dendrites[k].weight * n.delta)
                .sum();
            neuron.delta = activation.derivative_from_output(neuron.value) * downstream;
        }
    }
}

/// bias += lr·δ and weight_k += lr·prev[k].value·δ on every non-input
/// neuron. No update reads another neuron's post-update state, so the order
/// across neurons is immaterial.
fn apply_updates(network: &mut Network) {
    let lr = network.learning_rate;
    for l in 1..network.layers.len() {
        let (upstream, rest) = network.layers.split_at_mut(l);
        let previous = &upstream[l - 1];
        for neuron in &mut rest[0].neurons {
            neuron.bias += lr * neuron.delta;
            for (dendrite, source) in neuron.dendrites.iter_mut().zip(&previous.neurons) {
                dendrite.weight += lr * source.value * neuron.delta;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use rand::{rngs::StdRng, SeedableRng};
    use std::f64::consts::E;

    fn seeded(layer_sizes: &[usize], activation: Activation, lr: f64, seed: u64) -> Network {
        let mut rng = StdRng::seed_from_u64(seed);
        Network::with_rng(lr, layer_sizes, activation, "train", &mut rng).unwrap()
    }

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + E.powf(-x))
    }

    fn assert_same_parameters(a: &Network, b: &Network) {
        for (layer_a, layer_b) in a.layers.iter().zip(&b.layers) {
            for (na, nb) in layer_a.neurons.iter().zip(&layer_b.neurons) {
                assert_eq!(na.bias, nb.bias);
                for (da, db) in na.dendrites.iter().zip(&nb.dendrites) {
                    assert_eq!(da.weight, db.weight);
                }
            }
        }
    }

    #[test]
    fn round_counter_advances_by_rounds() {
        let mut network = seeded(&[2, 2, 1], Activation::Sigmoid, 1.0, 21);
        train_network(&mut network, &[1.0, 0.0], &[1.0], 7).unwrap();
        assert_eq!(network.training_rounds(), 7);
        train_network(&mut network, &[0.0, 0.0], &[0.0], 1).unwrap();
        assert_eq!(network.training_rounds(), 8);
    }

    #[test]
    fn zero_rounds_is_a_no_op() {
        let mut network = seeded(&[2, 1], Activation::Sigmoid, 1.0, 22);
        let before = network.clone();
        train_network(&mut network, &[1.0, 0.0], &[1.0], 0).unwrap();
        assert_eq!(network.training_rounds(), 0);
        assert_same_parameters(&network, &before);
    }

    #[test]
    fn shape_mismatch_leaves_network_untouched() {
        let mut network = seeded(&[2, 3, 1], Activation::Sigmoid, 1.0, 23);
        let before = network.clone();

        let err = train_network(&mut network, &[1.0], &[0.5], 3).unwrap_err();
        assert_eq!(err, NetworkError::ShapeMismatch { expected: 2, actual: 1 });

        let err = train_network(&mut network, &[1.0, 0.0], &[0.5, 0.5], 3).unwrap_err();
        assert_eq!(err, NetworkError::ShapeMismatch { expected: 1, actual: 2 });

        assert_eq!(network.training_rounds(), 0);
        assert_same_parameters(&network, &before);
    }

    #[test]
    fn single_step_matches_closed_form() {
        let mut network = seeded(&[1, 1], Activation::Sigmoid, 0.7, 24);
        let w = 0.4;
        let x = 0.9;
        let t = 1.0;
        {
            let neuron = &mut network.layers[1].neurons[0];
            neuron.bias = 0.0;
            neuron.dendrites[0].weight = w;
        }

        train_network(&mut network, &[x], &[t], 1).unwrap();

        let value = sigmoid(x * w);
        let delta = value * (1.0 - value) * (t - value);
        let neuron = &network.layers[1].neurons[0];
        assert_eq!(neuron.value, value);
        assert_eq!(neuron.delta, delta);
        assert_eq!(neuron.dendrites[0].weight, w + 0.7 * x * delta);
        assert_eq!(neuron.bias, 0.7 * delta);
    }

    #[test]
    fn hidden_delta_uses_pre_update_downstream_weights() {
        let mut network = seeded(&[1, 1, 1], Activation::Sigmoid, 1.0, 25);
        let (w1, b1, w2, b2) = (0.8, 0.1, -0.5, 0.2);
        let (x, t) = (1.5, 0.0);
        {
            let hidden = &mut network.layers[1].neurons[0];
            hidden.bias = b1;
            hidden.dendrites[0].weight = w1;
            let output = &mut network.layers[2].neurons[0];
            output.bias = b2;
            output.dendrites[0].weight = w2;
        }

        train_network(&mut network, &[x], &[t], 1).unwrap();

        let h = sigmoid(b1 + x * w1);
        let o = sigmoid(b2 + h * w2);
        let delta_o = o * (1.0 - o) * (t - o);
        // The hidden delta must see w2 as it was before this round's update.
        let delta_h = h * (1.0 - h) * (w2 * delta_o);

        assert_eq!(network.layers[2].neurons[0].delta, delta_o);
        assert_eq!(network.layers[1].neurons[0].delta, delta_h);
        assert_eq!(network.layers[2].neurons[0].bias, b2 + delta_o);
        assert_eq!(network.layers[2].neurons[0].dendrites[0].weight, w2 + h * delta_o);
        assert_eq!(network.layers[1].neurons[0].bias, b1 + delta_h);
        assert_eq!(network.layers[1].neurons[0].dendrites[0].weight, w1 + x * delta_h);
    }

    #[test]
    fn multi_round_equals_repeated_single_rounds() {
        let mut in_one_call = seeded(&[2, 3, 2], Activation::Sigmoid, 1.2, 26);
        let mut one_by_one = in_one_call.clone();

        train_network(&mut in_one_call, &[0.6, 0.1], &[1.0, 0.0], 5).unwrap();
        for _ in 0..5 {
            train_network(&mut one_by_one, &[0.6, 0.1], &[1.0, 0.0], 1).unwrap();
        }

        assert_same_parameters(&in_one_call, &one_by_one);
        assert_eq!(in_one_call.training_rounds(), one_by_one.training_rounds());
    }

    #[test]
    fn step_activation_has_zero_gradient() {
        let mut network = seeded(&[2, 2, 1], Activation::Step, 1.0, 27);
        let before = network.clone();
        train_network(&mut network, &[1.0, 0.0], &[1.0], 10).unwrap();
        // The step function is flat, so training moves nothing but the counter.
        assert_same_parameters(&network, &before);
        assert_eq!(network.training_rounds(), 10);
    }

    #[test]
    fn identity_network_follows_the_delta_rule() {
        let mut network = seeded(&[1, 1], Activation::Identity, 0.1, 28);
        let t = 2.0;
        for _ in 0..200 {
            train_network(&mut network, &[1.0], &[t], 1).unwrap();
        }
        let out = network.forward(&[1.0]).unwrap()[0];
        assert!((out - t).abs() < 1e-6, "expected ≈{t}, got {out}");
    }
}
