use rand::Rng;

use crate::activation::Activation;
use crate::error::{NetworkError, Result};
use crate::network::layer::Layer;

/// A fully-connected feedforward network.
///
/// Layer 0 is the input layer, the last layer is the output layer; the layer
/// count and every layer's width are fixed for the network's lifetime.
/// `learning_rate` and `activation` are plain public fields and may be
/// adjusted between training calls.
#[derive(Debug, Clone)]
pub struct Network {
    pub name: String,
    pub layers: Vec<Layer>,
    pub learning_rate: f64,
    pub activation: Activation,
    pub(crate) training_rounds: u64,
}

impl Network {
    /// Builds a network with weights and biases drawn from `thread_rng`.
    ///
    /// `layer_sizes` lists the neuron count of every layer, input first.
    pub fn new(
        learning_rate: f64,
        layer_sizes: &[usize],
        activation: Activation,
        name: &str,
    ) -> Result<Network> {
        Self::with_rng(learning_rate, layer_sizes, activation, name, &mut rand::thread_rng())
    }

    /// Builds a network drawing every bias and weight from `rng`, which must
    /// yield uniform values in [0, 1). Injecting the source keeps
    /// construction reproducible under a seeded generator.
    pub fn with_rng<R: Rng>(
        learning_rate: f64,
        layer_sizes: &[usize],
        activation: Activation,
        name: &str,
        rng: &mut R,
    ) -> Result<Network> {
        if layer_sizes.len() < 2 {
            return Err(NetworkError::InvalidTopology(format!(
                "a network needs at least 2 layers, got {}",
                layer_sizes.len()
            )));
        }
        if let Some(l) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(NetworkError::InvalidTopology(format!("layer {l} has no neurons")));
        }

        let mut layers = Vec::with_capacity(layer_sizes.len());
        layers.push(Layer::input(layer_sizes[0]));
        for window in layer_sizes.windows(2) {
            layers.push(Layer::connected(window[1], window[0], rng));
        }

        Ok(Network {
            name: name.to_owned(),
            layers,
            learning_rate,
            activation,
            training_rounds: 0,
        })
    }

    /// Forward pass; returns the output-layer activations.
    ///
    /// Input-layer values are taken verbatim from `input` (no bias, no
    /// activation). Every later layer is computed strictly in order, each
    /// neuron from the fully-updated previous layer. The per-neuron `value`
    /// fields are left populated for the training engine.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_size() {
            return Err(NetworkError::ShapeMismatch {
                expected: self.input_size(),
                actual: input.len(),
            });
        }

        for (neuron, &x) in self.layers[0].neurons.iter_mut().zip(input) {
            neuron.value = x;
        }

        let activation = self.activation;
        for l in 1..self.layers.len() {
            let (upstream, rest) = self.layers.split_at_mut(l);
            let previous = &upstream[l - 1];
            for neuron in &mut rest[0].neurons {
                let mut sum = neuron.bias;
                for (dendrite, source) in neuron.dendrites.iter().zip(&previous.neurons) {
                    sum += source.value * dendrite.weight;
                }
                neuron.value = activation.function(sum);
            }
        }

        let output_layer = &self.layers[self.layers.len() - 1];
        Ok(output_layer.neurons.iter().map(|n| n.value).collect())
    }

    /// Number of neurons in the input layer.
    pub fn input_size(&self) -> usize {
        self.layers[0].size()
    }

    /// Number of neurons in the output layer.
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    /// Number of layers, input and output included.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Neuron count of layer `index`, if such a layer exists.
    pub fn layer_size(&self, index: usize) -> Option<usize> {
        self.layers.get(index).map(Layer::size)
    }

    /// Total training rounds applied since construction.
    pub fn training_rounds(&self) -> u64 {
        self.training_rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded(layer_sizes: &[usize], activation: Activation, seed: u64) -> Network {
        let mut rng = StdRng::seed_from_u64(seed);
        Network::with_rng(0.5, layer_sizes, activation, "test", &mut rng).unwrap()
    }

    #[test]
    fn rejects_fewer_than_two_layers() {
        assert!(matches!(
            Network::new(0.5, &[], Activation::Sigmoid, "bad"),
            Err(NetworkError::InvalidTopology(_))
        ));
        assert!(matches!(
            Network::new(0.5, &[3], Activation::Sigmoid, "bad"),
            Err(NetworkError::InvalidTopology(_))
        ));
    }

    #[test]
    fn rejects_empty_layers() {
        assert!(matches!(
            Network::new(0.5, &[2, 0, 1], Activation::Sigmoid, "bad"),
            Err(NetworkError::InvalidTopology(_))
        ));
    }

    #[test]
    fn wires_one_dendrite_per_upstream_neuron() {
        let network = seeded(&[3, 4, 2], Activation::Sigmoid, 1);
        assert_eq!(network.layer_count(), 3);
        assert_eq!(network.input_size(), 3);
        assert_eq!(network.output_size(), 2);
        assert_eq!(network.layer_size(1), Some(4));
        assert_eq!(network.layer_size(9), None);
        for neuron in &network.layers[0].neurons {
            assert!(neuron.dendrites.is_empty());
        }
        for neuron in &network.layers[1].neurons {
            assert_eq!(neuron.dendrites.len(), 3);
        }
        for neuron in &network.layers[2].neurons {
            assert_eq!(neuron.dendrites.len(), 4);
        }
    }

    #[test]
    fn input_layer_passes_values_through_unmodified() {
        let mut network = seeded(&[2, 2], Activation::Sigmoid, 2);
        network.forward(&[3.0, -7.5]).unwrap();
        assert_eq!(network.layers[0].neurons[0].value, 3.0);
        assert_eq!(network.layers[0].neurons[1].value, -7.5);
    }

    #[test]
    fn forward_computes_weighted_sum_plus_bias() {
        let mut network = seeded(&[2, 1], Activation::Identity, 3);
        let neuron = &mut network.layers[1].neurons[0];
        neuron.bias = 0.1;
        neuron.dendrites[0].weight = 0.5;
        neuron.dendrites[1].weight = -0.25;

        let output = network.forward(&[1.0, 2.0]).unwrap();
        assert_eq!(output, vec![0.1 + 1.0 * 0.5 + 2.0 * (-0.25)]);
    }

    #[test]
    fn forward_is_deterministic() {
        let mut network = seeded(&[3, 5, 2], Activation::Sigmoid, 4);
        let input = [0.25, -1.5, 0.75];
        let first = network.forward(&input).unwrap();
        let second = network.forward(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn forward_rejects_wrong_input_length_without_mutation() {
        let mut network = seeded(&[2, 3, 1], Activation::Sigmoid, 5);
        let before = network.clone();

        let err = network.forward(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, NetworkError::ShapeMismatch { expected: 2, actual: 3 });

        for (layer, before_layer) in network.layers.iter().zip(&before.layers) {
            for (neuron, before_neuron) in layer.neurons.iter().zip(&before_layer.neurons) {
                assert_eq!(neuron.value, before_neuron.value);
                assert_eq!(neuron.bias, before_neuron.bias);
                for (d, before_d) in neuron.dendrites.iter().zip(&before_neuron.dendrites) {
                    assert_eq!(d.weight, before_d.weight);
                }
            }
        }
    }
}
