use serde::{Serialize, Deserialize};

use crate::activation::Activation;
use crate::error::{NetworkError, Result};
use crate::network::layer::{Dendrite, Layer, Neuron};
use crate::network::network::Network;

/// Durable state of one neuron: its bias and dendrite weights, in dendrite
/// order. Input-layer neurons carry an empty weight list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronSnapshot {
    pub bias: f64,
    pub weights: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub neurons: Vec<NeuronSnapshot>,
}

/// A pure-data projection of everything a network needs to resume exactly:
/// shape, learning rate, activation, round counter, and every bias and
/// weight. Transient per-pass state (`value`, `delta`) is deliberately
/// absent; it holds no meaning outside a single pass.
///
/// `NetworkSnapshot` is the serialization boundary: the network itself never
/// touches files, an external serializer persists the snapshot. The JSON
/// helpers below cover the common case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub name: String,
    pub learning_rate: f64,
    pub activation: Activation,
    pub training_rounds: u64,
    pub layers: Vec<LayerSnapshot>,
}

impl NetworkSnapshot {
    /// Serializes the snapshot to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a snapshot from a JSON file previously written by
    /// `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<NetworkSnapshot> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

impl Network {
    /// Projects the network's durable state into a snapshot.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let layers = self
            .layers
            .iter()
            .map(|layer| LayerSnapshot {
                neurons: layer
                    .neurons
                    .iter()
                    .map(|neuron| NeuronSnapshot {
                        bias: neuron.bias,
                        weights: neuron.dendrites.iter().map(|d| d.weight).collect(),
                    })
                    .collect(),
            })
            .collect();

        NetworkSnapshot {
            name: self.name.clone(),
            learning_rate: self.learning_rate,
            activation: self.activation,
            training_rounds: self.training_rounds,
            layers,
        }
    }

    /// Rebuilds a network from a snapshot, bit-for-bit.
    ///
    /// The snapshot's shape is fully validated first: at least two layers,
    /// no empty layer, no weights on the input layer, and exactly one weight
    /// per previous-layer neuron everywhere else. Transient `value`/`delta`
    /// fields start zeroed.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Network> {
        if snapshot.layers.len() < 2 {
            return Err(NetworkError::InvalidTopology(format!(
                "a network needs at least 2 layers, got {}",
                snapshot.layers.len()
            )));
        }

        let mut previous_size = 0;
        for (l, layer) in snapshot.layers.iter().enumerate() {
            if layer.neurons.is_empty() {
                return Err(NetworkError::InvalidTopology(format!("layer {l} has no neurons")));
            }
            for (n, neuron) in layer.neurons.iter().enumerate() {
                let expected = if l == 0 { 0 } else { previous_size };
                if neuron.weights.len() != expected {
                    return Err(NetworkError::InvalidTopology(format!(
                        "layer {l} neuron {n} has {} weights, expected {expected}",
                        neuron.weights.len()
                    )));
                }
            }
            previous_size = layer.neurons.len();
        }

        let layers = snapshot
            .layers
            .into_iter()
            .map(|layer| Layer {
                neurons: layer
                    .neurons
                    .into_iter()
                    .map(|neuron| Neuron {
                        value: 0.0,
                        bias: neuron.bias,
                        delta: 0.0,
                        dendrites: neuron
                            .weights
                            .into_iter()
                            .map(|weight| Dendrite { weight })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Ok(Network {
            name: snapshot.name,
            layers,
            learning_rate: snapshot.learning_rate,
            activation: snapshot.activation,
            training_rounds: snapshot.training_rounds,
        })
    }
}
