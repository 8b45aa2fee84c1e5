use rand::Rng;

/// A weighted connection from one previous-layer neuron to its owner.
///
/// Dendrite `k` of a neuron always connects to neuron `k` of the previous
/// layer; the pairing is positional, so no reference back to the source
/// neuron is stored.
#[derive(Debug, Clone)]
pub struct Dendrite {
    pub weight: f64,
}

/// One unit of the network.
///
/// `bias` and the dendrite weights are the durable, trained state. `value`
/// (last activation) and `delta` (last error gradient) are scratch: both are
/// overwritten on every forward/training pass and mean nothing between
/// passes.
#[derive(Debug, Clone)]
pub struct Neuron {
    pub value: f64,
    pub bias: f64,
    pub delta: f64,
    pub dendrites: Vec<Dendrite>,
}

impl Neuron {
    /// An input-layer neuron: no dendrites, bias pinned to 0.
    pub(crate) fn input() -> Neuron {
        Neuron { value: 0.0, bias: 0.0, delta: 0.0, dendrites: Vec::new() }
    }

    /// A neuron wired to every neuron of a `fan_in`-wide previous layer.
    /// Draws its bias first, then one weight per dendrite, all uniform [0, 1).
    pub(crate) fn connected<R: Rng>(fan_in: usize, rng: &mut R) -> Neuron {
        let bias = rng.gen::<f64>();
        let dendrites = (0..fan_in)
            .map(|_| Dendrite { weight: rng.gen::<f64>() })
            .collect();
        Neuron { value: 0.0, bias, delta: 0.0, dendrites }
    }
}

/// An ordered group of neurons at one depth.
#[derive(Debug, Clone)]
pub struct Layer {
    pub neurons: Vec<Neuron>,
}

impl Layer {
    pub(crate) fn input(size: usize) -> Layer {
        Layer { neurons: (0..size).map(|_| Neuron::input()).collect() }
    }

    pub(crate) fn connected<R: Rng>(size: usize, fan_in: usize, rng: &mut R) -> Layer {
        Layer { neurons: (0..size).map(|_| Neuron::connected(fan_in, rng)).collect() }
    }

    /// Number of neurons in this layer.
    pub fn size(&self) -> usize {
        self.neurons.len()
    }
}
