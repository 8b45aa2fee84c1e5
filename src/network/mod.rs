pub mod layer;
pub mod network;
pub mod snapshot;

pub use layer::{Dendrite, Layer, Neuron};
pub use network::Network;
pub use snapshot::{LayerSnapshot, NetworkSnapshot, NeuronSnapshot};
