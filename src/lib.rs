pub mod activation;
pub mod encoding;
pub mod error;
pub mod network;
pub mod render;
pub mod train;

// Convenience re-exports
pub use activation::activation::Activation;
pub use error::{NetworkError, Result};
pub use network::layer::{Dendrite, Layer, Neuron};
pub use network::network::Network;
pub use network::snapshot::NetworkSnapshot;
pub use train::trainer::train_network;
