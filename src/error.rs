use thiserror::Error;

/// Failures a network can report.
///
/// Both variants are detected before any state is touched, so a failed call
/// leaves the network exactly as it was. There are no numerical error modes:
/// divergence or NaN from an aggressive learning rate is the caller's tuning
/// problem, not something the library reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// An input or target vector's length disagrees with the layer it feeds.
    #[error("vector of length {actual} does not match a layer of {expected} neurons")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The requested or restored topology cannot form a usable network.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
