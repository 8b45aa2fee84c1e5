use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Scalar activation applied to every non-input neuron.
///
/// `Step` is not differentiable; a network configured with it cannot learn
/// (its gradient is zero everywhere), but it remains useful for running
/// hand-assembled threshold networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Sigmoid,
    Tanh,
    Step,
    Identity,
}

impl Activation {
    /// Element-wise activation.
    ///
    /// Sigmoid and Tanh are clamped to their exact limits beyond |x| = 45,
    /// where the exponential would overflow long after the result stopped
    /// being distinguishable from the asymptote.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                if x < -45.0 {
                    0.0
                } else if x > 45.0 {
                    1.0
                } else {
                    1.0 / (1.0 + E.powf(-x))
                }
            }
            Activation::Tanh => {
                if x < -45.0 {
                    -1.0
                } else if x > 45.0 {
                    1.0
                } else {
                    x.tanh()
                }
            }
            Activation::Step => if x < 0.0 { 0.0 } else { 1.0 },
            Activation::Identity => x,
        }
    }

    /// Derivative expressed in terms of the activation's own output value.
    ///
    /// Backpropagation only ever sees the post-activation `value` a neuron
    /// stores, never the pre-activation sum, so the derivative must be
    /// computable from the output alone: σ'(x) = v·(1−v) for Sigmoid,
    /// tanh'(x) = 1−v² for Tanh. Step is flat everywhere it is defined.
    pub fn derivative_from_output(&self, value: f64) -> f64 {
        match self {
            Activation::Sigmoid => value * (1.0 - value),
            Activation::Tanh => 1.0 - value * value,
            Activation::Step => 0.0,
            Activation::Identity => 1.0,
        }
    }
}
