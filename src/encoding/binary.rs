use crate::network::Network;

/// Encodes `value` as a binary vector, most significant bit first,
/// left-padded with zeros to `width` elements.
///
/// Never truncates: a value that needs more than `width` bits yields a
/// vector longer than `width`, and the network's own shape check rejects it
/// at the point of use.
pub fn int_to_binary(value: u64, width: usize) -> Vec<f64> {
    let needed = (u64::BITS - value.leading_zeros()).max(1) as usize;
    let len = width.max(needed);
    (0..len)
        .map(|i| {
            let bit = len - 1 - i;
            // Positions past u64's width are always zero padding; shifting
            // by them would overflow.
            if bit < u64::BITS as usize && value >> bit & 1 == 1 {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Encodes the scalar value of `c` as a binary vector of `width` elements.
pub fn char_to_binary(c: char, width: usize) -> Vec<f64> {
    int_to_binary(u64::from(u32::from(c)), width)
}

/// Reads a binary vector back into an integer, most significant bit first.
/// Every element at or above 0.5 counts as a 1. Vectors longer than 64
/// elements shift their leading bits out; only the lowest 64 contribute.
pub fn binary_to_int(bits: &[f64]) -> u64 {
    bits.iter().fold(0, |acc, &b| (acc << 1) | u64::from(b >= 0.5))
}

/// Encodes `value` sized for the network's input layer.
pub fn input_vector(network: &Network, value: u64) -> Vec<f64> {
    int_to_binary(value, network.input_size())
}

/// Encodes `value` sized for the network's output layer.
pub fn target_vector(network: &Network, value: u64) -> Vec<f64> {
    int_to_binary(value, network.output_size())
}
