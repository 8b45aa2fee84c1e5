pub mod binary;

pub use binary::{binary_to_int, char_to_binary, input_vector, int_to_binary, target_vector};
