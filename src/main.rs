// This binary crate is intentionally minimal.
// All neural network logic lives in the library (src/lib.rs and its modules).
// Run examples with:
//   cargo run --example xor
fn main() {
    println!("dendrite-nn: a small online-backpropagation network library in Rust.");
    println!("Run `cargo run --example xor` to see the XOR demo,");
    println!("or `cargo run --bin workbench` to explore a network in the browser.");
}
