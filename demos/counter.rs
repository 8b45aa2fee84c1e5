use dendrite_nn::encoding::{binary_to_int, input_vector, target_vector};
use dendrite_nn::{train_network, Activation, Network, Result};

/// Teaches a [3, 8, 3] network the 3-bit increment n -> (n + 1) mod 8,
/// with inputs and targets going through the binary encoding helpers.
fn main() -> Result<()> {
    let mut network = Network::new(0.9, &[3, 8, 3], Activation::Sigmoid, "counter")?;

    let epochs = 3000;
    for epoch in 0..epochs {
        for n in 0..8u64 {
            let input = input_vector(&network, n);
            let target = target_vector(&network, (n + 1) % 8);
            train_network(&mut network, &input, &target, 5)?;
        }
        if epoch % 500 == 0 {
            let mut sum = 0.0;
            let mut count = 0;
            for n in 0..8u64 {
                let input = input_vector(&network, n);
                let target = target_vector(&network, (n + 1) % 8);
                for (t, v) in target.iter().zip(network.forward(&input)?) {
                    sum += (t - v) * (t - v);
                    count += 1;
                }
            }
            println!("Epoch {epoch}: mse = {:.6}", sum / count as f64);
        }
    }

    println!();
    for n in 0..8u64 {
        let input = input_vector(&network, n);
        let output = network.forward(&input)?;
        let predicted = binary_to_int(&output);
        let expected = (n + 1) % 8;
        let mark = if predicted == expected { "ok" } else { "MISS" };
        println!("{} + 1 = {} (want {}) {}", n, predicted, expected, mark);
    }
    println!("\nTrained for {} rounds.", network.training_rounds());
    Ok(())
}
