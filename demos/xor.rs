use dendrite_nn::{train_network, Activation, Network, Result};

fn main() -> Result<()> {
    let mut network = Network::new(1.25, &[2, 2, 1], Activation::Sigmoid, "xor")?;

    let pairs: [(&[f64], &[f64]); 4] = [
        (&[0.0, 0.0], &[0.0]),
        (&[0.0, 1.0], &[1.0]),
        (&[1.0, 0.0], &[1.0]),
        (&[1.0, 1.0], &[0.0]),
    ];

    let epochs = 4000;
    for epoch in 0..epochs {
        for (input, target) in pairs {
            train_network(&mut network, input, target, 5)?;
        }
        if epoch % 500 == 0 {
            let mut sum = 0.0;
            for (input, target) in pairs {
                let out = network.forward(input)?[0];
                sum += (target[0] - out) * (target[0] - out);
            }
            println!("Epoch {epoch}: mse = {:.6}", sum / pairs.len() as f64);
        }
    }

    println!();
    for (input, target) in pairs {
        let out = network.forward(input)?[0];
        println!("{} xor {} = {:.4} (want {})", input[0], input[1], out, target[0]);
    }
    println!("\nTrained for {} rounds.", network.training_rounds());
    Ok(())
}
