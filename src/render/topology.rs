use std::io::Cursor;
use std::path::Path;

use image::{ImageError, ImageFormat, ImageOutputFormat, Rgb, RgbImage};

use crate::network::Network;

const NEURON_SIZE: i64 = 30;
const SPACING_X: i64 = 45;
const SPACING_Y: i64 = 120;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const LIGHT_GRAY: Rgb<u8> = Rgb([211, 211, 211]);

/// Draws the network topology: one outlined circle per neuron and one light
/// gray line per dendrite back to its source neuron. The input layer sits at
/// the bottom of the image, the output layer at the top, and every layer is
/// centered horizontally.
///
/// Geometry that does not fit inside `width × height` is clipped, not an
/// error.
pub fn draw(network: &Network, width: u32, height: u32) -> RgbImage {
    let mut image = RgbImage::from_pixel(width, height, WHITE);
    let center = i64::from(width) / 2;
    let mut y = i64::from(height) - SPACING_Y;

    for (l, layer) in network.layers.iter().enumerate() {
        let mut x = center - layer.size() as i64 * SPACING_X / 2;
        for neuron in &layer.neurons {
            circle(
                &mut image,
                x + NEURON_SIZE / 2,
                y + NEURON_SIZE / 2,
                NEURON_SIZE / 2,
                BLACK,
            );

            if l > 0 {
                let mut source_x = center - network.layers[l - 1].size() as i64 * SPACING_X / 2;
                for _ in &neuron.dendrites {
                    line(
                        &mut image,
                        x + NEURON_SIZE / 2,
                        y + NEURON_SIZE,
                        source_x + NEURON_SIZE / 2,
                        y + SPACING_Y,
                        LIGHT_GRAY,
                    );
                    source_x += SPACING_X;
                }
            }

            x += SPACING_X;
        }
        y -= SPACING_Y;
    }

    image
}

/// Renders the topology and encodes it as an in-memory PNG.
pub fn png_bytes(network: &Network, width: u32, height: u32) -> Result<Vec<u8>, ImageError> {
    let image = draw(network, width, height);
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// Renders the topology and writes it to `path` as a PNG, whatever the
/// extension says.
pub fn save_png<P: AsRef<Path>>(
    network: &Network,
    path: P,
    width: u32,
    height: u32,
) -> Result<(), ImageError> {
    draw(network, width, height).save_with_format(path, ImageFormat::Png)
}

fn plot(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

/// Midpoint circle outline around (`cx`, `cy`).
fn circle(image: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            plot(image, px, py, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

fn line(image: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        plot(image, x0, y0, color);
        return;
    }
    for i in 0..=steps {
        plot(image, x0 + dx * i / steps, y0 + dy * i / steps, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use rand::{rngs::StdRng, SeedableRng};

    fn network(layer_sizes: &[usize]) -> Network {
        let mut rng = StdRng::seed_from_u64(41);
        Network::with_rng(1.0, layer_sizes, Activation::Sigmoid, "render", &mut rng).unwrap()
    }

    #[test]
    fn image_has_the_requested_dimensions() {
        let image = draw(&network(&[2, 2, 1]), 320, 480);
        assert_eq!(image.dimensions(), (320, 480));
    }

    #[test]
    fn background_is_white() {
        let image = draw(&network(&[2, 1]), 300, 300);
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(299, 299), WHITE);
    }

    #[test]
    fn neurons_and_dendrites_land_where_the_layout_says() {
        // One neuron per layer in a 200x300 image. The input circle's center
        // is (93, 195), the output circle's center is (93, 75), and the only
        // dendrite is a vertical line between them at x = 93.
        let image = draw(&network(&[1, 1]), 200, 300);
        assert_eq!(*image.get_pixel(108, 195), BLACK);
        assert_eq!(*image.get_pixel(108, 75), BLACK);
        assert_eq!(*image.get_pixel(93, 135), LIGHT_GRAY);
    }

    #[test]
    fn oversized_networks_clip_instead_of_panicking() {
        let image = draw(&network(&[9, 9, 9]), 40, 40);
        assert_eq!(image.dimensions(), (40, 40));
    }

    #[test]
    fn png_bytes_carry_the_png_signature() {
        let bytes = png_bytes(&network(&[2, 2, 1]), 160, 240).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn saves_a_png_file() {
        let path = std::env::temp_dir().join("dendrite-nn-topology-test.png");
        save_png(&network(&[2, 1]), &path, 120, 180).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
        std::fs::remove_file(&path).unwrap();
    }
}
