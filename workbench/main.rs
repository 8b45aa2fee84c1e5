/// dendrite-nn · network workbench
///
/// A minimal synchronous HTTP server for poking at a single network from the
/// browser: rebuild it, train it on one (input, target) pair at a time, run
/// the forward pass, and watch the topology picture change.
///
/// Run with:
///   cargo run --bin workbench --release
/// Then open http://127.0.0.1:7878
///
/// Routes:
///   GET  /               summary page with build/train/infer forms
///   POST /network        rebuild the network from the form
///   POST /train          train one (input, target) pair for N rounds
///   POST /infer          run the forward pass
///   GET  /topology.png   current topology as PNG
///   GET  /snapshot.json  current durable state as a JSON download

use std::io::Cursor;

use tiny_http::{Header, Method, Response, Server, StatusCode};

use dendrite_nn::encoding::binary_to_int;
use dendrite_nn::{render, train_network, Activation, Network};

// The HTML template is embedded at compile time so the binary is fully
// self-contained (no runtime file reads, works from any working directory).
const TEMPLATE: &str = include_str!("assets/workbench.html");

// ---------------------------------------------------------------------------
// URL / form-body helpers
// ---------------------------------------------------------------------------

/// Decodes a percent-encoded string (`%XX`) and converts `+` to space.
/// Handles malformed sequences gracefully (leaves them as-is).
fn url_decode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hi = (bytes[i + 1] as char).to_digit(16);
                let lo = (bytes[i + 2] as char).to_digit(16);
                match (hi, lo) {
                    (Some(h), Some(l)) => {
                        out.push((((h << 4) | l) as u8) as char);
                        i += 3;
                    }
                    _ => {
                        out.push('%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b as char);
                i += 1;
            }
        }
    }
    out
}

/// Parses `key=value&key2=value2` into a Vec of (key, value) pairs.
fn parse_form(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter_map(|pair| {
            let mut it = pair.splitn(2, '=');
            let k = it.next()?.to_owned();
            let v = it.next().unwrap_or("").to_owned();
            Some((url_decode(&k), url_decode(&v)))
        })
        .collect()
}

/// Looks up a key in the parsed form pairs.
fn form_get<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parses a comma-separated list of numbers, naming the first bad token.
fn parse_values(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| format!("'{}' is not a number", s)))
        .collect()
}

fn parse_layer_sizes(raw: &str) -> Result<Vec<usize>, String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| format!("'{}' is not a layer size", s)))
        .collect()
}

fn parse_activation(raw: &str) -> Result<Activation, String> {
    match raw {
        "sigmoid" => Ok(Activation::Sigmoid),
        "tanh" => Ok(Activation::Tanh),
        "step" => Ok(Activation::Step),
        "identity" => Ok(Activation::Identity),
        other => Err(format!("unknown activation '{}'", other)),
    }
}

const ACTIVATIONS: [(Activation, &str, &str); 4] = [
    (Activation::Sigmoid, "sigmoid", "Sigmoid"),
    (Activation::Tanh, "tanh", "Tanh"),
    (Activation::Step, "step", "Step"),
    (Activation::Identity, "identity", "Identity"),
];

/// Builds the `<option>` HTML for the activation selector.
fn activation_options(selected: Activation) -> String {
    ACTIVATIONS
        .iter()
        .map(|(value, form, label)| {
            let sel = if *value == selected { " selected" } else { "" };
            format!("<option value=\"{}\"{}>{}</option>", form, sel, label)
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

// ---------------------------------------------------------------------------
// Handlers & output formatting
// ---------------------------------------------------------------------------

/// Parses the build form and replaces the current network with a fresh one.
fn rebuild_network(body: &str, network: &mut Network) -> String {
    let pairs = parse_form(body);
    let name = form_get(&pairs, "name").unwrap_or("").trim();
    let name = if name.is_empty() { "workbench" } else { name };

    let learning_rate = match form_get(&pairs, "learning_rate").unwrap_or("").trim().parse::<f64>() {
        Ok(lr) => lr,
        Err(_) => return error_html("Learning rate must be a number."),
    };
    let layer_sizes = match parse_layer_sizes(form_get(&pairs, "layers").unwrap_or("")) {
        Ok(sizes) => sizes,
        Err(e) => return error_html(&e),
    };
    let activation = match parse_activation(form_get(&pairs, "activation").unwrap_or("")) {
        Ok(a) => a,
        Err(e) => return error_html(&e),
    };

    match Network::new(learning_rate, &layer_sizes, activation, name) {
        Ok(fresh) => {
            *network = fresh;
            result_html(
                "Network built",
                &format!(
                    "<p>{} layers with freshly seeded weights. The previous network is gone.</p>",
                    network.layer_count()
                ),
            )
        }
        Err(e) => error_html(&e.to_string()),
    }
}

/// Parses the train form and runs backpropagation on one pair.
fn run_training(
    network: &mut Network,
    raw_inputs: &str,
    raw_targets: &str,
    raw_rounds: &str,
) -> String {
    let inputs = match parse_values(raw_inputs) {
        Ok(v) => v,
        Err(e) => return error_html(&e),
    };
    let targets = match parse_values(raw_targets) {
        Ok(v) => v,
        Err(e) => return error_html(&e),
    };
    let rounds = match raw_rounds.trim().parse::<u64>() {
        Ok(r) => r,
        Err(_) => return error_html("Rounds must be a whole number."),
    };

    if let Err(e) = train_network(network, &inputs, &targets, rounds) {
        return error_html(&e.to_string());
    }

    // A fresh forward pass shows where the pair landed after training.
    match network.forward(&inputs) {
        Ok(output) => {
            let mse = targets
                .iter()
                .zip(&output)
                .map(|(t, v)| (t - v) * (t - v))
                .sum::<f64>()
                / output.len() as f64;
            result_html(
                &format!("Trained {} rounds", rounds),
                &format!(
                    "<p>{} rounds total · mean squared error {:.6}</p>{}",
                    network.training_rounds(),
                    mse,
                    format_outputs(&output),
                ),
            )
        }
        Err(e) => error_html(&e.to_string()),
    }
}

/// Parses the infer form and runs the forward pass.
fn run_inference(network: &mut Network, raw_inputs: &str) -> String {
    let inputs = match parse_values(raw_inputs) {
        Ok(v) => v,
        Err(e) => return error_html(&e),
    };
    match network.forward(&inputs) {
        Ok(output) => result_html("Forward pass", &format_outputs(&output)),
        Err(e) => error_html(&e.to_string()),
    }
}

/// Renders output values as a list plus their binary integer reading.
fn format_outputs(output: &[f64]) -> String {
    let values: String = output
        .iter()
        .enumerate()
        .map(|(i, v)| format!("[{}] {:.6}", i, v))
        .collect::<Vec<_>>()
        .join("<br>");
    format!(
        "<div class=\"raw-output\">{}</div>\
         <div class=\"decoded\">Read as binary: {}</div>",
        values,
        binary_to_int(output)
    )
}

fn result_html(title: &str, body: &str) -> String {
    format!("<div class=\"result-card\"><h2>{}</h2>{}</div>", title, body)
}

fn error_html(msg: &str) -> String {
    format!(
        "<div class=\"result-card\"><h2>Error</h2><div class=\"error-box\">{}</div></div>",
        msg
    )
}

// ---------------------------------------------------------------------------
// Page builder
// ---------------------------------------------------------------------------

fn render_page(
    network: &Network,
    result_section: &str,
    input_values: &str,
    target_values: &str,
    rounds_value: &str,
) -> String {
    let layer_sizes: Vec<String> = (0..network.layer_count())
        .filter_map(|l| network.layer_size(l))
        .map(|s| s.to_string())
        .collect();

    TEMPLATE
        .replace("{{NETWORK_NAME}}", &network.name)
        .replace("{{ACTIVATION}}", &format!("{:?}", network.activation))
        .replace("{{LEARNING_RATE}}", &network.learning_rate.to_string())
        .replace("{{TRAINING_ROUNDS}}", &network.training_rounds().to_string())
        .replace("{{LAYER_SIZES}}", &layer_sizes.join(", "))
        // The picture only changes when the topology does, so the layer
        // shape is the cache buster.
        .replace("{{CACHE_KEY}}", &layer_sizes.join("x"))
        .replace("{{ACTIVATION_OPTIONS}}", &activation_options(network.activation))
        .replace("{{NAME_VALUE}}", &network.name)
        .replace("{{LEARNING_RATE_VALUE}}", &network.learning_rate.to_string())
        .replace("{{LAYER_SIZES_VALUE}}", &layer_sizes.join(", "))
        .replace("{{INPUT_VALUES}}", input_values)
        .replace("{{TARGET_VALUES}}", target_values)
        .replace("{{ROUNDS_VALUE}}", rounds_value)
        .replace("{{RESULT_SECTION}}", result_section)
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![Header::from_bytes(b"Content-Type", b"text/html; charset=utf-8").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

fn png_response(bytes: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![Header::from_bytes(b"Content-Type", b"image/png").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

fn json_download_response(body: String, filename: &str) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    let disposition = format!("attachment; filename=\"{}\"", filename);
    Response::new(
        StatusCode(200),
        vec![
            Header::from_bytes(b"Content-Type", b"application/json").unwrap(),
            Header::from_bytes(b"Content-Disposition", disposition.as_bytes()).unwrap(),
        ],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = b"404 Not Found".to_vec();
    let len = body.len();
    Response::new(
        StatusCode(404),
        vec![Header::from_bytes(b"Content-Type", b"text/plain").unwrap()],
        Cursor::new(body),
        Some(len),
        None,
    )
}

/// Sizes the PNG so every layer fits with the renderer's fixed spacing.
fn topology_dimensions(network: &Network) -> (u32, u32) {
    let widest = (0..network.layer_count())
        .filter_map(|l| network.layer_size(l))
        .max()
        .unwrap_or(1) as u32;
    (
        (widest * 45 + 90).max(320),
        network.layer_count() as u32 * 120 + 60,
    )
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let addr = "127.0.0.1:7878";
    let server = Server::http(addr).expect("Failed to bind HTTP server");

    // One mutable network, touched only from this serial loop. Requests are
    // answered one at a time, so training and inference never interleave.
    let mut network = Network::new(1.25, &[2, 2, 1], Activation::Sigmoid, "workbench")
        .expect("default topology is valid");

    println!("╔══════════════════════════════════════════╗");
    println!("║     dendrite-nn · network workbench      ║");
    println!("╠══════════════════════════════════════════╣");
    println!("║  Open in your browser:                   ║");
    println!("║  http://{}                   ║", addr);
    println!("╚══════════════════════════════════════════╝");

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_owned();
        let path = url.split('?').next().unwrap_or("").to_owned();

        let response = match (method, path.as_str()) {
            // ── GET / ──────────────────────────────────────────────────────
            (Method::Get, "/") => html_response(render_page(&network, "", "", "", "100")),

            // ── POST /network ─────────────────────────────────────────────
            (Method::Post, "/network") => {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let result = rebuild_network(&body, &mut network);
                html_response(render_page(&network, &result, "", "", "100"))
            }

            // ── POST /train ───────────────────────────────────────────────
            (Method::Post, "/train") => {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let pairs = parse_form(&body);
                let raw_inputs = form_get(&pairs, "inputs").unwrap_or("").to_owned();
                let raw_targets = form_get(&pairs, "targets").unwrap_or("").to_owned();
                let raw_rounds = form_get(&pairs, "rounds").unwrap_or("").to_owned();

                let result = run_training(&mut network, &raw_inputs, &raw_targets, &raw_rounds);
                html_response(render_page(
                    &network,
                    &result,
                    &raw_inputs,
                    &raw_targets,
                    &raw_rounds,
                ))
            }

            // ── POST /infer ───────────────────────────────────────────────
            (Method::Post, "/infer") => {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let pairs = parse_form(&body);
                let raw_inputs = form_get(&pairs, "inputs").unwrap_or("").to_owned();

                let result = run_inference(&mut network, &raw_inputs);
                html_response(render_page(&network, &result, &raw_inputs, "", "100"))
            }

            // ── GET /topology.png ─────────────────────────────────────────
            (Method::Get, "/topology.png") => {
                let (width, height) = topology_dimensions(&network);
                match render::png_bytes(&network, width, height) {
                    Ok(bytes) => png_response(bytes),
                    Err(_) => not_found(),
                }
            }

            // ── GET /snapshot.json ────────────────────────────────────────
            (Method::Get, "/snapshot.json") => {
                match serde_json::to_string_pretty(&network.snapshot()) {
                    Ok(json) => json_download_response(json, &format!("{}.json", network.name)),
                    Err(_) => not_found(),
                }
            }

            // ── 404 ───────────────────────────────────────────────────────
            _ => not_found(),
        };

        let _ = request.respond(response);
    }
}
