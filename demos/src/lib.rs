//! QDR Demo Suite
//!
//! Three ways of reducing the dimension of a random multi-qubit state with a
//! variational circuit, each growing the circuit one layer at a time until
//! the target is reached:
//!
//! - **Reduction**: drive the trash qubits straight to `|0…0⟩`
//! - **Disentangling**: first make kept and trash qubits a product state,
//!   then compress the trash part with a second, smaller circuit
//! - **Classical memory**: minimise the computational-basis entropy of the
//!   trash qubits so a classical register can stand in for them
//!
//! Every scenario returns a serialisable report; the `demo-*` binaries print
//! it and optionally write it as JSON.

pub mod config;
pub mod runners;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

pub use config::{CommonArgs, DemoConfig};

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .map(|s| s.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Install the log subscriber: `-v` info, `-vv` debug, `-vvv` trace.
///
/// Without `-v`, `RUST_LOG` decides and falls back to warnings only.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // Fails only if a subscriber is already installed.
    let _ =tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print one line per layer count tried.
pub fn print_layers(layers: &[runners::LayerReport]) {
    for layer in layers {
        println!(
            "  L={:<2} value={:.8}  iterations={:<4} evaluations={:<6} {:.2?}",
            layer.layers,
            layer.value,
            layer.iterations,
            layer.evaluations,
            std::time::Duration::from_secs_f64(layer.seconds),
        );
    }
}
