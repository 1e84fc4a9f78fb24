//! Quantum Dimensionality Reduction Demo
//!
//! Frees up the trailing qubits of a random state by rotating them onto
//! `|0…0⟩` with a layered variational circuit.

use anyhow::Result;
use clap::Parser;

use qdr_demos::runners::ReductionRunner;
use qdr_demos::{
    CommonArgs, create_progress_bar, init_logging, print_header, print_info, print_layers,
    print_result, print_section, print_success, print_warning,
};

#[derive(Parser, Debug)]
#[command(name = "demo-reduce")]
#[command(about = "Reduce a random state by mapping its trash qubits onto |0…0⟩")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.common.verbose);
    let config = args.common.resolve()?;

    print_header("Quantum Dimensionality Reduction");

    print_section("Problem Setup");
    print_result("Qubits", config.qubits);
    print_result("Trash qubits", format!("{:?}", config.trash()));
    print_result("Layer structure", &config.structure);
    print_result("Optimizer", config.optimizer.method);
    print_result("Input seed", config.seed);

    print_section("Growing the Circuit");
    let pb = create_progress_bar(config.max_layers as u64, "Optimizing...");
    let result = ReductionRunner::new(config.clone()).run(&pb)?;
    pb.finish_with_message("Optimization complete");
    print_layers(&result.layers);

    print_section("Results");
    print_result("Layers used", result.layers.len());
    print_result("Parameters", result.parameters.len());
    print_result("Final fidelity", format!("{:.8}", result.final_fidelity));
    print_result("Trash cost", format!("{:.3e}", result.final_cost));

    args.common.write_report(&result)?;
    if let Some(path) = &args.common.output {
        print_info(&format!("Report written to {}", path.display()));
    }

    println!();
    if result.reached(config.threshold) {
        print_success("Reduction complete!");
    } else {
        print_warning("Layer budget exhausted before reaching the target");
    }
    Ok(())
}
