//! Complete Demo Suite
//!
//! Runs the three reduction scenarios on the same input.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use qdr_demos::runners::{
    DisentangleResult, DisentangleRunner, EntropyResult, EntropyRunner, ReductionResult,
    ReductionRunner,
};
use qdr_demos::{
    CommonArgs, create_progress_bar, init_logging, print_header, print_layers, print_result,
    print_section, print_success,
};

#[derive(Parser, Debug)]
#[command(name = "demo-all")]
#[command(about = "Run every reduction scenario")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Skip the disentangling scenario
    #[arg(long)]
    skip_disentangle: bool,
}

#[derive(Serialize)]
struct Report {
    reduction: ReductionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    disentangle: Option<DisentangleResult>,
    entropy: EntropyResult,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.common.verbose);
    let config = args.common.resolve()?;
    let input = config.input_state()?;
    let start = Instant::now();

    print_header("QDR Complete Demo Suite");
    print_result("Qubits", config.qubits);
    print_result("Trash qubits", format!("{:?}", config.trash()));
    print_result("Optimizer", config.optimizer.method);

    // =========================================================================
    // Part 1: Direct reduction
    // =========================================================================
    print_section("Part 1: Direct Reduction");
    let pb = create_progress_bar(config.max_layers as u64, "Reducing...");
    let reduction = ReductionRunner::new(config.clone()).run_on(&input, &pb)?;
    pb.finish_and_clear();
    print_layers(&reduction.layers);
    print_result("Final fidelity", format!("{:.8}", reduction.final_fidelity));
    print_result("Trash cost", format!("{:.3e}", reduction.final_cost));

    // =========================================================================
    // Part 2: Disentangling
    // =========================================================================
    let disentangle = if args.skip_disentangle {
        None
    } else {
        print_section("Part 2: Disentangling");
        let pb = create_progress_bar(2 * config.max_layers as u64, "Disentangling...");
        let result = DisentangleRunner::new(config.clone()).run_on(&input, &pb)?;
        pb.finish_and_clear();
        print_layers(&result.disentangle_layers);
        print_layers(&result.compress_layers);
        print_result("Final fidelity", format!("{:.8}", result.final_fidelity));
        print_result("Purity loss", format!("{:.3e}", result.purity_loss));
        Some(result)
    };

    // =========================================================================
    // Part 3: Classical memory
    // =========================================================================
    print_section("Part 3: Classical Memory");
    let pb = create_progress_bar(config.max_layers as u64, "Minimising entropy...");
    let entropy = EntropyRunner::new(config).run_on(&input, &pb)?;
    pb.finish_and_clear();
    print_layers(&entropy.layers);
    print_result("Final fidelity", format!("{:.8}", entropy.final_fidelity));

    args.common.write_report(&Report {
        reduction,
        disentangle,
        entropy,
    })?;

    println!();
    print_result("Total time", format!("{:.2?}", start.elapsed()));
    print_success("All demos complete!");
    Ok(())
}
