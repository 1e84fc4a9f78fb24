//! Disentangling Demo
//!
//! First splits a random state into a product of kept and trash parts, then
//! compresses the trash part with a second circuit.

use anyhow::Result;
use clap::Parser;

use qdr_demos::runners::DisentangleRunner;
use qdr_demos::{
    CommonArgs, create_progress_bar, init_logging, print_header, print_info, print_layers,
    print_result, print_section, print_success,
};

#[derive(Parser, Debug)]
#[command(name = "demo-disentangle")]
#[command(about = "Disentangle a random state, then compress its trash part")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.common.verbose);
    let config = args.common.resolve()?;

    print_header("Disentangling Reduction");

    print_section("Problem Setup");
    print_result("Qubits", config.qubits);
    print_result(
        "Partition",
        format!("{:?} | {:?}", config.kept(), config.trash()),
    );
    print_result("Layer structure", &config.structure);
    print_result("Optimizer", config.optimizer.method);

    print_section("Phases 1 and 2");
    let pb = create_progress_bar(2 * config.max_layers as u64, "Optimizing...");
    let result = DisentangleRunner::new(config).run(&pb)?;
    pb.finish_with_message("Optimization complete");

    print_section("Phase 1: Separable Purity");
    print_layers(&result.disentangle_layers);
    print_section("Phase 2: Trash Compression");
    print_layers(&result.compress_layers);

    print_section("Results");
    print_result("Final fidelity", format!("{:.8}", result.final_fidelity));
    print_result("Purity loss", format!("{:.3e}", result.purity_loss));

    args.common.write_report(&result)?;
    if let Some(path) = &args.common.output {
        print_info(&format!("Report written to {}", path.display()));
    }

    println!();
    print_success("Disentangling demo complete!");
    Ok(())
}
