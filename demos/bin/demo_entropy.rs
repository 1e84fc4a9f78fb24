//! Classical Memory Demo
//!
//! Minimises the basis entropy of the trash qubits so their content can be
//! stored as a classical bit string.

use anyhow::Result;
use clap::Parser;

use qdr_demos::runners::EntropyRunner;
use qdr_demos::{
    CommonArgs, create_progress_bar, init_logging, print_header, print_info, print_layers,
    print_result, print_section, print_success,
};

#[derive(Parser, Debug)]
#[command(name = "demo-entropy")]
#[command(about = "Reduce a random state with an arbitrary classical memory")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.common.verbose);
    let config = args.common.resolve()?;

    print_header("Reduction with Classical Memory");

    print_section("Problem Setup");
    print_result("Qubits", config.qubits);
    print_result("Memory qubits", format!("{:?}", config.trash()));
    print_result("Optimizer", config.optimizer.method);

    print_section("Growing the Circuit");
    let pb = create_progress_bar(config.max_layers as u64, "Optimizing...");
    let reduced = config.reduced;
    let result = EntropyRunner::new(config).run(&pb)?;
    pb.finish_with_message("Optimization complete");
    print_layers(&result.layers);

    print_section("Classical Memory");
    for (state, p) in result.memory_distribution.iter().enumerate() {
        println!("  |{state:0reduced$b}⟩  {p:.6}");
    }
    print_result(
        "Memory state",
        format!("|{:0reduced$b}⟩", result.memory_state),
    );

    print_section("Results");
    print_result("Final fidelity", format!("{:.8}", result.final_fidelity));

    args.common.write_report(&result)?;
    if let Some(path) = &args.common.output {
        print_info(&format!("Report written to {}", path.display()));
    }

    println!();
    print_success("Classical memory demo complete!");
    Ok(())
}
