//! Cost functions of a finished circuit.
//!
//! The optimizer scores circuit outputs one at a time. These take the input
//! and the gate sequence instead, run it, and score the result.

use qdr_ir::Circuit;
use qdr_sim::QuantumState;

use crate::error::{MeasureError, MeasureResult};
use crate::metrics::{fid_ref, sep_purity};

fn run(input: &QuantumState, circuit: &Circuit) -> MeasureResult<QuantumState> {
    let width = circuit.num_qubits() as usize;
    if input.num_qubits() != width {
        return Err(MeasureError::WidthMismatch {
            left: width,
            right: input.num_qubits(),
        });
    }
    Ok(input.apply_circuit(circuit)?)
}

/// Purity test: `Tr(ρ²) − sep_purity(UρU†, partitions)`.
///
/// Zero when the circuit leaves the input a product over the partitions.
/// Without partitions the register is cut in half, the first `⌊N/2⌋`
/// qubits against the rest.
pub fn ptest(
    input: &QuantumState,
    circuit: &Circuit,
    partitions: Option<&[Vec<usize>]>,
) -> MeasureResult<f64> {
    let out = run(input, circuit)?;
    let halves: [Vec<usize>; 2];
    let partitions = match partitions {
        Some(parts) => parts,
        None => {
            let n = out.num_qubits();
            halves = [(0..n / 2).collect(), (n / 2..n).collect()];
            &halves[..]
        }
    };
    Ok(input.purity() - sep_purity(&out, Some(partitions))?)
}

/// Reduction cost: `1 − fid_ref(UρU†, reference, trash)`.
///
/// `reference` acts on `trash.len()` qubits, usually `|0…0⟩`.
pub fn qdr_cost(
    input: &QuantumState,
    reference: &QuantumState,
    circuit: &Circuit,
    trash: &[usize],
) -> MeasureResult<f64> {
    let out = run(input, circuit)?;
    Ok(1.0 - fid_ref(&out, reference, Some(trash))?)
}
