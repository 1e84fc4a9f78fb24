//! Integration tests for variational circuit composition and updates.

use std::sync::Arc;

use num_complex::Complex64;
use qdr_circuit::{
    BlockSelector, BlockSpec, CircuitError, RemovePolicy, StateIssue, StructureRegistry,
    VariationalCircuit, structures,
};
use qdr_ir::{Circuit, IrResult, QubitId, StandardGate};
use qdr_sim::{MAX_DENSE_QUBITS, QuantumState, SimError, StateKind, Statevector, Unitary};

fn ramp(n: usize, scale: f64) -> Vec<f64> {
    (0..n).map(|i| scale * (i as f64 + 1.0)).collect()
}

// ---------------------------------------------------------------------------
// Structure determinism
// ---------------------------------------------------------------------------

#[test]
fn structures_are_deterministic() {
    for s in structures::builtins() {
        let params = ramp(s.param_count(5), 0.21);
        let a = s.build(&params, 5).unwrap();
        let b = s.build(&params, 5).unwrap();
        assert_eq!(a, b, "{}", s.name());
    }
}

// ---------------------------------------------------------------------------
// Parameter bookkeeping
// ---------------------------------------------------------------------------

#[test]
fn flat_and_per_block_updates_agree() {
    let specs = [
        BlockSpec::new("regular"),
        BlockSpec::new("crx_odd"),
        BlockSpec::new("local").with_positions([0, 2]),
    ];
    let mut flat = VariationalCircuit::new(3).unwrap();
    let mut per_block = VariationalCircuit::new(3).unwrap();
    for spec in &specs {
        flat.add_block(spec.clone()).unwrap();
        per_block.add_block(spec.clone()).unwrap();
    }

    let values = ramp(flat.num_parameters(), 0.05);
    flat.update_parameters(&values).unwrap();

    let arrays: Vec<Vec<f64>> = flat
        .parameter_ranges()
        .into_iter()
        .map(|r| values[r].to_vec())
        .collect();
    per_block.update_parameters(&arrays).unwrap();

    for (a, b) in flat.blocks().iter().zip(per_block.blocks()) {
        assert_eq!(a.parameters(), b.parameters());
    }
    assert_eq!(flat.parameters(), values);
}

#[test]
fn short_update_leaves_parameters_unchanged() {
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit
        .add_block(BlockSpec::new("regular").with_parameters(ramp(6, 0.1)))
        .unwrap();
    let before = circuit.parameters();

    let result = circuit.update_parameters(&[1.0; 5]);
    assert!(matches!(
        result,
        Err(CircuitError::ParameterCount {
            expected: 6,
            got: 5
        })
    ));
    assert_eq!(circuit.parameters(), before);
}

#[test]
fn long_update_is_rejected() {
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit.add_block(BlockSpec::new("local")).unwrap();
    let result = circuit.update_parameters(&[0.0; 7]);
    assert!(matches!(result, Err(CircuitError::ParameterCount { .. })));
}

#[test]
fn selected_update_leaves_other_blocks_bit_identical() {
    let mut circuit = VariationalCircuit::new(4).unwrap();
    circuit.add_block(BlockSpec::new("regular")).unwrap();
    circuit.add_block(BlockSpec::new("crx_even")).unwrap();
    circuit.add_block(BlockSpec::new("regular")).unwrap();
    circuit.update_parameters(&ramp(26, 0.013)).unwrap();
    let untouched = circuit.block(1).unwrap().parameters().to_vec();

    // Values are consumed in selector order: block 2 first, then block 0.
    let mut values = vec![9.0; 12];
    values.extend(vec![-9.0; 12]);
    circuit.update_selected(&values, &[2, 0]).unwrap();

    assert_eq!(circuit.block(2).unwrap().parameters(), &[9.0; 12]);
    assert_eq!(circuit.block(0).unwrap().parameters(), &[-9.0; 12]);
    let after = circuit.block(1).unwrap().parameters();
    assert!(
        untouched
            .iter()
            .zip(after)
            .all(|(a, b)| a.to_bits() == b.to_bits())
    );
}

#[test]
fn selected_update_out_of_range() {
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit.add_block(BlockSpec::new("local")).unwrap();
    let result = circuit.update_selected(&[0.0; 6], &[3]);
    assert!(matches!(result, Err(CircuitError::Index { index: 3, len: 1 })));
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[test]
fn placed_block_only_touches_its_positions() {
    let mut circuit = VariationalCircuit::new(4).unwrap();
    circuit
        .add_block(BlockSpec::new("regular").with_positions([2, 3]))
        .unwrap();
    circuit.update_parameters(&ramp(6, 0.3)).unwrap();

    let gates = circuit.gate_sequence().unwrap();
    assert!(!gates.is_empty());
    for inst in gates {
        for q in &inst.qubits {
            assert!(q.0 == 2 || q.0 == 3, "gate {} touched {}", inst.name(), q);
        }
    }
    let cx = gates.iter().find(|i| i.gate == StandardGate::CX).unwrap();
    assert_eq!(cx.qubits, vec![QubitId(2), QubitId(3)]);
}

#[test]
fn permuted_placement_remaps_control_and_target() {
    let mut circuit = VariationalCircuit::new(3).unwrap();
    circuit
        .add_block(BlockSpec::new("crx_even").with_parameters([0.7]).with_positions([2, 0]))
        .unwrap();
    let gates = circuit.gate_sequence().unwrap();
    assert_eq!(gates.len(), 1);
    assert_eq!(gates.instructions()[0].gate, StandardGate::CRx(0.7));
    assert_eq!(gates.instructions()[0].qubits, vec![QubitId(2), QubitId(0)]);
}

// ---------------------------------------------------------------------------
// Compilation cache
// ---------------------------------------------------------------------------

#[test]
fn compile_is_idempotent() {
    let mut circuit = VariationalCircuit::new(3).unwrap();
    circuit.add_block(BlockSpec::new("linear")).unwrap();
    circuit.update_parameters(&ramp(9, 0.17)).unwrap();

    let first = circuit.compile().unwrap().clone();
    assert!(circuit.is_compiled());
    let second = circuit.compile().unwrap();
    assert_eq!(first.circuit(), second.circuit());
    let (a, b) = (first.unitary().unwrap(), second.unitary().unwrap());
    assert!(a.max_distance(b) == 0.0);
}

#[test]
fn update_invalidates_compiled_output() {
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit.add_block(BlockSpec::new("regular")).unwrap();
    let before = circuit.unitary().unwrap().clone();

    circuit.update_parameters(&ramp(6, 0.4)).unwrap();
    assert!(!circuit.is_compiled());
    let after = circuit.unitary().unwrap().clone();
    assert!(before.max_distance(&after) > 1e-3);
}

#[test]
fn block_changes_invalidate_cache() {
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit.add_block(BlockSpec::new("local")).unwrap();
    circuit.compile().unwrap();

    circuit.add_block(BlockSpec::new("regular")).unwrap();
    assert!(!circuit.is_compiled());
    circuit.compile().unwrap();

    circuit.insert_block(0, BlockSpec::new("crx_even")).unwrap();
    assert!(!circuit.is_compiled());
    circuit.compile().unwrap();

    circuit.remove_block(&BlockSelector::Index(0)).unwrap();
    assert!(!circuit.is_compiled());
}

// ---------------------------------------------------------------------------
// End-to-end simulation
// ---------------------------------------------------------------------------

#[test]
fn regular_two_qubits_matches_direct_simulation() {
    let params = [0.3, -1.2, 0.8, 2.1, 0.45, -0.6];
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit
        .add_block(BlockSpec::new("regular").with_parameters(params))
        .unwrap();
    let out = circuit.apply_to(&QuantumState::zero(2).unwrap()).unwrap();

    let mut reference = Circuit::new("reference", 2);
    reference
        .rz(params[0], QubitId(0))
        .unwrap()
        .ry(params[1], QubitId(0))
        .unwrap()
        .rz(params[2], QubitId(0))
        .unwrap()
        .rz(params[3], QubitId(1))
        .unwrap()
        .ry(params[4], QubitId(1))
        .unwrap()
        .rz(params[5], QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap();
    let mut expected = Statevector::new(2).unwrap();
    expected.apply_circuit(&reference).unwrap();

    let got = out.as_ket().unwrap();
    for (a, b) in got.amplitudes().iter().zip(expected.amplitudes()) {
        assert!((a - b).norm() < 1e-10);
    }
}

#[test]
fn compiled_operator_is_unitary() {
    let mut circuit = VariationalCircuit::new(3).unwrap();
    circuit.add_block(BlockSpec::new("regular")).unwrap();
    circuit.add_block(BlockSpec::new("crx_cross")).unwrap();
    circuit.add_block(BlockSpec::new("brick_odd")).unwrap();
    circuit
        .update_parameters(&ramp(circuit.num_parameters(), 0.29))
        .unwrap();
    assert!(circuit.unitary().unwrap().is_unitary(1e-10));
}

#[test]
fn adjoint_undoes_circuit() {
    let mut circuit = VariationalCircuit::new(3).unwrap();
    circuit.add_block(BlockSpec::new("regular")).unwrap();
    circuit
        .add_block(BlockSpec::new("local").with_positions([2, 0]))
        .unwrap();
    circuit.add_block(BlockSpec::new("crx_even")).unwrap();
    circuit
        .update_parameters(&ramp(circuit.num_parameters(), 0.11))
        .unwrap();

    let forward = circuit.unitary().unwrap().clone();
    let backward = Unitary::from_circuit(&circuit.adjoint().unwrap()).unwrap();
    let product = backward.compose(&forward).unwrap();
    assert!(product.max_distance(&Unitary::identity(3).unwrap()) < 1e-10);
}

#[test]
fn density_and_ket_evolve_consistently() {
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit
        .add_block(BlockSpec::new("regular").with_parameters(ramp(6, 0.37)))
        .unwrap();
    let ket = QuantumState::basis(2, 1).unwrap();
    let rho = QuantumState::Density(ket.to_density().unwrap());

    let ket_out = circuit.apply_to(&ket).unwrap().to_density().unwrap();
    let rho_out = circuit.apply_to(&rho).unwrap().to_density().unwrap();
    for (a, b) in ket_out.matrix().iter().zip(rho_out.matrix().iter()) {
        assert!((a - b).norm() < 1e-10);
    }
}

#[test]
fn invalid_state_is_rejected_before_compiling() {
    let mut circuit = VariationalCircuit::new(3).unwrap();
    circuit.add_block(BlockSpec::new("regular")).unwrap();
    let result = circuit.apply_to(&QuantumState::zero(2).unwrap());
    assert!(matches!(
        result,
        Err(CircuitError::InvalidState {
            kind: StateKind::Ket,
            issue: StateIssue::Width {
                expected: 3,
                got: 2
            }
        })
    ));
    assert!(!circuit.is_compiled());
}

#[test]
fn non_finite_state_is_an_invalid_state() {
    // Finite factors whose product overflows.
    let big = QuantumState::ket(vec![Complex64::new(1e200, 0.0), Complex64::new(0.0, 0.0)])
        .unwrap();
    let overflowed = big.tensor(&big).unwrap();

    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit.add_block(BlockSpec::new("regular")).unwrap();
    assert!(matches!(
        circuit.apply_to(&overflowed),
        Err(CircuitError::InvalidState {
            kind: StateKind::Ket,
            issue: StateIssue::NonFinite
        })
    ));
    assert!(matches!(
        circuit.check_state(&overflowed),
        Err(CircuitError::InvalidState { .. })
    ));
    assert!(!circuit.is_compiled());
}

#[test]
fn wide_ket_runs_without_dense_operator() {
    let width = MAX_DENSE_QUBITS as u32 + 1;
    let mut circuit = VariationalCircuit::new(width).unwrap();
    let flip: Vec<f64> = (0..width).flat_map(|_| [0.0, std::f64::consts::PI, 0.0]).collect();
    circuit
        .add_block(BlockSpec::new("local").with_parameters(flip))
        .unwrap();

    let out = circuit
        .apply_to(&QuantumState::zero(width as usize).unwrap())
        .unwrap();
    let probs = out.probabilities();
    assert!((probs[probs.len() - 1] - 1.0).abs() < 1e-10);

    assert!(circuit.compile().unwrap().unitary().is_none());
    assert!(matches!(
        circuit.unitary(),
        Err(CircuitError::Sim(SimError::TooManyQubits { .. }))
    ));
}

#[test]
fn apply_to_does_not_record() {
    let mut circuit = VariationalCircuit::new(1).unwrap();
    circuit.add_block(BlockSpec::new("local")).unwrap();
    circuit.apply_to(&QuantumState::zero(1).unwrap()).unwrap();
    assert!(circuit.input_state().is_none());
    assert!(circuit.output_state().is_none());
}

#[test]
fn recording_shares_the_input() {
    let mut circuit = VariationalCircuit::new(1).unwrap();
    circuit
        .add_block(BlockSpec::new("local").with_parameters([0.0, std::f64::consts::PI, 0.0]))
        .unwrap();
    let input = Arc::new(QuantumState::zero(1).unwrap());
    let output = circuit.apply_recording(Arc::clone(&input)).unwrap();

    assert!(Arc::ptr_eq(circuit.input_state().unwrap(), &input));
    assert!(Arc::ptr_eq(circuit.output_state().unwrap(), &output));
    assert!((output.probabilities()[1] - 1.0).abs() < 1e-10);
}

#[test]
fn apply_to_input_uses_stored_state() {
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit.add_block(BlockSpec::new("regular")).unwrap();
    circuit
        .add_input(Arc::new(QuantumState::basis(2, 2).unwrap()))
        .unwrap();
    let out = circuit.apply_to_input().unwrap();
    // Zero angles: only the CX acts, |10⟩ → |11⟩.
    assert!((out.probabilities()[3] - 1.0).abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// Block removal
// ---------------------------------------------------------------------------

fn mixed_circuit() -> VariationalCircuit {
    let mut circuit = VariationalCircuit::new(2).unwrap();
    for (name, value) in [("regular", 1.0), ("local", 2.0), ("regular", 3.0), ("regular", 4.0)] {
        circuit
            .add_block(BlockSpec::new(name).with_parameters([value; 6]))
            .unwrap();
    }
    circuit
}

fn first_parameters(circuit: &VariationalCircuit) -> Vec<f64> {
    circuit.blocks().iter().map(|b| b.parameters()[0]).collect()
}

#[test]
fn remove_first_match() {
    let mut circuit = mixed_circuit();
    let removed = circuit
        .remove_block(&BlockSelector::structure("regular", RemovePolicy::First))
        .unwrap();
    assert_eq!(removed[0].parameters()[0], 1.0);
    assert_eq!(first_parameters(&circuit), vec![2.0, 3.0, 4.0]);
}

#[test]
fn remove_last_match() {
    let mut circuit = mixed_circuit();
    circuit
        .remove_block(&BlockSelector::structure("regular", RemovePolicy::Last))
        .unwrap();
    assert_eq!(first_parameters(&circuit), vec![1.0, 2.0, 3.0]);
}

#[test]
fn remove_all_matches() {
    let mut circuit = mixed_circuit();
    let removed = circuit
        .remove_block(&BlockSelector::structure("regular", RemovePolicy::All))
        .unwrap();
    let removed: Vec<f64> = removed.iter().map(|b| b.parameters()[0]).collect();
    assert_eq!(removed, vec![1.0, 3.0, 4.0]);
    assert_eq!(first_parameters(&circuit), vec![2.0]);
}

#[test]
fn remove_range() {
    let mut circuit = mixed_circuit();
    circuit.remove_block(&BlockSelector::Range(1..3)).unwrap();
    assert_eq!(first_parameters(&circuit), vec![1.0, 4.0]);

    let result = circuit.remove_block(&BlockSelector::Range(1..5));
    assert!(matches!(result, Err(CircuitError::Index { index: 5, len: 2 })));
}

#[test]
fn remove_index_out_of_range() {
    let mut circuit = mixed_circuit();
    let result = circuit.remove_block(&BlockSelector::Index(4));
    assert!(matches!(result, Err(CircuitError::Index { index: 4, len: 4 })));
    assert_eq!(circuit.num_blocks(), 4);
}

// ---------------------------------------------------------------------------
// Custom registries
// ---------------------------------------------------------------------------

fn hadamard_wall(_params: &[f64], n: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::new("hadamard_wall", n);
    for q in 0..n {
        circuit.h(QubitId(q))?;
    }
    Ok(circuit)
}

#[test]
fn custom_structure_in_circuit() {
    let mut registry = StructureRegistry::with_builtins();
    registry.register(qdr_circuit::Structure::new("hadamard_wall", |_| 0, hadamard_wall));

    let mut circuit = VariationalCircuit::new(2)
        .unwrap()
        .with_registry(Arc::new(registry));
    circuit.add_block(BlockSpec::new("hadamard_wall")).unwrap();
    assert_eq!(circuit.num_parameters(), 0);

    let out = circuit.apply_to(&QuantumState::zero(2).unwrap()).unwrap();
    for p in out.probabilities() {
        assert!((p - 0.25).abs() < 1e-12);
    }
}
