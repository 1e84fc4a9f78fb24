//! Property-based tests for parameter slicing and block placement.

use proptest::prelude::*;
use qdr_circuit::{BlockSpec, VariationalCircuit};

const STRUCTURES: [&str; 8] = [
    "local",
    "regular",
    "linear",
    "brick_even",
    "brick_odd",
    "crx_even",
    "crx_odd",
    "crx_cross",
];

/// A circuit width, block structures and a permutation-based placement per block.
fn arb_layout() -> impl Strategy<Value = (u32, Vec<(usize, Vec<u32>)>)> {
    (2u32..5).prop_flat_map(|n| {
        let block = (
            0..STRUCTURES.len(),
            Just((0..n).collect::<Vec<u32>>()).prop_shuffle(),
            1..=n,
        )
            .prop_map(|(s, perm, width)| (s, perm[..width as usize].to_vec()));
        (Just(n), prop::collection::vec(block, 1..5))
    })
}

fn build(n: u32, layout: &[(usize, Vec<u32>)]) -> VariationalCircuit {
    let mut circuit = VariationalCircuit::new(n).unwrap();
    for (s, positions) in layout {
        circuit
            .add_block(BlockSpec::new(STRUCTURES[*s]).with_positions(positions.clone()))
            .unwrap();
    }
    circuit
}

proptest! {
    #[test]
    fn flat_round_trip((n, layout) in arb_layout(), seed in 0.0f64..1.0) {
        let mut circuit = build(n, &layout);
        let values: Vec<f64> = (0..circuit.num_parameters())
            .map(|i| seed + 0.01 * i as f64)
            .collect();
        circuit.update_parameters(&values).unwrap();
        prop_assert_eq!(circuit.parameters(), values);
    }

    #[test]
    fn per_block_matches_flat((n, layout) in arb_layout()) {
        let mut flat = build(n, &layout);
        let mut per_block = build(n, &layout);
        let values: Vec<f64> = (0..flat.num_parameters()).map(|i| -0.5 + 0.03 * i as f64).collect();
        flat.update_parameters(&values).unwrap();

        let arrays: Vec<Vec<f64>> = flat
            .parameter_ranges()
            .into_iter()
            .map(|r| values[r].to_vec())
            .collect();
        per_block.update_parameters(&arrays).unwrap();
        prop_assert_eq!(flat.parameters(), per_block.parameters());
    }

    #[test]
    fn gates_stay_inside_positions((n, layout) in arb_layout()) {
        let mut circuit = build(n, &layout);
        let values = vec![0.25; circuit.num_parameters()];
        circuit.update_parameters(&values).unwrap();

        let mut concatenated = Vec::new();
        for ((_, positions), block) in layout.iter().zip(circuit.blocks()) {
            let placed = block.clone().placed().unwrap();
            for inst in &placed {
                for q in &inst.qubits {
                    prop_assert!(positions.contains(&q.0));
                }
            }
            concatenated.extend(placed);
        }
        let gates = circuit.gate_sequence().unwrap();
        prop_assert_eq!(gates.instructions(), concatenated.as_slice());
    }

    #[test]
    fn ranges_cover_flat_vector((n, layout) in arb_layout()) {
        let circuit = build(n, &layout);
        let ranges = circuit.parameter_ranges();
        let mut next = 0;
        for (range, block) in ranges.iter().zip(circuit.blocks()) {
            prop_assert_eq!(range.start, next);
            prop_assert_eq!(range.len(), block.num_parameters());
            next = range.end;
        }
        prop_assert_eq!(next, circuit.num_parameters());
    }
}
