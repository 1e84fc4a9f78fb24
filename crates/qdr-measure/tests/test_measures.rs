//! Tests for cost functions against closed forms and each other.

use num_complex::Complex64;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qdr_measure::{MeasureError, c_entropy, dst, fid_ref, fidelity, sep_purity};
use qdr_sim::{DensityMatrix, QuantumState};

fn ket(amps: &[(f64, f64)]) -> QuantumState {
    QuantumState::ket(amps.iter().map(|&(re, im)| Complex64::new(re, im)).collect()).unwrap()
}

// ---------------------------------------------------------------------------
// Closed forms
// ---------------------------------------------------------------------------

#[test]
fn ghz_partitions() {
    let h = 0.5f64.sqrt();
    let mut amps = vec![(0.0, 0.0); 8];
    amps[0] = (h, 0.0);
    amps[7] = (h, 0.0);
    let ghz = ket(&amps);

    let single = vec![vec![0], vec![1], vec![2]];
    assert!((sep_purity(&ghz, Some(&single)).unwrap() - 0.125).abs() < 1e-12);
    let split = vec![vec![0, 1], vec![2]];
    assert!((sep_purity(&ghz, Some(&split)).unwrap() - 0.25).abs() < 1e-12);
}

#[test]
fn fidelity_is_symmetric_for_mixed_states() {
    let rho = DensityMatrix::from_statevector(
        ket(&[(0.6, 0.0), (0.0, 0.8)]).as_ket().as_ref().unwrap(),
    )
    .unwrap();
    let mixed = DensityMatrix::maximally_mixed(1).unwrap();
    let blend = {
        let m = rho.matrix() * Complex64::new(0.7, 0.0) + mixed.matrix() * Complex64::new(0.3, 0.0);
        QuantumState::density(m).unwrap()
    };
    let other = QuantumState::Density(mixed);

    let ab = fidelity(&blend, &other).unwrap();
    let ba = fidelity(&other, &blend).unwrap();
    assert!((ab - ba).abs() < 1e-8);
    assert!(ab > 0.0 && ab <= 1.0 + 1e-10);
}

#[test]
fn fid_ref_on_full_register() {
    let state = ket(&[(0.6, 0.0), (0.8, 0.0)]);
    let reference = QuantumState::zero(1).unwrap();
    assert!((fid_ref(&state, &reference, None).unwrap() - 0.6).abs() < 1e-12);
}

#[test]
fn fid_ref_rejects_wrong_reference() {
    let state = QuantumState::zero(4).unwrap();
    let reference = QuantumState::zero(3).unwrap();
    let result = fid_ref(&state, &reference, Some(&[2, 3]));
    assert!(matches!(result, Err(MeasureError::ReferenceSize { .. })));
}

#[test]
fn c_entropy_density_and_ket_agree() {
    let state = ket(&[(0.5, 0.0), (0.5, 0.0), (0.5, 0.0), (0.0, 0.5)]);
    let rho = QuantumState::Density(state.to_density().unwrap());
    let a = c_entropy(&state, None).unwrap();
    let b = c_entropy(&rho, None).unwrap();
    assert!((a - 2.0).abs() < 1e-12);
    assert!((a - b).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Swap test
// ---------------------------------------------------------------------------

#[test]
fn swap_test_estimates_purity() {
    let mut rng = StdRng::seed_from_u64(42);
    let state = ket(&[(0.6, 0.0), (0.0, 0.0), (0.0, 0.0), (0.8, 0.0)]);
    let exact = sep_purity(&state, None).unwrap();
    let sampled = dst(&state, &state, None, 4000, &mut rng).unwrap();
    assert!((exact - sampled).abs() < 0.1);
}

#[test]
fn swap_test_estimates_partition_purity() {
    let mut rng = StdRng::seed_from_u64(7);
    let h = 0.5f64.sqrt();
    let bell = ket(&[(h, 0.0), (0.0, 0.0), (0.0, 0.0), (h, 0.0)]);
    let parts = vec![vec![0], vec![1]];
    let exact = sep_purity(&bell, Some(&parts)).unwrap();
    let sampled = dst(&bell, &bell, Some(&parts), 6000, &mut rng).unwrap();
    assert!((exact - sampled).abs() < 0.1);
}

#[test]
fn swap_test_on_density_matrices() {
    let mut rng = StdRng::seed_from_u64(9);
    let mixed = QuantumState::Density(DensityMatrix::maximally_mixed(1).unwrap());
    let sampled = dst(&mixed, &mixed, None, 4000, &mut rng).unwrap();
    assert!((sampled - 0.5).abs() < 0.1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn purity_and_fidelity_bounds(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = QuantumState::random_ket(3, &mut rng).unwrap();
        let b = QuantumState::random_ket(3, &mut rng).unwrap();

        let parts = vec![vec![0], vec![1, 2]];
        let p = sep_purity(&a, Some(&parts)).unwrap();
        prop_assert!(p > 0.0 && p <= 1.0 + 1e-10);

        let f = fidelity(&a, &b).unwrap();
        prop_assert!((0.0..=1.0 + 1e-10).contains(&f));
        prop_assert!((fidelity(&a, &a).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn entropy_bounded_by_width(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = QuantumState::random_ket(3, &mut rng).unwrap();
        let full = c_entropy(&state, None).unwrap();
        let part = c_entropy(&state, Some(&[0])).unwrap();
        prop_assert!((0.0..=3.0 + 1e-10).contains(&full));
        prop_assert!((0.0..=1.0 + 1e-10).contains(&part));
    }
}
