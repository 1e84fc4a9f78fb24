//! End-to-end tests: circuits, measurement functions and minimizers together.

use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;
use qdr_circuit::{BlockSpec, CircuitError, VariationalCircuit};
use qdr_measure::{c_entropy, fid_ref, sep_purity};
use qdr_opt::{
    Bounds, Method, NelderMead, OptError, Optimizer, OptimizerConfig, Powell, Spsa,
    VariationalProblem, circ_maximize, circ_minimize,
};
use qdr_sim::QuantumState;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn product_input(seed: u64) -> QuantumState {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = QuantumState::random_ket(1, &mut rng).unwrap();
    let b = QuantumState::random_ket(1, &mut rng).unwrap();
    a.tensor(&b).unwrap()
}

// -----------------------------------------------------------------------------
// Reduction
// -----------------------------------------------------------------------------

#[test]
fn test_reduction_of_product_inputs() {
    let zero = QuantumState::zero(1).unwrap();
    for seed in [1, 2, 3] {
        let input = product_input(seed);
        let mut circuit = VariationalCircuit::new(2).unwrap();
        let mut best = 0.0;

        // Grow regular layers until qubit 1 is mapped onto |0⟩.
        for _ in 0..4 {
            circuit.add_block(BlockSpec::new("regular")).unwrap();
            let x0 = circuit.parameters();
            let optimum = circ_maximize(
                &mut circuit,
                &input,
                |s: &QuantumState| fid_ref(s, &zero, Some(&[1])),
                &Powell::new(),
                x0,
            )
            .unwrap();
            best = optimum.value;
            if 1.0 - best < 1e-5 {
                break;
            }
        }

        assert!(best > 1.0 - 1e-5, "seed {seed}: {best}");
        let out = circuit.apply_to(&input).unwrap();
        let fid = fid_ref(&out, &zero, Some(&[1])).unwrap();
        assert!((fid - best).abs() < 1e-10);
    }
}

#[test]
fn test_disentangling_a_bell_pair_is_impossible_with_local_gates() {
    let h = FRAC_1_SQRT_2;
    let bell = QuantumState::ket(vec![
        Complex64::new(h, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(h, 0.0),
    ])
    .unwrap();
    let parts = vec![vec![0], vec![1]];

    let mut local = VariationalCircuit::new(2).unwrap();
    local.add_block(BlockSpec::new("local")).unwrap();
    let x0 = vec![0.3; local.num_parameters()];
    let optimum = circ_maximize(
        &mut local,
        &bell,
        |s: &QuantumState| sep_purity(s, Some(&parts)),
        &Powell::new().with_maxiter(20),
        x0,
    )
    .unwrap();
    assert!((optimum.value - 0.25).abs() < 1e-8);

    let mut entangling = VariationalCircuit::new(2).unwrap();
    entangling.add_block(BlockSpec::new("regular")).unwrap();
    let x0 = vec![0.3; entangling.num_parameters()];
    let optimum = circ_maximize(
        &mut entangling,
        &bell,
        |s: &QuantumState| sep_purity(s, Some(&parts)),
        &Powell::new(),
        x0,
    )
    .unwrap();
    assert!(optimum.value > 1.0 - 1e-5);
}

#[test]
fn test_entropy_minimization_reaches_a_basis_state() {
    let input = product_input(11);
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit.add_block(BlockSpec::new("local")).unwrap();
    let x0 = vec![0.0; circuit.num_parameters()];
    let optimum = circ_minimize(
        &mut circuit,
        &input,
        |s: &QuantumState| c_entropy(s, None),
        &OptimizerConfig::default(),
        x0,
    )
    .unwrap();
    assert!(optimum.value < 1e-3);
}

// -----------------------------------------------------------------------------
// Block selection
// -----------------------------------------------------------------------------

#[test]
fn test_selected_blocks_only() {
    let input = product_input(5);
    let zero = QuantumState::zero(1).unwrap();
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit
        .add_block(BlockSpec::new("local").with_parameters(vec![0.4; 6]))
        .unwrap();
    circuit.add_block(BlockSpec::new("regular")).unwrap();
    let frozen: Vec<u64> = circuit.blocks()[0]
        .parameters()
        .iter()
        .map(|v| v.to_bits())
        .collect();

    let problem = VariationalProblem::new(&mut circuit, &input, |s: &QuantumState| {
        fid_ref(s, &zero, Some(&[1]))
    })
    .with_blocks(vec![1]);
    assert_eq!(problem.num_parameters().unwrap(), 6);
    let optimum = problem.maximize(&Powell::new(), vec![0.0; 6]).unwrap();

    assert!(optimum.value > 1.0 - 1e-5);
    let after: Vec<u64> = circuit.blocks()[0]
        .parameters()
        .iter()
        .map(|v| v.to_bits())
        .collect();
    assert_eq!(frozen, after);
    assert_eq!(circuit.blocks()[1].parameters(), optimum.parameters.as_slice());
}

#[test]
fn test_bad_selector_rejected_before_running() {
    let input = QuantumState::zero(2).unwrap();
    let mut circuit = VariationalCircuit::new(2).unwrap();
    circuit.add_block(BlockSpec::new("local")).unwrap();

    let problem = VariationalProblem::new(&mut circuit, &input, |s: &QuantumState| {
        sep_purity(s, None)
    })
    .with_blocks(vec![0, 0]);
    assert!(matches!(
        problem.maximize(&Powell::new(), vec![0.0; 12]),
        Err(OptError::Circuit(CircuitError::DuplicateSelector(0)))
    ));

    let problem = VariationalProblem::new(&mut circuit, &input, |s: &QuantumState| {
        sep_purity(s, None)
    })
    .with_blocks(vec![3]);
    assert!(matches!(
        problem.maximize(&Powell::new(), vec![]),
        Err(OptError::Circuit(CircuitError::Index { index: 3, len: 1 }))
    ));
}

// -----------------------------------------------------------------------------
// Minimizers
// -----------------------------------------------------------------------------

fn bowl(p: &[f64]) -> f64 {
    p.iter()
        .enumerate()
        .map(|(i, v)| (i as f64 + 1.0) * (v - 0.1 * i as f64).powi(2))
        .sum()
}

#[test]
fn test_minimizers_on_bowl() {
    let x0 = vec![0.5, -0.5, 0.25];
    let nm = NelderMead::new().with_maxiter(2000).minimize(bowl, x0.clone());
    let powell = Powell::new().minimize(bowl, x0.clone());
    let spsa = Spsa::new().with_maxiter(1000).minimize(bowl, x0);
    assert!(nm.optimal_value < 1e-6, "nelder-mead: {}", nm.optimal_value);
    assert!(powell.optimal_value < 1e-10, "powell: {}", powell.optimal_value);
    assert!(spsa.optimal_value < 1e-2, "spsa: {}", spsa.optimal_value);
}

#[test]
fn test_method_dispatch_matches_direct_call() {
    let config = OptimizerConfig::new(Method::Powell).with_maxiter(50);
    let via_method = Method::Powell.minimize(bowl, vec![1.0, 1.0], &config);
    let via_config = config.minimize(bowl, vec![1.0, 1.0]);
    let direct = Powell::new().with_maxiter(50).minimize(bowl, vec![1.0, 1.0]);
    assert_eq!(via_method, via_config);
    assert_eq!(via_config, direct);
}

#[test]
fn test_config_bounds_apply() {
    let config = OptimizerConfig::new(Method::NelderMead).with_bounds(Bounds::new(0.3, 1.0));
    let result = config.minimize(bowl, vec![0.5, 0.5]);
    assert!(result.optimal_params.iter().all(|v| (0.3..=1.0).contains(v)));
}

// -----------------------------------------------------------------------------
// Configuration files
// -----------------------------------------------------------------------------

#[test]
fn test_config_from_yaml() {
    let yaml = "method: nelder-mead\nmaxiter: 200\nbounds:\n  lower: -3.2\n  upper: 3.2\n";
    let config: OptimizerConfig = serde_yaml_ng::from_str(yaml).unwrap();
    assert_eq!(config.method, Method::NelderMead);
    assert_eq!(config.maxiter, 200);
    assert_eq!(config.tol, 1e-8);
    assert_eq!(config.bounds, Some(Bounds::new(-3.2, 3.2)));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_json_round_trip() {
    let config = OptimizerConfig::new(Method::Spsa).with_seed(7).with_step(0.05);
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"spsa\""));
    assert!(!json.contains("bounds"));
    let back: OptimizerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_empty_config_uses_defaults() {
    let config: OptimizerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, OptimizerConfig::default());
    assert_eq!(config.method, Method::Powell);
}

#[test]
fn test_unknown_method_in_yaml() {
    let result: Result<OptimizerConfig, _> = serde_yaml_ng::from_str("method: cobyla\n");
    assert!(result.is_err());
}
