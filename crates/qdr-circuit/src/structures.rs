//! Built-in structure functions.
//!
//! | name | gates on N qubits | parameters |
//! |------|-------------------|------------|
//! | `local` | `Rz Ry Rz` on every qubit | 3N |
//! | `regular` | `local`, then CX ring `(j, j+1)`, closed by `(N-1, 0)` for N > 2 | 3N |
//! | `linear` | `local`, then open CX chain `(j, j+1)` | 3N |
//! | `brick_even` | `local`, then CX on `(0,1), (2,3), ...` | 3N |
//! | `brick_odd` | `local`, then CX on `(1,2), (3,4), ...` | 3N |
//! | `crx_even` | CRx on `(0,1), (2,3), ...` | ⌊N/2⌋ |
//! | `crx_odd` | CRx on `(1,2), (3,4), ...` | ⌊(N-1)/2⌋ |
//! | `crx_cross` | CRx on `(j, j + ⌊N/2⌋)` for j < ⌊N/2⌋ | ⌊N/2⌋ |
//!
//! The two `brick_*` layers are the reduced-connectivity variants: each only
//! entangles every other neighbour pair, and alternating them reproduces the
//! chain. On two qubits the `regular` ring degenerates to a single CX, since
//! `(0, 1)` and `(1, 0)` are the same edge.

use qdr_ir::{Circuit, IrResult, QubitId};

use crate::registry::Structure;

/// Every built-in structure.
pub fn builtins() -> Vec<Structure> {
    vec![
        local(),
        regular(),
        linear(),
        brick_even(),
        brick_odd(),
        crx_even(),
        crx_odd(),
        crx_cross(),
    ]
}

pub fn local() -> Structure {
    Structure::new("local", three_per_qubit, build_local)
}

pub fn regular() -> Structure {
    Structure::new("regular", three_per_qubit, build_regular)
}

pub fn linear() -> Structure {
    Structure::new("linear", three_per_qubit, build_linear)
}

pub fn brick_even() -> Structure {
    Structure::new("brick_even", three_per_qubit, build_brick_even)
}

pub fn brick_odd() -> Structure {
    Structure::new("brick_odd", three_per_qubit, build_brick_odd)
}

pub fn crx_even() -> Structure {
    Structure::new("crx_even", even_pairs, build_crx_even)
}

pub fn crx_odd() -> Structure {
    Structure::new("crx_odd", odd_pairs, build_crx_odd)
}

pub fn crx_cross() -> Structure {
    Structure::new("crx_cross", even_pairs, build_crx_cross)
}

// =============================================================================
// Parameter counts
// =============================================================================

fn three_per_qubit(n: u32) -> usize {
    3 * n as usize
}

fn even_pairs(n: u32) -> usize {
    (n / 2) as usize
}

fn odd_pairs(n: u32) -> usize {
    (n.saturating_sub(1) / 2) as usize
}

// =============================================================================
// Builders
// =============================================================================

fn rotation_layer(params: &[f64], n: u32, name: &str) -> IrResult<Circuit> {
    let mut circuit = Circuit::new(name, n);
    for (q, angles) in (0..n).zip(params.chunks_exact(3)) {
        let qubit = QubitId(q);
        circuit
            .rz(angles[0], qubit)?
            .ry(angles[1], qubit)?
            .rz(angles[2], qubit)?;
    }
    Ok(circuit)
}

fn build_local(params: &[f64], n: u32) -> IrResult<Circuit> {
    rotation_layer(params, n, "local")
}

fn build_regular(params: &[f64], n: u32) -> IrResult<Circuit> {
    let mut circuit = rotation_layer(params, n, "regular")?;
    for j in 0..n.saturating_sub(1) {
        circuit.cx(QubitId(j), QubitId(j + 1))?;
    }
    if n > 2 {
        circuit.cx(QubitId(n - 1), QubitId(0))?;
    }
    Ok(circuit)
}

fn build_linear(params: &[f64], n: u32) -> IrResult<Circuit> {
    let mut circuit = rotation_layer(params, n, "linear")?;
    for j in 0..n.saturating_sub(1) {
        circuit.cx(QubitId(j), QubitId(j + 1))?;
    }
    Ok(circuit)
}

fn build_brick_even(params: &[f64], n: u32) -> IrResult<Circuit> {
    let mut circuit = rotation_layer(params, n, "brick_even")?;
    for j in (0..n.saturating_sub(1)).step_by(2) {
        circuit.cx(QubitId(j), QubitId(j + 1))?;
    }
    Ok(circuit)
}

fn build_brick_odd(params: &[f64], n: u32) -> IrResult<Circuit> {
    let mut circuit = rotation_layer(params, n, "brick_odd")?;
    for j in (1..n.saturating_sub(1)).step_by(2) {
        circuit.cx(QubitId(j), QubitId(j + 1))?;
    }
    Ok(circuit)
}

fn build_crx_even(params: &[f64], n: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::new("crx_even", n);
    for (j, &theta) in (0..n / 2).zip(params) {
        circuit.crx(theta, QubitId(2 * j), QubitId(2 * j + 1))?;
    }
    Ok(circuit)
}

fn build_crx_odd(params: &[f64], n: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::new("crx_odd", n);
    for (j, &theta) in (0..n.saturating_sub(1) / 2).zip(params) {
        circuit.crx(theta, QubitId(2 * j + 1), QubitId(2 * j + 2))?;
    }
    Ok(circuit)
}

fn build_crx_cross(params: &[f64], n: u32) -> IrResult<Circuit> {
    let half = n / 2;
    let mut circuit = Circuit::new("crx_cross", n);
    for (j, &theta) in (0..half).zip(params) {
        circuit.crx(theta, QubitId(j), QubitId(j + half))?;
    }
    Ok(circuit)
}
