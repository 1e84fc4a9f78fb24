//! Structure registry: named, pure generators of parameterized gate layers.
//!
//! A [`Structure`] pairs a parameter-count rule with a build function. Both
//! are plain function pointers, so a structure carries no state and building
//! it twice with the same inputs gives the same gates.
//!
//! The process-wide [`builtin_registry`] is created on first use and never
//! changes afterwards. Custom registries start from
//! [`StructureRegistry::with_builtins`], add their own structures, and are
//! then handed to circuits behind an `Arc`.

use std::fmt;
use std::sync::{Arc, LazyLock};

use qdr_ir::{Circuit, IrError, IrResult};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{CircuitError, CircuitResult};
use crate::structures;

/// Parameter count for a given block width.
pub type ParamCountFn = fn(u32) -> usize;

/// Gate sequence (in local indices) for a parameter slice and block width.
///
/// Only called with a slice whose length equals the structure's declared
/// count for that width.
pub type BuildFn = fn(&[f64], u32) -> IrResult<Circuit>;

/// A named structure function.
#[derive(Clone)]
pub struct Structure {
    name: String,
    param_count: ParamCountFn,
    build: BuildFn,
}

impl Structure {
    /// Create a structure from its two rules.
    pub fn new(name: impl Into<String>, param_count: ParamCountFn, build: BuildFn) -> Self {
        Self {
            name: name.into(),
            param_count,
            build,
        }
    }

    /// Get the structure name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters required on `num_qubits` qubits.
    pub fn param_count(&self, num_qubits: u32) -> usize {
        (self.param_count)(num_qubits)
    }

    /// Check a parameter slice against the declared count.
    pub fn check_shape(&self, parameters: &[f64], num_qubits: u32) -> CircuitResult<()> {
        let expected = self.param_count(num_qubits);
        if parameters.len() != expected {
            return Err(CircuitError::Shape {
                structure: self.name.clone(),
                num_qubits,
                expected,
                got: parameters.len(),
            });
        }
        Ok(())
    }

    /// Build the gate sequence in local qubit indices.
    pub fn build(&self, parameters: &[f64], num_qubits: u32) -> CircuitResult<Circuit> {
        if num_qubits == 0 {
            return Err(CircuitError::ZeroQubits);
        }
        self.check_shape(parameters, num_qubits)?;
        let circuit = (self.build)(parameters, num_qubits)?;
        if circuit.num_qubits() != num_qubits {
            return Err(IrError::WidthMismatch {
                expected: num_qubits,
                got: circuit.num_qubits(),
            }
            .into());
        }
        Ok(circuit)
    }
}

impl fmt::Debug for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Structure").field("name", &self.name).finish()
    }
}

/// Name → structure lookup.
#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    structures: FxHashMap<String, Structure>,
}

static BUILTINS: LazyLock<Arc<StructureRegistry>> =
    LazyLock::new(|| Arc::new(StructureRegistry::with_builtins()));

/// The shared registry of built-in structures.
pub fn builtin_registry() -> Arc<StructureRegistry> {
    Arc::clone(&BUILTINS)
}

impl StructureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in structure.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for structure in structures::builtins() {
            registry.register(structure);
        }
        registry
    }

    /// Register a structure, replacing any previous one with the same name.
    pub fn register(&mut self, structure: Structure) {
        debug!("Registering structure: {}", structure.name());
        self.structures.insert(structure.name.clone(), structure);
    }

    /// Look up a structure by name.
    pub fn get(&self, name: &str) -> CircuitResult<&Structure> {
        self.structures
            .get(name)
            .ok_or_else(|| CircuitError::UnknownStructure(name.to_string()))
    }

    /// Check if a structure is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.structures.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.structures.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}
