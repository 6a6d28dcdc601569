//! Runtime VM for executing compiled Kitten bytecode.
//!
//! The VM walks the bytecode buffer directly: each statement is decoded and
//! interpreted in place, with no intermediate tree.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

pub use engine::{
    Arguments, Bindings, DEFAULT_RECURSION_LIMIT, FuelLimits, HostContext, HostError,
    HostFunctions, NoopTracer, Outcome, Parameters, PrintTracer, RuntimeError, ScopeKind, Tracer,
    VM, VMBuilder, Verbosity,
};
pub use kitten_bytecode::{Value, ValueKind, VarId};

/// Run a compiled unit with default limits, returning the value of the first
/// `return` reached (if any).
pub fn run(
    bytecode: &[u8],
    parameters: &Parameters,
    bindings: Bindings,
    host: &HostFunctions,
) -> Result<Option<Value>, RuntimeError> {
    VM::builder()
        .build()
        .execute(bytecode, parameters, bindings, host)
        .map(|outcome| outcome.value)
}
