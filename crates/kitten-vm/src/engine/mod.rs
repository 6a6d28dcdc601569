//! Runtime engine for executing compiled Kitten scripts.
//!
//! The VM interprets statements straight from the buffer against an arena of
//! scopes, calling back into the embedder for `Swift.<name>(..)` host calls.

mod error;
mod host;
mod scope;
mod trace;
mod vm;

#[cfg(test)]
mod host_tests;
#[cfg(test)]
mod trace_tests;

pub use error::RuntimeError;
pub use host::{Arguments, Bindings, HostContext, HostError, HostFunctions, Parameters};
pub use trace::{NoopTracer, PrintTracer, ScopeKind, Tracer, Verbosity};
pub use vm::{DEFAULT_RECURSION_LIMIT, FuelLimits, Outcome, VM, VMBuilder};
