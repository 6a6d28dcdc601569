//! Compiled scripts.

use std::path::Path;

use kitten_bytecode::{Value, validate_unit};
use kitten_core::Colors;
use kitten_vm::{Bindings, HostFunctions, Outcome, Parameters, Tracer, VM};

use crate::{Result, read_source};

/// A validated bytecode unit, ready to run any number of times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    bytecode: Vec<u8>,
}

impl Script {
    pub fn compile(source: &str) -> Result<Self> {
        let bytecode = kitten_compiler::compile(source)?;
        Ok(Self { bytecode })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = read_source(path.as_ref())?;
        Self::compile(&source)
    }

    /// Wrap previously compiled bytecode. Only the unit framing is checked
    /// here; instruction-level problems surface when the script runs.
    pub fn from_bytes(bytecode: Vec<u8>) -> Result<Self> {
        validate_unit(&bytecode)?;
        Ok(Self { bytecode })
    }

    /// Wrap bytecode the compiler just produced.
    pub(crate) fn from_validated(bytecode: Vec<u8>) -> Self {
        Self { bytecode }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytecode
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytecode
    }

    /// Human-readable disassembly.
    pub fn dump(&self, colors: Colors) -> Result<String> {
        Ok(kitten_bytecode::dump(&self.bytecode, colors)?)
    }

    /// Run with default limits and return the value of the first `return` reached.
    pub fn run(
        &self,
        parameters: &Parameters,
        bindings: Bindings,
        host: &HostFunctions,
    ) -> Result<Option<Value>> {
        let outcome = self.run_with(VM::builder().build(), parameters, bindings, host)?;
        Ok(outcome.value)
    }

    /// Run on a configured VM, keeping the host output.
    pub fn run_with(
        &self,
        vm: VM,
        parameters: &Parameters,
        bindings: Bindings,
        host: &HostFunctions,
    ) -> Result<Outcome> {
        Ok(vm.execute(&self.bytecode, parameters, bindings, host)?)
    }

    pub fn trace<T: Tracer>(
        &self,
        vm: VM,
        parameters: &Parameters,
        bindings: Bindings,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Outcome> {
        Ok(vm.execute_with(&self.bytecode, parameters, bindings, host, tracer)?)
    }
}
