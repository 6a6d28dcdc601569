//! Kitten compiler: DSL source to bytecode.
//!
//! - `scanner` - byte cursor, whitespace and word rules
//! - `symbols` - block-scoped identifier table
//! - `compiler` - single-pass recursive-descent encoder
//! - `diagnostics` - annotated error rendering

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod compiler;
mod diagnostics;
mod error;
mod scanner;
mod symbols;

#[cfg(test)]
mod compiler_tests;
#[cfg(test)]
mod diagnostics_tests;
#[cfg(test)]
mod scanner_tests;
#[cfg(test)]
mod symbols_tests;
#[cfg(test)]
pub mod test_utils;

use std::path::Path;

pub use compiler::{Compiler, HOST_SCOPE, NESTING_LIMIT, PARAMETER_SCOPE};
pub use diagnostics::ErrorPrinter;
pub use error::CompileError;
pub use scanner::KEYWORDS;

/// Compile a complete script.
pub fn compile(source: &str) -> Result<Vec<u8>, CompileError> {
    Compiler::new().compile(source)
}

/// Read a script from disk and compile it.
pub fn compile_file(path: impl AsRef<Path>) -> Result<Vec<u8>, CompileError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile(&source)
}
