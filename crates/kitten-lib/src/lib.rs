//! Kitten: an embeddable scripting language compiled to compact bytecode.
//!
//! # Example
//!
//! ```
//! use kitten_lib::{Bindings, HostFunctions, Parameters, Script, Template, Value};
//!
//! let script = Script::compile("if true { return Parameters.answer }").unwrap();
//! let mut params = Parameters::new();
//! params.insert("answer".into(), Value::Double(42.0));
//! let value = script
//!     .run(&params, Bindings::new(), &HostFunctions::new())
//!     .unwrap();
//! assert_eq!(value, Some(Value::Double(42.0)));
//!
//! let template = Template::compile("Hello, {{> Parameters.name <}}!").unwrap();
//! let mut params = Parameters::new();
//! params.insert("name".into(), Value::from("World"));
//! let text = template.render(&params, &HostFunctions::new()).unwrap();
//! assert_eq!(text, "Hello, World!");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod script;
pub mod template;


use std::path::PathBuf;

pub use kitten_bytecode::{DecodeError, Function, Value, ValueKind, VarId};
pub use kitten_compiler::{CompileError, Compiler};
pub use kitten_core::Colors;
pub use kitten_vm::{
    Arguments, Bindings, FuelLimits, HostContext, HostError, HostFunctions, NoopTracer, Outcome,
    Parameters, PrintTracer, RuntimeError, Tracer, VM, Verbosity,
};
pub use script::Script;
pub use template::{Template, TemplateConfig, TemplateError};

/// Errors from compiling, loading or running scripts and templates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Bytecode loaded from outside failed validation.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for script operations.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn read_source(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
