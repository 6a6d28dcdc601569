//! Errors that can occur while running bytecode.
//!
//! Offsets are byte positions in the unit being executed. Inside a function
//! body (local call or loop iteration) they count from the start of that
//! function's own unit.

use kitten_bytecode::{DecodeError, ValueKind, VarId};

use super::host::HostError;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Malformed bytecode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("expected {expected}, found {found} at offset {offset}")]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
        offset: usize,
    },

    #[error("unresolved variable {id} at offset {offset}")]
    UnresolvedVariable { id: VarId, offset: usize },

    #[error("unresolved parameter `{name}` at offset {offset}")]
    UnresolvedParameter { name: String, offset: usize },

    #[error("unresolved host function `{name}` at offset {offset}")]
    UnresolvedHostFunction { name: String, offset: usize },

    /// A host callback returned an error.
    #[error("host function `{name}` failed: {source}")]
    HostFunction {
        name: String,
        #[source]
        source: HostError,
    },

    /// Blocks, expressions and local calls nested too deeply.
    #[error("runtime recursion limit of {0} exceeded")]
    RecursionLimitExceeded(u32),

    /// Too many statements executed.
    #[error("runtime execution limit of {0} exceeded")]
    ExecFuelExhausted(u32),
}

impl RuntimeError {
    /// Byte offset the error points at, when it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Decode(e) => Some(e.offset()),
            Self::TypeMismatch { offset, .. }
            | Self::UnresolvedVariable { offset, .. }
            | Self::UnresolvedParameter { offset, .. }
            | Self::UnresolvedHostFunction { offset, .. } => Some(*offset),
            Self::HostFunction { .. }
            | Self::RecursionLimitExceeded(_)
            | Self::ExecFuelExhausted(_) => None,
        }
    }
}
