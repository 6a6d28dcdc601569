#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Bytecode format and runtime values for Kitten.
//!
//! This crate contains:
//! - Instruction tag enums and unit framing
//! - `Value`, the owned runtime value
//! - `Reader` for bounds-checked decoding and `UnitBuilder` for emission
//! - `dump` for human-readable disassembly

mod builder;
mod dump;
mod error;
mod header;
mod ids;
mod instructions;
mod reader;
mod value;

#[cfg(test)]
mod header_tests;
#[cfg(test)]
mod value_tests;

pub use builder::{Args, BranchSlots, UnitBuilder, UnitMark};
pub use dump::{MAX_DUMP_DEPTH, dump};
pub use error::DecodeError;
pub use header::{HEADER_SIZE, MIN_UNIT_SIZE, UnitHeader, validate_unit};
pub use ids::VarId;
pub use instructions::{END, ExpressionTag, LiteralTag, StatementTag};
pub use reader::Reader;
pub use value::{Function, Value, ValueKind};
