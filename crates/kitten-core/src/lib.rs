#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core primitives shared by every Kitten crate.
//!
//! - `codec`: bit-exact little-endian integer and byte-string framing
//! - `colors`: ANSI palette for dump and trace output

pub mod codec;
mod colors;


pub use codec::CodecError;
pub use colors::Colors;
