//! Unit framing: `[u32 totalLength][statements][0x00]`.
//!
//! The same framing is used for top-level buffers, `if` branches and function
//! literals, so any of them can be skipped without decoding its body.

use kitten_core::codec;

use crate::error::DecodeError;
use crate::instructions::END;

/// Size of the length prefix.
pub const HEADER_SIZE: usize = 4;

/// Smallest valid unit: header plus terminator.
pub const MIN_UNIT_SIZE: usize = HEADER_SIZE + 1;

/// Length prefix of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitHeader {
    /// Total unit length in bytes, including this header and the terminator.
    pub length: u32,
}

impl UnitHeader {
    /// Decode the header from the first 4 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let length = codec::read_u32(bytes, 0).map_err(|e| DecodeError::from_codec(e, 0))?;
        Ok(Self { length })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        self.length.to_le_bytes()
    }

    /// Length of the statement bytes between header and terminator.
    pub fn body_len(&self) -> usize {
        (self.length as usize).saturating_sub(MIN_UNIT_SIZE)
    }
}

/// Check that `bytes` is exactly one well-framed unit.
pub fn validate_unit(bytes: &[u8]) -> Result<UnitHeader, DecodeError> {
    validate_unit_at(bytes, 0)
}

/// Like [`validate_unit`], reporting offsets relative to `base`.
pub(crate) fn validate_unit_at(bytes: &[u8], base: usize) -> Result<UnitHeader, DecodeError> {
    let length = codec::read_u32(bytes, 0).map_err(|e| DecodeError::from_codec(e, base))?;
    let header = UnitHeader { length };

    if length as usize != bytes.len() {
        return Err(DecodeError::LengthMismatch {
            offset: base,
            declared: length,
            actual: bytes.len(),
        });
    }
    if bytes.len() < MIN_UNIT_SIZE {
        return Err(DecodeError::UnitTooShort {
            offset: base,
            declared: length,
        });
    }
    let last = bytes.len() - 1;
    if bytes[last] != END {
        return Err(DecodeError::MissingTerminator { offset: base + last });
    }

    Ok(header)
}
