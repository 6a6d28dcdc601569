//! Little-endian integer and byte-string framing.
//!
//! Every read takes the full buffer plus an absolute offset so that errors can
//! point at the exact byte that was malformed.

/// Size of the `u32` length prefix used throughout the wire format.
pub const U32_SIZE: usize = 4;

/// Size of an encoded `f64`.
pub const F64_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("unexpected end of data at offset {offset}: need {required} bytes, {remaining} left")]
    UnexpectedEnd {
        offset: usize,
        required: usize,
        remaining: usize,
    },

    #[error("unterminated string starting at offset {offset}")]
    MissingNul { offset: usize },

    #[error("string contains a NUL byte at position {position}")]
    InteriorNul { position: usize },
}

/// Borrow `n` bytes at `at`, or fail without reading out of bounds.
pub fn take(bytes: &[u8], at: usize, n: usize) -> Result<&[u8], CodecError> {
    let remaining = bytes.len().saturating_sub(at);
    if remaining < n {
        return Err(CodecError::UnexpectedEnd {
            offset: at,
            required: n,
            remaining,
        });
    }
    Ok(&bytes[at..at + n])
}

pub fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn read_u32(bytes: &[u8], at: usize) -> Result<u32, CodecError> {
    let raw = take(bytes, at, U32_SIZE)?;
    Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Overwrite a previously reserved `u32` slot.
///
/// Panics if `at + 4` exceeds the buffer; callers only patch slots they
/// reserved themselves.
pub fn patch_u32(out: &mut [u8], at: usize, value: u32) {
    out[at..at + U32_SIZE].copy_from_slice(&value.to_le_bytes());
}

pub fn write_f64(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn read_f64(bytes: &[u8], at: usize) -> Result<f64, CodecError> {
    let raw = take(bytes, at, F64_SIZE)?;
    let mut buf = [0u8; F64_SIZE];
    buf.copy_from_slice(raw);
    Ok(f64::from_le_bytes(buf))
}

/// Append `s` followed by a NUL terminator.
pub fn write_cstring(out: &mut Vec<u8>, s: &[u8]) -> Result<(), CodecError> {
    if let Some(position) = s.iter().position(|&b| b == 0) {
        return Err(CodecError::InteriorNul { position });
    }
    out.extend_from_slice(s);
    out.push(0);
    Ok(())
}

/// Read a NUL-terminated string at `at`.
///
/// Returns the string bytes (without terminator) and the number of bytes
/// consumed (including terminator).
pub fn read_cstring(bytes: &[u8], at: usize) -> Result<(&[u8], usize), CodecError> {
    let tail = bytes.get(at..).unwrap_or(&[]);
    match tail.iter().position(|&b| b == 0) {
        Some(len) => Ok((&tail[..len], len + 1)),
        None => Err(CodecError::MissingNul { offset: at }),
    }
}

/// Append `[u32 len][bytes]`.
pub fn write_sized(out: &mut Vec<u8>, s: &[u8]) {
    write_u32(out, s.len() as u32);
    out.extend_from_slice(s);
}

/// Read `[u32 len][bytes]` at `at`, returning the bytes and total consumed.
pub fn read_sized(bytes: &[u8], at: usize) -> Result<(&[u8], usize), CodecError> {
    let len = read_u32(bytes, at)? as usize;
    let body = take(bytes, at + U32_SIZE, len)?;
    Ok((body, U32_SIZE + len))
}
