//! Bounds-checked cursor over bytecode.
//!
//! A `Reader` never reads past its slice. Sub-readers created for nested units
//! keep reporting offsets relative to the outermost buffer.

use kitten_core::codec;

use crate::error::DecodeError;
use crate::header::{HEADER_SIZE, UnitHeader, validate_unit_at};
use crate::ids::VarId;
use crate::instructions::{ExpressionTag, LiteralTag, StatementTag};
use crate::value::Function;

#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            base: 0,
        }
    }

    /// Validate `bytes` as a complete unit and return a reader over its body.
    pub fn unit_body(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let header = validate_unit_at(bytes, 0)?;
        Ok(Self::body_of(bytes, 0, header))
    }

    fn body_of(unit: &'a [u8], base: usize, header: UnitHeader) -> Self {
        let end = header.length as usize - 1;
        Self {
            bytes: &unit[HEADER_SIZE..end],
            pos: 0,
            base: base + HEADER_SIZE,
        }
    }

    /// Absolute offset of the next byte.
    #[inline]
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn lift(&self, err: codec::CodecError) -> DecodeError {
        DecodeError::from_codec(err, self.base)
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let slice = codec::take(self.bytes, self.pos, n).map_err(|e| self.lift(e))?;
        self.pos += n;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        let v = codec::read_u32(self.bytes, self.pos).map_err(|e| self.lift(e))?;
        self.pos += codec::U32_SIZE;
        Ok(v)
    }

    pub fn f64(&mut self) -> Result<f64, DecodeError> {
        let v = codec::read_f64(self.bytes, self.pos).map_err(|e| self.lift(e))?;
        self.pos += codec::F64_SIZE;
        Ok(v)
    }

    pub fn var_id(&mut self) -> Result<VarId, DecodeError> {
        self.u32().map(VarId)
    }

    pub fn boolean(&mut self) -> Result<bool, DecodeError> {
        let offset = self.offset();
        match self.u8()? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            byte => Err(DecodeError::InvalidBoolean { byte, offset }),
        }
    }

    /// NUL-terminated byte string.
    pub fn cstring(&mut self) -> Result<&'a [u8], DecodeError> {
        let (s, consumed) = codec::read_cstring(self.bytes, self.pos).map_err(|e| self.lift(e))?;
        self.pos += consumed;
        Ok(s)
    }

    /// NUL-terminated UTF-8 name (host function, parameter or argument key).
    pub fn name(&mut self) -> Result<&'a str, DecodeError> {
        let offset = self.offset();
        let raw = self.cstring()?;
        std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8 { offset })
    }

    /// `[u32 len][bytes]`
    pub fn sized(&mut self) -> Result<&'a [u8], DecodeError> {
        let (s, consumed) = codec::read_sized(self.bytes, self.pos).map_err(|e| self.lift(e))?;
        self.pos += consumed;
        Ok(s)
    }

    pub fn statement_tag(&mut self) -> Result<StatementTag, DecodeError> {
        let offset = self.offset();
        let tag = self.u8()?;
        StatementTag::from_u8(tag).ok_or(DecodeError::UnknownStatement { tag, offset })
    }

    pub fn expression_tag(&mut self) -> Result<ExpressionTag, DecodeError> {
        let offset = self.offset();
        let tag = self.u8()?;
        ExpressionTag::from_u8(tag).ok_or(DecodeError::UnknownExpression { tag, offset })
    }

    pub fn literal_tag(&mut self) -> Result<LiteralTag, DecodeError> {
        let offset = self.offset();
        let tag = self.u8()?;
        LiteralTag::from_u8(tag).ok_or(DecodeError::UnknownLiteral { tag, offset })
    }

    /// Consume a named-argument or array terminator if one is next.
    pub fn end_of_list(&mut self) -> bool {
        if self.peek() == Some(crate::instructions::END) {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Consume the complete unit at the cursor, returning its raw bytes.
    pub fn unit_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let offset = self.offset();
        let declared = codec::read_u32(self.bytes, self.pos).map_err(|e| self.lift(e))?;
        self.unit_bytes_of_len(declared, offset)
    }

    fn unit_bytes_of_len(&mut self, declared: u32, offset: usize) -> Result<&'a [u8], DecodeError> {
        let actual = self.remaining();
        if declared as usize > actual {
            return Err(DecodeError::LengthMismatch {
                offset,
                declared,
                actual,
            });
        }
        let unit = &self.bytes[self.pos..self.pos + declared as usize];
        validate_unit_at(unit, offset)?;
        self.pos += declared as usize;
        Ok(unit)
    }

    /// Consume the unit at the cursor and return a reader over its body.
    pub fn unit(&mut self) -> Result<Reader<'a>, DecodeError> {
        let offset = self.offset();
        let unit = self.unit_bytes()?;
        let header = UnitHeader {
            length: unit.len() as u32,
        };
        Ok(Self::body_of(unit, offset, header))
    }

    /// Consume a unit whose length was announced separately (an `if` branch).
    ///
    /// The unit's own header must agree with `len`.
    pub fn unit_of_len(&mut self, len: u32) -> Result<Reader<'a>, DecodeError> {
        let offset = self.offset();
        let unit = self.unit_bytes_of_len(len, offset)?;
        let header = UnitHeader { length: len };
        Ok(Self::body_of(unit, offset, header))
    }

    /// Skip `len` bytes without decoding them.
    pub fn skip(&mut self, len: u32) -> Result<(), DecodeError> {
        self.take(len as usize).map(|_| ())
    }

    /// Consume the unit at the cursor as a function value.
    pub fn function(&mut self) -> Result<Function, DecodeError> {
        self.unit_bytes().map(Function::from_validated)
    }
}
