//! Direct bytecode emission.
//!
//! Instructions are written in prefix order straight into a byte buffer.
//! Nested units reserve their length slot up front and patch it when closed,
//! so no intermediate tree is ever built.

use kitten_core::CodecError;
use kitten_core::codec;

use crate::header::HEADER_SIZE;
use crate::ids::VarId;
use crate::instructions::{END, ExpressionTag, LiteralTag, StatementTag};
use crate::value::Value;

/// Position of an open unit's length slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "an opened unit must be closed with end_unit"]
pub struct UnitMark(usize);

/// Reserved `[u32 trueLen][u32 falseLen]` slots of an `if` statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "branch lengths must be patched with patch_branches"]
pub struct BranchSlots(usize);

#[derive(Clone, Debug)]
pub struct UnitBuilder {
    buf: Vec<u8>,
    root: Option<UnitMark>,
}

impl Default for UnitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitBuilder {
    /// Start a top-level unit.
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(64);
        let root = UnitMark(buf.len());
        codec::write_u32(&mut buf, 0);
        Self {
            buf,
            root: Some(root),
        }
    }

    /// Start a builder that emits bare statement bytes with no unit framing.
    ///
    /// `finish` on a fragment returns exactly what was written.
    pub fn fragment() -> Self {
        Self {
            buf: Vec::new(),
            root: None,
        }
    }

    /// Bytes written so far, including the reserved top-level header.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when no instruction has been written yet.
    pub fn is_empty(&self) -> bool {
        match self.root {
            Some(_) => self.buf.len() <= HEADER_SIZE,
            None => self.buf.is_empty(),
        }
    }

    /// Close the top-level unit and return the finished buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if let Some(root) = self.root {
            self.end_unit(root);
        }
        self.buf
    }

    pub fn begin_unit(&mut self) -> UnitMark {
        let mark = UnitMark(self.buf.len());
        codec::write_u32(&mut self.buf, 0);
        mark
    }

    /// Write the terminator and patch the length slot. Returns the unit length.
    pub fn end_unit(&mut self, mark: UnitMark) -> u32 {
        self.buf.push(END);
        let len = (self.buf.len() - mark.0) as u32;
        codec::patch_u32(&mut self.buf, mark.0, len);
        len
    }

    /// Append pre-encoded statement bytes.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn statement(&mut self, tag: StatementTag) -> &mut Self {
        self.buf.push(tag as u8);
        self
    }

    pub fn assign(&mut self, id: VarId) -> &mut Self {
        self.statement(StatementTag::Assign);
        codec::write_u32(&mut self.buf, id.get());
        self
    }

    pub fn for_in(&mut self, loop_var: VarId) -> &mut Self {
        self.statement(StatementTag::ForIn);
        codec::write_u32(&mut self.buf, loop_var.get());
        self
    }

    /// Reserve the branch length slots; call after the condition expression.
    pub fn branch_slots(&mut self) -> BranchSlots {
        let at = self.buf.len();
        codec::write_u32(&mut self.buf, 0);
        codec::write_u32(&mut self.buf, 0);
        BranchSlots(at)
    }

    pub fn patch_branches(&mut self, slots: BranchSlots, true_len: u32, false_len: u32) {
        codec::patch_u32(&mut self.buf, slots.0, true_len);
        codec::patch_u32(&mut self.buf, slots.0 + codec::U32_SIZE, false_len);
    }

    pub fn local_call(&mut self, id: VarId) -> &mut Self {
        self.buf.push(ExpressionTag::LocalCall as u8);
        codec::write_u32(&mut self.buf, id.get());
        self
    }

    /// Open a host call; follow with `arg` pairs and `end_args`.
    pub fn host_call(&mut self, name: &str) -> Result<&mut Self, CodecError> {
        self.buf.push(ExpressionTag::HostCall as u8);
        codec::write_cstring(&mut self.buf, name.as_bytes())?;
        Ok(self)
    }

    /// Write an argument key; the value expression follows.
    pub fn arg(&mut self, key: &str) -> Result<&mut Self, CodecError> {
        codec::write_cstring(&mut self.buf, key.as_bytes())?;
        Ok(self)
    }

    pub fn end_args(&mut self) -> &mut Self {
        self.buf.push(END);
        self
    }

    /// Literal expression (`0x03` followed by the literal wire form).
    pub fn literal(&mut self, value: &Value) -> &mut Self {
        self.buf.push(ExpressionTag::Literal as u8);
        value.encode_literal(&mut self.buf);
        self
    }

    /// Open an array literal; follow with element expressions and `end_array`.
    pub fn begin_array(&mut self) -> &mut Self {
        self.buf.push(ExpressionTag::Literal as u8);
        self.buf.push(LiteralTag::Array as u8);
        self
    }

    pub fn end_array(&mut self) -> &mut Self {
        self.buf.push(END);
        self
    }

    /// Open a function literal; close it with `end_unit`.
    pub fn begin_function(&mut self) -> UnitMark {
        self.buf.push(ExpressionTag::Literal as u8);
        self.buf.push(LiteralTag::Function as u8);
        self.begin_unit()
    }

    pub fn var_ref(&mut self, id: VarId) -> &mut Self {
        self.buf.push(ExpressionTag::VariableRef as u8);
        codec::write_u32(&mut self.buf, id.get());
        self
    }

    pub fn param_ref(&mut self, name: &str) -> Result<&mut Self, CodecError> {
        self.buf.push(ExpressionTag::ParameterRef as u8);
        codec::write_cstring(&mut self.buf, name.as_bytes())?;
        Ok(self)
    }

    /// Result wrapper; the wrapped expression follows.
    pub fn result(&mut self) -> &mut Self {
        self.buf.push(ExpressionTag::Result as u8);
        self
    }

    /// Host call with literal arguments, as a complete expression.
    pub fn host_call_with(&mut self, name: &str, args: &Args) -> Result<&mut Self, CodecError> {
        self.host_call(name)?;
        for (key, value) in &args.0 {
            self.arg(key)?;
            self.literal(value);
        }
        Ok(self.end_args())
    }
}

/// Named literal arguments for [`UnitBuilder::host_call_with`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args(Vec<(String, Value)>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
