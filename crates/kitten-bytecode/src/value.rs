//! Runtime values.
//!
//! Values are always owned by their holder: assignment, argument passing and
//! host-call results copy, never alias.

use std::borrow::Cow;
use std::fmt;

use kitten_core::codec;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::DecodeError;
use crate::header::{UnitHeader, validate_unit};
use crate::instructions::{END, ExpressionTag, LiteralTag};

/// An uninvoked callable body: one complete, validated unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    unit: Vec<u8>,
}

impl Function {
    /// Wrap a complete unit, checking its framing.
    pub fn from_unit(unit: Vec<u8>) -> Result<Self, DecodeError> {
        validate_unit(&unit)?;
        Ok(Self { unit })
    }

    /// Wrap a unit that was already validated by a reader.
    pub(crate) fn from_validated(unit: &[u8]) -> Self {
        Self {
            unit: unit.to_vec(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.unit
    }

    pub fn header(&self) -> UnitHeader {
        UnitHeader {
            length: self.unit.len() as u32,
        }
    }

    pub fn len(&self) -> usize {
        self.unit.len()
    }

    /// True when the body holds no statements.
    pub fn is_empty(&self) -> bool {
        self.header().body_len() == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    String(Vec<u8>),
    Double(f64),
    Boolean(bool),
    Function(Function),
    Array(Vec<Value>),
}

/// Value discriminant, used in type mismatch reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    String,
    Double,
    Boolean,
    Function,
    Array,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::String => "string",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Function => "function",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Nil => ValueKind::Nil,
            Self::String(_) => ValueKind::String,
            Self::Double(_) => ValueKind::Double,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Function(_) => ValueKind::Function,
            Self::Array(_) => ValueKind::Array,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// String contents, with invalid UTF-8 replaced.
    pub fn as_str(&self) -> Option<Cow<'_, str>> {
        self.as_bytes().map(String::from_utf8_lossy)
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Append the literal wire form (tag byte included).
    ///
    /// Array elements are written as literal expressions.
    pub fn encode_literal(&self, out: &mut Vec<u8>) {
        match self {
            Self::Nil => out.push(LiteralTag::Nil as u8),
            Self::String(s) => {
                out.push(LiteralTag::String as u8);
                codec::write_sized(out, s);
            }
            Self::Double(d) => {
                out.push(LiteralTag::Double as u8);
                codec::write_f64(out, *d);
            }
            Self::Boolean(b) => {
                out.push(LiteralTag::Boolean as u8);
                out.push(u8::from(*b));
            }
            Self::Function(f) => {
                out.push(LiteralTag::Function as u8);
                out.extend_from_slice(f.bytes());
            }
            Self::Array(items) => {
                out.push(LiteralTag::Array as u8);
                for item in items {
                    out.push(ExpressionTag::Literal as u8);
                    item.encode_literal(out);
                }
                out.push(END);
            }
        }
    }

    /// Append the template text form of this value.
    ///
    /// Nil and functions produce nothing; arrays render each element in order.
    pub fn render_into(&self, out: &mut String) {
        match self {
            Self::Nil | Self::Function(_) => {}
            Self::String(s) => out.push_str(&String::from_utf8_lossy(s)),
            Self::Double(d) => {
                use std::fmt::Write as _;
                // Writing into a String cannot fail.
                let _ = write!(out, "{d}");
            }
            Self::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            Self::Array(items) => {
                for item in items {
                    item.render_into(out);
                }
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::String(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
            Self::Double(d) => write!(f, "{d}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Function(func) => write!(f, "<function {} bytes>", func.len()),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_none(),
            Self::String(s) => serializer.serialize_str(&String::from_utf8_lossy(s)),
            Self::Double(d) => serializer.serialize_f64(*d),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Function(func) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$function", &func.len())?;
                map.end()
            }
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into_bytes())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}
