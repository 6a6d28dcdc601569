//! Tag bytes for the three instruction families.
//!
//! Statements, expressions and literals each open with a single tag byte.
//! The byte values are part of the wire contract and must never change.

/// Statement tag.
///
/// `Null` doubles as the unit terminator; inside a unit body it is a no-op.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum StatementTag {
    Null = 0x00,
    /// `[cond][u32 trueLen][u32 falseLen][trueUnit][falseUnit?]`
    If = 0x01,
    /// `[u32 loopVarId][iterable][function literal]`
    ForIn = 0x02,
    /// `[u32 varId][expr]`
    Assign = 0x03,
    /// `[expr]`
    Expression = 0x04,
    /// `[expr]`
    Return = 0x05,
}

impl StatementTag {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x00 => Some(Self::Null),
            0x01 => Some(Self::If),
            0x02 => Some(Self::ForIn),
            0x03 => Some(Self::Assign),
            0x04 => Some(Self::Expression),
            0x05 => Some(Self::Return),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "nop",
            Self::If => "if",
            Self::ForIn => "for",
            Self::Assign => "assign",
            Self::Expression => "expr",
            Self::Return => "return",
        }
    }
}

/// Expression tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum ExpressionTag {
    /// `[u32 varId][named-args]`
    LocalCall = 0x01,
    /// `[cstring name][named-args]`
    HostCall = 0x02,
    Literal = 0x03,
    /// `[u32 varId]`
    VariableRef = 0x04,
    /// `[cstring name]`
    ParameterRef = 0x05,
    /// `[expr]`, marks the inner value as an early-return carrier.
    Result = 0x06,
}

impl ExpressionTag {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x01 => Some(Self::LocalCall),
            0x02 => Some(Self::HostCall),
            0x03 => Some(Self::Literal),
            0x04 => Some(Self::VariableRef),
            0x05 => Some(Self::ParameterRef),
            0x06 => Some(Self::Result),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LocalCall => "call",
            Self::HostCall => "host",
            Self::Literal => "literal",
            Self::VariableRef => "var",
            Self::ParameterRef => "param",
            Self::Result => "result",
        }
    }
}

/// Literal tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum LiteralTag {
    Nil = 0x00,
    /// `[u32 len][bytes]`
    String = 0x01,
    /// 8 bytes, little-endian IEEE-754.
    Double = 0x02,
    /// `0x00` or `0x01`.
    Boolean = 0x03,
    /// A complete unit: `[u32 len][statements][0x00]`.
    Function = 0x04,
    /// `[expr]* 0x00`
    Array = 0x05,
}

impl LiteralTag {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x00 => Some(Self::Nil),
            0x01 => Some(Self::String),
            0x02 => Some(Self::Double),
            0x03 => Some(Self::Boolean),
            0x04 => Some(Self::Function),
            0x05 => Some(Self::Array),
            _ => None,
        }
    }
}

/// Terminates named-argument lists, array literals and units.
pub const END: u8 = 0x00;
