use kitten_core::CodecError;

/// Structural decode failure.
///
/// Every variant carries the byte offset at which decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of bytecode at offset {offset}: need {required} bytes, {remaining} left")]
    UnexpectedEnd {
        offset: usize,
        required: usize,
        remaining: usize,
    },

    #[error("unit at offset {offset} declares {declared} bytes but {actual} are available")]
    LengthMismatch {
        offset: usize,
        declared: u32,
        actual: usize,
    },

    #[error("unit at offset {offset} declares {declared} bytes, below the 5-byte minimum")]
    UnitTooShort { offset: usize, declared: u32 },

    #[error("missing unit terminator at offset {offset}")]
    MissingTerminator { offset: usize },

    #[error("unterminated name at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("unknown statement tag 0x{tag:02x} at offset {offset}")]
    UnknownStatement { tag: u8, offset: usize },

    #[error("unknown expression tag 0x{tag:02x} at offset {offset}")]
    UnknownExpression { tag: u8, offset: usize },

    #[error("unknown literal tag 0x{tag:02x} at offset {offset}")]
    UnknownLiteral { tag: u8, offset: usize },

    #[error("invalid boolean byte 0x{byte:02x} at offset {offset}")]
    InvalidBoolean { byte: u8, offset: usize },

    #[error("name at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    #[error("nesting too deep at offset {offset}")]
    NestingTooDeep { offset: usize },
}

impl DecodeError {
    /// Byte offset where decoding failed.
    pub fn offset(&self) -> usize {
        match *self {
            Self::UnexpectedEnd { offset, .. }
            | Self::LengthMismatch { offset, .. }
            | Self::UnitTooShort { offset, .. }
            | Self::MissingTerminator { offset }
            | Self::UnterminatedString { offset }
            | Self::UnknownStatement { offset, .. }
            | Self::UnknownExpression { offset, .. }
            | Self::UnknownLiteral { offset, .. }
            | Self::InvalidBoolean { offset, .. }
            | Self::InvalidUtf8 { offset }
            | Self::NestingTooDeep { offset } => offset,
        }
    }

    /// Lift a codec error whose offsets are relative to a slice starting at `base`.
    pub(crate) fn from_codec(err: CodecError, base: usize) -> Self {
        match err {
            CodecError::UnexpectedEnd {
                offset,
                required,
                remaining,
            } => Self::UnexpectedEnd {
                offset: base + offset,
                required,
                remaining,
            },
            CodecError::MissingNul { offset } => Self::UnterminatedString {
                offset: base + offset,
            },
            // Only produced by encoders.
            CodecError::InteriorNul { position } => Self::UnterminatedString {
                offset: base + position,
            },
        }
    }
}
