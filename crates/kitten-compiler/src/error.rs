use std::ops::Range;
use std::path::PathBuf;

/// Compilation failure.
///
/// Every source-level variant carries the byte offset where the problem was
/// detected. Compilation never produces partial output.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("unexpected `{found}`, expected {expected}")]
    UnexpectedCharacter {
        found: char,
        expected: &'static str,
        offset: usize,
    },

    #[error("unclosed `{delimiter}`")]
    Unclosed { delimiter: char, offset: usize },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        expected: &'static str,
        offset: usize,
    },

    #[error("missing parameter name after `Parameters.`")]
    EmptyParameterName { offset: usize },

    #[error("expected a name")]
    EmptyName { offset: usize },

    #[error("name contains a NUL byte")]
    NulInName { offset: usize },

    #[error("invalid expression")]
    InvalidExpression { offset: usize },

    #[error("malformed argument list, expected `key: value`")]
    MalformedArguments { offset: usize },

    #[error("expected keyword `{expected}`")]
    ExpectedKeyword {
        expected: &'static str,
        offset: usize,
    },

    #[error("`{keyword}` cannot be used here")]
    KeywordMisuse { keyword: String, offset: usize },

    #[error("invalid number literal `{text}`")]
    InvalidNumber { text: String, offset: usize },

    #[error("nesting exceeds {} levels", crate::compiler::NESTING_LIMIT)]
    RecursionLimitExceeded { offset: usize },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Byte offset into the source, if the error is tied to one.
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Self::UnexpectedCharacter { offset, .. }
            | Self::Unclosed { offset, .. }
            | Self::UnexpectedEnd { offset, .. }
            | Self::EmptyParameterName { offset }
            | Self::EmptyName { offset }
            | Self::NulInName { offset }
            | Self::InvalidExpression { offset }
            | Self::MalformedArguments { offset }
            | Self::ExpectedKeyword { offset, .. }
            | Self::KeywordMisuse { offset, .. }
            | Self::InvalidNumber { offset, .. }
            | Self::RecursionLimitExceeded { offset } => Some(offset),
            Self::Io { .. } => None,
        }
    }

    /// Source range to underline.
    pub fn span(&self) -> Option<Range<usize>> {
        let offset = self.offset()?;
        let len = match self {
            Self::KeywordMisuse { keyword, .. } => keyword.len(),
            Self::InvalidNumber { text, .. } => text.len(),
            Self::UnexpectedCharacter { found, .. } => found.len_utf8(),
            _ => 0,
        };
        Some(offset..offset + len)
    }

    /// Shift source offsets by `delta` (for fragments embedded in a larger file).
    pub fn shifted(self, delta: usize) -> Self {
        match self {
            Self::UnexpectedCharacter {
                found,
                expected,
                offset,
            } => Self::UnexpectedCharacter {
                found,
                expected,
                offset: offset + delta,
            },
            Self::Unclosed { delimiter, offset } => Self::Unclosed {
                delimiter,
                offset: offset + delta,
            },
            Self::UnexpectedEnd { expected, offset } => Self::UnexpectedEnd {
                expected,
                offset: offset + delta,
            },
            Self::EmptyParameterName { offset } => Self::EmptyParameterName {
                offset: offset + delta,
            },
            Self::EmptyName { offset } => Self::EmptyName {
                offset: offset + delta,
            },
            Self::NulInName { offset } => Self::NulInName {
                offset: offset + delta,
            },
            Self::InvalidExpression { offset } => Self::InvalidExpression {
                offset: offset + delta,
            },
            Self::MalformedArguments { offset } => Self::MalformedArguments {
                offset: offset + delta,
            },
            Self::ExpectedKeyword { expected, offset } => Self::ExpectedKeyword {
                expected,
                offset: offset + delta,
            },
            Self::KeywordMisuse { keyword, offset } => Self::KeywordMisuse {
                keyword,
                offset: offset + delta,
            },
            Self::InvalidNumber { text, offset } => Self::InvalidNumber {
                text,
                offset: offset + delta,
            },
            Self::RecursionLimitExceeded { offset } => Self::RecursionLimitExceeded {
                offset: offset + delta,
            },
            Self::Io { .. } => self,
        }
    }
}
