//! Byte cursor over DSL source.
//!
//! Word boundaries are ASCII, so every position the scanner stops at is a
//! `char` boundary of the source `&str`.

use crate::error::CompileError;

pub const KEYWORDS: [&str; 5] = ["if", "else", "return", "for", "in"];

#[inline]
fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\n' | b'\t' | b'\r' | b'{' | b'}' | b'[' | b']' | b'(' | b')' | b',' | b'.' | b':'
            | b'"' | b'='
    )
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    /// The character at the cursor, for error messages.
    pub fn current_char(&self) -> Option<char> {
        self.src.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    /// Width of the whitespace sequence at `pos`: one byte, or two for `\n` written out.
    fn whitespace_width(&self, pos: usize) -> usize {
        let bytes = self.src.as_bytes();
        match bytes.get(pos) {
            Some(b' ' | b'\n' | b'\t' | b'\r') => 1,
            Some(b'\\') if bytes.get(pos + 1) == Some(&b'n') => 2,
            _ => 0,
        }
    }

    pub fn skip_whitespace(&mut self) {
        loop {
            let width = self.whitespace_width(self.pos);
            if width == 0 {
                return;
            }
            self.pos += width;
        }
    }

    fn word_end(&self) -> usize {
        let bytes = self.src.as_bytes();
        let mut end = self.pos;
        while end < bytes.len() && !is_delimiter(bytes[end]) && self.whitespace_width(end) == 0 {
            end += 1;
        }
        end
    }

    /// Word at the cursor without consuming it. May be empty.
    pub fn peek_word(&self) -> &'a str {
        &self.src[self.pos..self.word_end()]
    }

    /// Consume the word at the cursor. May be empty.
    pub fn word(&mut self) -> &'a str {
        let end = self.word_end();
        let word = &self.src[self.pos..end];
        self.pos = end;
        word
    }

    /// Consume `b` if it is next.
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Advance one byte. Only used after peeking an ASCII byte.
    pub fn bump(&mut self) {
        self.pos += 1;
    }

    /// Consume `b` or report what was found instead.
    pub fn expect(&mut self, b: u8, expected: &'static str) -> Result<(), CompileError> {
        if self.eat(b) {
            return Ok(());
        }
        Err(self.unexpected(expected))
    }

    /// Error for the character at the cursor not matching `expected`.
    pub fn unexpected(&self, expected: &'static str) -> CompileError {
        match self.current_char() {
            Some(found) => CompileError::UnexpectedCharacter {
                found,
                expected,
                offset: self.pos,
            },
            None => CompileError::UnexpectedEnd {
                expected,
                offset: self.pos,
            },
        }
    }

    /// True when the word at the cursor is `word` and is directly followed by `.`.
    pub fn at_scope(&self, word: &str) -> bool {
        self.peek_word() == word && self.src.as_bytes().get(self.pos + word.len()) == Some(&b'.')
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.src[start..end]
    }
}
