//! ANSI color codes for dump and trace output.
//!
//! Three roles plus reset:
//! - Blue: statement and expression tags, host function names
//! - Green: literal values
//! - Dim: offsets, lengths, structural markers

/// ANSI color palette for CLI output.
///
/// Only standard 16-color codes are used so output reads well on both
/// light and dark terminals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    /// Colors enabled (ANSI escape codes).
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    /// Colors disabled (empty strings).
    pub const OFF: Self = Self {
        blue: "",
        green: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }

    /// Wrap `text` in the given color code, followed by a reset.
    pub fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            return text.to_owned();
        }
        format!("{color}{text}{}", self.reset)
    }
}
