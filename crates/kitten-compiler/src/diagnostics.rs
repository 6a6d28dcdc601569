//! Builder-pattern printer for compile errors.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

use crate::error::CompileError;

/// Renders a [`CompileError`] as an annotated source snippet.
pub struct ErrorPrinter<'e, 's> {
    error: &'e CompileError,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> ErrorPrinter<'e, 's> {
    pub fn new(error: &'e CompileError) -> Self {
        Self {
            error,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let message = self.error.to_string();
        let (Some(source), Some(span)) = (self.source, self.error.span()) else {
            return write!(w, "error: {message}");
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(adjust_range(span, source.len()))
                .label(&message),
        );
        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let report = vec![Level::ERROR.primary_title(&message).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }
}

/// Widen empty spans to one byte so the caret is visible.
fn adjust_range(range: std::ops::Range<usize>, limit: usize) -> std::ops::Range<usize> {
    let start = range.start.min(limit);
    let end = range.end.min(limit);

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}

impl CompileError {
    pub fn printer(&self) -> ErrorPrinter<'_, '_> {
        ErrorPrinter::new(self)
    }

    /// Render with an annotated source snippet.
    pub fn render(&self, source: &str, path: Option<&str>, colored: bool) -> String {
        let mut printer = self.printer().source(source).colored(colored);
        if let Some(p) = path {
            printer = printer.path(p);
        }
        printer.render()
    }
}
