//! Tracing infrastructure for debugging script execution.
//!
//! The VM reports each step to a [`Tracer`]. With [`NoopTracer`] every hook is
//! an empty `#[inline(always)]` function and tracing compiles away; no
//! tracing state lives in the VM itself. [`PrintTracer`] collects one line per
//! event, indented by scope depth.

use std::fmt::Write as _;

use kitten_bytecode::{ExpressionTag, StatementTag, Value, VarId};
use kitten_core::Colors;

use super::host::Arguments;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Default: statements, host calls, local calls and returns.
    #[default]
    Default,
    /// Verbose (-v): adds assignments, host results, branch and loop scopes.
    Verbose,
    /// Very verbose (-vv): adds every evaluated expression.
    VeryVerbose,
}

/// Why a scope was opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// Selected `if` branch.
    Branch,
    /// One `for` iteration, by element index.
    Iteration(usize),
    /// Local call of the function bound to this variable.
    Call(VarId),
}

/// Tracer trait for VM execution instrumentation.
///
/// - `trace_statement` - before executing a statement
/// - `trace_expression` - before evaluating an expression
/// - `trace_assign` - after a variable write
/// - `trace_host_call` - before invoking a host callback
/// - `trace_host_result` - after a host callback returns
/// - `trace_enter_scope` / `trace_exit_scope` - around branches, iterations and calls
/// - `trace_return` - when a `return` value starts propagating
pub trait Tracer {
    fn trace_statement(&mut self, offset: usize, tag: StatementTag);

    fn trace_expression(&mut self, offset: usize, tag: ExpressionTag);

    fn trace_assign(&mut self, id: VarId, value: &Value);

    fn trace_host_call(&mut self, name: &str, args: &Arguments);

    fn trace_host_result(&mut self, name: &str, value: Option<&Value>);

    fn trace_enter_scope(&mut self, kind: ScopeKind);

    /// Called on both normal exit and error unwind.
    fn trace_exit_scope(&mut self, kind: ScopeKind);

    fn trace_return(&mut self, value: &Value);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_statement(&mut self, _offset: usize, _tag: StatementTag) {}

    #[inline(always)]
    fn trace_expression(&mut self, _offset: usize, _tag: ExpressionTag) {}

    #[inline(always)]
    fn trace_assign(&mut self, _id: VarId, _value: &Value) {}

    #[inline(always)]
    fn trace_host_call(&mut self, _name: &str, _args: &Arguments) {}

    #[inline(always)]
    fn trace_host_result(&mut self, _name: &str, _value: Option<&Value>) {}

    #[inline(always)]
    fn trace_enter_scope(&mut self, _kind: ScopeKind) {}

    #[inline(always)]
    fn trace_exit_scope(&mut self, _kind: ScopeKind) {}

    #[inline(always)]
    fn trace_return(&mut self, _value: &Value) {}
}

/// Tracer that collects execution lines for printing.
///
/// Lines carrying a statement or expression start with its offset; event
/// lines (host calls, scopes, returns) leave that column blank.
pub struct PrintTracer {
    verbosity: Verbosity,
    colors: Colors,
    depth: usize,
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            verbosity,
            colors,
            depth: 0,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with newlines.
    pub fn format(&self) -> String {
        self.lines.join("\n")
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn push(&mut self, offset: Option<usize>, extra_indent: usize, text: &str) {
        let c = self.colors;
        let mut line = match offset {
            Some(offset) => format!("{}{offset:04}{} ", c.dim, c.reset),
            None => " ".repeat(5),
        };
        let indent = (self.depth + extra_indent) * 2;
        line.push_str(&" ".repeat(indent));
        line.push_str(text);
        self.lines.push(line);
    }

    fn format_args(&self, args: &Arguments) -> String {
        let mut out = String::new();
        for (i, (key, value)) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write!(out, "{key}: {}", self.colors.paint(self.colors.green, &value.to_string()))
                .expect("String write never fails");
        }
        out
    }
}

impl Tracer for PrintTracer {
    fn trace_statement(&mut self, offset: usize, tag: StatementTag) {
        if tag == StatementTag::Null && self.verbosity == Verbosity::Default {
            return;
        }
        let text = self.colors.paint(self.colors.blue, tag.name());
        self.push(Some(offset), 0, &text);
    }

    fn trace_expression(&mut self, offset: usize, tag: ExpressionTag) {
        if self.verbosity != Verbosity::VeryVerbose {
            return;
        }
        let text = self.colors.paint(self.colors.blue, tag.name());
        self.push(Some(offset), 1, &text);
    }

    fn trace_assign(&mut self, id: VarId, value: &Value) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let value = self.colors.paint(self.colors.green, &value.to_string());
        self.push(None, 1, &format!("{id} = {value}"));
    }

    fn trace_host_call(&mut self, name: &str, args: &Arguments) {
        let args = self.format_args(args);
        self.push(None, 1, &format!("-> {name}({args})"));
    }

    fn trace_host_result(&mut self, name: &str, value: Option<&Value>) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let text = match value {
            Some(value) => {
                let value = self.colors.paint(self.colors.green, &value.to_string());
                format!("<- {name} {value}")
            }
            None => format!("<- {name}"),
        };
        self.push(None, 1, &text);
    }

    fn trace_enter_scope(&mut self, kind: ScopeKind) {
        let text = match kind {
            ScopeKind::Call(id) => Some(format!("call {id}")),
            _ if self.verbosity == Verbosity::Default => None,
            ScopeKind::Branch => Some("branch".to_owned()),
            ScopeKind::Iteration(index) => Some(format!("iteration {index}")),
        };
        if let Some(text) = text {
            let text = self.colors.paint(self.colors.blue, &text);
            self.push(None, 1, &text);
        }
        self.depth += 1;
    }

    fn trace_exit_scope(&mut self, _kind: ScopeKind) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn trace_return(&mut self, value: &Value) {
        let value = self.colors.paint(self.colors.green, &value.to_string());
        self.push(None, 1, &format!("=> {value}"));
    }
}
