//! Single-pass recursive-descent encoder.
//!
//! Source is scanned and bytecode is emitted in the same pass; no syntax tree
//! is built. Blocks are emitted as length-prefixed units so the VM can skip
//! them without decoding.

use kitten_bytecode::{StatementTag, UnitBuilder, Value, VarId};
use kitten_core::CodecError;

use crate::error::CompileError;
use crate::scanner::{Scanner, is_keyword};
use crate::symbols::SymbolTable;

/// Name prefix of host-call expressions.
pub const HOST_SCOPE: &str = "Swift";

/// Name prefix of parameter references.
pub const PARAMETER_SCOPE: &str = "Parameters";

/// Maximum nesting of statements and expressions in one source.
pub const NESTING_LIMIT: u32 = 256;

/// A compilation session.
///
/// Top-level symbols and the id counter persist across calls, so several
/// fragments compiled by the same session can share variables.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    symbols: SymbolTable,
    render_host: Option<String>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template mode: every bare expression statement becomes a call to
    /// `host(value: <expr>)`.
    pub fn render_expressions(mut self, host: impl Into<String>) -> Self {
        self.render_host = Some(host.into());
        self
    }

    /// Compile a complete top-level unit.
    pub fn compile(&mut self, source: &str) -> Result<Vec<u8>, CompileError> {
        self.session(source, UnitBuilder::new())
    }

    /// Compile statements only, without unit framing.
    pub fn compile_statements(&mut self, source: &str) -> Result<Vec<u8>, CompileError> {
        self.session(source, UnitBuilder::fragment())
    }

    fn session(&mut self, source: &str, out: UnitBuilder) -> Result<Vec<u8>, CompileError> {
        let saved = self.symbols.clone();
        let mut pass = Pass {
            scanner: Scanner::new(source),
            out,
            symbols: &mut self.symbols,
            render_host: self.render_host.as_deref(),
            depth: 0,
        };

        match pass.top_level() {
            Ok(()) => Ok(pass.out.finish()),
            Err(err) => {
                self.symbols = saved;
                Err(err)
            }
        }
    }
}

struct Pass<'s, 'c> {
    scanner: Scanner<'s>,
    out: UnitBuilder,
    symbols: &'c mut SymbolTable,
    render_host: Option<&'c str>,
    depth: u32,
}

impl Pass<'_, '_> {
    fn enter_recursion(&mut self) -> Result<(), CompileError> {
        if self.depth >= NESTING_LIMIT {
            self.scanner.skip_whitespace();
            return Err(CompileError::RecursionLimitExceeded {
                offset: self.scanner.pos(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn top_level(&mut self) -> Result<(), CompileError> {
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.at_end() {
                return Ok(());
            }
            if self.scanner.peek() == Some(b'}') {
                return Err(self.scanner.unexpected("a statement"));
            }
            self.statement()?;
        }
    }

    fn statement(&mut self) -> Result<(), CompileError> {
        self.enter_recursion()?;
        let result = self.statement_inner();
        self.exit_recursion();
        result
    }

    fn statement_inner(&mut self) -> Result<(), CompileError> {
        self.scanner.skip_whitespace();
        let start = self.scanner.pos();

        match self.scanner.peek_word() {
            "if" => {
                self.scanner.word();
                self.if_statement()
            }
            "for" => {
                self.scanner.word();
                self.for_statement()
            }
            "return" => {
                self.scanner.word();
                self.out.statement(StatementTag::Return);
                self.expression()
            }
            keyword @ ("else" | "in") => Err(CompileError::KeywordMisuse {
                keyword: keyword.to_owned(),
                offset: start,
            }),
            word if !word.is_empty() && self.is_assignment(word) => self.assignment(),
            _ => self.expression_statement(),
        }
    }

    /// `<word> = ...`
    fn is_assignment(&self, word: &str) -> bool {
        let mut probe = self.scanner.clone();
        probe.reset(probe.pos() + word.len());
        probe.skip_whitespace();
        probe.peek() == Some(b'=')
    }

    fn if_statement(&mut self) -> Result<(), CompileError> {
        self.out.statement(StatementTag::If);
        self.expression()?;
        let slots = self.out.branch_slots();

        let true_len = self.block(None)?;

        let before_else = self.scanner.pos();
        self.scanner.skip_whitespace();
        let false_len = if self.scanner.peek_word() == "else" {
            self.scanner.word();
            self.block(None)?
        } else {
            self.scanner.reset(before_else);
            0
        };

        self.out.patch_branches(slots, true_len, false_len);
        Ok(())
    }

    fn for_statement(&mut self) -> Result<(), CompileError> {
        self.scanner.skip_whitespace();
        let name_at = self.scanner.pos();
        let name = self.scanner.word();
        self.check_binding_name(name, name_at)?;

        self.scanner.skip_whitespace();
        let in_at = self.scanner.pos();
        if self.scanner.word() != "in" {
            return Err(CompileError::ExpectedKeyword {
                expected: "in",
                offset: in_at,
            });
        }

        let loop_var = self.symbols.allocate();
        self.out.for_in(loop_var);
        self.expression()?;

        self.scanner.skip_whitespace();
        let body = self.out.begin_function();
        self.block_body(Some((name, loop_var)))?;
        self.out.end_unit(body);
        Ok(())
    }

    fn assignment(&mut self) -> Result<(), CompileError> {
        let name_at = self.scanner.pos();
        let name = self.scanner.word();
        self.check_binding_name(name, name_at)?;
        self.scanner.skip_whitespace();
        self.scanner.expect(b'=', "`=`")?;

        match self.symbols.resolve(name) {
            Some(id) => {
                self.out.assign(id);
                self.expression()
            }
            None => {
                let id = self.symbols.allocate();
                self.out.assign(id);
                self.expression()?;
                self.symbols.bind(name, id);
                Ok(())
            }
        }
    }

    fn check_binding_name(&self, name: &str, offset: usize) -> Result<(), CompileError> {
        if name.is_empty() {
            return Err(match self.scanner.current_char() {
                Some(_) => self.scanner.unexpected("a name"),
                None => CompileError::EmptyName { offset },
            });
        }
        if is_keyword(name) {
            return Err(CompileError::KeywordMisuse {
                keyword: name.to_owned(),
                offset,
            });
        }
        Ok(())
    }

    fn expression_statement(&mut self) -> Result<(), CompileError> {
        self.out.statement(StatementTag::Expression);
        let Some(host) = self.render_host else {
            return self.expression();
        };

        let at = self.scanner.pos();
        self.out
            .host_call(host)
            .and_then(|out| out.arg("value"))
            .map_err(|e| nul_error(e, at))?;
        self.expression()?;
        self.out.end_args();
        Ok(())
    }

    /// `{ statements }` as a standalone unit. Returns the unit length.
    fn block(&mut self, binding: Option<(&str, VarId)>) -> Result<u32, CompileError> {
        self.scanner.skip_whitespace();
        let unit = self.out.begin_unit();
        self.block_body(binding)?;
        Ok(self.out.end_unit(unit))
    }

    /// Scan `{ statements }` into an already opened unit.
    fn block_body(&mut self, binding: Option<(&str, VarId)>) -> Result<(), CompileError> {
        let open = self.scanner.pos();
        self.scanner.expect(b'{', "`{`")?;

        self.symbols.push_scope();
        if let Some((name, id)) = binding {
            self.symbols.bind(name, id);
        }

        let result = self.block_statements(open);
        self.symbols.pop_scope();
        result
    }

    fn block_statements(&mut self, open: usize) -> Result<(), CompileError> {
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.eat(b'}') {
                return Ok(());
            }
            if self.scanner.at_end() {
                return Err(CompileError::Unclosed {
                    delimiter: '}',
                    offset: open,
                });
            }
            self.statement()?;
        }
    }

    fn expression(&mut self) -> Result<(), CompileError> {
        self.enter_recursion()?;
        let result = self.expression_inner();
        self.exit_recursion();
        result
    }

    fn expression_inner(&mut self) -> Result<(), CompileError> {
        self.scanner.skip_whitespace();
        let start = self.scanner.pos();

        if self.scanner.at_scope(HOST_SCOPE) {
            return self.host_call();
        }
        if self.scanner.at_scope(PARAMETER_SCOPE) {
            return self.parameter();
        }

        match self.scanner.peek() {
            Some(b'"') => return self.string_literal(),
            Some(b'[') => return self.array_literal(),
            Some(b'{') => {
                let unit = self.out.begin_function();
                self.block_body(None)?;
                self.out.end_unit(unit);
                return Ok(());
            }
            Some(b) if starts_number(b, self.scanner.peek_at(1)) => return self.number_literal(),
            _ => {}
        }

        match self.scanner.peek_word() {
            "true" => self.keyword_literal(Value::Boolean(true)),
            "false" => self.keyword_literal(Value::Boolean(false)),
            "nil" => self.keyword_literal(Value::Nil),
            word if !word.is_empty() && !is_keyword(word) => match self.symbols.resolve(word) {
                Some(id) => self.variable(id),
                None => Err(CompileError::InvalidExpression { offset: start }),
            },
            _ => Err(CompileError::InvalidExpression { offset: start }),
        }
    }

    fn keyword_literal(&mut self, value: Value) -> Result<(), CompileError> {
        self.scanner.word();
        self.out.literal(&value);
        Ok(())
    }

    /// Bound word: a local call when followed by `(`, a reference otherwise.
    fn variable(&mut self, id: VarId) -> Result<(), CompileError> {
        self.scanner.word();

        let after = self.scanner.pos();
        self.scanner.skip_whitespace();
        if self.scanner.peek() == Some(b'(') {
            self.out.local_call(id);
            return self.arguments();
        }

        self.scanner.reset(after);
        self.out.var_ref(id);
        Ok(())
    }

    /// `Swift.<name>(<args>)`
    fn host_call(&mut self) -> Result<(), CompileError> {
        self.scanner.word();
        self.scanner.bump();

        let name_at = self.scanner.pos();
        let name = self.scanner.word();
        if name.is_empty() {
            return Err(CompileError::EmptyName { offset: name_at });
        }
        self.out.host_call(name).map_err(|e| nul_error(e, name_at))?;

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'(') {
            return Err(self.scanner.unexpected("`(` to open the argument list"));
        }
        self.arguments()
    }

    /// `( key: expr, ... )`, including the terminator.
    fn arguments(&mut self) -> Result<(), CompileError> {
        let open = self.scanner.pos();
        self.scanner.expect(b'(', "`(`")?;
        self.scanner.skip_whitespace();

        if !self.scanner.eat(b')') {
            loop {
                self.scanner.skip_whitespace();
                let key_at = self.scanner.pos();
                let key = self.scanner.word();
                if key.is_empty() {
                    if self.scanner.at_end() {
                        return Err(CompileError::Unclosed {
                            delimiter: ')',
                            offset: open,
                        });
                    }
                    return Err(CompileError::MalformedArguments { offset: key_at });
                }
                self.out.arg(key).map_err(|e| nul_error(e, key_at))?;

                self.scanner.skip_whitespace();
                if !self.scanner.eat(b':') {
                    return Err(CompileError::MalformedArguments {
                        offset: self.scanner.pos(),
                    });
                }
                self.expression()?;

                self.scanner.skip_whitespace();
                if self.scanner.eat(b',') {
                    continue;
                }
                if self.scanner.eat(b')') {
                    break;
                }
                if self.scanner.at_end() {
                    return Err(CompileError::Unclosed {
                        delimiter: ')',
                        offset: open,
                    });
                }
                return Err(self.scanner.unexpected("`,` or `)`"));
            }
        }

        self.out.end_args();
        Ok(())
    }

    /// `Parameters.<name>`
    fn parameter(&mut self) -> Result<(), CompileError> {
        self.scanner.word();
        self.scanner.bump();

        let name_at = self.scanner.pos();
        let name = self.scanner.word();
        if name.is_empty() {
            return Err(CompileError::EmptyParameterName { offset: name_at });
        }
        self.out
            .param_ref(name)
            .map_err(|e| nul_error(e, name_at))?;
        Ok(())
    }

    fn string_literal(&mut self) -> Result<(), CompileError> {
        let open = self.scanner.pos();
        self.scanner.bump();

        let mut bytes = Vec::new();
        let mut segment = self.scanner.pos();
        loop {
            match self.scanner.peek() {
                None => {
                    return Err(CompileError::Unclosed {
                        delimiter: '"',
                        offset: open,
                    });
                }
                Some(b'"') => {
                    let end = self.scanner.pos();
                    bytes.extend_from_slice(self.scanner.slice(segment, end).as_bytes());
                    self.scanner.bump();
                    break;
                }
                Some(b'\\') => match self.scanner.peek_at(1) {
                    Some(escaped @ (b'"' | b'\\')) => {
                        let end = self.scanner.pos();
                        bytes.extend_from_slice(self.scanner.slice(segment, end).as_bytes());
                        bytes.push(escaped);
                        self.scanner.bump();
                        self.scanner.bump();
                        segment = self.scanner.pos();
                    }
                    // Other escapes are kept verbatim.
                    Some(next) if next.is_ascii() => {
                        self.scanner.bump();
                        self.scanner.bump();
                    }
                    _ => self.scanner.bump(),
                },
                Some(_) => self.scanner.bump(),
            }
        }

        self.out.literal(&Value::String(bytes));
        Ok(())
    }

    fn array_literal(&mut self) -> Result<(), CompileError> {
        let open = self.scanner.pos();
        self.scanner.bump();
        self.out.begin_array();

        self.scanner.skip_whitespace();
        if !self.scanner.eat(b']') {
            loop {
                if self.scanner.at_end() {
                    return Err(CompileError::Unclosed {
                        delimiter: ']',
                        offset: open,
                    });
                }
                self.expression()?;

                self.scanner.skip_whitespace();
                if self.scanner.eat(b',') {
                    self.scanner.skip_whitespace();
                    continue;
                }
                if self.scanner.eat(b']') {
                    break;
                }
                if self.scanner.at_end() {
                    return Err(CompileError::Unclosed {
                        delimiter: ']',
                        offset: open,
                    });
                }
                return Err(self.scanner.unexpected("`,` or `]`"));
            }
        }

        self.out.end_array();
        Ok(())
    }

    fn number_literal(&mut self) -> Result<(), CompileError> {
        let start = self.scanner.pos();
        self.scanner.bump();
        while let Some(b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-') = self.scanner.peek() {
            self.scanner.bump();
        }

        let text = self.scanner.slice(start, self.scanner.pos());
        let value: f64 = text.parse().map_err(|_| CompileError::InvalidNumber {
            text: text.to_owned(),
            offset: start,
        })?;
        self.out.literal(&Value::Double(value));
        Ok(())
    }
}

fn starts_number(first: u8, second: Option<u8>) -> bool {
    first.is_ascii_digit() || (first == b'-' && second.is_some_and(|b| b.is_ascii_digit()))
}

fn nul_error(err: CodecError, offset: usize) -> CompileError {
    match err {
        CodecError::InteriorNul { position } => CompileError::NulInName {
            offset: offset + position,
        },
        _ => CompileError::NulInName { offset },
    }
}
