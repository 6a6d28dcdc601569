//! Human-readable bytecode disassembly.
//!
//! One instruction per line: decimal byte offset, then the instruction indented
//! by nesting depth. Argument keys get their own line with the value below.

use std::fmt::Write as _;

use kitten_core::Colors;

use crate::error::DecodeError;
use crate::instructions::{ExpressionTag, LiteralTag, StatementTag};
use crate::reader::Reader;
use crate::value::Value;

/// Deepest indentation level [`dump`] descends to.
pub const MAX_DUMP_DEPTH: usize = 512;

/// Disassemble a complete top-level unit.
pub fn dump(bytes: &[u8], colors: Colors) -> Result<String, DecodeError> {
    let body = Reader::unit_body(bytes)?;
    let mut d = Dumper {
        out: String::new(),
        colors,
    };
    d.line(0, 0, &format!("{} {}", d.tag("unit"), bytes.len()));
    d.statements(body, 1)?;
    Ok(d.out)
}

struct Dumper {
    out: String,
    colors: Colors,
}

impl Dumper {
    fn line(&mut self, offset: usize, depth: usize, text: &str) {
        let c = self.colors;
        let indent = "  ".repeat(depth);
        writeln!(self.out, "{}{offset:04}{} {indent}{text}", c.dim, c.reset)
            .expect("String write never fails");
    }

    fn tag(&self, name: &str) -> String {
        self.colors.paint(self.colors.blue, name)
    }

    fn lit(&self, value: &Value) -> String {
        self.colors.paint(self.colors.green, &value.to_string())
    }

    fn statements(&mut self, mut r: Reader<'_>, depth: usize) -> Result<(), DecodeError> {
        while !r.is_empty() {
            self.statement(&mut r, depth)?;
        }
        Ok(())
    }

    fn unit(&mut self, offset: usize, body: Reader<'_>, depth: usize) -> Result<(), DecodeError> {
        let len = body.remaining() + crate::header::MIN_UNIT_SIZE;
        self.line(offset, depth, &format!("{} {len}", self.tag("unit")));
        self.statements(body, depth + 1)
    }

    fn statement(&mut self, r: &mut Reader<'_>, depth: usize) -> Result<(), DecodeError> {
        let offset = r.offset();
        check_depth(depth, offset)?;
        let tag = r.statement_tag()?;
        let name = self.tag(tag.name());

        match tag {
            StatementTag::Null => self.line(offset, depth, &name),
            StatementTag::If => {
                self.line(offset, depth, &name);
                self.expression(r, depth + 1)?;

                let lens_at = r.offset();
                let true_len = r.u32()?;
                let false_len = r.u32()?;
                let text = format!("{} {true_len} {} {false_len}", self.tag("then"), self.tag("else"));
                self.line(lens_at, depth + 1, &text);

                let at = r.offset();
                let body = r.unit_of_len(true_len)?;
                self.unit(at, body, depth + 1)?;
                if false_len > 0 {
                    let at = r.offset();
                    let body = r.unit_of_len(false_len)?;
                    self.unit(at, body, depth + 1)?;
                }
            }
            StatementTag::ForIn => {
                let id = r.var_id()?;
                self.line(offset, depth, &format!("{name} {id}"));
                self.expression(r, depth + 1)?;
                self.expression(r, depth + 1)?;
            }
            StatementTag::Assign => {
                let id = r.var_id()?;
                self.line(offset, depth, &format!("{name} {id}"));
                self.expression(r, depth + 1)?;
            }
            StatementTag::Expression | StatementTag::Return => {
                self.line(offset, depth, &name);
                self.expression(r, depth + 1)?;
            }
        }
        Ok(())
    }

    fn expression(&mut self, r: &mut Reader<'_>, depth: usize) -> Result<(), DecodeError> {
        let offset = r.offset();
        check_depth(depth, offset)?;
        let tag = r.expression_tag()?;
        let name = self.tag(tag.name());

        match tag {
            ExpressionTag::LocalCall => {
                let id = r.var_id()?;
                self.line(offset, depth, &format!("{name} {id}"));
                self.args(r, depth + 1)
            }
            ExpressionTag::HostCall => {
                let callee = r.name()?;
                self.line(offset, depth, &format!("{name} {callee}"));
                self.args(r, depth + 1)
            }
            ExpressionTag::Literal => self.literal(r, offset, depth),
            ExpressionTag::VariableRef => {
                let id = r.var_id()?;
                self.line(offset, depth, &format!("{name} {id}"));
                Ok(())
            }
            ExpressionTag::ParameterRef => {
                let param = r.name()?;
                self.line(offset, depth, &format!("{name} {param}"));
                Ok(())
            }
            ExpressionTag::Result => {
                self.line(offset, depth, &name);
                self.expression(r, depth + 1)
            }
        }
    }

    fn args(&mut self, r: &mut Reader<'_>, depth: usize) -> Result<(), DecodeError> {
        while !r.end_of_list() {
            let offset = r.offset();
            let key = r.name()?;
            self.line(offset, depth, &format!("{key}:"));
            self.expression(r, depth + 1)?;
        }
        Ok(())
    }

    fn literal(&mut self, r: &mut Reader<'_>, offset: usize, depth: usize) -> Result<(), DecodeError> {
        let name = self.tag(ExpressionTag::Literal.name());
        let value = match r.literal_tag()? {
            LiteralTag::Nil => Value::Nil,
            LiteralTag::String => Value::String(r.sized()?.to_vec()),
            LiteralTag::Double => Value::Double(r.f64()?),
            LiteralTag::Boolean => Value::Boolean(r.boolean()?),
            LiteralTag::Function => {
                self.line(offset, depth, &format!("{name} {}", self.tag("function")));
                let at = r.offset();
                let body = r.unit()?;
                return self.unit(at, body, depth + 1);
            }
            LiteralTag::Array => {
                self.line(offset, depth, &format!("{name} {}", self.tag("array")));
                while !r.end_of_list() {
                    self.expression(r, depth + 1)?;
                }
                return Ok(());
            }
        };
        self.line(offset, depth, &format!("{name} {}", self.lit(&value)));
        Ok(())
    }
}

fn check_depth(depth: usize, offset: usize) -> Result<(), DecodeError> {
    if depth > MAX_DUMP_DEPTH {
        return Err(DecodeError::NestingTooDeep { offset });
    }
    Ok(())
}
