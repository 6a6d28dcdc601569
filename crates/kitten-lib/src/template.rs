//! Text templates with embedded Kitten code.
//!
//! Text outside the delimiters is emitted as calls to a private `render` host
//! function; code inside is compiled in template mode, where every bare
//! expression statement is rendered too. All fragments of one template share
//! a single compiler session, so a variable assigned in one code block is
//! visible in the blocks after it.

use std::path::Path;

use kitten_bytecode::{Args, StatementTag, UnitBuilder, Value};
use kitten_compiler::{CompileError, Compiler};
use kitten_core::CodecError;
use kitten_vm::{Arguments, Bindings, HostContext, HostError, HostFunctions, Parameters, VM};

use crate::{Result, Script, read_source};

/// Host function name the template output goes through.
pub const RENDER_HOST: &str = "render";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template delimiters must not be empty")]
    EmptyDelimiter,

    #[error("unclosed code block opened at offset {offset}")]
    Unclosed { offset: usize },

    /// `source` offsets are already relative to the whole template.
    #[error("code block at offset {offset}: {source}")]
    Compile { offset: usize, source: CompileError },

    #[error(transparent)]
    Encode(#[from] CodecError),
}

impl TemplateError {
    /// Render for display, with a source snippet when the error has a location.
    pub fn render(&self, template: &str, path: Option<&str>, colored: bool) -> String {
        match self {
            Self::Compile { source, .. } => source.render(template, path, colored),
            other => format!("error: {other}"),
        }
    }
}

/// Code block delimiters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateConfig {
    pub open: String,
    pub close: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            open: "{{>".to_owned(),
            close: "<}}".to_owned(),
        }
    }
}

impl TemplateConfig {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// A compiled template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    script: Script,
}

impl Template {
    /// Compile with the default `{{>` / `<}}` delimiters.
    pub fn compile(source: &str) -> std::result::Result<Self, TemplateError> {
        Self::with_config(source, &TemplateConfig::default())
    }

    pub fn with_config(
        source: &str,
        config: &TemplateConfig,
    ) -> std::result::Result<Self, TemplateError> {
        let bytecode = translate(source, config)?;
        Ok(Self {
            script: Script::from_validated(bytecode),
        })
    }

    pub fn from_path(path: impl AsRef<Path>, config: &TemplateConfig) -> Result<Self> {
        let source = read_source(path.as_ref())?;
        Ok(Self::with_config(&source, config)?)
    }

    /// The compiled template as a script.
    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn render(&self, parameters: &Parameters, host: &HostFunctions) -> Result<String> {
        self.render_with(parameters, Bindings::new(), host)
    }

    pub fn render_with(
        &self,
        parameters: &Parameters,
        bindings: Bindings,
        host: &HostFunctions,
    ) -> Result<String> {
        self.render_on(VM::builder().build(), parameters, bindings, host)
    }

    /// Render on a configured VM.
    ///
    /// The template's own `render` function replaces any host function of
    /// that name for this run.
    pub fn render_on(
        &self,
        vm: VM,
        parameters: &Parameters,
        bindings: Bindings,
        host: &HostFunctions,
    ) -> Result<String> {
        let mut host = host.clone();
        host.register(RENDER_HOST, render);
        let outcome = self.script.run_with(vm, parameters, bindings, &host)?;
        Ok(outcome.output)
    }
}

fn render(
    args: Arguments,
    ctx: &mut HostContext<'_>,
) -> std::result::Result<Option<Value>, HostError> {
    for value in args.values() {
        ctx.write_value(value);
    }
    Ok(None)
}

fn translate(source: &str, config: &TemplateConfig) -> std::result::Result<Vec<u8>, TemplateError> {
    if config.open.is_empty() || config.close.is_empty() {
        return Err(TemplateError::EmptyDelimiter);
    }

    let mut compiler = Compiler::new().render_expressions(RENDER_HOST);
    let mut out = UnitBuilder::new();
    let mut pos = 0;

    while pos < source.len() {
        let rest = &source[pos..];
        let Some(open) = rest.find(&config.open) else {
            text(&mut out, rest)?;
            break;
        };
        text(&mut out, &rest[..open])?;

        let code_at = pos + open + config.open.len();
        let Some(close) = source[code_at..].find(&config.close) else {
            return Err(TemplateError::Unclosed { offset: pos + open });
        };
        let code = &source[code_at..code_at + close];
        let bytes = compiler
            .compile_statements(code)
            .map_err(|err| TemplateError::Compile {
                offset: code_at,
                source: err.shifted(code_at),
            })?;
        out.raw(&bytes);

        pos = code_at + close + config.close.len();
    }

    Ok(out.finish())
}

/// `render(value: "<text>")` as an expression statement.
fn text(out: &mut UnitBuilder, text: &str) -> std::result::Result<(), TemplateError> {
    if text.is_empty() {
        return Ok(());
    }
    out.statement(StatementTag::Expression);
    out.host_call_with(RENDER_HOST, &Args::new().with("value", text))?;
    Ok(())
}
