//! Shared logic for the script commands: input loading, parameters, the
//! built-in host functions and result printing.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use kitten_lib::{
    Colors, FuelLimits, HostFunctions, Outcome, Parameters, Script, Template, TemplateConfig,
    VM, Value,
};

/// Where a script comes from. At most one field is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptInput {
    pub path: Option<PathBuf>,
    pub text: Option<String>,
    pub bytecode: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("script is required: use a positional path, -e/--eval, or --bytecode")]
    Missing,

    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    /// Already rendered with a source snippet.
    #[error("{0}")]
    Diagnostic(String),

    #[error("invalid bytecode in '{}': {source}", path.display())]
    Bytecode {
        path: PathBuf,
        source: kitten_lib::Error,
    },

    #[error("--param expects NAME=VALUE, got `{0}`")]
    ParamSyntax(String),

    #[error("--param {name}: JSON objects are not supported")]
    ParamObject { name: String },
}

/// Print `err` to stderr and exit with status 1.
pub fn fail(err: InputError) -> ! {
    match err {
        InputError::Diagnostic(rendered) => eprintln!("{}", rendered.trim_end()),
        other => eprintln!("error: {}", other),
    }
    std::process::exit(1)
}

/// Read source text from inline text, a file, or stdin (`-`).
///
/// Returns the text and the display name used in diagnostics.
pub fn load_source(input: &ScriptInput) -> Result<(String, Option<String>), InputError> {
    if let Some(text) = &input.text {
        return Ok((text.clone(), None));
    }
    let Some(path) = &input.path else {
        return Err(InputError::Missing);
    };
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(InputError::Stdin)?;
        return Ok((buf, Some("<stdin>".to_owned())));
    }
    let text = read_file(path, |p| fs::read_to_string(p))?;
    Ok((text, Some(path.display().to_string())))
}

fn read_file<T>(
    path: &Path,
    read: impl FnOnce(&Path) -> io::Result<T>,
) -> Result<T, InputError> {
    read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Compile the script source or load precompiled bytecode.
pub fn load_script(input: &ScriptInput, color: bool) -> Result<Script, InputError> {
    if let Some(path) = &input.bytecode {
        let bytes = read_file(path, |p| fs::read(p))?;
        return Script::from_bytes(bytes).map_err(|source| InputError::Bytecode {
            path: path.clone(),
            source,
        });
    }

    let (source, name) = load_source(input)?;
    Script::compile(&source).map_err(|err| match err {
        kitten_lib::Error::Compile(err) => {
            InputError::Diagnostic(err.render(&source, name.as_deref(), color))
        }
        other => InputError::Diagnostic(format!("error: {other}")),
    })
}

pub fn load_template(
    input: &ScriptInput,
    config: &TemplateConfig,
    color: bool,
) -> Result<Template, InputError> {
    let (source, name) = load_source(input)?;
    Template::with_config(&source, config)
        .map_err(|err| InputError::Diagnostic(err.render(&source, name.as_deref(), color)))
}

/// Parse `NAME=VALUE` pairs. VALUE is read as JSON when it parses, and as a
/// plain string otherwise.
pub fn parse_params(raw: &[String]) -> Result<Parameters, InputError> {
    let mut params = Parameters::new();
    for pair in raw {
        let Some((name, value)) = pair.split_once('=') else {
            return Err(InputError::ParamSyntax(pair.clone()));
        };
        if name.is_empty() {
            return Err(InputError::ParamSyntax(pair.clone()));
        }
        let value = match serde_json::from_str::<serde_json::Value>(value) {
            Ok(json) => json_to_value(name, json)?,
            Err(_) => Value::from(value),
        };
        params.insert(name.to_owned(), value);
    }
    Ok(params)
}

fn json_to_value(name: &str, json: serde_json::Value) -> Result<Value, InputError> {
    use serde_json::Value as Json;

    Ok(match json {
        Json::Null => Value::Nil,
        Json::Bool(b) => Value::Boolean(b),
        Json::Number(n) => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::from(s),
        Json::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| json_to_value(name, item))
                .collect::<Result<_, _>>()?,
        ),
        Json::Object(_) => {
            return Err(InputError::ParamObject {
                name: name.to_owned(),
            });
        }
    })
}

/// Host functions available to scripts run from the command line.
pub fn builtin_host() -> HostFunctions {
    HostFunctions::new()
        .with("print", |args, ctx| {
            for (i, value) in args.values().enumerate() {
                if i > 0 {
                    ctx.write_str(" ");
                }
                ctx.write_value(value);
            }
            ctx.write_str("\n");
            Ok(None)
        })
        .with("debug", |args, _| {
            let fields: Vec<String> = args.iter().map(|(k, v)| format!("{k}={v}")).collect();
            eprintln!("debug: {}", fields.join(" "));
            Ok(None)
        })
}

pub fn build_vm(limits: FuelLimits) -> VM {
    VM::builder().limits(limits).build()
}

/// Print the host output, then the returned value as JSON.
pub fn print_outcome(outcome: &Outcome, colors: Colors) {
    print!("{}", outcome.output);
    let Some(value) = &outcome.value else {
        return;
    };
    if !outcome.output.is_empty() && !outcome.output.ends_with('\n') {
        println!();
    }
    println!("{}", colors.paint(colors.green, &value_json(value)));
}

pub fn value_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

/// Report a runtime failure and exit with status 2.
pub fn runtime_failure(err: kitten_lib::Error) -> ! {
    eprintln!("runtime error: {}", err);
    std::process::exit(2)
}
