//! Compile a script to a bytecode file.

use std::path::PathBuf;

use super::run_common::{self, InputError, ScriptInput};

pub struct CompileArgs {
    pub input: ScriptInput,
    pub output: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: CompileArgs) {
    let script = run_common::load_script(&args.input, args.color)
        .unwrap_or_else(|e| run_common::fail(e));

    let Some(output) = output_path(&args) else {
        eprintln!("error: -o/--output is required when compiling inline text");
        std::process::exit(1);
    };

    if let Err(source) = std::fs::write(&output, script.bytes()) {
        run_common::fail(InputError::Read {
            path: output,
            source,
        });
    }
    eprintln!("wrote {} bytes to {}", script.bytes().len(), output.display());
}

/// Explicit `-o`, or the script path with a `.ksb` extension.
pub fn output_path(args: &CompileArgs) -> Option<PathBuf> {
    if let Some(output) = &args.output {
        return Some(output.clone());
    }
    let path = args.input.path.as_ref()?;
    if path.as_os_str() == "-" {
        return None;
    }
    Some(path.with_extension("ksb"))
}
