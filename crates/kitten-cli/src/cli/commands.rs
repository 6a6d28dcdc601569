//! Command builders for the CLI.
//!
//! Each command is built from the shared arg builders in `args.rs`. Commands
//! that take a script accept every runtime flag, with the ones they ignore
//! hidden from `--help`, so a command line can be switched between `dump`,
//! `run` and `trace` without editing flags.

use clap::Command;

use super::args::*;

/// Add hidden runtime args (for commands that don't execute).
fn with_hidden_runtime_args(cmd: Command) -> Command {
    cmd.arg(param_arg().hide(true))
        .arg(fuel_arg().hide(true))
        .arg(recursion_limit_arg().hide(true))
        .arg(verbose_arg().hide(true))
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("kitten")
        .about("Compile, inspect, run and trace Kitten scripts and templates")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(compile_command())
        .subcommand(dump_command())
        .subcommand(run_command())
        .subcommand(trace_command())
        .subcommand(render_command())
}

/// Compile a script to a bytecode file.
pub fn compile_command() -> Command {
    let cmd = Command::new("compile")
        .about("Compile a script to bytecode")
        .override_usage(
            "\
  kitten compile <SCRIPT> [-o <FILE>]
  kitten compile -e <TEXT> -o <FILE>",
        )
        .after_help(
            r#"EXAMPLES:
  kitten compile main.kitten              # writes main.ksb
  kitten compile main.kitten -o out.ksb
  kitten compile -e 'return true' -o t.ksb"#,
        )
        .arg(script_path_arg())
        .arg(eval_arg())
        .arg(output_file_arg())
        .arg(color_arg());

    with_hidden_runtime_args(cmd)
}

/// Show compiled bytecode.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Show compiled bytecode")
        .override_usage(
            "\
  kitten dump <SCRIPT>
  kitten dump -e <TEXT>
  kitten dump --bytecode <FILE>",
        )
        .after_help(
            r#"EXAMPLES:
  kitten dump main.kitten
  kitten dump -e 'if true { return 1 }'
  kitten dump --bytecode main.ksb"#,
        )
        .arg(script_path_arg())
        .arg(eval_arg())
        .arg(bytecode_arg())
        .arg(color_arg());

    with_hidden_runtime_args(cmd)
}

/// Run a script.
pub fn run_command() -> Command {
    Command::new("run")
        .about("Run a script and print its output and returned value")
        .override_usage(
            "\
  kitten run <SCRIPT> [--param NAME=JSON]...
  kitten run -e <TEXT> [--param NAME=JSON]...
  kitten run --bytecode <FILE> [--param NAME=JSON]...",
        )
        .after_help(
            r#"EXAMPLES:
  kitten run main.kitten
  kitten run main.kitten --param name='"World"' --param count=3
  kitten run -e 'return Parameters.name' --param name=cat
  kitten run -e 'Swift.print(value: "hi")'

HOST FUNCTIONS:
  Swift.print(..)   write the arguments to the output
  Swift.debug(..)   write the arguments to stderr"#,
        )
        .arg(script_path_arg())
        .arg(eval_arg())
        .arg(bytecode_arg())
        .arg(param_arg())
        .arg(fuel_arg())
        .arg(recursion_limit_arg())
        .arg(color_arg())
        .arg(verbose_arg().hide(true))
}

/// Trace script execution.
pub fn trace_command() -> Command {
    Command::new("trace")
        .about("Trace script execution for debugging")
        .override_usage(
            "\
  kitten trace <SCRIPT> [--param NAME=JSON]... [-v|-vv]
  kitten trace -e <TEXT> [--param NAME=JSON]... [-v|-vv]
  kitten trace --bytecode <FILE> [--param NAME=JSON]... [-v|-vv]",
        )
        .after_help(
            r#"EXAMPLES:
  kitten trace main.kitten
  kitten trace main.kitten -v             # assignments, scopes, host results
  kitten trace main.kitten -vv            # every expression
  kitten trace main.kitten --fuel 1000"#,
        )
        .arg(script_path_arg())
        .arg(eval_arg())
        .arg(bytecode_arg())
        .arg(param_arg())
        .arg(fuel_arg())
        .arg(recursion_limit_arg())
        .arg(verbose_arg())
        .arg(color_arg())
}

/// Render a template.
pub fn render_command() -> Command {
    Command::new("render")
        .about("Render a template")
        .override_usage(
            "\
  kitten render <TEMPLATE> [--param NAME=JSON]...
  kitten render -e <TEXT> [--param NAME=JSON]...",
        )
        .after_help(
            r#"EXAMPLES:
  kitten render page.tpl --param title=Home
  kitten render -e 'Hello, {{> Parameters.name <}}!' --param name=World
  kitten render page.tpl --open '<%' --close '%>'"#,
        )
        .arg(template_path_arg())
        .arg(eval_arg())
        .arg(param_arg())
        .arg(open_arg())
        .arg(close_arg())
        .arg(fuel_arg())
        .arg(recursion_limit_arg())
        .arg(color_arg())
        .arg(verbose_arg().hide(true))
}
