//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands,
//! visible or hidden (via `.hide(true)`).

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Script file (positional). `-` reads stdin.
pub fn script_path_arg() -> Arg {
    Arg::new("script_path")
        .value_name("SCRIPT")
        .value_parser(value_parser!(PathBuf))
        .help("Script file (`-` for stdin)")
}

/// Inline script text (-e/--eval).
pub fn eval_arg() -> Arg {
    Arg::new("eval")
        .short('e')
        .long("eval")
        .value_name("TEXT")
        .conflicts_with("script_path")
        .help("Inline script text")
}

/// Precompiled bytecode file (--bytecode).
pub fn bytecode_arg() -> Arg {
    Arg::new("bytecode")
        .long("bytecode")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with_all(["script_path", "eval"])
        .help("Load precompiled bytecode instead of source")
}

/// Template file (positional). `-` reads stdin.
pub fn template_path_arg() -> Arg {
    Arg::new("script_path")
        .value_name("TEMPLATE")
        .value_parser(value_parser!(PathBuf))
        .help("Template file (`-` for stdin)")
}

/// Script parameter (--param NAME=JSON), repeatable.
pub fn param_arg() -> Arg {
    Arg::new("param")
        .short('p')
        .long("param")
        .value_name("NAME=JSON")
        .action(ArgAction::Append)
        .help("Script parameter; the value is JSON, bare words are taken as strings")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Code block opening delimiter (--open).
pub fn open_arg() -> Arg {
    Arg::new("open")
        .long("open")
        .value_name("DELIM")
        .default_value("{{>")
        .help("Template code block opening delimiter")
}

/// Code block closing delimiter (--close).
pub fn close_arg() -> Arg {
    Arg::new("close")
        .long("close")
        .value_name("DELIM")
        .default_value("<}}")
        .help("Template code block closing delimiter")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for verbose, -vv for very verbose)")
}

/// Execution fuel limit (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("Maximum statements to execute (unlimited by default)")
}

/// Nesting depth limit (--recursion-limit).
pub fn recursion_limit_arg() -> Arg {
    Arg::new("recursion_limit")
        .long("recursion-limit")
        .value_name("N")
        .default_value("256")
        .value_parser(value_parser!(u32))
        .help("Maximum nesting of blocks, expressions and local calls")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write bytecode to file (default: <SCRIPT>.ksb)")
}
