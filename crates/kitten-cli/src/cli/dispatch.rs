//! Extraction of typed parameters from `ArgMatches`.
//!
//! `*Params` mirror what a command reads from the command line; the `From`
//! impls turn them into the argument structs the commands run with.

use std::path::PathBuf;

use clap::ArgMatches;
use kitten_lib::{FuelLimits, TemplateConfig, Verbosity};

use super::ColorChoice;
use crate::commands::compile::CompileArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::render::RenderArgs;
use crate::commands::run::RunArgs;
use crate::commands::run_common::ScriptInput;
use crate::commands::trace::TraceArgs;

pub struct CompileParams {
    pub script_path: Option<PathBuf>,
    pub eval: Option<String>,
    pub output: Option<PathBuf>,
    pub color: ColorChoice,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            script_path: m.get_one::<PathBuf>("script_path").cloned(),
            eval: m.get_one::<String>("eval").cloned(),
            output: m.get_one::<PathBuf>("output").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        Self {
            input: ScriptInput {
                path: p.script_path,
                text: p.eval,
                bytecode: None,
            },
            output: p.output,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub script_path: Option<PathBuf>,
    pub eval: Option<String>,
    pub bytecode: Option<PathBuf>,
    pub color: ColorChoice,
    // Runtime flags are parsed but not extracted
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            script_path: m.get_one::<PathBuf>("script_path").cloned(),
            eval: m.get_one::<String>("eval").cloned(),
            bytecode: m.get_one::<PathBuf>("bytecode").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            input: ScriptInput {
                path: p.script_path,
                text: p.eval,
                bytecode: p.bytecode,
            },
            color: p.color.should_colorize(),
        }
    }
}

pub struct RunParams {
    pub script_path: Option<PathBuf>,
    pub eval: Option<String>,
    pub bytecode: Option<PathBuf>,
    pub params: Vec<String>,
    pub fuel: Option<u32>,
    pub recursion_limit: u32,
    pub color: ColorChoice,
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            script_path: m.get_one::<PathBuf>("script_path").cloned(),
            eval: m.get_one::<String>("eval").cloned(),
            bytecode: m.get_one::<PathBuf>("bytecode").cloned(),
            params: parse_params(m),
            fuel: m.get_one::<u32>("fuel").copied(),
            recursion_limit: parse_recursion_limit(m),
            color: parse_color(m),
        }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self {
            input: ScriptInput {
                path: p.script_path,
                text: p.eval,
                bytecode: p.bytecode,
            },
            params: p.params,
            limits: limits(p.fuel, p.recursion_limit),
            color: p.color.should_colorize(),
        }
    }
}

pub struct TraceParams {
    pub script_path: Option<PathBuf>,
    pub eval: Option<String>,
    pub bytecode: Option<PathBuf>,
    pub params: Vec<String>,
    pub fuel: Option<u32>,
    pub recursion_limit: u32,
    pub verbose: u8,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            script_path: m.get_one::<PathBuf>("script_path").cloned(),
            eval: m.get_one::<String>("eval").cloned(),
            bytecode: m.get_one::<PathBuf>("bytecode").cloned(),
            params: parse_params(m),
            fuel: m.get_one::<u32>("fuel").copied(),
            recursion_limit: parse_recursion_limit(m),
            verbose: m.get_count("verbose"),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        let verbosity = match p.verbose {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        };

        Self {
            input: ScriptInput {
                path: p.script_path,
                text: p.eval,
                bytecode: p.bytecode,
            },
            params: p.params,
            limits: limits(p.fuel, p.recursion_limit),
            verbosity,
            color: p.color.should_colorize(),
        }
    }
}

pub struct RenderParams {
    pub template_path: Option<PathBuf>,
    pub eval: Option<String>,
    pub params: Vec<String>,
    pub open: String,
    pub close: String,
    pub fuel: Option<u32>,
    pub recursion_limit: u32,
    pub color: ColorChoice,
}

impl RenderParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let defaults = TemplateConfig::default();
        Self {
            template_path: m.get_one::<PathBuf>("script_path").cloned(),
            eval: m.get_one::<String>("eval").cloned(),
            params: parse_params(m),
            open: m.get_one::<String>("open").cloned().unwrap_or(defaults.open),
            close: m.get_one::<String>("close").cloned().unwrap_or(defaults.close),
            fuel: m.get_one::<u32>("fuel").copied(),
            recursion_limit: parse_recursion_limit(m),
            color: parse_color(m),
        }
    }
}

impl From<RenderParams> for RenderArgs {
    fn from(p: RenderParams) -> Self {
        Self {
            input: ScriptInput {
                path: p.template_path,
                text: p.eval,
                bytecode: None,
            },
            params: p.params,
            config: TemplateConfig::new(p.open, p.close),
            limits: limits(p.fuel, p.recursion_limit),
            color: p.color.should_colorize(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_params(m: &ArgMatches) -> Vec<String> {
    m.get_many::<String>("param")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn parse_recursion_limit(m: &ArgMatches) -> u32 {
    m.get_one::<u32>("recursion_limit")
        .copied()
        .unwrap_or_else(|| FuelLimits::default().get_recursion_limit())
}

fn limits(fuel: Option<u32>, recursion_limit: u32) -> FuelLimits {
    let limits = FuelLimits::new().recursion_limit(recursion_limit);
    match fuel {
        Some(fuel) => limits.exec_fuel(fuel),
        None => limits,
    }
}
