//! Render a template.

use kitten_lib::{Bindings, FuelLimits, TemplateConfig};

use super::run_common::{self, ScriptInput};

pub struct RenderArgs {
    pub input: ScriptInput,
    pub params: Vec<String>,
    pub config: TemplateConfig,
    pub limits: FuelLimits,
    pub color: bool,
}

pub fn run(args: RenderArgs) {
    let template = run_common::load_template(&args.input, &args.config, args.color)
        .unwrap_or_else(|e| run_common::fail(e));
    let params = run_common::parse_params(&args.params).unwrap_or_else(|e| run_common::fail(e));
    let host = run_common::builtin_host();

    let vm = run_common::build_vm(args.limits);
    match template.render_on(vm, &params, Bindings::new(), &host) {
        Ok(text) => print!("{}", text),
        Err(e) => run_common::runtime_failure(e),
    }
}
