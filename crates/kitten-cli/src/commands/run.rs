//! Run a script.

use kitten_lib::{Bindings, Colors, FuelLimits};

use super::run_common::{self, ScriptInput};

pub struct RunArgs {
    pub input: ScriptInput,
    pub params: Vec<String>,
    pub limits: FuelLimits,
    pub color: bool,
}

pub fn run(args: RunArgs) {
    let script = run_common::load_script(&args.input, args.color)
        .unwrap_or_else(|e| run_common::fail(e));
    let params = run_common::parse_params(&args.params).unwrap_or_else(|e| run_common::fail(e));
    let host = run_common::builtin_host();

    let vm = run_common::build_vm(args.limits);
    match script.run_with(vm, &params, Bindings::new(), &host) {
        Ok(outcome) => run_common::print_outcome(&outcome, Colors::new(args.color)),
        Err(e) => run_common::runtime_failure(e),
    }
}
