//! Trace script execution for debugging.

use kitten_lib::{Bindings, Colors, FuelLimits, PrintTracer, Verbosity};

use super::run_common::{self, ScriptInput};

pub struct TraceArgs {
    pub input: ScriptInput,
    pub params: Vec<String>,
    pub limits: FuelLimits,
    pub verbosity: Verbosity,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let script = run_common::load_script(&args.input, args.color)
        .unwrap_or_else(|e| run_common::fail(e));
    let params = run_common::parse_params(&args.params).unwrap_or_else(|e| run_common::fail(e));
    let host = run_common::builtin_host();

    let vm = run_common::build_vm(args.limits);
    let colors = Colors::new(args.color);
    let mut tracer = PrintTracer::new(args.verbosity, colors);

    let outcome = match script.trace(vm, &params, Bindings::new(), &host, &mut tracer) {
        Ok(outcome) => {
            tracer.print();
            outcome
        }
        Err(e) => {
            tracer.print();
            run_common::runtime_failure(e);
        }
    };

    println!("{}---{}", colors.dim, colors.reset);
    run_common::print_outcome(&outcome, colors);
}
