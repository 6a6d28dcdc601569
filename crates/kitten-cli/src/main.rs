mod cli;
mod commands;

use cli::{CompileParams, DumpParams, RenderParams, RunParams, TraceParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("compile", m)) => {
            let params = CompileParams::from_matches(m);
            commands::compile::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("run", m)) => {
            let params = RunParams::from_matches(m);
            commands::run::run(params.into());
        }
        Some(("trace", m)) => {
            let params = TraceParams::from_matches(m);
            commands::trace::run(params.into());
        }
        Some(("render", m)) => {
            let params = RenderParams::from_matches(m);
            commands::render::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
