//! Show compiled bytecode.

use kitten_lib::Colors;

use super::run_common::{self, ScriptInput};

pub struct DumpArgs {
    pub input: ScriptInput,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let script = run_common::load_script(&args.input, args.color)
        .unwrap_or_else(|e| run_common::fail(e));

    match script.dump(Colors::new(args.color)) {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
