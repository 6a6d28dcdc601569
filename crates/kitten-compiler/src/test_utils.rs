//! Test helpers shared by the compiler test modules.

use kitten_core::Colors;

/// Compile `source` and return its disassembly, panicking with the rendered
/// diagnostic if it does not compile.
pub fn expect_dump(source: &str) -> String {
    let bytes = match crate::compile(source) {
        Ok(bytes) => bytes,
        Err(err) => panic!("expected valid script:\n{}", err.render(source, None, false)),
    };
    kitten_bytecode::dump(&bytes, Colors::OFF).expect("compiled bytecode decodes")
}

/// Compile `source` expecting failure; returns the error.
pub fn expect_error(source: &str) -> crate::CompileError {
    match crate::compile(source) {
        Ok(bytes) => panic!(
            "expected compile error, got:\n{}",
            kitten_bytecode::dump(&bytes, Colors::OFF).unwrap_or_default()
        ),
        Err(err) => err,
    }
}
