use indoc::indoc;
use kitten_core::Colors;

use super::{Bindings, HostFunctions, Parameters, PrintTracer, VM, Verbosity};

fn trace(source: &str, verbosity: Verbosity, colors: Colors) -> String {
    let bytes = kitten_compiler::compile(source).unwrap();
    let host = HostFunctions::new()
        .with("tick", |_, _| Ok(None))
        .with("echo", |args, _| Ok(args.get("value").cloned()));
    let mut tracer = PrintTracer::new(verbosity, colors);
    VM::builder()
        .build()
        .execute_with(&bytes, &Parameters::new(), Bindings::new(), &host, &mut tracer)
        .unwrap();
    tracer.format()
}

#[test]
fn default_shows_statements_host_calls_and_returns() {
    let source = indoc! {r#"
        for x in [true] {
            Swift.tick()
        }
        return "done"
    "#};
    insta::assert_snapshot!(trace(source, Verbosity::Default, Colors::OFF), @r#"
    0004 for
    0004   expr
             -> tick()
    0030 return
           => "done"
    "#);
}

#[test]
fn verbose_shows_assignments_and_calls() {
    let source = indoc! {"
        f = {
            return Parameters.n
        }
        y = f(n: true)
    "};
    insta::assert_snapshot!(trace(source, Verbosity::Verbose, Colors::OFF), @r"
    0004 assign
           v1 = <function 9 bytes>
    0020 assign
           call v1
    0004   return
             => true
           v2 = true
    ");
}

#[test]
fn very_verbose_shows_expressions() {
    insta::assert_snapshot!(
        trace("return Swift.echo(value: 1)", Verbosity::VeryVerbose, Colors::OFF),
        @r"
    0004 return
    0005   host
    0017   literal
           -> echo(value: 1)
           <- echo 1
           => 1
    "
    );
}

#[test]
fn verbose_marks_branches_and_iterations() {
    let source = indoc! {"
        for x in [1, 2] {
            if true { }
        }
    "};
    let out = trace(source, Verbosity::Verbose, Colors::OFF);
    assert!(out.contains("iteration 0"));
    assert!(out.contains("iteration 1"));
    assert_eq!(out.matches("branch").count(), 2);

    let out = trace(source, Verbosity::Default, Colors::OFF);
    assert!(!out.contains("iteration"));
    assert!(!out.contains("branch"));
}

#[test]
fn colored_output() {
    let out = trace("return true", Verbosity::Default, Colors::ON);
    assert!(out.contains("\x1b[34mreturn\x1b[0m"));
    assert!(out.contains("\x1b[32mtrue\x1b[0m"));
}
