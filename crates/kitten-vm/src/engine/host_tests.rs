use kitten_bytecode::{Value, VarId};

use super::host::{Arguments, Bindings, HostContext, HostFunctions, Parameters};
use super::scope::ScopeArena;

#[test]
fn register_replaces_existing_function() {
    let mut host = HostFunctions::new();
    host.register("f", |_, _| Ok(Some(Value::Boolean(false))));
    host.register("f", |_, _| Ok(Some(Value::Boolean(true))));
    assert_eq!(host.len(), 1);

    let mut arena = ScopeArena::new();
    let root = arena.root(Bindings::new(), Parameters::new());
    let mut output = String::new();
    let mut ctx = HostContext::new("f", &arena, root, &mut output);
    let f = host.get("f").unwrap();
    assert_eq!(f(Arguments::new(), &mut ctx).unwrap(), Some(Value::Boolean(true)));
}

#[test]
fn clone_layers_over_shared_functions() {
    let base = HostFunctions::new()
        .with("render", |_, _| Ok(None))
        .with("echo", |_, _| Ok(None));
    let mut layered = base.clone();
    layered.register("extra", |_, _| Ok(None));

    assert_eq!(base.names(), ["echo", "render"]);
    assert_eq!(layered.names(), ["echo", "extra", "render"]);
    assert!(!base.contains("extra"));
    assert_eq!(format!("{layered:?}"), r#"{"echo", "extra", "render"}"#);
}

#[test]
fn context_exposes_scope_parameters_and_output() {
    let mut arena = ScopeArena::new();
    let mut bindings = Bindings::new();
    bindings.insert(VarId(3), Value::Double(1.5));
    let mut params = Parameters::new();
    params.insert("user".into(), Value::from("cat"));
    let root = arena.root(bindings, params);
    let child = arena.child(root);

    let mut output = String::from(">");
    let mut ctx = HostContext::new("print", &arena, child, &mut output);
    assert_eq!(ctx.name(), "print");
    assert_eq!(ctx.lookup(VarId(3)), Some(&Value::Double(1.5)));
    assert_eq!(ctx.parameter("user"), Some(&Value::from("cat")));
    assert_eq!(ctx.parameters().len(), 1);

    ctx.write_str(" a");
    ctx.write_value(&Value::Array(vec![Value::from(" b"), Value::Nil, Value::Boolean(true)]));
    assert_eq!(ctx.output(), "> a btrue");
    assert_eq!(output, "> a btrue");
}
