use crate::error::DecodeError;
use crate::value::{Function, Value, ValueKind};

fn func() -> Function {
    Function::from_unit(vec![6, 0, 0, 0, 0, 0]).unwrap()
}

#[test]
fn kinds() {
    assert_eq!(Value::Nil.kind(), ValueKind::Nil);
    assert_eq!(Value::from("s").kind(), ValueKind::String);
    assert_eq!(Value::from(1.0).kind(), ValueKind::Double);
    assert_eq!(Value::from(true).kind(), ValueKind::Boolean);
    assert_eq!(Value::from(func()).kind(), ValueKind::Function);
    assert_eq!(Value::from(vec![]).kind(), ValueKind::Array);
    assert_eq!(ValueKind::Boolean.to_string(), "boolean");
}

#[test]
fn function_requires_valid_unit() {
    let err = Function::from_unit(vec![9, 0, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, DecodeError::LengthMismatch { declared: 9, .. }));
}

#[test]
fn encode_scalars() {
    let mut out = Vec::new();
    Value::Nil.encode_literal(&mut out);
    Value::from(false).encode_literal(&mut out);
    Value::from("hi").encode_literal(&mut out);
    assert_eq!(out, [0x00, 0x03, 0x00, 0x01, 2, 0, 0, 0, b'h', b'i']);

    let mut out = Vec::new();
    Value::from(-2.5).encode_literal(&mut out);
    assert_eq!(out[0], 0x02);
    assert_eq!(&out[1..], &(-2.5f64).to_le_bytes());
}

#[test]
fn encode_array_elements_as_literal_expressions() {
    let mut out = Vec::new();
    Value::from(vec![true.into(), Value::Nil]).encode_literal(&mut out);
    assert_eq!(out, [0x05, 0x03, 0x03, 0x01, 0x03, 0x00, 0x00]);
}

#[test]
fn encode_function_embeds_unit() {
    let mut out = Vec::new();
    Value::from(func()).encode_literal(&mut out);
    assert_eq!(out, [0x04, 6, 0, 0, 0, 0, 0]);
}

#[test]
fn render_text() {
    let value = Value::from(vec![
        "a=".into(),
        1.5.into(),
        Value::Nil,
        true.into(),
        func().into(),
        Value::from(vec![" ".into(), 3.0.into()]),
    ]);
    assert_eq!(value.render(), "a=1.5true 3");
}

#[test]
fn render_lossy_utf8() {
    let value = Value::String(vec![b'o', b'k', 0xFF]);
    assert_eq!(value.render(), "ok\u{FFFD}");
}

#[test]
fn display() {
    let value = Value::from(vec!["x".into(), 2.0.into(), Value::Nil, func().into()]);
    assert_eq!(value.to_string(), r#"["x", 2, nil, <function 6 bytes>]"#);
}

#[test]
fn serialize_json() {
    let value = Value::from(vec![
        "x".into(),
        0.5.into(),
        false.into(),
        Value::Nil,
        func().into(),
    ]);
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(json, r#"["x",0.5,false,null,{"$function":6}]"#);
}

#[test]
fn accessors() {
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert_eq!(Value::from("s").as_bool(), None);
    assert_eq!(Value::from(4.0).as_double(), Some(4.0));
    assert_eq!(Value::from("s").as_str().as_deref(), Some("s"));
    assert_eq!(Value::from(vec![]).as_array(), Some(&[][..]));
    assert!(Value::from(func()).as_function().is_some());
    assert!(Value::Nil.is_nil());
}
