use indoc::indoc;
use kitten_bytecode::validate_unit;

use crate::compiler::{Compiler, NESTING_LIMIT};
use crate::error::CompileError;
use crate::test_utils::{expect_dump, expect_error};
use crate::{compile, compile_file};

#[test]
fn if_else_unit_header_matches_length() {
    let bytes = compile("if true { return true } else { return false }").unwrap();
    let declared = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    assert_eq!(declared as usize, bytes.len());
    assert!(validate_unit(&bytes).is_ok());
}

#[test]
fn if_else() {
    insta::assert_snapshot!(expect_dump("if true { return true } else { return false }"), @r"
    0000 unit 35
    0004   if
    0005     literal true
    0008     then 9 else 9
    0016     unit 9
    0020       return
    0021         literal true
    0025     unit 9
    0029       return
    0030         literal false
    ");
}

#[test]
fn if_without_else_has_zero_false_length() {
    let bytes = compile("if false { return nil }").unwrap();
    assert_eq!(&bytes[8..16], &[8, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn for_loop_body_is_function_literal() {
    let source = indoc! {"
        for x in [true, false] {
            Swift.tick()
            return x
        }
    "};
    insta::assert_snapshot!(expect_dump(source), @r"
    0000 unit 40
    0004   for v1
    0009     literal array
    0011       literal true
    0014       literal false
    0018     literal function
    0020       unit 19
    0024         expr
    0025           host tick
    0032         return
    0033           var v1
    ");
}

#[test]
fn assignment_reuses_enclosing_id() {
    let source = indoc! {"
        count = 0
        for x in [1, 2] {
            count = x
            inner = x
        }
        return count
    "};
    insta::assert_snapshot!(expect_dump(source), @r"
    0000 unit 81
    0004   assign v1
    0009     literal 0
    0019   for v2
    0024     literal array
    0026       literal 1
    0036       literal 2
    0047     literal function
    0049       unit 25
    0053         assign v1
    0058           var v2
    0063         assign v3
    0068           var v2
    0074   return
    0075     var v1
    ");
}

#[test]
fn inner_binding_is_not_visible_after_block() {
    let err = expect_error(indoc! {"
        for x in [1] {
            inner = x
        }
        return inner
    "});
    assert!(matches!(err, CompileError::InvalidExpression { .. }));
}

#[test]
fn host_call_with_string_and_parameter() {
    let source = r#"Swift.print(text: "say \"hi\"", who: Parameters.name)"#;
    insta::assert_snapshot!(expect_dump(source), @r#"
    0000 unit 43
    0004   expr
    0005     host print
    0012       text:
    0017         literal "say \"hi\""
    0031       who:
    0035         param name
    "#);
}

#[test]
fn function_literal_and_local_call() {
    let source = indoc! {r#"
        greet = {
            return Parameters.name
        }
        greet(name: "Kitten")
    "#};
    insta::assert_snapshot!(expect_dump(source), @r#"
    0000 unit 48
    0004   assign v1
    0009     literal function
    0011       unit 12
    0015         return
    0016           param name
    0023   expr
    0024     call v1
    0029       name:
    0034         literal "Kitten"
    "#);
}

#[test]
fn name_not_visible_in_own_right_hand_side() {
    let err = expect_error("x = x");
    assert!(matches!(err, CompileError::InvalidExpression { offset: 4 }));
}

#[test]
fn escaped_newline_is_whitespace() {
    let bytes = compile("return\\ntrue").unwrap();
    assert_eq!(bytes, [9, 0, 0, 0, 0x05, 0x03, 0x03, 0x01, 0x00]);
}

#[test]
fn crlf_and_tabs_are_whitespace() {
    let bytes = compile("\treturn\r\n  nil\r\n").unwrap();
    assert_eq!(bytes, [8, 0, 0, 0, 0x05, 0x03, 0x00, 0x00]);
}

#[test]
fn string_escapes() {
    let bytes = compile(r#"return "a\\b\"c\n""#).unwrap();
    // `\\` and `\"` collapse, `\n` stays as written.
    let body = &bytes[11..bytes.len() - 1];
    assert_eq!(body, br#"a\b"c\n"#);
}

#[test]
fn number_literals() {
    let bytes = compile("return -2.5e1").unwrap();
    assert_eq!(&bytes[4..7], &[0x05, 0x03, 0x02]);
    assert_eq!(&bytes[7..15], &(-25.0f64).to_le_bytes());

    let err = expect_error("return 1.2.3");
    assert!(matches!(
        err,
        CompileError::InvalidNumber { ref text, offset: 7 } if text == "1.2.3"
    ));
}

#[test]
fn empty_array_and_nested_array() {
    let bytes = compile("return [[], nil]").unwrap();
    assert_eq!(
        bytes,
        [14, 0, 0, 0, 0x05, 0x03, 0x05, 0x03, 0x05, 0x00, 0x03, 0x00, 0x00, 0x00]
    );
}

#[test]
fn empty_source_is_empty_unit() {
    assert_eq!(compile("  \n ").unwrap(), [5, 0, 0, 0, 0]);
}

#[test]
fn template_mode_wraps_bare_expressions() {
    let mut compiler = Compiler::new().render_expressions("render");
    let bytes = compiler.compile_statements("Parameters.name").unwrap();
    assert_eq!(bytes, b"\x04\x02render\0value\0\x05name\0\0");

    // Assignments and returns are left alone.
    let bytes = compiler.compile_statements("x = true").unwrap();
    assert_eq!(bytes, [0x03, 1, 0, 0, 0, 0x03, 0x03, 0x01]);
}

#[test]
fn session_shares_top_level_bindings() {
    let mut compiler = Compiler::new();
    let first = compiler.compile_statements("x = true").unwrap();
    assert_eq!(first, [0x03, 1, 0, 0, 0, 0x03, 0x03, 0x01]);

    let second = compiler.compile_statements("return x").unwrap();
    assert_eq!(second, [0x05, 0x04, 1, 0, 0, 0]);

    let third = compiler.compile_statements("y = x").unwrap();
    assert_eq!(third, [0x03, 2, 0, 0, 0, 0x04, 1, 0, 0, 0]);
}

#[test]
fn failed_fragment_leaves_session_untouched() {
    let mut compiler = Compiler::new();
    assert!(compiler.compile_statements("y = true\nreturn ?").is_err());
    assert!(compiler.compile_statements("return y").is_err());

    let bytes = compiler.compile_statements("z = nil").unwrap();
    assert_eq!(bytes[1], 1);
}

#[test]
fn unclosed_block() {
    let err = expect_error("if true { return true");
    assert!(matches!(
        err,
        CompileError::Unclosed {
            delimiter: '}',
            offset: 8
        }
    ));
}

#[test]
fn malformed_arguments() {
    let err = expect_error("Swift.print(value true)");
    assert!(matches!(err, CompileError::MalformedArguments { offset: 18 }));

    let err = expect_error("Swift.print(, value: true)");
    assert!(matches!(err, CompileError::MalformedArguments { offset: 12 }));
}

#[test]
fn unclosed_arguments() {
    let err = expect_error("Swift.print(value: true");
    assert!(matches!(
        err,
        CompileError::Unclosed {
            delimiter: ')',
            offset: 11
        }
    ));
}

#[test]
fn host_call_without_parens() {
    let err = expect_error("Swift.print");
    assert!(matches!(err, CompileError::UnexpectedEnd { offset: 11, .. }));
}

#[test]
fn empty_parameter_name() {
    let err = expect_error("return Parameters.");
    assert!(matches!(err, CompileError::EmptyParameterName { offset: 18 }));
}

#[test]
fn unclosed_string() {
    let err = expect_error(r#"return "abc"#);
    assert!(matches!(
        err,
        CompileError::Unclosed {
            delimiter: '"',
            offset: 7
        }
    ));
}

#[test]
fn unclosed_array() {
    let err = expect_error("return [true, false");
    assert!(matches!(
        err,
        CompileError::Unclosed {
            delimiter: ']',
            offset: 7
        }
    ));
}

#[test]
fn for_requires_in() {
    let err = expect_error("for x of [] {}");
    assert!(matches!(
        err,
        CompileError::ExpectedKeyword {
            expected: "in",
            offset: 6
        }
    ));
}

#[test]
fn keyword_misuse() {
    let err = expect_error("else { }");
    assert!(matches!(err, CompileError::KeywordMisuse { ref keyword, offset: 0 } if keyword == "else"));

    let err = expect_error("for in in [] {}");
    assert!(matches!(err, CompileError::KeywordMisuse { offset: 4, .. }));
}

#[test]
fn stray_closing_brace() {
    let err = expect_error("}");
    assert!(matches!(
        err,
        CompileError::UnexpectedCharacter {
            found: '}',
            offset: 0,
            ..
        }
    ));
}

#[test]
fn compile_file_reads_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.kitten");
    std::fs::write(&path, "return true").unwrap();

    let bytes = compile_file(&path).unwrap();
    assert_eq!(bytes, [9, 0, 0, 0, 0x05, 0x03, 0x03, 0x01, 0x00]);
}

#[test]
fn compile_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = compile_file(dir.path().join("absent.kitten")).unwrap_err();
    assert!(matches!(err, CompileError::Io { .. }));
    assert_eq!(err.offset(), None);
}

#[test]
fn deeply_nested_array_hits_nesting_limit() {
    let depth = 200_000;
    let source = format!("return {}true{}", "[".repeat(depth), "]".repeat(depth));
    let offset = match expect_error(&source) {
        CompileError::RecursionLimitExceeded { offset } => offset,
        other => panic!("expected nesting limit, got {other:?}"),
    };
    // `return` is one level, so the array opened at nesting NESTING_LIMIT fails.
    assert_eq!(offset, "return ".len() + NESTING_LIMIT as usize - 1);
}

#[test]
fn nesting_within_limit_compiles() {
    let depth = 100;
    let source = format!("return {}true{}", "[".repeat(depth), "]".repeat(depth));
    assert!(compile(&source).is_ok());

    let source = format!("{}return nil{}", "if true { ".repeat(depth), " }".repeat(depth));
    assert!(compile(&source).is_ok());
}

#[test]
fn deeply_nested_blocks_hit_nesting_limit() {
    let depth = 1_000;
    let source = format!("{}return nil{}", "if true { ".repeat(depth), " }".repeat(depth));
    let err = expect_error(&source);
    assert!(matches!(err, CompileError::RecursionLimitExceeded { .. }));
    assert_eq!(err.to_string(), "nesting exceeds 256 levels");
}
