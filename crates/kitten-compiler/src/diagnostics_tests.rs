use crate::error::CompileError;
use crate::test_utils::expect_error;

#[test]
fn render_invalid_expression() {
    let source = "return unknown";
    let err = expect_error(source);
    insta::assert_snapshot!(err.render(source, None, false), @r"
    error: invalid expression
      |
    1 | return unknown
      |        ^ invalid expression
    ");
}

#[test]
fn render_with_path() {
    let source = "if true {";
    let err = expect_error(source);
    let out = err.render(source, Some("main.kitten"), false);
    assert!(out.contains("main.kitten:1:9"));
    assert!(out.contains("unclosed `}`"));
}

#[test]
fn render_multi_line_points_at_second_line() {
    let source = "x = true\nreturn ?";
    let err = expect_error(source);
    let out = err.printer().source(source).render();
    assert!(out.contains("2 | return ?"));
}

#[test]
fn render_without_source_is_plain() {
    let err = CompileError::EmptyName { offset: 3 };
    assert_eq!(err.printer().render(), "error: expected a name");
}

#[test]
fn io_error_has_no_snippet() {
    let err = CompileError::Io {
        path: "missing.kitten".into(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    let out = err.render("", None, false);
    assert!(out.starts_with("error: failed to read missing.kitten"));
}

#[test]
fn span_covers_keyword() {
    let err = CompileError::KeywordMisuse {
        keyword: "else".into(),
        offset: 2,
    };
    assert_eq!(err.span(), Some(2..6));
    assert_eq!(err.shifted(10).offset(), Some(12));
}

#[test]
fn error_at_end_of_source_is_clamped() {
    let source = "return Parameters.";
    let err = expect_error(source);
    assert_eq!(err.span(), Some(18..18));
    // Rendering must not panic on an offset at the very end.
    let out = err.render(source, None, false);
    assert!(out.contains("missing parameter name"));
}
