use crate::error::CompileError;
use crate::scanner::{Scanner, is_keyword};

#[test]
fn words_stop_at_delimiters() {
    let mut s = Scanner::new("Swift.print(key: value)");
    assert_eq!(s.word(), "Swift");
    assert!(s.eat(b'.'));
    assert_eq!(s.word(), "print");
    assert!(s.eat(b'('));
    assert_eq!(s.word(), "key");
    assert_eq!(s.word(), "");
    assert_eq!(s.peek(), Some(b':'));
}

#[test]
fn equals_and_quote_delimit_words() {
    let mut s = Scanner::new("x=\"y\"");
    assert_eq!(s.word(), "x");
    assert_eq!(s.peek(), Some(b'='));
}

#[test]
fn whitespace_includes_written_newline() {
    let mut s = Scanner::new(" \t\\n\r\n word\\nnext");
    s.skip_whitespace();
    assert_eq!(s.pos(), 7);
    assert_eq!(s.word(), "word");
    s.skip_whitespace();
    assert_eq!(s.word(), "next");
    assert!(s.at_end());
}

#[test]
fn lone_backslash_is_part_of_word() {
    let mut s = Scanner::new("a\\b");
    assert_eq!(s.word(), "a\\b");
}

#[test]
fn peek_word_does_not_consume() {
    let s = Scanner::new("return x");
    assert_eq!(s.peek_word(), "return");
    assert_eq!(s.pos(), 0);
}

#[test]
fn scope_requires_dot() {
    assert!(Scanner::new("Parameters.name").at_scope("Parameters"));
    assert!(!Scanner::new("Parameters name").at_scope("Parameters"));
    assert!(!Scanner::new("ParametersX.name").at_scope("Parameters"));
}

#[test]
fn non_ascii_words() {
    let mut s = Scanner::new("größe = 1");
    assert_eq!(s.word(), "größe");
    s.skip_whitespace();
    assert_eq!(s.current_char(), Some('='));
}

#[test]
fn expect_reports_found_character() {
    let mut s = Scanner::new("é");
    let err = s.expect(b'{', "`{`").unwrap_err();
    assert!(matches!(
        err,
        CompileError::UnexpectedCharacter {
            found: 'é',
            expected: "`{`",
            offset: 0
        }
    ));

    let mut s = Scanner::new("");
    let err = s.expect(b'{', "`{`").unwrap_err();
    assert!(matches!(err, CompileError::UnexpectedEnd { offset: 0, .. }));
}

#[test]
fn keywords() {
    for word in ["if", "else", "return", "for", "in"] {
        assert!(is_keyword(word));
    }
    assert!(!is_keyword("iff"));
    assert!(!is_keyword("Swift"));
}
