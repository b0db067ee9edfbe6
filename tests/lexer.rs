// ABOUTME: Integration-level lexer tests against the public API, including the import buffer stack

use april::lexer::Lexer;
use april::token::TokenKind;

fn kinds(src: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(src);
    let mut out = Vec::new();
    loop {
        let tok = lexer.next_token();
        if tok.kind == TokenKind::Eof {
            break;
        }
        out.push(tok.kind);
    }
    out
}

#[test]
fn two_character_operators_are_not_split() {
    let toks = kinds("x := 1; x += 2; x == 3; x != 4;");
    assert!(toks.contains(&TokenKind::ColonAssign));
    assert!(toks.contains(&TokenKind::PlusAssign));
    assert!(toks.contains(&TokenKind::Eq));
    assert!(toks.contains(&TokenKind::NotEq));
}

#[test]
fn numeric_literals_classify_by_dot_count() {
    let toks = kinds("1 1.5 x.y");
    assert_eq!(toks[0], TokenKind::Int);
    assert_eq!(toks[1], TokenKind::Double);
}

#[test]
fn line_comment_runs_to_end_of_line() {
    let mut lexer = Lexer::new("1 // trailing comment\n2");
    let first = lexer.next_token();
    assert_eq!(first.kind, TokenKind::Int);
    assert_eq!(first.literal, "1");
    // Whatever the comment surfaces as, the token after the newline is "2".
    let mut tok = lexer.next_token();
    while tok.kind == TokenKind::Comment {
        tok = lexer.next_token();
    }
    assert_eq!(tok.literal, "2");
}

#[test]
fn push_import_rejects_wrong_extension() {
    let mut lexer = Lexer::new("");
    assert!(lexer.push_import("foo.txt").is_err());
}

#[test]
fn push_buffer_exhaustion_falls_back_to_outer_buffer() {
    let mut lexer = Lexer::new("outer");
    lexer.push_buffer("inner");
    let first = lexer.next_token();
    assert_eq!(first.literal, "inner");
    let second = lexer.next_token();
    assert_eq!(second.literal, "outer");
}
