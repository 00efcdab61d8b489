//! The JSON-like node grammar: objects, arrays, strings, text blocks,
//! numbers, and barewords. Shared between the free-standing `parse_node`
//! entry point (JSON mode: commas are significant) and the IDL grammar's
//! embedded node values — trait arguments, member defaults, metadata and
//! node-member values (IDL mode: commas are trivia, like whitespace).

use crate::scanner::Scanner;
use rust_decimal::Decimal;
use smithy_error::{Diagnostics, ErrorKind, SyntaxError};
use smithy_position::Span;
use smithy_syntax::{ErrLit, Kvp, Node, NodeKind, NumLit, StrLit};
use std::sync::Arc;

fn is_number_breakpoint(c: char) -> bool {
    matches!(c, '{' | '[' | '}' | ']' | ',' | ':' | ')')
}

fn kind_label(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Obj(_) | NodeKind::Kvps(_) => "object",
        NodeKind::Kvp(_) => "key-value pair",
        NodeKind::Arr(_) => "array",
        NodeKind::Str(_) => "string",
        NodeKind::Ident(_) => "identifier",
        NodeKind::Num(_) => "number",
        NodeKind::Err(_) => "token",
    }
}

/// Parses one value, dispatching on the first non-trivia character. This is
/// the single recursive entry point for the whole node grammar.
pub(crate) fn parse_value(s: &mut Scanner<'_>, errors: &mut Diagnostics, json_mode: bool) -> Node {
    s.skip_trivia(json_mode);
    let start = s.pos();
    match s.peek() {
        Some('{') => parse_object(s, errors, json_mode),
        Some('[') => parse_array(s, errors, json_mode),
        Some('"') => parse_string_or_text_block(s, errors),
        Some(c) if c == '-' || c.is_ascii_digit() => parse_number(s, errors),
        Some(c) if Scanner::is_identifier_start(c) => parse_identifier(s),
        Some(_) => {
            s.bump();
            let end = s.pos();
            let lexeme = s.slice(start, end);
            errors.push(SyntaxError::new(
                ErrorKind::UnexpectedToken { lexeme: lexeme.to_string() },
                Span::new(start, end),
            ));
            Node::new(NodeKind::Err(ErrLit { text: Arc::from(lexeme) }), Span::new(start, end))
        }
        None => {
            errors.push(SyntaxError::new(ErrorKind::UnexpectedEof, Span::empty(start)));
            Node::new(NodeKind::Err(ErrLit { text: Arc::from("") }), Span::empty(start))
        }
    }
}

fn parse_object(s: &mut Scanner<'_>, errors: &mut Diagnostics, json_mode: bool) -> Node {
    let start = s.pos();
    s.bump();
    let kvps_start = s.pos();
    let mut members = Vec::new();
    loop {
        s.skip_trivia(json_mode);
        match s.peek() {
            None => {
                errors.push(SyntaxError::new(ErrorKind::MissingCloseBrace, Span::empty(s.pos())));
                break;
            }
            Some('}') => break,
            Some(',') if json_mode => {
                s.bump();
            }
            Some(']') | Some(')') => {
                errors.push(SyntaxError::new(ErrorKind::ExpectedCloseBrace, Span::empty(s.pos())));
                break;
            }
            _ => members.push(parse_kvp(s, errors, json_mode)),
        }
    }
    let kvps_end = s.pos();
    s.eat_str("}");
    let end = s.pos();
    Node::obj(Span::new(kvps_start, kvps_end), members, Span::new(start, end))
}

fn parse_array(s: &mut Scanner<'_>, errors: &mut Diagnostics, json_mode: bool) -> Node {
    let start = s.pos();
    s.bump();
    let mut elements = Vec::new();
    loop {
        s.skip_trivia(json_mode);
        match s.peek() {
            None => {
                errors.push(SyntaxError::new(ErrorKind::MissingCloseBracket, Span::empty(s.pos())));
                break;
            }
            Some(']') => break,
            Some(',') if json_mode => {
                s.bump();
            }
            Some('}') | Some(')') => {
                errors.push(SyntaxError::new(ErrorKind::ExpectedCloseBracket, Span::empty(s.pos())));
                break;
            }
            _ => elements.push(parse_value(s, errors, json_mode)),
        }
    }
    s.eat_str("]");
    let end = s.pos();
    Node::new(NodeKind::Arr(elements), Span::new(start, end))
}

/// Parses a `Kvp` (key, optional `:`, optional value), applying the three
/// ordered error-recovery rules for malformed pairs.
fn parse_kvp(s: &mut Scanner<'_>, errors: &mut Diagnostics, json_mode: bool) -> Node {
    let start = s.pos();
    let key = parse_key(s, errors, json_mode);
    s.skip_trivia(json_mode);

    let colon_pos = if s.peek() == Some(':') {
        let p = s.pos();
        s.bump();
        Some(p)
    } else {
        None
    };

    if colon_pos.is_none() {
        errors.push(SyntaxError::new(ErrorKind::ExpectedColon, Span::empty(s.pos())));
        if s.peek() == Some('}') {
            errors.push(SyntaxError::new(ErrorKind::ExpectedValue, Span::empty(s.pos())));
            let end = s.pos();
            return Node::new(
                NodeKind::Kvp(Box::new(Kvp { key, colon_pos: None, value: None })),
                Span::new(start, end),
            );
        }
    }

    s.skip_trivia(json_mode);
    let value = parse_value(s, errors, json_mode);
    let end = value.end();
    Node::new(
        NodeKind::Kvp(Box::new(Kvp { key, colon_pos, value: Some(value) })),
        Span::new(start, end),
    )
}

fn parse_key(s: &mut Scanner<'_>, errors: &mut Diagnostics, json_mode: bool) -> Node {
    s.skip_trivia(json_mode);
    match s.peek() {
        Some('"') => parse_string_or_text_block(s, errors),
        Some(c) if Scanner::is_identifier_start(c) => parse_identifier(s),
        _ => {
            let node = parse_value(s, errors, json_mode);
            errors.push(SyntaxError::new(
                ErrorKind::UnexpectedKeyType { found: kind_label(&node.kind).to_string() },
                node.span,
            ));
            node
        }
    }
}

fn parse_string_or_text_block(s: &mut Scanner<'_>, errors: &mut Diagnostics) -> Node {
    let start = s.pos();
    s.bump();

    if s.peek() == Some('"') && s.peek_at(1) == Some('"') {
        s.bump();
        s.bump();
        let body_start = s.pos();
        loop {
            if s.is_eof() {
                let end = s.pos();
                errors.push(SyntaxError::new(ErrorKind::UnclosedTextBlock, Span::new(start, end)));
                let text = s.slice(body_start, end);
                return Node::new(NodeKind::Err(ErrLit { text: Arc::from(text) }), Span::new(start, end));
            }
            if s.starts_with("\"\"\"") {
                let body_end = s.pos();
                s.bump();
                s.bump();
                s.bump();
                let end = s.pos();
                let value = s.slice(body_start, body_end).to_string();
                return Node::new(NodeKind::Str(StrLit::text_block(value)), Span::new(start, end));
            }
            s.bump();
        }
    }

    let body_start = s.pos();
    loop {
        match s.peek() {
            None | Some('\n') | Some('\r') => {
                let end = s.pos();
                errors.push(SyntaxError::new(ErrorKind::UnclosedStringLiteral, Span::new(start, end)));
                let text = s.slice(body_start, end);
                return Node::new(NodeKind::Err(ErrLit { text: Arc::from(text) }), Span::new(start, end));
            }
            Some('\\') => {
                s.bump();
                s.bump();
            }
            Some('"') => {
                let body_end = s.pos();
                s.bump();
                let end = s.pos();
                let value = s.slice(body_start, body_end).to_string();
                return Node::new(NodeKind::Str(StrLit::quoted(value)), Span::new(start, end));
            }
            Some(_) => {
                s.bump();
            }
        }
    }
}

fn parse_number(s: &mut Scanner<'_>, errors: &mut Diagnostics) -> Node {
    let start = s.pos();
    loop {
        match s.peek() {
            Some(c) if !is_number_breakpoint(c) && !c.is_whitespace() => {
                s.bump();
            }
            _ => break,
        }
    }
    let end = s.pos();
    let raw = s.slice(start, end);
    match raw.parse::<Decimal>() {
        Ok(value) => Node::new(NodeKind::Num(NumLit { value, raw: Arc::from(raw) }), Span::new(start, end)),
        Err(_) => {
            errors.push(SyntaxError::new(
                ErrorKind::InvalidNumber { literal: raw.to_string() },
                Span::new(start, end),
            ));
            Node::new(NodeKind::Err(ErrLit { text: Arc::from(raw) }), Span::new(start, end))
        }
    }
}

fn parse_identifier(s: &mut Scanner<'_>) -> Node {
    let start = s.pos();
    s.bump();
    while let Some(c) = s.peek() {
        if Scanner::is_identifier_continue(c) {
            s.bump();
        } else {
            break;
        }
    }
    let end = s.pos();
    let value = s.slice(start, end).to_string();
    Node::new(NodeKind::Ident(StrLit::quoted(value)), Span::new(start, end))
}

/// The trait-value quirk: a `@trait(...)` argument may be a single node or a
/// naked `Kvps` (no surrounding braces). Peeks the first token after `(` to
/// decide, then reuses the `Kvp` loop or [`parse_value`] respectively.
/// Returns the parsed node and whether the trailing `)` was found.
pub(crate) fn parse_trait_value(s: &mut Scanner<'_>, errors: &mut Diagnostics) -> (Node, bool) {
    s.skip_trivia(false);
    if looks_like_naked_kvps(s) {
        let kvps_start = s.pos();
        let mut members = Vec::new();
        loop {
            s.skip_trivia(false);
            match s.peek() {
                None => {
                    errors.push(SyntaxError::new(ErrorKind::MissingCloseBracket, Span::empty(s.pos())));
                    break;
                }
                Some(')') => break,
                _ => members.push(parse_kvp(s, errors, false)),
            }
        }
        let kvps_end = s.pos();
        let closed = s.eat_str(")");
        (Node::new(NodeKind::Kvps(members), Span::new(kvps_start, kvps_end)), closed)
    } else if s.peek() == Some(')') {
        // Empty trait parens, e.g. `@foo()` — there's no node here at all,
        // distinct from `ExpectedValue`'s "a Kvp's value position is empty".
        let pos = s.pos();
        errors.push(SyntaxError::new(ErrorKind::ExpectedNode, Span::empty(pos)));
        let err_node = Node::new(NodeKind::Err(ErrLit { text: Arc::from("") }), Span::empty(pos));
        let closed = s.eat_str(")");
        (err_node, closed)
    } else {
        let value = parse_value(s, errors, false);
        let closed = s.eat_str(")");
        (value, closed)
    }
}

/// `true` if the upcoming tokens look like `key :`, i.e. a naked `Kvps`
/// rather than a single value.
fn looks_like_naked_kvps(s: &Scanner<'_>) -> bool {
    let mut lookahead = Scanner::new(s.slice(s.pos(), s.len()));
    let key = match lookahead.peek() {
        Some('"') => {
            lookahead.bump();
            while let Some(c) = lookahead.peek() {
                if c == '"' {
                    break;
                }
                if c == '\\' {
                    lookahead.bump();
                }
                lookahead.bump();
            }
            lookahead.eat_str("\"");
            true
        }
        Some(c) if Scanner::is_identifier_start(c) => {
            lookahead.bump();
            while let Some(c) = lookahead.peek() {
                if Scanner::is_identifier_continue(c) {
                    lookahead.bump();
                } else {
                    break;
                }
            }
            true
        }
        _ => false,
    };
    if !key {
        return false;
    }
    lookahead.skip_trivia(false);
    lookahead.peek() == Some(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, json_mode: bool) -> (Node, Diagnostics) {
        let mut s = Scanner::new(text);
        let mut errors = Diagnostics::new();
        let node = parse_value(&mut s, &mut errors, json_mode);
        (node, errors)
    }

    #[test]
    fn parses_quoted_string() {
        let (node, errors) = run(r#""hello""#, true);
        assert!(errors.is_empty());
        assert_eq!(node.as_text(), Some("hello"));
    }

    #[test]
    fn parses_text_block() {
        let (node, errors) = run("\"\"\"\nhi\n\"\"\"", true);
        assert!(errors.is_empty());
        match node.kind {
            NodeKind::Str(s) => assert!(s.is_text_block),
            other => panic!("expected Str, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_string_recovers_with_error() {
        let (node, errors) = run("\"hello", true);
        assert!(node.is_err());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn parses_decimal_number() {
        let (node, errors) = run("42.5", true);
        assert!(errors.is_empty());
        match node.kind {
            NodeKind::Num(n) => assert_eq!(n.value, Decimal::new(425, 1)),
            other => panic!("expected Num, got {other:?}"),
        }
    }

    #[test]
    fn malformed_number_yields_error_node() {
        let (node, errors) = run("1.2.3", true);
        assert!(node.is_err());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn object_requires_commas_in_json_mode() {
        let (node, errors) = run(r#"{"a": 1, "b": 2}"#, true);
        assert!(errors.is_empty());
        match node.kind {
            NodeKind::Obj(kvps) => match kvps.kind {
                NodeKind::Kvps(members) => assert_eq!(members.len(), 2),
                other => panic!("expected Kvps, got {other:?}"),
            },
            other => panic!("expected Obj, got {other:?}"),
        }
    }

    #[test]
    fn object_allows_no_commas_in_idl_mode() {
        let (node, errors) = run(r#"{a: 1 b: 2}"#, false);
        assert!(errors.is_empty());
        match node.kind {
            NodeKind::Obj(kvps) => match kvps.kind {
                NodeKind::Kvps(members) => assert_eq!(members.len(), 2),
                other => panic!("expected Kvps, got {other:?}"),
            },
            other => panic!("expected Obj, got {other:?}"),
        }
    }

    #[test]
    fn kvp_missing_colon_before_close_brace_emits_two_errors() {
        let (_node, errors) = run(r#"{"a"}"#, true);
        let messages: Vec<String> = errors.iter().map(|e| e.message()).collect();
        assert!(messages.contains(&"expected :".to_string()));
        assert!(messages.contains(&"expected value".to_string()));
    }

    #[test]
    fn naked_kvps_trait_value() {
        let mut s = Scanner::new(r#"bar: "baz", qux: 1)"#);
        let mut errors = Diagnostics::new();
        let (node, closed) = parse_trait_value(&mut s, &mut errors);
        assert!(closed);
        match node.kind {
            NodeKind::Kvps(members) => assert_eq!(members.len(), 2),
            other => panic!("expected Kvps, got {other:?}"),
        }
    }

    #[test]
    fn single_node_trait_value() {
        let mut s = Scanner::new(r#""just a string")"#);
        let mut errors = Diagnostics::new();
        let (node, closed) = parse_trait_value(&mut s, &mut errors);
        assert!(closed);
        assert_eq!(node.as_text(), Some("just a string"));
    }

    #[test]
    fn empty_trait_parens_emit_expected_node() {
        let mut s = Scanner::new(")");
        let mut errors = Diagnostics::new();
        let (node, closed) = parse_trait_value(&mut s, &mut errors);
        assert!(closed);
        assert!(node.is_err());
        let messages: Vec<String> = errors.iter().map(|e| e.message()).collect();
        assert!(messages.contains(&"expected node".to_string()));
    }
}
