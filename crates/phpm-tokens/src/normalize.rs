//! Turns the lexer's raw output into the token shapes the stream relies on:
//! one whitespace token per line, and no content token ending in whitespace.

use phpm_errors::{Error, Result};

use crate::token::newlines;
use crate::{RawToken, Token, TokenClass, TokenKind};

pub(crate) fn normalize(raw: Vec<RawToken>, first_line: u32) -> Result<Vec<Token>> {
    let mut tokens: Vec<Token> = Vec::with_capacity(raw.len());
    // Whitespace stripped off the previous token, with the line it starts on.
    let mut stripped: Option<(String, u32)> = None;

    for raw in raw {
        if raw.text().is_empty() {
            return Err(unknown(&raw));
        }

        match raw {
            RawToken::Literal(text) => {
                if text.chars().any(|c| c.is_ascii_whitespace()) {
                    return Err(unknown(&RawToken::Literal(text)));
                }
                flush(&mut tokens, stripped.take());
                let line = tokens.last().map_or(first_line, |token| token.end_line);
                tokens.push(Token::new(TokenClass::Literal, text, line));
            }
            RawToken::Php { kind: TokenKind::T_WHITESPACE, text, line } => {
                let (text, line) = match stripped.take() {
                    Some((prefix, start)) => (prefix + &text, start),
                    None => (text, line),
                };
                push_whitespace(&mut tokens, &text, line);
            }
            RawToken::Php { kind, text, line } => {
                flush(&mut tokens, stripped.take());

                let trimmed = text.trim_end_matches(|c: char| c.is_ascii_whitespace());
                if kind.keeps_trailing_whitespace() || trimmed.is_empty() || trimmed == text {
                    tokens.push(Token::new(TokenClass::Php(kind), text, line));
                    continue;
                }

                let token = Token::new(TokenClass::Php(kind), trimmed.to_owned(), line);
                stripped = Some((text[trimmed.len()..].to_owned(), token.end_line));
                tokens.push(token);
            }
        }
    }

    flush(&mut tokens, stripped);
    Ok(tokens)
}

fn flush(tokens: &mut Vec<Token>, stripped: Option<(String, u32)>) {
    if let Some((text, line)) = stripped {
        push_whitespace(tokens, &text, line);
    }
}

fn push_whitespace(tokens: &mut Vec<Token>, text: &str, line: u32) {
    let mut line = line;
    for piece in text.split_inclusive('\n') {
        tokens.push(Token::new(TokenClass::Php(TokenKind::T_WHITESPACE), piece.to_owned(), line));
        line += newlines(piece);
    }
}

fn unknown(raw: &RawToken) -> Error {
    Error::UnknownTokenClass { token: format!("{raw:?}") }
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;
    use crate::TokenKind::*;

    fn check(raw: Vec<RawToken>, expect: Expect) {
        let tokens = normalize(raw, 1).unwrap();
        let actual = tokens.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n");
        expect.assert_eq(&actual);
    }

    #[test]
    fn open_tag_newline_moves_onto_following_whitespace() {
        check(
            vec![
                RawToken::php(T_OPEN_TAG, "<?php\n", 1),
                RawToken::php(T_WHITESPACE, "\n  ", 2),
                RawToken::php(T_VARIABLE, "$a", 3),
            ],
            expect![[r#"
                PhpToken(T_OPEN_TAG, "<?php", 1)
                PhpToken(T_WHITESPACE, "\n", 1)
                PhpToken(T_WHITESPACE, "\n", 2)
                PhpToken(T_WHITESPACE, "  ", 3)
                PhpToken(T_VARIABLE, "$a", 3)"#]],
        );
    }

    #[test]
    fn trailing_whitespace_without_following_whitespace_is_synthesized() {
        check(
            vec![
                RawToken::php(T_OPEN_TAG, "<?php ", 1),
                RawToken::php(T_COMMENT, "// foo\n", 1),
                RawToken::php(T_VARIABLE, "$a", 2),
                RawToken::literal(";"),
            ],
            expect![[r#"
                PhpToken(T_OPEN_TAG, "<?php", 1)
                PhpToken(T_WHITESPACE, " ", 1)
                PhpToken(T_COMMENT, "// foo", 1)
                PhpToken(T_WHITESPACE, "\n", 1)
                PhpToken(T_VARIABLE, "$a", 2)
                Literal(";", 2)"#]],
        );
    }

    #[test]
    fn literal_takes_end_line_of_previous_token() {
        check(
            vec![
                RawToken::php(T_OPEN_TAG, "<?php", 1),
                RawToken::php(T_DOC_COMMENT, "/**\n * a\n */", 1),
                RawToken::literal(";"),
            ],
            expect![[r#"
                PhpToken(T_OPEN_TAG, "<?php", 1)
                PhpToken(T_DOC_COMMENT, "/**\n * a\n */", 1)
                Literal(";", 3)"#]],
        );
    }

    #[test]
    fn string_interiors_keep_their_whitespace() {
        check(
            vec![RawToken::php(T_INLINE_HTML, "<p>\n", 1), RawToken::php(T_OPEN_TAG, "<?php", 2)],
            expect![[r#"
                PhpToken(T_INLINE_HTML, "<p>\n", 1)
                PhpToken(T_OPEN_TAG, "<?php", 2)"#]],
        );
    }

    #[test]
    fn first_literal_uses_the_given_line() {
        let tokens = normalize(vec![RawToken::literal("(")], 7).unwrap();
        assert_eq!(tokens[0].line(), 7);
    }

    #[test]
    fn contract_violations_are_rejected() {
        let empty = normalize(vec![RawToken::php(T_STRING, "", 1)], 1).unwrap_err();
        assert!(matches!(empty, Error::UnknownTokenClass { .. }));

        let spaced = normalize(vec![RawToken::literal("; ")], 1).unwrap_err();
        assert!(matches!(spaced, Error::UnknownTokenClass { .. }));
    }
}
