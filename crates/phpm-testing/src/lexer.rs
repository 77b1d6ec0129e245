//! A lexer for the slice of PHP the tests feed through the streams. Token
//! shapes follow PHP's own tokenizer: the open tag swallows one whitespace
//! character and line comments keep their newline.

use phpm_tokens::TokenKind::*;
use phpm_tokens::{Lexer, RawToken, TokenKind};

use crate::cursor::{Cursor, EOF_CHAR};

#[derive(Clone, Copy, Debug, Default)]
pub struct FixtureLexer;

impl Lexer for FixtureLexer {
    fn tokenize(&self, source: &str) -> Vec<RawToken> {
        tokenize(source)
    }
}

pub fn tokenize(text: &str) -> Vec<RawToken> {
    let mut tokenizer = Tokenizer { text, cursor: Cursor::new(text), line: 1, tokens: Vec::new() };
    tokenizer.run();
    tokenizer.tokens
}

struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    line: u32,
    tokens: Vec<RawToken>,
}

impl<'a> Tokenizer<'a> {
    fn text(&self) -> &'a str {
        let end = self.text.len() - usize::from(self.cursor.len());
        let start = end - usize::from(self.cursor.pos_within_token());
        &self.text[start..end]
    }

    fn emit(&mut self, kind: Option<TokenKind>) {
        let text = self.text();
        self.cursor.reset_pos_within_token();
        if text.is_empty() {
            return;
        }

        self.tokens.push(match kind {
            Some(kind) => RawToken::php(kind, text, self.line),
            None => RawToken::literal(text),
        });
        self.line += text.matches('\n').count() as u32;
    }

    fn run(&mut self) {
        while !self.cursor.is_eof() {
            while !self.cursor.is_eof() && !self.cursor.starts_with("<?php") {
                self.cursor.advance();
            }
            self.emit(Some(T_INLINE_HTML));

            if self.cursor.starts_with("<?php") {
                self.cursor.advance_by(5);
                match self.cursor.peek() {
                    ' ' | '\t' | '\n' => {
                        self.cursor.advance();
                    }
                    '\r' => {
                        self.cursor.advance();
                        if self.cursor.peek() == '\n' {
                            self.cursor.advance();
                        }
                    }
                    _ => {}
                }
                self.emit(Some(T_OPEN_TAG));
                self.php();
            }
        }
    }

    fn php(&mut self) {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with("?>") {
                self.cursor.advance_by(2);
                if self.cursor.peek() == '\n' {
                    self.cursor.advance();
                }
                self.emit(Some(T_CLOSE_TAG));
                return;
            }

            let kind = self.token();
            self.emit(kind);
        }
    }

    /// Lexes one token; `None` means a literal.
    fn token(&mut self) -> Option<TokenKind> {
        match self.cursor.advance() {
            c if c.is_ascii_whitespace() => {
                self.cursor.advance_while(|c| c.is_ascii_whitespace());
                Some(T_WHITESPACE)
            }
            '#' => Some(self.line_comment()),
            '/' if self.cursor.peek() == '/' => Some(self.line_comment()),
            '/' if self.cursor.peek() == '*' => Some(self.block_comment()),
            '$' if is_ident_start(self.cursor.peek()) => {
                self.cursor.advance_while(is_ident_continue);
                Some(T_VARIABLE)
            }
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                let after_arrow = matches!(
                    self.tokens.iter().rev().find(|token| !is_trivia(token)),
                    Some(RawToken::Php { kind: T_OBJECT_OPERATOR, .. })
                );
                match keyword(self.text()) {
                    Some(kind) if !after_arrow => Some(kind),
                    _ => Some(T_STRING),
                }
            }
            c @ '0'..='9' => Some(self.number(c)),
            '\'' => {
                self.single_quoted();
                Some(T_CONSTANT_ENCAPSED_STRING)
            }
            '"' => self.double_quoted(),
            '\\' => Some(T_NS_SEPARATOR),
            '(' => self.cast(),
            c => self.operator(c),
        }
    }

    fn line_comment(&mut self) -> TokenKind {
        self.cursor.advance_while(|c| c != '\n');
        if self.cursor.peek() == '\n' {
            self.cursor.advance();
        }
        T_COMMENT
    }

    fn block_comment(&mut self) -> TokenKind {
        self.cursor.advance();
        let doc = self.cursor.peek() == '*' && self.cursor.second() != '/';

        while !self.cursor.is_eof() {
            if self.cursor.starts_with("*/") {
                self.cursor.advance_by(2);
                break;
            }
            self.cursor.advance();
        }

        if doc { T_DOC_COMMENT } else { T_COMMENT }
    }

    fn number(&mut self, first: char) -> TokenKind {
        if first == '0' && matches!(self.cursor.peek(), 'x' | 'X') {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_hexdigit());
            return T_LNUMBER;
        }

        self.cursor.advance_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == '.' && self.cursor.second().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
            return T_DNUMBER;
        }
        T_LNUMBER
    }

    fn single_quoted(&mut self) {
        loop {
            match self.cursor.advance() {
                '\\' => {
                    self.cursor.advance();
                }
                '\'' | EOF_CHAR => break,
                _ => {}
            }
        }
    }

    /// A string without variables is one token. Otherwise the quotes are
    /// literals and the parts in between are lexed one by one.
    fn double_quoted(&mut self) -> Option<TokenKind> {
        if !interpolates(self.cursor.as_str()) {
            loop {
                match self.cursor.advance() {
                    '\\' => {
                        self.cursor.advance();
                    }
                    '"' | EOF_CHAR => break,
                    _ => {}
                }
            }
            return Some(T_CONSTANT_ENCAPSED_STRING);
        }

        self.emit(None);
        loop {
            if self.cursor.is_eof() {
                return Some(T_ENCAPSED_AND_WHITESPACE);
            }

            match self.cursor.peek() {
                '"' => {
                    self.cursor.advance();
                    return None;
                }
                '$' if is_ident_start(self.cursor.second()) => {
                    self.cursor.advance();
                    self.cursor.advance_while(is_ident_continue);
                    self.emit(Some(T_VARIABLE));
                }
                '{' if self.cursor.second() == '$' => {
                    self.cursor.advance();
                    self.emit(Some(T_CURLY_OPEN));
                    self.embedded_expression();
                }
                _ => {
                    while !self.cursor.is_eof() && !self.at_interpolation() {
                        if self.cursor.advance() == '\\' {
                            self.cursor.advance();
                        }
                    }
                    self.emit(Some(T_ENCAPSED_AND_WHITESPACE));
                }
            }
        }
    }

    fn at_interpolation(&self) -> bool {
        match self.cursor.peek() {
            '"' => true,
            '$' => is_ident_start(self.cursor.second()),
            '{' => self.cursor.second() == '$',
            _ => false,
        }
    }

    /// The tokens of `{$...}` up to and including the closing brace.
    fn embedded_expression(&mut self) {
        let mut depth = 0u32;
        while !self.cursor.is_eof() {
            let kind = self.token();
            let text = self.text();
            let (opens, closes) = (kind.is_none() && text == "{", kind.is_none() && text == "}");
            self.emit(kind);

            if opens {
                depth += 1;
            } else if closes {
                if depth == 0 {
                    return;
                }
                depth -= 1;
            }
        }
    }

    fn cast(&mut self) -> Option<TokenKind> {
        const CASTS: &[(&str, TokenKind)] = &[
            ("int)", T_INT_CAST),
            ("integer)", T_INT_CAST),
            ("bool)", T_BOOL_CAST),
            ("boolean)", T_BOOL_CAST),
            ("float)", T_DOUBLE_CAST),
            ("double)", T_DOUBLE_CAST),
            ("string)", T_STRING_CAST),
            ("array)", T_ARRAY_CAST),
            ("object)", T_OBJECT_CAST),
            ("unset)", T_UNSET_CAST),
        ];

        let (rest, kind) = CASTS.iter().find(|(rest, _)| self.cursor.starts_with(rest))?;
        self.cursor.advance_by(rest.len());
        Some(*kind)
    }

    fn operator(&mut self, first: char) -> Option<TokenKind> {
        const OPERATORS: &[(&str, TokenKind)] = &[
            ("<<=", T_SL_EQUAL),
            (">>=", T_SR_EQUAL),
            ("**=", T_POW_EQUAL),
            ("...", T_ELLIPSIS),
            ("<=>", T_SPACESHIP),
            ("===", T_IS_IDENTICAL),
            ("!==", T_IS_NOT_IDENTICAL),
            ("==", T_IS_EQUAL),
            ("!=", T_IS_NOT_EQUAL),
            ("<>", T_IS_NOT_EQUAL),
            ("<=", T_IS_SMALLER_OR_EQUAL),
            (">=", T_IS_GREATER_OR_EQUAL),
            ("&&", T_BOOLEAN_AND),
            ("||", T_BOOLEAN_OR),
            ("++", T_INC),
            ("--", T_DEC),
            ("+=", T_PLUS_EQUAL),
            ("-=", T_MINUS_EQUAL),
            ("*=", T_MUL_EQUAL),
            ("/=", T_DIV_EQUAL),
            (".=", T_CONCAT_EQUAL),
            ("%=", T_MOD_EQUAL),
            ("&=", T_AND_EQUAL),
            ("|=", T_OR_EQUAL),
            ("^=", T_XOR_EQUAL),
            ("<<", T_SL),
            (">>", T_SR),
            ("->", T_OBJECT_OPERATOR),
            ("=>", T_DOUBLE_ARROW),
            ("::", T_DOUBLE_COLON),
            ("**", T_POW),
            ("??", T_COALESCE),
        ];

        let rest = self.cursor.as_str();
        let (tail, kind) = OPERATORS.iter().find_map(|&(operator, kind)| {
            let tail = operator.strip_prefix(first)?;
            rest.starts_with(tail).then_some((tail, kind))
        })?;
        self.cursor.advance_by(tail.len());
        Some(kind)
    }
}

fn interpolates(rest: &str) -> bool {
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return false,
            '$' if chars.peek().is_some_and(|&c| is_ident_start(c)) => return true,
            '{' if chars.peek() == Some(&'$') => return true,
            _ => {}
        }
    }
    false
}

fn is_trivia(token: &RawToken) -> bool {
    matches!(token, RawToken::Php { kind, .. } if kind.is_trivia())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii() && c != EOF_CHAR
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text.to_ascii_lowercase().as_str() {
        "abstract" => T_ABSTRACT,
        "and" => T_LOGICAL_AND,
        "array" => T_ARRAY,
        "as" => T_AS,
        "break" => T_BREAK,
        "callable" => T_CALLABLE,
        "case" => T_CASE,
        "catch" => T_CATCH,
        "class" => T_CLASS,
        "clone" => T_CLONE,
        "const" => T_CONST,
        "continue" => T_CONTINUE,
        "declare" => T_DECLARE,
        "default" => T_DEFAULT,
        "die" | "exit" => T_EXIT,
        "do" => T_DO,
        "echo" => T_ECHO,
        "else" => T_ELSE,
        "elseif" => T_ELSEIF,
        "empty" => T_EMPTY,
        "enddeclare" => T_ENDDECLARE,
        "endfor" => T_ENDFOR,
        "endforeach" => T_ENDFOREACH,
        "endif" => T_ENDIF,
        "endswitch" => T_ENDSWITCH,
        "endwhile" => T_ENDWHILE,
        "eval" => T_EVAL,
        "extends" => T_EXTENDS,
        "final" => T_FINAL,
        "finally" => T_FINALLY,
        "for" => T_FOR,
        "foreach" => T_FOREACH,
        "function" => T_FUNCTION,
        "global" => T_GLOBAL,
        "goto" => T_GOTO,
        "__halt_compiler" => T_HALT_COMPILER,
        "if" => T_IF,
        "implements" => T_IMPLEMENTS,
        "include" => T_INCLUDE,
        "include_once" => T_INCLUDE_ONCE,
        "instanceof" => T_INSTANCEOF,
        "insteadof" => T_INSTEADOF,
        "interface" => T_INTERFACE,
        "isset" => T_ISSET,
        "list" => T_LIST,
        "namespace" => T_NAMESPACE,
        "new" => T_NEW,
        "or" => T_LOGICAL_OR,
        "print" => T_PRINT,
        "private" => T_PRIVATE,
        "protected" => T_PROTECTED,
        "public" => T_PUBLIC,
        "require" => T_REQUIRE,
        "require_once" => T_REQUIRE_ONCE,
        "return" => T_RETURN,
        "static" => T_STATIC,
        "switch" => T_SWITCH,
        "throw" => T_THROW,
        "trait" => T_TRAIT,
        "try" => T_TRY,
        "unset" => T_UNSET,
        "use" => T_USE,
        "var" => T_VAR,
        "while" => T_WHILE,
        "xor" => T_LOGICAL_XOR,
        "yield" => T_YIELD,
        "__class__" => T_CLASS_C,
        "__dir__" => T_DIR,
        "__file__" => T_FILE,
        "__function__" => T_FUNC_C,
        "__line__" => T_LINE,
        "__method__" => T_METHOD_C,
        "__namespace__" => T_NS_C,
        "__trait__" => T_TRAIT_C,
        _ => return None,
    };
    Some(kind)
}
