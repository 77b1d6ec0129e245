use std::fmt;

use indexmap::IndexMap;
use phpm_errors::{Error, Result};
use text_size::TextRange;

use crate::{AttrValue, Matcher, Token, TokenClass, TokenId, TokenKind, TokenStream};

/// A token together with the stream it lives in, so the link chain can be
/// walked from it.
#[derive(Clone, Copy)]
pub struct TokenRef<'a> {
    stream: &'a TokenStream,
    id: TokenId,
}

impl<'a> TokenRef<'a> {
    pub(crate) fn new(stream: &'a TokenStream, id: TokenId) -> Self {
        Self { stream, id }
    }

    pub fn id(self) -> TokenId {
        self.id
    }

    pub fn token(self) -> &'a Token {
        self.stream.data(self.id)
    }

    pub fn class(self) -> TokenClass {
        self.token().class
    }

    pub fn kind(self) -> Option<TokenKind> {
        self.token().kind()
    }

    pub fn content(self) -> &'a str {
        &self.token().content
    }

    pub fn line(self) -> u32 {
        self.token().line
    }

    pub fn end_line(self) -> u32 {
        self.token().end_line
    }

    pub fn position(self) -> usize {
        self.token().position
    }

    pub fn range(self) -> Option<TextRange> {
        self.token().range
    }

    pub fn previous(self) -> Option<Self> {
        self.token().previous.map(|id| Self::new(self.stream, id))
    }

    pub fn next(self) -> Option<Self> {
        self.token().next.map(|id| Self::new(self.stream, id))
    }

    pub fn matches(self, matcher: &Matcher) -> bool {
        matcher.matches(self)
    }

    pub fn find_next(self, matcher: &Matcher) -> Option<Self> {
        std::iter::successors(self.next(), |token| token.next()).find(|token| token.matches(matcher))
    }

    pub fn find_previous(self, matcher: &Matcher) -> Option<Self> {
        std::iter::successors(self.previous(), |token| token.previous())
            .find(|token| token.matches(matcher))
    }

    /// How many tokens sit between this one and the next match.
    pub fn tokens_until(self, matcher: &Matcher) -> Option<usize> {
        std::iter::successors(self.next(), |token| token.next()).position(|token| token.matches(matcher))
    }

    pub fn is_first_on_line(self) -> bool {
        self.previous().is_none_or(|previous| previous.line() != self.line())
    }

    pub fn is_last_on_line(self) -> bool {
        self.next().is_none_or(|next| next.line() != self.line())
    }

    pub fn first_on_line(self) -> Self {
        let mut token = self;
        while !token.is_first_on_line() {
            match token.previous() {
                Some(previous) => token = previous,
                None => break,
            }
        }
        token
    }

    /// Byte column this token starts at, measured along the chain.
    pub fn start_column(self) -> usize {
        self.first_on_line().content_until(self).map_or(0, |content| content.len())
    }

    /// The leading whitespace of this token's line.
    pub fn line_indentation(self) -> Result<String> {
        let first = self.first_on_line();
        if !first.token().is_whitespace() {
            return Ok(String::new());
        }

        let end = first.find_next(&!Matcher::Whitespace).ok_or_else(|| Error::MissingNeighbor {
            token: first.to_string(),
            looking_for: (!Matcher::Whitespace).to_string(),
        })?;
        first.content_until(end)
    }

    /// Indentation needed to line something up under this token: the line's
    /// own indentation (tabs stay tabs), then spaces up to the column.
    pub fn indentation(self) -> Result<String> {
        let mut indentation = self.line_indentation()?;
        if self.is_first_on_line() && self.token().is_whitespace() {
            indentation.clear();
        }

        let padding = self.start_column().saturating_sub(indentation.len());
        indentation.push_str(&" ".repeat(padding));
        Ok(indentation)
    }

    pub fn whitespace_after(self) -> Result<String> {
        let matcher = !Matcher::Whitespace;
        let next = self.find_next(&matcher).ok_or_else(|| self.missing(&matcher))?;
        self.content_between(next)
    }

    pub fn whitespace_before(self) -> Result<String> {
        let matcher = !Matcher::Whitespace;
        let previous = self.find_previous(&matcher).ok_or_else(|| self.missing(&matcher))?;
        previous.content_between(self)
    }

    fn missing(self, matcher: &Matcher) -> Error {
        Error::MissingNeighbor { token: self.to_string(), looking_for: matcher.to_string() }
    }

    /// Content of this token and everything after it, up to but excluding
    /// `other`.
    pub fn content_until(self, other: Self) -> Result<String> {
        let mut content = String::new();
        let mut current = Some(self);
        while let Some(token) = current {
            if token.id == other.id {
                return Ok(content);
            }
            content.push_str(token.content());
            current = token.next();
        }
        Err(Error::TokenNotFound { token: other.to_string() })
    }

    pub fn content_until_including(self, other: Self) -> Result<String> {
        let mut content = self.content_until(other)?;
        content.push_str(other.content());
        Ok(content)
    }

    pub fn content_between(self, other: Self) -> Result<String> {
        match self.next() {
            Some(next) => next.content_until(other),
            None => Err(Error::TokenNotFound { token: other.to_string() }),
        }
    }

    /// Content after this token up to and including `other`.
    pub fn content_between_including(self, other: Self) -> Result<String> {
        let mut content = self.content_between(other)?;
        content.push_str(other.content());
        Ok(content)
    }

    pub fn is_block_opener(self) -> bool {
        let token = self.token();
        token.is_literal("(")
            || token.is_literal("[")
            || token.is_literal("{")
            || token.is_kind(TokenKind::T_CURLY_OPEN)
    }

    /// Whether both tokens open or close the same kind of block. `T_CURLY_OPEN`
    /// counts as a `{`.
    pub fn is_same_type(self, other: Self) -> bool {
        let (this, other) = (self.token(), other.token());
        match (this.class, other.class) {
            (TokenClass::Literal, TokenClass::Literal) => this.content == other.content,
            (TokenClass::Php(TokenKind::T_CURLY_OPEN), TokenClass::Literal) => {
                other.content == "{"
            }
            (TokenClass::Literal, TokenClass::Php(TokenKind::T_CURLY_OPEN)) => this.content == "{",
            (TokenClass::Php(a), TokenClass::Php(b)) => a == b,
            (TokenClass::Marker(a), TokenClass::Marker(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_closing(self, opener: Self) -> bool {
        let token = self.token();
        if token.class != TokenClass::Literal {
            return false;
        }

        let opener = opener.token();
        let closer = match opener.class {
            TokenClass::Php(TokenKind::T_CURLY_OPEN) => "}",
            TokenClass::Literal => match opener.content.as_str() {
                "(" => ")",
                "[" => "]",
                "{" => "}",
                _ => return false,
            },
            _ => return false,
        };
        token.content == closer
    }

    /// Same class and content. Lexer tokens and markers must also sit on the
    /// same line.
    pub fn equals(self, other: Self) -> bool {
        let (this, other) = (self.token(), other.token());
        match (this.class, other.class) {
            (TokenClass::Literal, TokenClass::Literal) => this.content == other.content,
            (TokenClass::Php(a), TokenClass::Php(b)) => {
                a == b && this.content == other.content && this.line == other.line
            }
            (TokenClass::Marker(a), TokenClass::Marker(b)) => a == b && this.line == other.line,
            _ => false,
        }
    }

    pub fn attribute(self, key: &str) -> Option<&'a AttrValue> {
        self.token().attributes.get(key)
    }

    pub fn has_attribute(self, key: &str) -> bool {
        self.token().attributes.contains_key(key)
    }

    pub fn attributes(self) -> &'a IndexMap<String, AttrValue> {
        &self.token().attributes
    }
}

impl PartialEq for TokenRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.stream, other.stream) && self.id == other.id
    }
}

impl Eq for TokenRef<'_> {}

impl fmt::Display for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.token(), f)
    }
}

impl fmt::Debug for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.token(), f)
    }
}
