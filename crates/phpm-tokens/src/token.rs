use std::fmt;

use indexmap::IndexMap;
use la_arena::Idx;
use text_size::TextRange;

use crate::TokenKind;

pub type TokenId = Idx<Token>;

/// The two boundary tokens every loaded stream starts and ends with.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Marker {
    StartOfFile,
    EndOfFile,
}

impl Marker {
    pub fn symbol(self) -> char {
        match self {
            Self::StartOfFile => '^',
            Self::EndOfFile => '$',
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenClass {
    /// Single-character structural punctuation like `;` or `{`.
    Literal,
    Php(TokenKind),
    Marker(Marker),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Token(TokenId),
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<TokenId> for AttrValue {
    fn from(value: TokenId) -> Self {
        Self::Token(value)
    }
}

#[derive(Clone, Debug)]
pub struct Token {
    pub(crate) class: TokenClass,
    pub(crate) content: String,
    pub(crate) line: u32,
    pub(crate) end_line: u32,
    pub(crate) attributes: IndexMap<String, AttrValue>,
    pub(crate) previous: Option<TokenId>,
    pub(crate) next: Option<TokenId>,
    pub(crate) position: usize,
    pub(crate) range: Option<TextRange>,
}

impl Token {
    pub(crate) fn new(class: TokenClass, content: String, line: u32) -> Self {
        let mut token = Self {
            class,
            content,
            line,
            end_line: line,
            attributes: IndexMap::new(),
            previous: None,
            next: None,
            position: 0,
            range: None,
        };
        token.set_line(line);
        token
    }

    pub(crate) fn marker(marker: Marker, line: u32) -> Self {
        Self::new(TokenClass::Marker(marker), String::new(), line)
    }

    pub(crate) fn set_line(&mut self, line: u32) {
        self.line = line;
        self.end_line = line + newlines(&self.content);
    }

    pub fn class(&self) -> TokenClass {
        self.class
    }

    pub fn kind(&self) -> Option<TokenKind> {
        match self.class {
            TokenClass::Php(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn marker_kind(&self) -> Option<Marker> {
        match self.class {
            TokenClass::Marker(marker) => Some(marker),
            _ => None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Byte range in the loaded source; `None` for inserted tokens.
    pub fn range(&self) -> Option<TextRange> {
        self.range
    }

    pub fn is_literal(&self, text: &str) -> bool {
        self.class == TokenClass::Literal && self.content == text
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.class == TokenClass::Php(kind)
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.class, TokenClass::Marker(_))
    }

    pub fn is_whitespace(&self) -> bool {
        self.is_kind(TokenKind::T_WHITESPACE)
    }

    pub fn is_comment(&self) -> bool {
        self.kind().is_some_and(TokenKind::is_comment)
    }

    pub fn attributes(&self) -> &IndexMap<String, AttrValue> {
        &self.attributes
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            TokenClass::Literal => write!(f, "Literal(\"{}\", {})", self.content, self.line),
            TokenClass::Php(kind) => {
                write!(f, "PhpToken({kind:?}, {:?}, {})", self.content, self.line)
            }
            TokenClass::Marker(marker) => write!(f, "MarkerToken(id = {})", marker.symbol()),
        }
    }
}

pub(crate) fn newlines(text: &str) -> u32 {
    text.bytes().filter(|&byte| byte == b'\n').count() as u32
}
