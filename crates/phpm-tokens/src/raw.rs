use crate::TokenKind;

/// A token as the external lexer hands it over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawToken {
    /// Structural punctuation. Carries no line, the stream derives it.
    Literal(String),
    Php { kind: TokenKind, text: String, line: u32 },
}

impl RawToken {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn php(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Self::Php { kind, text: text.into(), line }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Php { text, .. } => text,
        }
    }
}

/// A token to be synthesized by an insertion. Lines are assigned by the
/// stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewToken {
    Literal(String),
    Php(TokenKind, String),
}

impl NewToken {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn php(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::Php(kind, text.into())
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        Self::Php(TokenKind::T_WHITESPACE, text.into())
    }
}

/// The external lexer.
pub trait Lexer {
    fn tokenize(&self, source: &str) -> Vec<RawToken>;
}

impl<F> Lexer for F
where
    F: Fn(&str) -> Vec<RawToken>,
{
    fn tokenize(&self, source: &str) -> Vec<RawToken> {
        self(source)
    }
}
