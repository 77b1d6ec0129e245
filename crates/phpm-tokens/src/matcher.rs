use std::borrow::Cow;
use std::cell::Cell;
use std::fmt;
use std::ops::Not;
use std::rc::Rc;

use crate::{Marker, TokenKind, TokenRef};

/// What a scan over the token chain is looking for.
#[derive(Clone)]
pub enum Matcher {
    Kind(TokenKind),
    Literal(Cow<'static, str>),
    Marker(Marker),
    Not(Box<Matcher>),
    Whitespace,
    Comment,
    WhitespaceOrComment,
    /// The last token on its line.
    EndOfLine,
    /// Anything that cannot continue a (possibly qualified) name.
    EndOfName,
    /// The `)` closing the call the scan started in. Counts the parens opened
    /// since, so a fresh matcher is needed per scan.
    EndOfCall(Cell<u32>),
    Predicate(Rc<dyn Fn(TokenRef<'_>) -> bool>),
}

impl Matcher {
    pub fn literal(text: impl Into<Cow<'static, str>>) -> Self {
        Self::Literal(text.into())
    }

    pub fn end_of_call() -> Self {
        Self::EndOfCall(Cell::new(0))
    }

    pub fn predicate(predicate: impl Fn(TokenRef<'_>) -> bool + 'static) -> Self {
        Self::Predicate(Rc::new(predicate))
    }

    pub fn matches(&self, token: TokenRef<'_>) -> bool {
        let data = token.token();
        match self {
            Self::Kind(kind) => data.is_kind(*kind),
            Self::Literal(text) => data.is_literal(text),
            Self::Marker(marker) => data.marker_kind() == Some(*marker),
            Self::Not(inner) => !inner.matches(token),
            Self::Whitespace => data.is_whitespace(),
            Self::Comment => data.is_comment(),
            Self::WhitespaceOrComment => data.is_whitespace() || data.is_comment(),
            Self::EndOfLine => token.is_last_on_line(),
            Self::EndOfName => {
                !data.is_kind(TokenKind::T_STRING) && !data.is_kind(TokenKind::T_NS_SEPARATOR)
            }
            Self::EndOfCall(opened) => {
                if data.is_literal(")") {
                    match opened.get() {
                        0 => return true,
                        n => opened.set(n - 1),
                    }
                } else if data.is_literal("(") {
                    opened.set(opened.get() + 1);
                }
                false
            }
            Self::Predicate(predicate) => predicate(token),
        }
    }
}

impl Not for Matcher {
    type Output = Self;

    fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}

impl From<TokenKind> for Matcher {
    fn from(kind: TokenKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<&'static str> for Matcher {
    fn from(text: &'static str) -> Self {
        Self::Literal(Cow::Borrowed(text))
    }
}

impl From<Marker> for Matcher {
    fn from(marker: Marker) -> Self {
        Self::Marker(marker)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => write!(f, "{kind:?}"),
            Self::Literal(text) => write!(f, "{text:?}"),
            Self::Marker(marker) => write!(f, "{}", marker.symbol()),
            Self::Not(inner) => write!(f, "NO_{inner}"),
            Self::Whitespace => f.write_str("WHITESPACE"),
            Self::Comment => f.write_str("COMMENT"),
            Self::WhitespaceOrComment => f.write_str("WHITESPACE_OR_COMMENT"),
            Self::EndOfLine => f.write_str("END_OF_LINE"),
            Self::EndOfName => f.write_str("END_OF_NAME"),
            Self::EndOfCall(_) => f.write_str("END_OF_CALL"),
            Self::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matcher({self})")
    }
}
