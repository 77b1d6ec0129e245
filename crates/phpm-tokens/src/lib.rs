//! The lexical half of phpm: a normalized, line-accurate PHP token stream
//! with a sliding cursor, filtering and in-place insertion.

mod kind;
mod matcher;
mod normalize;
mod raw;
mod stream;
mod token;
mod token_ref;

pub use kind::TokenKind;
pub use matcher::Matcher;
pub use raw::{Lexer, NewToken, RawToken};
pub use stream::{MoveObserver, StreamConfig, TokenStream};
pub use token::{AttrValue, Marker, Token, TokenClass, TokenId};
pub use token_ref::TokenRef;
