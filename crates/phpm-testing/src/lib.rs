//! Test inputs for the phpm crates: a small PHP lexer and tree shorthands.
//! Not a parser; trees are built by hand next to the code they describe.

mod cursor;
mod lexer;
mod tree;

pub use lexer::{FixtureLexer, tokenize};
pub use tree::Tree;
