//! Walks a PHP token stream and the in-order node sequence of its tree side
//! by side, keeping the current node in step with the current token.

mod guards;
mod stream;
mod translation;

pub use guards::{Action, Target};
pub use stream::{NodeSpan, SimultaneousTokenAstStream};
pub use translation::{TokenKey, TranslationTable};
