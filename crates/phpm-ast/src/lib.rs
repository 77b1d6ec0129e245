//! The structural half of phpm: the tree handed over by the parser, its
//! in-order flattening and a cursor over it.

mod builder;
mod kind;
mod kind_set;
mod stream;
mod traversal;
mod tree;

pub use builder::{AstBuilder, NodeBuilder};
pub use kind::NodeKind;
pub use kind_set::KindSet;
pub use stream::AstStream;
pub use traversal::{Visitor, traverse};
pub use tree::{Ast, NodeData, NodeId, Slot, SlotValue, slot};
