//! Bottom-up construction of an [`Ast`] by the external parser.

use drop_bomb::DropBomb;
use la_arena::Arena;

use crate::{Ast, NodeData, NodeId, NodeKind, Slot, SlotValue};

/// Collects nodes children first, then hands out the finished tree.
#[derive(Default)]
pub struct AstBuilder {
    nodes: Arena<NodeData>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, kind: NodeKind) -> NodeBuilder<'_> {
        NodeBuilder {
            builder: self,
            data: NodeData { kind, slots: Vec::new() },
            bomb: DropBomb::new("NodeBuilder must be finished"),
        }
    }

    pub fn finish(self, root: NodeId) -> Ast {
        Ast::new(self.nodes, root)
    }

    /// Roots a top-level statement list: nothing becomes an empty block, a
    /// single statement is the root itself, more get wrapped in a block.
    pub fn finish_statements(mut self, stmts: Vec<NodeId>) -> Ast {
        let root = if stmts.len() == 1 {
            stmts[0]
        } else {
            self.node(NodeKind::Block).list(crate::slot::STMTS, stmts).finish()
        };
        self.finish(root)
    }
}

/// Slots are recorded in the order they are added, which is the order the
/// fallback traversal visits them in.
pub struct NodeBuilder<'b> {
    builder: &'b mut AstBuilder,
    data: NodeData,
    bomb: DropBomb,
}

impl NodeBuilder<'_> {
    fn slot(mut self, name: &'static str, value: SlotValue) -> Self {
        self.data.slots.push(Slot { name, value });
        self
    }

    pub fn node(self, name: &'static str, child: NodeId) -> Self {
        self.slot(name, SlotValue::Node(child))
    }

    pub fn opt(self, name: &'static str, child: Option<NodeId>) -> Self {
        self.slot(name, child.map_or(SlotValue::None, SlotValue::Node))
    }

    pub fn list(self, name: &'static str, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.slot(name, SlotValue::List(children.into_iter().collect()))
    }

    pub fn str(self, name: &'static str, value: impl Into<String>) -> Self {
        self.slot(name, SlotValue::Str(value.into()))
    }

    pub fn flag(self, name: &'static str, value: bool) -> Self {
        self.slot(name, SlotValue::Bool(value))
    }

    pub fn none(self, name: &'static str) -> Self {
        self.slot(name, SlotValue::None)
    }

    pub fn finish(self) -> NodeId {
        let Self { builder, data, mut bomb } = self;
        bomb.defuse();
        builder.nodes.alloc(data)
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;
    use crate::slot;

    #[test]
    fn single_statement_is_the_root() {
        let mut builder = AstBuilder::new();
        let var = builder.node(NodeKind::Variable).str(slot::NAME, "a").finish();
        let ast = builder.finish_statements(vec![var]);
        assert_eq!(ast.root(), var);
        assert_eq!(ast.len(), 1);
    }

    #[test]
    fn statements_are_wrapped_in_a_block() {
        let mut builder = AstBuilder::new();
        let a = builder.node(NodeKind::Variable).str(slot::NAME, "a").finish();
        let one = builder.node(NodeKind::LNumber).str(slot::VALUE, "1").finish();
        let echo = builder.node(NodeKind::Echo).list(slot::EXPRS, [one]).finish();
        let ast = builder.finish_statements(vec![a, echo]);

        expect![[r#"
            Block
              stmts: [2]
                Variable
                  name: "a"
                Echo
                  exprs: [1]
                    LNumber
                      value: "1"
        "#]]
        .assert_eq(&ast.debug_tree());
    }

    #[test]
    fn no_statements_is_an_empty_block() {
        let ast = Ast::default();
        assert!(ast.is(ast.root(), NodeKind::Block));
        assert!(ast.children(ast.root(), slot::STMTS).is_empty());
    }

    #[test]
    #[should_panic(expected = "NodeBuilder must be finished")]
    fn unfinished_node_panics() {
        let mut builder = AstBuilder::new();
        let _ = builder.node(NodeKind::Variable).str(slot::NAME, "a");
    }
}
