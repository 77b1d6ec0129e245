use phpm_errors::{Error, Result};
use tracing::trace;

use crate::{Ast, KindSet, NodeId, NodeKind};

/// A forward-only cursor over the in-order node sequence of one tree.
#[derive(Debug)]
pub struct AstStream {
    ast: Ast,
    consumed: usize,
    previous: Option<NodeId>,
    node: Option<NodeId>,
    next: Option<NodeId>,
}

impl Default for AstStream {
    fn default() -> Self {
        Self::new(Ast::default())
    }
}

impl AstStream {
    pub fn new(ast: Ast) -> Self {
        let mut stream = Self { ast, consumed: 0, previous: None, node: None, next: None };
        stream.reset();
        stream
    }

    pub fn set_ast(&mut self, ast: Ast) {
        self.ast = ast;
        self.reset();
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn nodes(&self) -> &[NodeId] {
        self.ast.in_order()
    }

    /// Rewinds to just before the first node.
    pub fn reset(&mut self) {
        self.consumed = 0;
        self.previous = None;
        self.node = None;
        self.next = None;
        self.move_next();
    }

    pub fn move_next(&mut self) -> bool {
        self.previous = self.node;
        self.node = self.next;

        self.next = self.ast.in_order().get(self.consumed).copied();
        if self.next.is_some() {
            self.consumed += 1;
        }

        self.node.is_some()
    }

    /// Moves forward until the current node's kind is in `kinds`.
    pub fn skip_until(&mut self, kinds: KindSet) -> Result<NodeId> {
        let mut visited = Vec::new();
        while self.move_next() {
            let Some(node) = self.node else { break };
            let kind = self.ast.kind(node);
            visited.push(kind);
            if kinds.contains(kind) {
                trace!(?kind, skipped = visited.len() - 1, "ast cursor landed");
                return Ok(node);
            }
        }

        Err(Error::match_not_found(kinds.iter(), visited))
    }

    /// Moves forward until `predicate` accepts the current node. `sought`
    /// names what the predicate accepts in the error raised on exhaustion.
    pub fn skip_unless<S>(
        &mut self,
        sought: S,
        predicate: impl Fn(&Ast, NodeId) -> bool,
    ) -> Result<NodeId>
    where
        S: IntoIterator,
        S::Item: ToString,
    {
        let mut visited: Vec<NodeKind> = Vec::new();
        while self.move_next() {
            let Some(node) = self.node else { break };
            visited.push(self.ast.kind(node));
            if predicate(&self.ast, node) {
                trace!(kind = ?self.ast.kind(node), skipped = visited.len() - 1, "ast cursor landed");
                return Ok(node);
            }
        }

        Err(Error::match_not_found(sought, visited))
    }

    /// Clears the window once the token side has run out. The cursor stays at
    /// the end afterwards.
    pub fn exhaust(&mut self) {
        if self.node.is_some() {
            self.previous = self.node;
        }
        self.node = None;
        self.next = None;
        self.consumed = self.ast.in_order().len();
    }

    pub fn previous(&self) -> Option<NodeId> {
        self.previous
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn node_kind(&self) -> Option<NodeKind> {
        self.node.map(|node| self.ast.kind(node))
    }

    pub fn next_kind(&self) -> Option<NodeKind> {
        self.next.map(|node| self.ast.kind(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AstBuilder, slot};

    /// `$a = 0 === $b & 4;`
    fn assignment() -> Ast {
        let mut builder = AstBuilder::new();
        let a = builder.node(NodeKind::Variable).str(slot::NAME, "a").finish();
        let zero = builder.node(NodeKind::LNumber).str(slot::VALUE, "0").finish();
        let b = builder.node(NodeKind::Variable).str(slot::NAME, "b").finish();
        let four = builder.node(NodeKind::LNumber).str(slot::VALUE, "4").finish();
        let and = builder.node(NodeKind::BitwiseAnd).node(slot::LEFT, b).node(slot::RIGHT, four).finish();
        let identical =
            builder.node(NodeKind::Identical).node(slot::LEFT, zero).node(slot::RIGHT, and).finish();
        let assign =
            builder.node(NodeKind::Assign).node(slot::VAR, a).node(slot::EXPR, identical).finish();
        builder.finish(assign)
    }

    #[test]
    fn window_moves_over_the_in_order_sequence() {
        let mut stream = AstStream::new(assignment());
        assert_eq!(stream.node(), None);
        assert_eq!(stream.next_kind(), Some(NodeKind::Variable));

        assert!(stream.move_next());
        assert!(stream.move_next());
        assert_eq!(stream.node_kind(), Some(NodeKind::Assign));
        assert_eq!(stream.next_kind(), Some(NodeKind::LNumber));

        let kinds: Vec<_> = stream.nodes().iter().map(|&node| stream.ast().kind(node)).collect();
        assert_eq!(
            kinds,
            [
                NodeKind::Variable,
                NodeKind::Assign,
                NodeKind::LNumber,
                NodeKind::Identical,
                NodeKind::Variable,
                NodeKind::BitwiseAnd,
                NodeKind::LNumber,
            ]
        );
    }

    #[test]
    fn skip_until_lands_on_the_first_member() {
        let mut stream = AstStream::new(assignment());
        let node = stream.skip_until(KindSet::new([NodeKind::Identical])).unwrap();
        assert_eq!(stream.ast().kind(node), NodeKind::Identical);
        assert_eq!(stream.previous().map(|node| stream.ast().kind(node)), Some(NodeKind::LNumber));
    }

    #[test]
    fn exhausted_skip_lists_what_it_saw() {
        let mut stream = AstStream::new(assignment());
        stream.move_next();
        stream.move_next();

        let error = stream.skip_until(KindSet::new([NodeKind::If])).unwrap_err();
        assert_eq!(
            error.to_string(),
            "could not find any node of kinds (If); visited: \
             [LNumber, Identical, Variable, BitwiseAnd, LNumber]"
        );
        assert_eq!(stream.node(), None);
    }

    #[test]
    fn skip_unless_takes_a_predicate() {
        let mut stream = AstStream::new(assignment());
        let node = stream
            .skip_unless(["Variable(b)"], |ast, node| ast.str(node, slot::NAME) == Some("b"))
            .unwrap();
        assert_eq!(stream.ast().str(node, slot::NAME), Some("b"));

        let error = stream.skip_unless(["Nothing"], |_, _| false).unwrap_err();
        assert_eq!(error, Error::match_not_found(["Nothing"], ["BitwiseAnd", "LNumber"]));
    }

    #[test]
    fn exhaust_clears_the_window() {
        let mut stream = AstStream::new(assignment());
        stream.move_next();
        stream.exhaust();

        assert_eq!(stream.node(), None);
        assert_eq!(stream.next(), None);
        assert_eq!(stream.previous().map(|node| stream.ast().kind(node)), Some(NodeKind::Variable));
        assert!(!stream.move_next());
    }
}
