use std::cell::OnceCell;
use std::fmt::{self, Write as _};

use la_arena::{Arena, Idx};

use crate::{AstBuilder, NodeKind, traversal};

pub type NodeId = Idx<NodeData>;

/// Slot names used by PHP-Parser's nodes.
pub mod slot {
    pub const ARGS: &str = "args";
    pub const BY_REF: &str = "byRef";
    pub const CASES: &str = "cases";
    pub const CATCHES: &str = "catches";
    pub const CLASS: &str = "class";
    pub const COND: &str = "cond";
    pub const CONSTS: &str = "consts";
    pub const DEFAULT: &str = "default";
    pub const DIM: &str = "dim";
    pub const ELSE: &str = "else";
    pub const ELSEIFS: &str = "elseifs";
    pub const EXPR: &str = "expr";
    pub const EXPRS: &str = "exprs";
    pub const EXTENDS: &str = "extends";
    pub const FINALLY: &str = "finally";
    pub const IF: &str = "if";
    pub const IMPLEMENTS: &str = "implements";
    pub const INIT: &str = "init";
    pub const ITEMS: &str = "items";
    pub const KEY: &str = "key";
    pub const KEY_VAR: &str = "keyVar";
    pub const LEFT: &str = "left";
    pub const LOOP: &str = "loop";
    pub const NAME: &str = "name";
    pub const NUM: &str = "num";
    pub const PARAMS: &str = "params";
    pub const PARTS: &str = "parts";
    pub const PROPS: &str = "props";
    pub const RIGHT: &str = "right";
    pub const STATIC: &str = "static";
    pub const STMTS: &str = "stmts";
    pub const TYPE: &str = "type";
    pub const USES: &str = "uses";
    pub const VALUE: &str = "value";
    pub const VALUE_VAR: &str = "valueVar";
    pub const VAR: &str = "var";
    pub const VARS: &str = "vars";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotValue {
    None,
    Node(NodeId),
    List(Vec<NodeId>),
    Str(String),
    Bool(bool),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub name: &'static str,
    pub value: SlotValue,
}

#[derive(Clone, Debug)]
pub struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) slots: Vec<Slot>,
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Slots in declaration order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&SlotValue> {
        self.slots.iter().find(|slot| slot.name == name).map(|slot| &slot.value)
    }
}

/// A parsed PHP tree as the parser hands it over. Never mutated once built.
#[derive(Debug)]
pub struct Ast {
    pub(crate) nodes: Arena<NodeData>,
    pub(crate) root: NodeId,
    in_order: OnceCell<Box<[NodeId]>>,
}

impl Default for Ast {
    fn default() -> Self {
        AstBuilder::new().finish_statements(Vec::new())
    }
}

impl Ast {
    pub(crate) fn new(nodes: Arena<NodeData>, root: NodeId) -> Self {
        Self { nodes, root, in_order: OnceCell::new() }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, node: NodeId) -> &NodeData {
        &self.nodes[node]
    }

    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node].kind
    }

    pub fn is(&self, node: NodeId, kind: NodeKind) -> bool {
        self.kind(node) == kind
    }

    pub fn slot(&self, node: NodeId, name: &str) -> Option<&SlotValue> {
        self.nodes[node].slot(name)
    }

    pub fn child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        match self.slot(node, name)? {
            SlotValue::Node(child) => Some(*child),
            _ => None,
        }
    }

    pub fn children(&self, node: NodeId, name: &str) -> &[NodeId] {
        match self.slot(node, name) {
            Some(SlotValue::List(children)) => children,
            _ => &[],
        }
    }

    pub fn str(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.slot(node, name)? {
            SlotValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn flag(&self, node: NodeId, name: &str) -> bool {
        matches!(self.slot(node, name), Some(SlotValue::Bool(true)))
    }

    /// Every node in the order its construct appears in the source.
    pub fn in_order(&self) -> &[NodeId] {
        self.in_order.get_or_init(|| traversal::flatten(self))
    }

    /// An indented dump of the tree, slots in declaration order.
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        self.dump(&mut out, self.root, 0).ok();
        out
    }

    fn dump(&self, out: &mut String, node: NodeId, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        writeln!(out, "{indent}{}", self.kind(node))?;

        for slot in self.node(node).slots() {
            match &slot.value {
                SlotValue::None => {}
                SlotValue::Node(child) => {
                    writeln!(out, "{indent}  {}:", slot.name)?;
                    self.dump(out, *child, depth + 2)?;
                }
                SlotValue::List(children) => {
                    writeln!(out, "{indent}  {}: [{}]", slot.name, children.len())?;
                    for &child in children {
                        self.dump(out, child, depth + 2)?;
                    }
                }
                SlotValue::Str(value) => writeln!(out, "{indent}  {}: {value:?}", slot.name)?,
                SlotValue::Bool(value) => writeln!(out, "{indent}  {}: {value}", slot.name)?,
            }
        }

        Ok(())
    }
}
