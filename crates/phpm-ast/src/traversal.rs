//! In-order traversal: visits nodes in the order their constructs appear in
//! the source, which for many expressions is not the order of their slots.

use std::ops::ControlFlow;

use crate::{Ast, KindSet, NodeId, NodeKind, SlotValue, slot};

pub trait Visitor {
    fn visit(&mut self, ast: &Ast, node: NodeId, parent: Option<NodeId>) -> ControlFlow<()>;
}

impl<F> Visitor for F
where
    F: FnMut(&Ast, NodeId, Option<NodeId>) -> ControlFlow<()>,
{
    fn visit(&mut self, ast: &Ast, node: NodeId, parent: Option<NodeId>) -> ControlFlow<()> {
        self(ast, node, parent)
    }
}

/// What gets visited after the node itself.
#[derive(Clone, Copy, Debug)]
enum Right {
    /// These slots, in this order.
    Slots(&'static [&'static str]),
    /// Every slot in declaration order.
    All,
}

#[derive(Clone, Copy, Debug)]
struct Rule {
    left: Option<&'static str>,
    right: Right,
}

impl Rule {
    const fn new(left: Option<&'static str>, right: Right) -> Self {
        Self { left, right }
    }
}

const BINARY: KindSet = KindSet::new([
    NodeKind::BitwiseAnd,
    NodeKind::BitwiseOr,
    NodeKind::BitwiseXor,
    NodeKind::BooleanAnd,
    NodeKind::BooleanOr,
    NodeKind::Concat,
    NodeKind::Div,
    NodeKind::Equal,
    NodeKind::Greater,
    NodeKind::GreaterOrEqual,
    NodeKind::Identical,
    NodeKind::LogicalAnd,
    NodeKind::LogicalOr,
    NodeKind::LogicalXor,
    NodeKind::Minus,
    NodeKind::Mod,
    NodeKind::Mul,
    NodeKind::NotEqual,
    NodeKind::NotIdentical,
    NodeKind::Plus,
    NodeKind::ShiftLeft,
    NodeKind::ShiftRight,
    NodeKind::Smaller,
    NodeKind::SmallerOrEqual,
]);

const ASSIGNMENT: KindSet = KindSet::new([
    NodeKind::Assign,
    NodeKind::AssignBitwiseAnd,
    NodeKind::AssignBitwiseOr,
    NodeKind::AssignBitwiseXor,
    NodeKind::AssignConcat,
    NodeKind::AssignDiv,
    NodeKind::AssignMinus,
    NodeKind::AssignMod,
    NodeKind::AssignMul,
    NodeKind::AssignPlus,
    NodeKind::AssignRef,
    NodeKind::AssignShiftLeft,
    NodeKind::AssignShiftRight,
]);

fn rule(kind: NodeKind) -> Rule {
    use slot::*;

    if BINARY.contains(kind) {
        return Rule::new(Some(LEFT), Right::Slots(&[RIGHT]));
    }
    if ASSIGNMENT.contains(kind) {
        return Rule::new(Some(VAR), Right::Slots(&[EXPR]));
    }

    match kind {
        NodeKind::AssignList => Rule::new(Some(VARS), Right::Slots(&[EXPR])),
        NodeKind::Instanceof => Rule::new(Some(EXPR), Right::Slots(&[CLASS])),
        NodeKind::ArrayDimFetch => Rule::new(Some(VAR), Right::Slots(&[DIM])),
        NodeKind::PropertyFetch => Rule::new(Some(VAR), Right::Slots(&[NAME])),
        NodeKind::StaticPropertyFetch => Rule::new(Some(CLASS), Right::Slots(&[NAME])),
        NodeKind::MethodCall => Rule::new(Some(VAR), Right::Slots(&[NAME, ARGS])),
        NodeKind::StaticCall => Rule::new(Some(CLASS), Right::Slots(&[NAME, ARGS])),
        NodeKind::ClassConstFetch => Rule::new(Some(CLASS), Right::Slots(&[NAME])),
        NodeKind::Ternary => Rule::new(Some(COND), Right::Slots(&[IF, ELSE])),
        NodeKind::Case => Rule::new(None, Right::Slots(&[COND, STMTS])),
        NodeKind::Do => Rule::new(None, Right::Slots(&[STMTS, COND])),
        NodeKind::If => Rule::new(None, Right::Slots(&[COND, STMTS, ELSEIFS, ELSE])),
        NodeKind::Foreach => Rule::new(None, Right::Slots(&[EXPR, KEY_VAR, VALUE_VAR, STMTS])),
        NodeKind::PostInc | NodeKind::PostDec => Rule::new(Some(VAR), Right::Slots(&[])),
        _ => Rule::new(None, Right::All),
    }
}

pub fn traverse(ast: &Ast, visitor: &mut impl Visitor) -> ControlFlow<()> {
    walk(ast, ast.root(), None, visitor)
}

pub(crate) fn flatten(ast: &Ast) -> Box<[NodeId]> {
    let mut nodes = Vec::with_capacity(ast.len());
    let _ = traverse(ast, &mut |_: &Ast, node: NodeId, _: Option<NodeId>| {
        nodes.push(node);
        ControlFlow::Continue(())
    });
    nodes.into_boxed_slice()
}

fn walk(
    ast: &Ast,
    node: NodeId,
    parent: Option<NodeId>,
    visitor: &mut impl Visitor,
) -> ControlFlow<()> {
    let rule = rule(ast.kind(node));

    if let Some(left) = rule.left {
        walk_slot(ast, node, left, visitor)?;
    }

    visitor.visit(ast, node, parent)?;

    match rule.right {
        Right::Slots(names) => {
            for name in names {
                walk_slot(ast, node, name, visitor)?;
            }
        }
        Right::All => {
            for slot in ast.node(node).slots() {
                walk_value(ast, node, &slot.value, visitor)?;
            }
        }
    }

    ControlFlow::Continue(())
}

fn walk_slot(
    ast: &Ast,
    node: NodeId,
    name: &str,
    visitor: &mut impl Visitor,
) -> ControlFlow<()> {
    match ast.slot(node, name) {
        Some(value) => walk_value(ast, node, value, visitor),
        None => ControlFlow::Continue(()),
    }
}

/// Strings, flags and empty slots are not nodes and are skipped.
fn walk_value(
    ast: &Ast,
    parent: NodeId,
    value: &SlotValue,
    visitor: &mut impl Visitor,
) -> ControlFlow<()> {
    match value {
        SlotValue::Node(child) => walk(ast, *child, Some(parent), visitor),
        SlotValue::List(children) => {
            children.iter().try_for_each(|&child| walk(ast, child, Some(parent), visitor))
        }
        SlotValue::None | SlotValue::Str(_) | SlotValue::Bool(_) => ControlFlow::Continue(()),
    }
}
