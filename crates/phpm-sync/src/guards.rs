//! Contextual exceptions to the translation table. Each guard is named so
//! the alignment trace says which one decided; the first guard that applies
//! wins.

use phpm_ast::{Ast, AstStream, KindSet, NodeId, NodeKind, slot};
use phpm_tokens::TokenKind::*;
use phpm_tokens::{Matcher, TokenKind, TokenRef};

use crate::TranslationTable;

/// The node the tree cursor advances to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Kinds(KindSet),
    /// An `Array` literal, or a parameter declared `array`.
    ArrayLike,
    /// A `BitwiseAnd`, or an `ArrayItem` or `Arg` taken by reference.
    Reference,
}

impl Target {
    pub fn matches(self, ast: &Ast, node: NodeId) -> bool {
        match self {
            Self::Kinds(kinds) => kinds.contains(ast.kind(node)),
            Self::ArrayLike => ast.is(node, NodeKind::Array) || is_array_param(ast, node),
            Self::Reference => match ast.kind(node) {
                NodeKind::BitwiseAnd => true,
                NodeKind::ArrayItem | NodeKind::Arg => ast.flag(node, slot::BY_REF),
                _ => false,
            },
        }
    }

    /// What the target lands on, as named in alignment errors.
    pub fn sought(self) -> Vec<String> {
        match self {
            Self::Kinds(kinds) => kinds.iter().map(|kind| kind.to_string()).collect(),
            Self::ArrayLike => ["Array", "Param(array)"].map(String::from).to_vec(),
            Self::Reference => {
                ["BitwiseAnd", "ArrayItem(byRef)", "Arg(byRef)"].map(String::from).to_vec()
            }
        }
    }
}

/// What one token move does to the tree cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Stay,
    Advance(Target),
    /// The token side ran out.
    Exhaust,
}

struct Guard {
    name: &'static str,
    check: fn(TokenRef<'_>, &AstStream) -> Option<Action>,
}

const INITIALIZED: KindSet = KindSet::new([
    NodeKind::Param,
    NodeKind::PropertyProperty,
    NodeKind::ClassConst,
    NodeKind::Const,
]);

const REFERENCE_DECLARATIONS: KindSet = KindSet::new([
    NodeKind::Function,
    NodeKind::Closure,
    NodeKind::ClassMethod,
    NodeKind::Param,
]);

const GUARDS: &[Guard] = &[
    Guard { name: "marker", check: |token, _| token.token().is_marker().then_some(Action::Stay) },
    Guard {
        name: "closure-use",
        check: |token, ast| {
            let applies = token.token().is_kind(T_USE)
                && node_in(ast, KindSet::new([NodeKind::Closure, NodeKind::Param]));
            applies.then_some(Action::Stay)
        },
    },
    Guard {
        name: "catch-variable",
        check: |token, ast| {
            let applies = token.token().is_kind(T_VARIABLE) && node_in(ast, NodeKind::Catch.into());
            applies.then_some(Action::Stay)
        },
    },
    Guard {
        name: "array-param-variable",
        check: |token, ast| {
            let applies = token.token().is_kind(T_VARIABLE)
                && ast.node().is_some_and(|node| is_array_param(ast.ast(), node));
            applies.then_some(Action::Stay)
        },
    },
    Guard {
        name: "array-keyword",
        check: |token, _| token.token().is_kind(T_ARRAY).then_some(Action::Advance(Target::ArrayLike)),
    },
    Guard {
        name: "member-brace",
        check: |token, _| {
            let applies = token.token().is_literal("{")
                && significant_before(token).is_some_and(|previous| previous.token().is_kind(T_OBJECT_OPERATOR));
            applies.then_some(Action::Stay)
        },
    },
    Guard {
        name: "array-access-brace",
        check: |token, ast| {
            let applies =
                token.token().is_literal("{") && ast.next_kind() == Some(NodeKind::ArrayDimFetch);
            applies.then_some(Action::Advance(Target::Kinds(NodeKind::ArrayDimFetch.into())))
        },
    },
    Guard {
        name: "switch-brace",
        check: |token, _| {
            let applies = token.token().is_literal("{")
                && significant_after(token).is_some_and(|next| is_any_kind(next, &[T_CASE, T_DEFAULT]));
            applies.then_some(Action::Stay)
        },
    },
    Guard {
        name: "initializer",
        check: |token, ast| {
            let applies = token.token().is_literal("=") && node_in(ast, INITIALIZED);
            applies.then_some(Action::Stay)
        },
    },
    Guard {
        name: "reference-after-assign",
        check: |token, _| {
            let applies = token.token().is_literal("&")
                && significant_before(token).is_some_and(|previous| {
                    previous.token().is_literal("=") || is_any_kind(previous, &[T_AS, T_DOUBLE_ARROW])
                });
            applies.then_some(Action::Stay)
        },
    },
    Guard {
        name: "reference-declaration",
        check: |token, ast| {
            let applies = token.token().is_literal("&") && node_in(ast, REFERENCE_DECLARATIONS);
            applies.then_some(Action::Stay)
        },
    },
    Guard {
        name: "reference",
        check: |token, _| token.token().is_literal("&").then_some(Action::Advance(Target::Reference)),
    },
];

/// Decides how the tree cursor follows the token cursor onto `token`,
/// together with the name of the rule that decided.
pub(crate) fn decide(
    token: Option<TokenRef<'_>>,
    ast: &AstStream,
    table: &TranslationTable,
) -> (&'static str, Action) {
    let Some(token) = token else {
        return ("end-of-stream", Action::Exhaust);
    };

    for guard in GUARDS {
        if let Some(action) = (guard.check)(token, ast) {
            return (guard.name, action);
        }
    }

    match table.lookup(token) {
        Some(kinds) => ("table", Action::Advance(Target::Kinds(kinds))),
        None => ("no-entry", Action::Stay),
    }
}

fn node_in(ast: &AstStream, kinds: KindSet) -> bool {
    ast.node_kind().is_some_and(|kind| kinds.contains(kind))
}

fn is_array_param(ast: &Ast, node: NodeId) -> bool {
    ast.is(node, NodeKind::Param) && ast.str(node, slot::TYPE) == Some("array")
}

fn is_any_kind(token: TokenRef<'_>, kinds: &[TokenKind]) -> bool {
    kinds.iter().any(|&kind| token.token().is_kind(kind))
}

fn significant_before(token: TokenRef<'_>) -> Option<TokenRef<'_>> {
    token.find_previous(&!Matcher::WhitespaceOrComment)
}

fn significant_after(token: TokenRef<'_>) -> Option<TokenRef<'_>> {
    token.find_next(&!Matcher::WhitespaceOrComment)
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};
    use phpm_testing::{FixtureLexer, Tree};
    use phpm_tokens::TokenStream;

    use super::*;

    fn check(code: &str, expect: Expect) {
        let mut tokens = TokenStream::new();
        tokens.set_code(&FixtureLexer, code).unwrap();
        let ast = AstStream::default();
        let table = TranslationTable::new();

        let decisions: Vec<String> = tokens
            .tokens()
            .filter(|token| !tokens.is_ignored(token.id()))
            .map(|token| format!("{:?} {}", token.content(), decide(Some(token), &ast, &table).0))
            .collect();
        expect.assert_eq(&decisions.join("\n"));
    }

    #[test]
    fn references() {
        check(
            "<?php $a = &$b; foreach ($a as &$v) {} $c = $a & $b;",
            expect![[r#"
                "" marker
                "<?php" no-entry
                "$a" table
                "=" table
                "&" reference-after-assign
                "$b" table
                ";" no-entry
                "foreach" no-entry
                "(" no-entry
                "$a" table
                "as" no-entry
                "&" reference-after-assign
                "$v" table
                ")" no-entry
                "{" table
                "}" no-entry
                "$c" table
                "=" table
                "$a" table
                "&" reference
                "$b" table
                ";" no-entry
                "" marker"#]],
        );
    }

    #[test]
    fn braces() {
        check(
            "<?php $a->{'b'}; switch ($a) { default: } $s{0};",
            expect![[r#"
                "" marker
                "<?php" no-entry
                "$a" table
                "->" table
                "{" member-brace
                "'b'" table
                "}" no-entry
                ";" no-entry
                "switch" no-entry
                "(" no-entry
                "$a" table
                ")" no-entry
                "{" switch-brace
                "default" table
                ":" no-entry
                "}" no-entry
                "$s" table
                "{" table
                "0" table
                "}" no-entry
                ";" no-entry
                "" marker"#]],
        );
    }

    #[test]
    fn end_of_stream_exhausts() {
        let ast = AstStream::default();
        assert_eq!(decide(None, &ast, &TranslationTable::new()), ("end-of-stream", Action::Exhaust));
    }

    #[test]
    fn targets() {
        let mut tree = Tree::new();
        let value = tree.var("a");
        let by_ref = tree.array_item(None, value, true);
        let value = tree.var("b");
        let by_value = tree.array_item(None, value, false);
        let array = tree.array(vec![by_ref, by_value]);
        let typed = tree.param("p", None, Some("array"), false);
        let untyped = tree.param("q", None, None, false);
        let ast = tree.finish(vec![array, typed, untyped]);

        assert!(Target::Reference.matches(&ast, by_ref));
        assert!(!Target::Reference.matches(&ast, by_value));
        assert!(Target::ArrayLike.matches(&ast, array));
        assert!(Target::ArrayLike.matches(&ast, typed));
        assert!(!Target::ArrayLike.matches(&ast, untyped));
        assert!(Target::Kinds(NodeKind::Param.into()).matches(&ast, untyped));

        assert_eq!(Target::ArrayLike.sought(), ["Array", "Param(array)"]);
        assert_eq!(Target::Kinds(NodeKind::Param.into()).sought(), ["Param"]);
    }
}
