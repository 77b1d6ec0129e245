use phpm_ast::{KindSet, NodeKind};
use phpm_tokens::TokenKind::{self, *};
use phpm_tokens::{TokenClass, TokenRef};
use rustc_hash::FxHashMap;

/// The part of a token the translation table is keyed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKey {
    Kind(TokenKind),
    Literal(&'static str),
}

/// Node kinds a token may open. Tokens missing here never move the tree
/// cursor on their own.
const ENTRIES: &[(TokenKey, KindSet)] = &[
    (TokenKey::Kind(T_IF), KindSet::new([NodeKind::If])),
    (TokenKey::Kind(T_ELSEIF), KindSet::new([NodeKind::ElseIf])),
    (TokenKey::Kind(T_ELSE), KindSet::new([NodeKind::Else])),
    (TokenKey::Kind(T_CASE), KindSet::new([NodeKind::Case])),
    (TokenKey::Kind(T_DEFAULT), KindSet::new([NodeKind::Case])),
    (TokenKey::Kind(T_CATCH), KindSet::new([NodeKind::Catch])),
    (TokenKey::Kind(T_TRY), KindSet::new([NodeKind::TryCatch])),
    (TokenKey::Kind(T_THROW), KindSet::new([NodeKind::Throw])),
    (TokenKey::Kind(T_NAMESPACE), KindSet::new([NodeKind::Namespace])),
    (TokenKey::Kind(T_USE), KindSet::new([NodeKind::Use, NodeKind::ClosureUse, NodeKind::TraitUse])),
    (TokenKey::Kind(T_NEW), KindSet::new([NodeKind::New])),
    (TokenKey::Literal("{"), KindSet::new([NodeKind::Block])),
    (TokenKey::Literal("="), KindSet::new([NodeKind::Assign, NodeKind::AssignRef, NodeKind::AssignList])),
    (TokenKey::Literal("|"), KindSet::new([NodeKind::BitwiseOr])),
    (TokenKey::Literal("^"), KindSet::new([NodeKind::BitwiseXor])),
    (TokenKey::Literal("~"), KindSet::new([NodeKind::BitwiseNot])),
    (TokenKey::Kind(T_OBJECT_OPERATOR), KindSet::new([NodeKind::PropertyFetch, NodeKind::MethodCall])),
    (
        TokenKey::Kind(T_VARIABLE),
        KindSet::new([
            NodeKind::Variable,
            NodeKind::Param,
            NodeKind::PropertyProperty,
            NodeKind::ClosureUse,
            NodeKind::StaticPropertyFetch,
            NodeKind::StaticVar,
        ]),
    ),
    (TokenKey::Kind(T_CONSTANT_ENCAPSED_STRING), KindSet::new([NodeKind::String])),
    (TokenKey::Kind(T_CLASS), KindSet::new([NodeKind::Class])),
    (TokenKey::Kind(T_INTERFACE), KindSet::new([NodeKind::Interface])),
    (TokenKey::Kind(T_TRAIT), KindSet::new([NodeKind::Trait])),
    (
        TokenKey::Kind(T_FUNCTION),
        KindSet::new([NodeKind::Function, NodeKind::ClassMethod, NodeKind::Closure]),
    ),
    (TokenKey::Kind(T_CONST), KindSet::new([NodeKind::ClassConst, NodeKind::Const])),
    (TokenKey::Kind(T_LNUMBER), KindSet::new([NodeKind::LNumber])),
    (TokenKey::Kind(T_DNUMBER), KindSet::new([NodeKind::DNumber])),
];

#[derive(Debug, Clone)]
pub struct TranslationTable {
    kinds: FxHashMap<TokenKind, KindSet>,
    literals: FxHashMap<&'static str, KindSet>,
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationTable {
    pub fn new() -> Self {
        let mut table = Self { kinds: FxHashMap::default(), literals: FxHashMap::default() };
        for &(key, set) in ENTRIES {
            match key {
                TokenKey::Kind(kind) => table.kinds.insert(kind, set),
                TokenKey::Literal(text) => table.literals.insert(text, set),
            };
        }
        table
    }

    pub fn get(&self, key: TokenKey) -> Option<KindSet> {
        match key {
            TokenKey::Kind(kind) => self.kinds.get(&kind).copied(),
            TokenKey::Literal(text) => self.literals.get(text).copied(),
        }
    }

    pub fn lookup(&self, token: TokenRef<'_>) -> Option<KindSet> {
        match token.class() {
            TokenClass::Php(kind) => self.kinds.get(&kind).copied(),
            TokenClass::Literal => self.literals.get(token.content()).copied(),
            TokenClass::Marker(_) => None,
        }
    }

    /// The table's rows, in declaration order.
    pub fn entries() -> impl Iterator<Item = (TokenKey, KindSet)> {
        ENTRIES.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_is_reachable() {
        let table = TranslationTable::new();
        assert_eq!(table.kinds.len() + table.literals.len(), ENTRIES.len());
        for (key, set) in TranslationTable::entries() {
            assert_eq!(table.get(key), Some(set), "{key:?}");
            assert!(!set.is_empty(), "{key:?}");
        }
    }

    #[test]
    fn closers_have_no_entry() {
        let table = TranslationTable::new();
        for closer in [")", "]", "}", ";", ","] {
            assert_eq!(table.get(TokenKey::Literal(closer)), None);
        }
        assert_eq!(table.get(TokenKey::Kind(T_CURLY_OPEN)), None);
        assert_eq!(table.get(TokenKey::Kind(T_STRING)), None);
    }

    #[test]
    fn variables_cover_every_variable_like_node() {
        let set = TranslationTable::new().get(TokenKey::Kind(T_VARIABLE)).unwrap();
        expect_test::expect![[
            r#"{Param, ClosureUse, StaticPropertyFetch, Variable, PropertyProperty, StaticVar}"#
        ]]
        .assert_eq(&format!("{set:?}"));
    }
}
