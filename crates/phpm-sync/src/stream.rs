use std::fmt;

use la_arena::ArenaMap;
use phpm_ast::{Ast, AstStream, NodeId, NodeKind};
use phpm_errors::{Error, Result};
use phpm_tokens::{
    Lexer, Matcher, MoveObserver, NewToken, StreamConfig, TokenId, TokenRef, TokenStream,
};
use tracing::{debug, trace};

use crate::guards::{Action, Target, decide};
use crate::TranslationTable;

/// First and last token of a node, as found by the alignment pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeSpan {
    pub start_token: TokenId,
    pub end_token: TokenId,
}

/// A token stream and the in-order node stream of the same source, moved
/// together.
///
/// Traversal happens on the tokens. After every token move the tree cursor
/// is advanced to the node the new token belongs to, if the token opens one;
/// tokens without a node of their own leave it where it is.
#[derive(Default)]
pub struct SimultaneousTokenAstStream {
    tokens: TokenStream,
    ast: AstStream,
    table: TranslationTable,
    spans: ArenaMap<NodeId, NodeSpan>,
}

impl fmt::Debug for SimultaneousTokenAstStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimultaneousTokenAstStream")
            .field("tokens", &self.tokens)
            .field("ast", &self.ast)
            .finish_non_exhaustive()
    }
}

impl SimultaneousTokenAstStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StreamConfig) -> Self {
        Self { tokens: TokenStream::with_config(config), ..Self::default() }
    }

    pub fn set_ignore_whitespace(&mut self, ignore: bool) -> Result<()> {
        self.tokens.set_ignore_whitespace(ignore)
    }

    pub fn set_ignore_comments(&mut self, ignore: bool) -> Result<()> {
        self.tokens.set_ignore_comments(ignore)
    }

    /// Loads `code` and the tree parsed from it, then walks both once to
    /// record every aligned node's first and last token.
    pub fn set_input(&mut self, lexer: &impl Lexer, code: &str, ast: Ast) -> Result<()> {
        self.ast.set_ast(ast);
        self.tokens.set_code(lexer, code)?;
        self.spans = ArenaMap::default();

        let tagged = self.tag_spans()?;
        self.reset();

        debug!(nodes = self.ast.nodes().len(), tagged, "loaded simultaneous stream");
        Ok(())
    }

    fn tag_spans(&mut self) -> Result<usize> {
        let mut open: Option<(NodeId, TokenId)> = None;
        let mut tagged = 0;

        while self.move_next()? {
            let (Some(node), Some(token)) = (self.ast.node(), self.tokens.token()) else {
                continue;
            };
            if open.is_some_and(|(current, _)| current == node) {
                continue;
            }

            let (token, predecessor) = (token.id(), token.previous().map(TokenRef::id));
            if let Some((previous, start_token)) = open {
                let end_token = predecessor.unwrap_or(start_token);
                self.spans.insert(previous, NodeSpan { start_token, end_token });
                tagged += 1;
            }

            trace!(kind = %self.ast.ast().kind(node), ?token, "node starts");
            open = Some((node, token));
        }

        if let Some((node, start_token)) = open {
            let end_token = self.last_token().unwrap_or(start_token);
            self.spans.insert(node, NodeSpan { start_token, end_token });
            tagged += 1;
        }
        Ok(tagged)
    }

    /// The last token before the end marker.
    fn last_token(&self) -> Option<TokenId> {
        let &end = self.tokens.sequence().last()?;
        self.tokens.get(end).previous().filter(|token| !token.token().is_marker()).map(TokenRef::id)
    }

    pub fn reset(&mut self) {
        self.tokens.reset();
        self.ast.reset();
    }

    pub fn move_next(&mut self) -> Result<bool> {
        self.move_next_with(&mut NoHooks)
    }

    /// Moves both cursors, forwarding the token stream's hooks to `observer`.
    /// Alignment runs before the observer's `after_move`.
    pub fn move_next_with<O>(&mut self, observer: &mut O) -> Result<bool, O::Error>
    where
        O: MoveObserver,
        O::Error: From<Error>,
    {
        let mut aligner = Aligner { ast: &mut self.ast, table: &self.table, observer };
        self.tokens.move_next_with(&mut aligner)
    }

    pub fn move_to_token(&mut self, token: TokenId) -> Result<()> {
        while self.tokens.token().map(TokenRef::id) != Some(token) {
            if !self.move_next()? {
                return Err(Error::TokenNotFound { token: self.tokens.describe(token) });
            }
        }
        Ok(())
    }

    /// Moves until the current token matches, returning it.
    pub fn skip_until(&mut self, matcher: &Matcher) -> Result<Option<TokenId>> {
        while self.move_next()? {
            if let Some(token) = self.tokens.token().filter(|token| token.matches(matcher)) {
                return Ok(Some(token.id()));
            }
        }
        Ok(None)
    }

    pub fn insert_token_before(&mut self, anchor: TokenId, token: NewToken) -> Result<Vec<TokenId>> {
        self.tokens.insert_before(anchor, token)
    }

    pub fn insert_tokens_before(
        &mut self,
        anchor: TokenId,
        tokens: impl IntoIterator<Item = NewToken>,
    ) -> Result<Vec<TokenId>> {
        self.tokens.insert_all_before(anchor, tokens)
    }

    pub fn previous_token(&self) -> Option<TokenRef<'_>> {
        self.tokens.previous()
    }

    pub fn token(&self) -> Option<TokenRef<'_>> {
        self.tokens.token()
    }

    pub fn next_token(&self) -> Option<TokenRef<'_>> {
        self.tokens.next()
    }

    pub fn previous_node(&self) -> Option<NodeId> {
        self.ast.previous()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.ast.node()
    }

    pub fn next_node(&self) -> Option<NodeId> {
        self.ast.next()
    }

    pub fn node_kind(&self) -> Option<NodeKind> {
        self.ast.node_kind()
    }

    pub fn token_stream(&self) -> &TokenStream {
        &self.tokens
    }

    pub fn ast_stream(&self) -> &AstStream {
        &self.ast
    }

    pub fn ast(&self) -> &Ast {
        self.ast.ast()
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub fn spans(&self) -> &ArenaMap<NodeId, NodeSpan> {
        &self.spans
    }

    pub fn span(&self, node: NodeId) -> Option<NodeSpan> {
        self.spans.get(node).copied()
    }

    pub fn start_token(&self, node: NodeId) -> Option<TokenRef<'_>> {
        self.span(node).map(|span| self.tokens.get(span.start_token))
    }

    pub fn end_token(&self, node: NodeId) -> Option<TokenRef<'_>> {
        self.span(node).map(|span| self.tokens.get(span.end_token))
    }
}

struct NoHooks;

impl MoveObserver for NoHooks {
    type Error = Error;
}

/// Moves the tree cursor after every token move, then hands the hook on.
struct Aligner<'a, O> {
    ast: &'a mut AstStream,
    table: &'a TranslationTable,
    observer: &'a mut O,
}

impl<O> MoveObserver for Aligner<'_, O>
where
    O: MoveObserver,
    O::Error: From<Error>,
{
    type Error = O::Error;

    fn token_left(&mut self, stream: &TokenStream, token: TokenId) -> Result<(), O::Error> {
        self.observer.token_left(stream, token)
    }

    fn ignored_token(&mut self, stream: &TokenStream, token: TokenId) -> Result<(), O::Error> {
        self.observer.ignored_token(stream, token)
    }

    fn after_move(&mut self, stream: &TokenStream) -> Result<(), O::Error> {
        align(self.ast, self.table, stream.token())?;
        self.observer.after_move(stream)
    }
}

fn align(ast: &mut AstStream, table: &TranslationTable, token: Option<TokenRef<'_>>) -> Result<()> {
    let (rule, action) = decide(token, ast, table);
    trace!(?token, rule, ?action, "aligning");

    match action {
        Action::Stay => {}
        Action::Exhaust => ast.exhaust(),
        Action::Advance(Target::Kinds(kinds)) => {
            ast.skip_until(kinds)?;
        }
        Action::Advance(target) => {
            ast.skip_unless(target.sought(), |ast, node| target.matches(ast, node))?;
        }
    }
    Ok(())
}
