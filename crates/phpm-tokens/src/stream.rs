use std::cell::Cell;
use std::convert::Infallible;
use std::fmt;

use la_arena::Arena;
use phpm_errors::{Error, Result};
use text_size::{TextRange, TextSize};
use tracing::debug;

use crate::normalize::normalize;
use crate::token::newlines;
use crate::{AttrValue, Lexer, Marker, Matcher, NewToken, RawToken, Token, TokenId, TokenRef};

/// Which token classes the cursor and the link chain skip over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamConfig {
    pub ignore_whitespace: bool,
    pub ignore_comments: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { ignore_whitespace: true, ignore_comments: true }
    }
}

impl StreamConfig {
    pub fn ignores(&self, token: &Token) -> bool {
        (self.ignore_comments && token.is_comment())
            || (self.ignore_whitespace && token.is_whitespace())
    }
}

/// Hooks driven by [`TokenStream::move_next_with`].
pub trait MoveObserver {
    type Error;

    /// The token the cursor is about to leave, before anything moves.
    fn token_left(&mut self, _stream: &TokenStream, _token: TokenId) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A filtered token that was stepped over on the way to the new current
    /// token.
    fn ignored_token(
        &mut self,
        _stream: &TokenStream,
        _token: TokenId,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn after_move(&mut self, _stream: &TokenStream) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl MoveObserver for () {
    type Error = Infallible;
}

#[derive(Debug, Default)]
struct Window {
    previous: Option<TokenId>,
    token: Option<TokenId>,
    next: Option<TokenId>,
    /// Number of sequence entries the scan for `next` has consumed.
    consumed: usize,
    peek_offset: Cell<usize>,
    ignored: Vec<TokenId>,
}

/// A cursor over the normalized tokens of one PHP source.
#[derive(Debug, Default)]
pub struct TokenStream {
    config: StreamConfig,
    locked: bool,
    arena: Arena<Token>,
    sequence: Vec<TokenId>,
    window: Window,
    source: String,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StreamConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> StreamConfig {
        self.config
    }

    pub fn set_ignore_whitespace(&mut self, ignore: bool) -> Result<()> {
        if self.locked {
            return Err(Error::InvalidConfiguration { option: "ignore_whitespace" });
        }
        self.config.ignore_whitespace = ignore;
        Ok(())
    }

    pub fn set_ignore_comments(&mut self, ignore: bool) -> Result<()> {
        if self.locked {
            return Err(Error::InvalidConfiguration { option: "ignore_comments" });
        }
        self.config.ignore_comments = ignore;
        Ok(())
    }

    pub fn set_code(&mut self, lexer: &impl Lexer, code: &str) -> Result<()> {
        self.set_tokens(lexer.tokenize(code), code)
    }

    /// Loads a snippet that may lack the open tag.
    pub fn set_code_fragment(&mut self, lexer: &impl Lexer, fragment: &str) -> Result<()> {
        if fragment.contains("<?php") {
            return self.set_code(lexer, fragment);
        }
        let code = format!("<?php {fragment}");
        self.set_code(lexer, &code)
    }

    pub fn set_tokens(&mut self, raw: Vec<RawToken>, source: &str) -> Result<()> {
        let tokens = normalize(raw, 1)?;
        let last_line = tokens.last().map_or(1, Token::end_line);

        self.arena = Arena::new();
        self.sequence = Vec::with_capacity(tokens.len() + 2);

        let mut start = Token::marker(Marker::StartOfFile, 1);
        start.range = Some(TextRange::empty(TextSize::new(0)));
        self.sequence.push(self.arena.alloc(start));

        let mut offset = TextSize::new(0);
        for mut token in tokens {
            let range = TextRange::at(offset, TextSize::of(token.content.as_str()));
            token.range = Some(range);
            offset = range.end();
            self.sequence.push(self.arena.alloc(token));
        }

        let mut end = Token::marker(Marker::EndOfFile, last_line);
        end.range = Some(TextRange::empty(offset));
        self.sequence.push(self.arena.alloc(end));

        self.source = source.to_owned();
        self.locked = true;
        self.relink();
        self.reset();

        debug!(tokens = self.sequence.len(), lines = last_line, "loaded token stream");
        Ok(())
    }

    /// Rewinds to just before the first unfiltered token.
    pub fn reset(&mut self) {
        self.window = Window::default();
        self.scan_next();
    }

    pub fn move_next(&mut self) -> bool {
        match self.move_next_with(&mut ()) {
            Ok(moved) => moved,
            Err(never) => match never {},
        }
    }

    pub fn move_next_with<O: MoveObserver>(&mut self, observer: &mut O) -> Result<bool, O::Error> {
        if let Some(token) = self.window.token {
            observer.token_left(self, token)?;
        }

        self.window.previous = self.window.token;
        self.window.token = self.window.next;

        for ignored in std::mem::take(&mut self.window.ignored) {
            observer.ignored_token(self, ignored)?;
        }

        self.scan_next();
        observer.after_move(self)?;

        Ok(self.window.token.is_some())
    }

    fn scan_next(&mut self) {
        self.window.peek_offset.set(0);
        self.window.next = None;

        while let Some(&id) = self.sequence.get(self.window.consumed) {
            self.window.consumed += 1;
            if self.config.ignores(&self.arena[id]) {
                self.window.ignored.push(id);
                continue;
            }
            self.window.next = Some(id);
            break;
        }
    }

    /// Looks further ahead in the underlying sequence, filtered tokens
    /// included. The first call returns the next token; every call goes one
    /// further until the cursor moves again.
    pub fn peek(&self) -> Option<TokenRef<'_>> {
        self.window.next?;
        let index = self.window.consumed.checked_sub(1)? + self.window.peek_offset.get();
        let id = *self.sequence.get(index)?;
        self.window.peek_offset.set(self.window.peek_offset.get() + 1);
        Some(self.get(id))
    }

    /// Moves forward until the current token matches. Returns whether one
    /// did before the stream ended.
    pub fn skip_until(&mut self, matcher: &Matcher) -> bool {
        while self.move_next() {
            if self.token().is_some_and(|token| matcher.matches(token)) {
                return true;
            }
        }
        false
    }

    fn current_opener(&self) -> Result<TokenRef<'_>> {
        match self.token() {
            Some(token) if token.is_block_opener() => Ok(token),
            Some(token) => {
                Err(Error::NotABlockOpener { token: token.to_string(), range: token.range() })
            }
            None => Err(Error::NotABlockOpener { token: "end of stream".to_owned(), range: None }),
        }
    }

    /// The closer matching the block opener under the cursor. Uses the peek
    /// offset, the cursor itself stays put.
    pub fn closing_token(&self) -> Result<TokenRef<'_>> {
        let opener = self.current_opener()?;
        self.window.peek_offset.set(0);

        let mut opened = 1u32;
        while let Some(token) = self.peek() {
            if token.is_same_type(opener) {
                opened += 1;
            } else if token.is_closing(opener) {
                opened -= 1;
                if opened == 0 {
                    return Ok(token);
                }
            }
        }

        Err(Error::UnclosedBlock { opener: opener.to_string(), range: opener.range() })
    }

    /// Moves onto the closer matching the block opener under the cursor.
    pub fn skip_current_block(&mut self) -> Result<()> {
        let opener = self.current_opener()?.id();

        let mut opened = 1u32;
        while self.move_next() {
            let Some(token) = self.token() else { break };
            let opener = self.get(opener);
            if token.is_same_type(opener) {
                opened += 1;
            } else if token.is_closing(opener) {
                opened -= 1;
                if opened == 0 {
                    return Ok(());
                }
            }
        }

        let opener = self.get(opener);
        Err(Error::UnclosedBlock { opener: opener.to_string(), range: opener.range() })
    }

    pub fn skip_block(&mut self) -> Result<()> {
        self.move_next();
        self.skip_current_block()
    }

    pub fn insert_before(&mut self, anchor: TokenId, token: NewToken) -> Result<Vec<TokenId>> {
        self.insert_all_before(anchor, [token])
    }

    /// Splices `tokens` into the sequence right before `anchor`.
    ///
    /// Lines are handed out cumulatively starting at the anchor's line, and
    /// every token from the anchor onward moves down by the number of
    /// inserted newlines. Inserting behind the cursor does not make it
    /// revisit anything.
    pub fn insert_all_before(
        &mut self,
        anchor: TokenId,
        tokens: impl IntoIterator<Item = NewToken>,
    ) -> Result<Vec<TokenId>> {
        if !self.contains(anchor) {
            return Err(Error::TokenNotFound { token: self.describe(anchor) });
        }

        let anchor_token = &self.arena[anchor];
        if anchor_token.marker_kind() == Some(Marker::StartOfFile) {
            return Err(Error::MissingNeighbor {
                token: anchor_token.to_string(),
                looking_for: "a token before the start of the file".to_owned(),
            });
        }
        let position = anchor_token.position;

        let mut line = anchor_token.line;
        let raw = tokens
            .into_iter()
            .map(|token| match token {
                NewToken::Literal(text) => RawToken::Literal(text),
                NewToken::Php(kind, text) => {
                    let raw_line = line;
                    line += newlines(&text);
                    RawToken::Php { kind, text, line: raw_line }
                }
            })
            .collect();
        let inserted = normalize(raw, anchor_token.line)?;

        let offset: u32 = inserted.iter().map(|token| newlines(&token.content)).sum();
        let ids: Vec<TokenId> = inserted.into_iter().map(|token| self.arena.alloc(token)).collect();
        let count = ids.len();

        if position < self.window.consumed {
            self.window.consumed += count;
        }
        self.sequence.splice(position..position, ids.iter().copied());

        if offset > 0 {
            for &id in &self.sequence[position + count..] {
                let token = &mut self.arena[id];
                token.set_line(token.line + offset);
            }
        }

        self.relink();
        debug!(count, position, line_offset = offset, "inserted tokens");
        Ok(ids)
    }

    /// Rebuilds positions and the link chain. Filtered tokens stay out of the
    /// chain but point at their nearest unfiltered neighbors.
    fn relink(&mut self) {
        let mut previous: Option<TokenId> = None;
        let mut filtered = Vec::new();

        for (position, &id) in self.sequence.iter().enumerate() {
            let ignored = self.config.ignores(&self.arena[id]);
            let token = &mut self.arena[id];
            token.position = position;
            token.previous = previous;
            token.next = None;

            if ignored {
                filtered.push(id);
                continue;
            }

            if let Some(previous) = previous {
                self.arena[previous].next = Some(id);
            }
            for skipped in filtered.drain(..) {
                self.arena[skipped].next = Some(id);
            }
            previous = Some(id);
        }
    }

    pub fn contains(&self, id: TokenId) -> bool {
        let index = u32::from(id.into_raw()) as usize;
        index < self.arena.len() && self.sequence.get(self.arena[id].position) == Some(&id)
    }

    pub fn get(&self, id: TokenId) -> TokenRef<'_> {
        TokenRef::new(self, id)
    }

    /// How error messages name `id`, which may belong to another stream.
    pub fn describe(&self, id: TokenId) -> String {
        if self.contains(id) {
            self.get(id).to_string()
        } else {
            format!("UnknownToken(#{})", u32::from(id.into_raw()))
        }
    }

    pub(crate) fn data(&self, id: TokenId) -> &Token {
        &self.arena[id]
    }

    pub fn previous(&self) -> Option<TokenRef<'_>> {
        self.window.previous.map(|id| self.get(id))
    }

    pub fn token(&self) -> Option<TokenRef<'_>> {
        self.window.token.map(|id| self.get(id))
    }

    pub fn next(&self) -> Option<TokenRef<'_>> {
        self.window.next.map(|id| self.get(id))
    }

    pub fn is_ignored(&self, id: TokenId) -> bool {
        self.config.ignores(&self.arena[id])
    }

    /// Every token in sequence order, filtered ones and markers included.
    pub fn tokens(&self) -> impl Iterator<Item = TokenRef<'_>> {
        self.sequence.iter().map(|&id| self.get(id))
    }

    pub fn sequence(&self) -> &[TokenId] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_content(&self, line: u32) -> Result<String> {
        let mut content = None::<String>;
        for token in self.sequence.iter().map(|&id| &self.arena[id]) {
            if token.line == line {
                content.get_or_insert_with(String::new).push_str(&token.content);
            }
        }
        content.ok_or(Error::LineNotFound { line })
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn set_attribute(&mut self, id: TokenId, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.arena[id].attributes.insert(key.into(), value.into());
    }

    pub fn remove_attribute(&mut self, id: TokenId, key: &str) -> Option<AttrValue> {
        self.arena[id].attributes.shift_remove(key)
    }
}

impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.sequence.iter().try_for_each(|&id| f.write_str(&self.arena[id].content))
    }
}
