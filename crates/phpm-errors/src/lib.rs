//! Errors shared by the token stream, the AST stream and the simultaneous
//! stream built on top of both.

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A forward scan on either stream ran out of input.
    #[error(
        "could not find any node of kinds ({}); visited: [{}]",
        .sought.join(", "),
        .visited.join(", ")
    )]
    MatchNotFound { sought: Vec<String>, visited: Vec<String> },

    #[error("the token {token} is not a block opener")]
    NotABlockOpener { token: String, range: Option<TextRange> },

    #[error("did not find the end of the block opened by {opener}")]
    UnclosedBlock { opener: String, range: Option<TextRange> },

    /// The lexer handed over a token that is neither a literal nor a
    /// recognized lexer token.
    #[error("unknown token class: {token}")]
    UnknownTokenClass { token: String },

    #[error("{token} has no neighbor matching {looking_for}")]
    MissingNeighbor { token: String, looking_for: String },

    #[error("unable to alter {option}, the stream is already set")]
    InvalidConfiguration { option: &'static str },

    #[error("the line {line} does not exist in the code")]
    LineNotFound { line: u32 },

    #[error("could not find {token}, but reached the end of the stream")]
    TokenNotFound { token: String },
}

impl Error {
    pub fn match_not_found<S, V>(sought: S, visited: V) -> Self
    where
        S: IntoIterator,
        S::Item: ToString,
        V: IntoIterator,
        V::Item: ToString,
    {
        Self::MatchNotFound {
            sought: sought.into_iter().map(|it| it.to_string()).collect(),
            visited: visited.into_iter().map(|it| it.to_string()).collect(),
        }
    }

    /// Source range the error points at, when the offending token came from
    /// the loaded source.
    pub fn range(&self) -> Option<TextRange> {
        match self {
            Self::NotABlockOpener { range, .. } | Self::UnclosedBlock { range, .. } => *range,
            _ => None,
        }
    }

    pub fn render(&self, renderer: &Renderer, path: &str, text: &str) -> String {
        let title = self.to_string();
        let message = Level::Error.title(&title);
        let message = match self.range() {
            Some(range) if usize::from(range.end()) <= text.len() => message.snippet(
                Snippet::source(text)
                    .origin(path)
                    .annotation(Level::Error.span(range.into()).label("here"))
                    .fold(true),
            ),
            _ => message,
        };
        renderer.render(message).to_string()
    }
}
