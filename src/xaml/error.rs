//! Error types for instruction parsing
//!
//! Every error is fatal to the parse that raised it. Instructions already
//! pulled from the parser stay valid; nothing after the error is produced.

use thiserror::Error;

use crate::xaml::tokens::TokenKind;

/// Errors raised while turning a token stream into instructions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token was required but the stream had already run out.
    #[error("premature end of the token stream while {context}")]
    PrematureEndOfStream { context: &'static str },

    /// A non-empty element or property element was not closed.
    #[error("expected end tag for `{element}`, found {found}")]
    MissingEndTag { element: String, found: TokenKind },

    /// Implicit child content inside a type that declares no content member.
    #[error("cannot get the content property for the type `{type_name}`")]
    MissingContentProperty { type_name: String },

    /// Malformed `{...}` extension text.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// A type or member name that the resolution layer does not know.
    #[error("no type or member metadata for `{name}`")]
    MissingMetadata { name: String },

    /// Constructor injection only supports one inline text argument.
    #[error("type `{type_name}` takes a single text constructor argument, found {found}")]
    UnsupportedConstructorArguments { type_name: String, found: TokenKind },

    /// Elements, or extensions inside one attribute, nested deeper than
    /// the configured limit.
    #[error("nesting exceeds the limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// Tokens left over after the root element sequence.
    #[error("unexpected {found} after the root elements")]
    TrailingContent { found: TokenKind },
}

/// A syntax error in extension text, as reported by an extension grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid extension `{text}` at offset {offset}: {message}")]
pub struct GrammarError {
    pub text: String,
    pub offset: usize,
    pub message: String,
}

impl GrammarError {
    pub fn new(text: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        GrammarError {
            text: text.into(),
            offset,
            message: message.into(),
        }
    }
}
