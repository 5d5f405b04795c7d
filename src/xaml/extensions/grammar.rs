//! Extension grammar using chumsky
//!
//! Parses the spanned tokens from the [lexer](super::lexer) into a span-only
//! tree, then resolves it against the source text:
//!
//! ```text
//! extension := '{' type-name (option (',' option)*)? '}'
//! type-name := text (':' text)?
//! option    := text '=' value | value
//! value     := extension | quoted | bare
//! bare      := (text | ':')+
//! ```

use chumsky::prelude::*;
use std::ops::Range;

use super::ast::{
    ExpressionWithSpans, ExtensionExpression, OptionWithSpans, TypeNameWithSpans, ValueWithSpans,
};
use super::lexer::{tokenize_with_spans, ExtensionToken};
use crate::xaml::error::GrammarError;

/// Type alias for token with span
type TokenSpan = (ExtensionToken, Range<usize>);

/// Type alias for parser error
type ParserError = Simple<TokenSpan>;

/// Parses extension text into an expression tree.
///
/// Hosts with their own extension syntax can implement this and hand it to
/// [`ExtensionLowering::with_grammar`](super::ExtensionLowering::with_grammar).
pub trait ExtensionGrammar {
    fn parse(&self, text: &str) -> Result<ExtensionExpression, GrammarError>;
}

/// The bundled `{Type positional, Name=value}` grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupExtensionGrammar;

impl ExtensionGrammar for MarkupExtensionGrammar {
    fn parse(&self, text: &str) -> Result<ExtensionExpression, GrammarError> {
        let tokens = tokenize_with_spans(text)?;
        let parsed = expression()
            .then_ignore(end())
            .parse(tokens.clone())
            .map_err(|errors| to_grammar_error(text, &tokens, errors))?;
        Ok(parsed.resolve(text))
    }
}

/// Helper: match a specific token type, ignoring the span
fn token(t: ExtensionToken) -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok == &t).ignored()
}

/// Helper: match a specific token type, keeping the span
fn spanned(t: ExtensionToken) -> impl Parser<TokenSpan, Range<usize>, Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok == &t).map(|(_, span)| span)
}

/// Unquoted value: a run of text and colon tokens, as one span
fn bare_value() -> impl Parser<TokenSpan, Range<usize>, Error = ParserError> + Clone {
    filter(|(tok, _): &TokenSpan| matches!(tok, ExtensionToken::Text | ExtensionToken::Colon))
        .repeated()
        .at_least(1)
        .map(|tokens: Vec<TokenSpan>| {
            let start = tokens.first().map(|(_, s)| s.start).unwrap_or(0);
            let end = tokens.last().map(|(_, s)| s.end).unwrap_or(start);
            start..end
        })
}

fn type_name() -> impl Parser<TokenSpan, TypeNameWithSpans, Error = ParserError> + Clone {
    spanned(ExtensionToken::Text)
        .then(
            token(ExtensionToken::Colon)
                .ignore_then(spanned(ExtensionToken::Text))
                .or_not(),
        )
        .map(|(first, second)| match second {
            Some(name) => TypeNameWithSpans {
                prefix: Some(first),
                name,
            },
            None => TypeNameWithSpans {
                prefix: None,
                name: first,
            },
        })
}

pub(crate) fn expression() -> impl Parser<TokenSpan, ExpressionWithSpans, Error = ParserError> + Clone
{
    recursive(|expression| {
        let value = expression
            .map(|inner| ValueWithSpans::Extension(Box::new(inner)))
            .or(spanned(ExtensionToken::Quoted).map(ValueWithSpans::Quoted))
            .or(bare_value().map(ValueWithSpans::Bare));

        let named = spanned(ExtensionToken::Text)
            .then_ignore(token(ExtensionToken::Equals))
            .then(value.clone())
            .map(|(name, value)| OptionWithSpans::Named { name, value });

        let option = named.or(value.map(OptionWithSpans::Positional));

        token(ExtensionToken::OpenBrace)
            .ignore_then(type_name())
            .then(option.separated_by(token(ExtensionToken::Comma)))
            .then_ignore(token(ExtensionToken::CloseBrace))
            .map(|(type_name, options)| ExpressionWithSpans { type_name, options })
    })
}

/// Report the first parser error as a byte offset into the extension text.
///
/// Chumsky spans index into the token vector, not into the source.
fn to_grammar_error(text: &str, tokens: &[TokenSpan], errors: Vec<ParserError>) -> GrammarError {
    let Some(error) = errors.into_iter().next() else {
        return GrammarError::new(text, 0, "invalid extension");
    };

    let offset = tokens
        .get(error.span().start)
        .map(|(_, span)| span.start)
        .unwrap_or(text.len());
    let message = match error.found() {
        Some((token, _)) => format!("unexpected {}", token),
        None => "unexpected end of input".to_string(),
    };
    GrammarError::new(text, offset, message)
}
