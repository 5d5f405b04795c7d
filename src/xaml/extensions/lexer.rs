//! Tokenization of extension text
//!
//! Tokens carry no payload; names and values are recovered from their spans.
//! Whitespace is skipped by logos, so a bare value spanning several text
//! tokens keeps the original spacing when sliced from the source.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::xaml::error::GrammarError;

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[logos(skip r"[ \t\r\n]+")]
pub enum ExtensionToken {
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,
    #[token(":")]
    Colon,

    #[regex(r"'[^']*'")]
    #[regex(r#""[^"]*""#)]
    Quoted,

    // Anything that is not structural punctuation, a quote or whitespace
    #[regex(r#"[^\s{}=,:'"]+"#)]
    Text,
}

impl fmt::Display for ExtensionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ExtensionToken::OpenBrace => "`{`",
            ExtensionToken::CloseBrace => "`}`",
            ExtensionToken::Comma => "`,`",
            ExtensionToken::Equals => "`=`",
            ExtensionToken::Colon => "`:`",
            ExtensionToken::Quoted => "quoted text",
            ExtensionToken::Text => "text",
        };
        f.write_str(description)
    }
}

/// Tokenize extension text, keeping byte spans.
///
/// Fails on the first character no token matches, such as an unterminated quote.
pub fn tokenize_with_spans(
    source: &str,
) -> Result<Vec<(ExtensionToken, Range<usize>)>, GrammarError> {
    let mut lexer = ExtensionToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(GrammarError::new(
                    source,
                    lexer.span().start,
                    format!("unexpected character sequence `{}`", lexer.slice()),
                ))
            }
        }
    }

    Ok(tokens)
}
