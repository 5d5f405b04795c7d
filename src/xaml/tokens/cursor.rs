//! Single-token lookahead over a token source
//!
//! The cursor owns the token source, exposes exactly one current token and
//! never rewinds. Once the source runs dry the current token becomes
//! [`Token::None`] and the cursor is exhausted; advancing again is an error.

use crate::xaml::error::ParseError;
use crate::xaml::tokens::Token;
use crate::xaml::typing::TypeDescriptor;

pub struct TokenCursor<T: TypeDescriptor, I> {
    tokens: I,
    current: Token<T>,
    exhausted: bool,
}

impl<T, I> TokenCursor<T, I>
where
    T: TypeDescriptor,
    I: Iterator<Item = Result<Token<T>, ParseError>>,
{
    /// Wraps a token source. Nothing is read until the first [`advance`](Self::advance).
    pub fn new(tokens: I) -> Self {
        TokenCursor {
            tokens,
            current: Token::None,
            exhausted: false,
        }
    }

    pub fn current(&self) -> &Token<T> {
        &self.current
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Moves to the next token. Errors from the token source are passed
    /// through unchanged.
    pub fn advance(&mut self) -> Result<(), ParseError> {
        if self.exhausted {
            return Err(ParseError::PrematureEndOfStream {
                context: "advancing past the last token",
            });
        }

        match self.tokens.next() {
            Some(token) => self.current = token?,
            None => {
                self.exhausted = true;
                self.current = Token::None;
            }
        }
        Ok(())
    }

    /// Advances past any run of text tokens.
    pub fn skip_text(&mut self) -> Result<(), ParseError> {
        while self.current.is_text() {
            self.advance()?;
        }
        Ok(())
    }
}
