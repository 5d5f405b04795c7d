//! Token stream to instruction stream
//!
//! [`parse`] returns the lazy [`InstructionParser`]; [`parse_to_vec`] drains
//! it for callers that want the whole sequence or the first error.

pub(crate) mod frames;
pub mod parser;

#[cfg(test)]
mod tests;

use crate::xaml::error::ParseError;
use crate::xaml::instructions::Instruction;
use crate::xaml::tokens::Token;
use crate::xaml::typing::ExtensionResolver;

pub use parser::InstructionParser;

/// Parse a token stream lazily. Nothing is read until the first instruction is requested.
pub fn parse<'a, R, I>(resolver: &'a R, tokens: I) -> InstructionParser<'a, R, I::IntoIter>
where
    R: ExtensionResolver,
    I: IntoIterator<Item = Result<Token<R::Type>, ParseError>>,
{
    InstructionParser::new(resolver, tokens.into_iter())
}

/// Parse a token stream to completion, stopping at the first error.
pub fn parse_to_vec<R, I>(resolver: &R, tokens: I) -> Result<Vec<Instruction<R::Type>>, ParseError>
where
    R: ExtensionResolver,
    I: IntoIterator<Item = Result<Token<R::Type>, ParseError>>,
{
    parse(resolver, tokens).collect()
}
