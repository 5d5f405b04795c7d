//! Extension expressions: `{Type positional, Name=value}`
//!
//! Attribute text shaped like `{...}` is not a plain value but an extension
//! evaluated at build time. Handling it takes two steps:
//!
//! 1. An [`ExtensionGrammar`] parses the text into an [`ExtensionExpression`]
//!    tree. The bundled [`MarkupExtensionGrammar`] tokenizes with logos and
//!    parses the spanned tokens with chumsky.
//! 2. [`ExtensionLowering`] turns the tree into the same instruction
//!    vocabulary the main parser emits, recursing into nested extensions.

pub mod ast;
pub mod grammar;
pub mod lexer;
pub mod lowering;

pub use ast::{ArgumentValue, ExtensionExpression, TypeName};
pub use grammar::{ExtensionGrammar, MarkupExtensionGrammar};
pub use lowering::ExtensionLowering;

/// Whether attribute text is an extension expression rather than a literal.
///
/// True iff the text is longer than three characters and is wrapped in
/// braces, so `"{}"` and `"{a}"` stay literal.
pub fn is_extension(text: &str) -> bool {
    text.chars().count() > 3 && text.starts_with('{') && text.ends_with('}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_extension() {
        assert!(is_extension("{Foo}"));
        assert!(is_extension("{Binding Path=Name}"));
        assert!(!is_extension("{}"));
        assert!(!is_extension("{a}"));
        assert!(!is_extension("plain text"));
        assert!(!is_extension("{unclosed"));
        assert!(!is_extension("unopened}"));
    }
}
