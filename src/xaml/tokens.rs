//! Shallow markup tokens
//!
//! Tokens are what the host tokenizer produces after resolving names: element
//! starts carry a type descriptor, property elements and attributes carry a
//! member descriptor. The parser consumes them through a [`TokenCursor`].

pub mod cursor;

use std::fmt;

use crate::xaml::typing::TypeDescriptor;

pub use cursor::TokenCursor;

/// One shallow markup token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<T: TypeDescriptor> {
    /// `xmlns:prefix="namespace"`
    PrefixDefinition { prefix: String, namespace: String },
    /// `<Type>`
    Element(T),
    /// `<Type/>`
    EmptyElement(T),
    /// `<Type.Member>`
    PropertyElement(T::Member),
    /// `<Type.Member/>`
    EmptyPropertyElement(T::Member),
    /// `Member="text"`
    Attribute { member: T::Member, text: String },
    Text(String),
    EndTag,
    /// End-of-stream sentinel; also what the cursor reports once exhausted.
    None,
}

impl<T: TypeDescriptor> Token<T> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::PrefixDefinition { .. } => TokenKind::PrefixDefinition,
            Token::Element(_) => TokenKind::Element,
            Token::EmptyElement(_) => TokenKind::EmptyElement,
            Token::PropertyElement(_) => TokenKind::PropertyElement,
            Token::EmptyPropertyElement(_) => TokenKind::EmptyPropertyElement,
            Token::Attribute { .. } => TokenKind::Attribute,
            Token::Text(_) => TokenKind::Text,
            Token::EndTag => TokenKind::EndTag,
            Token::None => TokenKind::None,
        }
    }

    /// Check if this token starts an element, empty or not
    pub fn is_element(&self) -> bool {
        matches!(self, Token::Element(_) | Token::EmptyElement(_))
    }

    /// Check if this token starts a property element, empty or not
    pub fn is_property_element(&self) -> bool {
        matches!(
            self,
            Token::PropertyElement(_) | Token::EmptyPropertyElement(_)
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(_))
    }
}

/// Payload-free token discriminant, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    PrefixDefinition,
    Element,
    EmptyElement,
    PropertyElement,
    EmptyPropertyElement,
    Attribute,
    Text,
    EndTag,
    None,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            TokenKind::PrefixDefinition => "prefix definition",
            TokenKind::Element => "element",
            TokenKind::EmptyElement => "empty element",
            TokenKind::PropertyElement => "property element",
            TokenKind::EmptyPropertyElement => "empty property element",
            TokenKind::Attribute => "attribute",
            TokenKind::Text => "text",
            TokenKind::EndTag => "end tag",
            TokenKind::None => "end of stream",
        };
        f.write_str(description)
    }
}
