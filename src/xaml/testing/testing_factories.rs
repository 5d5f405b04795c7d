//! Fixture metadata and token factories

use crate::xaml::error::ParseError;
use crate::xaml::formats::to_listing;
use crate::xaml::instructions::Instruction;
use crate::xaml::parsing::parse_to_vec;
use crate::xaml::tokens::Token;
use crate::xaml::typing::{TypeDescriptor, TypeDirectory, XamlMember, XamlType};

/// Canonical alias for fixture tokens
pub type Tokens = Vec<Token<XamlType>>;

/// The types every test scenario draws from.
///
/// | type              | members                          | content  |
/// |-------------------|----------------------------------|----------|
/// | TextBlock         | Text                             | Text     |
/// | StackPanel        | Children (collection)            | Children |
/// | Window            | Content, Title                   | Content  |
/// | ItemsControl      | Items (collection), ItemTemplate | Items    |
/// | DataTemplate      | Content                          | Content  |
/// | Item              | Title                            |          |
/// | Dummy             | Name                             |          |
/// | MyImmutable       | needs initialization             |          |
/// | SimpleExtension   | Property, Nested                 |          |
/// | BindingExtension  | Path                             |          |
/// | x:StaticExtension | Member                           |          |
pub fn fixture_directory() -> TypeDirectory {
    let mut directory = TypeDirectory::new()
        .with_type(
            XamlType::builder("TextBlock")
                .member("Text")
                .content_member("Text")
                .build(),
        )
        .with_type(
            XamlType::builder("StackPanel")
                .collection_member("Children")
                .content_member("Children")
                .build(),
        )
        .with_type(
            XamlType::builder("Window")
                .member("Content")
                .member("Title")
                .content_member("Content")
                .build(),
        )
        .with_type(
            XamlType::builder("ItemsControl")
                .collection_member("Items")
                .member("ItemTemplate")
                .content_member("Items")
                .build(),
        )
        .with_type(
            XamlType::builder("DataTemplate")
                .member("Content")
                .content_member("Content")
                .build(),
        )
        .with_type(XamlType::builder("Item").member("Title").build())
        .with_type(XamlType::builder("Dummy").member("Name").build())
        .with_type(XamlType::builder("MyImmutable").needs_initialization().build())
        .with_type(
            XamlType::builder("SimpleExtension")
                .member("Property")
                .member("Nested")
                .build(),
        )
        .with_type(XamlType::builder("BindingExtension").member("Path").build());
    directory.register_prefixed("x", XamlType::builder("StaticExtension").member("Member").build());
    directory
}

/// Look up an unprefixed fixture type. Panics on unknown names.
pub fn fixture_type(name: &str) -> XamlType {
    fixture_directory()
        .get(name)
        .cloned()
        .unwrap_or_else(|| panic!("no fixture type named {}", name))
}

/// Look up a member of a fixture type. Panics on unknown names.
pub fn member(type_name: &str, member_name: &str) -> XamlMember {
    fixture_type(type_name)
        .member(member_name)
        .unwrap_or_else(|| panic!("{} has no member {}", type_name, member_name))
}

pub fn element(type_name: &str) -> Token<XamlType> {
    Token::Element(fixture_type(type_name))
}

pub fn empty_element(type_name: &str) -> Token<XamlType> {
    Token::EmptyElement(fixture_type(type_name))
}

pub fn property(type_name: &str, member_name: &str) -> Token<XamlType> {
    Token::PropertyElement(member(type_name, member_name))
}

pub fn empty_property(type_name: &str, member_name: &str) -> Token<XamlType> {
    Token::EmptyPropertyElement(member(type_name, member_name))
}

pub fn attribute(type_name: &str, member_name: &str, text: &str) -> Token<XamlType> {
    Token::Attribute {
        member: member(type_name, member_name),
        text: text.to_string(),
    }
}

pub fn text(text: &str) -> Token<XamlType> {
    Token::Text(text.to_string())
}

pub fn end_tag() -> Token<XamlType> {
    Token::EndTag
}

pub fn prefix(prefix: &str, namespace: &str) -> Token<XamlType> {
    Token::PrefixDefinition {
        prefix: prefix.to_string(),
        namespace: namespace.to_string(),
    }
}

/// Parse fixture tokens against [`fixture_directory`].
pub fn parse_tokens(tokens: Tokens) -> Result<Vec<Instruction<XamlType>>, ParseError> {
    parse_to_vec(&fixture_directory(), tokens.into_iter().map(Ok))
}

/// Parse fixture tokens and render the result as a listing.
pub fn parse_listing(tokens: Tokens) -> Result<String, ParseError> {
    parse_tokens(tokens).map(|instructions| to_listing(&instructions))
}
