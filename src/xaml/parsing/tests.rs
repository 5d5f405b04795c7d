//! Unit tests for the instruction parser

use std::cell::Cell;

use super::*;
use crate::xaml::config::ParserOptions;
use crate::xaml::error::GrammarError;
use crate::xaml::extensions::{ExtensionExpression, ExtensionGrammar};
use crate::xaml::instructions::InstructionKind;
use crate::xaml::testing::*;
use crate::xaml::tokens::TokenKind;
use crate::xaml::typing::XamlType;

fn parse_with(
    options: ParserOptions,
    tokens: Tokens,
) -> Result<Vec<Instruction<XamlType>>, ParseError> {
    let directory = fixture_directory();
    parse(&directory, tokens.into_iter().map(Ok))
        .with_options(options)
        .collect()
}

#[test]
fn test_property_element_with_text() {
    let listing = parse_listing(vec![
        element("TextBlock"),
        property("TextBlock", "Text"),
        text("Hello"),
        end_tag(),
        end_tag(),
    ])
    .unwrap();

    assert_eq!(
        listing,
        "StartObject TextBlock\n\
         \x20 StartMember Text\n\
         \x20   Value \"Hello\"\n\
         \x20 EndMember\n\
         EndObject\n"
    );
}

#[test]
fn test_implicit_scalar_content() {
    let listing = parse_listing(vec![element("TextBlock"), text("Hi"), end_tag()]).unwrap();

    assert_eq!(
        listing,
        "StartObject TextBlock\n\
         \x20 StartMember Text\n\
         \x20   Value \"Hi\"\n\
         \x20 EndMember\n\
         EndObject\n"
    );
}

#[test]
fn test_attributes_come_first() {
    let instructions = parse_tokens(vec![
        element("Window"),
        attribute("Window", "Title", "Main"),
        empty_element("Item"),
        end_tag(),
    ])
    .unwrap();

    assert_instructions(&instructions)
        .kinds(&[
            InstructionKind::StartObject,
            InstructionKind::StartMember,
            InstructionKind::Value,
            InstructionKind::EndMember,
            InstructionKind::StartMember,
            InstructionKind::StartObject,
            InstructionKind::EndObject,
            InstructionKind::EndMember,
            InstructionKind::EndObject,
        ])
        .well_formed();
}

#[test]
fn test_empty_element_at_root() {
    let listing = parse_listing(vec![
        empty_element("Item"),
        attribute("Item", "Title", "a"),
    ])
    .unwrap();

    assert_eq!(
        listing,
        "StartObject Item\n\
         \x20 StartMember Title\n\
         \x20   Value \"a\"\n\
         \x20 EndMember\n\
         EndObject\n"
    );
}

#[test]
fn test_empty_scalar_property_element() {
    let listing = parse_listing(vec![
        element("Window"),
        empty_property("Window", "Title"),
        end_tag(),
    ])
    .unwrap();

    assert_eq!(
        listing,
        "StartObject Window\n\
         \x20 StartMember Title\n\
         \x20   Value \"\"\n\
         \x20 EndMember\n\
         EndObject\n"
    );
}

#[test]
fn test_property_element_without_body_gets_empty_value() {
    let instructions = parse_tokens(vec![
        element("TextBlock"),
        property("TextBlock", "Text"),
        end_tag(),
        end_tag(),
    ])
    .unwrap();

    assert_instructions(&instructions)
        .listing(
            "StartObject TextBlock\n\
             \x20 StartMember Text\n\
             \x20   Value \"\"\n\
             \x20 EndMember\n\
             EndObject\n",
        )
        .well_formed();
}

#[test]
fn test_empty_collection_property_element() {
    let instructions = parse_tokens(vec![
        element("StackPanel"),
        empty_property("StackPanel", "Children"),
        end_tag(),
    ])
    .unwrap();

    assert_instructions(&instructions)
        .kinds(&[
            InstructionKind::StartObject,
            InstructionKind::StartMember,
            InstructionKind::GetObject,
            InstructionKind::Items,
            InstructionKind::EndMember,
            InstructionKind::EndObject,
            InstructionKind::EndMember,
            InstructionKind::EndObject,
        ])
        .well_formed();
}

#[test]
fn test_implicit_content_after_property_element() {
    let listing = parse_listing(vec![
        element("Window"),
        property("Window", "Title"),
        text("T"),
        end_tag(),
        element("TextBlock"),
        end_tag(),
        end_tag(),
    ])
    .unwrap();

    assert_eq!(
        listing,
        "StartObject Window\n\
         \x20 StartMember Title\n\
         \x20   Value \"T\"\n\
         \x20 EndMember\n\
         \x20 StartMember Content\n\
         \x20   StartObject TextBlock\n\
         \x20   EndObject\n\
         \x20 EndMember\n\
         EndObject\n"
    );
}

#[test]
fn test_collection_property_element_with_three_items() {
    let instructions = parse_tokens(vec![
        element("ItemsControl"),
        property("ItemsControl", "Items"),
        element("Item"),
        end_tag(),
        element("Item"),
        end_tag(),
        element("Item"),
        end_tag(),
        end_tag(),
        end_tag(),
    ])
    .unwrap();

    let mut expected = vec![
        InstructionKind::StartObject,
        InstructionKind::StartMember,
        InstructionKind::GetObject,
        InstructionKind::Items,
    ];
    for _ in 0..3 {
        expected.push(InstructionKind::StartObject);
        expected.push(InstructionKind::EndObject);
    }
    expected.extend([
        InstructionKind::EndMember,
        InstructionKind::EndObject,
        InstructionKind::EndMember,
        InstructionKind::EndObject,
    ]);

    assert_instructions(&instructions)
        .kinds(&expected)
        .count(InstructionKind::StartObject, 4)
        .well_formed();
}

#[test]
fn test_text_between_siblings_is_skipped() {
    let instructions = parse_tokens(vec![
        element("StackPanel"),
        empty_element("Item"),
        text("\n  "),
        empty_element("Item"),
        end_tag(),
    ])
    .unwrap();

    assert_instructions(&instructions)
        .count(InstructionKind::StartObject, 3)
        .count(InstructionKind::Value, 0)
        .well_formed();
}

#[test]
fn test_constructor_argument_from_text() {
    let instructions = parse_tokens(vec![
        element("MyImmutable"),
        text("Hola"),
        end_tag(),
        attribute("Dummy", "Name", "ignored"),
        property("Window", "Title"),
    ])
    .unwrap();

    assert_instructions(&instructions)
        .listing(
            "StartObject MyImmutable\n\
             \x20 Initialization\n\
             \x20   Value \"Hola\"\n\
             \x20 EndMember\n\
             EndObject\n",
        )
        .no_value("ignored")
        .count(InstructionKind::StartMember, 0)
        .well_formed();
}

#[test]
fn test_constructor_argument_missing_at_end_of_stream() {
    assert_eq!(
        parse_tokens(vec![element("MyImmutable")]),
        Err(ParseError::PrematureEndOfStream {
            context: "reading a constructor argument"
        })
    );
}

#[test]
fn test_constructor_argument_must_be_text() {
    assert_eq!(
        parse_tokens(vec![element("MyImmutable"), empty_element("Item"), end_tag()]),
        Err(ParseError::UnsupportedConstructorArguments {
            type_name: "MyImmutable".into(),
            found: TokenKind::EmptyElement,
        })
    );
}

#[test]
fn test_more_than_one_constructor_argument_is_rejected() {
    assert_eq!(
        parse_tokens(vec![
            element("MyImmutable"),
            text("a"),
            attribute("Dummy", "Name", "b"),
            end_tag(),
        ]),
        Err(ParseError::UnsupportedConstructorArguments {
            type_name: "MyImmutable".into(),
            found: TokenKind::Attribute,
        })
    );
}

#[test]
fn test_missing_end_tag_emits_no_end_object() {
    let directory = fixture_directory();
    let tokens = vec![
        element("TextBlock"),
        property("TextBlock", "Text"),
        text("Hi"),
        end_tag(),
        Token::None,
    ];
    let mut parser = parse(&directory, tokens.into_iter().map(Ok));

    let mut produced = Vec::new();
    let error = loop {
        match parser.next() {
            Some(Ok(instruction)) => produced.push(instruction),
            Some(Err(error)) => break error,
            None => panic!("parser finished without an error"),
        }
    };

    assert_eq!(
        error,
        ParseError::MissingEndTag {
            element: "TextBlock".into(),
            found: TokenKind::None,
        }
    );
    assert_instructions(&produced).count(InstructionKind::EndObject, 0);
    assert!(parser.next().is_none());
}

#[test]
fn test_missing_end_tag_of_property_element() {
    assert_eq!(
        parse_tokens(vec![
            element("Window"),
            property("Window", "Title"),
            text("T"),
            empty_element("Item"),
        ]),
        Err(ParseError::MissingEndTag {
            element: "Window.Title".into(),
            found: TokenKind::EmptyElement,
        })
    );
}

#[test]
fn test_content_without_content_member() {
    assert_eq!(
        parse_tokens(vec![element("Dummy"), empty_element("Item"), end_tag()]),
        Err(ParseError::MissingContentProperty {
            type_name: "Dummy".into()
        })
    );
}

#[test]
fn test_prefix_definitions_come_first() {
    let instructions = parse_tokens(vec![
        prefix("", "urn:default"),
        prefix("x", "urn:x"),
        empty_element("Dummy"),
    ])
    .unwrap();

    assert_instructions(&instructions).kinds(&[
        InstructionKind::PrefixDefinition,
        InstructionKind::PrefixDefinition,
        InstructionKind::StartObject,
        InstructionKind::EndObject,
    ]);
}

#[test]
fn test_extension_attribute_is_lowered_inline() {
    let listing = parse_listing(vec![
        empty_element("Dummy"),
        attribute("Dummy", "Name", "{Binding Path=Title}"),
    ])
    .unwrap();

    assert_eq!(
        listing,
        "StartObject Dummy\n\
         \x20 StartMember Name\n\
         \x20   StartObject BindingExtension\n\
         \x20     StartMember Path\n\
         \x20       Value \"Title\"\n\
         \x20     EndMember\n\
         \x20   EndObject\n\
         \x20 EndMember\n\
         EndObject\n"
    );
}

#[test]
fn test_prefixed_extension_resolves() {
    let instructions = parse_tokens(vec![
        empty_element("Dummy"),
        attribute("Dummy", "Name", "{x:Static Member=Red}"),
    ])
    .unwrap();

    assert!(instructions
        .iter()
        .any(|i| i.to_string() == "StartObject StaticExtension"));
}

#[test]
fn test_short_braced_text_is_a_value() {
    let instructions = parse_tokens(vec![
        empty_element("Dummy"),
        attribute("Dummy", "Name", "{}"),
    ])
    .unwrap();

    assert_eq!(instructions[2], Instruction::Value("{}".into()));
}

#[test]
fn test_malformed_extension_fails() {
    let result = parse_tokens(vec![
        empty_element("Dummy"),
        attribute("Dummy", "Name", "{Binding Path=}"),
    ]);
    assert!(matches!(result, Err(ParseError::Grammar(_))));
}

#[test]
fn test_unknown_extension_fails() {
    assert_eq!(
        parse_tokens(vec![
            empty_element("Dummy"),
            attribute("Dummy", "Name", "{Unknown}"),
        ]),
        Err(ParseError::MissingMetadata {
            name: "Unknown".into()
        })
    );
}

struct RejectingGrammar;

impl ExtensionGrammar for RejectingGrammar {
    fn parse(&self, text: &str) -> Result<ExtensionExpression, GrammarError> {
        Err(GrammarError::new(text, 0, "rejected"))
    }
}

#[test]
fn test_custom_grammar_is_used() {
    let directory = fixture_directory();
    let tokens = vec![
        empty_element("Dummy"),
        attribute("Dummy", "Name", "{Binding}"),
    ];
    let result: Result<Vec<_>, _> = parse(&directory, tokens.into_iter().map(Ok))
        .with_grammar(&RejectingGrammar)
        .collect();

    assert_eq!(
        result,
        Err(ParseError::Grammar(GrammarError::new(
            "{Binding}",
            0,
            "rejected"
        )))
    );
}

#[test]
fn test_depth_limit() {
    let mut options = ParserOptions::default();
    options.limits.max_depth = 2;
    let tokens = vec![
        element("StackPanel"),
        element("StackPanel"),
        empty_element("Item"),
        end_tag(),
        end_tag(),
    ];

    assert_eq!(
        parse_with(options.clone(), tokens.clone()),
        Err(ParseError::DepthLimitExceeded { limit: 2 })
    );

    options.limits.max_depth = 3;
    assert!(parse_with(options, tokens).is_ok());
}

#[test]
fn test_extension_nesting_uses_the_depth_limit() {
    let mut options = ParserOptions::default();
    options.limits.max_depth = 2;
    let tokens = |text: &str| vec![empty_element("Item"), attribute("Item", "Title", text)];

    assert!(parse_with(options.clone(), tokens("{Simple {Simple a}}")).is_ok());
    assert_eq!(
        parse_with(options, tokens("{Simple {Simple {Simple a}}}")),
        Err(ParseError::DepthLimitExceeded { limit: 2 })
    );

    let hostile = format!("{}a{}", "{Simple ".repeat(3000), "}".repeat(3000));
    assert_eq!(
        parse_tokens(tokens(&hostile)),
        Err(ParseError::DepthLimitExceeded { limit: 256 })
    );
}

#[test]
fn test_trailing_tokens() {
    let tokens = vec![empty_element("Dummy"), end_tag()];
    assert!(parse_with(ParserOptions::default(), tokens.clone()).is_ok());

    let mut options = ParserOptions::default();
    options.document.reject_trailing_tokens = true;
    assert_eq!(
        parse_with(options, tokens),
        Err(ParseError::TrailingContent {
            found: TokenKind::EndTag
        })
    );
}

#[test]
fn test_empty_stream() {
    assert_eq!(parse_tokens(Vec::new()), Ok(Vec::new()));
}

#[test]
fn test_tokens_are_pulled_on_demand() {
    let directory = fixture_directory();
    let pulled = Cell::new(0);
    let tokens = vec![
        prefix("x", "urn:x"),
        element("StackPanel"),
        empty_element("Item"),
        empty_element("Item"),
        end_tag(),
    ];
    let total = tokens.len();
    let source = tokens.into_iter().inspect(|_| pulled.set(pulled.get() + 1)).map(Ok);
    let mut parser = parse(&directory, source);

    assert!(matches!(
        parser.next(),
        Some(Ok(Instruction::PrefixDefinition { .. }))
    ));
    assert!(pulled.get() < total);

    assert_eq!(parser.by_ref().count(), 12);
    assert_eq!(pulled.get(), total);
}

#[test]
fn test_source_errors_stop_the_parse() {
    let directory = fixture_directory();
    let source = vec![
        Ok(element("StackPanel")),
        Ok(empty_element("Item")),
        Err(ParseError::MissingMetadata {
            name: "Unknown".into(),
        }),
    ];
    let results: Vec<_> = parse(&directory, source).collect();

    assert!(matches!(results[0], Ok(Instruction::StartObject(_))));
    assert_eq!(
        results.last(),
        Some(&Err(ParseError::MissingMetadata {
            name: "Unknown".into()
        }))
    );
    assert!(results[..results.len() - 1].iter().all(Result::is_ok));
}
