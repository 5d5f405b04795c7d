//! Integration tests for parser options and the construction tree

use std::path::PathBuf;

use omnixaml::xaml::building::{build_tree, BuildError, MemberValue};
use omnixaml::xaml::config::{Loader, ParserOptions};
use omnixaml::xaml::formats::to_json;
use omnixaml::xaml::testing::*;
use omnixaml::xaml::typing::XamlType;
use omnixaml::xaml::{parse, Instruction, ParseError, TokenKind, TypeDescriptor};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

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
fn test_file_layer_overrides_defaults() {
    let options = Loader::new()
        .with_file(fixture("strict.toml"))
        .build()
        .unwrap();

    assert_eq!(options.limits.max_depth, 2);
    assert!(options.document.reject_trailing_tokens);
}

#[test]
fn test_strict_options_reject_deep_documents() {
    let options = Loader::new()
        .with_file(fixture("strict.toml"))
        .build()
        .unwrap();
    let tokens = vec![
        element("Window"),
        element("StackPanel"),
        empty_element("Item"),
        end_tag(),
        end_tag(),
    ];

    assert_eq!(
        parse_with(options, tokens.clone()),
        Err(ParseError::DepthLimitExceeded { limit: 2 })
    );
    assert!(parse_with(ParserOptions::default(), tokens).is_ok());
}

#[test]
fn test_strict_options_reject_trailing_tokens() {
    let options = Loader::new()
        .with_file(fixture("strict.toml"))
        .build()
        .unwrap();

    assert_eq!(
        parse_with(options, vec![empty_element("Item"), end_tag()]),
        Err(ParseError::TrailingContent {
            found: TokenKind::EndTag
        })
    );
}

#[test]
fn test_tree_from_lazy_parser() {
    let directory = fixture_directory();
    let tokens = vec![
        element("Window"),
        attribute("Window", "Title", "{Binding Path=Caption}"),
        element("MyImmutable"),
        text("Hola"),
        end_tag(),
        end_tag(),
    ];
    let document = build_tree(parse(&directory, tokens.into_iter().map(Ok))).unwrap();

    let window = &document.roots[0];
    assert_eq!(window.instance_type.name(), "Window");

    let MemberValue::Object(binding) = &window.assignment("Title").unwrap().values[0] else {
        panic!("expected the binding object");
    };
    assert_eq!(binding.instance_type.name(), "BindingExtension");

    let MemberValue::Object(immutable) = &window.assignment("Content").unwrap().values[0] else {
        panic!("expected the content object");
    };
    assert_eq!(immutable.injectable_arguments, vec!["Hola".to_string()]);

    insta::assert_snapshot!(to_json(&document).unwrap(), @r###"
    {
      "prefixes": [],
      "roots": [
        {
          "type": "Window",
          "members": [
            {
              "member": "Title",
              "values": [
                {
                  "object": {
                    "type": "BindingExtension",
                    "members": [
                      {
                        "member": "Path",
                        "values": [
                          {
                            "text": "Caption"
                          }
                        ]
                      }
                    ]
                  }
                }
              ]
            },
            {
              "member": "Content",
              "values": [
                {
                  "object": {
                    "type": "MyImmutable",
                    "arguments": [
                      "Hola"
                    ]
                  }
                }
              ]
            }
          ]
        }
      ]
    }
    "###);
}

#[test]
fn test_tree_reports_parse_errors() {
    let directory = fixture_directory();
    let tokens = vec![element("Dummy"), element("Item"), end_tag(), end_tag()];

    assert_eq!(
        build_tree(parse(&directory, tokens.into_iter().map(Ok))),
        Err(BuildError::Parse(ParseError::MissingContentProperty {
            type_name: "Dummy".into()
        }))
    );
}
