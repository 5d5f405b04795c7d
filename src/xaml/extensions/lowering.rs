//! Lowering extension expressions to instructions
//!
//! An expression becomes an object construction block:
//!
//! ```text
//! StartObject(extension type)
//!   StartMember(positional arguments)   only when there are any
//!     Value / nested object block       one per positional argument
//!   EndMember
//!   StartMember(named member)           one per named argument
//!     Value / nested object block
//!   EndMember
//! EndObject
//! ```
//!
//! Lowering is independent of the token stream, so it can be tested and used
//! on its own.
//!
//! Nesting is bounded by `max_depth`. Text is checked before the grammar
//! sees it, and trees handed to [`ExtensionLowering::lower`] directly are
//! checked while they are walked.

use log::debug;

use super::ast::{ArgumentValue, ExtensionExpression};
use super::grammar::{ExtensionGrammar, MarkupExtensionGrammar};
use super::lexer::{tokenize_with_spans, ExtensionToken};
use crate::xaml::config::LimitsConfig;
use crate::xaml::error::ParseError;
use crate::xaml::instructions::Instruction;
use crate::xaml::typing::{ExtensionResolver, TypeDescriptor};

/// Instruction type produced for resolver `R`
type ResolvedInstruction<R> = Instruction<<R as ExtensionResolver>::Type>;

pub struct ExtensionLowering<'a, R> {
    resolver: &'a R,
    grammar: &'a dyn ExtensionGrammar,
    max_depth: usize,
}

impl<'a, R: ExtensionResolver> ExtensionLowering<'a, R> {
    /// Lowering with the bundled [`MarkupExtensionGrammar`].
    pub fn new(resolver: &'a R) -> Self {
        Self::with_grammar(resolver, &MarkupExtensionGrammar)
    }

    pub fn with_grammar(resolver: &'a R, grammar: &'a dyn ExtensionGrammar) -> Self {
        ExtensionLowering {
            resolver,
            grammar,
            max_depth: LimitsConfig::default().max_depth,
        }
    }

    /// Deepest extension nesting accepted in one expression.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn resolver(&self) -> &'a R {
        self.resolver
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parses extension text and lowers the resulting expression.
    pub fn lower_text(&self, text: &str) -> Result<Vec<ResolvedInstruction<R>>, ParseError> {
        self.check_nesting(text)?;
        let expression = self.grammar.parse(text)?;
        debug!("lowering extension {}", expression.type_name);
        self.lower(&expression)
    }

    /// Counts brace nesting outside quotes. Text the lexer rejects is left
    /// for the grammar to report.
    fn check_nesting(&self, text: &str) -> Result<(), ParseError> {
        let Ok(tokens) = tokenize_with_spans(text) else {
            return Ok(());
        };
        let mut depth = 0usize;
        for (token, _) in tokens {
            match token {
                ExtensionToken::OpenBrace => {
                    depth += 1;
                    if depth > self.max_depth {
                        return Err(self.too_deep());
                    }
                }
                ExtensionToken::CloseBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        Ok(())
    }

    fn too_deep(&self) -> ParseError {
        ParseError::DepthLimitExceeded {
            limit: self.max_depth,
        }
    }

    pub fn lower(
        &self,
        expression: &ExtensionExpression,
    ) -> Result<Vec<ResolvedInstruction<R>>, ParseError> {
        let mut instructions = Vec::new();
        self.lower_into(expression, 1, &mut instructions)?;
        Ok(instructions)
    }

    fn lower_into(
        &self,
        expression: &ExtensionExpression,
        depth: usize,
        out: &mut Vec<ResolvedInstruction<R>>,
    ) -> Result<(), ParseError> {
        if depth > self.max_depth {
            return Err(self.too_deep());
        }
        let extension_type = self
            .resolver
            .resolve_extension(&expression.type_name)
            .ok_or_else(|| ParseError::MissingMetadata {
                name: expression.type_name.to_string(),
            })?;

        out.push(Instruction::StartObject(extension_type.clone()));

        if !expression.positional.is_empty() {
            out.push(Instruction::StartMember(self.resolver.positional_arguments()));
            for argument in &expression.positional {
                self.lower_argument(argument, depth, out)?;
            }
            out.push(Instruction::EndMember);
        }

        for (name, argument) in &expression.named {
            let member = extension_type.member(name).ok_or_else(|| ParseError::MissingMetadata {
                name: format!("{}.{}", extension_type.name(), name),
            })?;
            out.push(Instruction::StartMember(member));
            self.lower_argument(argument, depth, out)?;
            out.push(Instruction::EndMember);
        }

        out.push(Instruction::EndObject);
        Ok(())
    }

    fn lower_argument(
        &self,
        argument: &ArgumentValue,
        depth: usize,
        out: &mut Vec<ResolvedInstruction<R>>,
    ) -> Result<(), ParseError> {
        match argument {
            ArgumentValue::Text(text) => {
                out.push(Instruction::Value(text.clone()));
                Ok(())
            }
            ArgumentValue::Extension(inner) => self.lower_into(inner, depth + 1, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xaml::error::GrammarError;
    use crate::xaml::extensions::TypeName;
    use crate::xaml::formats::to_listing;
    use crate::xaml::testing::fixture_directory;

    #[test]
    fn test_named_argument_becomes_member() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::new(&directory);

        let listing = to_listing(&lowering.lower_text("{Simple Property=MyText}").unwrap());
        assert_eq!(
            listing,
            "StartObject SimpleExtension\n\
             \x20 StartMember Property\n\
             \x20   Value \"MyText\"\n\
             \x20 EndMember\n\
             EndObject\n"
        );
    }

    #[test]
    fn test_positional_arguments_share_one_directive_member() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::new(&directory);

        let instructions = lowering.lower_text("{Simple a, {Simple b}}").unwrap();
        let listing = to_listing(&instructions);
        assert_eq!(
            listing,
            "StartObject SimpleExtension\n\
             \x20 StartMember PositionalParameters\n\
             \x20   Value \"a\"\n\
             \x20   StartObject SimpleExtension\n\
             \x20     StartMember PositionalParameters\n\
             \x20       Value \"b\"\n\
             \x20     EndMember\n\
             \x20   EndObject\n\
             \x20 EndMember\n\
             EndObject\n"
        );
    }

    #[test]
    fn test_lowering_a_tree_directly() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::new(&directory);
        let expression = ExtensionExpression::new(TypeName::new("Simple"));

        let instructions = lowering.lower(&expression).unwrap();
        assert_eq!(instructions.len(), 2);
        assert!(matches!(instructions[0], Instruction::StartObject(_)));
        assert_eq!(instructions[1], Instruction::EndObject);
    }

    #[test]
    fn test_unknown_extension_type() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::new(&directory);
        assert_eq!(
            lowering.lower_text("{Nope}"),
            Err(ParseError::MissingMetadata {
                name: "Nope".into()
            })
        );
    }

    #[test]
    fn test_unknown_named_member() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::new(&directory);
        assert_eq!(
            lowering.lower_text("{Simple Missing=1}"),
            Err(ParseError::MissingMetadata {
                name: "SimpleExtension.Missing".into()
            })
        );
    }

    fn nested(depth: usize) -> String {
        format!("{}a{}", "{Simple ".repeat(depth), "}".repeat(depth))
    }

    #[test]
    fn test_nesting_up_to_the_limit() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::new(&directory).with_max_depth(3);

        let instructions = lowering.lower_text(&nested(3)).unwrap();
        let objects = instructions
            .iter()
            .filter(|i| matches!(i, Instruction::StartObject(_)))
            .count();
        assert_eq!(objects, 3);

        assert_eq!(
            lowering.lower_text(&nested(4)),
            Err(ParseError::DepthLimitExceeded { limit: 3 })
        );
    }

    #[test]
    fn test_deep_nesting_fails_before_parsing() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::new(&directory);
        assert_eq!(lowering.max_depth(), 256);
        assert_eq!(
            lowering.lower_text(&nested(3000)),
            Err(ParseError::DepthLimitExceeded { limit: 256 })
        );
    }

    #[test]
    fn test_quoted_braces_do_not_nest() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::new(&directory).with_max_depth(1);
        assert!(lowering.lower_text("{Simple Property='{{{'}").is_ok());
    }

    #[test]
    fn test_deep_tree_is_rejected() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::new(&directory).with_max_depth(2);
        let leaf = ExtensionExpression::new(TypeName::new("Simple"));
        let middle = ExtensionExpression::new(TypeName::new("Simple"))
            .with_positional(ArgumentValue::Extension(Box::new(leaf)));
        let top = ExtensionExpression::new(TypeName::new("Simple"))
            .with_named("Nested", ArgumentValue::Extension(Box::new(middle.clone())));

        assert!(lowering.lower(&middle).is_ok());
        assert_eq!(
            lowering.lower(&top),
            Err(ParseError::DepthLimitExceeded { limit: 2 })
        );
    }

    struct RejectingGrammar;

    impl ExtensionGrammar for RejectingGrammar {
        fn parse(&self, text: &str) -> Result<ExtensionExpression, GrammarError> {
            Err(GrammarError::new(text, 0, "rejected"))
        }
    }

    #[test]
    fn test_custom_grammar_errors_propagate() {
        let directory = fixture_directory();
        let lowering = ExtensionLowering::with_grammar(&directory, &RejectingGrammar);
        assert!(matches!(
            lowering.lower_text("{Simple}"),
            Err(ParseError::Grammar(_))
        ));
    }
}
