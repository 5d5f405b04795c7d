//! Instruction parser state machine
//!
//! A single-pass, pull-based walk over the token stream. The grammar is
//! recursive (elements contain members contain elements), but the parser is
//! an [`Iterator`]: instead of recursing it keeps an explicit stack of
//! [`Frame`]s and runs one frame step per turn until some instruction is
//! ready. Tokens are only read when the consumer asks for the next
//! instruction.
//!
//! Grammar, in the order the frames run:
//!
//! - document: prefix definitions, then the root element sequence
//! - element sequence: optional `StartMember(host)`, a leading text value,
//!   then elements with the text after each one skipped, `EndMember(host)`
//! - element: `StartObject`, then either the constructor argument (types that
//!   need initialization) or attributes, implicit content and property
//!   elements; the end tag, then `EndObject`
//! - property element: a collection bracket or a scalar member, then its end
//!   tag and any implicit content after it

use std::collections::VecDeque;
use std::iter::FusedIterator;

use log::{debug, trace};

use super::frames::{
    BracketStage, DocumentStage, ElementStage, ElementsStage, EmptyElementStage, Frame,
    NestedStage,
};
use crate::xaml::config::ParserOptions;
use crate::xaml::error::ParseError;
use crate::xaml::extensions::{is_extension, ExtensionGrammar, ExtensionLowering};
use crate::xaml::instructions::Instruction;
use crate::xaml::tokens::{Token, TokenCursor};
use crate::xaml::typing::{ExtensionResolver, MemberDescriptor, TypeDescriptor};

/// Lazily turns a token stream into canonical instructions.
///
/// Single use: the parser owns its token source and reads it once. After an
/// error it yields nothing more.
pub struct InstructionParser<'a, R: ExtensionResolver, I> {
    cursor: TokenCursor<R::Type, I>,
    lowering: ExtensionLowering<'a, R>,
    options: ParserOptions,
    frames: Vec<Frame<R::Type>>,
    pending: VecDeque<Instruction<R::Type>>,
    depth: usize,
}

impl<'a, R, I> InstructionParser<'a, R, I>
where
    R: ExtensionResolver,
    I: Iterator<Item = Result<Token<R::Type>, ParseError>>,
{
    pub fn new(resolver: &'a R, tokens: I) -> Self {
        InstructionParser {
            cursor: TokenCursor::new(tokens),
            lowering: ExtensionLowering::new(resolver),
            options: ParserOptions::default(),
            frames: vec![Frame::Document(DocumentStage::Prime)],
            pending: VecDeque::new(),
            depth: 0,
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.lowering = self.lowering.with_max_depth(options.limits.max_depth);
        self.options = options;
        self
    }

    /// Replaces the bundled extension grammar.
    pub fn with_grammar(mut self, grammar: &'a dyn ExtensionGrammar) -> Self {
        self.lowering = ExtensionLowering::with_grammar(self.lowering.resolver(), grammar)
            .with_max_depth(self.options.limits.max_depth);
        self
    }

    fn emit(&mut self, instruction: Instruction<R::Type>) {
        self.pending.push_back(instruction);
    }

    fn push(&mut self, frame: Frame<R::Type>) {
        self.frames.push(frame);
    }

    fn step(&mut self, frame: Frame<R::Type>) -> Result<(), ParseError> {
        match frame {
            Frame::Document(stage) => self.document(stage),
            Frame::Elements { host, stage } => self.elements(host, stage),
            Frame::Element { ty, stage } => self.element(ty, stage),
            Frame::EmptyElement { ty, stage } => self.empty_element(ty, stage),
            Frame::Attributes => self.attributes(),
            Frame::ContentProperty { parent } => self.content_property(parent),
            Frame::NestedProperties { parent, stage } => self.nested_properties(parent, stage),
            Frame::PropertyElement { member, stage } => self.property_element(member, stage),
            Frame::Collection { member, stage } => self.collection(member, stage),
        }
    }

    fn document(&mut self, stage: DocumentStage) -> Result<(), ParseError> {
        match stage {
            DocumentStage::Prime => {
                debug!("parsing document");
                self.cursor.advance()?;
                self.push(Frame::Document(DocumentStage::Prefixes));
            }
            DocumentStage::Prefixes => {
                if let Token::PrefixDefinition { prefix, namespace } = self.cursor.current() {
                    let definition = Instruction::PrefixDefinition {
                        prefix: prefix.clone(),
                        namespace: namespace.clone(),
                    };
                    self.emit(definition);
                    self.cursor.advance()?;
                    self.push(Frame::Document(DocumentStage::Prefixes));
                } else {
                    self.push(Frame::Document(DocumentStage::Finish));
                    self.push(Frame::Elements {
                        host: None,
                        stage: ElementsStage::Open,
                    });
                }
            }
            DocumentStage::Finish => {
                let current = self.cursor.current();
                if self.options.document.reject_trailing_tokens && *current != Token::None {
                    return Err(ParseError::TrailingContent {
                        found: current.kind(),
                    });
                }
                debug!("document finished");
            }
        }
        Ok(())
    }

    fn elements(
        &mut self,
        host: Option<<R::Type as TypeDescriptor>::Member>,
        stage: ElementsStage,
    ) -> Result<(), ParseError> {
        match stage {
            ElementsStage::Open => {
                if let Some(member) = &host {
                    self.emit(Instruction::StartMember(member.clone()));
                }
                if let Token::Text(text) = self.cursor.current() {
                    let value = Instruction::Value(text.clone());
                    self.emit(value);
                }
                self.push(Frame::Elements {
                    host,
                    stage: ElementsStage::Next,
                });
            }
            ElementsStage::Next => match self.cursor.current() {
                Token::Element(ty) => {
                    let ty = ty.clone();
                    self.enter(&ty)?;
                    self.push(Frame::Elements {
                        host,
                        stage: ElementsStage::AfterChild,
                    });
                    self.push(Frame::Element {
                        ty,
                        stage: ElementStage::Open,
                    });
                }
                Token::EmptyElement(ty) => {
                    let ty = ty.clone();
                    self.enter(&ty)?;
                    self.push(Frame::Elements {
                        host,
                        stage: ElementsStage::AfterChild,
                    });
                    self.push(Frame::EmptyElement {
                        ty,
                        stage: EmptyElementStage::Open,
                    });
                }
                _ => {
                    if host.is_some() {
                        self.emit(Instruction::EndMember);
                    }
                }
            },
            ElementsStage::AfterChild => {
                // Text between sibling elements is discarded
                self.cursor.skip_text()?;
                self.push(Frame::Elements {
                    host,
                    stage: ElementsStage::Next,
                });
            }
        }
        Ok(())
    }

    fn element(&mut self, ty: R::Type, stage: ElementStage) -> Result<(), ParseError> {
        match stage {
            ElementStage::Open => {
                self.emit(Instruction::StartObject(ty.clone()));
                if ty.needs_initialization() {
                    self.initialization(&ty)?;
                    self.push(Frame::Element {
                        ty,
                        stage: ElementStage::Close,
                    });
                } else {
                    self.cursor.advance()?;
                    self.push(Frame::Element {
                        ty,
                        stage: ElementStage::Content,
                    });
                    self.push(Frame::Attributes);
                }
            }
            ElementStage::Content => {
                self.push(Frame::Element {
                    ty: ty.clone(),
                    stage: ElementStage::Nested,
                });
                self.push(Frame::ContentProperty { parent: ty });
            }
            ElementStage::Nested => {
                self.cursor.skip_text()?;
                self.push(Frame::Element {
                    ty: ty.clone(),
                    stage: ElementStage::Close,
                });
                self.push(Frame::NestedProperties {
                    parent: ty,
                    stage: NestedStage::Next,
                });
            }
            ElementStage::Close => {
                self.cursor.skip_text()?;
                if *self.cursor.current() != Token::EndTag {
                    return Err(self.missing_end_tag(ty.name()));
                }
                self.emit(Instruction::EndObject);
                self.cursor.advance()?;
                self.leave();
            }
        }
        Ok(())
    }

    /// The sole constructor argument is the element's inline text.
    fn initialization(&mut self, ty: &R::Type) -> Result<(), ParseError> {
        self.cursor.advance()?;
        let argument = match self.cursor.current() {
            Token::Text(text) => text.clone(),
            Token::None if self.cursor.is_exhausted() => {
                return Err(ParseError::PrematureEndOfStream {
                    context: "reading a constructor argument",
                })
            }
            other => {
                return Err(ParseError::UnsupportedConstructorArguments {
                    type_name: ty.name().to_string(),
                    found: other.kind(),
                })
            }
        };

        self.cursor.advance()?;
        self.cursor.skip_text()?;
        let current = self.cursor.current();
        if !matches!(current, Token::EndTag | Token::None) {
            return Err(ParseError::UnsupportedConstructorArguments {
                type_name: ty.name().to_string(),
                found: current.kind(),
            });
        }

        self.emit(Instruction::Initialization);
        self.emit(Instruction::Value(argument));
        self.emit(Instruction::EndMember);
        Ok(())
    }

    fn empty_element(&mut self, ty: R::Type, stage: EmptyElementStage) -> Result<(), ParseError> {
        match stage {
            EmptyElementStage::Open => {
                self.emit(Instruction::StartObject(ty.clone()));
                self.cursor.advance()?;
                self.push(Frame::EmptyElement {
                    ty,
                    stage: EmptyElementStage::Close,
                });
                self.push(Frame::Attributes);
            }
            EmptyElementStage::Close => {
                self.emit(Instruction::EndObject);
                if self.cursor.current().is_text() {
                    self.cursor.advance()?;
                }
                self.leave();
            }
        }
        Ok(())
    }

    fn attributes(&mut self) -> Result<(), ParseError> {
        let (member, text) = match self.cursor.current() {
            Token::Attribute { member, text } => (member.clone(), text.clone()),
            _ => return Ok(()),
        };

        self.emit(Instruction::StartMember(member));
        if is_extension(&text) {
            let lowered = self.lowering.lower_text(&text)?;
            self.pending.extend(lowered);
        } else {
            self.emit(Instruction::Value(text));
        }
        self.emit(Instruction::EndMember);

        self.cursor.advance()?;
        self.push(Frame::Attributes);
        Ok(())
    }

    fn content_property(&mut self, parent: R::Type) -> Result<(), ParseError> {
        let implicit = matches!(
            self.cursor.current(),
            Token::Text(_) | Token::Element(_) | Token::EmptyElement(_)
        );
        if !implicit {
            return Ok(());
        }

        let member = parent
            .content_member()
            .ok_or_else(|| ParseError::MissingContentProperty {
                type_name: parent.name().to_string(),
            })?;

        if member.is_collection() {
            self.push(Frame::Collection {
                member,
                stage: BracketStage::Open,
            });
        } else {
            self.push(Frame::Elements {
                host: Some(member),
                stage: ElementsStage::Open,
            });
        }
        Ok(())
    }

    fn nested_properties(
        &mut self,
        parent: R::Type,
        stage: NestedStage<<R::Type as TypeDescriptor>::Member>,
    ) -> Result<(), ParseError> {
        match stage {
            NestedStage::Next => match self.cursor.current() {
                Token::PropertyElement(member) => {
                    let member = member.clone();
                    self.push(Frame::NestedProperties {
                        parent,
                        stage: NestedStage::AfterProperty(member.clone()),
                    });
                    if member.is_collection() {
                        self.cursor.advance()?;
                        self.push(Frame::Collection {
                            member,
                            stage: BracketStage::Open,
                        });
                    } else {
                        self.push(Frame::PropertyElement {
                            member,
                            stage: BracketStage::Open,
                        });
                    }
                }
                Token::EmptyPropertyElement(member) => {
                    let member = member.clone();
                    self.cursor.advance()?;
                    self.emit_empty_property(member);
                    self.push(Frame::NestedProperties {
                        parent,
                        stage: NestedStage::AfterEmptyProperty,
                    });
                }
                _ => {}
            },
            NestedStage::AfterProperty(member) => {
                self.cursor.skip_text()?;
                if *self.cursor.current() != Token::EndTag {
                    let element = format!("{}.{}", parent.name(), member.name());
                    return Err(self.missing_end_tag(&element));
                }
                self.cursor.advance()?;
                self.resume_nested_properties(parent);
            }
            NestedStage::AfterEmptyProperty => self.resume_nested_properties(parent),
        }
        Ok(())
    }

    /// Implicit content may follow a property element, then more property elements.
    fn resume_nested_properties(&mut self, parent: R::Type) {
        self.push(Frame::NestedProperties {
            parent: parent.clone(),
            stage: NestedStage::Next,
        });
        self.push(Frame::ContentProperty { parent });
    }

    fn emit_empty_property(&mut self, member: <R::Type as TypeDescriptor>::Member) {
        let is_collection = member.is_collection();
        self.emit(Instruction::StartMember(member));
        if is_collection {
            self.emit(Instruction::GetObject);
            self.emit(Instruction::Items);
            self.emit(Instruction::EndMember);
            self.emit(Instruction::EndObject);
        } else {
            self.emit(Instruction::Value(String::new()));
        }
        self.emit(Instruction::EndMember);
    }

    fn property_element(
        &mut self,
        member: <R::Type as TypeDescriptor>::Member,
        stage: BracketStage,
    ) -> Result<(), ParseError> {
        match stage {
            BracketStage::Open => {
                self.emit(Instruction::StartMember(member.clone()));
                self.cursor.advance()?;
                self.push(Frame::PropertyElement {
                    member,
                    stage: BracketStage::Close,
                });
                let has_body = matches!(
                    self.cursor.current(),
                    Token::Text(_) | Token::Element(_) | Token::EmptyElement(_)
                );
                if has_body {
                    self.push(Frame::Elements {
                        host: None,
                        stage: ElementsStage::Open,
                    });
                } else {
                    // Same shape as an empty property element
                    self.emit(Instruction::Value(String::new()));
                }
            }
            BracketStage::Close => self.emit(Instruction::EndMember),
        }
        Ok(())
    }

    fn collection(
        &mut self,
        member: <R::Type as TypeDescriptor>::Member,
        stage: BracketStage,
    ) -> Result<(), ParseError> {
        match stage {
            BracketStage::Open => {
                trace!("collection {}", member.name());
                self.emit(Instruction::StartMember(member.clone()));
                self.emit(Instruction::GetObject);
                self.emit(Instruction::Items);
                self.push(Frame::Collection {
                    member,
                    stage: BracketStage::Close,
                });
                self.push(Frame::Elements {
                    host: None,
                    stage: ElementsStage::Open,
                });
            }
            BracketStage::Close => {
                self.emit(Instruction::EndMember);
                self.emit(Instruction::EndObject);
                self.emit(Instruction::EndMember);
            }
        }
        Ok(())
    }

    fn enter(&mut self, ty: &R::Type) -> Result<(), ParseError> {
        let limit = self.options.limits.max_depth;
        if self.depth >= limit {
            return Err(ParseError::DepthLimitExceeded { limit });
        }
        self.depth += 1;
        trace!("element {} at depth {}", ty.name(), self.depth);
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn missing_end_tag(&self, element: &str) -> ParseError {
        ParseError::MissingEndTag {
            element: element.to_string(),
            found: self.cursor.current().kind(),
        }
    }
}

impl<'a, R, I> Iterator for InstructionParser<'a, R, I>
where
    R: ExtensionResolver,
    I: Iterator<Item = Result<Token<R::Type>, ParseError>>,
{
    type Item = Result<Instruction<R::Type>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(instruction) = self.pending.pop_front() {
                return Some(Ok(instruction));
            }
            let frame = self.frames.pop()?;
            if let Err(error) = self.step(frame) {
                // Nothing from the failed step is handed out
                self.pending.clear();
                self.frames.clear();
                return Some(Err(error));
            }
        }
    }
}

impl<'a, R, I> FusedIterator for InstructionParser<'a, R, I>
where
    R: ExtensionResolver,
    I: Iterator<Item = Result<Token<R::Type>, ParseError>>,
{
}
