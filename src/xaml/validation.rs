//! Structural checks over instruction sequences
//!
//! A stack of open frames is kept while walking the sequence. Object frames
//! are opened by `StartObject` and `GetObject` and closed by `EndObject`;
//! member frames are opened by `StartMember`, `Items` and `Initialization`
//! and closed by `EndMember`.
//!
//! Member frames also track what they hold. A member holds one `Value` or
//! only objects; an `Initialization` holds exactly one `Value`. An `Items`
//! bracket may be empty. Argument-list members are exempt.

use thiserror::Error;

use crate::xaml::instructions::{Instruction, InstructionKind};
use crate::xaml::typing::{MemberDescriptor, TypeDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("prefix definition at {index} follows other instructions")]
    LatePrefixDefinition { index: usize },

    #[error("{kind:?} at {index} is not allowed {context}")]
    Misplaced {
        index: usize,
        kind: InstructionKind,
        context: &'static str,
    },

    #[error("{kind:?} at {index} does not close the open {open}")]
    Unbalanced {
        index: usize,
        kind: InstructionKind,
        open: &'static str,
    },

    #[error("{open} frames left open at the end")]
    Unclosed { open: usize },

    #[error("value at {index} follows another value in the same member")]
    MultipleValues { index: usize },

    #[error("{kind:?} at {index} mixes a value with objects in one member")]
    MixedContent { index: usize, kind: InstructionKind },

    #[error("member closed at {index} holds no content")]
    EmptyMember { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Holds {
    Nothing,
    Value,
    Objects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberRule {
    Scalar,
    Items,
    Initialization,
    Arguments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Object,
    Member { rule: MemberRule, holds: Holds },
}

impl Open {
    fn member(rule: MemberRule) -> Self {
        Open::Member {
            rule,
            holds: Holds::Nothing,
        }
    }

    fn describe(frame: Option<&Open>) -> &'static str {
        match frame {
            Some(Open::Object) => "object",
            Some(Open::Member { .. }) => "member",
            None => "document",
        }
    }
}

/// Records an object opening inside the member on top of the stack.
fn hold_object(
    top: Option<&mut Open>,
    index: usize,
    kind: InstructionKind,
) -> Result<(), ValidationError> {
    let Some(Open::Member { rule, holds }) = top else {
        return Ok(());
    };
    match (*rule, *holds) {
        (MemberRule::Arguments, _) => {}
        (MemberRule::Initialization, _) => {
            return Err(ValidationError::Misplaced {
                index,
                kind,
                context: "inside an initialization",
            })
        }
        (_, Holds::Value) => return Err(ValidationError::MixedContent { index, kind }),
        _ => *holds = Holds::Objects,
    }
    Ok(())
}

fn hold_value(top: Option<&mut Open>, index: usize) -> Result<(), ValidationError> {
    let Some(Open::Member { rule, holds }) = top else {
        return Ok(());
    };
    match (*rule, *holds) {
        (MemberRule::Arguments, _) => {}
        (_, Holds::Nothing) => *holds = Holds::Value,
        (_, Holds::Value) => return Err(ValidationError::MultipleValues { index }),
        (_, Holds::Objects) => {
            return Err(ValidationError::MixedContent {
                index,
                kind: InstructionKind::Value,
            })
        }
    }
    Ok(())
}

/// Check that a sequence is balanced, every instruction sits where the
/// construction protocol allows it, and every member holds legal content.
pub fn validate<T: TypeDescriptor>(instructions: &[Instruction<T>]) -> Result<(), ValidationError> {
    let mut stack: Vec<Open> = Vec::new();
    let mut seen_other = false;

    for (index, instruction) in instructions.iter().enumerate() {
        let kind = instruction.kind();
        let top = stack.last().copied();
        let in_object = top == Some(Open::Object);
        let in_member = matches!(top, Some(Open::Member { .. }));
        let misplaced = |context| ValidationError::Misplaced {
            index,
            kind,
            context,
        };

        match instruction {
            Instruction::PrefixDefinition { .. } => {
                if seen_other {
                    return Err(ValidationError::LatePrefixDefinition { index });
                }
                continue;
            }
            Instruction::StartObject(_) => {
                if in_object {
                    return Err(misplaced("directly inside an object"));
                }
                hold_object(stack.last_mut(), index, kind)?;
                stack.push(Open::Object);
            }
            Instruction::GetObject => {
                if !in_member {
                    return Err(misplaced("outside a member"));
                }
                hold_object(stack.last_mut(), index, kind)?;
                stack.push(Open::Object);
            }
            Instruction::StartMember(member) => {
                if !in_object {
                    return Err(misplaced("outside an object"));
                }
                let rule = if member.is_argument_list() {
                    MemberRule::Arguments
                } else {
                    MemberRule::Scalar
                };
                stack.push(Open::member(rule));
            }
            Instruction::Items => {
                if !in_object {
                    return Err(misplaced("outside an object"));
                }
                stack.push(Open::member(MemberRule::Items));
            }
            Instruction::Initialization => {
                let follows_start = index > 0
                    && matches!(instructions[index - 1], Instruction::StartObject(_));
                if !follows_start {
                    return Err(misplaced("anywhere but right after StartObject"));
                }
                stack.push(Open::member(MemberRule::Initialization));
            }
            Instruction::Value(_) => {
                if !in_member {
                    return Err(misplaced("outside a member"));
                }
                hold_value(stack.last_mut(), index)?;
            }
            Instruction::EndObject => {
                if !in_object {
                    return Err(ValidationError::Unbalanced {
                        index,
                        kind,
                        open: Open::describe(top.as_ref()),
                    });
                }
                stack.pop();
            }
            Instruction::EndMember => match top {
                Some(Open::Member { rule, holds }) => {
                    let must_hold =
                        matches!(rule, MemberRule::Scalar | MemberRule::Initialization);
                    if must_hold && holds == Holds::Nothing {
                        return Err(ValidationError::EmptyMember { index });
                    }
                    stack.pop();
                }
                _ => {
                    return Err(ValidationError::Unbalanced {
                        index,
                        kind,
                        open: Open::describe(top.as_ref()),
                    })
                }
            },
        }
        seen_other = true;
    }

    if stack.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Unclosed { open: stack.len() })
    }
}
