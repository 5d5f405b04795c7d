//! Canonical construction instructions
//!
//! The parser's output vocabulary. A builder consumes instructions strictly
//! in order. Well-formed sequences are stack balanced: `StartObject` and
//! `GetObject` open an object frame closed by `EndObject`; `StartMember`,
//! `Items` and `Initialization` open a member frame closed by `EndMember`.
//! See [`validation`](crate::xaml::validation) for the full set of rules.

use std::fmt;

use crate::xaml::typing::{MemberDescriptor, TypeDescriptor};

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction<T: TypeDescriptor> {
    PrefixDefinition { prefix: String, namespace: String },
    StartObject(T),
    EndObject,
    StartMember(T::Member),
    EndMember,
    Value(String),
    /// Use the live instance of the enclosing collection member instead of
    /// constructing a new one.
    GetObject,
    /// Starts the flattened child objects appended to a collection.
    Items,
    /// The next `Value` is the constructor argument of the current object.
    Initialization,
}

impl<T: TypeDescriptor> Instruction<T> {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Instruction::PrefixDefinition { .. } => InstructionKind::PrefixDefinition,
            Instruction::StartObject(_) => InstructionKind::StartObject,
            Instruction::EndObject => InstructionKind::EndObject,
            Instruction::StartMember(_) => InstructionKind::StartMember,
            Instruction::EndMember => InstructionKind::EndMember,
            Instruction::Value(_) => InstructionKind::Value,
            Instruction::GetObject => InstructionKind::GetObject,
            Instruction::Items => InstructionKind::Items,
            Instruction::Initialization => InstructionKind::Initialization,
        }
    }

    /// Instructions that open a frame closed by `EndObject` or `EndMember`.
    pub fn opens_frame(&self) -> bool {
        matches!(
            self,
            Instruction::StartObject(_)
                | Instruction::GetObject
                | Instruction::StartMember(_)
                | Instruction::Items
                | Instruction::Initialization
        )
    }

    pub fn closes_frame(&self) -> bool {
        matches!(self, Instruction::EndObject | Instruction::EndMember)
    }
}

impl<T: TypeDescriptor> fmt::Display for Instruction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::PrefixDefinition { prefix, namespace } => {
                write!(f, "PrefixDefinition {:?} = {:?}", prefix, namespace)
            }
            Instruction::StartObject(ty) => write!(f, "StartObject {}", ty.name()),
            Instruction::StartMember(member) => write!(f, "StartMember {}", member.name()),
            Instruction::Value(text) => write!(f, "Value {:?}", text),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    PrefixDefinition,
    StartObject,
    EndObject,
    StartMember,
    EndMember,
    Value,
    GetObject,
    Items,
    Initialization,
}
