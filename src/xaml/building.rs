//! Construction tree assembly
//!
//! Folds a flat instruction stream back into the tree it encodes: one
//! [`ConstructionNode`] per `StartObject ... EndObject` block, with member
//! assignments in stream order. This is what an object builder walks before
//! instantiating anything; instantiation itself is left to the host.
//!
//! The reader accepts exactly the shapes the parser emits:
//!
//! ```text
//! document   := PrefixDefinition* object*
//! object     := StartObject initialization? member* EndObject
//! init       := Initialization Value* EndMember
//! member     := StartMember value* EndMember
//! value      := Value | object | collection
//! collection := GetObject Items value* EndMember EndObject
//! ```

use thiserror::Error;

use crate::xaml::error::ParseError;
use crate::xaml::instructions::{Instruction, InstructionKind};
use crate::xaml::typing::{MemberDescriptor, TypeDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The stream does not have the shape of a construction tree.
    #[error("malformed instruction stream at {index}: {reason}")]
    Malformed { index: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMapping {
    pub prefix: String,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionDocument<T: TypeDescriptor> {
    pub prefixes: Vec<PrefixMapping>,
    pub roots: Vec<ConstructionNode<T>>,
}

/// One object to construct.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionNode<T: TypeDescriptor> {
    pub instance_type: T,
    /// Constructor arguments, present only for types that need initialization.
    pub injectable_arguments: Vec<String>,
    pub assignments: Vec<MemberAssignment<T>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberAssignment<T: TypeDescriptor> {
    pub member: T::Member,
    pub values: Vec<MemberValue<T>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberValue<T: TypeDescriptor> {
    Text(String),
    Object(ConstructionNode<T>),
    /// Items added to the collection already held by the member.
    Collection(Vec<MemberValue<T>>),
}

impl<T: TypeDescriptor> ConstructionNode<T> {
    /// The assignment of the named member, if any.
    pub fn assignment(&self, member_name: &str) -> Option<&MemberAssignment<T>> {
        self.assignments
            .iter()
            .find(|assignment| assignment.member.name() == member_name)
    }
}

/// Assemble a construction tree from a (possibly failing) instruction stream.
///
/// Parse errors pass through unchanged; [`BuildError::Malformed`] reports the
/// index of the first instruction that does not fit.
pub fn build_tree<T, I>(instructions: I) -> Result<ConstructionDocument<T>, BuildError>
where
    T: TypeDescriptor,
    I: IntoIterator<Item = Result<Instruction<T>, ParseError>>,
{
    let mut reader = TreeReader {
        source: instructions.into_iter(),
        lookahead: None,
        index: 0,
    };
    reader.document()
}

struct TreeReader<T: TypeDescriptor, I> {
    source: I,
    lookahead: Option<Instruction<T>>,
    index: usize,
}

impl<T, I> TreeReader<T, I>
where
    T: TypeDescriptor,
    I: Iterator<Item = Result<Instruction<T>, ParseError>>,
{
    fn peek(&mut self) -> Result<Option<&Instruction<T>>, BuildError> {
        if self.lookahead.is_none() {
            self.lookahead = self.source.next().transpose()?;
        }
        Ok(self.lookahead.as_ref())
    }

    fn take(&mut self) -> Result<Option<Instruction<T>>, BuildError> {
        self.peek()?;
        let taken = self.lookahead.take();
        if taken.is_some() {
            self.index += 1;
        }
        Ok(taken)
    }

    fn malformed(&self, reason: impl Into<String>) -> BuildError {
        BuildError::Malformed {
            index: self.index,
            reason: reason.into(),
        }
    }

    fn expect(&mut self, kind: InstructionKind, context: &str) -> Result<(), BuildError> {
        match self.peek()? {
            Some(instruction) if instruction.kind() == kind => {
                self.take()?;
                Ok(())
            }
            Some(other) => {
                let reason = format!("expected {:?} {}, found {}", kind, context, other);
                Err(self.malformed(reason))
            }
            None => Err(self.malformed(format!("expected {:?} {}, found end", kind, context))),
        }
    }

    fn document(&mut self) -> Result<ConstructionDocument<T>, BuildError> {
        let mut prefixes = Vec::new();
        while let Some(Instruction::PrefixDefinition { .. }) = self.peek()? {
            if let Some(Instruction::PrefixDefinition { prefix, namespace }) = self.take()? {
                prefixes.push(PrefixMapping { prefix, namespace });
            }
        }

        let mut roots = Vec::new();
        while let Some(next) = self.peek()? {
            if next.kind() != InstructionKind::StartObject {
                let reason = format!("expected a root object, found {}", next);
                return Err(self.malformed(reason));
            }
            roots.push(self.object()?);
        }

        Ok(ConstructionDocument { prefixes, roots })
    }

    fn object(&mut self) -> Result<ConstructionNode<T>, BuildError> {
        let instance_type = match self.take()? {
            Some(Instruction::StartObject(ty)) => ty,
            _ => return Err(self.malformed("expected StartObject")),
        };

        let mut node = ConstructionNode {
            instance_type,
            injectable_arguments: Vec::new(),
            assignments: Vec::new(),
        };

        if let Some(Instruction::Initialization) = self.peek()? {
            self.take()?;
            while let Some(Instruction::Value(_)) = self.peek()? {
                if let Some(Instruction::Value(text)) = self.take()? {
                    node.injectable_arguments.push(text);
                }
            }
            self.expect(InstructionKind::EndMember, "closing the initialization")?;
        }

        loop {
            match self.peek()? {
                Some(Instruction::StartMember(_)) => {
                    let assignment = self.member()?;
                    node.assignments.push(assignment);
                }
                Some(Instruction::EndObject) => {
                    self.take()?;
                    return Ok(node);
                }
                Some(other) => {
                    let reason = format!(
                        "unexpected {} inside {}",
                        other,
                        node.instance_type.name()
                    );
                    return Err(self.malformed(reason));
                }
                None => {
                    let reason = format!("{} is never closed", node.instance_type.name());
                    return Err(self.malformed(reason));
                }
            }
        }
    }

    fn member(&mut self) -> Result<MemberAssignment<T>, BuildError> {
        let member = match self.take()? {
            Some(Instruction::StartMember(member)) => member,
            _ => return Err(self.malformed("expected StartMember")),
        };
        let values = self.values("member")?;
        self.expect(InstructionKind::EndMember, "closing the member")?;
        Ok(MemberAssignment { member, values })
    }

    /// Values up to, not including, the closing `EndMember`.
    fn values(&mut self, context: &str) -> Result<Vec<MemberValue<T>>, BuildError> {
        let mut values = Vec::new();
        loop {
            match self.peek()? {
                Some(Instruction::Value(_)) => {
                    if let Some(Instruction::Value(text)) = self.take()? {
                        values.push(MemberValue::Text(text));
                    }
                }
                Some(Instruction::StartObject(_)) => {
                    values.push(MemberValue::Object(self.object()?));
                }
                Some(Instruction::GetObject) => {
                    values.push(self.collection()?);
                }
                Some(Instruction::EndMember) => return Ok(values),
                Some(other) => {
                    let reason = format!("unexpected {} inside a {}", other, context);
                    return Err(self.malformed(reason));
                }
                None => return Err(self.malformed(format!("{} is never closed", context))),
            }
        }
    }

    fn collection(&mut self) -> Result<MemberValue<T>, BuildError> {
        self.expect(InstructionKind::GetObject, "opening a collection")?;
        self.expect(InstructionKind::Items, "after GetObject")?;
        let items = self.values("collection")?;
        self.expect(InstructionKind::EndMember, "closing the items")?;
        self.expect(InstructionKind::EndObject, "closing the collection")?;
        Ok(MemberValue::Collection(items))
    }
}
