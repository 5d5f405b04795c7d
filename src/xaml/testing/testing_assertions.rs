//! Fluent assertion API for instruction sequences

use crate::xaml::formats::to_listing;
use crate::xaml::instructions::{Instruction, InstructionKind};
use crate::xaml::typing::TypeDescriptor;
use crate::xaml::validation::validate;

/// Create an assertion builder for an instruction sequence
pub fn assert_instructions<T: TypeDescriptor>(
    instructions: &[Instruction<T>],
) -> InstructionsAssertion<'_, T> {
    InstructionsAssertion { instructions }
}

pub struct InstructionsAssertion<'a, T: TypeDescriptor> {
    instructions: &'a [Instruction<T>],
}

impl<'a, T: TypeDescriptor> InstructionsAssertion<'a, T> {
    /// Assert the exact sequence of instruction kinds
    pub fn kinds(self, expected: &[InstructionKind]) -> Self {
        let actual: Vec<InstructionKind> = self.instructions.iter().map(|i| i.kind()).collect();
        assert_eq!(
            actual,
            expected,
            "instruction kinds differ:\n{}",
            to_listing(self.instructions)
        );
        self
    }

    /// Assert how many instructions of one kind occur
    pub fn count(self, kind: InstructionKind, expected: usize) -> Self {
        let actual = self.instructions.iter().filter(|i| i.kind() == kind).count();
        assert_eq!(
            actual,
            expected,
            "expected {} {:?}, found {}:\n{}",
            expected,
            kind,
            actual,
            to_listing(self.instructions)
        );
        self
    }

    /// Assert the sequence is structurally well formed
    pub fn well_formed(self) -> Self {
        if let Err(error) = validate(self.instructions) {
            panic!("{}:\n{}", error, to_listing(self.instructions));
        }
        self
    }

    /// Assert no `Value` carries the given text
    pub fn no_value(self, text: &str) -> Self {
        let found = self
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::Value(value) if value == text));
        assert!(
            !found,
            "unexpected Value {:?}:\n{}",
            text,
            to_listing(self.instructions)
        );
        self
    }

    /// Assert the rendered listing
    pub fn listing(self, expected: &str) -> Self {
        assert_eq!(to_listing(self.instructions), expected);
        self
    }
}
