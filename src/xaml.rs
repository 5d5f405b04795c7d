//! Main module for the markup instruction pipeline

pub mod building;
pub mod config;
pub mod error;
pub mod extensions;
pub mod formats;
pub mod instructions;
pub mod parsing;
pub mod testing;
pub mod tokens;
pub mod typing;
pub mod validation;

pub use error::{GrammarError, ParseError};
pub use instructions::{Instruction, InstructionKind};
pub use parsing::{parse, parse_to_vec, InstructionParser};
pub use tokens::{Token, TokenKind};
pub use typing::{MemberDescriptor, TypeDescriptor};
