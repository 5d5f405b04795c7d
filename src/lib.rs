//! # omnixaml
//!
//! Instruction-level parser for XAML-shaped markup.
//!
//! A host tokenizes markup into shallow tokens (element starts, attributes,
//! property elements, text, end tags), resolving type and member names on the
//! way. This crate walks that token stream once and produces the flat,
//! strictly ordered construction instructions (start-object, start-member,
//! value, ...) a builder needs to instantiate the object graph.
//!
//! File Layout
//!
//! src/xaml
//!   ├── tokens        The shallow token vocabulary and the single-token cursor
//!   ├── instructions  The canonical instruction vocabulary
//!   ├── parsing       The lazy, frame-stack instruction parser
//!   ├── extensions    `{...}` extension grammar and its lowering to instructions
//!   ├── typing        Descriptor traits plus a reference type directory
//!   ├── validation    Stack checker for instruction stream invariants
//!   ├── building      Construction tree assembly from instructions
//!   ├── formats       Listing and JSON renderings
//!   ├── config        Parser options layered over embedded defaults
//!   ├── error         Parse and grammar errors
//!   └── testing       Fixture types, token factories and assertions
//!
//! For the fixture model used by the tests, see the [testing module](xaml::testing).

pub mod xaml;
