//! Testing utilities for instruction streams
//!
//! Tests describe their input as token vectors built with the
//! [factories](testing_factories) against [`fixture_directory`], then check
//! the output either as a listing (see
//! [`to_listing`](crate::xaml::formats::to_listing)) or with
//! [`assert_instructions`].
//!
//! ```rust,ignore
//! use omnixaml::xaml::testing::*;
//!
//! let listing = parse_listing(vec![
//!     element("TextBlock"),
//!     property("TextBlock", "Text"),
//!     text("Hello"),
//!     end_tag(),
//!     end_tag(),
//! ])?;
//! ```
//!
//! Keep fixture types small. A test that needs a new shape of metadata
//! should add a type here rather than building its own directory, so the
//! scenarios stay comparable.

pub mod testing_assertions;
pub mod testing_factories;

pub use testing_assertions::{assert_instructions, InstructionsAssertion};
pub use testing_factories::*;
