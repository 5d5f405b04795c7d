//! Parser configuration loading.
//!
//! `defaults/parser.default.toml` is embedded into the crate so that the
//! documented defaults and [`ParserOptions::default`] stay in sync. Hosts
//! layer their own files on top via [`Loader`] before deserializing into
//! [`ParserOptions`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/parser.default.toml");

/// Top-level options consumed by [`InstructionParser`](crate::xaml::parsing::InstructionParser).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParserOptions {
    pub limits: LimitsConfig,
    pub document: DocumentConfig,
}

/// Resource limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LimitsConfig {
    /// Deepest nesting accepted before failing with
    /// [`ParseError::DepthLimitExceeded`](crate::xaml::ParseError::DepthLimitExceeded).
    /// Applies to elements and, separately, to the extensions nested inside
    /// one attribute.
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentConfig {
    /// Fail on tokens left after the root element sequence instead of
    /// stopping silently.
    pub reject_trailing_tokens: bool,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig { max_depth: 256 }
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            limits: LimitsConfig::default(),
            document: DocumentConfig {
                reject_trailing_tokens: false,
            },
        }
    }
}

/// Builds [`ParserOptions`] from the embedded defaults plus whatever the
/// host stacks on top. Layers apply in the order they are added, so a later
/// file or override wins over an earlier one.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Adds a TOML file of parser settings. [`build`](Self::build) fails
    /// if the file does not exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Like [`with_file`](Self::with_file), but an absent file adds nothing.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Pins one setting by its dotted path, such as `limits.max_depth` or
    /// `document.reject_trailing_tokens`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merges every layer. Unknown keys are ignored; a missing or mistyped
    /// setting is an error.
    pub fn build(self) -> Result<ParserOptions, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults with no host layers.
pub fn load_defaults() -> Result<ParserOptions, ConfigError> {
    Loader::new().build()
}
