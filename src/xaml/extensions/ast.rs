//! Extension expression trees
//!
//! The grammar first produces the `*WithSpans` structures, which only hold
//! byte ranges into the extension text. [`ExpressionWithSpans::resolve`]
//! then slices the text to build the owned [`ExtensionExpression`].

use std::fmt;
use std::ops::Range;

/// Possibly prefixed type name of an extension, e.g. `x:Static`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub prefix: Option<String>,
    pub name: String,
}

impl TypeName {
    pub fn new(name: &str) -> Self {
        TypeName {
            prefix: None,
            name: name.to_string(),
        }
    }

    pub fn prefixed(prefix: &str, name: &str) -> Self {
        TypeName {
            prefix: Some(prefix.to_string()),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Argument of an extension: literal text or another extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    Text(String),
    Extension(Box<ExtensionExpression>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionExpression {
    pub type_name: TypeName,
    /// Positional arguments in source order.
    pub positional: Vec<ArgumentValue>,
    /// Named arguments in source order.
    pub named: Vec<(String, ArgumentValue)>,
}

impl ExtensionExpression {
    pub fn new(type_name: TypeName) -> Self {
        ExtensionExpression {
            type_name,
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    pub fn with_positional(mut self, value: ArgumentValue) -> Self {
        self.positional.push(value);
        self
    }

    pub fn with_named(mut self, name: &str, value: ArgumentValue) -> Self {
        self.named.push((name.to_string(), value));
        self
    }
}

// ============================================================================
// Span-only intermediate tree
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TypeNameWithSpans {
    pub prefix: Option<Range<usize>>,
    pub name: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ValueWithSpans {
    /// Unquoted text, spanning from its first to its last token
    Bare(Range<usize>),
    /// Quoted text, span includes the quotes
    Quoted(Range<usize>),
    Extension(Box<ExpressionWithSpans>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OptionWithSpans {
    Positional(ValueWithSpans),
    Named {
        name: Range<usize>,
        value: ValueWithSpans,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExpressionWithSpans {
    pub type_name: TypeNameWithSpans,
    pub options: Vec<OptionWithSpans>,
}

impl ExpressionWithSpans {
    /// Converts to an owned expression, slicing names and values from `source`.
    pub fn resolve(&self, source: &str) -> ExtensionExpression {
        let type_name = TypeName {
            prefix: self
                .type_name
                .prefix
                .as_ref()
                .map(|span| source[span.clone()].to_string()),
            name: source[self.type_name.name.clone()].to_string(),
        };

        let mut expression = ExtensionExpression::new(type_name);
        for option in &self.options {
            match option {
                OptionWithSpans::Positional(value) => {
                    expression.positional.push(value.resolve(source));
                }
                OptionWithSpans::Named { name, value } => {
                    expression
                        .named
                        .push((source[name.clone()].to_string(), value.resolve(source)));
                }
            }
        }
        expression
    }
}

impl ValueWithSpans {
    fn resolve(&self, source: &str) -> ArgumentValue {
        match self {
            ValueWithSpans::Bare(span) => ArgumentValue::Text(source[span.clone()].to_string()),
            ValueWithSpans::Quoted(span) => {
                ArgumentValue::Text(source[span.start + 1..span.end - 1].to_string())
            }
            ValueWithSpans::Extension(inner) => {
                ArgumentValue::Extension(Box::new(inner.resolve(source)))
            }
        }
    }
}
