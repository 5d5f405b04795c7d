//! Name-keyed type registry and extension resolution

use std::collections::HashMap;

use crate::xaml::extensions::TypeName;
use crate::xaml::typing::{TypeDescriptor, XamlMember, XamlType};

/// Resolution hooks needed to lower extension expressions.
pub trait ExtensionResolver {
    type Type: TypeDescriptor;

    /// Finds the type an extension expression names, e.g. `{Binding}` or
    /// `{x:Static}`.
    fn resolve_extension(&self, name: &TypeName) -> Option<Self::Type>;

    /// The directive member that carries an extension's positional arguments.
    fn positional_arguments(&self) -> <Self::Type as TypeDescriptor>::Member;
}

/// Registry mapping `Name` or `prefix:Name` to a [`XamlType`].
#[derive(Debug, Clone, Default)]
pub struct TypeDirectory {
    types: HashMap<String, XamlType>,
}

impl TypeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type under its own name.
    pub fn register(&mut self, ty: XamlType) {
        self.types.insert(ty.name().to_string(), ty);
    }

    /// Registers a type under `prefix:Name`.
    pub fn register_prefixed(&mut self, prefix: &str, ty: XamlType) {
        self.types.insert(format!("{}:{}", prefix, ty.name()), ty);
    }

    pub fn with_type(mut self, ty: XamlType) -> Self {
        self.register(ty);
        self
    }

    pub fn get(&self, qualified_name: &str) -> Option<&XamlType> {
        self.types.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ExtensionResolver for TypeDirectory {
    type Type = XamlType;

    fn resolve_extension(&self, name: &TypeName) -> Option<XamlType> {
        let qualified = name.to_string();
        self.get(&format!("{}Extension", qualified))
            .or_else(|| self.get(&qualified))
            .cloned()
    }

    fn positional_arguments(&self) -> XamlMember {
        XamlMember::directive("PositionalParameters")
    }
}
