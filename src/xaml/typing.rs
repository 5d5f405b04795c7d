//! Type and member descriptors
//!
//! The parser never reflects over real types. It asks the resolution layer
//! three questions through these traits: does the type need constructor
//! arguments, which member receives implicit content, and is a member a
//! collection. Hosts implement the traits over their own metadata;
//! [`XamlType`] and [`XamlMember`] are a self-contained implementation used by
//! the tests and by hosts that describe their types up front.

pub mod directory;

use std::fmt;
use std::sync::Arc;

pub use directory::{ExtensionResolver, TypeDirectory};

/// A gettable/settable property or attached member.
pub trait MemberDescriptor: Clone + fmt::Debug + PartialEq {
    fn name(&self) -> &str;

    /// Whether the member's value type is an ordered, append-only container.
    fn is_collection(&self) -> bool;

    /// Whether the member holds an argument list, where any number of
    /// values and objects may follow each other.
    fn is_argument_list(&self) -> bool {
        false
    }
}

/// A constructible type.
pub trait TypeDescriptor: Clone + fmt::Debug + PartialEq {
    type Member: MemberDescriptor;

    fn name(&self) -> &str;

    /// Whether instances are built from constructor arguments rather than
    /// by assigning properties after default construction.
    fn needs_initialization(&self) -> bool;

    /// The member populated by child content that is not wrapped in a
    /// property element.
    fn content_member(&self) -> Option<Self::Member>;

    fn member(&self, name: &str) -> Option<Self::Member>;
}

/// How a [`XamlMember`] is attached to its declaring type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Regular,
    Attached,
    /// Parser-level members with no backing property, such as the
    /// positional arguments of an extension.
    Directive,
}

/// Member metadata for [`XamlType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XamlMember {
    name: Arc<str>,
    declaring_type: Arc<str>,
    kind: MemberKind,
    is_collection: bool,
}

impl XamlMember {
    pub fn new(declaring_type: &str, name: &str, is_collection: bool) -> Self {
        XamlMember {
            name: name.into(),
            declaring_type: declaring_type.into(),
            kind: MemberKind::Regular,
            is_collection,
        }
    }

    pub fn attached(owner_type: &str, name: &str, is_collection: bool) -> Self {
        XamlMember {
            kind: MemberKind::Attached,
            ..XamlMember::new(owner_type, name, is_collection)
        }
    }

    pub fn directive(name: &str) -> Self {
        XamlMember {
            kind: MemberKind::Directive,
            ..XamlMember::new("", name, false)
        }
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }
}

impl MemberDescriptor for XamlMember {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_collection(&self) -> bool {
        self.is_collection
    }

    fn is_argument_list(&self) -> bool {
        self.kind == MemberKind::Directive
    }
}

impl fmt::Display for XamlMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Regular => write!(f, "{}", self.name),
            MemberKind::Attached => write!(f, "{}.{}", self.declaring_type, self.name),
            MemberKind::Directive => write!(f, "x:{}", self.name),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct TypeInfo {
    name: String,
    needs_initialization: bool,
    content_member: Option<String>,
    members: Vec<XamlMember>,
}

/// Type metadata handle. Clones share the same metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XamlType {
    info: Arc<TypeInfo>,
}

impl XamlType {
    pub fn builder(name: &str) -> XamlTypeBuilder {
        XamlTypeBuilder {
            info: TypeInfo {
                name: name.to_string(),
                needs_initialization: false,
                content_member: None,
                members: Vec::new(),
            },
        }
    }

    pub fn members(&self) -> &[XamlMember] {
        &self.info.members
    }
}

impl TypeDescriptor for XamlType {
    type Member = XamlMember;

    fn name(&self) -> &str {
        &self.info.name
    }

    fn needs_initialization(&self) -> bool {
        self.info.needs_initialization
    }

    fn content_member(&self) -> Option<XamlMember> {
        let name = self.info.content_member.as_deref()?;
        self.member(name)
    }

    fn member(&self, name: &str) -> Option<XamlMember> {
        self.info.members.iter().find(|m| m.name() == name).cloned()
    }
}

impl fmt::Display for XamlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info.name)
    }
}

/// Fluent construction of [`XamlType`] metadata.
///
/// ```ignore
/// let panel = XamlType::builder("StackPanel")
///     .collection_member("Children")
///     .content_member("Children")
///     .build();
/// ```
#[derive(Debug)]
pub struct XamlTypeBuilder {
    info: TypeInfo,
}

impl XamlTypeBuilder {
    pub fn member(mut self, name: &str) -> Self {
        let member = XamlMember::new(&self.info.name, name, false);
        self.info.members.push(member);
        self
    }

    pub fn collection_member(mut self, name: &str) -> Self {
        let member = XamlMember::new(&self.info.name, name, true);
        self.info.members.push(member);
        self
    }

    /// Names the member that receives implicit content. The member must
    /// also be declared, otherwise the type reports no content member.
    pub fn content_member(mut self, name: &str) -> Self {
        self.info.content_member = Some(name.to_string());
        self
    }

    pub fn needs_initialization(mut self) -> Self {
        self.info.needs_initialization = true;
        self
    }

    pub fn build(self) -> XamlType {
        XamlType {
            info: Arc::new(self.info),
        }
    }
}
