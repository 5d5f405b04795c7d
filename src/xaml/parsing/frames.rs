//! Continuation frames of the instruction parser
//!
//! Each frame is one pending piece of a grammar rule. Rules that would recurse
//! push their own continuation first, then the frame of the nested rule, so
//! the nested rule runs to completion before the caller resumes.

use crate::xaml::typing::TypeDescriptor;

#[derive(Debug, Clone)]
pub(crate) enum Frame<T: TypeDescriptor> {
    /// Leading prefix definitions, then the root element sequence
    Document(DocumentStage),
    /// Sibling elements, optionally bracketed by a hosting member
    Elements {
        host: Option<T::Member>,
        stage: ElementsStage,
    },
    /// `<Type> ... </Type>`
    Element { ty: T, stage: ElementStage },
    /// `<Type/>`
    EmptyElement { ty: T, stage: EmptyElementStage },
    /// Attribute members of the element just opened
    Attributes,
    /// Implicit content, if the current token is content
    ContentProperty { parent: T },
    /// Explicit `<Type.Member>` property elements
    NestedProperties {
        parent: T,
        stage: NestedStage<T::Member>,
    },
    /// Scalar property element body
    PropertyElement {
        member: T::Member,
        stage: BracketStage,
    },
    /// `StartMember, GetObject, Items, ..., EndMember, EndObject, EndMember`
    Collection {
        member: T::Member,
        stage: BracketStage,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DocumentStage {
    Prime,
    Prefixes,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementsStage {
    Open,
    Next,
    AfterChild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementStage {
    Open,
    Content,
    Nested,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmptyElementStage {
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NestedStage<M> {
    Next,
    /// A non-empty property element finished; its end tag is due
    AfterProperty(M),
    AfterEmptyProperty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BracketStage {
    Open,
    Close,
}
