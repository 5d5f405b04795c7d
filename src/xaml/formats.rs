//! Output formats for instruction streams and construction trees
//!
//! - listing: one instruction per line, indented by open frame
//! - json: a [`ConstructionDocument`] via serde

use serde::Serialize;

use crate::xaml::building::{ConstructionDocument, ConstructionNode, MemberValue};
use crate::xaml::instructions::Instruction;
use crate::xaml::typing::{MemberDescriptor, TypeDescriptor};

const INDENT: &str = "  ";

/// Render instructions one per line, two spaces per open frame.
pub fn to_listing<T: TypeDescriptor>(instructions: &[Instruction<T>]) -> String {
    let mut result = String::new();
    let mut depth = 0usize;
    for instruction in instructions {
        if instruction.closes_frame() {
            depth = depth.saturating_sub(1);
        }
        result.push_str(&INDENT.repeat(depth));
        result.push_str(&instruction.to_string());
        result.push('\n');
        if instruction.opens_frame() {
            depth += 1;
        }
    }
    result
}

#[derive(Debug, Serialize)]
struct DocumentRecord<'a> {
    prefixes: Vec<PrefixRecord<'a>>,
    roots: Vec<NodeRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct PrefixRecord<'a> {
    prefix: &'a str,
    namespace: &'a str,
}

#[derive(Debug, Serialize)]
struct NodeRecord<'a> {
    #[serde(rename = "type")]
    type_name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    arguments: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    members: Vec<AssignmentRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct AssignmentRecord<'a> {
    member: &'a str,
    values: Vec<ValueRecord<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum ValueRecord<'a> {
    Text(&'a str),
    Object(NodeRecord<'a>),
    Items(Vec<ValueRecord<'a>>),
}

fn node_record<T: TypeDescriptor>(node: &ConstructionNode<T>) -> NodeRecord<'_> {
    NodeRecord {
        type_name: node.instance_type.name(),
        arguments: node
            .injectable_arguments
            .iter()
            .map(String::as_str)
            .collect(),
        members: node
            .assignments
            .iter()
            .map(|assignment| AssignmentRecord {
                member: assignment.member.name(),
                values: assignment.values.iter().map(value_record).collect(),
            })
            .collect(),
    }
}

fn value_record<T: TypeDescriptor>(value: &MemberValue<T>) -> ValueRecord<'_> {
    match value {
        MemberValue::Text(text) => ValueRecord::Text(text),
        MemberValue::Object(node) => ValueRecord::Object(node_record(node)),
        MemberValue::Collection(items) => {
            ValueRecord::Items(items.iter().map(value_record).collect())
        }
    }
}

fn document_record<T: TypeDescriptor>(document: &ConstructionDocument<T>) -> DocumentRecord<'_> {
    DocumentRecord {
        prefixes: document
            .prefixes
            .iter()
            .map(|mapping| PrefixRecord {
                prefix: &mapping.prefix,
                namespace: &mapping.namespace,
            })
            .collect(),
        roots: document.roots.iter().map(node_record).collect(),
    }
}

pub fn to_json_value<T: TypeDescriptor>(
    document: &ConstructionDocument<T>,
) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(document_record(document))
}

/// Pretty-printed JSON rendering of a construction tree.
pub fn to_json<T: TypeDescriptor>(document: &ConstructionDocument<T>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&document_record(document))
}
