//! Canonical ABI rendering -- turn a [`Declaration`] into the JSON-ABI
//! item an encoding layer consumes, and render the signature string a
//! selector database is keyed by.
//!
//! Unlike the declaration, which keeps original type names for display,
//! everything here is fully expanded: structs are tuples with components,
//! enums are uint8.

use crate::types::{Declaration, Mutability, TypeDescriptor};
use serde::Serialize;

/// One entry of a standard Solidity JSON ABI.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AbiItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub inputs: Vec<AbiParam>,
    pub outputs: Vec<AbiParam>,
    #[serde(rename = "stateMutability")]
    pub state_mutability: String,
}

/// A typed slot in an [`AbiItem`]. `components` is only present for tuple
/// (and tuple-array) types, matching the JSON-ABI convention.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AbiParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

/// Render a declaration as its canonical ABI item.
pub fn abi_item(decl: &Declaration) -> AbiItem {
    AbiItem {
        kind: "function".to_owned(),
        name: decl.name.clone(),
        inputs: decl
            .inputs
            .iter()
            .map(|p| abi_param(&p.name, &p.ty))
            .collect(),
        outputs: decl
            .outputs
            .iter()
            .map(|p| abi_param(&p.name, &p.ty))
            .collect(),
        state_mutability: match decl.mutability {
            Mutability::View => "view".to_owned(),
            Mutability::Pure => "pure".to_owned(),
        },
    }
}

fn abi_param(name: &str, ty: &TypeDescriptor) -> AbiParam {
    let (type_name, components) = abi_type(ty);
    AbiParam {
        name: name.to_owned(),
        ty: type_name,
        components,
    }
}

/// The JSON-ABI type string plus tuple components for a descriptor.
fn abi_type(ty: &TypeDescriptor) -> (String, Vec<AbiParam>) {
    match ty {
        TypeDescriptor::Primitive(name) => (name.clone(), Vec::new()),
        TypeDescriptor::Tuple(fields) => (
            "tuple".to_owned(),
            fields.iter().map(|c| abi_param(&c.name, &c.ty)).collect(),
        ),
        TypeDescriptor::Array { element, length } => {
            let (inner, components) = abi_type(element);
            let suffix = match length {
                Some(n) => format!("[{}]", n),
                None => "[]".to_owned(),
            };
            (format!("{}{}", inner, suffix), components)
        }
        // a mapping never survives into a finished declaration (getter
        // expansion replaces it with keys + value); render the value so a
        // leak stays readable rather than panicking
        TypeDescriptor::Mapping { value, .. } => abi_type(value),
        TypeDescriptor::Unresolved(name) => (name.clone(), Vec::new()),
    }
}

/// Canonical `name(type,type,...)` signature for a declaration -- the form
/// a 4-byte selector database is keyed by. Tuples render as parenthesized
/// component lists.
pub fn signature(decl: &Declaration) -> String {
    let args: Vec<String> = decl
        .inputs
        .iter()
        .map(|p| canonical_type(&p.ty))
        .collect();
    format!("{}({})", decl.name, args.join(","))
}

fn canonical_type(ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::Primitive(name) => name.clone(),
        TypeDescriptor::Tuple(fields) => {
            let inner: Vec<String> = fields.iter().map(|c| canonical_type(&c.ty)).collect();
            format!("({})", inner.join(","))
        }
        TypeDescriptor::Array { element, length } => match length {
            Some(n) => format!("{}[{}]", canonical_type(element), n),
            None => format!("{}[]", canonical_type(element)),
        },
        TypeDescriptor::Mapping { value, .. } => canonical_type(value),
        TypeDescriptor::Unresolved(name) => name.clone(),
    }
}
