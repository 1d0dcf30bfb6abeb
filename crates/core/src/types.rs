//! Shared data model for the extraction engine.
//!
//! These types are produced by the resolver and extractor and consumed by
//! every downstream layer (ABI rendering, CLI output). They live here so
//! that the scanner modules can stay free of each other's internals.

use crate::abi::AbiItem;
use serde::Serialize;

// ──────────────────────────────────────────────
// Type descriptors
// ──────────────────────────────────────────────

/// A resolved (or deliberately unresolved) Solidity type.
///
/// Mapping nesting is only ever explicit in source: resolving a mapping's
/// value type never introduces another `Mapping` that the declaration did
/// not spell out itself.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// A builtin elementary type, kept as written (`uint256`, `address`, ...).
    Primitive(String),
    /// A `mapping(...)` type. `keys` is outer-to-inner and never empty.
    Mapping {
        keys: Vec<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// `T[]` or `T[n]`.
    Array {
        element: Box<TypeDescriptor>,
        length: Option<u64>,
    },
    /// A struct expanded into its ordered fields.
    Tuple(Vec<Component>),
    /// A custom type name the resolver could not (or refused to) expand.
    Unresolved(String),
}

/// One named field of a [`TypeDescriptor::Tuple`].
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl TypeDescriptor {
    /// First `Unresolved` name reachable from this descriptor, if any.
    /// Cyclic struct fields degrade to `Unresolved` during resolution, so
    /// this is how the extractor surfaces them as diagnostics.
    pub fn first_unresolved(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Primitive(_) => None,
            TypeDescriptor::Unresolved(name) => Some(name),
            TypeDescriptor::Array { element, .. } => element.first_unresolved(),
            TypeDescriptor::Tuple(components) => {
                components.iter().find_map(|c| c.ty.first_unresolved())
            }
            TypeDescriptor::Mapping { keys, value } => keys
                .iter()
                .find_map(|k| k.first_unresolved())
                .or_else(|| value.first_unresolved()),
        }
    }
}

// ──────────────────────────────────────────────
// Declarations
// ──────────────────────────────────────────────

/// State mutability of a queryable declaration. Only read-only functions
/// are ever extracted, so the full Solidity set is not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    View,
    Pure,
}

impl Mutability {
    pub fn as_str(self) -> &'static str {
        match self {
            Mutability::View => "view",
            Mutability::Pure => "pure",
        }
    }
}

/// One typed input or output of a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name; empty for unnamed return values.
    pub name: String,
    pub ty: TypeDescriptor,
    /// The type as written in source, kept for display. Unlike `ty`, custom
    /// type names are not expanded here.
    pub source_type: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor, source_type: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty,
            source_type: source_type.into(),
        }
    }
}

/// One externally-queryable item: a public state variable getter or a
/// `view`/`pure` function.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub mutability: Mutability,
}

// ──────────────────────────────────────────────
// Diagnostics
// ──────────────────────────────────────────────

/// Emitted when a declaration references a type absent from the type table.
/// The declaration is dropped from the output; the diagnostic is kept.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Diagnostic {
    /// Name of the declaration that referenced the missing type.
    pub subject: String,
    /// The type name that could not be resolved.
    pub missing_type: String,
    pub message: String,
}

impl Diagnostic {
    pub fn unresolved(subject: &str, missing_type: &str) -> Self {
        Diagnostic {
            subject: subject.to_owned(),
            missing_type: missing_type.to_owned(),
            message: format!(
                "declaration '{}' references unresolved type '{}'",
                subject, missing_type
            ),
        }
    }
}

// ──────────────────────────────────────────────
// Parse result
// ──────────────────────────────────────────────

/// The extractor's complete output for one source text.
///
/// `declarations[i]` and `abi_items[i]` always describe the same logical
/// item. Both lists are insertion-ordered (state variables first, then
/// functions) and deduplicated by name, first occurrence winning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    pub declarations: Vec<Declaration>,
    pub abi_items: Vec<AbiItem>,
    pub diagnostics: Vec<Diagnostic>,
}
