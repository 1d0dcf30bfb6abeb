//! Mapping-type decomposition.
//!
//! Works on raw type strings: key and value results come back as source
//! text, not descriptors, because turning a custom key or value name into
//! a descriptor needs the type table and the decomposer deliberately does
//! not hold one. The extractor resolves what comes out of here.

use crate::scan;

/// A leading mapping type split from whatever trailed it in the source
/// (visibility keywords, the variable name, an initializer).
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub ty: String,
    pub remainder: String,
}

const MAPPING_OPEN: &str = "mapping(";

/// True iff the trimmed string starts a mapping type.
pub fn is_mapping(ty: &str) -> bool {
    ty.trim_start().starts_with(MAPPING_OPEN)
}

/// Split a leading `mapping(...)` type (balanced on its own parentheses)
/// from trailing text. `None` when the input does not start with a mapping
/// or its parentheses never balance.
pub fn extract_type(s: &str) -> Option<Extracted> {
    let t = s.trim();
    if !t.starts_with(MAPPING_OPEN) {
        return None;
    }
    let open = MAPPING_OPEN.len() - 1;
    let close = scan::matching_close(t, open, false)?;
    Some(Extracted {
        ty: t[..=close].to_owned(),
        remainder: t[close + 1..].trim().to_owned(),
    })
}

/// Ordered key types of a mapping, outer-to-inner, as raw type strings.
/// `mapping(K1 => mapping(K2 => V))` yields `[K1, K2]`. Empty when the
/// input is not a well-formed mapping.
pub fn key_types(mapping_ty: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let Some((key, rhs)) = split_once(mapping_ty) else {
        return keys;
    };
    keys.push(key);
    if is_mapping(&rhs) {
        keys.extend(key_types(&rhs));
    }
    keys
}

/// The right-hand side of the outer `=>`, unexpanded -- it may itself be a
/// nested mapping type. Callers wanting the final scalar value use
/// [`final_value_type`].
pub fn value_type(mapping_ty: &str) -> Option<String> {
    split_once(mapping_ty).map(|(_, rhs)| rhs)
}

/// The final value type reached by recursing through nested mappings.
pub fn final_value_type(mapping_ty: &str) -> Option<String> {
    let mut value = value_type(mapping_ty)?;
    while is_mapping(&value) {
        value = value_type(&value)?;
    }
    Some(value)
}

/// Split one mapping level into (key, value) raw strings.
fn split_once(mapping_ty: &str) -> Option<(String, String)> {
    let t = mapping_ty.trim();
    if !t.starts_with(MAPPING_OPEN) {
        return None;
    }
    let open = MAPPING_OPEN.len() - 1;
    let close = scan::matching_close(t, open, false)?;
    let inner = &t[open + 1..close];
    // the separator of this level sits at depth 0 within the parentheses
    let sep = scan::find_at_depth(inner, 0, "=>", 0)?;
    let key = inner[..sep].trim();
    let value = inner[sep + 2..].trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.to_owned(), value.to_owned()))
}
