//! Parameter and return clause parsing.
//!
//! A clause is one comma-separated entry of a parameter list, a `returns`
//! list, or a struct body field: a type expression, optional storage
//! location, optional name. Parsing never fails -- input that matches no
//! recognized shape degenerates to "the whole string is the type" and the
//! caller decides whether that is acceptable.

use crate::mapping;

/// A parsed clause: type expression plus optional name.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub ty: String,
    /// Empty when the clause declares no name (common for return values).
    pub name: String,
}

const STORAGE_LOCATIONS: [&str; 3] = ["memory", "storage", "calldata"];

/// Split on commas that sit outside any parentheses. Used for parameter
/// lists and tuple-component lists alike. Empty segments are dropped, so
/// `""` yields no clauses.
pub fn split_top_level(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                let piece = s[start..i].trim();
                if !piece.is_empty() {
                    parts.push(piece.to_owned());
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    let piece = s[start..].trim();
    if !piece.is_empty() {
        parts.push(piece.to_owned());
    }
    parts
}

/// Parse one clause into `{type, name}`.
///
/// Storage-location keywords are stripped wherever they appear (Solidity
/// allows `Type memory name`). A leading mapping type is taken whole and
/// the following identifier, if any, becomes the name. Everything else is
/// matched as `identifier-with-dots-and-brackets [identifier]?`.
pub fn parse_clause(s: &str) -> Clause {
    let cleaned = strip_storage_locations(s);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Clause {
            ty: String::new(),
            name: String::new(),
        };
    }

    if mapping::is_mapping(cleaned) {
        if let Some(ex) = mapping::extract_type(cleaned) {
            let name = leading_identifier(&ex.remainder).unwrap_or_default();
            return Clause { ty: ex.ty, name };
        }
    }

    if let Some(end) = type_expression_end(cleaned) {
        let ty = &cleaned[..end];
        let rest = cleaned[end..].trim();
        if rest.is_empty() {
            return Clause {
                ty: ty.to_owned(),
                name: String::new(),
            };
        }
        if is_identifier(rest) {
            return Clause {
                ty: ty.to_owned(),
                name: rest.to_owned(),
            };
        }
        // `address payable` is a two-word elementary type
        if ty == "address" {
            if let Some(tail) = rest.strip_prefix("payable") {
                let tail = tail.trim();
                if tail.is_empty() {
                    return Clause {
                        ty: "address payable".to_owned(),
                        name: String::new(),
                    };
                }
                if is_identifier(tail) {
                    return Clause {
                        ty: "address payable".to_owned(),
                        name: tail.to_owned(),
                    };
                }
            }
        }
    }

    // no recognized shape -- whole string is the type
    Clause {
        ty: cleaned.to_owned(),
        name: String::new(),
    }
}

/// True if the (storage-location-stripped) type names something outside the
/// primitive set: a dotted qualified name, or an uppercase-initial name
/// that is not a recognized primitive prefix.
pub fn is_custom_type(ty: &str) -> bool {
    let t = strip_storage_locations(ty);
    let t = t.trim();
    if t.contains('.') {
        return true;
    }
    let Some(first) = t.chars().next() else {
        return false;
    };
    if !first.is_ascii_uppercase() {
        return false;
    }
    const PRIMITIVE_PREFIXES: [&str; 7] =
        ["uint", "int", "bytes", "address", "bool", "string", "mapping"];
    !PRIMITIVE_PREFIXES.iter().any(|p| t.starts_with(p))
}

/// Drop storage-location keywords appearing as whole words at paren depth
/// zero. Tokens inside a mapping's parentheses are never touched.
fn strip_storage_locations(s: &str) -> String {
    let mut depth = 0usize;
    let mut kept: Vec<&str> = Vec::new();
    for tok in s.split_whitespace() {
        if !(depth == 0 && STORAGE_LOCATIONS.contains(&tok)) {
            kept.push(tok);
        }
        for b in tok.bytes() {
            match b {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }
    kept.join(" ")
}

/// End offset of a leading type expression: an identifier with dots, then
/// any number of `[...]` suffixes. `None` if the string starts with
/// anything else.
fn type_expression_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let first = *bytes.first()?;
    if !is_ident_start(first) {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() && (is_ident_byte(bytes[i]) || bytes[i] == b'.') {
        i += 1;
    }
    while i < bytes.len() && bytes[i] == b'[' {
        let close = s[i..].find(']')?;
        i += close + 1;
    }
    Some(i)
}

fn leading_identifier(s: &str) -> Option<String> {
    let word = s.split_whitespace().next()?;
    if is_identifier(word) {
        Some(word.to_owned())
    } else {
        None
    }
}

fn is_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(&b) if is_ident_start(b) => {}
        _ => return false,
    }
    bytes.iter().all(|&b| is_ident_byte(b))
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_nesting() {
        assert_eq!(
            split_top_level("uint a, mapping(uint => bool) m, bytes32 h"),
            vec!["uint a", "mapping(uint => bool) m", "bytes32 h"]
        );
    }

    #[test]
    fn split_empty_is_empty() {
        assert!(split_top_level("").is_empty());
        assert!(split_top_level("  ").is_empty());
    }

    #[test]
    fn clause_array_with_memory() {
        assert_eq!(
            parse_clause("uint256[] memory values"),
            Clause {
                ty: "uint256[]".to_owned(),
                name: "values".to_owned()
            }
        );
    }

    #[test]
    fn clause_qualified_struct() {
        assert_eq!(
            parse_clause("IProverRegistry.ProverInstance memory data"),
            Clause {
                ty: "IProverRegistry.ProverInstance".to_owned(),
                name: "data".to_owned()
            }
        );
    }

    #[test]
    fn clause_storage_location_mid_clause() {
        // Solidity allows the location between type and name
        assert_eq!(
            parse_clause("bytes calldata payload"),
            Clause {
                ty: "bytes".to_owned(),
                name: "payload".to_owned()
            }
        );
    }

    #[test]
    fn clause_type_only() {
        assert_eq!(
            parse_clause("uint256"),
            Clause {
                ty: "uint256".to_owned(),
                name: String::new()
            }
        );
    }

    #[test]
    fn clause_fixed_array() {
        assert_eq!(
            parse_clause("bytes32[4] proof"),
            Clause {
                ty: "bytes32[4]".to_owned(),
                name: "proof".to_owned()
            }
        );
    }

    #[test]
    fn clause_mapping_with_name() {
        assert_eq!(
            parse_clause("mapping(address => uint256) balances"),
            Clause {
                ty: "mapping(address => uint256)".to_owned(),
                name: "balances".to_owned()
            }
        );
    }

    #[test]
    fn clause_address_payable() {
        assert_eq!(
            parse_clause("address payable recipient"),
            Clause {
                ty: "address payable".to_owned(),
                name: "recipient".to_owned()
            }
        );
    }

    #[test]
    fn clause_unparseable_degenerates_to_type() {
        let c = parse_clause("!not a type!");
        assert_eq!(c.ty, "!not a type!");
        assert_eq!(c.name, "");
    }

    #[test]
    fn custom_type_detection() {
        assert!(is_custom_type("IRegistry.Instance"));
        assert!(is_custom_type("UserProfile"));
        assert!(is_custom_type("Status memory"));
        assert!(!is_custom_type("uint256"));
        assert!(!is_custom_type("address"));
        assert!(!is_custom_type("mapping(uint => bool)"));
        assert!(!is_custom_type(""));
    }
}
