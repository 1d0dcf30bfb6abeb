//! Declaration extraction -- the single entry point that turns raw source
//! text into typed declarations plus diagnostics.
//!
//! One forward pass per declaration kind over the comment-stripped text,
//! with bounded lookahead per candidate. Malformed individual declarations
//! are skipped (not every statement is a declaration); declarations that
//! parse but reference a type missing from the table are dropped with a
//! diagnostic. The function is total: any input yields a well-formed
//! [`ParseResult`].

use crate::abi;
use crate::clause::{self, parse_clause, split_top_level};
use crate::mapping;
use crate::resolve::TypeTable;
use crate::scan;
use crate::strip::strip_comments;
use crate::types::{Declaration, Diagnostic, Mutability, Param, ParseResult, TypeDescriptor};
use std::collections::HashSet;

/// Extract every public state-variable getter and every `view`/`pure`
/// function from `source`.
///
/// State variables come first in the result, then functions, each group in
/// first-seen source order; names are deduplicated globally with the first
/// occurrence winning.
pub fn extract(source: &str) -> ParseResult {
    let stripped = strip_comments(source);
    let table = TypeTable::build(&stripped);

    let mut declarations: Vec<Declaration> = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for candidate in scan_state_variables(&stripped) {
        if seen.contains(&candidate.name) {
            continue;
        }
        match build_getter(&candidate, &table) {
            Ok(decl) => {
                seen.insert(decl.name.clone());
                declarations.push(decl);
            }
            Err(diag) => diagnostics.push(diag),
        }
    }

    for candidate in scan_functions(&stripped) {
        if seen.contains(&candidate.name) {
            continue;
        }
        match build_function(&candidate, &table) {
            Ok(decl) => {
                seen.insert(decl.name.clone());
                declarations.push(decl);
            }
            Err(diag) => diagnostics.push(diag),
        }
    }

    let abi_items = declarations.iter().map(abi::abi_item).collect();
    ParseResult {
        declarations,
        abi_items,
        diagnostics,
    }
}

// ──────────────────────────────────────────────
// State variables
// ──────────────────────────────────────────────

#[derive(Debug)]
struct VarCandidate {
    name: String,
    ty: String,
}

/// Scan for public state-variable declarations outside function bodies.
///
/// Block scope is approximated with a running brace depth plus a "have we
/// seen a `function` keyword since the last statement boundary" flag; when
/// that flag is set, the next `{` opens a function body and everything up
/// to its matching `}` is excluded. Inline assembly and other nested
/// braces inside the body are covered by the depth count, nothing more --
/// this is a known approximation, not a block model.
fn scan_state_variables(stripped: &str) -> Vec<VarCandidate> {
    let bytes = stripped.as_bytes();
    let mut out = Vec::new();
    let mut depth: i32 = 0;
    let mut pending_function = false;
    let mut body_depth: Option<i32> = None;
    let mut stmt_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                if pending_function && body_depth.is_none() {
                    body_depth = Some(depth);
                    pending_function = false;
                }
                stmt_start = i + 1;
            }
            b'}' => {
                if body_depth == Some(depth) {
                    body_depth = None;
                }
                depth -= 1;
                stmt_start = i + 1;
            }
            b';' => {
                if body_depth.is_none() {
                    if let Some(c) = parse_var_candidate(&stripped[stmt_start..i]) {
                        out.push(c);
                    }
                }
                // a bodiless function declaration ends here
                pending_function = false;
                stmt_start = i + 1;
            }
            b'f' => {
                if is_word_at(stripped, i, "function") {
                    pending_function = true;
                    i += "function".len();
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    out
}

/// Try to read one statement as a public state-variable declaration.
fn parse_var_candidate(segment: &str) -> Option<VarCandidate> {
    let seg = segment.trim();
    if seg.is_empty() {
        return None;
    }
    // cut the initializer; the depth-0 '=' can only be an assignment, a
    // mapping's '=>' always sits inside parentheses
    let head = match scan::find_at_depth(seg, 0, "=", 0) {
        Some(eq) => seg[..eq].trim_end(),
        None => seg,
    };
    if contains_word(head, "function") {
        return None;
    }
    if !contains_word(head, "public") {
        return None;
    }
    if contains_word(head, "private") || contains_word(head, "internal") {
        return None;
    }

    const MODIFIER_WORDS: [&str; 6] = [
        "public",
        "constant",
        "immutable",
        "override",
        "payable",
        "transient",
    ];

    if mapping::is_mapping(head) {
        let ex = mapping::extract_type(head)?;
        let name = ex
            .remainder
            .split_whitespace()
            .filter(|w| !MODIFIER_WORDS.contains(w))
            .next_back()?
            .to_owned();
        return Some(VarCandidate { name, ty: ex.ty });
    }

    let tokens: Vec<&str> = head.split_whitespace().collect();
    let (ty, rest) = match tokens.split_first()? {
        // `address payable public owner`
        (&"address", rest) if rest.first() == Some(&"payable") => {
            ("address payable".to_owned(), &rest[1..])
        }
        (&first, rest) => (first.to_owned(), rest),
    };
    if MODIFIER_WORDS.contains(&ty.as_str()) {
        return None;
    }
    let name = rest
        .iter()
        .filter(|w| !MODIFIER_WORDS.contains(w))
        .next_back()?
        .to_string();
    Some(VarCandidate { name, ty })
}

/// Build the implicit getter declaration for a public state variable:
/// mapping keys become `key1`, `key2`, ... inputs and the final value type
/// (through any nesting) becomes the single `value` output.
fn build_getter(candidate: &VarCandidate, table: &TypeTable) -> Result<Declaration, Diagnostic> {
    let mut inputs = Vec::new();
    let value_raw;

    if mapping::is_mapping(&candidate.ty) {
        let raw_keys = mapping::key_types(&candidate.ty);
        if raw_keys.is_empty() {
            return Err(Diagnostic::unresolved(&candidate.name, &candidate.ty));
        }
        for (i, raw_key) in raw_keys.iter().enumerate() {
            // tolerate named mapping keys: `mapping(address account => ...)`
            let key_ty = parse_clause(raw_key).ty;
            let ty = resolve_or_diagnose(table, &key_ty, &candidate.name)?;
            inputs.push(Param::new(format!("key{}", i + 1), ty, key_ty));
        }
        let final_raw = mapping::final_value_type(&candidate.ty)
            .ok_or_else(|| Diagnostic::unresolved(&candidate.name, &candidate.ty))?;
        // the value side may be named too
        value_raw = parse_clause(&final_raw).ty;
    } else {
        value_raw = candidate.ty.clone();
    }

    let value_ty = resolve_or_diagnose(table, &value_raw, &candidate.name)?;
    Ok(Declaration {
        name: candidate.name.clone(),
        inputs,
        outputs: vec![Param::new("value", value_ty, value_raw)],
        mutability: Mutability::View,
    })
}

// ──────────────────────────────────────────────
// Functions
// ──────────────────────────────────────────────

#[derive(Debug)]
struct FnCandidate {
    name: String,
    params: String,
    returns: Option<String>,
    mutability: Mutability,
}

/// Scan for `function name(params) ... (view|pure) ... [returns (...)]`
/// declarations. Candidates with `private`/`internal` visibility or
/// without a `view`/`pure` keyword are excluded -- state-mutating and
/// `payable` functions are never queryable.
fn scan_functions(stripped: &str) -> Vec<FnCandidate> {
    let mut out = Vec::new();
    let bytes = stripped.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'f' || !is_word_at(stripped, i, "function") {
            i += 1;
            continue;
        }
        let after_kw = i + "function".len();
        i = after_kw;

        let Some((name, name_end)) = take_identifier(stripped, after_kw) else {
            continue;
        };
        let open = match next_non_ws(bytes, name_end) {
            Some(p) if bytes[p] == b'(' => p,
            _ => continue,
        };
        let Some(close) = scan::matching_close(stripped, open, false) else {
            continue;
        };
        let params = stripped[open + 1..close].to_owned();

        let Some(header_end) = header_end(stripped, close + 1) else {
            continue;
        };
        let header = &stripped[close + 1..header_end];
        // resume after the header either way; the body itself is never
        // scanned for nested functions (Solidity has none)
        i = header_end;

        if header_contains_word(header, "private") || header_contains_word(header, "internal") {
            continue;
        }
        let mutability = if header_contains_word(header, "view") {
            Mutability::View
        } else if header_contains_word(header, "pure") {
            Mutability::Pure
        } else {
            continue;
        };

        let returns = parse_returns_clause(header);
        out.push(FnCandidate {
            name,
            params,
            returns,
            mutability,
        });
    }
    out
}

/// End of a function header: the first `{` or `;` at paren depth zero
/// after the parameter list. `None` when the text runs out first.
fn header_end(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'{' | b';' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Pull the `returns (...)` type list out of a function header.
fn parse_returns_clause(header: &str) -> Option<String> {
    let mut from = 0;
    loop {
        let rel = header[from..].find("returns")?;
        let at = from + rel;
        from = at + "returns".len();
        let bytes = header.as_bytes();
        let before_ok = at == 0 || !clause::is_ident_byte(bytes[at - 1]);
        let after = at + "returns".len();
        let after_ok = after >= bytes.len() || !clause::is_ident_byte(bytes[after]);
        if !(before_ok && after_ok) {
            continue;
        }
        let open = next_non_ws(bytes, after)?;
        if bytes[open] != b'(' {
            continue;
        }
        let close = scan::matching_close(header, open, false)?;
        return Some(header[open + 1..close].to_owned());
    }
}

fn build_function(candidate: &FnCandidate, table: &TypeTable) -> Result<Declaration, Diagnostic> {
    let mut inputs = Vec::new();
    for clause_src in split_top_level(&candidate.params) {
        let c = parse_clause(&clause_src);
        let ty = resolve_or_diagnose(table, &c.ty, &candidate.name)?;
        inputs.push(Param::new(c.name, ty, c.ty));
    }

    let outputs = match &candidate.returns {
        Some(returns) => {
            let mut outputs = Vec::new();
            for clause_src in split_top_level(returns) {
                let c = parse_clause(&clause_src);
                let ty = resolve_or_diagnose(table, &c.ty, &candidate.name)?;
                outputs.push(Param::new(c.name, ty, c.ty));
            }
            outputs
        }
        // a getter-shaped function with no declared return type is unusable
        // as-is; assign the documented uint256 default
        None => vec![Param::new(
            "value",
            TypeDescriptor::Primitive("uint256".to_owned()),
            "uint256",
        )],
    };

    Ok(Declaration {
        name: candidate.name.clone(),
        inputs,
        outputs,
        mutability: candidate.mutability,
    })
}

/// Resolve a raw type or produce the diagnostic that drops its declaration.
/// A descriptor that resolved structurally but contains an `Unresolved`
/// leaf (cyclic or unknown struct field) is reported the same way.
fn resolve_or_diagnose(
    table: &TypeTable,
    raw_ty: &str,
    subject: &str,
) -> Result<TypeDescriptor, Diagnostic> {
    let ty = table
        .resolve(raw_ty)
        .ok_or_else(|| Diagnostic::unresolved(subject, raw_ty))?;
    if let Some(missing) = ty.first_unresolved() {
        return Err(Diagnostic::unresolved(subject, missing));
    }
    Ok(ty)
}

// ──────────────────────────────────────────────
// Word helpers
// ──────────────────────────────────────────────

fn is_word_at(text: &str, at: usize, word: &str) -> bool {
    let bytes = text.as_bytes();
    if !text[at..].starts_with(word) {
        return false;
    }
    let before_ok = at == 0 || !clause::is_ident_byte(bytes[at - 1]);
    let after = at + word.len();
    let after_ok = after >= bytes.len() || !clause::is_ident_byte(bytes[after]);
    before_ok && after_ok
}

fn contains_word(text: &str, word: &str) -> bool {
    let mut from = 0;
    while let Some(rel) = text[from..].find(word) {
        let at = from + rel;
        if is_word_at(text, at, word) {
            return true;
        }
        from = at + word.len();
    }
    false
}

/// Like [`contains_word`] but only at paren depth zero, so a modifier
/// argument list cannot smuggle keywords into a function header.
fn header_contains_word(header: &str, word: &str) -> bool {
    let bytes = header.as_bytes();
    let mut from = 0;
    while let Some(rel) = header[from..].find(word) {
        let at = from + rel;
        let depth = bytes[..at].iter().fold(0i64, |acc, &b| match b {
            b'(' => acc + 1,
            b')' => acc - 1,
            _ => acc,
        });
        if depth <= 0 && is_word_at(header, at, word) {
            return true;
        }
        from = at + word.len();
    }
    false
}

fn take_identifier(text: &str, from: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let start = next_non_ws(bytes, from)?;
    if !clause::is_ident_start(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && clause::is_ident_byte(bytes[end]) {
        end += 1;
    }
    Some((text[start..end].to_owned(), end))
}

fn next_non_ws(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| !bytes[i].is_ascii_whitespace())
}
