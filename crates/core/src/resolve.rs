//! Custom type resolution -- collect struct/enum/alias declarations from a
//! whole (comment-stripped) source text, then resolve arbitrary type
//! references against them.
//!
//! Two phases, same shape as a multi-pass elaborator: collection builds the
//! name tables in one scan, resolution walks references depth-first with an
//! in-progress set so self- and mutually-referential structs degrade to
//! [`TypeDescriptor::Unresolved`] instead of recursing forever. Struct
//! self-reference by value is invalid Solidity anyway; it must not hang the
//! resolver.

use crate::clause::{self, parse_clause};
use crate::mapping;
use crate::scan;
use crate::types::{Component, TypeDescriptor};
use std::collections::{HashMap, HashSet};

/// Name tables for one source text. Built once per parse, read-only after,
/// never shared across calls.
#[derive(Debug, Default)]
pub struct TypeTable {
    /// struct name -> ordered (field name, raw field type) pairs
    structs: HashMap<String, Vec<(String, String)>>,
    /// enum names; member values are not modeled since every enum collapses
    /// to uint8 in the ABI
    enums: HashSet<String>,
    /// user-defined value type name -> underlying type text
    aliases: HashMap<String, String>,
}

impl TypeTable {
    /// Collect every `struct`, `enum` and `type ... is ...;` declaration in
    /// the (comment-stripped) source. Declarations that do not match the
    /// expected shape are skipped -- not every occurrence of these keywords
    /// is a declaration.
    pub fn build(source: &str) -> TypeTable {
        let mut table = TypeTable::default();
        table.collect_structs(source);
        table.collect_enums(source);
        table.collect_aliases(source);
        table
    }

    fn collect_structs(&mut self, source: &str) {
        for start in keyword_occurrences(source, "struct") {
            let rest = &source[start + "struct".len()..];
            let Some((name, after_name)) = take_word(rest) else {
                continue;
            };
            let Some(brace) = after_name.find(|c: char| !c.is_whitespace()) else {
                continue;
            };
            let Some(body) = scan::extract_balanced(after_name, brace, '{', '}') else {
                continue;
            };
            let mut fields = Vec::new();
            for field_src in body.content.split(';') {
                let field_src = field_src.trim();
                if field_src.is_empty() {
                    continue;
                }
                let c = parse_clause(field_src);
                // a struct field always carries a name; anything else is
                // not a field declaration
                if c.name.is_empty() || c.ty.is_empty() {
                    continue;
                }
                fields.push((c.name, c.ty));
            }
            self.structs.entry(name).or_insert(fields);
        }
    }

    fn collect_enums(&mut self, source: &str) {
        for start in keyword_occurrences(source, "enum") {
            let rest = &source[start + "enum".len()..];
            let Some((name, after_name)) = take_word(rest) else {
                continue;
            };
            let Some(brace) = after_name.find(|c: char| !c.is_whitespace()) else {
                continue;
            };
            if scan::extract_balanced(after_name, brace, '{', '}').is_some() {
                self.enums.insert(name);
            }
        }
    }

    fn collect_aliases(&mut self, source: &str) {
        // user-defined value types: `type Name is Underlying;`
        for start in keyword_occurrences(source, "type") {
            let rest = &source[start + "type".len()..];
            let Some((name, after_name)) = take_word(rest) else {
                continue;
            };
            let Some((is_word, after_is)) = take_word(after_name) else {
                continue;
            };
            if is_word != "is" {
                continue;
            }
            let Some(semi) = after_is.find(';') else {
                continue;
            };
            let underlying = after_is[..semi].trim();
            if underlying.is_empty() {
                continue;
            }
            self.aliases
                .entry(name)
                .or_insert_with(|| underlying.to_owned());
        }
    }

    /// Resolve a type expression to a descriptor. `None` means the
    /// expression names a custom type absent from the tables; the caller
    /// decides whether that is a diagnostic.
    ///
    /// Qualified names collapse to their last segment before lookup
    /// (`A.B.Name` -> `Name`), enums resolve to `uint8`, structs to tuples
    /// of recursively resolved fields, aliases to their underlying type.
    pub fn resolve(&self, type_name: &str) -> Option<TypeDescriptor> {
        let mut visiting = HashSet::new();
        self.resolve_expr(type_name, &mut visiting)
    }

    /// True for every primitive; for custom types, true iff the name is
    /// present in the struct/enum/alias tables.
    pub fn can_resolve(&self, type_name: &str) -> bool {
        self.resolve(type_name).is_some()
    }

    fn resolve_expr(
        &self,
        raw: &str,
        visiting: &mut HashSet<String>,
    ) -> Option<TypeDescriptor> {
        let t = self.substitute_aliases(raw.trim());
        let t = t.trim();

        if let Some((base, length)) = split_array_suffix(t) {
            let element = self.resolve_expr(base, visiting)?;
            return Some(TypeDescriptor::Array {
                element: Box::new(element),
                length,
            });
        }

        if mapping::is_mapping(t) {
            let raw_keys = mapping::key_types(t);
            if raw_keys.is_empty() {
                return None;
            }
            let mut keys = Vec::with_capacity(raw_keys.len());
            for k in &raw_keys {
                keys.push(self.resolve_expr(k, visiting)?);
            }
            let value = self.resolve_expr(&mapping::value_type(t)?, visiting)?;
            return Some(TypeDescriptor::Mapping {
                keys,
                value: Box::new(value),
            });
        }

        if is_primitive(t) {
            return Some(TypeDescriptor::Primitive(t.to_owned()));
        }

        let name = unqualify(t);
        if self.enums.contains(name) {
            return Some(TypeDescriptor::Primitive("uint8".to_owned()));
        }
        if self.structs.contains_key(name) {
            return Some(self.resolve_struct(name, visiting));
        }
        if let Some(underlying) = self.aliases.get(name) {
            // a cyclic alias must degrade, not recurse
            if !visiting.insert(name.to_owned()) {
                return Some(TypeDescriptor::Unresolved(name.to_owned()));
            }
            let resolved = self.resolve_expr(underlying, visiting);
            visiting.remove(name);
            return resolved;
        }
        None
    }

    /// Expand a known struct into a tuple. A field whose type is already on
    /// the in-progress path stays `Unresolved`; a field naming an unknown
    /// type likewise stays `Unresolved` rather than failing the whole
    /// struct -- it surfaces at the declaration level when looked up.
    fn resolve_struct(&self, name: &str, visiting: &mut HashSet<String>) -> TypeDescriptor {
        if visiting.contains(name) {
            return TypeDescriptor::Unresolved(name.to_owned());
        }
        visiting.insert(name.to_owned());
        let Some(fields) = self.structs.get(name) else {
            visiting.remove(name);
            return TypeDescriptor::Unresolved(name.to_owned());
        };
        let mut components = Vec::with_capacity(fields.len());
        for (field_name, field_ty) in fields {
            let ty = self
                .resolve_expr(field_ty, visiting)
                .unwrap_or_else(|| TypeDescriptor::Unresolved(field_ty.clone()));
            components.push(Component {
                name: field_name.clone(),
                ty,
            });
        }
        visiting.remove(name);
        TypeDescriptor::Tuple(components)
    }

    /// Textually substitute alias names inside a whole type expression,
    /// longest name first and word-boundary anchored so `Foo` never matches
    /// inside `FooBar`.
    fn substitute_aliases(&self, expr: &str) -> String {
        if self.aliases.is_empty() {
            return expr.to_owned();
        }
        let mut names: Vec<&String> = self.aliases.keys().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let mut out = expr.to_owned();
        for name in names {
            // one textual pass per name; alias-to-alias chains finish
            // resolving through the table lookup in resolve_expr
            out = replace_word(&out, name, &self.aliases[name.as_str()]);
        }
        out
    }
}

/// Replace whole-word occurrences of `word` in `text` with `with`.
fn replace_word(text: &str, word: &str, with: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if text[i..].starts_with(word) {
            let before_ok = i == 0 || !clause::is_ident_byte(bytes[i - 1]);
            let after = i + word.len();
            let after_ok = after >= bytes.len() || !clause::is_ident_byte(bytes[after]);
            // a dotted prefix means the name is qualified into another
            // scope -- not this alias
            let not_qualified = i == 0 || bytes[i - 1] != b'.';
            if before_ok && after_ok && not_qualified {
                out.push_str(with);
                i = after;
                continue;
            }
        }
        // advance one char, not one byte
        let ch = text[i..].chars().next().unwrap_or('\0');
        out.push(ch);
        i += ch.len_utf8().max(1);
    }
    out
}

/// Split a trailing `[]` or `[n]` suffix off a type expression.
fn split_array_suffix(t: &str) -> Option<(&str, Option<u64>)> {
    let t = t.trim_end();
    if !t.ends_with(']') {
        return None;
    }
    let open = t.rfind('[')?;
    if open == 0 {
        return None;
    }
    let inner = t[open + 1..t.len() - 1].trim();
    if inner.is_empty() {
        return Some((&t[..open], None));
    }
    if inner.bytes().all(|b| b.is_ascii_digit()) {
        return Some((&t[..open], inner.parse().ok()));
    }
    None
}

/// Recognized Solidity elementary types: `address`, `bool`, `string`,
/// `bytes`, `address payable`, and sized `uint`/`int`/`bytes` variants.
pub fn is_primitive(t: &str) -> bool {
    match t {
        "address" | "address payable" | "bool" | "string" | "bytes" | "uint" | "int" => {
            return true
        }
        _ => {}
    }
    for prefix in ["uint", "int", "bytes"] {
        if let Some(rest) = t.strip_prefix(prefix) {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                return true;
            }
        }
    }
    false
}

/// Last segment of a dotted qualified name: `A.B.Name` -> `Name`.
fn unqualify(t: &str) -> &str {
    t.rsplit('.').next().unwrap_or(t).trim()
}

/// Byte offsets of whole-word occurrences of `word` in `text`.
fn keyword_occurrences(text: &str, word: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(rel) = text[from..].find(word) {
        let i = from + rel;
        let before_ok = i == 0 || !clause::is_ident_byte(bytes[i - 1]);
        let after = i + word.len();
        let after_ok = after >= bytes.len() || !clause::is_ident_byte(bytes[after]);
        if before_ok && after_ok {
            found.push(i);
        }
        from = i + word.len();
    }
    found
}

/// Split the first whitespace-delimited identifier off a string. Returns
/// the word and the remainder.
fn take_word(s: &str) -> Option<(String, &str)> {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    if bytes.is_empty() || !clause::is_ident_start(bytes[0]) {
        return None;
    }
    let mut end = 1;
    while end < bytes.len() && clause::is_ident_byte(bytes[end]) {
        end += 1;
    }
    Some((trimmed[..end].to_owned(), &trimmed[end..]))
}
