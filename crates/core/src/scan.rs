//! Balanced-delimiter scanning primitives.
//!
//! Small, pure, allocation-light scans over byte indices. "Not found" is a
//! normal `None` return, never an error: callers compose these into larger
//! best-effort matches and decide for themselves what a miss means.
//!
//! All indices are byte offsets into the input `&str`. The delimiters and
//! needles handled here are ASCII, so byte-wise scanning is UTF-8 safe.

/// A balanced region extracted by [`extract_balanced`].
#[derive(Debug, Clone, PartialEq)]
pub struct Balanced<'a> {
    /// Text strictly between the delimiters.
    pub content: &'a str,
    /// Byte index of the closing delimiter.
    pub end: usize,
}

/// Index of the delimiter closing the one at `open_index`, or `None` if the
/// index is out of range, does not sit on `(`, `[` or `{`, or the text ends
/// before balance is restored.
///
/// With `ignore_strings`, quoted regions (escape-aware, single or double
/// quotes) are skipped without affecting depth, so source text containing
/// parenthesized string literals scans correctly.
pub fn matching_close(text: &str, open_index: usize, ignore_strings: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    let open = *bytes.get(open_index)?;
    let close = match open {
        b'(' => b')',
        b'[' => b']',
        b'{' => b'}',
        _ => return None,
    };

    let mut depth = 0usize;
    let mut i = open_index;
    while i < bytes.len() {
        let b = bytes[i];
        if ignore_strings && (b == b'"' || b == b'\'') {
            i = skip_string(bytes, i);
            continue;
        }
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Extract the text between a custom delimiter pair opening at `open_index`.
/// `None` if the character there is not `open` or no balancing `close`
/// exists.
pub fn extract_balanced(
    text: &str,
    open_index: usize,
    open: char,
    close: char,
) -> Option<Balanced<'_>> {
    let bytes = text.as_bytes();
    if !open.is_ascii() || !close.is_ascii() {
        return None;
    }
    let (open, close) = (open as u8, close as u8);
    if *bytes.get(open_index)? != open {
        return None;
    }

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open_index) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(Balanced {
                    content: &text[open_index + 1..i],
                    end: i,
                });
            }
        }
    }
    None
}

/// First occurrence of `needle` at exactly `target_depth`, where depth is
/// tracked over `(`/`)` starting from zero at `start_index`.
///
/// This is how a mapping's own `=>` separator is located without tripping
/// over the separators of mappings nested inside it.
pub fn find_at_depth(
    text: &str,
    start_index: usize,
    needle: &str,
    target_depth: usize,
) -> Option<usize> {
    if needle.is_empty() || start_index > text.len() {
        return None;
    }
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = start_index;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            _ => {
                // compare bytes: `i` may sit inside a multi-byte char,
                // where slicing the str would panic
                if depth == target_depth && bytes[i..].starts_with(needle.as_bytes()) {
                    return Some(i);
                }
            }
        }
        i += 1;
    }
    None
}

/// Skip a quoted region starting at `start` (which holds the quote byte).
/// Returns the index just past the closing quote, or the end of input for
/// an unterminated literal.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
