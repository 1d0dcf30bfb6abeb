//! Comment stripping -- erase `//` and `/* */` comments while preserving
//! line structure and string-literal contents.
//!
//! Downstream scanners work on stripped text so they never have to reason
//! about comment state; diagnostics that count lines still agree with the
//! original source because every newline inside a comment is kept.

/// Remove comments from `source`.
///
/// Line comments run to end-of-line; block comments may span lines and an
/// unterminated block comment consumes to end-of-input. Each erased block
/// comment leaves a single space so adjacent tokens do not fuse. Quoted
/// string literals pass through untouched, escapes included. Idempotent.
pub fn strip_comments(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut pos = 0usize;

    while pos < chars.len() {
        let c = chars[pos];

        // Line comment
        if c == '/' && pos + 1 < chars.len() && chars[pos + 1] == '/' {
            pos += 2;
            while pos < chars.len() && chars[pos] != '\n' {
                pos += 1;
            }
            // the terminating newline is emitted by the outer loop
            continue;
        }

        // Block comment -- replaced by one space, inner newlines preserved
        if c == '/' && pos + 1 < chars.len() && chars[pos + 1] == '*' {
            out.push(' ');
            pos += 2;
            while pos < chars.len() {
                if chars[pos] == '*' && pos + 1 < chars.len() && chars[pos + 1] == '/' {
                    pos += 2;
                    break;
                }
                if chars[pos] == '\n' {
                    out.push('\n');
                }
                pos += 1;
            }
            continue;
        }

        // String literal -- copied verbatim; an unterminated literal
        // copies to end-of-input
        if c == '"' || c == '\'' {
            out.push(c);
            pos += 1;
            while pos < chars.len() {
                let sc = chars[pos];
                out.push(sc);
                pos += 1;
                if sc == '\\' {
                    if pos < chars.len() {
                        out.push(chars[pos]);
                        pos += 1;
                    }
                    continue;
                }
                if sc == c {
                    break;
                }
            }
            continue;
        }

        out.push(c);
        pos += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comment_erased_to_eol() {
        assert_eq!(strip_comments("uint a; // tail\nuint b;"), "uint a; \nuint b;");
    }

    #[test]
    fn block_comment_erased_to_single_space() {
        assert_eq!(strip_comments("uint/*gap*/a;"), "uint a;");
    }

    #[test]
    fn multiline_block_comment_keeps_newlines() {
        let src = "a /* one\ntwo\nthree */ b";
        let stripped = strip_comments(src);
        assert_eq!(stripped.matches('\n').count(), src.matches('\n').count());
        assert_eq!(stripped, "a  \n\n b");
    }

    #[test]
    fn comment_markers_inside_strings_survive() {
        let src = r#"string s = "not // a /* comment */";"#;
        assert_eq!(strip_comments(src), src);
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let src = r#"string s = "say \"hi\" // still string";"#;
        assert_eq!(strip_comments(src), src);
    }

    #[test]
    fn unterminated_block_comment_consumes_to_end() {
        assert_eq!(strip_comments("uint a; /* drifts off\nuint b;"), "uint a;  \n");
    }

    #[test]
    fn idempotent() {
        let src = "a // x\nb /* y\nz */ c \"lit//\"";
        let once = strip_comments(src);
        assert_eq!(strip_comments(&once), once);
    }

    #[test]
    fn preserves_line_count() {
        let src = "// a\n/* b\nc */\nuint x; // d\n";
        assert_eq!(
            strip_comments(src).matches('\n').count(),
            src.matches('\n').count()
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(strip_comments(""), "");
    }
}
