//! List splitting with backslash escapes.
//!
//! `filter` and `sort` accept comma-separated lists. A literal comma inside a
//! value is written `\,` and a literal backslash `\\`.

pub(crate) fn split_unescaped(input: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    let bytes = input.as_bytes();
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 1;
                if i < bytes.len() {
                    i += 1;
                }
            }
            b if b as char == sep => {
                out.push(&input[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    out.push(&input[start..]);
    out
}

/// Resolve `\,` and `\\`. Returns `None` for any other escape or a dangling `\`.
pub(crate) fn unescape(input: &str) -> Option<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            next @ ('\\' | ',') => out.push(next),
            _ => return None,
        }
    }
    Some(out)
}
