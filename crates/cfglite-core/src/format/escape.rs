//! Backslash escaping for string values.
//!
//! [`escape`] prefixes `'`, `"` and `\` with a backslash and writes NUL as
//! `\0`.  [`unescape`] reverses it.  The pair lets a value containing double
//! quotes survive being written inside `"..."` and read back by the grammar,
//! which keeps `\"` verbatim instead of ending the quoted string.

/// Backslash-escapes quotes, backslashes and NUL.
///
/// # Examples
///
/// ```rust
/// use cfglite_core::format::escape;
///
/// assert_eq!(escape(r#"say "hi""#), r#"say \"hi\""#);
/// ```
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}

/// Removes backslash escapes.
///
/// `\x` becomes `x`, `\\` becomes `\`, `\0` becomes NUL and a trailing lone
/// backslash is dropped.
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some(next) => out.push(next),
            None => {}
        }
    }
    out
}
