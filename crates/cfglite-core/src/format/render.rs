//! [`Sections`] → INI text.
//!
//! Output layout:
//!
//! ```text
//! <guard line>\n          -- only when a guard applies
//! \n
//! [section]\n
//! key = "value"\n
//! flag = yes\n
//! ```
//!
//! Zero sections render as the empty string.

use crate::domain::Sections;

/// Renders all sections in insertion order, without any guard line.
pub fn render_sections(sections: &Sections) -> String {
    let mut out = String::new();
    for (name, section) in sections {
        out.push_str(&format!("\n[{name}]\n"));
        for (key, value) in section {
            out.push_str(&format!("{key} = {}\n", value.render()));
        }
    }
    out
}

/// Returns `true` if `text` reads back unchanged once written between double
/// quotes: no line breaks, every `"` backslash-escaped, and no dangling
/// backslash before the closing quote.
pub fn is_quotable(text: &str) -> bool {
    let mut escaped = false;
    for c in text.chars() {
        match c {
            '\n' | '\r' => return false,
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return false,
            _ => {}
        }
    }
    !escaped
}

/// Renders a complete file payload, prefixed by `guard` when given.
pub fn render_document(sections: &Sections, guard: Option<&str>) -> String {
    let body = render_sections(sections);
    match guard {
        Some(line) => format!("{line}\n{body}"),
        None => body,
    }
}
