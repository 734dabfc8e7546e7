//! INI text handling: parsing, rendering, and value escaping.
//!
//! - [`grammar`] turns text into [`Sections`](crate::Sections).
//! - [`render`] turns [`Sections`](crate::Sections) back into text.
//! - [`escape`] implements the backslash escaping pair used by
//!   `set_string` / `get_string`.

pub mod escape;
pub mod grammar;
pub mod render;

pub use escape::{escape, unescape};
pub use grammar::{GrammarError, IniGrammar, StandardGrammar};
pub use render::{is_quotable, render_document, render_sections};
