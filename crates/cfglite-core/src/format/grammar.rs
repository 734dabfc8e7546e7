//! INI grammar: text → [`Sections`].
//!
//! # Grammar rules
//!
//! ```text
//! ; comment                 -- lines starting with ';' or '#' are skipped
//! [section]                 -- opens a section (re-opening merges keys)
//! key = "double quoted"     -- \" inside the quotes does not end the value
//! key = 'single quoted'     -- raw text, no escapes
//! key = bare value ; note   -- text up to an inline ';' comment, trimmed
//! key = yes                 -- yes/true/on → Bool(true)
//! key = off                 -- no/false/off/none → Bool(false)
//! key = null                -- empty string
//! key: value                -- ':' works like '='
//! ```
//!
//! Every key must appear after a section header; there is no global key
//! space.  Values never span lines.
//!
//! # How parsing is split (for beginners)
//!
//! [`StandardGrammar`] hands the document to the `rust-ini` crate for the
//! line structure: comments, section headers, `key = value` splitting and
//! repeated sections.  Its own quote and escape handling is switched off, so
//! each value comes back exactly as written.  A second pass then applies the
//! literal rules above, which need to know whether a value was quoted (a
//! quoted `"yes"` stays text) and must keep `\"` escapes verbatim for
//! [`unescape`](super::escape::unescape).
//!
//! The [`IniGrammar`] trait exists so [`ConfigStore`](crate::ConfigStore) can
//! be driven by another parser (or a mock in tests).

use ini::{Ini, ParseOption};
use thiserror::Error;

use crate::domain::value::Value;
use crate::domain::Sections;

/// A syntax error reported by an [`IniGrammar`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct GrammarError {
    /// 1-based line number of the offending line.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl GrammarError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Parses INI text into sections.
#[cfg_attr(test, mockall::automock)]
pub trait IniGrammar {
    /// Parses the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError`] if the text is not valid for this grammar.
    fn parse(&self, text: &str) -> Result<Sections, GrammarError>;
}

/// The default INI grammar.  See the module docs for the accepted syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardGrammar;

impl StandardGrammar {
    fn tokenizer_options() -> ParseOption {
        ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        }
    }
}

impl IniGrammar for StandardGrammar {
    fn parse(&self, text: &str) -> Result<Sections, GrammarError> {
        let ini = Ini::load_from_str_opt(text, Self::tokenizer_options())
            .map_err(|e| GrammarError::new(clamp_line(text, e.line), e.msg))?;

        let mut cursor = LineCursor::new(text);
        let mut sections = Sections::new();

        for (name, properties) in ini.iter() {
            let Some(name) = name else {
                // The general section: anything in it was written before the
                // first header.
                if let Some((key, _)) = properties.iter().next() {
                    return Err(GrammarError::new(
                        cursor.find_key(key),
                        format!("key '{key}' appears before any section"),
                    ));
                }
                continue;
            };

            let header_line = cursor.find_header();
            check_section_name(name).map_err(|m| GrammarError::new(header_line, m))?;
            let section = sections.entry(name.to_string()).or_default();

            for (key, raw_value) in properties.iter() {
                let line_no = cursor.find_key(key);
                check_key(key).map_err(|m| GrammarError::new(line_no, m))?;
                let value = parse_value(raw_value.trim()).map_err(|m| GrammarError::new(line_no, m))?;
                section.insert(key.to_string(), value);
            }
        }

        Ok(sections)
    }
}

// ── Line tracking ─────────────────────────────────────────────────────────────

/// Walks the source lines in step with the tokenizer's output so errors found
/// after tokenizing still point at a line.
struct LineCursor<'a> {
    lines: Vec<&'a str>,
    /// 0-based index of the first line not yet matched.
    next: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            next: 0,
        }
    }

    /// 1-based line of the next section header.
    fn find_header(&mut self) -> usize {
        self.seek(|line| line.starts_with('['))
    }

    /// 1-based line on which `key` starts.
    fn find_key(&mut self, key: &str) -> usize {
        let head = key.lines().next().unwrap_or_default();
        self.seek(|line| {
            !line.starts_with('[')
                && line.strip_prefix(head).is_some_and(|rest| {
                    let rest = rest.trim_start();
                    rest.is_empty() || rest.starts_with(['=', ':'])
                })
        })
    }

    /// Falls back to the last matched line when nothing matches.
    fn seek(&mut self, pred: impl Fn(&str) -> bool) -> usize {
        let found = self.lines[self.next..]
            .iter()
            .position(|line| pred(line.trim_start()));
        match found {
            Some(offset) => {
                self.next += offset + 1;
                self.next
            }
            None => self.next.max(1),
        }
    }
}

/// Errors raised at end of input are reported one past the last line.
fn clamp_line(text: &str, line: usize) -> usize {
    line.min(text.lines().count()).max(1)
}

// ── Validation and literals ───────────────────────────────────────────────────

fn is_comment(s: &str) -> bool {
    s.starts_with(';') || s.starts_with('#')
}

fn check_section_name(name: &str) -> Result<(), String> {
    if name.contains(['\n', '\r']) {
        return Err("unterminated section header".to_string());
    }
    if name.is_empty() {
        return Err("empty section name".to_string());
    }
    Ok(())
}

/// The tokenizer reads a key up to the next `=`, so a line without one runs
/// into the following line.
fn check_key(key: &str) -> Result<(), String> {
    if key.contains(['\n', '\r']) {
        return Err("expected 'key = value'".to_string());
    }
    if key.contains(['[', ']']) {
        return Err(format!("array keys are not supported: {key}"));
    }
    Ok(())
}

/// Parses the text to the right of `=` (already trimmed).
fn parse_value(raw: &str) -> Result<Value, String> {
    if let Some(body) = raw.strip_prefix('"') {
        let (content, trailing) = split_double_quoted(body)?;
        check_trailing(trailing, "quoted value")?;
        return Ok(Value::Str(content.to_string()));
    }

    if let Some(body) = raw.strip_prefix('\'') {
        let Some(end) = body.find('\'') else {
            return Err("unterminated quoted value".to_string());
        };
        check_trailing(&body[end + 1..], "quoted value")?;
        return Ok(Value::Str(body[..end].to_string()));
    }

    let bare = raw.split(';').next().unwrap_or_default().trim();
    Ok(bare_literal(bare))
}

/// Splits a double-quoted body at the first unescaped `"`.
///
/// Escape sequences are kept verbatim in the returned content.
fn split_double_quoted(body: &str) -> Result<(&str, &str), String> {
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return Ok((&body[..i], &body[i + 1..])),
            _ => {}
        }
    }
    Err("unterminated quoted value".to_string())
}

fn check_trailing(trailing: &str, what: &str) -> Result<(), String> {
    let trailing = trailing.trim();
    if trailing.is_empty() || is_comment(trailing) {
        Ok(())
    } else {
        Err(format!("unexpected text after {what}: {trailing}"))
    }
}

/// Maps unquoted literals onto booleans; everything else stays text.
fn bare_literal(bare: &str) -> Value {
    match bare.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" => Value::Bool(true),
        "no" | "false" | "off" | "none" => Value::Bool(false),
        "null" => Value::Str(String::new()),
        _ => Value::Str(bare.to_string()),
    }
}
