//! Configuration values and boolean token recognition.

use std::fmt;

use serde::Serialize;

/// Tokens accepted as `true` by [`parse_bool_token`] (compared lower-cased).
pub const TRUE_TOKENS: [&str; 4] = ["1", "on", "true", "yes"];

/// Tokens accepted as `false` by [`parse_bool_token`] (compared lower-cased).
pub const FALSE_TOKENS: [&str; 4] = ["0", "off", "false", "no"];

/// A single configuration value.
///
/// Values are stored as text.  Booleans are kept as a separate variant so
/// they can be written back in their canonical on-disk form (`yes` / `no`)
/// rather than as quoted strings.
///
/// # Examples
///
/// ```rust
/// use cfglite_core::Value;
///
/// assert_eq!(Value::from(true).render(), "yes");
/// assert_eq!(Value::from("localhost").render(), "\"localhost\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Plain text.  Written double-quoted.
    Str(String),
    /// Boolean.  Written bare as `yes` or `no`.
    Bool(bool),
}

impl Value {
    /// Returns the on-disk representation used by the INI writer.
    ///
    /// Booleans become `yes`/`no`; strings are wrapped in double quotes with
    /// no further escaping.  Embedded double quotes are therefore written
    /// as-is, which the grammar cannot read back.  Use
    /// [`ConfigStore::set_string`](crate::ConfigStore::set_string) for values
    /// that may contain quotes.
    pub fn render(&self) -> String {
        match self {
            Value::Bool(b) => bool_token(*b).to_string(),
            Value::Str(s) => format!("\"{s}\""),
        }
    }

    /// Returns the value as text: the string itself, or `yes`/`no`.
    pub fn as_text(&self) -> &str {
        match self {
            Value::Str(s) => s,
            Value::Bool(b) => bool_token(*b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Canonical textual form of a boolean: `yes` or `no`.
pub fn bool_token(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

/// Interprets `token` as a boolean.
///
/// Matching is case-insensitive against [`TRUE_TOKENS`] and
/// [`FALSE_TOKENS`].  Returns `None` for anything else, including the empty
/// string (callers decide what an empty value means).
pub fn parse_bool_token(token: &str) -> Option<bool> {
    let lowered = token.to_ascii_lowercase();
    if TRUE_TOKENS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}
