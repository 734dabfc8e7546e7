//! Write options: guard lines for web-exposed file types.
//!
//! # What is a guard line? (for beginners)
//!
//! Some hosting setups execute files based on their extension.  A config
//! file named `settings.php` dropped into a web root would be run by the PHP
//! interpreter, and a request for it would leak its contents.  Prepending
//! `;<?php exit; ?>` makes the interpreter stop immediately, while INI
//! readers see a harmless `;` comment.
//!
//! Nothing is guarded by default.  Rules come from code
//! ([`WriteOptions::php`], [`WriteOptions::with_guard`]) or from a TOML file:
//!
//! ```toml
//! [[guards]]
//! extension = "php"
//! line = ";<?php exit; ?>"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The guard line used for `.php` targets.
pub const PHP_GUARD_LINE: &str = ";<?php exit; ?>";

/// Error type for loading [`WriteOptions`].
#[derive(Debug, Error)]
pub enum OptionsError {
    /// A file system I/O error occurred.
    #[error("I/O error reading options at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse options TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Prepend `line` to files whose extension is `extension`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuardRule {
    /// File extension, with or without the leading dot.  Case-insensitive.
    pub extension: String,
    /// Line written before the first section.  Should start with `;` so the
    /// file still parses.
    pub line: String,
}

impl GuardRule {
    pub fn new(extension: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            line: line.into(),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        let wanted = self.extension.trim_start_matches('.');
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
    }
}

/// Options applied by [`ConfigStore::write`](crate::ConfigStore::write).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteOptions {
    /// Guard rules, checked in order; the first match wins.
    #[serde(default)]
    pub guards: Vec<GuardRule>,
}

impl WriteOptions {
    /// Options with the single `.php` → `;<?php exit; ?>` rule.
    pub fn php() -> Self {
        Self::default().with_guard(GuardRule::new("php", PHP_GUARD_LINE))
    }

    /// Appends a guard rule.
    #[must_use]
    pub fn with_guard(mut self, rule: GuardRule) -> Self {
        self.guards.push(rule);
        self
    }

    /// Returns the guard line that applies to `path`, if any.
    pub fn guard_for(&self, path: &Path) -> Option<&str> {
        self.guards
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.line.as_str())
    }

    /// Parses options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Parse`] if the TOML is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses an options file.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Io`] if the file cannot be read and
    /// [`OptionsError::Parse`] if the TOML is malformed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
