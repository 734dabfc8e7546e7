//! [`ConfigStore`]: the in-memory configuration plus its load/save contract.
//!
//! # Empty versus never loaded
//!
//! The store distinguishes two kinds of "empty":
//!
//! - **never initialised** – nothing was loaded or set.  Getters without a
//!   default fail with [`ConfigError::EmptyConfig`].
//! - **initialised with zero sections** – e.g. after loading an empty file.
//!   Getters fail with the ordinary not-found errors instead.
//!
//! `has` / `has_section` never fail in either state.
//!
//! # Defaults
//!
//! Every getter comes in two flavours.  `get*` returns a `Result` and fails
//! when the value is missing; `get*_or` takes a default and always returns a
//! value.  A default suppresses every not-found condition, including the
//! never-initialised one.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::domain::value::{parse_bool_token, Value};
use crate::domain::{Section, Sections};
use crate::error::ConfigError;
use crate::format::escape::{escape, unescape};
use crate::format::grammar::{IniGrammar, StandardGrammar};
use crate::format::render::{is_quotable, render_document, render_sections};
use crate::options::WriteOptions;

/// Section → key → value configuration backed by an INI file.
///
/// # Examples
///
/// ```rust
/// use cfglite_core::{ConfigError, ConfigStore};
///
/// let mut store = ConfigStore::new();
/// assert!(matches!(store.get("db", "host"), Err(ConfigError::EmptyConfig)));
///
/// store.set("db", "host", "localhost")?;
/// assert_eq!(store.get_string("db", "host")?, "localhost");
/// assert!(!store.has("db", "port"));
/// # Ok::<(), ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStore<G = StandardGrammar> {
    /// `None` until something is loaded or set.
    sections: Option<Sections>,
    /// Target of [`save`](Self::save).
    path: Option<PathBuf>,
    options: WriteOptions,
    grammar: G,
}

impl ConfigStore<StandardGrammar> {
    /// Creates an empty, never-initialised store with default options.
    pub fn new() -> Self {
        Self::with_options(WriteOptions::default())
    }

    /// Creates an empty store using `options` for writes.
    pub fn with_options(options: WriteOptions) -> Self {
        Self::with_grammar(StandardGrammar, options)
    }

    /// Creates a store and loads `path` if it exists.
    ///
    /// A missing file is not an error: the store stays empty and no path is
    /// remembered, so a later [`save`](Self::save) needs
    /// [`set_path`](Self::set_path) first.
    ///
    /// # Errors
    ///
    /// Propagates any [`load`](Self::load) failure for an existing file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::open_with_options(path, WriteOptions::default())
    }

    /// Like [`open`](Self::open) with explicit write options.
    ///
    /// # Errors
    ///
    /// Propagates any [`load`](Self::load) failure for an existing file.
    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: WriteOptions,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut store = Self::with_options(options);
        if path.exists() {
            store.load(path)?;
        }
        Ok(store)
    }
}

impl Default for ConfigStore<StandardGrammar> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IniGrammar> ConfigStore<G> {
    /// Creates an empty store that parses with `grammar`.
    pub fn with_grammar(grammar: G, options: WriteOptions) -> Self {
        Self {
            sections: None,
            path: None,
            options,
            grammar,
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Replaces the whole configuration with the contents of `path` and
    /// remembers `path` for [`save`](Self::save).
    ///
    /// On failure the store is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if `path` does not exist.
    /// - [`ConfigError::Read`] for other I/O failures.
    /// - [`ConfigError::Parse`] if the file is not UTF-8 or the grammar
    ///   rejects the text.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            // `read_to_string` reports non-UTF-8 content as InvalidData.
            std::io::ErrorKind::InvalidData => ConfigError::Parse {
                path: path.to_path_buf(),
                line: 1,
                message: "file is not valid UTF-8".to_string(),
            },
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let sections = self.grammar.parse(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })?;

        debug!("loaded {} section(s) from {}", sections.len(), path.display());
        self.sections = Some(sections);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Writes the current configuration back to the remembered path.
    ///
    /// A never-initialised store is saved as zero sections.  Saving twice
    /// without changes produces identical files.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoPath`] if no path was loaded or set.
    /// - Any [`write`](Self::write) failure.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.path.as_deref().ok_or(ConfigError::NoPath)?;
        match &self.sections {
            Some(sections) => self.write(path, sections),
            None => self.write(path, &Sections::new()),
        }
    }

    /// Serialises `sections` to `path`, replacing any existing content.
    ///
    /// A guard line is prepended when the path's extension matches one of
    /// the store's [`WriteOptions`] rules.  Writing zero sections is valid
    /// and produces an empty (or guard-only) file.
    ///
    /// No locking or atomic rename is performed.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidArgument`] if a name or value could not be
    ///   read back (see [`set_section`](Self::set_section)).  Nothing is
    ///   written in that case.
    /// - [`ConfigError::Write`] if the file cannot be opened or written.
    pub fn write(&self, path: impl AsRef<Path>, sections: &Sections) -> Result<(), ConfigError> {
        let path = path.as_ref();
        for (name, section) in sections {
            check_section_name(name)?;
            for (key, value) in section {
                check_key(key)?;
                check_value(key, value)?;
            }
        }
        let guard = self.options.guard_for(path);
        let content = render_document(sections, guard);

        std::fs::write(path, content.as_bytes()).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "wrote {} section(s), {} byte(s) to {}{}",
            sections.len(),
            content.len(),
            path.display(),
            if guard.is_some() { " (guarded)" } else { "" }
        );
        Ok(())
    }

    // ── Getters ───────────────────────────────────────────────────────────────

    /// Returns the raw stored value.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyConfig`] if nothing was ever loaded or set.
    /// - [`ConfigError::KeyNotFound`] if the section or key is absent.
    pub fn get(&self, section: &str, key: &str) -> Result<&Value, ConfigError> {
        let sections = self.sections.as_ref().ok_or(ConfigError::EmptyConfig)?;
        sections
            .get(section)
            .and_then(|s| s.get(key))
            .ok_or_else(|| ConfigError::KeyNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Returns the stored value, or `default` if it is absent.
    pub fn get_or(&self, section: &str, key: &str, default: impl Into<Value>) -> Value {
        match self.lookup(section, key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Returns the value as text with backslash escapes removed.
    ///
    /// Booleans are returned as `yes` / `no`.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_string(&self, section: &str, key: &str) -> Result<String, ConfigError> {
        Ok(unescape(self.get(section, key)?.as_text()))
    }

    /// Like [`get_string`](Self::get_string), returning `default` unchanged if
    /// the value is absent.
    pub fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        match self.lookup(section, key) {
            Some(value) => unescape(value.as_text()),
            None => default.to_string(),
        }
    }

    /// Interprets the value as a boolean.
    ///
    /// `1`, `on`, `true`, `yes` are true and `0`, `off`, `false`, `no` are
    /// false (any case).  An empty value is false.
    ///
    /// # Errors
    ///
    /// - Same as [`get`](Self::get) when the value is absent.
    /// - [`ConfigError::InvalidBoolean`] if the value is not a boolean token.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        let value = self.get(section, key)?;
        interpret_bool(value).ok_or_else(|| ConfigError::InvalidBoolean {
            section: section.to_string(),
            key: key.to_string(),
            value: value.as_text().to_string(),
        })
    }

    /// Like [`get_bool`](Self::get_bool), returning `default` if the value is
    /// absent or not a boolean token.  An empty value is still `false`.
    pub fn get_bool_or(&self, section: &str, key: &str, default: bool) -> bool {
        self.lookup(section, key)
            .and_then(interpret_bool)
            .unwrap_or(default)
    }

    /// Returns all key/value pairs of `section`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyConfig`] if nothing was ever loaded or set.
    /// - [`ConfigError::SectionNotFound`] if the section is absent.
    pub fn get_section(&self, section: &str) -> Result<&Section, ConfigError> {
        let sections = self.sections.as_ref().ok_or(ConfigError::EmptyConfig)?;
        sections
            .get(section)
            .ok_or_else(|| ConfigError::SectionNotFound {
                section: section.to_string(),
            })
    }

    /// Returns a copy of `section`, or `default` if it is absent.
    pub fn get_section_or(&self, section: &str, default: Section) -> Section {
        self.sections
            .as_ref()
            .and_then(|s| s.get(section))
            .cloned()
            .unwrap_or(default)
    }

    /// Returns `true` if `key` exists in `section`.  Never fails.
    pub fn has(&self, section: &str, key: &str) -> bool {
        self.lookup(section, key).is_some()
    }

    /// Returns `true` if `section` exists.  Never fails.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections
            .as_ref()
            .is_some_and(|s| s.contains_key(section))
    }

    // ── Setters ───────────────────────────────────────────────────────────────

    /// Inserts or overwrites one value, creating the section if needed.
    ///
    /// Returns `self` so calls can be chained with `?`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidArgument`] if `section`, `key` or
    /// `value` is not valid (see [`set_section`](Self::set_section)).
    pub fn set(
        &mut self,
        section: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, ConfigError> {
        check_section_name(section)?;
        check_key(key)?;
        let value = value.into();
        check_value(key, &value)?;
        trace!("set [{section}] {key} = {value}");
        self.sections
            .get_or_insert_with(Sections::new)
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(self)
    }

    /// Like [`set`](Self::set), but backslash-escapes quotes and backslashes
    /// first.  Read the value back with [`get_string`](Self::get_string).
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).  Line breaks cannot be escaped, so a value
    /// containing one is rejected.
    pub fn set_string(
        &mut self,
        section: &str,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConfigError> {
        self.set(section, key, Value::Str(escape(value)))
    }

    /// Replaces the whole of `section` with `pairs`.
    ///
    /// Section names must be non-empty, without surrounding whitespace, and
    /// must not contain `[`, `]` or line breaks.  Keys additionally must not
    /// contain `=` or `:` or start with a comment character (`;`, `#`).
    /// String values must not contain line breaks or unescaped `"`, and must
    /// not end in a lone backslash.  Nothing is changed if anything is
    /// invalid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidArgument`] for an invalid name or value.
    pub fn set_section<I, K, V>(&mut self, section: &str, pairs: I) -> Result<&mut Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        check_section_name(section)?;
        let mut replacement = Section::new();
        for (key, value) in pairs {
            let key = key.into();
            check_key(&key)?;
            let value = value.into();
            check_value(&key, &value)?;
            replacement.insert(key, value);
        }
        trace!("set section [{section}] with {} key(s)", replacement.len());
        self.sections
            .get_or_insert_with(Sections::new)
            .insert(section.to_string(), replacement);
        Ok(self)
    }

    /// Removes `key` from `section`.  A missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SectionNotFound`] if the section is absent.
    pub fn remove(&mut self, section: &str, key: &str) -> Result<(), ConfigError> {
        let entries = self
            .sections
            .as_mut()
            .and_then(|s| s.get_mut(section))
            .ok_or_else(|| ConfigError::SectionNotFound {
                section: section.to_string(),
            })?;
        if entries.shift_remove(key).is_some() {
            trace!("removed [{section}] {key}");
        }
        Ok(())
    }

    /// Removes `section` and all its keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SectionNotFound`] if the section is absent.
    pub fn remove_section(&mut self, section: &str) -> Result<(), ConfigError> {
        self.sections
            .as_mut()
            .and_then(|s| s.shift_remove(section))
            .ok_or_else(|| ConfigError::SectionNotFound {
                section: section.to_string(),
            })?;
        trace!("removed section [{section}]");
        Ok(())
    }

    // ── Rendering and state ───────────────────────────────────────────────────

    /// Renders the configuration in file format, without any guard line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyConfig`] only when nothing was ever loaded
    /// or set *and* no path was established.
    pub fn to_text(&self) -> Result<String, ConfigError> {
        match (&self.sections, &self.path) {
            (Some(sections), _) => Ok(render_sections(sections)),
            (None, Some(_)) => Ok(String::new()),
            (None, None) => Err(ConfigError::EmptyConfig),
        }
    }

    /// Returns `true` once something has been loaded or set.
    pub fn is_initialized(&self) -> bool {
        self.sections.is_some()
    }

    /// Read-only view of all sections, `None` if never initialised.
    pub fn sections(&self) -> Option<&Sections> {
        self.sections.as_ref()
    }

    /// Section names in file order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections
            .iter()
            .flat_map(|s| s.keys())
            .map(String::as_str)
    }

    /// The path [`save`](Self::save) writes to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sets the path [`save`](Self::save) writes to.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    /// The write options in effect.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.as_ref()?.get(section)?.get(key)
    }
}

impl<G> fmt::Display for ConfigStore<G> {
    /// Same text as [`ConfigStore::to_text`]; nothing for a
    /// never-initialised store.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sections {
            Some(sections) => f.write_str(&render_sections(sections)),
            None => Ok(()),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn interpret_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Str(s) if s.is_empty() => Some(false),
        Value::Str(s) => parse_bool_token(s),
    }
}

fn check_section_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.trim() != name || name.contains(['[', ']', '\n', '\r']) {
        return Err(ConfigError::InvalidArgument(format!(
            "invalid section name {name:?}"
        )));
    }
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if key.is_empty()
        || key.trim() != key
        || key.starts_with([';', '#'])
        || key.contains(['[', ']', '=', ':', '\n', '\r'])
    {
        return Err(ConfigError::InvalidArgument(format!(
            "scalar key expected, got {key:?}"
        )));
    }
    Ok(())
}

fn check_value(key: &str, value: &Value) -> Result<(), ConfigError> {
    match value {
        Value::Str(s) if !is_quotable(s) => Err(ConfigError::InvalidArgument(format!(
            "value for {key:?} cannot be stored in a quoted INI value: {s:?}"
        ))),
        _ => Ok(()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
