//! # cfglite-core
//!
//! Read, query, mutate and persist INI-style configuration files organised
//! into named sections of key/value pairs.
//!
//! # Architecture overview (for beginners)
//!
//! An INI file is a plain-text format that groups `key = value` lines under
//! `[section]` headers:
//!
//! ```text
//! [db]
//! host = "localhost"
//! port = "5432"
//! debug = yes
//! ```
//!
//! This crate is split into small layers:
//!
//! - **`domain`** – The value model.  A [`Value`] is either a string or a
//!   boolean; a [`Section`] is an ordered key → value map and [`Sections`]
//!   is an ordered section-name → section map.
//!
//! - **`format`** – Text in and text out.  The [`IniGrammar`] trait turns
//!   text into [`Sections`]; the renderer turns [`Sections`] back into text.
//!   The backslash escaping used by the `*_string` accessors lives here too.
//!
//! - **`options`** – [`WriteOptions`]: which file extensions get a guard line
//!   prepended on write.  Loadable from TOML.
//!
//! - **`store`** – [`ConfigStore`], the object applications use.  It owns the
//!   mapping, remembers where it was loaded from, and exposes typed getters
//!   with default-value fallback.
//!
//! # Example
//!
//! ```rust
//! use cfglite_core::ConfigStore;
//!
//! let mut store = ConfigStore::new();
//! store.set("db", "host", "localhost")?.set("db", "debug", true)?;
//!
//! assert_eq!(store.get_string("db", "host")?, "localhost");
//! assert!(store.get_bool("db", "debug")?);
//! assert_eq!(store.get_string_or("db", "user", "root"), "root");
//! # Ok::<(), cfglite_core::ConfigError>(())
//! ```

pub mod domain;
pub mod error;
pub mod format;
pub mod options;
pub mod store;

// Re-export the most-used types at the crate root so callers can write
// `cfglite_core::ConfigStore` instead of `cfglite_core::store::ConfigStore`.
pub use domain::value::Value;
pub use domain::{Section, Sections};
pub use error::ConfigError;
pub use format::grammar::{GrammarError, IniGrammar, StandardGrammar};
pub use options::{GuardRule, OptionsError, WriteOptions};
pub use store::ConfigStore;
