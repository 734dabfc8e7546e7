//! Value model for configuration data.
//!
//! This module has no I/O and no knowledge of the INI text format.  It only
//! defines what a configuration *is*: named sections, each holding ordered
//! key/value pairs.
//!
//! # Why ordered maps? (for beginners)
//!
//! `std::collections::HashMap` iterates in an unpredictable order.  A config
//! file that is loaded and saved again should keep its sections and keys in
//! the order the user wrote them, otherwise every save would reshuffle the
//! file.  [`indexmap::IndexMap`] behaves like a `HashMap` for lookups but
//! remembers insertion order when iterating.

pub mod value;

use indexmap::IndexMap;

use value::Value;

/// Ordered key → value pairs of one `[section]`.
pub type Section = IndexMap<String, Value>;

/// Ordered section name → [`Section`] map.  This is the whole configuration.
pub type Sections = IndexMap<String, Section>;
