//! Integration tests for `ConfigStore` persistence.
//!
//! These tests go through the real file system: every test writes into its
//! own directory under `std::env::temp_dir()` and removes it afterwards.

use std::path::PathBuf;

use cfglite_core::{ConfigError, ConfigStore, Section, Sections, Value, WriteOptions};
use uuid::Uuid;

/// A scratch directory removed on drop.
struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("cfglite_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        Self(dir)
    }

    fn file(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

fn sample_sections() -> Sections {
    let mut db = Section::new();
    db.insert("host".to_string(), Value::from("localhost"));
    db.insert("port".to_string(), Value::from("5432"));
    db.insert("ssl".to_string(), Value::Bool(true));
    let mut app = Section::new();
    app.insert("name".to_string(), Value::from("demo app"));
    app.insert("debug".to_string(), Value::Bool(false));

    let mut sections = Sections::new();
    sections.insert("db".to_string(), db);
    sections.insert("app".to_string(), app);
    sections
}

#[test]
fn test_set_save_load_get_end_to_end() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.file("app.ini");
    let mut store = ConfigStore::new();
    store.set_path(&path);
    store.set("db", "host", "localhost").unwrap();
    store.set("db", "port", "5432").unwrap();

    // Act
    store.save().unwrap();
    let mut reloaded = ConfigStore::new();
    reloaded.load(&path).unwrap();

    // Assert
    assert_eq!(reloaded.get("db", "host").unwrap(), &Value::from("localhost"));
    assert_eq!(reloaded.get_string("db", "port").unwrap(), "5432");
}

#[test]
fn test_save_after_load_writes_back_to_loaded_path() {
    let dir = TempDir::new();
    let path = dir.file("app.ini");
    std::fs::write(&path, "[db]\nhost = \"old\"\n").unwrap();

    let mut store = ConfigStore::new();
    store.load(&path).unwrap();
    store.set("db", "host", "new").unwrap();
    store.save().unwrap();

    let mut reloaded = ConfigStore::new();
    reloaded.load(&path).unwrap();
    assert_eq!(reloaded.get_string("db", "host").unwrap(), "new");
}

#[test]
fn test_write_then_load_round_trips_mapping() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.file("round.ini");
    let sections = sample_sections();
    let writer = ConfigStore::new();

    // Act
    writer.write(&path, &sections).unwrap();
    let mut reader = ConfigStore::new();
    reader.load(&path).unwrap();

    // Assert
    assert_eq!(reader.sections(), Some(&sections));
}

#[test]
fn test_write_produces_exact_file_format() {
    let dir = TempDir::new();
    let path = dir.file("exact.ini");

    ConfigStore::new().write(&path, &sample_sections()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "\n[db]\nhost = \"localhost\"\nport = \"5432\"\nssl = yes\n\
         \n[app]\nname = \"demo app\"\ndebug = no\n"
    );
}

#[test]
fn test_save_twice_is_byte_identical() {
    let dir = TempDir::new();
    let path = dir.file("idem.ini");
    let mut store = ConfigStore::new();
    store.write(&path, &sample_sections()).unwrap();
    store.load(&path).unwrap();

    store.save().unwrap();
    let first = std::fs::read(&path).unwrap();
    store.save().unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_zero_sections_write_empty_file_and_reload_initialised() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.file("empty.ini");

    // Act
    ConfigStore::new().write(&path, &Sections::new()).unwrap();
    let mut store = ConfigStore::new();
    store.load(&path).unwrap();

    // Assert
    assert_eq!(std::fs::read(&path).unwrap().len(), 0);
    assert!(store.is_initialized());
    assert!(!store.has_section("anything"));
    assert!(!store.has("anything", "key"));
    assert_eq!(store.to_text().unwrap(), "");
    assert!(matches!(
        store.get("anything", "key"),
        Err(ConfigError::KeyNotFound { .. })
    ));
}

#[test]
fn test_save_of_never_initialised_store_writes_empty_file() {
    let dir = TempDir::new();
    let path = dir.file("fresh.ini");
    let mut store = ConfigStore::new();
    store.set_path(&path);

    store.save().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_php_guard_written_only_for_php_targets() {
    // Arrange
    let dir = TempDir::new();
    let php = dir.file("settings.php");
    let ini = dir.file("settings.ini");
    let store = ConfigStore::with_options(WriteOptions::php());

    // Act
    store.write(&php, &sample_sections()).unwrap();
    store.write(&ini, &sample_sections()).unwrap();

    // Assert
    let php_text = std::fs::read_to_string(&php).unwrap();
    let ini_text = std::fs::read_to_string(&ini).unwrap();
    assert!(php_text.starts_with(";<?php exit; ?>\n\n[db]\n"));
    assert!(ini_text.starts_with("\n[db]\n"));
    assert_eq!(php_text.len(), ini_text.len() + ";<?php exit; ?>\n".len());
}

#[test]
fn test_guarded_file_reloads_cleanly() {
    let dir = TempDir::new();
    let path = dir.file("settings.php");
    let store = ConfigStore::with_options(WriteOptions::php());
    store.write(&path, &sample_sections()).unwrap();

    let mut reloaded = ConfigStore::new();
    reloaded.load(&path).unwrap();

    assert_eq!(reloaded.sections(), Some(&sample_sections()));
}

#[test]
fn test_guarded_empty_config_is_guard_only() {
    let dir = TempDir::new();
    let path = dir.file("empty.php");

    ConfigStore::with_options(WriteOptions::php())
        .write(&path, &Sections::new())
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), ";<?php exit; ?>\n");
}

#[test]
fn test_default_options_do_not_guard_php() {
    let dir = TempDir::new();
    let path = dir.file("plain.php");

    ConfigStore::new().write(&path, &sample_sections()).unwrap();

    assert!(std::fs::read_to_string(&path).unwrap().starts_with("\n[db]"));
}

#[test]
fn test_set_string_survives_disk_round_trip() {
    let dir = TempDir::new();
    let path = dir.file("quotes.ini");
    let mut store = ConfigStore::new();
    store.set_path(&path);
    store.set_string("app", "motto", r#"say "hi" to O'Brien \o/"#).unwrap();
    store.save().unwrap();

    let reloaded = ConfigStore::open(&path).unwrap();

    assert_eq!(
        reloaded.get_string("app", "motto").unwrap(),
        r#"say "hi" to O'Brien \o/"#
    );
}

#[test]
fn test_unescaped_embedded_quote_is_rejected_on_set_and_on_load() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.file("broken.ini");
    let mut store = ConfigStore::new();
    std::fs::write(&path, "\n[app]\nmotto = \"say \"hi\"\"\n").unwrap();

    // Act
    let set_result = store.set("app", "motto", r#"say "hi""#);
    let load_result = ConfigStore::open(&path);

    // Assert
    assert!(matches!(set_result, Err(ConfigError::InvalidArgument(_))));
    assert!(matches!(load_result, Err(ConfigError::Parse { line: 3, .. })));
}

#[test]
fn test_save_refuses_loaded_value_that_cannot_be_quoted() {
    let dir = TempDir::new();
    let path = dir.file("single.ini");
    let original = "[a]\nv = 'say \"hi\"'\n";
    std::fs::write(&path, original).unwrap();
    let store = ConfigStore::open(&path).unwrap();

    let err = store.save().unwrap_err();

    assert_eq!(store.get_string("a", "v").unwrap(), r#"say "hi""#);
    assert!(matches!(err, ConfigError::InvalidArgument(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

// ── Line breaks in values ─────────────────────────────────────────────────────

#[test]
fn test_write_rejects_multiline_value_and_creates_no_file() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.file("motd.ini");
    let mut app = Section::new();
    app.insert("motd".to_string(), Value::from("line one\nline two"));
    let mut sections = Sections::new();
    sections.insert("app".to_string(), app);

    // Act
    let err = ConfigStore::new().write(&path, &sections).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::InvalidArgument(_)));
    assert!(!path.exists());
}

#[test]
fn test_set_string_with_line_break_never_reaches_disk() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.file("motd.ini");
    let mut store = ConfigStore::new();
    store.set_path(&path);

    // Act
    let rejected = store.set_string("app", "motd", "a\nb").map(|_| ());
    store.set_string("app", "motd", "a b").unwrap();
    store.save().unwrap();
    let reloaded = ConfigStore::open(&path).unwrap();

    // Assert
    assert!(matches!(rejected, Err(ConfigError::InvalidArgument(_))));
    assert_eq!(reloaded.get_string("app", "motd").unwrap(), "a b");
}

// ── Round-trip edge cases ─────────────────────────────────────────────────────

#[test]
fn test_write_then_load_round_trips_edge_cases() {
    let cases: &[(&str, &str, Value)] = &[
        ("app", "empty", Value::from("")),
        ("app", "semicolon", Value::from("a;b")),
        ("app", "hash", Value::from("#not a comment")),
        ("app", "both", Value::from("x ; y # z")),
        ("app", "padded", Value::from("  padded  ")),
        ("app", "equals", Value::from("a=b:c")),
        ("app", "brackets", Value::from("[x]")),
        ("app", "quoted word", Value::from("yes")),
        ("app", "null word", Value::from("null")),
        ("app", "apostrophe", Value::from("'single'")),
        ("app", "windows path", Value::from(r"C:\tmp\dir")),
        ("app", "unc path", Value::from(r"\\server\share")),
        ("app", "escaped quote", Value::from(r#"say \"hi\""#)),
        ("my section", "my key", Value::from("inner spaces")),
        ("db #2", "key;with#marks", Value::from("v")),
        ("héllo", "wörld", Value::from("ünïcode")),
        ("flags", "on", Value::Bool(true)),
        ("flags", "off", Value::Bool(false)),
    ];

    for (i, (section, key, value)) in cases.iter().enumerate() {
        // Arrange
        let dir = TempDir::new();
        let path = dir.file(&format!("case_{i}.ini"));
        let mut entries = Section::new();
        entries.insert(key.to_string(), value.clone());
        let mut sections = Sections::new();
        sections.insert(section.to_string(), entries);

        // Act
        ConfigStore::new().write(&path, &sections).unwrap();
        let mut reader = ConfigStore::new();
        reader.load(&path).unwrap();

        // Assert
        assert_eq!(
            reader.sections(),
            Some(&sections),
            "[{section}] {key} = {value:?} did not round-trip"
        );
    }
}

#[test]
fn test_set_string_round_trips_edge_cases() {
    let inputs = [
        "",
        "a;b",
        "#hash",
        "  padded  ",
        r"C:\tmp\",
        r"\\server\share",
        r#"say "hi""#,
        "O'Brien",
        "\0nul",
    ];

    for (i, input) in inputs.iter().enumerate() {
        // Arrange
        let dir = TempDir::new();
        let path = dir.file(&format!("string_{i}.ini"));
        let mut store = ConfigStore::new();
        store.set_path(&path);
        store.set_string("app", "value", input).unwrap();

        // Act
        store.save().unwrap();
        let reloaded = ConfigStore::open(&path).unwrap();

        // Assert
        assert_eq!(
            reloaded.get_string("app", "value").unwrap(),
            *input,
            "{input:?} did not round-trip"
        );
    }
}

#[test]
fn test_load_replaces_rather_than_merges() {
    let dir = TempDir::new();
    let path = dir.file("replace.ini");
    std::fs::write(&path, "[fresh]\nk = \"v\"\n").unwrap();
    let mut store = ConfigStore::new();
    store.set("stale", "k", "v").unwrap();

    store.load(&path).unwrap();

    assert!(!store.has_section("stale"));
    assert!(store.has("fresh", "k"));
}

#[test]
fn test_load_missing_file_is_not_found() {
    let dir = TempDir::new();
    let path = dir.file("missing.ini");

    let err = ConfigStore::new().load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::NotFound { path: ref p } if *p == path));
}

#[test]
fn test_load_malformed_file_is_parse_error() {
    let dir = TempDir::new();
    let path = dir.file("bad.ini");
    std::fs::write(&path, "[ok]\nk = \"v\"\n[unterminated\n").unwrap();

    let err = ConfigStore::new().load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { line: 3, .. }));
}

#[test]
fn test_load_non_utf8_file_is_parse_error_and_keeps_state() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.file("binary.ini");
    std::fs::write(&path, [b'[', b'a', b']', b'\n', 0xff, 0xfe]).unwrap();
    let mut store = ConfigStore::new();
    store.set("kept", "k", "v").unwrap();

    // Act
    let err = store.load(&path).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ConfigError::Parse { line: 1, ref message, .. } if message.contains("UTF-8")
    ));
    assert!(store.has("kept", "k"));
    assert_eq!(store.path(), None);
}

#[test]
fn test_bare_literals_in_hand_written_file() {
    let dir = TempDir::new();
    let path = dir.file("hand.ini");
    std::fs::write(
        &path,
        "; hand written\n[server]\nport = 8080\nverbose = On\ncache = off\nname = edge-1 ; comment\n",
    )
    .unwrap();

    let store = ConfigStore::open(&path).unwrap();

    assert_eq!(store.get_string("server", "port").unwrap(), "8080");
    assert!(store.get_bool("server", "verbose").unwrap());
    assert!(!store.get_bool("server", "cache").unwrap());
    assert_eq!(store.get_string("server", "name").unwrap(), "edge-1");
}

#[test]
fn test_open_missing_file_gives_empty_store_without_path() {
    let dir = TempDir::new();

    let store = ConfigStore::open(dir.file("nope.ini")).unwrap();

    assert!(!store.is_initialized());
    assert_eq!(store.path(), None);
    assert!(matches!(store.save(), Err(ConfigError::NoPath)));
}

#[test]
fn test_open_existing_file_remembers_path() {
    let dir = TempDir::new();
    let path = dir.file("present.ini");
    std::fs::write(&path, "[a]\nk = yes\n").unwrap();

    let store = ConfigStore::open(&path).unwrap();

    assert_eq!(store.path(), Some(path.as_path()));
    assert!(store.get_bool("a", "k").unwrap());
}

#[test]
fn test_open_malformed_file_propagates_parse_error() {
    let dir = TempDir::new();
    let path = dir.file("bad.ini");
    std::fs::write(&path, "orphan = \"x\"\n").unwrap();

    assert!(matches!(
        ConfigStore::open(&path),
        Err(ConfigError::Parse { line: 1, .. })
    ));
}

#[test]
fn test_write_into_missing_directory_is_write_error() {
    let dir = TempDir::new();
    let path = dir.file("no/such/dir/app.ini");

    let err = ConfigStore::new().write(&path, &sample_sections()).unwrap_err();

    assert!(matches!(err, ConfigError::Write { .. }));
}

#[test]
fn test_remove_then_save_drops_entries_from_file() {
    let dir = TempDir::new();
    let path = dir.file("remove.ini");
    let mut store = ConfigStore::new();
    store.write(&path, &sample_sections()).unwrap();
    store.load(&path).unwrap();

    store.remove("db", "ssl").unwrap();
    store.remove_section("app").unwrap();
    store.save().unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "\n[db]\nhost = \"localhost\"\nport = \"5432\"\n"
    );
}
