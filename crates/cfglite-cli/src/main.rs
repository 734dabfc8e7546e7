//! `cfglite` — inspect and edit INI configuration files from the shell.
//!
//! # Usage
//!
//! ```text
//! cfglite [--guard-php] [--options <FILE>] <COMMAND>
//!
//! Commands:
//!   get       FILE SECTION KEY [--default V]     print a value (escapes removed)
//!   get-bool  FILE SECTION KEY [--default B]     print `true` / `false`
//!   set       FILE SECTION KEY VALUE [--bool | --escape]
//!   remove    FILE SECTION [KEY]                 remove a key or a whole section
//!   sections  FILE                               list section names
//!   dump      FILE [--json]                      print the whole file
//! ```
//!
//! `set` and `remove` rewrite the file in place.  `set` creates the file if
//! it does not exist yet.
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                              |
//! |-------------------|------------------------------------------|
//! | `CFGLITE_OPTIONS` | Path to a TOML write-options file        |
//! | `RUST_LOG`        | Log filter, e.g. `debug` (default `warn`) |

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use cfglite_core::domain::value::parse_bool_token;
use cfglite_core::{ConfigStore, WriteOptions};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Read and edit INI-style configuration files.
#[derive(Debug, Parser)]
#[command(
    name = "cfglite",
    about = "Read and edit INI-style configuration files",
    version
)]
struct Cli {
    /// Prepend `;<?php exit; ?>` when writing `.php` files.
    #[arg(long, global = true)]
    guard_php: bool,

    /// TOML file with write options (guard rules).
    #[arg(long, global = true, env = "CFGLITE_OPTIONS")]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a value with backslash escapes removed.
    Get {
        file: PathBuf,
        section: String,
        key: String,
        /// Printed when the key is absent.
        #[arg(long)]
        default: Option<String>,
    },
    /// Print a value interpreted as a boolean.
    GetBool {
        file: PathBuf,
        section: String,
        key: String,
        /// Printed when the key is absent or not a boolean.
        #[arg(long)]
        default: Option<bool>,
    },
    /// Set a value and save the file.
    Set {
        file: PathBuf,
        section: String,
        key: String,
        value: String,
        /// Store VALUE as a boolean (written as yes/no).
        #[arg(long = "bool", conflicts_with = "escape")]
        as_bool: bool,
        /// Backslash-escape quotes in VALUE before storing.
        #[arg(long)]
        escape: bool,
    },
    /// Remove a key, or the whole section when KEY is omitted, and save.
    Remove {
        file: PathBuf,
        section: String,
        key: Option<String>,
    },
    /// List section names, one per line.
    Sections { file: PathBuf },
    /// Print the whole configuration.
    Dump {
        file: PathBuf,
        /// Print as JSON instead of INI.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Builds the [`WriteOptions`] from `--options` and `--guard-php`.
    ///
    /// # Errors
    ///
    /// Returns an error if the options file cannot be read or parsed.
    fn write_options(&self) -> anyhow::Result<WriteOptions> {
        let mut options = match &self.options {
            Some(path) => WriteOptions::from_toml_file(path)
                .with_context(|| format!("loading write options from {}", path.display()))?,
            None => WriteOptions::default(),
        };
        if self.guard_php {
            options.guards.extend(WriteOptions::php().guards);
        }
        Ok(options)
    }
}

// ── Command execution ─────────────────────────────────────────────────────────

/// Executes the parsed command and returns what should be printed to stdout.
fn run(cli: Cli) -> anyhow::Result<String> {
    let options = cli.write_options()?;

    match cli.command {
        Command::Get {
            file,
            section,
            key,
            default,
        } => {
            let store = load_existing(&file, options)?;
            let value = match default {
                Some(default) => store.get_string_or(&section, &key, &default),
                None => store
                    .get_string(&section, &key)
                    .with_context(|| format!("reading {}", file.display()))?,
            };
            Ok(format!("{value}\n"))
        }
        Command::GetBool {
            file,
            section,
            key,
            default,
        } => {
            let store = load_existing(&file, options)?;
            let value = match default {
                Some(default) => store.get_bool_or(&section, &key, default),
                None => store
                    .get_bool(&section, &key)
                    .with_context(|| format!("reading {}", file.display()))?,
            };
            Ok(format!("{value}\n"))
        }
        Command::Set {
            file,
            section,
            key,
            value,
            as_bool,
            escape,
        } => {
            let mut store = load_or_create(&file, options)?;
            if as_bool {
                let Some(flag) = parse_bool_token(&value) else {
                    bail!("not a boolean: {value:?} (use 1/0, on/off, true/false, yes/no)");
                };
                store.set(&section, &key, flag)?;
            } else if escape {
                store.set_string(&section, &key, &value)?;
            } else {
                store.set(&section, &key, value)?;
            }
            store
                .save()
                .with_context(|| format!("saving {}", file.display()))?;
            info!("set [{section}] {key} in {}", file.display());
            Ok(String::new())
        }
        Command::Remove { file, section, key } => {
            let mut store = load_existing(&file, options)?;
            match &key {
                Some(key) => store.remove(&section, key)?,
                None => store.remove_section(&section)?,
            }
            store
                .save()
                .with_context(|| format!("saving {}", file.display()))?;
            info!("removed from [{section}] in {}", file.display());
            Ok(String::new())
        }
        Command::Sections { file } => {
            let store = load_existing(&file, options)?;
            Ok(store.section_names().map(|name| format!("{name}\n")).collect())
        }
        Command::Dump { file, json } => {
            let store = load_existing(&file, options)?;
            if json {
                let mut text = serde_json::to_string_pretty(&store.sections())
                    .context("serializing configuration as JSON")?;
                text.push('\n');
                Ok(text)
            } else {
                Ok(store.to_text()?)
            }
        }
    }
}

/// Loads `file`, failing if it does not exist.
fn load_existing(file: &Path, options: WriteOptions) -> anyhow::Result<ConfigStore> {
    let mut store = ConfigStore::with_options(options);
    store
        .load(file)
        .with_context(|| format!("loading {}", file.display()))?;
    Ok(store)
}

/// Loads `file` if present; otherwise starts empty with `file` as save target.
fn load_or_create(file: &Path, options: WriteOptions) -> anyhow::Result<ConfigStore> {
    let mut store = ConfigStore::open_with_options(file, options)
        .with_context(|| format!("loading {}", file.display()))?;
    store.set_path(file);
    Ok(store)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output on stdout can be piped.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(cli)?;
    print!("{output}");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
