//! snipman - Code Snippet Manager
//!
//! Keeps code snippets in a single JSON file and offers an interactive menu
//! plus one-shot subcommands to add, list, edit, delete, search and show them.
//!
//! - [`models`] - the `Snippet` record and the file-backed `SnippetStore`
//! - [`highlight`] - ordered regex rules that tag keywords, strings, comments
//!   and member access
//! - [`shell`] - the interactive menu loop
//! - [`cli`] - argument parsing and one-shot commands
//! - [`config`] - backing file, editor and color settings

pub mod cli;
pub mod config;
pub mod highlight;
pub mod models;
pub mod shell;
pub mod ui;
