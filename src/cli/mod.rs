//! CLI Module for snipman
//! Without a subcommand the interactive menu starts; each subcommand runs a
//! single store operation against the backing file and exits.

pub mod commands;

use crate::config::{Config, Overrides};
use crate::models::{SnippetStore, SnippetUpdate};
use crate::shell::Shell;
use crate::shell::prompt::{CodeInput, Prompter};
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "snipman", version, about = "Manage code snippets from the terminal")]
pub struct Cli {
    /// Snippet file to use instead of the default location
    #[arg(long, global = true, env = "SNIPMAN_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, global = true, env = "SNIPMAN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// List all snippets
    #[command(alias = "ls")]
    List,
    /// Add a snippet; code comes from --code, --code-file or standard input
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        language: String,
        #[arg(long, conflicts_with = "code_file")]
        code: Option<String>,
        #[arg(long, value_name = "FILE")]
        code_file: Option<PathBuf>,
    },
    /// Edit a snippet; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        language: String,
        #[arg(long, default_value = "")]
        code: String,
    },
    /// Delete one snippet
    #[command(alias = "rm")]
    Delete { id: String },
    /// Search titles and languages, ignoring case
    #[command(alias = "find")]
    Search { term: String },
    /// Print a snippet's code with highlighting
    #[command(alias = "cat")]
    Show {
        id: String,
        /// Print bracket tags instead of colors
        #[arg(long)]
        plain: bool,
    },
    /// Delete every snippet
    DeleteAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// How a command ended, for the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    NotFound,
    Refused,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Done
    }
}

/// Executes the parsed command line.
pub fn execute_cli(cli: Cli) -> Result<Outcome> {
    let config = Config::resolve(Overrides {
        file: cli.file,
        config: cli.config,
        no_color: cli.no_color,
    })?;
    if !config.color {
        colored::control::set_override(false);
    }

    let mut store = SnippetStore::open(&config.store_path);
    info!("Using snippet file {}", store.path().display());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        None => {
            let code_input = match config.editor {
                Some(editor) if io::stdin().is_terminal() => CodeInput::Editor(editor),
                _ => CodeInput::Inline,
            };
            let prompter = Prompter::new(io::stdin().lock(), out);
            Shell::new(store, prompter, code_input).run()?;
            Ok(Outcome::Done)
        }
        Some(Cmd::List) => commands::list(&store, &mut out),
        Some(Cmd::Add {
            title,
            language,
            code,
            code_file,
        }) => {
            let code = commands::read_code(code, code_file, io::stdin().lock())?;
            commands::add(&mut store, &mut out, title, language, code)
        }
        Some(Cmd::Edit {
            id,
            title,
            language,
            code,
        }) => {
            let update = SnippetUpdate {
                title,
                language,
                code,
            };
            commands::edit(&mut store, &mut out, &id, update)
        }
        Some(Cmd::Delete { id }) => commands::delete(&mut store, &mut out, &id),
        Some(Cmd::Search { term }) => commands::search(&store, &mut out, &term),
        Some(Cmd::Show { id, plain }) => commands::show(&store, &mut out, &id, plain),
        Some(Cmd::DeleteAll { yes }) => commands::delete_all(&mut store, &mut out, yes),
    }
}
