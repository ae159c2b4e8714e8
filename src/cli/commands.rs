use super::Outcome;
use crate::highlight::highlight_code;
use crate::models::{SnippetStore, SnippetUpdate, parse_id};
use crate::ui::colors::Palette;
use crate::ui::format::{code_header, count_line, snippet_line};
use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

fn margin() -> ColoredString {
    "┃".color(Palette::ACCENT)
}

fn not_found(out: &mut impl Write, id: &str) -> Result<Outcome> {
    writeln!(out, "{}  No snippet found with id: {}", margin(), id.trim())?;
    Ok(Outcome::NotFound)
}

/// Picks the code for `add`: the flag, then the file, then whatever is piped
/// on standard input.
pub fn read_code(
    code: Option<String>,
    code_file: Option<PathBuf>,
    mut stdin: impl Read,
) -> Result<String> {
    if let Some(code) = code {
        return Ok(code);
    }
    if let Some(path) = code_file {
        return fs::read_to_string(&path)
            .with_context(|| format!("Failed to read code file {}", path.display()));
    }
    let mut code = String::new();
    stdin
        .read_to_string(&mut code)
        .context("Failed to read code from standard input")?;
    Ok(code)
}

pub fn list(store: &SnippetStore, out: &mut impl Write) -> Result<Outcome> {
    if store.is_empty() {
        writeln!(out, "{}  No snippets stored yet.", margin())?;
        return Ok(Outcome::Done);
    }
    for snippet in store.list() {
        writeln!(out, "{}  {}", margin(), snippet_line(snippet))?;
    }
    writeln!(out, "{}  {}", margin(), count_line(store.len()).color(Palette::NOTICE))?;
    Ok(Outcome::Done)
}

pub fn add(
    store: &mut SnippetStore,
    out: &mut impl Write,
    title: String,
    language: String,
    code: String,
) -> Result<Outcome> {
    let snippet = store.add(title, language, code)?;
    writeln!(
        out,
        "{}  {} {}",
        margin(),
        "Snippet added:".color(Palette::SUCCESS),
        snippet_line(snippet)
    )?;
    Ok(Outcome::Done)
}

pub fn edit(
    store: &mut SnippetStore,
    out: &mut impl Write,
    id: &str,
    update: SnippetUpdate,
) -> Result<Outcome> {
    let Some(id_value) = parse_id(id) else {
        return not_found(out, id);
    };
    match store.update(id_value, update)? {
        Some(snippet) => {
            writeln!(
                out,
                "{}  {} {}",
                margin(),
                "Snippet updated:".color(Palette::SUCCESS),
                snippet_line(snippet)
            )?;
            Ok(Outcome::Done)
        }
        None => not_found(out, id),
    }
}

pub fn delete(store: &mut SnippetStore, out: &mut impl Write, id: &str) -> Result<Outcome> {
    let Some(id_value) = parse_id(id) else {
        return not_found(out, id);
    };
    match store.delete(id_value)? {
        Some(removed) => {
            writeln!(
                out,
                "{}  {} {}",
                margin(),
                "Snippet deleted:".color(Palette::SUCCESS),
                snippet_line(&removed)
            )?;
            Ok(Outcome::Done)
        }
        None => not_found(out, id),
    }
}

pub fn search(store: &SnippetStore, out: &mut impl Write, term: &str) -> Result<Outcome> {
    let results = store.search(term);

    writeln!(
        out,
        "{}  {} '{}'",
        margin(),
        "SEARCH RESULTS FOR".bold(),
        term.bright_white()
    )?;
    if results.is_empty() {
        writeln!(out, "{}  No snippets found matching: {}", margin(), term)?;
        return Ok(Outcome::Done);
    }

    for snippet in &results {
        writeln!(out, "{}  {}", margin(), snippet_line(snippet))?;
    }
    writeln!(out, "{}  {}", margin(), count_line(results.len()).color(Palette::NOTICE))?;
    Ok(Outcome::Done)
}

pub fn show(store: &SnippetStore, out: &mut impl Write, id: &str, plain: bool) -> Result<Outcome> {
    let Some(snippet) = parse_id(id).and_then(|id| store.find(id)) else {
        return not_found(out, id);
    };

    let highlighted = highlight_code(&snippet.code);
    let body = if plain {
        highlighted.to_markup()
    } else {
        highlighted.to_ansi()
    };
    writeln!(out, "{}", code_header(snippet))?;
    writeln!(out, "{body}")?;
    Ok(Outcome::Done)
}

pub fn delete_all(
    store: &mut SnippetStore,
    out: &mut impl Write,
    confirmed: bool,
) -> Result<Outcome> {
    if !confirmed {
        writeln!(
            out,
            "{}  Refusing to delete {} snippets without --yes",
            margin(),
            store.len()
        )?;
        return Ok(Outcome::Refused);
    }

    let removed = store.delete_all()?;
    writeln!(
        out,
        "{}  {}",
        margin(),
        format!("Deleted all {removed} snippets.").color(Palette::SUCCESS)
    )?;
    Ok(Outcome::Done)
}
