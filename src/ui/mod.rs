//! Terminal presentation helpers shared by the interactive shell and the
//! one-shot CLI commands.

pub mod colors;
pub mod format;

/// Removes SGR color sequences so tests can compare rendered text exactly.
#[cfg(test)]
pub fn strip_ansi(text: &str) -> String {
    let sgr = regex::Regex::new("\x1b\\[[0-9;]*m").unwrap();
    sgr.replace_all(text, "").into_owned()
}
