use crate::models::Snippet;
use crate::ui::colors::Palette;
use colored::Colorize;

/// `#<id>: <title> - Language: <language>`
pub fn snippet_line(snippet: &Snippet) -> String {
    format!(
        "{}: {} - Language: {}",
        format!("#{}", snippet.id).color(Palette::ACCENT),
        snippet.title.bold(),
        snippet.language
    )
}

pub fn count_line(count: usize) -> String {
    let noun = if count == 1 { "snippet" } else { "snippets" };
    format!("{count} {noun} found.")
}

/// Header printed above the highlighted code of one snippet.
pub fn code_header(snippet: &Snippet) -> String {
    let lines = snippet.line_count();
    format!(
        "{} {} ({}, {} {})",
        "──".color(Palette::ACCENT),
        snippet.title.bold(),
        snippet.language,
        lines,
        if lines == 1 { "line" } else { "lines" }
    )
}
