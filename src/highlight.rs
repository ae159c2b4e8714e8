//! Regex-driven code highlighting
//!
//! Highlighting is a fixed-order table of `(pattern, kind)` rules. Each rule
//! claims byte spans of the input; later rules only ever claim text that no
//! earlier rule owns, so a keyword spelled inside a string stays part of the
//! string. This is a heuristic, not a tokenizer: odd quoting can still throw
//! it off.

use crate::ui::colors::Palette;
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Range;

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "let", "const", "var", "function", "return", "if", "else", "for", "while", "do", "switch",
    "case", "break", "continue",
];

const STRING_PATTERN: &str = r#""[^"]*"|'[^']*'"#;
const BLOCK_COMMENT_PATTERN: &str = r"(?s)/\*.*?\*/";
const LINE_COMMENT_PATTERN: &str = r"//[^\n]*";
const MEMBER_PATTERN: &str = r"\.\w+";

static STANDARD: Lazy<Highlighter> = Lazy::new(|| {
    Highlighter::with_keywords(DEFAULT_KEYWORDS).expect("built-in highlight patterns compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    String,
    Comment,
    Member,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::String => "string",
            TokenKind::Comment => "comment",
            TokenKind::Member => "member",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HighlightRule {
    kind: TokenKind,
    pattern: Regex,
}

impl HighlightRule {
    pub fn new(kind: TokenKind, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            kind,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Whole-word match on any of `keywords`.
    pub fn keywords(keywords: &[&str]) -> Result<Self, regex::Error> {
        let alternatives = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(TokenKind::Keyword, &format!(r"\b(?:{alternatives})\b"))
    }
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    rules: Vec<HighlightRule>,
}

impl Highlighter {
    /// Rules are applied in the given order; earlier rules win overlaps.
    pub fn new(rules: Vec<HighlightRule>) -> Self {
        Self { rules }
    }

    /// The standard rule order: strings, keywords, block comments, line
    /// comments, member access.
    pub fn with_keywords(keywords: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            HighlightRule::new(TokenKind::String, STRING_PATTERN)?,
            HighlightRule::keywords(keywords)?,
            HighlightRule::new(TokenKind::Comment, BLOCK_COMMENT_PATTERN)?,
            HighlightRule::new(TokenKind::Comment, LINE_COMMENT_PATTERN)?,
            HighlightRule::new(TokenKind::Member, MEMBER_PATTERN)?,
        ]))
    }

    pub fn highlight<'a>(&self, code: &'a str) -> Highlighted<'a> {
        let mut spans = SpanMap::new();

        for rule in &self.rules {
            let mut pos = 0;
            while pos <= code.len() {
                let Some(m) = rule.pattern.find_at(code, pos) else {
                    break;
                };
                if m.is_empty() || !spans.is_claimable(m.range()) {
                    // Retry one character on so a match starting later can still land.
                    pos = m.start() + code[m.start()..].chars().next().map_or(1, char::len_utf8);
                    continue;
                }
                spans.claim(m.range(), rule.kind);
                pos = m.end();
            }
        }

        Highlighted::from_spans(code, spans.0.values())
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        STANDARD.clone()
    }
}

/// Highlights `code` with the standard rule table.
pub fn highlight_code(code: &str) -> Highlighted<'_> {
    STANDARD.highlight(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
    kind: TokenKind,
}

/// Non-overlapping spans keyed by start offset.
struct SpanMap(BTreeMap<usize, Span>);

impl SpanMap {
    fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A match may enclose earlier spans but must not start or end inside one.
    fn is_claimable(&self, range: Range<usize>) -> bool {
        if let Some((_, s)) = self.0.range(..=range.start).next_back() {
            let overlaps_start = s.end > range.start;
            if overlaps_start && (s.start < range.start || range.end <= s.end) {
                return false;
            }
        }
        match self.0.range(..range.end).next_back() {
            Some((_, s)) => s.end <= range.end,
            None => true,
        }
    }

    /// Claims the parts of `range` not already owned by an earlier span.
    fn claim(&mut self, range: Range<usize>, kind: TokenKind) {
        let mut gaps = Vec::new();
        let mut cursor = range.start;
        for s in self.0.range(range.start..range.end).map(|(_, s)| s) {
            if s.start > cursor {
                gaps.push(Span {
                    start: cursor,
                    end: s.start,
                    kind,
                });
            }
            cursor = s.end;
        }
        if cursor < range.end {
            gaps.push(Span {
                start: cursor,
                end: range.end,
                kind,
            });
        }
        for gap in gaps {
            self.0.insert(gap.start, gap);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: Option<TokenKind>,
    pub text: &'a str,
}

/// Source text split into plain and highlighted segments. Concatenating the
/// segment texts gives back the input unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Highlighted<'a> {
    fn from_spans<'s>(code: &'a str, spans: impl ExactSizeIterator<Item = &'s Span>) -> Self {
        let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0;
        for span in spans {
            if span.start > cursor {
                segments.push(Segment {
                    kind: None,
                    text: &code[cursor..span.start],
                });
            }
            segments.push(Segment {
                kind: Some(span.kind),
                text: &code[span.start..span.end],
            });
            cursor = span.end;
        }
        if cursor < code.len() {
            segments.push(Segment {
                kind: None,
                text: &code[cursor..],
            });
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Terminal rendering. Honors `colored`'s global switch, so output is
    /// plain when color is disabled.
    pub fn to_ansi(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment.kind {
                Some(kind) => segment.text.color(Palette::color_for(kind)).to_string(),
                None => segment.text.to_string(),
            })
            .collect()
    }

    /// Bracket-tag rendering, e.g. `[keyword]const[/keyword] x`.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment.kind {
                Some(kind) => {
                    out.push_str(&format!("[{0}]{1}[/{0}]", kind.name(), segment.text));
                }
                None => out.push_str(segment.text),
            }
        }
        out
    }
}
