//! Terminal color palette
//! Basic ANSI colors so output stays readable on light and dark themes alike.

use crate::highlight::TokenKind;
use colored::Color;

pub struct Palette;

impl Palette {
    pub const KEYWORD: Color = Color::Blue;
    pub const STRING: Color = Color::Green;
    pub const COMMENT: Color = Color::BrightBlack;
    pub const MEMBER: Color = Color::Yellow;

    pub const ACCENT: Color = Color::BrightMagenta;
    pub const SUCCESS: Color = Color::Green;
    pub const FAILURE: Color = Color::Red;
    pub const NOTICE: Color = Color::Yellow;
    pub const BANNER: Color = Color::TrueColor {
        r: 255,
        g: 136,
        b: 0,
    };

    pub fn color_for(kind: TokenKind) -> Color {
        match kind {
            TokenKind::Keyword => Self::KEYWORD,
            TokenKind::String => Self::STRING,
            TokenKind::Comment => Self::COMMENT,
            TokenKind::Member => Self::MEMBER,
        }
    }
}
