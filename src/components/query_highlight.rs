//! Syntax highlighting for GBD query text
//!
//! GBD queries are boolean filters over features, e.g.
//! `variables > 5000000 and family = cryptography` or `local like %.xz`.

use crate::model::FeatureOption;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use regex::Regex;
use std::sync::LazyLock;

/// One alternative per token kind; `other` catches anything left
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)(?P<ws>\s+)|(?P<str>'[^']*'?|"[^"]*"?)|(?P<op>!=|<=|>=|=|<|>)|(?P<paren>[()])|(?P<num>-?\d+(?:\.\d+)?)|(?P<word>[A-Za-z_%.][A-Za-z0-9_%.\-]*)|(?P<other>.)"#,
    )
    .expect("token regex is valid")
});

const KEYWORDS: &[&str] = &["and", "or", "like", "unlike"];

/// Token types for GBD query syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Keyword,
    Operator,
    Paren,
    Number,
    String,
    Feature,
    Word,
    Other,
}

impl TokenKind {
    fn style(&self) -> Style {
        match self {
            TokenKind::Keyword => Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            TokenKind::Operator => Style::default().fg(Color::Yellow),
            TokenKind::Paren => Style::default().fg(Color::DarkGray),
            TokenKind::Number => Style::default().fg(Color::LightBlue),
            TokenKind::String => Style::default().fg(Color::Green),
            TokenKind::Feature => Style::default().fg(Color::Cyan),
            TokenKind::Word | TokenKind::Whitespace => Style::default().fg(Color::White),
            TokenKind::Other => Style::default().fg(Color::Red),
        }
    }
}

/// Split a query into classified tokens
pub fn tokenize(query: &str, features: &[FeatureOption]) -> Vec<(TokenKind, String)> {
    TOKEN_REGEX
        .captures_iter(query)
        .filter_map(|caps| {
            let kind = if caps.name("ws").is_some() {
                TokenKind::Whitespace
            } else if caps.name("str").is_some() {
                TokenKind::String
            } else if caps.name("op").is_some() {
                TokenKind::Operator
            } else if caps.name("paren").is_some() {
                TokenKind::Paren
            } else if caps.name("num").is_some() {
                TokenKind::Number
            } else if let Some(word) = caps.name("word") {
                let text = word.as_str();
                if KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(text)) {
                    TokenKind::Keyword
                } else if features.iter().any(|f| f.value == text) {
                    TokenKind::Feature
                } else {
                    TokenKind::Word
                }
            } else {
                TokenKind::Other
            };
            caps.get(0).map(|m| (kind, m.as_str().to_string()))
        })
        .collect()
}

/// Highlight a query as styled spans
pub fn highlight_query(query: &str, features: &[FeatureOption]) -> Vec<Span<'static>> {
    tokenize(query, features)
        .into_iter()
        .map(|(kind, text)| Span::styled(text, kind.style()))
        .collect()
}
