//! Heading detection for plain-text paper bodies.
//!
//! Heuristic, not a grammar: whole-line matches against the well-known
//! section names become level-1 headings, short capitalized phrases without
//! punctuation other than commas become level-2 headings, and everything
//! else is body text.

use regex_lite::Regex;
use std::sync::LazyLock;

const SECTION_NAMES: [&str; 4] = ["title", "abstract", "introduction", "conclusion"];

static CAPITALIZED_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z\s,]+$").expect("heading pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading1,
    Heading2,
    Paragraph,
}

/// Classify one already-trimmed, non-blank line.
pub fn classify_line(line: &str) -> LineKind {
    let lowered = line.to_lowercase();
    if SECTION_NAMES.contains(&lowered.as_str()) {
        LineKind::Heading1
    } else if CAPITALIZED_PHRASE.is_match(line) {
        LineKind::Heading2
    } else {
        LineKind::Paragraph
    }
}

/// Split `body` into trimmed, non-blank, classified lines.
pub fn classify_body(body: &str) -> Vec<(LineKind, &str)> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| (classify_line(line), line))
        .collect()
}
