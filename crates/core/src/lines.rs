//! Per-line word lists and syllable totals for the editor gutter.

use serde::Serialize;

use crate::language::brackets::scan_brackets;
use crate::language::tokenize::tokenize;
use crate::types::{AccentTier, Token};

/// One line of a document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineSummary {
    /// Zero-based line number
    pub index: usize,
    /// Character offset of the first character of the line
    pub start: usize,
    pub text: String,
    /// Words outside bracket regions
    pub words: Vec<Token>,
    /// Sum of `words` syllables
    pub syllables: usize,
}

/// Split `document` on `\n` and summarize each line.
///
/// Bracketed words are left out of `words` and add nothing to `syllables`.
/// An empty document has a single empty line.
pub fn analyze_lines(document: &str) -> Vec<LineSummary> {
    let brackets = scan_brackets(document);
    let mut lines: Vec<LineSummary> = Vec::new();
    let mut start = 0;
    for (index, text) in document.split('\n').enumerate() {
        lines.push(LineSummary {
            index,
            start,
            text: text.to_string(),
            words: Vec::new(),
            syllables: 0,
        });
        start += text.chars().count() + 1;
    }

    for token in tokenize(document) {
        if brackets.overlaps(token.start, token.end) {
            continue;
        }
        if let Some(line) = lines.get_mut(token.line) {
            line.syllables += token.syllables;
            line.words.push(token);
        }
    }
    lines
}

/// Default emphasis for a hand-placed mark: longer words weigh more.
pub fn accent_for_syllables(syllables: usize) -> AccentTier {
    match syllables {
        0 | 1 => AccentTier::Low,
        2 => AccentTier::Medium,
        _ => AccentTier::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_totals() {
        let lines = analyze_lines("I see the light\nShining so bright");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].syllables, 4);
        assert_eq!(lines[1].syllables, 4);
        assert_eq!(lines[1].start, 16);
        assert_eq!(lines[1].words[0].text, "Shining");
    }

    #[test]
    fn test_brackets_contribute_nothing() {
        let lines = analyze_lines("[Chorus]\nwonderful [wonderful] day");
        assert_eq!(lines[0].syllables, 0);
        assert!(lines[0].words.is_empty());
        assert_eq!(lines[1].syllables, 4);
        assert_eq!(lines[1].words.len(), 2);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        let lines = analyze_lines("");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].syllables, 0);

        let lines = analyze_lines("la\n\nla\n");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].syllables, 0);
        assert_eq!(lines[2].start, 4);
        assert_eq!(lines[3].text, "");
    }

    #[test]
    fn test_multibyte_line_starts() {
        let lines = analyze_lines("café\nnight");
        assert_eq!(lines[1].start, 5);
        assert_eq!(lines[1].words[0].start, 5);
    }

    #[test]
    fn test_accent_for_syllables() {
        assert_eq!(accent_for_syllables(1), AccentTier::Low);
        assert_eq!(accent_for_syllables(2), AccentTier::Medium);
        assert_eq!(accent_for_syllables(3), AccentTier::High);
        assert_eq!(accent_for_syllables(7), AccentTier::High);
    }
}
