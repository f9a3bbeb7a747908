//! Word tokenizer: alphabetic runs with at most one internal apostrophe group.
//!
//! Offsets are counted in characters, not bytes, so they line up with what
//! an editor reports for the same text.

use regex::Regex;

use crate::types::Token;

use super::syllables::count_syllables;

lazy_static::lazy_static! {
    /// One run of letters, optionally extended by a single `'letters` group.
    static ref WORD_RE: Regex =
        Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?").expect("valid word pattern");
}

/// Lazy iterator over the tokens of a string. See [`tokenize`].
pub struct Tokens<'t> {
    text: &'t str,
    matches: regex::Matches<'static, 't>,
    byte_pos: usize,
    char_pos: usize,
    line: usize,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let m = self.matches.next()?;

        for c in self.text[self.byte_pos..m.start()].chars() {
            self.char_pos += 1;
            if c == '\n' {
                self.line += 1;
            }
        }

        // Matches are pure ASCII, so byte length == char length.
        let word = m.as_str();
        let start = self.char_pos;
        self.char_pos += word.len();
        self.byte_pos = m.end();

        Some(Token {
            text: word.to_string(),
            start,
            end: self.char_pos,
            line: self.line,
            syllables: count_syllables(word),
        })
    }
}

/// Tokenize `text` left to right.
///
/// Offsets and line indices are relative to the start of `text`. Calling
/// again restarts from the beginning.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        text,
        matches: WORD_RE.find_iter(text),
        byte_pos: 0,
        char_pos: 0,
        line: 0,
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of character offset `index`, or `None` past the end.
fn byte_offset(text: &str, index: usize) -> Option<usize> {
    if index == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .nth(index)
}

/// Slice `text` by character offsets `[start, end)`.
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let from = byte_offset(text, start)?;
    let to = byte_offset(text, end)?;
    Some(&text[from..to])
}

/// Keep at most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((b, _)) => &text[..b],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        tokenize(text).map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_basic() {
        let tokens: Vec<Token> = tokenize("I see the light").collect();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].text, "light");
        assert_eq!(tokens[3].start, 10);
        assert_eq!(tokens[3].end, 15);
    }

    #[test]
    fn test_tokenize_empty() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("  12 -- !?").count(), 0);
    }

    #[test]
    fn test_tokenize_apostrophe() {
        assert_eq!(words("don't stop"), vec!["don't", "stop"]);
        assert_eq!(words("rock'n'roll"), vec!["rock'n", "roll"]);
        assert_eq!(words("'cause"), vec!["cause"]);
        assert_eq!(words("dreamin'"), vec!["dreamin"]);
    }

    #[test]
    fn test_tokenize_splits_on_non_letters() {
        assert_eq!(words("well-known x2y"), vec!["well", "known", "x", "y"]);
    }

    #[test]
    fn test_tokenize_line_indices() {
        let tokens: Vec<Token> = tokenize("one two\n\nthree").collect();
        assert_eq!(tokens[0].line, 0);
        assert_eq!(tokens[1].line, 0);
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[2].start, 9);
    }

    #[test]
    fn test_tokenize_char_offsets_after_multibyte() {
        let text = "café ♪ night";
        let tokens: Vec<Token> = tokenize(text).collect();
        // "caf" then "night"; é is not an ASCII letter
        assert_eq!(tokens[0].text, "caf");
        assert_eq!(tokens[1].text, "night");
        assert_eq!(tokens[1].start, 7);
        assert_eq!(char_slice(text, tokens[1].start, tokens[1].end), Some("night"));
    }

    #[test]
    fn test_tokenize_restartable() {
        let text = "again and again";
        let first: Vec<Token> = tokenize(text).collect();
        let second: Vec<Token> = tokenize(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tokenize_syllables_attached() {
        let tokens: Vec<Token> = tokenize("wonderful rhyme").collect();
        assert_eq!(tokens[0].syllables, 3);
        assert_eq!(tokens[1].syllables, 1);
    }

    #[test]
    fn test_char_slice() {
        assert_eq!(char_slice("héllo", 1, 3), Some("él"));
        assert_eq!(char_slice("abc", 0, 3), Some("abc"));
        assert_eq!(char_slice("abc", 2, 2), Some(""));
        assert_eq!(char_slice("abc", 2, 4), None);
        assert_eq!(char_slice("abc", 3, 1), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
