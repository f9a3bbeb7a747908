//! Heuristic syllable counting.
//!
//! Counts vowel clusters with two corrections (silent final `e`, unvoiced
//! `-ed`). This is an approximation, not a dictionary lookup: "people"
//! and "fire" both come out as 1. Downstream totals depend on the exact
//! output, so the rules must not drift.

/// Lower-case `word` and drop everything that is not an ASCII letter.
pub fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

/// Number of maximal `[aeiouy]+` runs in an ASCII-lowercase word.
pub(crate) fn vowel_groups(word: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for &c in word.as_bytes() {
        let v = is_vowel(c);
        if v && !in_group {
            groups += 1;
        }
        in_group = v;
    }
    groups
}

/// Estimate the syllable count of a single word. Always returns at least 1.
pub fn count_syllables(word: &str) -> usize {
    let clean = clean_word(word);
    if clean.len() <= 3 {
        return 1;
    }

    let groups = vowel_groups(&clean);
    if groups == 0 {
        return 1;
    }

    let mut count = groups as isize;

    if clean.ends_with('e') && clean.len() > 2 {
        count -= 1;
    }

    if clean.ends_with("ed") && !clean.ends_with("ted") && !clean.ends_with("ded") {
        count -= 1;
    }

    count.max(1) as usize
}
