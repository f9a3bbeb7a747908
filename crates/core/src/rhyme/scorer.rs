//! Graded rhyme scoring between two words (0 = no rhyme, 5 = perfect).

use serde::Serialize;

use crate::language::phonetic::{phonetic_tail, split_tail};
use crate::language::syllables::clean_word;

/// Highest possible score.
pub const MAX_SCORE: f64 = 5.0;

/// Default minimum score for two words to count as rhyming.
pub const DEFAULT_THRESHOLD: f64 = 2.0;

lazy_static::lazy_static! {
    /// Vowel spellings that sound close enough for assonance.
    static ref ASSONANCE_GROUPS: Vec<Vec<&'static str>> = vec![
        vec!["oo", "ou", "ew"],
        vec!["ee", "ea", "ie"],
        vec!["ay", "ai", "ey"],
        vec!["iy", "igh", "ie"],
        vec!["oh", "oa", "ow"],
    ];
}

/// Which rule decided a score.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    SameWord,
    TooShort,
    IdenticalTail,
    SameConsonants,
    ConsonantSuffix,
    SharedFinalConsonant,
    VoicingPair,
    VowelOnly,
    Assonance,
    AssonanceFinalConsonant,
    SpellingSuffix,
    NoRhyme,
}

/// Score together with the evidence behind it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RhymeScore {
    pub score: f64,
    pub kind: MatchKind,
    pub tail_a: String,
    pub tail_b: String,
}

impl RhymeScore {
    /// Visual weight in [0, 1].
    pub fn strength(&self) -> f64 {
        (self.score / MAX_SCORE).min(1.0)
    }
}

fn same_group(a: &str, b: &str) -> bool {
    ASSONANCE_GROUPS
        .iter()
        .any(|g| g.contains(&a) && g.contains(&b))
}

fn last_byte(s: &str) -> Option<u8> {
    s.as_bytes().last().copied()
}

fn is_voicing_pair(a: u8, b: u8) -> bool {
    matches!(
        (a.min(b), a.max(b)),
        (b's', b'z') | (b'd', b't') | (b'b', b'p') | (b'g', b'k') | (b'f', b'v')
    )
}

/// Score two consonant codas that follow the same vowel sound.
fn coda_score(ca: &str, cb: &str) -> (f64, MatchKind) {
    if ca == cb {
        return (5.0, MatchKind::SameConsonants);
    }
    if !ca.is_empty() && !cb.is_empty() && (ca.ends_with(cb) || cb.ends_with(ca)) {
        let score = if ca.len().abs_diff(cb.len()) == 1 { 4.25 } else { 4.0 };
        return (score, MatchKind::ConsonantSuffix);
    }
    match (last_byte(ca), last_byte(cb)) {
        (Some(x), Some(y)) if x == y => (3.75, MatchKind::SharedFinalConsonant),
        (Some(x), Some(y)) if is_voicing_pair(x, y) => (3.25, MatchKind::VoicingPair),
        _ => (2.5, MatchKind::VowelOnly),
    }
}

fn raw_suffix(word: &str, n: usize) -> &str {
    &word[word.len().saturating_sub(n)..]
}

/// A word reduced to the parts scoring looks at.
///
/// Build once per token when the same word is compared many times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordForm {
    pub clean: String,
    pub tail: String,
}

impl WordForm {
    pub fn new(word: &str) -> Self {
        let clean = clean_word(word);
        let tail = phonetic_tail(&clean);
        Self { clean, tail }
    }
}

fn rate(a: &WordForm, b: &WordForm) -> (f64, MatchKind) {
    let (wa, wb) = (&a.clean, &b.clean);
    if wa == wb {
        return (0.0, MatchKind::SameWord);
    }
    if wa.len() < 2 || wb.len() < 2 {
        return (0.0, MatchKind::TooShort);
    }
    if a.tail == b.tail {
        let score = match a.tail.len() {
            n if n >= 3 => 5.0,
            2 => 4.5,
            _ => 3.5,
        };
        return (score, MatchKind::IdenticalTail);
    }

    let (va, ca) = split_tail(&a.tail);
    let (vb, cb) = split_tail(&b.tail);
    if !va.is_empty() && va == vb {
        return coda_score(ca, cb);
    }
    if !va.is_empty() && !vb.is_empty() && same_group(va, vb) {
        if ca == cb {
            return (2.0, MatchKind::Assonance);
        }
        if last_byte(ca).is_some() && last_byte(ca) == last_byte(cb) {
            return (1.5, MatchKind::AssonanceFinalConsonant);
        }
    }

    if raw_suffix(wa, 3) == raw_suffix(wb, 3) {
        (2.0, MatchKind::SpellingSuffix)
    } else if raw_suffix(wa, 2) == raw_suffix(wb, 2) {
        (1.5, MatchKind::SpellingSuffix)
    } else {
        (0.0, MatchKind::NoRhyme)
    }
}

/// Score two prepared forms.
pub fn score_forms(a: &WordForm, b: &WordForm) -> f64 {
    rate(a, b).0
}

/// Score two words and report which rule fired.
pub fn explain(a: &str, b: &str) -> RhymeScore {
    let fa = WordForm::new(a);
    let fb = WordForm::new(b);
    let (score, kind) = rate(&fa, &fb);
    RhymeScore {
        score,
        kind,
        tail_a: fa.tail,
        tail_b: fb.tail,
    }
}

/// Rhyme score in `[0, 5]`. Symmetric; a word never rhymes with itself.
pub fn score(a: &str, b: &str) -> f64 {
    explain(a, b).score
}

/// True if the score reaches `threshold`.
pub fn rhymes(a: &str, b: &str, threshold: f64) -> bool {
    score(a, b) >= threshold
}

/// Score scaled to `[0, 1]`.
pub fn strength(a: &str, b: &str) -> f64 {
    explain(a, b).strength()
}
