//! Dictionary-free phonetic normalization of English word endings.
//!
//! A word is rewritten by an ordered table of grapheme rules into a coarse
//! sound spelling ("light" -> "liyt", "place" -> "plays"), then the
//! rhyme-relevant tail (last vowel sound plus trailing consonants) is cut
//! from the right. Sound tokens reuse vowel letters so the tail can be
//! found with a plain vowel-group match:
//!
//! | token | sound           | token | sound          |
//! |-------|-----------------|-------|----------------|
//! | `ay`  | long a (rain)   | `oh`  | long o (most)  |
//! | `ee`  | long e (dream)  | `oo`  | long u (true)  |
//! | `iy`  | long i (light)  | `aer` | r-colored (care) |
//!
//! Order matters: several rules only make sense once earlier ones fired.

use regex::Regex;

use super::syllables::clean_word;

/// One grapheme rewrite step.
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Replace every occurrence.
    Any(&'static str, &'static str),
    /// Replace at the start of the word only.
    Prefix(&'static str, &'static str),
    /// Replace at the end of the word only.
    Suffix(&'static str, &'static str),
    /// Like `Suffix`, but only on words ending in one of the listed spellings.
    Listed(&'static [&'static str], &'static str, &'static str),
    /// Replace occurrences not followed by a vowel letter.
    Closed(&'static str, &'static str),
    /// Word-initial `y` before a vowel is a consonant.
    InitialY,
    /// `c` is `s` before e/i/y, `k` elsewhere (`ch` untouched).
    SoftC,
    /// Final `s` after a voiced sound is `z`.
    VoicedS,
    /// Vowel + consonant + silent `e` (optionally + s/z/d) is a long vowel.
    MagicE,
    /// Drop a final silent `e` after a consonant.
    SilentE,
    /// Final consonant + `y`: long i in one-vowel words, long e otherwise.
    FinalY,
    /// Doubled consonants sound once.
    Collapse,
}

lazy_static::lazy_static! {
    static ref RULES: Vec<Rule> = vec![
        // Long o in "most", "ghost"; "cost" and "frost" stay short
        Rule::Listed(&["most", "host", "post"], "ost", "ohst"),
        // Silent word-initial letters
        Rule::Prefix("kn", "n"),
        Rule::Prefix("wr", "r"),
        Rule::Prefix("gn", "n"),
        Rule::Prefix("ps", "s"),
        Rule::Prefix("wh", "w"),
        Rule::Prefix("gh", "g"),
        Rule::InitialY,
        // Irregular endings, before soft c and magic e see them
        Rule::Suffix("come", "kum"),
        Rule::Suffix("some", "sum"),
        Rule::Suffix("ove", "uv"),
        // gh clusters: "eigh" before "igh", "ought" before "ough"
        Rule::Any("eigh", "ay"),
        Rule::Any("ought", "awt"),
        Rule::Suffix("ough", "oh"),
        Rule::Any("igh", "iy"),
        Rule::Suffix("gh", "f"),
        Rule::Suffix("mb", "m"),
        Rule::Suffix("mn", "m"),
        Rule::Suffix("ign", "iyn"),
        // r-colored vowels, ahead of the digraphs they contain
        Rule::Any("air", "aer"),
        Rule::Suffix("are", "aer"),
        Rule::Any("ear", "eer"),
        Rule::Suffix("ere", "eer"),
        Rule::Suffix("ire", "iyr"),
        Rule::Suffix("ore", "or"),
        Rule::Suffix("ure", "oor"),
        Rule::Any("our", "or"),
        Rule::Closed("ir", "er"),
        Rule::Closed("ur", "er"),
        // Consonant digraphs
        Rule::Any("tion", "shun"),
        Rule::Any("sion", "shun"),
        Rule::Any("tch", "ch"),
        Rule::Any("dge", "j"),
        Rule::Any("ck", "k"),
        Rule::Any("ph", "f"),
        Rule::Any("qu", "kw"),
        Rule::Any("x", "ks"),
        Rule::SoftC,
        // Plural/possessive voicing; must see the spelling before magic e
        // turns "place" into "plays"
        Rule::VoicedS,
        // Long o before "ld", then magic e and digraphs
        Rule::Any("old", "ohld"),
        Rule::MagicE,
        Rule::SilentE,
        Rule::Any("ea", "ee"),
        Rule::Suffix("ie", "iy"),
        Rule::Any("ie", "ee"),
        Rule::Any("ai", "ay"),
        Rule::Any("oa", "oh"),
        Rule::Suffix("oe", "oh"),
        Rule::Any("ew", "oo"),
        Rule::Suffix("ue", "oo"),
        Rule::Any("au", "aw"),
        Rule::Any("oi", "oy"),
        Rule::FinalY,
        // After voicing, which has to see the "ss" in "kiss"
        Rule::Collapse,
    ];

    /// Last vowel group and everything after it. `oh` is one vowel sound.
    static ref TAIL_RE: Regex =
        Regex::new(r"(?:oh|[aeiouy])+[^aeiouy]*$").expect("valid tail pattern");
}

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

/// Vowel without `y`; used where `y` acts as a consonant.
fn is_pure_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn long_vowel(v: u8) -> &'static str {
    match v {
        b'a' => "ay",
        b'e' => "ee",
        b'i' | b'y' => "iy",
        b'o' => "oh",
        _ => "oo",
    }
}

impl Rule {
    fn apply(self, word: String) -> String {
        match self {
            Rule::Any(from, to) => word.replace(from, to),
            Rule::Prefix(from, to) => match word.strip_prefix(from) {
                Some(rest) => format!("{to}{rest}"),
                None => word,
            },
            Rule::Suffix(from, to) => match word.strip_suffix(from) {
                Some(rest) => format!("{rest}{to}"),
                None => word,
            },
            Rule::Listed(endings, from, to) => {
                if endings.iter().any(|e| word.ends_with(e)) {
                    Rule::Suffix(from, to).apply(word)
                } else {
                    word
                }
            }
            Rule::Closed(from, to) => replace_closed(&word, from, to),
            Rule::InitialY => {
                let b = word.as_bytes();
                if b.len() > 1 && b[0] == b'y' && is_pure_vowel(b[1]) {
                    format!("j{}", &word[1..])
                } else {
                    word
                }
            }
            Rule::SoftC => soften_c(&word),
            Rule::VoicedS => voice_final_s(word),
            Rule::MagicE => magic_e(word),
            Rule::SilentE => drop_silent_e(word),
            Rule::FinalY => final_y(word),
            Rule::Collapse => collapse_doubles(&word),
        }
    }
}

fn replace_closed(word: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(word.len() + 2);
    let mut i = 0;
    while i < word.len() {
        let rest = &word[i..];
        if rest.starts_with(from) {
            let after = rest.as_bytes().get(from.len()).copied();
            if !after.is_some_and(is_vowel) {
                out.push_str(to);
                i += from.len();
                continue;
            }
        }
        out.push_str(&rest[..1]);
        i += 1;
    }
    out
}

fn soften_c(word: &str) -> String {
    let b = word.as_bytes();
    let mut out = String::with_capacity(word.len());
    for (i, &c) in b.iter().enumerate() {
        if c != b'c' {
            out.push(c as char);
            continue;
        }
        match b.get(i + 1) {
            Some(b'h') => out.push('c'),
            Some(b'e' | b'i' | b'y') => out.push('s'),
            _ => out.push('k'),
        }
    }
    out
}

fn voice_final_s(mut word: String) -> String {
    let b = word.as_bytes();
    let n = b.len();
    if n >= 4
        && b[n - 1] == b's'
        && matches!(
            b[n - 2],
            b'b' | b'd' | b'g' | b'l' | b'm' | b'n' | b'r' | b'v' | b'w' | b'y' | b'e'
        )
    {
        word.pop();
        word.push('z');
    }
    word
}

fn magic_e(word: String) -> String {
    let b = word.as_bytes();
    let n = b.len();
    // "time", "times" (already voiced to "timez"), "named"
    let (core, extra) = if n >= 2 && b[n - 2] == b'e' && matches!(b[n - 1], b's' | b'z' | b'd') {
        (n - 1, Some(b[n - 1] as char))
    } else if n >= 1 && b[n - 1] == b'e' {
        (n, None)
    } else {
        return word;
    };
    if core < 3 {
        return word;
    }
    let v = b[core - 3];
    let c = b[core - 2];
    if !is_vowel(v) || is_vowel(c) || matches!(c, b'r' | b'w' | b'x') {
        return word;
    }
    if core >= 4 && is_pure_vowel(b[core - 4]) {
        return word;
    }
    let mut out = String::with_capacity(n + 2);
    out.push_str(&word[..core - 3]);
    out.push_str(long_vowel(v));
    out.push(c as char);
    if let Some(e) = extra {
        out.push(e);
    }
    out
}

fn drop_silent_e(mut word: String) -> String {
    let b = word.as_bytes();
    let n = b.len();
    if n >= 3 && b[n - 1] == b'e' && !is_vowel(b[n - 2]) && b[..n - 2].iter().any(|&c| is_vowel(c)) {
        word.pop();
    }
    word
}

fn final_y(mut word: String) -> String {
    let b = word.as_bytes();
    let n = b.len();
    if n < 2 || b[n - 1] != b'y' || is_pure_vowel(b[n - 2]) || b[n - 2] == b'y' {
        return word;
    }
    let single_vowel = !b[..n - 1].iter().any(|&c| is_pure_vowel(c));
    word.pop();
    word.push_str(if single_vowel { "iy" } else { "ee" });
    word
}

fn collapse_doubles(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev: Option<char> = None;
    for c in word.chars() {
        if prev == Some(c) && !is_vowel(c as u8) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Full rewritten sound spelling of a word (cleaned, all rules applied).
///
/// Words shorter than 2 letters are returned cleaned but unrewritten.
pub fn phonetic_key(word: &str) -> String {
    let clean = clean_word(word);
    if clean.len() < 2 {
        return clean;
    }
    RULES.iter().fold(clean, |w, rule| rule.apply(w))
}

/// The rhyme-relevant tail of a word: last vowel sound + trailing consonants.
///
/// Falls back to the last 3 letters of the cleaned word when the rewritten
/// form has no vowel group, and to the cleaned word itself below 2 letters.
pub fn phonetic_tail(word: &str) -> String {
    let clean = clean_word(word);
    if clean.len() < 2 {
        return clean;
    }
    let key = RULES.iter().fold(clean.clone(), |w, rule| rule.apply(w));
    match TAIL_RE.find(&key) {
        Some(m) => m.as_str().to_string(),
        None => clean[clean.len().saturating_sub(3)..].to_string(),
    }
}

/// Split a tail into its leading vowel cluster and trailing consonants.
///
/// The long-o token `oh` stays in the vowel cluster.
pub fn split_tail(tail: &str) -> (&str, &str) {
    let b = tail.as_bytes();
    let mut at = 0;
    while at < b.len() {
        if b[at..].starts_with(b"oh") {
            at += 2;
        } else if is_vowel(b[at]) {
            at += 1;
        } else {
            break;
        }
    }
    tail.split_at(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_igh_words() {
        assert_eq!(phonetic_key("light"), "liyt");
        assert_eq!(phonetic_tail("light"), "iyt");
        assert_eq!(phonetic_tail("Bright!"), "iyt");
        assert_eq!(phonetic_tail("high"), "iy");
    }

    #[test]
    fn test_eigh_before_igh() {
        assert_eq!(phonetic_key("weigh"), "way");
        assert_eq!(phonetic_tail("eight"), "ayt");
    }

    #[test]
    fn test_magic_e() {
        assert_eq!(phonetic_tail("time"), "iym");
        assert_eq!(phonetic_tail("rhyme"), "iym");
        assert_eq!(phonetic_tail("plane"), "ayn");
        assert_eq!(phonetic_tail("home"), "ohm");
        assert_eq!(phonetic_tail("cute"), "oot");
    }

    #[test]
    fn test_magic_e_with_plural_and_past() {
        assert_eq!(phonetic_tail("times"), "iymz");
        assert_eq!(phonetic_tail("named"), "aymd");
    }

    #[test]
    fn test_vowel_digraphs() {
        assert_eq!(phonetic_tail("rain"), "ayn");
        assert_eq!(phonetic_tail("dream"), "eem");
        assert_eq!(phonetic_tail("boat"), "oht");
        assert_eq!(phonetic_tail("true"), "oo");
        assert_eq!(phonetic_tail("flew"), "oo");
    }

    #[test]
    fn test_r_colored() {
        assert_eq!(phonetic_tail("care"), "aer");
        assert_eq!(phonetic_tail("hair"), "aer");
        assert_eq!(phonetic_tail("fire"), "iyr");
        assert_eq!(phonetic_tail("near"), "eer");
        assert_eq!(phonetic_tail("bird"), "erd");
        assert_eq!(phonetic_tail("more"), "or");
    }

    #[test]
    fn test_soft_c_then_magic_e() {
        assert_eq!(phonetic_key("place"), "plays");
        assert_eq!(phonetic_tail("space"), "ays");
        assert_eq!(phonetic_key("back"), "bak");
    }

    #[test]
    fn test_plural_voicing() {
        assert_eq!(phonetic_tail("dogs"), "ogz");
        assert_eq!(phonetic_tail("dog's"), "ogz");
        assert_eq!(phonetic_tail("cats"), "ats");
        assert_eq!(phonetic_tail("kiss"), "is");
        assert_eq!(phonetic_tail("dreams"), "eemz");
    }

    #[test]
    fn test_long_o_clusters() {
        assert_eq!(phonetic_tail("most"), "ohst");
        assert_eq!(phonetic_tail("ghost"), "ohst");
        assert_eq!(phonetic_tail("almost"), "ohst");
        assert_eq!(phonetic_tail("host"), "ohst");
        assert_eq!(phonetic_tail("cold"), "ohld");
    }

    #[test]
    fn test_short_o_ost() {
        assert_eq!(phonetic_tail("cost"), "ost");
        assert_eq!(phonetic_tail("lost"), "ost");
        assert_eq!(phonetic_tail("frost"), "ost");
    }

    #[test]
    fn test_irregular_endings() {
        assert_eq!(phonetic_tail("love"), "uv");
        assert_eq!(phonetic_tail("above"), "uv");
        assert_eq!(phonetic_tail("come"), "um");
    }

    #[test]
    fn test_initial_y() {
        assert_eq!(phonetic_key("you"), "jou");
        assert_eq!(phonetic_tail("you"), "ou");
    }

    #[test]
    fn test_final_y() {
        assert_eq!(phonetic_key("my"), "miy");
        assert_eq!(phonetic_tail("sky"), "iy");
        assert_eq!(phonetic_tail("happy"), "ee");
        assert_eq!(phonetic_tail("day"), "ay");
    }

    #[test]
    fn test_collapse_doubles() {
        assert_eq!(phonetic_key("ball"), "bal");
        assert_eq!(phonetic_key("buzz"), "buz");
        assert_eq!(phonetic_key("see"), "see");
    }

    #[test]
    fn test_no_vowel_fallback() {
        assert_eq!(phonetic_tail("hmm"), "hmm");
        assert_eq!(phonetic_tail("psst"), "sst");
        assert_eq!(phonetic_tail("brrr"), "rrr");
    }

    #[test]
    fn test_short_input() {
        assert_eq!(phonetic_tail(""), "");
        assert_eq!(phonetic_tail("a"), "a");
        assert_eq!(phonetic_tail("!"), "");
        assert_eq!(phonetic_tail("ok"), "ok");
    }

    #[test]
    fn test_deterministic() {
        for w in ["shining", "wonderful", "rock'n", "x", "queue"] {
            assert_eq!(phonetic_tail(w), phonetic_tail(w));
        }
    }

    #[test]
    fn test_split_tail() {
        assert_eq!(split_tail("iyt"), ("iy", "t"));
        assert_eq!(split_tail("ohst"), ("oh", "st"));
        assert_eq!(split_tail("oht"), ("oh", "t"));
        assert_eq!(split_tail("ohld"), ("oh", "ld"));
        assert_eq!(split_tail("ot"), ("o", "t"));
        assert_eq!(split_tail("oo"), ("oo", ""));
        assert_eq!(split_tail("hm"), ("", "hm"));
        assert_eq!(split_tail(""), ("", ""));
    }
}
