//! Whole-document rhyme clustering.
//!
//! Every eligible word is compared against every later one. The first
//! unclaimed word of each group becomes its anchor; all later unclaimed
//! words scoring at least the sensitivity against the anchor join it.
//! Groups get scheme labels in the order they are found.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::language::brackets::scan_brackets;
use crate::language::tokenize::tokenize;
use crate::types::{AccentTier, Annotation, Token};

use super::scorer::{score_forms, WordForm};

/// Words from `document` that may take part in clustering.
///
/// Drops anything overlapping a bracket region and anything shorter than
/// `min_word_len` characters.
pub fn eligible_tokens(document: &str, min_word_len: usize) -> Vec<Token> {
    let brackets = scan_brackets(document);
    tokenize(document)
        .filter(|t| !brackets.overlaps(t.start, t.end))
        .filter(|t| t.len() >= min_word_len)
        .collect()
}

/// Detect rhyme schemes with default settings and the given sensitivity.
///
/// Returns the manual annotations first, untouched, followed by fresh
/// automatic annotations. Automatic entries in `manual` are discarded.
pub fn detect_rhyme_schemes(
    document: &str,
    manual: &[Annotation],
    sensitivity: f64,
) -> Vec<Annotation> {
    let config = EngineConfig {
        sensitivity,
        ..EngineConfig::default()
    };
    detect_rhyme_schemes_with(document, manual, &config)
}

/// Detect rhyme schemes using every knob in `config`.
///
/// `config.sensitivity` is used as given.
pub fn detect_rhyme_schemes_with(
    document: &str,
    manual: &[Annotation],
    config: &EngineConfig,
) -> Vec<Annotation> {
    let mut out: Vec<Annotation> = manual.iter().filter(|a| a.is_manual).cloned().collect();
    if document.trim().is_empty() {
        return out;
    }

    let tokens = eligible_tokens(document, config.min_word_len);
    let forms: Vec<WordForm> = tokens.iter().map(|t| WordForm::new(&t.text)).collect();
    let manual_starts: HashSet<usize> = out.iter().map(|a| a.start_index).collect();

    let mut claimed = vec![false; tokens.len()];
    let mut palette = config.palette().iter();
    let mut clusters = 0usize;

    for i in 0..tokens.len() {
        if claimed[i] {
            continue;
        }

        let members: Vec<(usize, f64)> = (i + 1..tokens.len())
            .filter(|&j| !claimed[j])
            .map(|j| (j, score_forms(&forms[i], &forms[j])))
            .filter(|&(_, s)| s >= config.sensitivity)
            .collect();
        if members.is_empty() {
            continue;
        }

        let Some(&scheme) = palette.next() else {
            log::debug!("Scheme palette exhausted after {} clusters", clusters);
            break;
        };
        clusters += 1;

        let anchor_score = members.iter().map(|&(_, s)| s).fold(0.0, f64::max);
        claimed[i] = true;
        let group = std::iter::once((i, anchor_score)).chain(members.iter().copied());
        for (k, s) in group {
            claimed[k] = true;
            let token = &tokens[k];
            if manual_starts.contains(&token.start) {
                continue;
            }
            out.push(Annotation::automatic(token, scheme, AccentTier::from_score(s)));
        }
    }

    log::debug!(
        "Clustered {} of {} words into {} schemes",
        claimed.iter().filter(|&&c| c).count(),
        tokens.len(),
        clusters
    );
    out
}
