//! Keeping annotations on their words across arbitrary edits.

use std::collections::{HashMap, HashSet};

use crate::language::tokenize::tokenize;
use crate::types::{Annotation, Token};

/// Move each annotation onto the nearest matching word of `new_text`.
///
/// Words are matched case-insensitively. Annotations are placed in order of
/// their old start offset; each claims the closest occurrence nobody else
/// has claimed yet, preferring the earlier one on a tie. An annotation with
/// no occurrence left is dropped. The result keeps the input order.
///
/// This is a greedy match: edits that swap two occurrences of the same word
/// can leave their annotations on each other's positions.
pub fn reconcile_annotations(
    old_text: &str,
    new_text: &str,
    annotations: &[Annotation],
) -> Vec<Annotation> {
    if old_text == new_text {
        return annotations.to_vec();
    }

    let mut occurrences: HashMap<String, Vec<Token>> = HashMap::new();
    for token in tokenize(new_text) {
        occurrences
            .entry(token.text.to_lowercase())
            .or_default()
            .push(token);
    }

    let mut order: Vec<usize> = (0..annotations.len()).collect();
    order.sort_by_key(|&i| annotations[i].start_index);

    let mut claimed: HashSet<usize> = HashSet::new();
    let mut placed: Vec<Option<Annotation>> = vec![None; annotations.len()];

    for i in order {
        let old = &annotations[i];
        let Some(candidates) = occurrences.get(&old.word.to_lowercase()) else {
            continue;
        };
        let best = candidates
            .iter()
            .filter(|t| !claimed.contains(&t.start))
            .min_by_key(|t| t.start.abs_diff(old.start_index));
        if let Some(token) = best {
            claimed.insert(token.start);
            placed[i] = Some(Annotation {
                start_index: token.start,
                end_index: token.end,
                line_index: token.line,
                ..old.clone()
            });
        }
    }

    let kept: Vec<Annotation> = placed.into_iter().flatten().collect();
    if kept.len() < annotations.len() {
        log::debug!(
            "Dropped {} annotations whose words disappeared",
            annotations.len() - kept.len()
        );
    }
    kept
}
