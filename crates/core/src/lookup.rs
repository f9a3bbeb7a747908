//! Word suggestion interface and an offline backend.
//!
//! Network services (rhyme dictionaries, thesauri) plug in behind
//! [`WordLookup`]. The bundled [`OfflineLookup`] ranks a fixed vocabulary
//! with the rhyme scorer and needs no pronunciation data.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::language::syllables::{clean_word, count_syllables};
use crate::language::tokenize::tokenize;
use crate::rhyme::scorer::{score_forms, WordForm};

/// A suggested word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub word: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_syllables: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// What kind of related words to ask for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LookupCategory {
    Rhymes,
    NearRhymes,
    Synonyms,
}

impl LookupCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupCategory::Rhymes => "rhymes",
            LookupCategory::NearRhymes => "near",
            LookupCategory::Synonyms => "synonyms",
        }
    }
}

impl FromStr for LookupCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rhymes" | "rhyme" => Ok(LookupCategory::Rhymes),
            "near" | "near_rhymes" => Ok(LookupCategory::NearRhymes),
            "synonyms" | "syn" => Ok(LookupCategory::Synonyms),
            _ => bail!("Unknown category: '{}'. Available: rhymes, near, synonyms", s),
        }
    }
}

/// Suggestion backend trait.
pub trait WordLookup: Send + Sync {
    /// Backend name for display.
    fn name(&self) -> &str;

    /// Up to `max` suggestions for `word`, best first.
    fn lookup(
        &self,
        word: &str,
        category: LookupCategory,
        max: usize,
    ) -> std::result::Result<Vec<Suggestion>, LookupError>;
}

/// Concatenate suggestion lists, keep the first of each word (ignoring
/// case) and sort by score, highest first. Equal scores keep their order.
pub fn merge_suggestions<I>(lists: I) -> Vec<Suggestion>
where
    I: IntoIterator<Item = Vec<Suggestion>>,
{
    let mut seen = HashSet::new();
    let mut merged: Vec<Suggestion> = lists
        .into_iter()
        .flatten()
        .filter(|s| seen.insert(s.word.to_lowercase()))
        .collect();
    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged
}

/// Estimate syllable counts the backend left out.
pub fn fill_syllables(suggestions: &mut [Suggestion]) {
    for s in suggestions.iter_mut().filter(|s| s.num_syllables.is_none()) {
        s.num_syllables = Some(count_syllables(&s.word));
    }
}

/// Rhyme lookup over a fixed word list.
pub struct OfflineLookup {
    vocabulary: Vec<(String, WordForm)>,
}

impl OfflineLookup {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let vocabulary = words
            .into_iter()
            .filter_map(|w| {
                let w = w.as_ref().trim();
                let key = w.to_lowercase();
                (!w.is_empty() && seen.insert(key)).then(|| (w.to_string(), WordForm::new(w)))
            })
            .collect();
        Self { vocabulary }
    }

    /// Build from a text file; every word in it joins the vocabulary.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary: {}", path.display()))?;
        let lookup = Self::new(tokenize(&text).map(|t| t.text));
        log::info!(
            "Loaded {} vocabulary words from {}",
            lookup.len(),
            path.display()
        );
        Ok(lookup)
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}

impl WordLookup for OfflineLookup {
    fn name(&self) -> &str {
        "offline"
    }

    fn lookup(
        &self,
        word: &str,
        category: LookupCategory,
        max: usize,
    ) -> std::result::Result<Vec<Suggestion>, LookupError> {
        if clean_word(word).is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        let accept: fn(f64) -> bool = match category {
            LookupCategory::Rhymes => |s| s >= 4.0,
            LookupCategory::NearRhymes => |s| (2.0..4.0).contains(&s),
            LookupCategory::Synonyms => {
                return Err(LookupError::Unsupported {
                    backend: self.name().to_string(),
                    category: category.as_str(),
                })
            }
        };

        let query = WordForm::new(word);
        let found: Vec<Suggestion> = self
            .vocabulary
            .iter()
            .filter_map(|(w, form)| {
                let score = score_forms(&query, form);
                accept(score).then(|| Suggestion {
                    word: w.clone(),
                    score,
                    num_syllables: None,
                    tags: vec![category.as_str().to_string()],
                })
            })
            .collect();

        let mut ranked = merge_suggestions([found]);
        ranked.truncate(max);
        fill_syllables(&mut ranked);
        Ok(ranked)
    }
}

/// Create a lookup backend by name.
pub fn get_lookup(name: &str, vocabulary: Option<&Path>) -> Result<Box<dyn WordLookup>> {
    match name {
        "offline" => {
            let Some(path) = vocabulary else {
                bail!("The offline lookup needs a vocabulary file");
            };
            Ok(Box::new(OfflineLookup::from_file(path)?))
        }
        _ => bail!("Unknown lookup backend: '{}'. Available: offline", name),
    }
}
