//! Engine tuning knobs.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::rhyme::scorer::{DEFAULT_THRESHOLD, MAX_SCORE};
use crate::types::SchemeId;

/// Lowest sensitivity a caller may ask for.
pub const MIN_SENSITIVITY: f64 = 1.0;

/// Configuration for detection and editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum rhyme score for two words to share a scheme
    pub sensitivity: f64,
    /// Words shorter than this (in characters) never join a scheme
    pub min_word_len: usize,
    /// Number of palette entries clustering may use (1..=24)
    pub scheme_limit: usize,
    /// Documents are cut to this many characters by the session
    pub max_document_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_THRESHOLD,
            min_word_len: 3,
            scheme_limit: SchemeId::ALL.len(),
            max_document_chars: 5000,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config.clamped())
    }

    /// Copy with every field forced into its valid range.
    pub fn clamped(&self) -> Self {
        let sensitivity = if self.sensitivity.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            self.sensitivity.clamp(MIN_SENSITIVITY, MAX_SCORE)
        };
        Self {
            sensitivity,
            min_word_len: self.min_word_len.max(1),
            scheme_limit: self.scheme_limit.clamp(1, SchemeId::ALL.len()),
            max_document_chars: self.max_document_chars.max(1),
        }
    }

    /// The palette clustering may draw from, in discovery order.
    pub fn palette(&self) -> &'static [SchemeId] {
        &SchemeId::ALL[..self.scheme_limit.clamp(1, SchemeId::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.sensitivity, 2.0);
        assert_eq!(c.min_word_len, 3);
        assert_eq!(c.scheme_limit, 24);
        assert_eq!(c.max_document_chars, 5000);
        assert_eq!(c.palette().len(), 24);
    }

    #[test]
    fn test_clamped() {
        let c = EngineConfig {
            sensitivity: 9.0,
            min_word_len: 0,
            scheme_limit: 40,
            max_document_chars: 0,
        }
        .clamped();
        assert_eq!(c.sensitivity, 5.0);
        assert_eq!(c.min_word_len, 1);
        assert_eq!(c.scheme_limit, 24);
        assert_eq!(c.max_document_chars, 1);

        let c = EngineConfig {
            sensitivity: f64::NAN,
            scheme_limit: 0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(c.sensitivity, 2.0);
        assert_eq!(c.scheme_limit, 1);
    }

    #[test]
    fn test_classic_palette() {
        let c = EngineConfig {
            scheme_limit: 8,
            ..Default::default()
        };
        assert_eq!(c.palette().last(), Some(&SchemeId::H));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: EngineConfig = serde_json::from_str(r#"{"sensitivity": 3.5}"#).unwrap();
        assert_eq!(c.sensitivity, 3.5);
        assert_eq!(c.min_word_len, 3);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictone.json");
        std::fs::write(&path, r#"{"scheme_limit": 99, "min_word_len": 4}"#).unwrap();
        let c = EngineConfig::from_file(&path).unwrap();
        assert_eq!(c.scheme_limit, 24);
        assert_eq!(c.min_word_len, 4);

        assert!(EngineConfig::from_file(&dir.path().join("missing.json")).is_err());
        std::fs::write(&path, "not json").unwrap();
        assert!(EngineConfig::from_file(&path).is_err());
    }
}
