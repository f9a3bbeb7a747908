//! JSON persistence of an editing session.
//!
//! The whole session lives in one file, `<dir>/dictone-storage.json`. A
//! SHA-256 digest of the text is saved next to the annotations so marks are
//! only trusted when the text they point into is byte-for-byte the same.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::EngineConfig;
use crate::language::tokenize::{char_len, truncate_chars};
use crate::session::LyricsSession;
use crate::types::{AccentTier, Annotation, SchemeId};

/// Base name of the storage file.
pub const STORAGE_NAME: &str = "dictone-storage";

/// Get the store directory.
///
/// Uses `DICTONE_STORE_DIR` env var if set, otherwise `~/.local/share/dictone`.
pub fn store_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DICTONE_STORE_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("dictone")
}

/// Path of the storage file inside `dir`.
pub fn storage_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.json", STORAGE_NAME))
}

/// SHA-256 of `text` as a 64-character hex string.
pub fn text_digest(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// On-disk shape of a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub lyrics: String,
    pub rhyme_words: Vec<Annotation>,
    #[serde(default)]
    pub auto_highlight: bool,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    #[serde(default = "default_scheme")]
    pub selected_scheme: SchemeId,
    #[serde(default = "default_accent", rename = "accentLevel")]
    pub accent_tier: AccentTier,
    #[serde(default)]
    pub text_digest: String,
}

fn default_sensitivity() -> f64 {
    EngineConfig::default().sensitivity
}

fn default_scheme() -> SchemeId {
    SchemeId::A
}

fn default_accent() -> AccentTier {
    AccentTier::Medium
}

impl PersistedState {
    pub fn from_session(session: &LyricsSession) -> Self {
        Self {
            lyrics: session.text().to_string(),
            rhyme_words: session.annotations().to_vec(),
            auto_highlight: session.auto_highlight(),
            sensitivity: session.config().sensitivity,
            selected_scheme: session.selected_scheme,
            accent_tier: session.accent_tier,
            text_digest: text_digest(session.text()),
        }
    }

    /// Turn saved state back into a session.
    ///
    /// Over-long text is cut to `config.max_document_chars`. Annotations are
    /// dropped when the text was cut or no longer matches its digest.
    pub fn into_session(self, config: EngineConfig) -> LyricsSession {
        let Self {
            mut lyrics,
            mut rhyme_words,
            auto_highlight,
            sensitivity,
            selected_scheme,
            accent_tier,
            text_digest: digest,
        } = self;

        let max = config.max_document_chars;
        if char_len(&lyrics) > max {
            log::warn!(
                "Stored lyrics exceed {} characters; truncating and discarding {} annotations",
                max,
                rhyme_words.len()
            );
            lyrics = truncate_chars(&lyrics, max).to_string();
            rhyme_words.clear();
        } else if digest != text_digest(&lyrics) && !rhyme_words.is_empty() {
            log::warn!(
                "Stored lyrics changed outside the editor; discarding {} annotations",
                rhyme_words.len()
            );
            rhyme_words.clear();
        }

        let config = EngineConfig {
            sensitivity,
            ..config
        };
        let mut session = LyricsSession::restore(lyrics, rhyme_words, auto_highlight, config);
        session.selected_scheme = selected_scheme;
        session.accent_tier = accent_tier;
        session
    }
}

/// Atomically write data to a file via temp file + rename.
fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
    }

    let tmp_path = target.with_extension("tmp");
    std::fs::write(&tmp_path, data)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, target)
        .with_context(|| format!("Failed to replace {}", target.display()))?;
    Ok(())
}

/// Save `session` under `dir`.
pub fn save_session(dir: &Path, session: &LyricsSession) -> Result<PathBuf> {
    let path = storage_path(dir);
    let json = serde_json::to_string_pretty(&PersistedState::from_session(session))?;
    atomic_write(&path, json.as_bytes())?;
    log::info!(
        "Saved session ({} characters, {} annotations) to {}",
        char_len(session.text()),
        session.annotations().len(),
        path.display()
    );
    Ok(path)
}

/// Load the session saved under `dir`, or `None` if nothing was saved.
pub fn load_session(dir: &Path, config: EngineConfig) -> Result<Option<LyricsSession>> {
    let path = storage_path(dir);
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read session: {}", path.display()))?;
    let state: PersistedState = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse session: {}", path.display()))?;
    log::info!("Loaded session from {}", path.display());
    Ok(Some(state.into_session(config)))
}

/// Delete the saved session. Returns whether one existed.
pub fn remove_session(dir: &Path) -> Result<bool> {
    let path = storage_path(dir);
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(&path)
        .with_context(|| format!("Failed to remove session: {}", path.display()))?;
    Ok(true)
}
