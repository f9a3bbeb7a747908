//! Editing state for one lyrics document.
//!
//! Every text change runs two explicit steps: reconcile the existing
//! annotations against the new text, then, when automatic highlighting is
//! on, re-cluster from the manual subset.

use crate::config::EngineConfig;
use crate::error::SessionError;
use crate::language::tokenize::{char_len, tokenize, truncate_chars};
use crate::lines::{accent_for_syllables, analyze_lines, LineSummary};
use crate::rhyme::reconcile::reconcile_annotations;
use crate::rhyme::scheme::detect_rhyme_schemes_with;
use crate::types::{AccentTier, Annotation, SchemeId, Token};

/// A document plus its annotations and editor selections.
#[derive(Debug, Clone)]
pub struct LyricsSession {
    text: String,
    annotations: Vec<Annotation>,
    auto_highlight: bool,
    /// Scheme applied by the next [`mark`](Self::mark)
    pub selected_scheme: SchemeId,
    /// Emphasis applied by the next [`mark`](Self::mark)
    pub accent_tier: AccentTier,
    config: EngineConfig,
}

impl Default for LyricsSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl LyricsSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            text: String::new(),
            annotations: Vec::new(),
            auto_highlight: false,
            selected_scheme: SchemeId::A,
            accent_tier: AccentTier::Medium,
            config: config.clamped(),
        }
    }

    /// Rebuild a session from saved state without re-running analysis.
    pub fn restore(
        text: String,
        annotations: Vec<Annotation>,
        auto_highlight: bool,
        config: EngineConfig,
    ) -> Self {
        Self {
            text,
            annotations,
            auto_highlight,
            ..Self::new(config)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn auto_highlight(&self) -> bool {
        self.auto_highlight
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the document.
    ///
    /// Text past `max_document_chars` is cut off. Returns `true` when that
    /// happened.
    pub fn set_text(&mut self, new_text: &str) -> bool {
        let kept = truncate_chars(new_text, self.config.max_document_chars);
        let truncated = kept.len() < new_text.len();
        if truncated {
            log::warn!(
                "Lyrics truncated to {} characters",
                self.config.max_document_chars
            );
        }

        self.annotations = reconcile_annotations(&self.text, kept, &self.annotations);
        self.text = kept.to_string();
        if self.auto_highlight {
            self.run_auto_highlight();
        }
        truncated
    }

    /// Change the clustering threshold, re-clustering if automatic mode is on.
    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.config = EngineConfig {
            sensitivity,
            ..self.config.clone()
        }
        .clamped();
        if self.auto_highlight {
            self.run_auto_highlight();
        }
    }

    /// Turn automatic highlighting on or off.
    ///
    /// Turning it on clusters immediately. Turning it off leaves the current
    /// marks, automatic ones included, where they are.
    pub fn set_auto_highlight(&mut self, on: bool) {
        self.auto_highlight = on;
        if on {
            self.run_auto_highlight();
        }
    }

    /// Replace all automatic marks with a fresh clustering pass.
    pub fn run_auto_highlight(&mut self) {
        let manual: Vec<Annotation> = self
            .annotations
            .iter()
            .filter(|a| a.is_manual)
            .cloned()
            .collect();
        self.annotations = detect_rhyme_schemes_with(&self.text, &manual, &self.config);
    }

    fn word_at(&self, start: usize, end: usize) -> Result<Token, SessionError> {
        let len = char_len(&self.text);
        if start >= end || end > len {
            return Err(SessionError::OutOfRange { start, end, len });
        }
        tokenize(&self.text)
            .take_while(|t| t.start <= start)
            .find(|t| t.start == start && t.end == end)
            .ok_or(SessionError::NotAWord { start, end })
    }

    fn insert_mark(&mut self, token: &Token, tier: AccentTier) -> &Annotation {
        self.annotations.retain(|a| a.start_index != token.start);
        self.annotations
            .push(Annotation::manual(token, self.selected_scheme, tier));
        &self.annotations[self.annotations.len() - 1]
    }

    /// Mark the word spanning exactly `[start, end)` with the selected
    /// scheme and tier. Any mark already starting at `start` is replaced.
    pub fn mark(&mut self, start: usize, end: usize) -> Result<&Annotation, SessionError> {
        let token = self.word_at(start, end)?;
        let tier = self.accent_tier;
        Ok(self.insert_mark(&token, tier))
    }

    /// Like [`mark`](Self::mark) but the tier follows the word's length.
    pub fn mark_by_length(
        &mut self,
        start: usize,
        end: usize,
    ) -> Result<&Annotation, SessionError> {
        let token = self.word_at(start, end)?;
        let tier = accent_for_syllables(token.syllables);
        Ok(self.insert_mark(&token, tier))
    }

    /// Remove the mark starting at `start`.
    pub fn unmark(&mut self, start: usize) -> Result<Annotation, SessionError> {
        let pos = self
            .annotations
            .iter()
            .position(|a| a.start_index == start)
            .ok_or(SessionError::NoAnnotation(start))?;
        Ok(self.annotations.remove(pos))
    }

    /// Change the scheme and/or tier of the mark starting at `start`.
    pub fn update(
        &mut self,
        start: usize,
        scheme: Option<SchemeId>,
        tier: Option<AccentTier>,
    ) -> Result<(), SessionError> {
        let a = self
            .annotations
            .iter_mut()
            .find(|a| a.start_index == start)
            .ok_or(SessionError::NoAnnotation(start))?;
        if let Some(scheme) = scheme {
            a.scheme = scheme;
        }
        if let Some(tier) = tier {
            a.accent_tier = tier;
        }
        Ok(())
    }

    /// Remove every mark.
    pub fn clear(&mut self) {
        self.annotations.clear();
    }

    pub fn lines(&self) -> Vec<LineSummary> {
        analyze_lines(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str) -> LyricsSession {
        let mut s = LyricsSession::default();
        s.set_text(text);
        s
    }

    #[test]
    fn test_mark_and_shift() {
        let mut s = session("love you");
        s.mark(0, 4).unwrap();
        s.set_text("I love you");
        assert_eq!(s.annotations().len(), 1);
        assert_eq!(s.annotations()[0].start_index, 2);
        assert_eq!(s.annotations()[0].word, "love");
    }

    #[test]
    fn test_mark_uses_selection() {
        let mut s = session("light and bright");
        s.selected_scheme = SchemeId::D;
        s.accent_tier = AccentTier::High;
        let a = s.mark(10, 16).unwrap().clone();
        assert_eq!(a.word, "bright");
        assert_eq!(a.scheme, SchemeId::D);
        assert_eq!(a.accent_tier, AccentTier::High);
        assert!(a.is_manual);
    }

    #[test]
    fn test_mark_replaces_same_start() {
        let mut s = session("light and bright");
        s.mark(0, 5).unwrap();
        s.selected_scheme = SchemeId::B;
        s.mark(0, 5).unwrap();
        assert_eq!(s.annotations().len(), 1);
        assert_eq!(s.annotations()[0].scheme, SchemeId::B);
    }

    #[test]
    fn test_mark_errors() {
        let mut s = session("love you");
        assert_eq!(
            s.mark(5, 20),
            Err(SessionError::OutOfRange { start: 5, end: 20, len: 8 })
        );
        assert_eq!(
            s.mark(3, 3),
            Err(SessionError::OutOfRange { start: 3, end: 3, len: 8 })
        );
        assert_eq!(s.mark(0, 3), Err(SessionError::NotAWord { start: 0, end: 3 }));
        assert_eq!(s.mark(0, 8), Err(SessionError::NotAWord { start: 0, end: 8 }));
        assert!(s.annotations().is_empty());
    }

    #[test]
    fn test_mark_by_length() {
        let mut s = session("wonderful day");
        let a = s.mark_by_length(0, 9).unwrap();
        assert_eq!(a.accent_tier, AccentTier::High);
        let a = s.mark_by_length(10, 13).unwrap();
        assert_eq!(a.accent_tier, AccentTier::Low);
    }

    #[test]
    fn test_unmark_and_update() {
        let mut s = session("light and bright");
        s.mark(0, 5).unwrap();
        s.update(0, Some(SchemeId::C), None).unwrap();
        assert_eq!(s.annotations()[0].scheme, SchemeId::C);
        assert_eq!(s.annotations()[0].accent_tier, AccentTier::Medium);
        s.update(0, None, Some(AccentTier::Low)).unwrap();
        assert_eq!(s.annotations()[0].accent_tier, AccentTier::Low);

        assert_eq!(s.update(3, None, None), Err(SessionError::NoAnnotation(3)));
        assert_eq!(s.unmark(0).unwrap().word, "light");
        assert_eq!(s.unmark(0), Err(SessionError::NoAnnotation(0)));
    }

    #[test]
    fn test_auto_highlight_on_text_change() {
        let mut s = session("I see the light");
        s.set_auto_highlight(true);
        assert!(s.annotations().is_empty());

        s.set_text("I see the light\nShining so bright");
        let words: Vec<&str> = s.annotations().iter().map(|a| a.word.as_str()).collect();
        assert_eq!(words, vec!["light", "bright"]);
    }

    #[test]
    fn test_auto_highlight_keeps_manual() {
        let mut s = session("light bright night");
        s.selected_scheme = SchemeId::F;
        s.mark(0, 5).unwrap();
        s.set_auto_highlight(true);
        assert_eq!(s.annotations().len(), 3);
        assert_eq!(s.annotations()[0].scheme, SchemeId::F);
        assert!(s.annotations()[0].is_manual);
        assert!(s.annotations()[1..].iter().all(|a| !a.is_manual));
    }

    #[test]
    fn test_auto_off_leaves_marks() {
        let mut s = session("light bright");
        s.set_auto_highlight(true);
        assert_eq!(s.annotations().len(), 2);
        s.set_auto_highlight(false);
        assert_eq!(s.annotations().len(), 2);

        // edits only reconcile now
        s.set_text("light bright fight");
        assert_eq!(s.annotations().len(), 2);
    }

    #[test]
    fn test_sensitivity_reclusters() {
        let mut s = session("cat cap");
        s.set_auto_highlight(true);
        assert_eq!(s.annotations().len(), 2);
        s.set_sensitivity(3.0);
        assert!(s.annotations().is_empty());
        s.set_sensitivity(0.0);
        assert_eq!(s.config().sensitivity, 1.0);
    }

    #[test]
    fn test_truncation() {
        let mut s = LyricsSession::new(EngineConfig {
            max_document_chars: 10,
            ..EngineConfig::default()
        });
        assert!(s.set_text("light and bright"));
        assert_eq!(s.text(), "light and ");
        assert!(!s.set_text("short"));
    }

    #[test]
    fn test_clear_and_lines() {
        let mut s = session("light\nbright");
        s.set_auto_highlight(true);
        s.clear();
        assert!(s.annotations().is_empty());
        assert_eq!(s.lines().len(), 2);
    }
}
